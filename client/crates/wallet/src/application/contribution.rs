//! Make Contribution Use Case

use std::sync::Arc;

use platform::notify::{Notification, NotificationSink};

use crate::domain::entities::{ContributionRequest, WalletReceipt};
use crate::domain::gateway::WalletGateway;
use crate::domain::services::contribution_refresh_keys;
use crate::error::{WalletError, WalletResult};

const RECORDED: &str = "Your contribution has been recorded successfully";

/// Make Contribution Use Case
pub struct ContributionUseCase<G>
where
    G: WalletGateway,
{
    gateway: Arc<G>,
    notifier: Arc<dyn NotificationSink>,
}

impl<G> ContributionUseCase<G>
where
    G: WalletGateway,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { gateway, notifier }
    }

    pub async fn execute(&self, request: ContributionRequest) -> WalletResult<WalletReceipt> {
        let result = match self.gateway.make_contribution(&request).await {
            Ok(response) if response.success => Ok(response),
            Ok(response) => Err(WalletError::Rejected(response.error.unwrap_or_default())),
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                tracing::info!(
                    chama_id = %request.chama_id,
                    amount = request.amount.value(),
                    method = %request.payment_method,
                    "Contribution recorded"
                );
                self.notifier
                    .notify(Notification::success("Contribution Made!", RECORDED));
                Ok(WalletReceipt {
                    message: RECORDED.to_string(),
                    refresh: contribution_refresh_keys(request.chama_id),
                })
            }
            Err(e) => {
                e.log();
                let description = e
                    .user_message()
                    .unwrap_or_else(|| "Failed to make contribution".to_string());
                self.notifier.notify(Notification::error("Error", description));
                Err(e)
            }
        }
    }
}
