//! Wallet Operations Use Case

use std::sync::Arc;

use platform::notify::{Notification, NotificationSink};

use crate::domain::entities::{WalletBalances, WalletOperation, WalletReceipt};
use crate::domain::gateway::WalletGateway;
use crate::domain::services::{validate_operation, wallet_refresh_keys};
use crate::error::{WalletError, WalletResult};

const DEFAULT_SUCCESS: &str = "Operation completed successfully";
const DEFAULT_FAILURE: &str = "Operation failed";

/// Wallet Operations Use Case
pub struct WalletOpsUseCase<G>
where
    G: WalletGateway,
{
    gateway: Arc<G>,
    notifier: Arc<dyn NotificationSink>,
}

impl<G> WalletOpsUseCase<G>
where
    G: WalletGateway,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { gateway, notifier }
    }

    /// Validate against the current balances, then run the operation
    ///
    /// Validation failures are returned silently; backend failures are also
    /// notified.
    pub async fn execute(
        &self,
        op: WalletOperation,
        balances: &WalletBalances,
    ) -> WalletResult<WalletReceipt> {
        validate_operation(&op, balances).inspect_err(|e| e.log())?;

        let chama_id = op.chama_id();
        let request = op.to_request();

        let response = match self.gateway.invoke_wallet_op(&request).await {
            Ok(response) if response.success == Some(false) => Err(WalletError::Rejected(
                response.error.or(response.message).unwrap_or_default(),
            )),
            other => other,
        };

        match response {
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS.to_string());

                tracing::info!(
                    chama_id = %chama_id,
                    operation = op.name(),
                    amount = ?op.amount().map(|a| a.value()),
                    "Wallet operation completed"
                );
                self.notifier
                    .notify(Notification::success("Success", message.clone()));

                Ok(WalletReceipt {
                    message,
                    refresh: wallet_refresh_keys(chama_id),
                })
            }
            Err(e) => {
                e.log();
                let description = e
                    .user_message()
                    .unwrap_or_else(|| DEFAULT_FAILURE.to_string());
                self.notifier.notify(Notification::error("Error", description));
                Err(e)
            }
        }
    }
}
