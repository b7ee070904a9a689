//! In-Memory Wallet Gateway
//!
//! Keeps balances per chama in process, for a single member, plus a fixed
//! member list for the leaderboard. Used by the console when no backend is
//! configured.

use std::collections::HashMap;

use kernel::id::{ChamaId, UserId};
use tokio::sync::Mutex;

use crate::domain::entities::{
    ContributionRequest, ContributionResponse, WalletBalances, WalletOpRequest, WalletOpResponse,
};
use crate::domain::gateway::WalletGateway;
use crate::domain::leaderboard::{LeaderboardSort, MemberStanding};
use crate::domain::value_objects::WalletType;
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Default)]
pub struct InMemoryWalletGateway {
    balances: Mutex<HashMap<ChamaId, WalletBalances>>,
    standings: Mutex<HashMap<ChamaId, Vec<MemberStanding>>>,
}

impl InMemoryWalletGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_balances(self, chama_id: ChamaId, balances: WalletBalances) -> Self {
        self.balances.lock().await.insert(chama_id, balances);
        self
    }

    pub async fn with_member(self, chama_id: ChamaId, standing: MemberStanding) -> Self {
        self.standings
            .lock()
            .await
            .entry(chama_id)
            .or_default()
            .push(standing);
        self
    }

    pub async fn balances(&self, chama_id: ChamaId) -> WalletBalances {
        self.balances
            .lock()
            .await
            .get(&chama_id)
            .copied()
            .unwrap_or_default()
    }
}

fn rejected(message: &str) -> WalletOpResponse {
    WalletOpResponse {
        success: Some(false),
        message: None,
        error: Some(message.to_string()),
    }
}

fn completed(message: String) -> WalletOpResponse {
    WalletOpResponse {
        success: Some(true),
        message: Some(message),
        error: None,
    }
}

impl WalletGateway for InMemoryWalletGateway {
    async fn fetch_balances(&self, chama_id: ChamaId, _user_id: UserId) -> WalletResult<WalletBalances> {
        Ok(self.balances(chama_id).await)
    }

    async fn invoke_wallet_op(&self, request: &WalletOpRequest) -> WalletResult<WalletOpResponse> {
        let mut all = self.balances.lock().await;
        let balances = all.entry(request.chama_id).or_default();
        let amount = request.amount.unwrap_or_default();

        let response = match request.operation {
            "topup" => {
                match request.wallet_type.unwrap_or_default() {
                    WalletType::Savings => balances.savings += amount,
                    WalletType::Mgr => balances.mgr += amount,
                }
                completed(format!("Topped up {amount:.2}"))
            }
            "withdraw" | "send" if amount > balances.mgr => rejected("Insufficient MGR balance"),
            "withdraw" | "send" => {
                balances.mgr -= amount;
                let to = request.recipient.as_deref().unwrap_or_default();
                completed(format!("Sent {amount:.2} to {to}"))
            }
            "unlock" => completed("Withdrawals unlocked".to_string()),
            other => return Err(WalletError::Internal(format!("unknown operation {other}"))),
        };

        Ok(response)
    }

    async fn make_contribution(
        &self,
        request: &ContributionRequest,
    ) -> WalletResult<ContributionResponse> {
        let mut all = self.balances.lock().await;
        all.entry(request.chama_id).or_default().savings += request.amount.value();

        Ok(ContributionResponse {
            success: true,
            error: None,
            message: None,
        })
    }

    /// Members in insertion order; ranking happens in the use case
    async fn fetch_standings(
        &self,
        chama_id: ChamaId,
        _sort: LeaderboardSort,
    ) -> WalletResult<Vec<MemberStanding>> {
        Ok(self
            .standings
            .lock()
            .await
            .get(&chama_id)
            .cloned()
            .unwrap_or_default())
    }
}
