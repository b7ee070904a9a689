//! Chama Leaderboard Use Case

use std::sync::Arc;

use kernel::id::ChamaId;

use crate::domain::gateway::WalletGateway;
use crate::domain::leaderboard::{LeaderboardEntry, LeaderboardSort, rank_members};
use crate::error::WalletResult;

/// Ranks the active members of a chama
///
/// Read-only, so failures are logged but not pushed to the notifier.
pub struct LeaderboardUseCase<G>
where
    G: WalletGateway,
{
    gateway: Arc<G>,
}

impl<G> LeaderboardUseCase<G>
where
    G: WalletGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        chama_id: ChamaId,
        sort: LeaderboardSort,
    ) -> WalletResult<Vec<LeaderboardEntry>> {
        let members = self
            .gateway
            .fetch_standings(chama_id, sort)
            .await
            .inspect_err(|e| e.log())?;

        Ok(rank_members(members, sort))
    }
}
