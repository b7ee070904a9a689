//! Gateway Traits
//!
//! Interface to the backend that executes money movements. Implementations
//! are in the infrastructure layer.

use kernel::id::{ChamaId, UserId};

use crate::domain::entities::{
    ContributionRequest, ContributionResponse, WalletBalances, WalletOpRequest, WalletOpResponse,
};
use crate::domain::leaderboard::{LeaderboardSort, MemberStanding};
use crate::error::WalletResult;

#[trait_variant::make(WalletGateway: Send)]
pub trait LocalWalletGateway {
    /// The member's current balances in a chama
    async fn fetch_balances(&self, chama_id: ChamaId, user_id: UserId) -> WalletResult<WalletBalances>;

    /// Run a top-up, withdrawal, transfer or unlock
    async fn invoke_wallet_op(&self, request: &WalletOpRequest) -> WalletResult<WalletOpResponse>;

    /// Record a contribution
    async fn make_contribution(
        &self,
        request: &ContributionRequest,
    ) -> WalletResult<ContributionResponse>;

    /// Active members of a chama, ordered by `sort` where the backend can
    async fn fetch_standings(
        &self,
        chama_id: ChamaId,
        sort: LeaderboardSort,
    ) -> WalletResult<Vec<MemberStanding>>;
}
