//! Backend Wallet Gateway

use kernel::id::{ChamaId, MemberId, UserId};
use platform::http::{BackendClient, RowQuery};
use serde::Deserialize;

use crate::domain::entities::{
    ContributionRequest, ContributionResponse, WalletBalances, WalletOpRequest, WalletOpResponse,
};
use crate::domain::gateway::WalletGateway;
use crate::domain::leaderboard::{LeaderboardSort, MemberStanding};
use crate::error::WalletResult;

const WALLET_OPS_FUNCTION: &str = "chama-wallet-ops";
const CONTRIBUTION_FUNCTION: &str = "make-contribution";
const MEMBERS_TABLE: &str = "chama_members";

#[derive(Debug, Deserialize)]
struct MembershipRow {
    #[serde(default)]
    savings_balance: Option<f64>,
    #[serde(default)]
    mgr_balance: Option<f64>,
}

const STANDING_COLUMNS: &str = "id,user_id,role,total_contributed,savings_balance,mgr_balance,\
last_contribution_date,profiles:user_id(full_name,email)";

#[derive(Debug, Deserialize)]
struct ProfileRef {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandingRow {
    id: MemberId,
    user_id: UserId,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    total_contributed: Option<f64>,
    #[serde(default)]
    savings_balance: Option<f64>,
    #[serde(default)]
    mgr_balance: Option<f64>,
    #[serde(default)]
    last_contribution_date: Option<String>,
    #[serde(default)]
    profiles: Option<ProfileRef>,
}

impl From<StandingRow> for MemberStanding {
    fn from(row: StandingRow) -> Self {
        let (full_name, email) = row
            .profiles
            .map(|p| (p.full_name, p.email))
            .unwrap_or_default();
        MemberStanding {
            member_id: row.id,
            user_id: row.user_id,
            role: row.role.unwrap_or_else(|| "member".to_string()),
            email,
            full_name,
            total_contributed: row.total_contributed.unwrap_or_default(),
            savings_balance: row.savings_balance.unwrap_or_default(),
            mgr_balance: row.mgr_balance.unwrap_or_default(),
            last_contribution_date: row.last_contribution_date,
        }
    }
}

impl From<MembershipRow> for WalletBalances {
    fn from(row: MembershipRow) -> Self {
        WalletBalances::new(
            row.savings_balance.unwrap_or_default(),
            row.mgr_balance.unwrap_or_default(),
        )
    }
}

/// Wallet gateway over the backend's serverless functions
#[derive(Clone)]
pub struct RestWalletGateway {
    client: BackendClient,
}

impl RestWalletGateway {
    /// `client` should carry the member's access token
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl WalletGateway for RestWalletGateway {
    async fn fetch_balances(&self, chama_id: ChamaId, user_id: UserId) -> WalletResult<WalletBalances> {
        let rows: Vec<MembershipRow> = self
            .client
            .select_rows(
                MEMBERS_TABLE,
                &RowQuery::new("savings_balance,mgr_balance")
                    .eq("chama_id", chama_id)
                    .eq("user_id", user_id)
                    .limit(1),
            )
            .await?;

        // Not a member yet: nothing to draw on
        Ok(rows.into_iter().next().map(Into::into).unwrap_or_default())
    }

    async fn invoke_wallet_op(&self, request: &WalletOpRequest) -> WalletResult<WalletOpResponse> {
        let response = self
            .client
            .invoke_function(WALLET_OPS_FUNCTION, request)
            .await?;
        Ok(response)
    }

    async fn make_contribution(
        &self,
        request: &ContributionRequest,
    ) -> WalletResult<ContributionResponse> {
        let response = self
            .client
            .invoke_function(CONTRIBUTION_FUNCTION, request)
            .await?;
        Ok(response)
    }

    async fn fetch_standings(
        &self,
        chama_id: ChamaId,
        sort: LeaderboardSort,
    ) -> WalletResult<Vec<MemberStanding>> {
        let mut query = RowQuery::new(STANDING_COLUMNS)
            .eq("chama_id", chama_id)
            .eq("is_active", true);
        if let Some((column, ascending)) = sort.order() {
            query = query.order(column, ascending);
        }

        let rows: Vec<StandingRow> = self.client.select_rows(MEMBERS_TABLE, &query).await?;
        tracing::debug!(%chama_id, %sort, members = rows.len(), "Fetched standings");
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
