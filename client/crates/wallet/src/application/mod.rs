//! Application Layer - Use Cases
//!
//! Orchestrates validation, the wallet gateway and member notifications,
//! and ranks members for the leaderboard.

pub mod contribution;
pub mod leaderboard;
pub mod wallet_ops;

pub use contribution::ContributionUseCase;
pub use leaderboard::LeaderboardUseCase;
pub use wallet_ops::WalletOpsUseCase;
