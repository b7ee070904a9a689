//! Contribution Leaderboard
//!
//! Read model over the active members of a chama, ranked by contribution,
//! savings or e-mail.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use kernel::id::{MemberId, UserId};
use crate::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardSort {
    #[default]
    MostContributing,
    /// Largest savings balance first
    TopSaver,
    Ascending,
    Descending,
    /// By e-mail, members without one first
    Alphabetical,
}

impl LeaderboardSort {
    pub const ALL: [LeaderboardSort; 5] = [
        LeaderboardSort::MostContributing,
        LeaderboardSort::TopSaver,
        LeaderboardSort::Ascending,
        LeaderboardSort::Descending,
        LeaderboardSort::Alphabetical,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            LeaderboardSort::MostContributing => "most_contributing",
            LeaderboardSort::TopSaver => "top_saver",
            LeaderboardSort::Ascending => "ascending",
            LeaderboardSort::Descending => "descending",
            LeaderboardSort::Alphabetical => "alphabetical",
        }
    }

    /// Column and direction the backend can sort by
    ///
    /// `None` for alphabetical: the e-mail lives on the joined profile and is
    /// sorted client-side.
    pub const fn order(&self) -> Option<(&'static str, bool)> {
        match self {
            LeaderboardSort::MostContributing | LeaderboardSort::Descending => {
                Some(("total_contributed", false))
            }
            LeaderboardSort::TopSaver => Some(("savings_balance", false)),
            LeaderboardSort::Ascending => Some(("total_contributed", true)),
            LeaderboardSort::Alphabetical => None,
        }
    }

    fn compare(&self, a: &MemberStanding, b: &MemberStanding) -> Ordering {
        match self {
            LeaderboardSort::MostContributing | LeaderboardSort::Descending => {
                b.total_contributed.total_cmp(&a.total_contributed)
            }
            LeaderboardSort::TopSaver => b.savings_balance.total_cmp(&a.savings_balance),
            LeaderboardSort::Ascending => a.total_contributed.total_cmp(&b.total_contributed),
            LeaderboardSort::Alphabetical => {
                let a = a.email.as_deref().unwrap_or_default();
                let b = b.email.as_deref().unwrap_or_default();
                a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
            }
        }
    }
}

impl fmt::Display for LeaderboardSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardSort {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == wanted)
            .ok_or_else(|| WalletError::UnsupportedSort(s.trim().to_string()))
    }
}

/// One active member's contribution record
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStanding {
    pub member_id: MemberId,
    pub user_id: UserId,
    pub role: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub total_contributed: f64,
    pub savings_balance: f64,
    pub mgr_balance: f64,
    pub last_contribution_date: Option<String>,
}

impl MemberStanding {
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .or(self.full_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub standing: MemberStanding,
}

/// Order `members` by `sort` and number them from 1
///
/// Stable, so members that tie keep the order the backend returned.
pub fn rank_members(
    mut members: Vec<MemberStanding>,
    sort: LeaderboardSort,
) -> Vec<LeaderboardEntry> {
    members.sort_by(|a, b| sort.compare(a, b));
    members
        .into_iter()
        .enumerate()
        .map(|(i, standing)| LeaderboardEntry {
            rank: i + 1,
            standing,
        })
        .collect()
}
