//! Domain Services
//!
//! Client-side checks run before money leaves a wallet, and the cached views
//! each operation invalidates.

use kernel::id::{ChamaId, MemberId};

use crate::domain::entities::{WalletBalances, WalletOperation};
use crate::error::{WalletError, WalletResult};

/// Reject operations the backend would refuse anyway
///
/// Withdrawals and transfers draw on the MGR wallet and may not exceed it.
pub fn validate_operation(op: &WalletOperation, balances: &WalletBalances) -> WalletResult<()> {
    match op {
        WalletOperation::Withdraw {
            amount,
            phone_number,
            ..
        } => {
            ensure_covered(amount.value(), balances.mgr)?;
            if phone_number.trim().is_empty() {
                return Err(WalletError::MissingPhoneNumber);
            }
            Ok(())
        }
        WalletOperation::Send { amount, .. } => ensure_covered(amount.value(), balances.mgr),
        WalletOperation::TopUp { .. } | WalletOperation::Unlock { .. } => Ok(()),
    }
}

fn ensure_covered(requested: f64, available: f64) -> WalletResult<()> {
    if requested > available {
        return Err(WalletError::InsufficientBalance {
            available,
            requested,
        });
    }
    Ok(())
}

/// Recipient member picked for a transfer
pub fn parse_recipient(raw: &str) -> WalletResult<MemberId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(WalletError::MissingRecipient);
    }
    raw.parse()
        .map_err(|_| WalletError::InvalidRecipient(raw.to_string()))
}

/// Views to reload after a wallet operation
pub fn wallet_refresh_keys(chama_id: ChamaId) -> Vec<String> {
    vec![
        format!("chama-members/{chama_id}"),
        format!("chama-transactions/{chama_id}"),
        "chama-notifications".to_string(),
    ]
}

/// Views to reload after a contribution
pub fn contribution_refresh_keys(chama_id: ChamaId) -> Vec<String> {
    vec![
        format!("chama-members/{chama_id}"),
        format!("chama-contributions/{chama_id}"),
        format!("chama-leaderboard/{chama_id}"),
    ]
}
