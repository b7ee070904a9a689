//! Domain Entities
//!
//! Wallet operations, contributions and the backend's replies to them.

use kernel::id::{ChamaId, MemberId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Amount, PaymentMethod, WalletType};

/// A member's balances in one chama
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WalletBalances {
    pub savings: f64,
    pub mgr: f64,
}

impl WalletBalances {
    pub fn new(savings: f64, mgr: f64) -> Self {
        Self { savings, mgr }
    }
}

/// Money movement on a chama wallet
#[derive(Debug, Clone, PartialEq)]
pub enum WalletOperation {
    TopUp {
        chama_id: ChamaId,
        amount: Amount,
        wallet_type: WalletType,
        payment_method: Option<PaymentMethod>,
    },
    /// Pay out from the MGR wallet to a phone number or account
    Withdraw {
        chama_id: ChamaId,
        amount: Amount,
        payment_method: PaymentMethod,
        phone_number: String,
    },
    /// Transfer from the MGR wallet to another chama member
    Send {
        chama_id: ChamaId,
        amount: Amount,
        recipient: MemberId,
    },
    /// Release locked MGR funds
    Unlock { chama_id: ChamaId },
}

impl WalletOperation {
    pub fn chama_id(&self) -> ChamaId {
        match self {
            WalletOperation::TopUp { chama_id, .. }
            | WalletOperation::Withdraw { chama_id, .. }
            | WalletOperation::Send { chama_id, .. }
            | WalletOperation::Unlock { chama_id } => *chama_id,
        }
    }

    pub fn amount(&self) -> Option<Amount> {
        match self {
            WalletOperation::TopUp { amount, .. }
            | WalletOperation::Withdraw { amount, .. }
            | WalletOperation::Send { amount, .. } => Some(*amount),
            WalletOperation::Unlock { .. } => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            WalletOperation::TopUp { .. } => "topup",
            WalletOperation::Withdraw { .. } => "withdraw",
            WalletOperation::Send { .. } => "send",
            WalletOperation::Unlock { .. } => "unlock",
        }
    }

    /// Body for the wallet operations function
    pub fn to_request(&self) -> WalletOpRequest {
        let mut request = WalletOpRequest {
            operation: self.name(),
            chama_id: self.chama_id(),
            amount: self.amount().map(|a| a.value()),
            wallet_type: None,
            recipient: None,
            payment_method: None,
        };

        match self {
            WalletOperation::TopUp {
                wallet_type,
                payment_method,
                ..
            } => {
                request.wallet_type = Some(*wallet_type);
                request.payment_method = *payment_method;
            }
            WalletOperation::Withdraw {
                payment_method,
                phone_number,
                ..
            } => {
                request.payment_method = Some(*payment_method);
                request.recipient = Some(phone_number.trim().to_string());
            }
            WalletOperation::Send { recipient, .. } => {
                request.recipient = Some(recipient.to_string());
            }
            WalletOperation::Unlock { .. } => {}
        }

        request
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOpRequest {
    pub operation: &'static str,
    pub chama_id: ChamaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Reply from the wallet operations function
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WalletOpResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Contribution to a chama's savings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRequest {
    pub chama_id: ChamaId,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ContributionRequest {
    pub fn new(chama_id: ChamaId, amount: Amount, payment_method: PaymentMethod) -> Self {
        Self {
            chama_id,
            amount,
            payment_method,
            payment_reference: None,
            notes: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = Some(reference.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContributionResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Outcome of a completed operation
#[derive(Debug, Clone, PartialEq)]
pub struct WalletReceipt {
    pub message: String,
    /// Cached views to reload
    pub refresh: Vec<String>,
}
