//! Domain Value Objects
//!
//! Immutable value types for the chama wallet domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};

/// Which of a member's two chama wallets an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    #[default]
    Savings,
    /// Merry-go-round payout wallet
    Mgr,
}

impl WalletType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            WalletType::Savings => "savings",
            WalletType::Mgr => "mgr",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Mpesa,
    Airtel,
    Bank,
    Card,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "mpesa",
            PaymentMethod::Airtel => "airtel",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpesa" | "m-pesa" => Ok(PaymentMethod::Mpesa),
            "airtel" => Ok(PaymentMethod::Airtel),
            "bank" | "bank_transfer" => Ok(PaymentMethod::Bank),
            "card" => Ok(PaymentMethod::Card),
            other => Err(WalletError::UnsupportedPaymentMethod(other.to_string())),
        }
    }
}

/// Positive money amount, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> WalletResult<Self> {
        // Scaling to cents can overflow a finite input.
        let rounded = (value * 100.0).round() / 100.0;
        if !rounded.is_finite() || rounded <= 0.0 {
            return Err(WalletError::InvalidAmount(value.to_string()));
        }
        Ok(Self(rounded))
    }

    /// Parse user input such as `"1,500.50"`
    pub fn parse(raw: &str) -> WalletResult<Self> {
        let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
        let value: f64 = cleaned
            .parse()
            .map_err(|_| WalletError::InvalidAmount(raw.trim().to_string()))?;
        Self::new(value)
    }

    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KES {:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
