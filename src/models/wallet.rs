//! Wallet model
//!
//! A wallet is a named value container (cash, card, foreign cash) with a
//! currency and a maintained balance. The balance is a cache of ledger
//! effects; it is not recomputed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::WalletId;
use super::money::Money;

/// Currency a wallet is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Uzs,
    Usd,
    Eur,
    Rub,
    Gbp,
}

impl Currency {
    /// ISO-4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Uzs => "UZS",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Rub => "RUB",
            Self::Gbp => "GBP",
        }
    }

    /// All supported currencies
    pub fn all() -> &'static [Self] {
        &[Self::Uzs, Self::Usd, Self::Eur, Self::Rub, Self::Gbp]
    }

    /// Parse a currency code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Uzs
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    /// Physical cash in the base currency
    #[default]
    Cash,
    /// Bank card
    Card,
    /// Cash held in a foreign currency
    ForeignCash,
}

impl WalletKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "foreign-cash" | "foreign_cash" | "foreign" => Some(Self::ForeignCash),
            _ => None,
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
            Self::ForeignCash => write!(f, "Foreign cash"),
        }
    }
}

/// A wallet holding money in a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique identifier
    pub id: WalletId,

    /// Wallet name (e.g., "Cash", "Visa Card")
    pub name: String,

    /// Currency of the balance
    pub currency: Currency,

    /// Current balance; the signed sum of ledger effects plus any
    /// explicitly set opening amount
    pub balance: Money,

    /// Kind of wallet
    #[serde(default)]
    pub kind: WalletKind,

    /// When the wallet was created
    pub created_at: DateTime<Utc>,

    /// When the wallet was last modified
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with a zero balance
    pub fn new(name: impl Into<String>, kind: WalletKind, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: WalletId::new(),
            name: name.into(),
            currency,
            balance: Money::zero(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new wallet with an opening balance
    pub fn with_balance(
        name: impl Into<String>,
        kind: WalletKind,
        currency: Currency,
        balance: Money,
    ) -> Self {
        let mut wallet = Self::new(name, kind, currency);
        wallet.balance = balance;
        wallet
    }

    /// Balance after a signed delta, or `None` if it would overflow
    pub fn balance_after(&self, delta: Money) -> Option<Money> {
        self.balance.checked_add(delta)
    }

    /// Overwrite the balance with an already computed value
    pub fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }

    /// Validate the wallet
    pub fn validate(&self) -> Result<(), WalletValidationError> {
        if self.name.trim().is_empty() {
            return Err(WalletValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(WalletValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind, self.currency)
    }
}

/// Validation errors for wallets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for WalletValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Wallet name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Wallet name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for WalletValidationError {}
