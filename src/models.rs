// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownEntryKind(String),
    #[error("Unknown payment method '{0}' (use debit|credit)")]
    UnknownPaymentMethod(String),
    #[error("Unknown transaction status '{0}' (use paid|pending)")]
    UnknownTxStatus(String),
    #[error("Unknown investment type '{0}' (use stock|fixed_income|real_estate_fund|crypto|other)")]
    UnknownInvestmentKind(String),
    #[error("Unknown period '{0}' (use current_month|last_month|last_3_months|all)")]
    UnknownPeriod(String),
    #[error("Closing day {0} out of range (1-31)")]
    ClosingDayOutOfRange(u32),
    #[error("Billing day {0} out of range (1-31)")]
    BillingDayOutOfRange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl FromStr for EntryKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(DomainError::UnknownEntryKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Debit,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(PaymentMethod::Debit),
            "credit" => Ok(PaymentMethod::Credit),
            other => Err(DomainError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Paid,
    Pending,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Paid => "paid",
            TxStatus::Pending => "pending",
        }
    }
}

impl FromStr for TxStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(TxStatus::Paid),
            "pending" => Ok(TxStatus::Pending),
            other => Err(DomainError::UnknownTxStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Stock,
    FixedIncome,
    RealEstateFund,
    Crypto,
    Other,
}

impl InvestmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentKind::Stock => "stock",
            InvestmentKind::FixedIncome => "fixed_income",
            InvestmentKind::RealEstateFund => "real_estate_fund",
            InvestmentKind::Crypto => "crypto",
            InvestmentKind::Other => "other",
        }
    }
}

impl FromStr for InvestmentKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(InvestmentKind::Stock),
            "fixed_income" => Ok(InvestmentKind::FixedIncome),
            "real_estate_fund" => Ok(InvestmentKind::RealEstateFund),
            "crypto" => Ok(InvestmentKind::Crypto),
            "other" => Ok(InvestmentKind::Other),
            other => Err(DomainError::UnknownInvestmentKind(other.to_string())),
        }
    }
}

impl fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub payment_method: PaymentMethod,
    pub status: TxStatus,
    pub category_id: Option<i64>,
    /// Category name when loaded with the categories join.
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub billing_day: u32,
    pub active: bool,
    pub category_id: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    /// Progress toward the target, as a whole percent capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        let pct = (self.current_amount / self.target_amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        pct.min(Decimal::ONE_HUNDRED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub name: String,
    pub symbol: Option<String>,
    pub kind: InvestmentKind,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Option<Decimal>,
}

impl Investment {
    /// Last known price, falling back to the average purchase price when no
    /// quote has been recorded yet.
    pub fn market_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.average_price)
    }

    pub fn market_value(&self) -> Decimal {
        self.quantity * self.market_price()
    }
}

pub fn validate_closing_day(day: u32) -> Result<u32, DomainError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(DomainError::ClosingDayOutOfRange(day))
    }
}

pub fn validate_billing_day(day: u32) -> Result<u32, DomainError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(DomainError::BillingDayOutOfRange(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_round_trips() {
        for s in ["income", "expense"] {
            assert_eq!(EntryKind::from_str(s).unwrap().as_str(), s);
        }
        assert!(EntryKind::from_str("transfer").is_err());
    }

    #[test]
    fn investment_kind_rejects_unknown() {
        assert!(InvestmentKind::from_str("bond").is_err());
        assert_eq!(
            InvestmentKind::from_str("real_estate_fund").unwrap(),
            InvestmentKind::RealEstateFund
        );
    }

    #[test]
    fn goal_progress_caps_at_100() {
        let goal = Goal {
            id: 1,
            name: "Emergency fund".into(),
            target_amount: Decimal::from_str("1000").unwrap(),
            current_amount: Decimal::from_str("2500").unwrap(),
            deadline: None,
        };
        assert_eq!(goal.progress_percent(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn goal_progress_rounds_to_whole_percent() {
        let goal = Goal {
            id: 1,
            name: "Trip".into(),
            target_amount: Decimal::from_str("300").unwrap(),
            current_amount: Decimal::from_str("100").unwrap(),
            deadline: None,
        };
        assert_eq!(goal.progress_percent(), Decimal::from_str("33").unwrap());
    }

    #[test]
    fn goal_progress_zero_target_is_zero() {
        let goal = Goal {
            id: 1,
            name: "Empty".into(),
            target_amount: Decimal::ZERO,
            current_amount: Decimal::from_str("10").unwrap(),
            deadline: None,
        };
        assert_eq!(goal.progress_percent(), Decimal::ZERO);
    }

    #[test]
    fn market_price_falls_back_to_average() {
        let mut inv = Investment {
            id: 1,
            name: "Tesouro Selic".into(),
            symbol: None,
            kind: InvestmentKind::FixedIncome,
            quantity: Decimal::from_str("2").unwrap(),
            average_price: Decimal::from_str("105.50").unwrap(),
            current_price: None,
        };
        assert_eq!(inv.market_price(), Decimal::from_str("105.50").unwrap());
        assert_eq!(inv.market_value(), Decimal::from_str("211.00").unwrap());

        inv.current_price = Some(Decimal::from_str("110").unwrap());
        assert_eq!(inv.market_value(), Decimal::from_str("220").unwrap());
    }

    #[test]
    fn closing_day_bounds() {
        assert!(validate_closing_day(0).is_err());
        assert!(validate_closing_day(32).is_err());
        assert_eq!(validate_closing_day(18).unwrap(), 18);
        assert_eq!(validate_closing_day(31).unwrap(), 31);
    }
}
