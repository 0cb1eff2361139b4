// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation: pure functions over already-loaded records.
//!
//! Everything here is a function of (transactions, investments, closing day,
//! period, reference date); loading rows and reading the clock belong to the
//! caller, so results are reproducible for any input set.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, hash_map::Entry};
use std::fmt;
use std::str::FromStr;

use crate::models::{DomainError, EntryKind, Investment, PaymentMethod, Transaction};

/// Pie-slice colors, assigned to categories by first appearance and cycled.
pub const CATEGORY_PALETTE: [&str; 6] = [
    "#ef4444", "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899",
];

/// Label for expenses whose category reference does not resolve, kept in
/// pt-BR like the seeded category names.
pub const UNCATEGORIZED: &str = "Sem Categoria";

/// How many trailing calendar months the cash-flow series covers.
const TRAILING_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    CurrentMonth,
    LastMonth,
    #[serde(rename = "last_3_months")]
    Last3Months,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::CurrentMonth => "current_month",
            Period::LastMonth => "last_month",
            Period::Last3Months => "last_3_months",
            Period::All => "all",
        }
    }
}

impl FromStr for Period {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current_month" => Ok(Period::CurrentMonth),
            "last_month" => Ok(Period::LastMonth),
            "last_3_months" => Ok(Period::Last3Months),
            "all" => Ok(Period::All),
            other => Err(DomainError::UnknownPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed calendar-day range, both endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub total: Decimal,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    /// YYYY-MM
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub credit_invoice: Decimal,
    pub invoice_cycle: Option<String>,
    pub total_invested: Decimal,
    pub total_patrimony: Decimal,
    pub categories: Vec<CategorySlice>,
    pub monthly_flows: Vec<MonthFlow>,
}

fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month in 1..=12")
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = next_month(year, month);
    month_start(ny, nm).pred_opt().expect("date above NaiveDate::MIN")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let mut y = year;
    let mut m = month;
    for _ in 0..back {
        (y, m) = prev_month(y, m);
    }
    (y, m)
}

/// Day-of-month pinned to `year`/`month`, clamped to the month's last day so
/// a day-31 setting stays meaningful in shorter months.
fn clamp_day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| month_end(year, month))
}

/// Calendar window for a reporting period, `None` meaning unbounded.
pub fn period_window(period: Period, today: NaiveDate) -> Option<DateWindow> {
    let (y, m) = (today.year(), today.month());
    match period {
        Period::CurrentMonth => Some(DateWindow {
            start: month_start(y, m),
            end: month_end(y, m),
        }),
        Period::LastMonth => {
            let (py, pm) = prev_month(y, m);
            Some(DateWindow {
                start: month_start(py, pm),
                end: month_end(py, pm),
            })
        }
        Period::Last3Months => {
            let (sy, sm) = months_back(y, m, 2);
            Some(DateWindow {
                start: month_start(sy, sm),
                end: month_end(y, m),
            })
        }
        Period::All => None,
    }
}

/// Credit-card statement window for the period's reference month: the day
/// after the previous closing through the closing day itself, inclusive.
///
/// Only `current_month` and `last_month` have a reference month; the other
/// periods apply no cycle restriction at all (the original product behaves
/// this way, asymmetry and all).
pub fn billing_cycle(period: Period, today: NaiveDate, closing_day: u32) -> Option<DateWindow> {
    let (ry, rm) = match period {
        Period::CurrentMonth => (today.year(), today.month()),
        Period::LastMonth => prev_month(today.year(), today.month()),
        Period::Last3Months | Period::All => return None,
    };
    let end = clamp_day(ry, rm, closing_day);
    let (py, pm) = prev_month(ry, rm);
    let start = clamp_day(py, pm, closing_day)
        .succ_opt()
        .expect("date below NaiveDate::MAX");
    Some(DateWindow { start, end })
}

/// "DD Mon - DD Mon" rendering of a billing cycle.
pub fn cycle_label(window: &DateWindow) -> String {
    format!(
        "{} - {}",
        window.start.format("%d %b"),
        window.end.format("%d %b")
    )
}

fn category_breakdown(
    transactions: &[Transaction],
    window: Option<DateWindow>,
) -> Vec<CategorySlice> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for tx in transactions {
        if tx.kind != EntryKind::Expense {
            continue;
        }
        if let Some(w) = window {
            if !w.contains(tx.date) {
                continue;
            }
        }
        let name = tx
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        match totals.entry(name.clone()) {
            Entry::Occupied(mut e) => *e.get_mut() += tx.amount,
            Entry::Vacant(e) => {
                e.insert(tx.amount);
                order.push(name);
            }
        }
    }
    order
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let total = totals[&name];
            CategorySlice {
                name,
                total,
                color: CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
            }
        })
        .collect()
}

fn trailing_flows(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthFlow> {
    (0..TRAILING_MONTHS)
        .rev()
        .map(|back| {
            let (y, m) = months_back(today.year(), today.month(), back);
            let w = DateWindow {
                start: month_start(y, m),
                end: month_end(y, m),
            };
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for tx in transactions.iter().filter(|t| w.contains(t.date)) {
                match tx.kind {
                    EntryKind::Income => income += tx.amount,
                    EntryKind::Expense => expense += tx.amount,
                }
            }
            MonthFlow {
                month: format!("{:04}-{:02}", y, m),
                income,
                expense,
            }
        })
        .collect()
}

/// Computes every dashboard figure for the selected period.
///
/// Inputs are read-only; two calls with identical inputs produce identical
/// summaries, including category color order.
pub fn aggregate(
    transactions: &[Transaction],
    investments: &[Investment],
    closing_day: u32,
    period: Period,
    today: NaiveDate,
) -> DashboardSummary {
    let window = period_window(period, today);
    let cycle = billing_cycle(period, today, closing_day);

    let mut balance = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut credit_invoice = Decimal::ZERO;

    for tx in transactions {
        // Cash balance is cumulative over the whole history; credit
        // purchases do not move cash until the invoice is paid.
        match (tx.kind, tx.payment_method) {
            (EntryKind::Income, _) => balance += tx.amount,
            (EntryKind::Expense, PaymentMethod::Debit) => balance -= tx.amount,
            (EntryKind::Expense, PaymentMethod::Credit) => {}
        }

        if window.is_none_or(|w| w.contains(tx.date)) {
            match tx.kind {
                EntryKind::Income => income += tx.amount,
                EntryKind::Expense => expense += tx.amount,
            }
        }

        if tx.kind == EntryKind::Expense
            && tx.payment_method == PaymentMethod::Credit
            && cycle.is_none_or(|c| c.contains(tx.date))
        {
            credit_invoice += tx.amount;
        }
    }

    let categories = category_breakdown(transactions, window);
    let monthly_flows = trailing_flows(transactions, today);

    let total_invested: Decimal = investments.iter().map(Investment::market_value).sum();
    let total_patrimony = balance + total_invested;

    DashboardSummary {
        balance,
        income,
        expense,
        credit_invoice,
        invoice_cycle: cycle.map(|c| cycle_label(&c)),
        total_invested,
        total_patrimony,
        categories,
        monthly_flows,
    }
}
