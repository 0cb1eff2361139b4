// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::{DashboardSummary, Period, aggregate};
use crate::store::{load_investments, load_transactions};
use crate::utils::{fmt_money, get_card_closing_day, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let period: Period = m.get_one::<String>("period").unwrap().parse()?;

    // Both collections load before anything is aggregated; a failed load
    // surfaces here and leaves no partial output behind.
    let transactions = load_transactions(conn)?;
    let investments = load_investments(conn)?;
    let closing_day = get_card_closing_day(conn)?;
    let today = Utc::now().date_naive();

    let summary = aggregate(&transactions, &investments, closing_day, period, today);

    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        render(&summary, period);
    }
    Ok(())
}

fn render(s: &DashboardSummary, period: Period) {
    let invoice = match &s.invoice_cycle {
        Some(cycle) => format!("{} ({})", fmt_money(&s.credit_invoice), cycle),
        None => fmt_money(&s.credit_invoice),
    };
    let rows = vec![
        vec!["Balance".to_string(), fmt_money(&s.balance)],
        vec![format!("Income ({})", period), fmt_money(&s.income)],
        vec![format!("Expense ({})", period), fmt_money(&s.expense)],
        vec!["Credit invoice".to_string(), invoice],
        vec!["Total invested".to_string(), fmt_money(&s.total_invested)],
        vec!["Total patrimony".to_string(), fmt_money(&s.total_patrimony)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !s.categories.is_empty() {
        let rows: Vec<Vec<String>> = s
            .categories
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    format!("{:.2}", c.total),
                    c.color.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Color"], rows));
    }

    let rows: Vec<Vec<String>> = s
        .monthly_flows
        .iter()
        .map(|m| {
            vec![
                m.month.clone(),
                format!("{:.2}", m.income),
                format!("{:.2}", m.expense),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
}
