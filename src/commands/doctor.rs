// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EntryKind, InvestmentKind, PaymentMethod, TxStatus, validate_closing_day};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at categories that no longer exist
    let mut stmt = conn.prepare(
        "SELECT t.id, t.category_id FROM transactions t
         WHERE t.category_id IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.id=t.category_id)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push(vec![
            "tx_dangling_category".into(),
            format!("transaction {} -> category {}", id, cat),
        ]);
    }

    // 2) Subscriptions with the same problem
    let mut stmt2 = conn.prepare(
        "SELECT s.id, s.category_id FROM subscriptions s
         WHERE s.category_id IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.id=s.category_id)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push(vec![
            "sub_dangling_category".into(),
            format!("subscription {} -> category {}", id, cat),
        ]);
    }

    // 3) Enum columns that do not parse (possible with hand-edited rows)
    let mut stmt3 =
        conn.prepare("SELECT id, type, payment_method, status FROM transactions ORDER BY id")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let kind: String = r.get(1)?;
        let method: String = r.get(2)?;
        let status: String = r.get(3)?;
        if kind.parse::<EntryKind>().is_err() {
            rows.push(vec![
                "tx_unknown_type".into(),
                format!("transaction {}: '{}'", id, kind),
            ]);
        }
        if method.parse::<PaymentMethod>().is_err() {
            rows.push(vec![
                "tx_unknown_method".into(),
                format!("transaction {}: '{}'", id, method),
            ]);
        }
        if status.parse::<TxStatus>().is_err() {
            rows.push(vec![
                "tx_unknown_status".into(),
                format!("transaction {}: '{}'", id, status),
            ]);
        }
    }

    let mut stmt4 = conn.prepare("SELECT id, type FROM investments ORDER BY id")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let kind: String = r.get(1)?;
        if kind.parse::<InvestmentKind>().is_err() {
            rows.push(vec![
                "investment_unknown_type".into(),
                format!("investment {}: '{}'", id, kind),
            ]);
        }
    }

    // 4) Billing days outside the calendar
    let mut stmt5 =
        conn.prepare("SELECT id, billing_day FROM subscriptions WHERE billing_day NOT BETWEEN 1 AND 31")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        let day: i64 = r.get(1)?;
        rows.push(vec![
            "sub_billing_day_out_of_range".into(),
            format!("subscription {}: day {}", id, day),
        ]);
    }

    // 5) Stored closing day must survive the settings boundary check
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='card_closing_day'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(s) = stored {
        match s.parse::<u32>() {
            Ok(day) if validate_closing_day(day).is_ok() => {}
            _ => rows.push(vec!["bad_closing_day".into(), format!("'{}'", s)]),
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
