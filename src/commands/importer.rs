// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EntryKind, PaymentMethod, TxStatus};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

// Columns: date, description, amount, type, method, category, status.
// category and status may be empty; status defaults to paid.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();
        let kind_raw = rec.get(3).context("type missing")?.trim().to_string();
        let method_raw = rec.get(4).unwrap_or("debit").trim().to_string();
        let category = rec.get(5).unwrap_or("").trim().to_string();
        let status_raw = rec.get(6).unwrap_or("").trim().to_string();

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;
        if amount.is_sign_negative() || amount.is_zero() {
            return Err(anyhow!(
                "Amount '{}' for {} must be positive; direction comes from the type column",
                amount_raw,
                description
            ));
        }
        let kind: EntryKind = kind_raw
            .parse()
            .with_context(|| format!("Row for {}", description))?;
        let method: PaymentMethod = if method_raw.is_empty() {
            PaymentMethod::Debit
        } else {
            method_raw
                .parse()
                .with_context(|| format!("Row for {}", description))?
        };
        let status: TxStatus = if status_raw.is_empty() {
            TxStatus::Paid
        } else {
            status_raw
                .parse()
                .with_context(|| format!("Row for {}", description))?
        };

        let cat_id = if category.is_empty() {
            None
        } else {
            let cat_id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched: i64 = tx
                        .query_row(
                            "SELECT id FROM categories WHERE name=?1",
                            params![&category],
                            |r| r.get(0),
                        )
                        .with_context(|| format!("Category '{}' not found", category))?;
                    *entry.insert(fetched)
                }
            };
            Some(cat_id)
        };

        tx.execute(
            "INSERT INTO transactions(date, description, amount, type, payment_method, status, category_id) \
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                date.to_string(),
                description,
                amount.to_string(),
                kind.as_str(),
                method.as_str(),
                status.as_str(),
                cat_id
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", imported, path);
    Ok(())
}
