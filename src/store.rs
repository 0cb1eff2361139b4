// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side loaders that turn stored rows into domain records. Keeping the
//! SQL here leaves the dashboard math free of any database dependency.

use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::{Investment, Transaction};
use crate::utils::parse_date;

/// All transactions, newest first, each joined to its category name when the
/// reference resolves.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.id, t.date, t.description, t.amount, t.type, t.payment_method, t.status,
                t.category_id, c.name
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date DESC, t.id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<i64>>(7)?,
            r.get::<_, Option<String>>(8)?,
        ))
    })?;

    let mut data = Vec::new();
    for row in rows {
        let (id, date_s, description, amount_s, kind_s, method_s, status_s, category_id, category) =
            row?;
        let date = parse_date(&date_s)
            .with_context(|| format!("Invalid date '{}' on transaction {}", date_s, id))?;
        let amount = Decimal::from_str_exact(&amount_s)
            .with_context(|| format!("Invalid amount '{}' on transaction {}", amount_s, id))?;
        let kind = kind_s
            .parse()
            .with_context(|| format!("Transaction {}", id))?;
        let payment_method = method_s
            .parse()
            .with_context(|| format!("Transaction {}", id))?;
        let status = status_s
            .parse()
            .with_context(|| format!("Transaction {}", id))?;
        data.push(Transaction {
            id,
            date,
            description,
            amount,
            kind,
            payment_method,
            status,
            category_id,
            category,
        });
    }
    Ok(data)
}

pub fn load_investments(conn: &Connection) -> Result<Vec<Investment>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, symbol, type, quantity, average_price, current_price
         FROM investments ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    let mut data = Vec::new();
    for row in rows {
        let (id, name, symbol, kind_s, qty_s, avg_s, cur_s) = row?;
        let kind = kind_s
            .parse()
            .with_context(|| format!("Investment '{}'", name))?;
        let quantity = Decimal::from_str_exact(&qty_s)
            .with_context(|| format!("Invalid quantity '{}' for investment '{}'", qty_s, name))?;
        let average_price = Decimal::from_str_exact(&avg_s)
            .with_context(|| format!("Invalid average price '{}' for investment '{}'", avg_s, name))?;
        let current_price = match cur_s {
            Some(s) => Some(Decimal::from_str_exact(&s).with_context(|| {
                format!("Invalid current price '{}' for investment '{}'", s, name)
            })?),
            None => None,
        };
        data.push(Investment {
            id,
            name,
            symbol,
            kind,
            quantity,
            average_price,
            current_price,
        });
    }
    Ok(data)
}
