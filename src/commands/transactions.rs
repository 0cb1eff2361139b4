// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EntryKind, PaymentMethod, TxStatus};
use crate::utils::{
    id_for_category, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(anyhow!("Amount must be positive; direction comes from --type"));
    }
    let kind: EntryKind = sub.get_one::<String>("type").unwrap().parse()?;
    let method: PaymentMethod = sub.get_one::<String>("method").unwrap().parse()?;
    let status = if sub.get_flag("pending") {
        TxStatus::Pending
    } else {
        TxStatus::Paid
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, cat)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, payment_method, status, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            date.to_string(),
            description,
            amount.to_string(),
            kind.as_str(),
            method.as_str(),
            status.as_str(),
            category_id
        ],
    )?;
    println!(
        "Recorded {} {} ({}) on {}: '{}'",
        kind, amount, method, date, description
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.kind.clone(),
                    r.method.clone(),
                    r.status.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Amount", "Type", "Method", "Status", "Category"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub method: String,
    pub status: String,
    pub category: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.description, t.amount, t.type, t.payment_method, t.status, c.name
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month);
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        kind.parse::<EntryKind>()?;
        sql.push_str(" AND t.type=?");
        params_vec.push(kind.into());
    }
    if let Some(method) = sub.get_one::<String>("method") {
        method.parse::<PaymentMethod>()?;
        sql.push_str(" AND t.payment_method=?");
        params_vec.push(method.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let description: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let method: String = r.get(5)?;
        let status: String = r.get(6)?;
        let category: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            id,
            date,
            description,
            amount,
            kind,
            method,
            status,
            category: category.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(date) = sub.get_one::<String>("date") {
        parse_date(date)?;
        sets.push("date=?".into());
        values.push(date.clone());
    }
    if let Some(desc) = sub.get_one::<String>("description") {
        sets.push("description=?".into());
        values.push(desc.clone());
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        let amount = parse_decimal(amount)?;
        if amount.is_sign_negative() || amount.is_zero() {
            return Err(anyhow!("Amount must be positive; direction comes from --type"));
        }
        sets.push("amount=?".into());
        values.push(amount.to_string());
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        kind.parse::<EntryKind>()?;
        sets.push("type=?".into());
        values.push(kind.clone());
    }
    if let Some(method) = sub.get_one::<String>("method") {
        method.parse::<PaymentMethod>()?;
        sets.push("payment_method=?".into());
        values.push(method.clone());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        status.parse::<TxStatus>()?;
        sets.push("status=?".into());
        values.push(status.clone());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        if cat == "-" {
            sets.push("category_id=NULL".into());
        } else {
            sets.push("category_id=?".into());
            values.push(id_for_category(conn, cat)?.to_string());
        }
    }

    if sets.is_empty() {
        return Err(anyhow!("Nothing to update for transaction {}", id));
    }

    let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = values
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let updated = conn.execute(&sql, rusqlite::params_from_iter(params))?;

    if updated == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = conn
        .execute("DELETE FROM transactions WHERE id=?1", params![id])
        .with_context(|| format!("Delete transaction {}", id))?;
    if removed == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Removed transaction {}", id);
    Ok(())
}
