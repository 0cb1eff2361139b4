// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::validate_billing_day;
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("toggle", sub)) => toggle(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let day = validate_billing_day(*sub.get_one::<u32>("day").unwrap())?;
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, cat)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO subscriptions(name, amount, billing_day, category_id) VALUES (?1, ?2, ?3, ?4)",
        params![name, amount.to_string(), day, category_id],
    )?;
    println!("Added subscription '{}' ({} on day {})", name, amount, day);
    Ok(())
}

#[derive(Serialize)]
pub struct SubscriptionRow {
    pub id: i64,
    pub name: String,
    pub amount: String,
    pub billing_day: u32,
    pub active: bool,
    pub category: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<SubscriptionRow>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.amount, s.billing_day, s.active, c.name
         FROM subscriptions s LEFT JOIN categories c ON s.category_id=c.id
         ORDER BY s.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(SubscriptionRow {
            id: r.get(0)?,
            name: r.get(1)?,
            amount: r.get(2)?,
            billing_day: r.get(3)?,
            active: r.get::<_, i64>(4)? != 0,
            category: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

/// Sum of active subscription amounts, the recurring monthly cost.
pub fn active_monthly_total(rows: &[SubscriptionRow]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for r in rows.iter().filter(|r| r.active) {
        total += parse_decimal(&r.amount)?;
    }
    Ok(total)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.amount.clone(),
                    format!("day {}", r.billing_day),
                    if r.active { "active" } else { "paused" }.to_string(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Amount", "Billing", "Status", "Category"],
                rows,
            )
        );
        let total = active_monthly_total(&data)?;
        println!("Active monthly total: {}", fmt_money(&total));
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(name) = sub.get_one::<String>("name") {
        sets.push("name=?".into());
        values.push(name.clone());
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        sets.push("amount=?".into());
        values.push(parse_decimal(amount)?.to_string());
    }
    if let Some(day) = sub.get_one::<u32>("day") {
        sets.push("billing_day=?".into());
        values.push(validate_billing_day(*day)?.to_string());
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
        return Err(anyhow!("Nothing to update for subscription {}", id));
    }

    let sql = format!("UPDATE subscriptions SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = values
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let updated = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if updated == 0 {
        return Err(anyhow!("Subscription {} not found", id));
    }
    println!("Updated subscription {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = conn.execute("DELETE FROM subscriptions WHERE id=?1", params![id])?;
    if removed == 0 {
        return Err(anyhow!("Subscription {} not found", id));
    }
    println!("Removed subscription {}", id);
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let updated = conn.execute(
        "UPDATE subscriptions SET active = 1 - active WHERE id=?1",
        params![id],
    )?;
    if updated == 0 {
        return Err(anyhow!("Subscription {} not found", id));
    }
    let active: i64 = conn.query_row(
        "SELECT active FROM subscriptions WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    println!(
        "Subscription {} is now {}",
        id,
        if active != 0 { "active" } else { "paused" }
    );
    Ok(())
}
