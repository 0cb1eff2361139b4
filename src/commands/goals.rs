// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Goal;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    if target.is_sign_negative() || target.is_zero() {
        return Err(anyhow!("Target amount must be positive"));
    }
    let deadline = match sub.get_one::<String>("deadline") {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO goals(name, target_amount, deadline) VALUES (?1, ?2, ?3)",
        params![name, target.to_string(), deadline.map(|d| d.to_string())],
    )?;
    println!("Added goal '{}' targeting {}", name, target);
    Ok(())
}

pub fn query_rows(conn: &Connection) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target_amount, current_amount, deadline
         FROM goals ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, name, target_s, current_s, deadline_s) = row?;
        let target_amount = Decimal::from_str_exact(&target_s)
            .with_context(|| format!("Invalid target '{}' on goal '{}'", target_s, name))?;
        let current_amount = Decimal::from_str_exact(&current_s)
            .with_context(|| format!("Invalid amount '{}' on goal '{}'", current_s, name))?;
        let deadline = match deadline_s {
            Some(d) => Some(parse_date(&d).with_context(|| format!("Goal '{}'", name))?),
            None => None,
        };
        data.push(Goal {
            id,
            name,
            target_amount,
            current_amount,
            deadline,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.id.to_string(),
                    g.name.clone(),
                    format!("{:.2}", g.current_amount),
                    format!("{:.2}", g.target_amount),
                    format!("{}%", g.progress_percent()),
                    g.deadline
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Saved", "Target", "Progress", "Deadline"],
                rows,
            )
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount.is_sign_negative() {
        return Err(anyhow!("Saved amount cannot be negative"));
    }
    let updated = conn.execute(
        "UPDATE goals SET current_amount=?1 WHERE id=?2",
        params![amount.to_string(), id],
    )?;
    if updated == 0 {
        return Err(anyhow!("Goal {} not found", id));
    }
    println!("Goal {} now at {}", id, amount);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = conn.execute("DELETE FROM goals WHERE id=?1", params![id])?;
    if removed == 0 {
        return Err(anyhow!("Goal {} not found", id));
    }
    println!("Removed goal {}", id);
    Ok(())
}
