// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Investment, InvestmentKind};
use crate::store::load_investments;
use crate::utils::{fmt_money, http_client, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("fetch", _)) => fetch_quotes(conn)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind: InvestmentKind = sub.get_one::<String>("type").unwrap().parse()?;
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?;
    let price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let symbol = sub
        .get_one::<String>("symbol")
        .map(|s| s.trim().to_uppercase());

    conn.execute(
        "INSERT INTO investments(name, symbol, type, quantity, average_price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            symbol,
            kind.as_str(),
            quantity.to_string(),
            price.to_string()
        ],
    )?;
    println!("Added {} holding '{}' ({} @ {})", kind, name, quantity, price);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let holdings = load_investments(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &holdings)? {
        let mut total = Decimal::ZERO;
        let rows: Vec<Vec<String>> = holdings
            .iter()
            .map(|h| {
                total += h.market_value();
                vec![
                    h.id.to_string(),
                    h.name.clone(),
                    h.symbol.clone().unwrap_or_default(),
                    h.kind.to_string(),
                    format!("{:.4}", h.quantity),
                    format!("{:.2}", h.average_price),
                    h.current_price
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_else(|| "-".to_string()),
                    format!("{:.2}", h.market_value()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Symbol", "Type", "Qty", "Avg Price", "Price", "Value"],
                rows,
            )
        );
        println!("Total invested: {}", fmt_money(&total));
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(name) = sub.get_one::<String>("name") {
        sets.push("name=?".into());
        values.push(name.trim().to_string());
    }
    if let Some(symbol) = sub.get_one::<String>("symbol") {
        if symbol == "-" {
            sets.push("symbol=NULL".into());
        } else {
            sets.push("symbol=?".into());
            values.push(symbol.trim().to_uppercase());
        }
    }
    if let Some(qty) = sub.get_one::<String>("quantity") {
        sets.push("quantity=?".into());
        values.push(parse_decimal(qty.trim())?.to_string());
    }
    if let Some(price) = sub.get_one::<String>("price") {
        sets.push("average_price=?".into());
        values.push(parse_decimal(price.trim())?.to_string());
    }
    if let Some(price) = sub.get_one::<String>("current-price") {
        sets.push("current_price=?".into());
        values.push(parse_decimal(price.trim())?.to_string());
    }

    if sets.is_empty() {
        return Err(anyhow!("Nothing to update for investment {}", id));
    }
    sets.push("updated_at=datetime('now')".into());

    let sql = format!("UPDATE investments SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = values
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let updated = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if updated == 0 {
        return Err(anyhow!("Investment {} not found", id));
    }
    println!("Updated investment {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let removed = conn.execute("DELETE FROM investments WHERE id=?1", params![id])?;
    if removed == 0 {
        return Err(anyhow!("Investment {} not found", id));
    }
    println!("Removed investment {}", id);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct BrapiResponse {
    results: Vec<BrapiQuote>,
}

#[derive(Debug, Deserialize)]
struct BrapiQuote {
    symbol: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

/// Quotable holdings: anything with a ticker except fixed income, which has
/// no exchange quote to fetch.
fn quotable(holdings: &[Investment]) -> Vec<(i64, String)> {
    holdings
        .iter()
        .filter(|h| h.kind != InvestmentKind::FixedIncome)
        .filter_map(|h| h.symbol.clone().map(|s| (h.id, s)))
        .collect()
}

fn fetch_quotes(conn: &mut Connection) -> Result<()> {
    let holdings = load_investments(conn)?;
    let assets = quotable(&holdings);
    if assets.is_empty() {
        println!("No symbol-bearing holdings to quote");
        return Ok(());
    }

    let symbols = assets
        .iter()
        .map(|(_, sym)| sym.as_str())
        .collect::<Vec<_>>();
    let mut url = format!("https://brapi.dev/api/quote/{}", symbols.join(","));
    if let Ok(token) = std::env::var("BRAPI_TOKEN") {
        url.push_str(&format!("?token={}", token));
    }
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let br: BrapiResponse = resp.json()?;

    let mut id_by_symbol: HashMap<String, i64> = HashMap::with_capacity(assets.len());
    for (id, sym) in &assets {
        id_by_symbol.insert(sym.to_uppercase(), *id);
    }

    let mut updates = Vec::with_capacity(br.results.len());
    for q in br.results {
        if let (Some(sym), Some(px)) = (q.symbol, q.regular_market_price) {
            if let Some(&id) = id_by_symbol.get(&sym.to_uppercase()) {
                if let Some(px_decimal) = Decimal::from_f64_retain(px) {
                    updates.push((id, px_decimal.to_string()));
                }
            }
        }
    }

    let now = Utc::now().to_rfc3339();
    if updates.is_empty() {
        println!("No quotes updated at {}", now);
        return Ok(());
    }

    let total_updates = updates.len();

    let tx = conn.transaction()?;
    let mut update = tx.prepare_cached(
        "UPDATE investments SET current_price=?1, updated_at=?2 WHERE id=?3",
    )?;
    for (id, price) in updates {
        update.execute(params![price, &now, id])?;
    }
    drop(update);
    tx.commit()?;

    println!("Fetched {} quotes at {}", total_updates, now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(id: i64, kind: InvestmentKind, symbol: Option<&str>) -> Investment {
        Investment {
            id,
            name: format!("h{}", id),
            symbol: symbol.map(|s| s.to_string()),
            kind,
            quantity: Decimal::ONE,
            average_price: Decimal::ONE,
            current_price: None,
        }
    }

    #[test]
    fn quotable_skips_fixed_income_and_symbolless() {
        let holdings = vec![
            holding(1, InvestmentKind::Stock, Some("PETR4")),
            holding(2, InvestmentKind::FixedIncome, Some("CDB123")),
            holding(3, InvestmentKind::Crypto, None),
            holding(4, InvestmentKind::RealEstateFund, Some("HGLG11")),
        ];
        let q = quotable(&holdings);
        assert_eq!(
            q,
            vec![(1, "PETR4".to_string()), (4, "HGLG11".to_string())]
        );
    }
}
