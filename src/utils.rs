// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::validate_closing_day;

const UA: &str = concat!(
    "fincontrol/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/fincontrol)"
);

pub const DEFAULT_CLOSING_DAY: u32 = 18;

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amounts are tracked in a single currency (BRL, the original product's).
pub fn fmt_money(d: &Decimal) -> String {
    format!("R$ {}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

// Credit-card closing day setting. Absent means the documented default;
// values outside 1-31 are rejected before they are stored, so the getter
// treats an out-of-range stored value as corruption.
pub fn get_card_closing_day(conn: &Connection) -> Result<u32> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='card_closing_day'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        None => Ok(DEFAULT_CLOSING_DAY),
        Some(s) => {
            let day: u32 = s
                .parse()
                .with_context(|| format!("Invalid stored closing day '{}'", s))?;
            validate_closing_day(day).map_err(anyhow::Error::from)
        }
    }
}

pub fn set_card_closing_day(conn: &Connection, day: u32) -> Result<()> {
    validate_closing_day(day)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('card_closing_day', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![day.to_string()],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);")
            .unwrap();
        conn
    }

    #[test]
    fn closing_day_defaults_when_absent() {
        let conn = setup();
        assert_eq!(get_card_closing_day(&conn).unwrap(), DEFAULT_CLOSING_DAY);
    }

    #[test]
    fn closing_day_round_trips() {
        let conn = setup();
        set_card_closing_day(&conn, 5).unwrap();
        assert_eq!(get_card_closing_day(&conn).unwrap(), 5);
        set_card_closing_day(&conn, 25).unwrap();
        assert_eq!(get_card_closing_day(&conn).unwrap(), 25);
    }

    #[test]
    fn closing_day_rejected_at_the_edit_boundary() {
        let conn = setup();
        assert!(set_card_closing_day(&conn, 0).is_err());
        assert!(set_card_closing_day(&conn, 32).is_err());
        // Nothing was stored by the failed writes
        assert_eq!(get_card_closing_day(&conn).unwrap(), DEFAULT_CLOSING_DAY);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2024-13-40").is_err());
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }
}
