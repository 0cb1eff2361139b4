// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::{cli, commands::transactions};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE categories(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            type TEXT NOT NULL
        );
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            type TEXT NOT NULL,
            payment_method TEXT NOT NULL DEFAULT 'debit',
            status TEXT NOT NULL DEFAULT 'paid',
            category_id INTEGER
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(name, type) VALUES ('Lazer', 'expense')",
        [],
    )
    .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(date, description, amount, type, payment_method, category_id)
             VALUES (?1, 'P', '10', 'expense', 'debit', 1)",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn
}

/// The `tx`-level matches, the shape `transactions::handle` receives.
fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("tx", m)) => m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

fn leaf(m: &clap::ArgMatches) -> clap::ArgMatches {
    m.subcommand().unwrap().1.clone()
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let m = tx_matches(&["fincontrol", "tx", "list", "--limit", "2"]);
    let rows = transactions::query_rows(&conn, &leaf(&m)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
}

#[test]
fn list_filters_by_type_and_method() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, payment_method)
         VALUES ('2025-01-10', 'Salary', '2000', 'income', 'debit')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, payment_method)
         VALUES ('2025-01-11', 'Dinner', '90', 'expense', 'credit')",
        [],
    )
    .unwrap();

    let m = tx_matches(&["fincontrol", "tx", "list", "--type", "income"]);
    let rows = transactions::query_rows(&conn, &leaf(&m)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Salary");

    let m = tx_matches(&["fincontrol", "tx", "list", "--method", "credit"]);
    let rows = transactions::query_rows(&conn, &leaf(&m)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Dinner");

    let m = tx_matches(&[
        "fincontrol", "tx", "list", "--type", "expense", "--method", "debit",
    ]);
    let rows = transactions::query_rows(&conn, &leaf(&m)).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn list_filters_by_month_and_rejects_bad_months() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date, description, amount, type, payment_method)
         VALUES ('2025-02-14', 'Flowers', '30', 'expense', 'debit')",
        [],
    )
    .unwrap();

    let m = tx_matches(&["fincontrol", "tx", "list", "--month", "2025-02"]);
    let rows = transactions::query_rows(&conn, &leaf(&m)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Flowers");

    let m = tx_matches(&["fincontrol", "tx", "list", "--month", "2025-99"]);
    assert!(transactions::query_rows(&conn, &leaf(&m)).is_err());
}

#[test]
fn list_rejects_unknown_type_filter() {
    let conn = setup();
    let m = tx_matches(&["fincontrol", "tx", "list", "--type", "transfer"]);
    assert!(transactions::query_rows(&conn, &leaf(&m)).is_err());
}

#[test]
fn add_records_category_and_status() {
    let conn = setup();
    let m = tx_matches(&[
        "fincontrol", "tx", "add",
        "--date", "2025-02-01",
        "--description", "Cinema",
        "--amount", "45.50",
        "--type", "expense",
        "--method", "credit",
        "--category", "Lazer",
        "--pending",
    ]);
    transactions::handle(&conn, &m).unwrap();

    let (amount, method, status, cat): (String, String, String, Option<i64>) = conn
        .query_row(
            "SELECT amount, payment_method, status, category_id FROM transactions
             WHERE description='Cinema'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(amount, "45.50");
    assert_eq!(method, "credit");
    assert_eq!(status, "pending");
    assert_eq!(cat, Some(1));
}

#[test]
fn add_rejects_negative_amounts() {
    let conn = setup();
    let m = tx_matches(&[
        "fincontrol", "tx", "add",
        "--date", "2025-02-01",
        "--description", "Bad",
        "--amount", "-45.50",
        "--type", "expense",
    ]);
    assert!(transactions::handle(&conn, &m).is_err());
}

#[test]
fn edit_updates_and_clears_category() {
    let conn = setup();
    let m = tx_matches(&[
        "fincontrol", "tx", "edit", "--id", "1", "--amount", "99", "--category", "-",
    ]);
    transactions::handle(&conn, &m).unwrap();

    let (amount, cat): (String, Option<i64>) = conn
        .query_row(
            "SELECT amount, category_id FROM transactions WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(amount, "99");
    assert_eq!(cat, None);
}

#[test]
fn rm_missing_transaction_errors() {
    let conn = setup();
    let m = tx_matches(&["fincontrol", "tx", "rm", "--id", "99"]);
    assert!(transactions::handle(&conn, &m).is_err());
}
