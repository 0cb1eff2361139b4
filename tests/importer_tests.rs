// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::{cli, commands::importer};
use rusqlite::Connection;
use std::io::Write;

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
        "INSERT INTO categories(name, type) VALUES ('Alimentação', 'expense')",
        [],
    )
    .unwrap();
    conn
}

fn import_matches(path: &str) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from([
        "fincontrol", "import", "transactions", "--path", path,
    ]);
    match matches.subcommand() {
        Some(("import", m)) => m.clone(),
        _ => panic!("no import subcommand"),
    }
}

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn imports_rows_with_categories_and_defaults() {
    let mut conn = setup();
    let csv = write_csv(
        "date,description,amount,type,method,category,status\n\
         2025-03-01,Mercado,250.40,expense,debit,Alimentação,\n\
         2025-03-02,Salário,4000,income,debit,,paid\n\
         2025-03-03,Jantar,90,expense,credit,Alimentação,pending\n",
    );
    let m = import_matches(csv.path().to_str().unwrap());
    importer::handle(&mut conn, &m).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);

    let (method, status, cat): (String, String, Option<i64>) = conn
        .query_row(
            "SELECT payment_method, status, category_id FROM transactions WHERE description='Jantar'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(method, "credit");
    assert_eq!(status, "pending");
    assert_eq!(cat, Some(1));

    // empty status defaults to paid
    let status: String = conn
        .query_row(
            "SELECT status FROM transactions WHERE description='Mercado'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "paid");
}

#[test]
fn unknown_category_aborts_the_whole_import() {
    let mut conn = setup();
    let csv = write_csv(
        "date,description,amount,type,method,category,status\n\
         2025-03-01,Ok,10,expense,debit,Alimentação,\n\
         2025-03-02,Bad,10,expense,debit,Inexistente,\n",
    );
    let m = import_matches(csv.path().to_str().unwrap());
    let err = importer::handle(&mut conn, &m).unwrap_err();
    assert!(err.to_string().contains("Category 'Inexistente' not found"));

    // transactional: nothing landed
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn negative_amount_rejected() {
    let mut conn = setup();
    let csv = write_csv(
        "date,description,amount,type,method,category,status\n\
         2025-03-01,Bad,-10,expense,debit,,\n",
    );
    let m = import_matches(csv.path().to_str().unwrap());
    assert!(importer::handle(&mut conn, &m).is_err());
}

#[test]
fn unknown_type_rejected() {
    let mut conn = setup();
    let csv = write_csv(
        "date,description,amount,type,method,category,status\n\
         2025-03-01,Bad,10,transfer,debit,,\n",
    );
    let m = import_matches(csv.path().to_str().unwrap());
    assert!(importer::handle(&mut conn, &m).is_err());
}
