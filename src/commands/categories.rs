// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntryKind;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

// Starter set shipped with the original product.
const SEED: [(&str, EntryKind); 7] = [
    ("Alimentação", EntryKind::Expense),
    ("Transporte", EntryKind::Expense),
    ("Lazer", EntryKind::Expense),
    ("Moradia", EntryKind::Expense),
    ("Salário", EntryKind::Income),
    ("Investimentos", EntryKind::Income),
    ("Outros", EntryKind::Income),
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: EntryKind = sub.get_one::<String>("type").unwrap().parse()?;
            conn.execute(
                "INSERT INTO categories(name, type) VALUES (?1, ?2)",
                params![name, kind.as_str()],
            )?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, type FROM categories ORDER BY type, name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, t) = row?;
                data.push(vec![n, t]);
            }
            println!("{}", pretty_table(&["Category", "Type"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        Some(("seed", _)) => {
            let mut added = 0;
            for (name, kind) in SEED {
                added += conn.execute(
                    "INSERT OR IGNORE INTO categories(name, type) VALUES (?1, ?2)",
                    params![name, kind.as_str()],
                )?;
            }
            println!("Seeded {} categories", added);
        }
        _ => {}
    }
    Ok(())
}
