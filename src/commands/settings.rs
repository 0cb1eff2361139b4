// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_card_closing_day, pretty_table, set_card_closing_day};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let day = get_card_closing_day(conn)?;
            let rows = vec![vec!["card_closing_day".to_string(), day.to_string()]];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-closing-day", sub)) => {
            let day = *sub.get_one::<u32>("day").unwrap();
            set_card_closing_day(conn, day)?;
            println!("Card closing day set to {}", day);
        }
        _ => {}
    }
    Ok(())
}
