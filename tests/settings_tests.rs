// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::utils::{DEFAULT_CLOSING_DAY, get_card_closing_day};
use fincontrol::{cli, commands::settings};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);")
        .unwrap();
    conn
}

fn settings_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("settings", m)) => m.clone(),
        _ => panic!("no settings subcommand"),
    }
}

#[test]
fn closing_day_defaults_until_set() {
    let conn = setup();
    assert_eq!(get_card_closing_day(&conn).unwrap(), DEFAULT_CLOSING_DAY);

    let m = settings_matches(&["fincontrol", "settings", "set-closing-day", "--day", "5"]);
    settings::handle(&conn, &m).unwrap();
    assert_eq!(get_card_closing_day(&conn).unwrap(), 5);
}

#[test]
fn out_of_range_days_never_reach_storage() {
    let conn = setup();
    for day in ["0", "32"] {
        let m = settings_matches(&["fincontrol", "settings", "set-closing-day", "--day", day]);
        assert!(settings::handle(&conn, &m).is_err());
    }
    assert_eq!(get_card_closing_day(&conn).unwrap(), DEFAULT_CLOSING_DAY);
}

#[test]
fn set_overwrites_previous_value() {
    let conn = setup();
    for day in ["5", "25"] {
        let m = settings_matches(&["fincontrol", "settings", "set-closing-day", "--day", day]);
        settings::handle(&conn, &m).unwrap();
    }
    assert_eq!(get_card_closing_day(&conn).unwrap(), 25);
}
