// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::models::Card;
use centavo::{cli, commands::importer, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    store::insert_card(
        &conn,
        &Card {
            id: 0,
            name: "Nubank".into(),
            network: "Mastercard".into(),
            credit_limit: dec("5000"),
            closing_day: 3,
            due_day: 10,
        },
    )
    .unwrap();
    conn
}

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn run_import(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("import", sub)) => importer::handle(conn, sub),
        _ => panic!("import command not parsed"),
    }
}

#[test]
fn statement_import_schedules_the_remaining_installments() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount\n\
         2024-02-10,Notebook 2/12,100.00\n\
         2024-02-12,Groceries,80.00\n",
    );
    run_import(
        &mut conn,
        &[
            "centavo", "import", "statement", "--path", file.path().to_str().unwrap(), "--card",
            "Nubank", "--month", "2024-02",
        ],
    )
    .unwrap();

    let plans = store::list_plans(&conn).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].description, "Notebook");
    assert_eq!(plans[0].total_amount, dec("1200.00"));
    assert_eq!(plans[0].installment_count, 12);
    assert_eq!(plans[0].current_installment, 2);
    assert_eq!(plans[0].start_month, "2024-01");

    // 2 imported rows + installments 3..12 scheduled.
    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 12);
    let scheduled: Vec<_> = expenses.iter().filter(|e| e.plan_id.is_some()).collect();
    assert_eq!(scheduled.len(), 10);
    assert!(scheduled.iter().all(|e| e.amount == dec("100.00")));
    assert_eq!(scheduled.first().unwrap().month, "2024-03");
    assert_eq!(scheduled.last().unwrap().month, "2024-12");

    let groceries = expenses.iter().find(|e| e.reason == "Groceries").unwrap();
    assert_eq!(groceries.month, "2024-02");
    assert_eq!(groceries.plan_id, None);
}

#[test]
fn statement_honors_the_dedicated_installment_column() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount,installment\n\
         2024-05-05,Sofa King,450.00,1/3\n\
         2024-05-06,Rug 2/4,100.00,n/a\n",
    );
    run_import(
        &mut conn,
        &[
            "centavo", "import", "statement", "--path", file.path().to_str().unwrap(), "--card",
            "Nubank",
        ],
    )
    .unwrap();

    // "Sofa King" is a series thanks to the column; "Rug 2/4" is NOT,
    // because its column says the fragment is not an installment marker.
    let plans = store::list_plans(&conn).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].description, "Sofa King");
    assert_eq!(plans[0].installment_count, 3);
    assert_eq!(plans[0].total_amount, dec("1350.00"));
    assert_eq!(plans[0].start_month, "2024-05");

    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 4);
    assert!(expenses.iter().any(|e| e.reason == "Rug 2/4" && e.plan_id.is_none()));
}

#[test]
fn re_importing_the_same_statement_adds_no_plan() {
    let mut conn = setup();
    let file = csv_file("date,description,amount\n2024-02-10,Notebook 2/12,100.00\n");
    let args = [
        "centavo", "import", "statement", "--path", file.path().to_str().unwrap(), "--card",
        "Nubank", "--month", "2024-02",
    ];
    run_import(&mut conn, &args).unwrap();
    run_import(&mut conn, &args).unwrap();

    // The raw row lands twice (statement rows are not deduplicated), but the
    // reconstructed plan and its schedule register only once.
    assert_eq!(store::list_plans(&conn).unwrap().len(), 1);
    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.iter().filter(|e| e.plan_id.is_some()).count(), 10);
}

#[test]
fn a_bad_row_aborts_the_whole_statement() {
    let mut conn = setup();
    let file = csv_file(
        "date,description,amount\n\
         2024-02-10,Fine,10.00\n\
         2024-02-11,Broken,abc\n",
    );
    let err = run_import(
        &mut conn,
        &[
            "centavo", "import", "statement", "--path", file.path().to_str().unwrap(), "--card",
            "Nubank",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Row 2"));
    assert!(store::list_expenses(&conn).unwrap().is_empty());
}

#[test]
fn bulk_expense_import_is_atomic() {
    let mut conn = setup();
    let file = csv_file(
        "month,amount,reason,category\n\
         2024-01,50.00,Water,fixed\n\
         2024-01,60.00,Power,utility\n",
    );
    let err = run_import(
        &mut conn,
        &["centavo", "import", "expenses", "--path", file.path().to_str().unwrap()],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Row 2"));
    assert!(store::list_expenses(&conn).unwrap().is_empty());
}

#[test]
fn bulk_income_import_reads_optional_dates() {
    let mut conn = setup();
    let file = csv_file(
        "month,amount,source,date\n\
         2024-01,2500.00,Salary,2024-01-05\n\
         2024-01,300.00,Freelance,\n",
    );
    run_import(
        &mut conn,
        &["centavo", "import", "incomes", "--path", file.path().to_str().unwrap()],
    )
    .unwrap();

    let incomes = store::list_incomes(&conn).unwrap();
    assert_eq!(incomes.len(), 2);
    assert!(incomes.iter().any(|i| i.source == "Salary" && i.amount == dec("2500.00")));
}

#[test]
fn export_round_trips_through_import() {
    let mut conn = setup();
    let file = csv_file(
        "month,amount,reason,category,status,date\n\
         2024-01,75.50,Internet,fixed,paid,2024-01-08\n",
    );
    run_import(
        &mut conn,
        &["centavo", "import", "expenses", "--path", file.path().to_str().unwrap()],
    )
    .unwrap();

    let out = NamedTempFile::new().unwrap();
    let out_path = out.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "centavo", "export", "expenses", "--out", &out_path,
    ]);
    match matches.subcommand() {
        Some(("export", sub)) => centavo::commands::exporter::handle(&conn, sub).unwrap(),
        _ => panic!("export command not parsed"),
    }

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("month,amount,reason,category,status,date"));
    assert!(written.contains("2024-01,75.50,Internet,fixed,paid,2024-01-08"));
}
