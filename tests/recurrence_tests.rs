// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::core::recurrence;
use centavo::models::{Category, ExpenseEntry, NewExpense, Status};
use centavo::{cli, commands::expenses, db, store};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn fixed_bill(month: &str, amount: &str, status: Status) -> ExpenseEntry {
    ExpenseEntry {
        id: 1,
        month: month.to_string(),
        amount: dec(amount),
        reason: "Rent".to_string(),
        category: Category::Fixed,
        date: NaiveDate::parse_from_str(&format!("{}-05", month), "%Y-%m-%d").unwrap(),
        status,
        card_id: None,
        plan_id: None,
    }
}

#[test]
fn paying_a_fixed_bill_schedules_next_month() {
    let paid = fixed_bill("2024-03", "1200.00", Status::Paid);
    let all = vec![paid.clone()];
    let next = recurrence::next_fixed_occurrence(&paid, &all).unwrap().unwrap();

    assert_eq!(next.month, "2024-04");
    assert_eq!(next.amount, dec("1200.00"));
    assert_eq!(next.reason, "Rent");
    assert_eq!(next.status, Status::Open);
    assert_eq!(next.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
}

#[test]
fn an_identical_upcoming_bill_blocks_the_copy() {
    let paid = fixed_bill("2024-03", "1200.00", Status::Paid);
    let mut upcoming = fixed_bill("2024-04", "1200.00", Status::Open);
    upcoming.id = 2;
    let all = vec![paid.clone(), upcoming];

    assert!(recurrence::next_fixed_occurrence(&paid, &all).unwrap().is_none());
}

#[test]
fn only_fixed_expenses_recur() {
    let mut paid = fixed_bill("2024-03", "80.00", Status::Paid);
    paid.category = Category::Variable;
    assert!(recurrence::next_fixed_occurrence(&paid, &[]).unwrap().is_none());
}

#[test]
fn fixed_series_spans_consecutive_months() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
    let series = recurrence::fixed_series("2024-01", 3, dec("99.999"), "Gym", date).unwrap();

    assert_eq!(series.len(), 3);
    // The first entry keeps the user-given date; the rest fall on the 1st.
    assert_eq!(series[0].date, date);
    assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(series[2].month, "2024-03");
    assert!(series.iter().all(|e| e.amount == dec("100.00")));
    assert!(series.iter().all(|e| e.category == Category::Fixed));
}

#[test]
fn fixed_series_rejects_bad_inputs() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert!(recurrence::fixed_series("2024-01", 0, dec("10"), "Gym", date).is_err());
    assert!(recurrence::fixed_series("2024-01", 3, Decimal::ZERO, "Gym", date).is_err());
}

// ---- command-level flow --------------------------------------------------

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("expense", sub)) => expenses::handle(conn, sub).unwrap(),
        _ => panic!("expense command not parsed"),
    }
}

fn insert_open_rent(conn: &Connection) -> i64 {
    store::insert_expense(
        conn,
        &NewExpense {
            month: "2024-03".to_string(),
            amount: dec("1200.00"),
            reason: "Rent".to_string(),
            category: Category::Fixed,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            status: Status::Open,
            card_id: None,
            plan_id: None,
        },
    )
    .unwrap()
}

#[test]
fn pay_command_carries_the_recurrence() {
    let mut conn = setup();
    let id = insert_open_rent(&conn);

    run(&mut conn, &["centavo", "expense", "pay", "--id", &id.to_string()]);

    let all = store::list_expenses(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].status, Status::Paid);
    let next = all.iter().find(|e| e.month == "2024-04").unwrap();
    assert_eq!(next.status, Status::Open);
    assert_eq!(next.reason, "Rent");

    // Paying an already-paid expense must not duplicate anything.
    run(&mut conn, &["centavo", "expense", "pay", "--id", &id.to_string()]);
    assert_eq!(store::list_expenses(&conn).unwrap().len(), 2);
}

#[test]
fn edit_to_paid_carries_the_recurrence_too() {
    let mut conn = setup();
    let id = insert_open_rent(&conn);

    run(
        &mut conn,
        &["centavo", "expense", "edit", "--id", &id.to_string(), "--status", "paid"],
    );

    let all = store::list_expenses(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|e| e.month == "2024-04" && e.status == Status::Open));
}

#[test]
fn add_with_months_records_the_whole_run() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "centavo", "expense", "add", "--month", "2024-01", "--amount", "89.90", "--reason",
            "Internet", "--category", "fixed", "--months", "6", "--date", "2024-01-10",
        ],
    );

    let all = store::list_expenses(&conn).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].month, "2024-01");
    assert_eq!(all[5].month, "2024-06");
    assert!(all.iter().all(|e| e.amount == dec("89.90")));
}
