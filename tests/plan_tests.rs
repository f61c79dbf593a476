// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::core::plan::{self, PlanSpec};
use centavo::models::{Card, Category, ExpenseEntry, Status};
use centavo::{cli, commands::plans, db, store};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn last_installment_absorbs_the_rounding_remainder() {
    let total = dec("100.00");
    assert_eq!(plan::installment_amount(total, 3, 1), dec("33.33"));
    assert_eq!(plan::installment_amount(total, 3, 2), dec("33.33"));
    assert_eq!(plan::installment_amount(total, 3, 3), dec("33.34"));

    let sum: Decimal = (1..=3).map(|i| plan::installment_amount(total, 3, i)).sum();
    assert_eq!(sum, total);
}

#[test]
fn generates_one_expense_per_installment() {
    let schedule = plan::generate_plan(
        &PlanSpec {
            card_id: 7,
            description: "Notebook",
            total_amount: dec("1200.00"),
            installment_count: 4,
            current_installment: 1,
            start_month: "2024-01",
        },
        &[],
    )
    .unwrap();

    assert_eq!(schedule.expenses.len(), 4);
    let months: Vec<&str> = schedule.expenses.iter().map(|e| e.month.as_str()).collect();
    assert_eq!(months, ["2024-01", "2024-02", "2024-03", "2024-04"]);
    for (i, e) in schedule.expenses.iter().enumerate() {
        assert_eq!(e.amount, dec("300.00"));
        assert_eq!(e.reason, format!("Notebook ({}/4)", i + 1));
        assert_eq!(e.category, Category::Card);
        assert_eq!(e.status, Status::Open);
        assert_eq!(e.card_id, Some(7));
        assert_eq!(e.date.day(), 1, "generated installments fall on the 1st");
    }
    assert_eq!(schedule.plan.total_amount, dec("1200.00"));
    assert_eq!(schedule.plan.start_month, "2024-01");
}

#[test]
fn starts_at_the_current_installment() {
    let schedule = plan::generate_plan(
        &PlanSpec {
            card_id: 1,
            description: "Fridge",
            total_amount: dec("900.00"),
            installment_count: 3,
            current_installment: 2,
            start_month: "2024-01",
        },
        &[],
    )
    .unwrap();

    assert_eq!(schedule.expenses.len(), 2);
    assert_eq!(schedule.expenses[0].month, "2024-02");
    assert_eq!(schedule.expenses[0].reason, "Fridge (2/3)");
    assert_eq!(schedule.expenses[1].month, "2024-03");
}

#[test]
fn skips_a_current_installment_already_on_the_ledger() {
    let existing = vec![ExpenseEntry {
        id: 1,
        month: "2024-02".into(),
        amount: dec("300.00"),
        reason: "Fridge (2/3)".into(),
        category: Category::Card,
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        status: Status::Open,
        card_id: Some(1),
        plan_id: None,
    }];
    let schedule = plan::generate_plan(
        &PlanSpec {
            card_id: 1,
            description: "Fridge",
            total_amount: dec("900.00"),
            installment_count: 3,
            current_installment: 2,
            start_month: "2024-01",
        },
        &existing,
    )
    .unwrap();

    assert_eq!(schedule.expenses.len(), 1);
    assert_eq!(schedule.expenses[0].month, "2024-03");
}

#[test]
fn rejects_out_of_range_inputs() {
    let spec = |total: &str, count, current| PlanSpec {
        card_id: 1,
        description: "X",
        total_amount: dec(total),
        installment_count: count,
        current_installment: current,
        start_month: "2024-01",
    };
    assert!(plan::generate_plan(&spec("100.00", 4, 0), &[]).is_err());
    assert!(plan::generate_plan(&spec("100.00", 4, 5), &[]).is_err());
    assert!(plan::generate_plan(&spec("0", 4, 1), &[]).is_err());
    assert!(plan::generate_plan(&spec("-10", 4, 1), &[]).is_err());
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

fn run(conn: &mut Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("plan", sub)) => plans::handle(conn, sub).unwrap(),
        _ => panic!("plan command not parsed"),
    }
}

#[test]
fn plan_add_registers_the_plan_and_its_installments() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "centavo", "plan", "add", "--card", "Nubank", "--description", "Notebook", "--total",
            "1200", "--installments", "4", "--start", "2024-01",
        ],
    );

    let plans_in_db = store::list_plans(&conn).unwrap();
    assert_eq!(plans_in_db.len(), 1);
    assert_eq!(plans_in_db[0].total_amount, dec("1200.00"));
    assert_eq!(plans_in_db[0].installment_count, 4);

    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 4);
    assert!(expenses.iter().all(|e| e.plan_id == Some(plans_in_db[0].id)));
}

#[test]
fn registering_the_same_plan_twice_is_a_no_op() {
    let mut conn = setup();
    let args = [
        "centavo", "plan", "add", "--card", "Nubank", "--description", "Notebook", "--total",
        "1200", "--installments", "4", "--start", "2024-01",
    ];
    run(&mut conn, &args);
    run(&mut conn, &args);

    assert_eq!(store::list_plans(&conn).unwrap().len(), 1);
    assert_eq!(store::list_expenses(&conn).unwrap().len(), 4);
}
