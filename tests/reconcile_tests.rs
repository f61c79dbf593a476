// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::core::reconcile::{self, InstallmentTag, StatementRow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(description: &str, amount: &str, date: NaiveDate) -> StatementRow {
    StatementRow {
        description: description.to_string(),
        amount: dec(amount),
        date,
        parcel_field: None,
    }
}

#[test]
fn detects_installments_in_free_text() {
    assert_eq!(
        reconcile::detect_installment("Store 3/12", None),
        Some(InstallmentTag { current: 3, total: 12 })
    );
    assert_eq!(
        reconcile::detect_installment("Loja 02-10", None),
        Some(InstallmentTag { current: 2, total: 10 })
    );
    assert_eq!(
        reconcile::detect_installment("TV (4 / 6)", None),
        Some(InstallmentTag { current: 4, total: 6 })
    );
}

#[test]
fn date_like_fragments_are_not_installments() {
    // "12/2025" must be read whole and rejected, never split into "12/20".
    assert_eq!(reconcile::detect_installment("Store 12/2025", None), None);
    // A "series" of one is not a series, and current past total is nonsense.
    assert_eq!(reconcile::detect_installment("Shop 1/1", None), None);
    assert_eq!(reconcile::detect_installment("Shop 5/3", None), None);
}

#[test]
fn dedicated_field_wins_and_never_falls_back_to_text() {
    assert_eq!(
        reconcile::detect_installment("whatever", Some("03/12")),
        Some(InstallmentTag { current: 3, total: 12 })
    );
    // A date in the field means "not an installment", even though the
    // description carries a perfectly matchable fragment.
    assert_eq!(
        reconcile::detect_installment("TV 5/12", Some("2024-05-10")),
        None
    );
    // An empty field falls through to the description.
    assert_eq!(
        reconcile::detect_installment("TV 5/12", Some("  ")),
        Some(InstallmentTag { current: 5, total: 12 })
    );
}

#[test]
fn base_description_strips_the_fragment() {
    assert_eq!(reconcile::base_description("Notebook Dell 2/12"), "Notebook Dell");
    assert_eq!(reconcile::base_description("TV (3/10)"), "TV");
    assert_eq!(reconcile::base_description("Plain purchase"), "Plain purchase");
}

#[test]
fn reconstructs_a_plan_from_a_single_mid_series_row() {
    let rows = vec![row("Notebook 2/12", "100.00", day(2024, 2, 10))];
    let outcome =
        reconcile::reconcile_statement(&rows, 1, Some("2024-02"), day(2024, 2, 28)).unwrap();

    assert_eq!(outcome.plans.len(), 1);
    let plan = &outcome.plans[0];
    assert_eq!(plan.description, "Notebook");
    assert_eq!(plan.installment_count, 12);
    assert_eq!(plan.current_installment, 2);
    assert_eq!(plan.start_month, "2024-01");
    assert_eq!(plan.total_amount, dec("1200.00"));

    assert_eq!(outcome.expenses.len(), 1);
    let expense = &outcome.expenses[0];
    assert_eq!(expense.month, "2024-02");
    assert_eq!(expense.amount, dec("100.00"));
    assert_eq!(expense.reason, "Notebook (2/12)");
}

#[test]
fn groups_rows_of_the_same_series_and_infers_the_invoice_month() {
    let rows = vec![
        row("TV 1/3", "200.00", day(2024, 1, 5)),
        row("TV 2/3", "200.00", day(2024, 2, 5)),
        row("Groceries", "150.55", day(2024, 2, 7)),
    ];
    // No invoice month given: 2024-02 holds two of the three rows.
    let outcome = reconcile::reconcile_statement(&rows, 3, None, day(2024, 2, 28)).unwrap();

    assert_eq!(outcome.plans.len(), 1);
    let plan = &outcome.plans[0];
    assert_eq!(plan.description, "TV");
    assert_eq!(plan.installment_count, 3);
    assert_eq!(plan.current_installment, 2);
    assert_eq!(plan.start_month, "2024-01");
    // Two of three present: average projected over the full series.
    assert_eq!(plan.total_amount, dec("600.00"));

    assert_eq!(outcome.expenses.len(), 2);
    let singular = &outcome.expenses[0];
    assert_eq!(singular.reason, "Groceries");
    assert_eq!(singular.month, "2024-02");
    let series = &outcome.expenses[1];
    assert_eq!(series.reason, "TV (2/3)");
    assert_eq!(series.amount, dec("200.00"));
    assert_eq!(series.month, "2024-02");
}

#[test]
fn complete_series_sums_exactly() {
    let rows = vec![
        row("Sofa 1/2", "50.00", day(2024, 1, 10)),
        row("Sofa 2/2", "50.01", day(2024, 2, 10)),
    ];
    let outcome =
        reconcile::reconcile_statement(&rows, 1, Some("2024-02"), day(2024, 2, 28)).unwrap();

    assert_eq!(outcome.plans[0].total_amount, dec("100.01"));
    assert_eq!(outcome.plans[0].current_installment, 2);
    // The expense is the row we are actually on, not the earliest.
    assert_eq!(outcome.expenses[0].amount, dec("50.01"));
}

#[test]
fn partial_series_projects_from_the_average() {
    let rows = vec![
        row("Cadeira 1/10", "99.90", day(2024, 1, 3)),
        row("Cadeira 3/10", "100.10", day(2024, 3, 3)),
    ];
    let outcome =
        reconcile::reconcile_statement(&rows, 1, Some("2024-03"), day(2024, 3, 30)).unwrap();

    let plan = &outcome.plans[0];
    assert_eq!(plan.total_amount, dec("1000.00"));
    assert_eq!(plan.current_installment, 3);
    assert_eq!(plan.start_month, "2024-01");
    assert_eq!(outcome.expenses[0].reason, "Cadeira (3/10)");
    assert_eq!(outcome.expenses[0].amount, dec("100.10"));
}

#[test]
fn distrusts_dates_that_contradict_the_declared_position() {
    // The row says installment 2, but its date is the invoice month itself;
    // the start month is back-computed instead of read off the date.
    let rows = vec![row("Phone 2/6", "120.00", day(2024, 5, 2))];
    let outcome =
        reconcile::reconcile_statement(&rows, 1, Some("2024-05"), day(2024, 5, 31)).unwrap();

    assert_eq!(outcome.plans[0].start_month, "2024-04");
    assert_eq!(outcome.plans[0].current_installment, 2);
}

#[test]
fn bad_rows_abort_with_their_row_number() {
    let rows = vec![
        row("Fine", "10.00", day(2024, 1, 1)),
        row("   ", "10.00", day(2024, 1, 2)),
    ];
    let err = reconcile::reconcile_statement(&rows, 1, None, day(2024, 1, 31)).unwrap_err();
    assert!(err.to_string().contains("Row 2"));

    let rows = vec![row("Thing", "0", day(2024, 1, 1))];
    let err = reconcile::reconcile_statement(&rows, 1, None, day(2024, 1, 31)).unwrap_err();
    assert!(err.to_string().contains("Row 1"));
    assert!(err.to_string().contains("positive"));
}
