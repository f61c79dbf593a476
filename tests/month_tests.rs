// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use centavo::core::month;
use chrono::NaiveDate;

#[test]
fn add_months_crosses_year_boundaries() {
    assert_eq!(month::add_months("2024-11", 3).unwrap(), "2025-02");
    assert_eq!(month::add_months("2024-01", -1).unwrap(), "2023-12");
    assert_eq!(month::add_months("2024-06", 0).unwrap(), "2024-06");
    assert_eq!(month::add_months("2023-12", 25).unwrap(), "2026-01");
}

#[test]
fn subtract_is_add_negated() {
    assert_eq!(month::subtract_months("2024-01", 1).unwrap(), "2023-12");
    assert_eq!(month::subtract_months("2024-03", 15).unwrap(), "2022-12");
}

#[test]
fn diff_is_signed() {
    assert_eq!(month::diff_months("2024-01", "2024-03").unwrap(), 2);
    assert_eq!(month::diff_months("2024-03", "2024-01").unwrap(), -2);
    assert_eq!(month::diff_months("2024-01", "2025-01").unwrap(), 12);
    assert_eq!(month::diff_months("2024-05", "2024-05").unwrap(), 0);
}

#[test]
fn tokens_are_zero_padded_on_output() {
    // "2024-9" parses fine but always comes back normalized.
    assert_eq!(month::add_months("2024-9", 0).unwrap(), "2024-09");
}

#[test]
fn malformed_tokens_are_rejected() {
    assert!(month::add_months("2024-13", 1).is_err());
    assert!(month::add_months("2024", 1).is_err());
    assert!(month::add_months("abc-01", 1).is_err());
    assert!(month::diff_months("2024-00", "2024-01").is_err());
}

#[test]
fn month_of_and_first_day_round_trip() {
    let date = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
    let token = month::month_of(date);
    assert_eq!(token, "2024-07");
    assert_eq!(
        month::first_day(&token).unwrap(),
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    );
}
