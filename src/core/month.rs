// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Arithmetic on "YYYY-MM" month tokens. Day-of-month never matters here;
//! every token maps to (year, month) and back.

use chrono::{Datelike, NaiveDate};

use crate::core::error::CoreError;

fn split(token: &str) -> Result<(i32, u32), CoreError> {
    let mut parts = token.splitn(2, '-');
    let y = parts.next().and_then(|s| s.parse::<i32>().ok());
    let m = parts.next().and_then(|s| s.parse::<u32>().ok());
    match (y, m) {
        (Some(y), Some(m)) if (1..=12).contains(&m) => Ok((y, m)),
        _ => Err(CoreError::Validation(format!(
            "Invalid month '{}', expected YYYY-MM",
            token
        ))),
    }
}

fn join(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn add_months(token: &str, n: i32) -> Result<String, CoreError> {
    let (y, m) = split(token)?;
    let total = y * 12 + (m as i32 - 1) + n;
    Ok(join(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32))
}

pub fn subtract_months(token: &str, n: i32) -> Result<String, CoreError> {
    add_months(token, -n)
}

/// Signed distance in months from `a` to `b` (`b` minus `a`).
pub fn diff_months(a: &str, b: &str) -> Result<i32, CoreError> {
    let (ya, ma) = split(a)?;
    let (yb, mb) = split(b)?;
    Ok((yb * 12 + mb as i32) - (ya * 12 + ma as i32))
}

pub fn month_of(date: NaiveDate) -> String {
    join(date.year(), date.month())
}

/// First calendar day of the token's month, for dating generated records.
pub fn first_day(token: &str) -> Result<NaiveDate, CoreError> {
    let (y, m) = split(token)?;
    NaiveDate::from_ymd_opt(y, m, 1)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month '{}'", token)))
}
