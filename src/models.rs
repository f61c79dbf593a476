// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Card,
    Fixed,
    Variable,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Card => "card",
            Category::Fixed => "fixed",
            Category::Variable => "variable",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(Category::Card),
            "fixed" => Ok(Category::Fixed),
            "variable" => Ok(Category::Variable),
            "other" => Ok(Category::Other),
            other => Err(CoreError::Validation(format!(
                "Invalid category '{}' (use: card, fixed, variable, other)",
                other
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Paid,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Paid => "paid",
        }
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "paid" => Ok(Status::Paid),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{}' (use: open, paid)",
                other
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub amount: Decimal,
    pub reason: String,
    pub category: Category,
    pub date: NaiveDate,
    pub status: Status,
    pub card_id: Option<i64>,
    pub plan_id: Option<i64>,
}

/// Expense not yet persisted (no id). The core mints these; the store assigns
/// ids on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub month: String,
    pub amount: Decimal,
    pub reason: String,
    pub category: Category,
    pub date: NaiveDate,
    pub status: Status,
    pub card_id: Option<i64>,
    pub plan_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncome {
    pub month: String,
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub network: String,
    pub credit_limit: Decimal,
    pub closing_day: u8,
    pub due_day: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: i64,
    pub card_id: i64,
    pub description: String,
    pub total_amount: Decimal,
    pub installment_count: u32,
    pub current_installment: u32, // 1-based
    pub start_month: String,      // month of installment #1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlan {
    pub card_id: i64,
    pub description: String,
    pub total_amount: Decimal,
    pub installment_count: u32,
    pub current_installment: u32,
    pub start_month: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsJar {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub balance: Decimal,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub card: Decimal,
    pub fixed: Decimal,
    pub variable: Decimal,
    pub other: Decimal,
}

/// Derived per-month snapshot; recomputed on every read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub month: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub month_balance: Decimal,
    pub accumulated_balance: Decimal,
    pub committed_percentage: Decimal,
    pub category_breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Situation {
    Improving,
    Stable,
    Worsening,
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Situation::Improving => "improving",
            Situation::Stable => "stable",
            Situation::Worsening => "worsening",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthComparison {
    pub current_month: String,
    pub previous_month: String,
    pub situation: Situation,
    pub income_delta: Decimal,
    pub expense_delta: Decimal,
    pub balance_delta: Decimal,
    pub card_delta: Decimal,
    pub detected_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Alert,
    Tip,
    Praise,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InsightKind::Alert => "alert",
            InsightKind::Tip => "tip",
            InsightKind::Praise => "praise",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}
