// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-over-month comparison and rule-based insights. Thresholds are
//! contractual; message wording is not.

use rust_decimal::Decimal;

use crate::models::{Insight, InsightKind, MonthComparison, MonthlyBalance, Situation};

fn pct(n: i64, scale: u32) -> Decimal {
    Decimal::new(n, scale)
}

pub fn compare(current: &MonthlyBalance, previous: &MonthlyBalance) -> MonthComparison {
    let income_delta = current.total_income - previous.total_income;
    let expense_delta = current.total_expense - previous.total_expense;
    let balance_delta = current.month_balance - previous.month_balance;
    let card_delta = current.category_breakdown.card - previous.category_breakdown.card;

    // Improving wins the tie-break; the two conditions are not exclusive.
    let situation = if balance_delta > Decimal::ZERO && expense_delta < Decimal::ZERO {
        Situation::Improving
    } else if balance_delta < Decimal::ZERO
        || expense_delta > previous.total_expense * pct(1, 1)
    {
        Situation::Worsening
    } else {
        Situation::Stable
    };

    let mut detected_patterns = Vec::new();
    if previous.total_expense > Decimal::ZERO
        && expense_delta.abs() > previous.total_expense * pct(15, 2)
    {
        let swing = (expense_delta / previous.total_expense * Decimal::from(100))
            .abs()
            .round_dp(1);
        detected_patterns.push(format!(
            "Expenses {} {}%",
            if expense_delta > Decimal::ZERO {
                "rose"
            } else {
                "fell"
            },
            swing
        ));
    }
    if card_delta.abs() > previous.category_breakdown.card * pct(2, 1) {
        detected_patterns.push(format!(
            "Card spending {} significantly",
            if card_delta > Decimal::ZERO {
                "increased"
            } else {
                "decreased"
            }
        ));
    }

    MonthComparison {
        current_month: current.month.clone(),
        previous_month: previous.month.clone(),
        situation,
        income_delta,
        expense_delta,
        balance_delta,
        card_delta,
        detected_patterns,
    }
}

/// Each rule fires independently; any subset can apply to one month.
pub fn insights(balance: &MonthlyBalance) -> Vec<Insight> {
    let mut out = Vec::new();
    let income = balance.total_income;

    if balance.committed_percentage > Decimal::from(80) {
        out.push(Insight {
            kind: InsightKind::Alert,
            message: format!(
                "You are committing {:.1}% of your income. Consider trimming variable expenses.",
                balance.committed_percentage
            ),
        });
    }
    if balance.category_breakdown.card > income * pct(3, 1) {
        out.push(Insight {
            kind: InsightKind::Alert,
            message: "Card spending is above 30% of your income. Set a monthly card limit."
                .to_string(),
        });
    }
    if balance.month_balance > income * pct(2, 1) {
        out.push(Insight {
            kind: InsightKind::Praise,
            message: format!(
                "Nice work! You saved {:.2} this month. Keep it up!",
                balance.month_balance
            ),
        });
    }
    if balance.month_balance > Decimal::ZERO && balance.month_balance < income * pct(1, 1) {
        out.push(Insight {
            kind: InsightKind::Tip,
            message: "Try to push your monthly reserve to at least 20% of your income."
                .to_string(),
        });
    }
    if balance.accumulated_balance < Decimal::ZERO {
        out.push(Insight {
            kind: InsightKind::Alert,
            message: format!(
                "Your accumulated balance is {:.2} in the red. Review your spending urgently.",
                balance.accumulated_balance.abs()
            ),
        });
    }
    if balance.accumulated_balance > income * Decimal::from(3) {
        out.push(Insight {
            kind: InsightKind::Praise,
            message: format!(
                "Excellent! You have {:.2} set aside. Consider investing part of it.",
                balance.accumulated_balance
            ),
        });
    }
    out
}
