// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::is_round2;
use anyhow::Result;
use rusqlite::Connection;

/// Read-only audit. Orphaned card/plan references are allowed to exist;
/// doctor surfaces them without touching anything.
pub fn handle(conn: &Connection) -> Result<()> {
    let expenses = store::list_expenses(conn)?;
    let cards = store::list_cards(conn)?;
    let plans = store::list_plans(conn)?;
    let jars = store::list_jars(conn)?;

    let mut findings = 0usize;
    for e in &expenses {
        if let Some(card_id) = e.card_id {
            if !cards.iter().any(|c| c.id == card_id) {
                println!("Expense {} references missing card {}", e.id, card_id);
                findings += 1;
            }
        }
        if let Some(plan_id) = e.plan_id {
            if !plans.iter().any(|p| p.id == plan_id) {
                println!("Expense {} references missing plan {}", e.id, plan_id);
                findings += 1;
            }
        }
        if !is_round2(e.amount) {
            println!("Expense {} amount {} is not rounded to 2 decimals", e.id, e.amount);
            findings += 1;
        }
    }
    for r in &store::list_incomes(conn)? {
        if !is_round2(r.amount) {
            println!("Income {} amount {} is not rounded to 2 decimals", r.id, r.amount);
            findings += 1;
        }
    }
    for j in &jars {
        if j.balance < rust_decimal::Decimal::ZERO {
            println!("Jar {} ('{}') has a negative balance {}", j.id, j.name, j.balance);
            findings += 1;
        }
        if !is_round2(j.balance) {
            println!("Jar {} balance {} is not rounded to 2 decimals", j.id, j.balance);
            findings += 1;
        }
    }
    for p in &plans {
        if p.current_installment < 1 || p.current_installment > p.installment_count {
            println!(
                "Plan {} current installment {} outside [1, {}]",
                p.id, p.current_installment, p.installment_count
            );
            findings += 1;
        }
    }

    if findings == 0 {
        println!("All good: no inconsistencies found");
    } else {
        println!("{} finding(s)", findings);
    }
    Ok(())
}
