// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure computation core. Every function here works over explicit
//! collections handed in by the caller and returns new or changed records
//! for the caller to persist; nothing in this tree touches the database.

pub mod balance;
pub mod error;
pub mod insight;
pub mod jar;
pub mod month;
pub mod plan;
pub mod reconcile;
pub mod recurrence;
