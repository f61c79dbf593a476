// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod importer;
pub mod income;
pub mod jars;
pub mod plans;
pub mod reports;
