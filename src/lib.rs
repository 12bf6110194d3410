// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod apply;
pub mod bills;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod models;
pub mod sort;
pub mod store;
pub mod templates;
pub mod tutorial;
pub mod utils;
pub mod validate;
