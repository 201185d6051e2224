//! Overtime Credit & Compensatory Leave Engine
//!
//! This crate computes per-employee overtime credit from daily attendance
//! totals under tiered statutory multiplier rules, and allocates
//! compensatory-leave requests against the accumulated credit ledger,
//! oldest-earned credit first.

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
