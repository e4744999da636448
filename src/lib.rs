//! Payroll Cycle Engine
//!
//! This crate turns a payroll configuration into a year of semi-monthly pay
//! cycles, decides per salary when a payroll run is due, and builds those
//! runs with their items and totals. An axum router exposes the operations
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
