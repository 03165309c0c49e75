//! Student admission and fee-collection register.
//!
//! The crate is layered the same way throughout: `storage` holds the ledger
//! store traits and their SQLite implementation, `domain` holds the services
//! that own the business rules, `notify` is the best-effort notification
//! dispatcher, and `rest` is a thin axum translation layer on top.

pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod rest;
pub mod storage;
