//! Business logic for the admission and fee register.
//!
//! Services own storage trait objects and are cheap to clone; every REST
//! handler works through one of them rather than touching repositories.

use chrono::Local;

pub mod balance;
pub mod export_service;
pub mod models;
pub mod payment_service;
pub mod receipt_service;
pub mod report_service;
pub mod student_service;

/// Fee owed by a student when the admission form leaves the field blank.
pub const DEFAULT_TOTAL_FEE: f64 = 20000.0;

/// Canonical ledger timestamp layout. Dashboard and report filters rely on
/// this being prefix-ordered (year, then month, then day).
pub const LEDGER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered in the canonical ledger layout.
pub fn ledger_timestamp() -> String {
    Local::now().format(LEDGER_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_timestamp_shape() {
        let ts = ledger_timestamp();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
