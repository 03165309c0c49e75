//! # Storage Traits
//!
//! The ledger store abstraction. The domain layer only ever talks to these
//! traits, so it can run against the SQLite implementation in production and
//! against in-memory databases or fakes in tests.

pub mod sqlite;

use async_trait::async_trait;
use shared::{FeeEntry, FeeRow, Receipt, Student};

use crate::domain::models::{NewFeeEntry, NewStudent, StudentUpdate};
use crate::error::LedgerError;

/// Student records: admission, edit, cascade delete and the read paths.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a new student. Fails with `DuplicateKey` when the roll number
    /// is already registered.
    async fn insert_student(&self, new: &NewStudent) -> Result<Student, LedgerError>;

    async fn get_student(&self, id: i64) -> Result<Option<Student>, LedgerError>;

    /// Exact roll-number lookup, the payment form's natural key.
    async fn get_student_by_roll(&self, roll_no: &str) -> Result<Option<Student>, LedgerError>;

    /// List students newest first, optionally filtered by a case-insensitive
    /// substring match on roll number or name.
    async fn list_students(&self, filter: Option<&str>) -> Result<Vec<Student>, LedgerError>;

    /// List all students in surrogate-id order (oldest first), the order the
    /// tabular exports use.
    async fn list_students_chronological(&self) -> Result<Vec<Student>, LedgerError>;

    /// Replace the mutable fields of a student. The roll number is not
    /// updatable through this path. Fails with `NotFound` when absent.
    async fn update_student(&self, id: i64, fields: &StudentUpdate) -> Result<Student, LedgerError>;

    /// Remove the student and all of their fee entries in one transaction.
    async fn delete_student(&self, id: i64) -> Result<(), LedgerError>;

    async fn count_students(&self) -> Result<i64, LedgerError>;
}

/// The fee ledger: append-only entries plus the aggregation read paths.
#[async_trait]
pub trait FeeStore: Send + Sync {
    /// Append one immutable entry and return its id. Entries are never
    /// updated afterwards; only a student cascade delete removes them.
    async fn append_entry(&self, new: &NewFeeEntry) -> Result<i64, LedgerError>;

    /// Entries for one student (or all), newest first.
    async fn list_entries(&self, student_id: Option<i64>) -> Result<Vec<FeeEntry>, LedgerError>;

    /// Entries joined with student name/roll, newest first.
    async fn list_rows(&self) -> Result<Vec<FeeRow>, LedgerError>;

    /// Joined entries in ledger-entry-id order (oldest first) for export.
    async fn list_rows_chronological(&self) -> Result<Vec<FeeRow>, LedgerError>;

    /// The receipt join for one entry, or `None` when the entry is gone.
    async fn get_receipt(&self, fee_entry_id: i64) -> Result<Option<Receipt>, LedgerError>;

    /// `IFNULL(SUM(amount), 0)` over the ledger. `date_prefix` is a literal
    /// string prefix of the canonical `YYYY-MM-DD HH:MM:SS` timestamp (a day
    /// or a month); a non-canonical timestamp silently matches no filter.
    async fn sum_entries(
        &self,
        student_id: Option<i64>,
        date_prefix: Option<&str>,
    ) -> Result<f64, LedgerError>;
}
