//! Derived balances. Paid and due figures are never stored; they are
//! recomputed from the ledger so the ledger stays the single source of truth.

use crate::error::LedgerError;
use crate::storage::FeeStore;

/// Total amount the student has paid so far.
pub async fn paid(fees: &dyn FeeStore, student_id: i64) -> Result<f64, LedgerError> {
    fees.sum_entries(Some(student_id), None).await
}

/// Outstanding balance against the agreed total fee. Overpayment shows up
/// as a negative due rather than being clamped away.
pub fn due(total_fee: f64, paid: f64) -> f64 {
    total_fee - paid
}
