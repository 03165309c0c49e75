use serde::{Deserialize, Serialize};

/// A registered student. `roll_no` is the human-facing business key and is
/// unique across the institution; `id` is the internal surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// Unique roll number, immutable once assigned
    pub roll_no: String,
    pub course: String,
    pub year: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// The agreed total fee obligation for this student
    pub total_fee: f64,
    /// Optional reference to an uploaded photo (stored elsewhere)
    pub photo: Option<String>,
}

/// One immutable fee-payment record against a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub id: i64,
    pub student_id: i64,
    pub amount: f64,
    /// Server-assigned timestamp, canonical `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    /// Payment channel (cash, card, UPI, ...)
    pub mode: String,
    pub remark: Option<String>,
}

/// A fee entry joined with its student's display fields, used by the fee
/// listing and the fees export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRow {
    pub id: i64,
    pub name: String,
    pub roll_no: String,
    pub amount: f64,
    pub date: String,
    pub mode: String,
    pub remark: Option<String>,
}

/// Read-only receipt view: one fee entry joined with its owning student.
/// Not stored anywhere; regenerated on demand from the fee entry id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub fee_entry_id: i64,
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub phone: Option<String>,
    pub amount: f64,
    pub date: String,
    pub mode: String,
    pub remark: Option<String>,
}

/// Admission form fields. `total_fee` falls back to the institution default
/// when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub year: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_fee: Option<f64>,
    pub photo: Option<String>,
}

/// Editable student fields. The roll number is deliberately absent: it never
/// changes after admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: String,
    pub course: String,
    pub year: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_fee: Option<f64>,
    pub photo: Option<String>,
}

/// Payment form: the roll number is the natural key for the counter clerk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub roll_no: String,
    pub amount: f64,
    pub mode: String,
    pub remark: Option<String>,
}

/// Result of a committed payment: the new ledger entry id (receipt
/// reference) and the student it was applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub fee_entry_id: i64,
    pub student: Student,
}

/// A student together with their fee history and derived balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student: Student,
    /// Fee entries newest first
    pub fees: Vec<FeeEntry>,
    pub paid: f64,
    pub due: f64,
}

/// Live dashboard counters, recomputed on every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_students: i64,
    pub total_collection: f64,
    pub today_collection: f64,
    pub month_collection: f64,
}

/// One row of the dues report: a student with derived paid/due figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuesRow {
    pub student: Student,
    pub paid: f64,
    pub due: f64,
}

/// A generated CSV document ready to be served as an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}
