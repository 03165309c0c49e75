/// A validated fee entry ready for the ledger. The date is always the
/// server-assigned canonical timestamp; only tests backdate it.
#[derive(Debug, Clone)]
pub struct NewFeeEntry {
    pub student_id: i64,
    pub amount: f64,
    pub date: String,
    pub mode: String,
    pub remark: Option<String>,
}
