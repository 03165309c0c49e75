/// Fields for a validated admission, ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub year: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_fee: f64,
    pub photo: Option<String>,
}

/// The mutable slice of a student record. Deliberately has no roll number:
/// that key is immutable once assigned.
#[derive(Debug, Clone)]
pub struct StudentUpdate {
    pub name: String,
    pub course: String,
    pub year: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_fee: f64,
    pub photo: Option<String>,
}
