use std::sync::Arc;

use shared::CsvExport;

use crate::domain::balance;
use crate::error::LedgerError;
use crate::storage::{FeeStore, StudentStore};

/// Builds CSV exports of the register. Rows come out in insertion order so
/// re-running an export after new activity only appends at the bottom.
#[derive(Clone)]
pub struct ExportService {
    students: Arc<dyn StudentStore>,
    fees: Arc<dyn FeeStore>,
}

impl ExportService {
    pub fn new(students: Arc<dyn StudentStore>, fees: Arc<dyn FeeStore>) -> Self {
        Self { students, fees }
    }

    pub async fn export_students(&self) -> Result<CsvExport, LedgerError> {
        let students = self.students.list_students_chronological().await?;

        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .write_record(["ID", "Name", "Roll No", "Course", "Year", "Phone", "Total Fee"])
            .map_err(|e| LedgerError::Document(e.to_string()))?;
        for s in &students {
            writer
                .write_record([
                    s.id.to_string(),
                    s.name.clone(),
                    s.roll_no.clone(),
                    s.course.clone(),
                    s.year.clone(),
                    s.phone.clone().unwrap_or_default(),
                    s.total_fee.to_string(),
                ])
                .map_err(|e| LedgerError::Document(e.to_string()))?;
        }

        Ok(CsvExport {
            filename: "students.csv".to_string(),
            content: finish(writer)?,
        })
    }

    pub async fn export_fees(&self) -> Result<CsvExport, LedgerError> {
        let rows = self.fees.list_rows_chronological().await?;

        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .write_record(["ID", "Name", "Roll", "Amount", "Date", "Mode", "Remark"])
            .map_err(|e| LedgerError::Document(e.to_string()))?;
        for r in &rows {
            writer
                .write_record([
                    r.id.to_string(),
                    r.name.clone(),
                    r.roll_no.clone(),
                    r.amount.to_string(),
                    r.date.clone(),
                    r.mode.clone(),
                    r.remark.clone().unwrap_or_default(),
                ])
                .map_err(|e| LedgerError::Document(e.to_string()))?;
        }

        Ok(CsvExport {
            filename: "fees.csv".to_string(),
            content: finish(writer)?,
        })
    }

    pub async fn export_dues(&self) -> Result<CsvExport, LedgerError> {
        let students = self.students.list_students_chronological().await?;

        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .write_record([
                "ID", "Name", "Roll", "Course", "Phone", "Total Fee", "Paid", "Due",
            ])
            .map_err(|e| LedgerError::Document(e.to_string()))?;
        for s in &students {
            let paid = balance::paid(self.fees.as_ref(), s.id).await?;
            let due = balance::due(s.total_fee, paid);
            writer
                .write_record([
                    s.id.to_string(),
                    s.name.clone(),
                    s.roll_no.clone(),
                    s.course.clone(),
                    s.phone.clone().unwrap_or_default(),
                    s.total_fee.to_string(),
                    paid.to_string(),
                    due.to_string(),
                ])
                .map_err(|e| LedgerError::Document(e.to_string()))?;
        }

        Ok(CsvExport {
            filename: "dues.csv".to_string(),
            content: finish(writer)?,
        })
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, LedgerError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::Document(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LedgerError::Document(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewFeeEntry, NewStudent};
    use crate::domain::DEFAULT_TOTAL_FEE;
    use crate::storage::sqlite::{DbConnection, SqliteFeeRepository, SqliteStudentRepository};

    async fn setup() -> (ExportService, Arc<dyn StudentStore>, Arc<dyn FeeStore>) {
        let db = DbConnection::init_test().await.expect("test database");
        let students: Arc<dyn StudentStore> = Arc::new(SqliteStudentRepository::new(db.clone()));
        let fees: Arc<dyn FeeStore> = Arc::new(SqliteFeeRepository::new(db));
        (
            ExportService::new(students.clone(), fees.clone()),
            students,
            fees,
        )
    }

    fn student(roll_no: &str, name: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            course: "Computer Science".to_string(),
            year: "2".to_string(),
            email: None,
            phone: Some("9876543210".to_string()),
            total_fee: DEFAULT_TOTAL_FEE,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_students_export_headers_and_order() {
        let (exports, students, _fees) = setup().await;
        students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();
        students.insert_student(&student("EC205", "Binod Kumar")).await.unwrap();

        let export = exports.export_students().await.unwrap();
        assert_eq!(export.filename, "students.csv");

        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines[0], "ID,Name,Roll No,Course,Year,Phone,Total Fee");
        // Oldest admission first.
        assert!(lines[1].contains("CS101"));
        assert!(lines[2].contains("EC205"));
        assert!(lines[1].ends_with("20000"));
    }

    #[tokio::test]
    async fn test_fees_export_headers_and_blank_remark() {
        let (exports, students, fees) = setup().await;
        let admitted = students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();
        fees.append_entry(&NewFeeEntry {
            student_id: admitted.id,
            amount: 5000.0,
            date: "2025-01-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();

        let export = exports.export_fees().await.unwrap();
        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines[0], "ID,Name,Roll,Amount,Date,Mode,Remark");
        assert!(lines[1].contains("5000"));
        // A missing remark exports as an empty trailing field.
        assert!(lines[1].ends_with("cash,"));
    }

    #[tokio::test]
    async fn test_dues_export_matches_derived_balances() {
        let (exports, students, fees) = setup().await;
        let admitted = students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();
        fees.append_entry(&NewFeeEntry {
            student_id: admitted.id,
            amount: 5000.0,
            date: "2025-01-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();

        let export = exports.export_dues().await.unwrap();
        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines[0], "ID,Name,Roll,Course,Phone,Total Fee,Paid,Due");
        assert!(lines[1].ends_with("20000,5000,15000"));
    }

    #[tokio::test]
    async fn test_empty_register_exports_headers_only() {
        let (exports, _students, _fees) = setup().await;
        let export = exports.export_fees().await.unwrap();
        assert_eq!(export.content.lines().count(), 1);
    }
}
