use std::sync::Arc;

use chrono::Local;

use shared::{DashboardTotals, DuesRow};

use crate::domain::balance;
use crate::error::LedgerError;
use crate::storage::{FeeStore, StudentStore};

/// Dashboard counters and the dues report, recomputed from the ledger on
/// every request.
#[derive(Clone)]
pub struct ReportService {
    students: Arc<dyn StudentStore>,
    fees: Arc<dyn FeeStore>,
}

impl ReportService {
    pub fn new(students: Arc<dyn StudentStore>, fees: Arc<dyn FeeStore>) -> Self {
        Self { students, fees }
    }

    pub async fn dashboard_totals(&self) -> Result<DashboardTotals, LedgerError> {
        let now = Local::now();
        let today = now.format("%Y-%m-%d").to_string();
        let month = now.format("%Y-%m").to_string();

        Ok(DashboardTotals {
            total_students: self.students.count_students().await?,
            total_collection: self.fees.sum_entries(None, None).await?,
            today_collection: self.fees.sum_entries(None, Some(&today)).await?,
            month_collection: self.fees.sum_entries(None, Some(&month)).await?,
        })
    }

    /// Every matching student with their derived paid and due figures,
    /// including the fully-settled ones.
    pub async fn dues_report(&self, filter: Option<&str>) -> Result<Vec<DuesRow>, LedgerError> {
        let filter = filter.map(str::trim).filter(|q| !q.is_empty());
        let students = self.students.list_students(filter).await?;

        let mut rows = Vec::with_capacity(students.len());
        for student in students {
            let paid = balance::paid(self.fees.as_ref(), student.id).await?;
            let due = balance::due(student.total_fee, paid);
            rows.push(DuesRow { student, paid, due });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewFeeEntry, NewStudent};
    use crate::domain::{ledger_timestamp, DEFAULT_TOTAL_FEE};
    use crate::storage::sqlite::{DbConnection, SqliteFeeRepository, SqliteStudentRepository};

    async fn setup() -> (ReportService, Arc<dyn StudentStore>, Arc<dyn FeeStore>) {
        let db = DbConnection::init_test().await.expect("test database");
        let students: Arc<dyn StudentStore> = Arc::new(SqliteStudentRepository::new(db.clone()));
        let fees: Arc<dyn FeeStore> = Arc::new(SqliteFeeRepository::new(db));
        (
            ReportService::new(students.clone(), fees.clone()),
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
            phone: None,
            total_fee: DEFAULT_TOTAL_FEE,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_dashboard_counts_today_and_month_separately() {
        let (reports, students, fees) = setup().await;
        let admitted = students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();

        // One payment stamped now, one backdated out of the current month.
        fees.append_entry(&NewFeeEntry {
            student_id: admitted.id,
            amount: 5000.0,
            date: ledger_timestamp(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();
        fees.append_entry(&NewFeeEntry {
            student_id: admitted.id,
            amount: 2000.0,
            date: "2001-06-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();

        let totals = reports.dashboard_totals().await.unwrap();
        assert_eq!(totals.total_students, 1);
        assert_eq!(totals.total_collection, 7000.0);
        assert_eq!(totals.today_collection, 5000.0);
        assert_eq!(totals.month_collection, 5000.0);
    }

    #[tokio::test]
    async fn test_dashboard_with_only_backdated_entries() {
        let (reports, students, fees) = setup().await;
        let admitted = students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();

        fees.append_entry(&NewFeeEntry {
            student_id: admitted.id,
            amount: 3000.0,
            date: "2001-06-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();

        let totals = reports.dashboard_totals().await.unwrap();
        assert_eq!(totals.total_collection, 3000.0);
        assert_eq!(totals.today_collection, 0.0);
        assert_eq!(totals.month_collection, 0.0);
    }

    #[tokio::test]
    async fn test_dues_report_includes_settled_students_and_honors_filter() {
        let (reports, students, fees) = setup().await;
        let asha = students.insert_student(&student("CS101", "Asha Verma")).await.unwrap();
        let binod = students.insert_student(&student("EC205", "Binod Kumar")).await.unwrap();

        // Asha settles in full, Binod pays half.
        fees.append_entry(&NewFeeEntry {
            student_id: asha.id,
            amount: DEFAULT_TOTAL_FEE,
            date: "2025-01-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();
        fees.append_entry(&NewFeeEntry {
            student_id: binod.id,
            amount: 10000.0,
            date: "2025-01-15 10:00:00".to_string(),
            mode: "cash".to_string(),
            remark: None,
        })
        .await
        .unwrap();

        let all = reports.dues_report(None).await.unwrap();
        assert_eq!(all.len(), 2);
        let settled = all.iter().find(|r| r.student.id == asha.id).unwrap();
        assert_eq!(settled.due, 0.0);
        let owing = all.iter().find(|r| r.student.id == binod.id).unwrap();
        assert_eq!(owing.paid, 10000.0);
        assert_eq!(owing.due, 10000.0);

        let filtered = reports.dues_report(Some("binod")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].student.roll_no, "EC205");
    }
}
