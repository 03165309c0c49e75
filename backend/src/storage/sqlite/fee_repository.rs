use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shared::{FeeEntry, FeeRow, Receipt};

use super::DbConnection;
use crate::domain::models::NewFeeEntry;
use crate::error::LedgerError;
use crate::storage::FeeStore;

/// Repository for the append-only fee ledger.
#[derive(Clone)]
pub struct SqliteFeeRepository {
    db: DbConnection,
}

impl SqliteFeeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn list_rows_ordered(&self, ascending: bool) -> Result<Vec<FeeRow>, LedgerError> {
        let order = if ascending { "ASC" } else { "DESC" };
        let rows = sqlx::query(&format!(
            r#"
            SELECT fees.id, students.name, students.roll_no, fees.amount,
                   fees.date, fees.mode, fees.remark
            FROM fees
            JOIN students ON fees.student_id = students.id
            ORDER BY fees.id {order}
            "#
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(row_to_fee_row).collect())
    }
}

fn row_to_entry(row: &SqliteRow) -> FeeEntry {
    FeeEntry {
        id: row.get("id"),
        student_id: row.get("student_id"),
        amount: row.get("amount"),
        date: row.get("date"),
        mode: row.get("mode"),
        remark: row.get("remark"),
    }
}

fn row_to_fee_row(row: &SqliteRow) -> FeeRow {
    FeeRow {
        id: row.get("id"),
        name: row.get("name"),
        roll_no: row.get("roll_no"),
        amount: row.get("amount"),
        date: row.get("date"),
        mode: row.get("mode"),
        remark: row.get("remark"),
    }
}

#[async_trait]
impl FeeStore for SqliteFeeRepository {
    async fn append_entry(&self, new: &NewFeeEntry) -> Result<i64, LedgerError> {
        let done = sqlx::query(
            r#"
            INSERT INTO fees (student_id, amount, date, mode, remark)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.student_id)
        .bind(new.amount)
        .bind(&new.date)
        .bind(&new.mode)
        .bind(&new.remark)
        .execute(self.db.pool())
        .await?;

        Ok(done.last_insert_rowid())
    }

    async fn list_entries(&self, student_id: Option<i64>) -> Result<Vec<FeeEntry>, LedgerError> {
        let rows = match student_id {
            Some(id) => {
                sqlx::query(
                    r#"
                    SELECT id, student_id, amount, date, mode, remark
                    FROM fees WHERE student_id = ? ORDER BY id DESC
                    "#,
                )
                .bind(id)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, student_id, amount, date, mode, remark
                    FROM fees ORDER BY id DESC
                    "#,
                )
                .fetch_all(self.db.pool())
                .await?
            }
        };

        Ok(rows.iter().map(row_to_entry).collect())
    }

    async fn list_rows(&self) -> Result<Vec<FeeRow>, LedgerError> {
        self.list_rows_ordered(false).await
    }

    async fn list_rows_chronological(&self) -> Result<Vec<FeeRow>, LedgerError> {
        self.list_rows_ordered(true).await
    }

    async fn get_receipt(&self, fee_entry_id: i64) -> Result<Option<Receipt>, LedgerError> {
        let row = sqlx::query(
            r#"
            SELECT fees.id, fees.amount, fees.date, fees.mode, fees.remark,
                   students.name, students.roll_no, students.course, students.phone
            FROM fees
            JOIN students ON fees.student_id = students.id
            WHERE fees.id = ?
            "#,
        )
        .bind(fee_entry_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Receipt {
            fee_entry_id: r.get("id"),
            name: r.get("name"),
            roll_no: r.get("roll_no"),
            course: r.get("course"),
            phone: r.get("phone"),
            amount: r.get("amount"),
            date: r.get("date"),
            mode: r.get("mode"),
            remark: r.get("remark"),
        }))
    }

    async fn sum_entries(
        &self,
        student_id: Option<i64>,
        date_prefix: Option<&str>,
    ) -> Result<f64, LedgerError> {
        // Date filtering is a literal prefix match on the canonical
        // timestamp text, exactly like `date LIKE 'YYYY-MM-DD%'`.
        let row = match (student_id, date_prefix) {
            (Some(id), Some(prefix)) => {
                sqlx::query(
                    "SELECT IFNULL(SUM(amount), 0.0) AS total FROM fees WHERE student_id = ? AND date LIKE ?",
                )
                .bind(id)
                .bind(format!("{}%", prefix))
                .fetch_one(self.db.pool())
                .await?
            }
            (Some(id), None) => {
                sqlx::query("SELECT IFNULL(SUM(amount), 0.0) AS total FROM fees WHERE student_id = ?")
                    .bind(id)
                    .fetch_one(self.db.pool())
                    .await?
            }
            (None, Some(prefix)) => {
                sqlx::query("SELECT IFNULL(SUM(amount), 0.0) AS total FROM fees WHERE date LIKE ?")
                    .bind(format!("{}%", prefix))
                    .fetch_one(self.db.pool())
                    .await?
            }
            (None, None) => {
                sqlx::query("SELECT IFNULL(SUM(amount), 0.0) AS total FROM fees")
                    .fetch_one(self.db.pool())
                    .await?
            }
        };

        Ok(row.get("total"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NewStudent;
    use crate::storage::sqlite::SqliteStudentRepository;
    use crate::storage::StudentStore;

    async fn setup() -> (SqliteStudentRepository, SqliteFeeRepository, i64) {
        let db = DbConnection::init_test().await.expect("test database");
        let students = SqliteStudentRepository::new(db.clone());
        let fees = SqliteFeeRepository::new(db);

        let student = students
            .insert_student(&NewStudent {
                name: "Asha Verma".to_string(),
                roll_no: "CS101".to_string(),
                course: "Computer Science".to_string(),
                year: "2".to_string(),
                email: None,
                phone: None,
                total_fee: 20000.0,
                photo: None,
            })
            .await
            .unwrap();

        (students, fees, student.id)
    }

    fn entry(student_id: i64, amount: f64, date: &str) -> NewFeeEntry {
        NewFeeEntry {
            student_id,
            amount,
            date: date.to_string(),
            mode: "cash".to_string(),
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_append_and_list_entries() {
        let (_students, fees, student_id) = setup().await;

        let first = fees
            .append_entry(&entry(student_id, 5000.0, "2025-01-15 10:00:00"))
            .await
            .unwrap();
        let second = fees
            .append_entry(&entry(student_id, 2500.0, "2025-01-16 11:30:00"))
            .await
            .unwrap();
        assert!(second > first);

        let listed = fees.list_entries(Some(student_id)).await.unwrap();
        assert_eq!(listed.len(), 2);
        // Newest first.
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[0].amount, 2500.0);
        assert_eq!(listed[1].date, "2025-01-15 10:00:00");
    }

    #[tokio::test]
    async fn test_sum_entries_with_day_and_month_prefix() {
        let (_students, fees, student_id) = setup().await;

        fees.append_entry(&entry(student_id, 5000.0, "2025-01-15 10:00:00"))
            .await
            .unwrap();
        fees.append_entry(&entry(student_id, 2000.0, "2025-01-15 17:45:00"))
            .await
            .unwrap();
        fees.append_entry(&entry(student_id, 1000.0, "2025-02-01 09:00:00"))
            .await
            .unwrap();

        let all = fees.sum_entries(None, None).await.unwrap();
        assert_eq!(all, 8000.0);

        let day = fees.sum_entries(None, Some("2025-01-15")).await.unwrap();
        assert_eq!(day, 7000.0);

        let month = fees.sum_entries(None, Some("2025-01")).await.unwrap();
        assert_eq!(month, 7000.0);

        let per_student = fees
            .sum_entries(Some(student_id), Some("2025-02"))
            .await
            .unwrap();
        assert_eq!(per_student, 1000.0);

        let empty_day = fees.sum_entries(None, Some("2024-12-31")).await.unwrap();
        assert_eq!(empty_day, 0.0);
    }

    #[tokio::test]
    async fn test_non_canonical_timestamp_never_matches_a_filter() {
        let (_students, fees, student_id) = setup().await;

        // Prefix matching is literal: a differently-formatted timestamp is
        // counted in the grand total but invisible to any date filter.
        fees.append_entry(&entry(student_id, 3000.0, "15/01/2025 10:00"))
            .await
            .unwrap();

        assert_eq!(fees.sum_entries(None, None).await.unwrap(), 3000.0);
        assert_eq!(
            fees.sum_entries(None, Some("2025-01-15")).await.unwrap(),
            0.0
        );
    }

    #[tokio::test]
    async fn test_receipt_join_and_missing_entry() {
        let (_students, fees, student_id) = setup().await;

        let id = fees
            .append_entry(&NewFeeEntry {
                student_id,
                amount: 5000.0,
                date: "2025-01-15 10:00:00".to_string(),
                mode: "UPI".to_string(),
                remark: Some("first installment".to_string()),
            })
            .await
            .unwrap();

        let receipt = fees.get_receipt(id).await.unwrap().unwrap();
        assert_eq!(receipt.fee_entry_id, id);
        assert_eq!(receipt.roll_no, "CS101");
        assert_eq!(receipt.amount, 5000.0);
        assert_eq!(receipt.mode, "UPI");
        assert_eq!(receipt.remark.as_deref(), Some("first installment"));

        assert!(fees.get_receipt(id + 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_fee_entries() {
        let (students, fees, student_id) = setup().await;

        fees.append_entry(&entry(student_id, 5000.0, "2025-01-15 10:00:00"))
            .await
            .unwrap();
        fees.append_entry(&entry(student_id, 1500.0, "2025-01-16 10:00:00"))
            .await
            .unwrap();

        students.delete_student(student_id).await.unwrap();

        assert!(fees.list_entries(Some(student_id)).await.unwrap().is_empty());
        assert_eq!(fees.sum_entries(None, None).await.unwrap(), 0.0);
    }
}
