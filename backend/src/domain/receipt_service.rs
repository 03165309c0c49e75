use std::sync::Arc;

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfLayerReference};

use shared::Receipt;

use crate::error::LedgerError;
use crate::storage::FeeStore;

/// Produces receipts for individual fee entries. A receipt is never stored;
/// it is re-derived from the ledger on every request, so a reprint always
/// reflects the entry as committed.
#[derive(Clone)]
pub struct ReceiptService {
    fees: Arc<dyn FeeStore>,
    pdf_enabled: bool,
    institution_name: String,
}

impl ReceiptService {
    pub fn new(fees: Arc<dyn FeeStore>, pdf_enabled: bool, institution_name: String) -> Self {
        Self {
            fees,
            pdf_enabled,
            institution_name,
        }
    }

    pub async fn receipt(&self, fee_entry_id: i64) -> Result<Receipt, LedgerError> {
        self.fees
            .get_receipt(fee_entry_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("receipt {}", fee_entry_id)))
    }

    /// Rendered PDF bytes, or `None` when the PDF renderer is turned off.
    pub async fn receipt_pdf(&self, fee_entry_id: i64) -> Result<Option<Vec<u8>>, LedgerError> {
        let receipt = self.receipt(fee_entry_id).await?;
        if !self.pdf_enabled {
            return Ok(None);
        }
        Ok(Some(self.render_pdf(&receipt)?))
    }

    pub fn pdf_filename(fee_entry_id: i64) -> String {
        format!("receipt_{}.pdf", fee_entry_id)
    }

    fn render_pdf(&self, receipt: &Receipt) -> Result<Vec<u8>, LedgerError> {
        let title = format!("{} - Fee Receipt", self.institution_name);
        let (doc, page, layer) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| LedgerError::Document(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| LedgerError::Document(e.to_string()))?;

        layer.use_text(&title, 18.0, Mm(20.0), Mm(270.0), &font_bold);
        layer.use_text(
            format!("Receipt No: {}", receipt.fee_entry_id),
            11.0,
            Mm(20.0),
            Mm(260.0),
            &font,
        );
        divider(&layer, 255.0);

        let mut y = 245.0;
        let mut field = |label: &str, value: &str| {
            layer.use_text(label, 11.0, Mm(20.0), Mm(y), &font_bold);
            layer.use_text(value, 11.0, Mm(70.0), Mm(y), &font);
            y -= 9.0;
        };

        field("Name", &receipt.name);
        field("Roll No", &receipt.roll_no);
        field("Course", &receipt.course);
        field("Amount", &format!("Rs. {:.2}", receipt.amount));
        field("Date", &receipt.date);
        field("Mode", &receipt.mode);
        if let Some(remark) = &receipt.remark {
            field("Remark", remark);
        }
        drop(field);

        divider(&layer, y - 3.0);

        // Signature line near the foot of the page.
        divider_span(&layer, 40.0, 140.0, 190.0);
        layer.use_text("Authorised Signatory", 10.0, Mm(145.0), Mm(34.0), &font);

        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        doc.save(&mut writer)
            .map_err(|e| LedgerError::Document(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| LedgerError::Document(e.to_string()))
    }
}

fn divider(layer: &PdfLayerReference, y: f32) {
    divider_span(layer, y, 20.0, 190.0);
}

fn divider_span(layer: &PdfLayerReference, y: f32, x_start: f32, x_end: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(x_start), Mm(y)), false),
            (printpdf::Point::new(Mm(x_end), Mm(y)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewFeeEntry, NewStudent};
    use crate::storage::sqlite::{DbConnection, SqliteFeeRepository, SqliteStudentRepository};
    use crate::storage::StudentStore;

    async fn setup(pdf_enabled: bool) -> (ReceiptService, i64) {
        let db = DbConnection::init_test().await.expect("test database");
        let students = SqliteStudentRepository::new(db.clone());
        let fees: Arc<dyn FeeStore> = Arc::new(SqliteFeeRepository::new(db));

        let student = students
            .insert_student(&NewStudent {
                name: "Asha Verma".to_string(),
                roll_no: "CS101".to_string(),
                course: "Computer Science".to_string(),
                year: "2".to_string(),
                email: None,
                phone: Some("9876543210".to_string()),
                total_fee: 20000.0,
                photo: None,
            })
            .await
            .unwrap();
        let fee_entry_id = fees
            .append_entry(&NewFeeEntry {
                student_id: student.id,
                amount: 5000.0,
                date: "2025-01-15 10:00:00".to_string(),
                mode: "cash".to_string(),
                remark: Some("first installment".to_string()),
            })
            .await
            .unwrap();

        (
            ReceiptService::new(fees, pdf_enabled, "Sunrise College".to_string()),
            fee_entry_id,
        )
    }

    #[tokio::test]
    async fn test_receipt_reflects_the_ledger_entry() {
        let (service, fee_entry_id) = setup(true).await;
        let receipt = service.receipt(fee_entry_id).await.unwrap();
        assert_eq!(receipt.name, "Asha Verma");
        assert_eq!(receipt.amount, 5000.0);
        assert_eq!(receipt.date, "2025-01-15 10:00:00");
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let (service, fee_entry_id) = setup(true).await;
        let err = service.receipt(fee_entry_id + 99).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));

        let err = service.receipt_pdf(fee_entry_id + 99).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pdf_rendering_can_be_turned_off() {
        let (service, fee_entry_id) = setup(false).await;
        assert!(service.receipt_pdf(fee_entry_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pdf_output_is_a_pdf_document() {
        let (service, fee_entry_id) = setup(true).await;
        let bytes = service.receipt_pdf(fee_entry_id).await.unwrap().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(ReceiptService::pdf_filename(fee_entry_id), format!("receipt_{}.pdf", fee_entry_id));
    }
}
