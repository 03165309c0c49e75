use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn, Level};

use fee_register_backend::config::AppConfig;
use fee_register_backend::domain::export_service::ExportService;
use fee_register_backend::domain::payment_service::PaymentService;
use fee_register_backend::domain::receipt_service::ReceiptService;
use fee_register_backend::domain::report_service::ReportService;
use fee_register_backend::domain::student_service::StudentService;
use fee_register_backend::notify::email::SmtpRelay;
use fee_register_backend::notify::sms::SmsGateway;
use fee_register_backend::notify::{EmailChannel, NotificationDispatcher, SmsChannel};
use fee_register_backend::rest::{self, AppState};
use fee_register_backend::storage::sqlite::{
    DbConnection, SqliteFeeRepository, SqliteStudentRepository,
};
use fee_register_backend::storage::{FeeStore, StudentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::from_env();
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    let students: Arc<dyn StudentStore> = Arc::new(SqliteStudentRepository::new(db.clone()));
    let fees: Arc<dyn FeeStore> = Arc::new(SqliteFeeRepository::new(db));

    let timeout = Duration::from_secs(config.notify_timeout_secs);
    let sms: Option<Arc<dyn SmsChannel>> = match &config.sms {
        Some(sms_config) => Some(Arc::new(SmsGateway::new(sms_config, timeout)?)),
        None => {
            info!("SMS gateway not configured, SMS notifications disabled");
            None
        }
    };
    let email: Option<Arc<dyn EmailChannel>> = match &config.smtp {
        Some(smtp_config) => match SmtpRelay::new(smtp_config, timeout) {
            Ok(relay) => Some(Arc::new(relay)),
            Err(e) => {
                warn!("SMTP relay setup failed, email notifications disabled: {:?}", e);
                None
            }
        },
        None => {
            info!("SMTP relay not configured, email notifications disabled");
            None
        }
    };
    let dispatcher = Arc::new(NotificationDispatcher::new(sms, email));

    let student_service = StudentService::new(students.clone(), fees.clone());
    let state = AppState {
        student_service: student_service.clone(),
        payment_service: PaymentService::new(
            student_service,
            students.clone(),
            fees.clone(),
            dispatcher,
        ),
        report_service: ReportService::new(students.clone(), fees.clone()),
        export_service: ExportService::new(students, fees.clone()),
        receipt_service: ReceiptService::new(
            fees,
            config.pdf_enabled,
            config.institution_name.clone(),
        ),
    };

    let app = rest::router(state, config.api_token.clone());

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
