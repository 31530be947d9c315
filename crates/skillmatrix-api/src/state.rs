//! Application state wiring all services together.
//!
//! Services are generic over the repository/notifier traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use skillmatrix_core::service::employee::EmployeeProfileService;
use skillmatrix_core::service::pending::PendingReviewService;
use skillmatrix_core::service::review::ReviewService;
use skillmatrix_core::service::submission::SubmissionService;
use skillmatrix_infra::config::{load_config, resolve_data_dir};
use skillmatrix_infra::notify::HttpNotificationDispatcher;
use skillmatrix_infra::sqlite::catalog::SqliteSkillCatalog;
use skillmatrix_infra::sqlite::claim::SqliteClaimRepository;
use skillmatrix_infra::sqlite::employee::SqliteEmployeeDirectory;
use skillmatrix_infra::sqlite::pool::DatabasePool;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSubmissionService = SubmissionService<
    SqliteEmployeeDirectory,
    SqliteSkillCatalog,
    SqliteClaimRepository,
    HttpNotificationDispatcher,
>;

pub type ConcreteReviewService = ReviewService<SqliteClaimRepository>;

pub type ConcretePendingService = PendingReviewService<SqliteClaimRepository>;

pub type ConcreteProfileService =
    EmployeeProfileService<SqliteEmployeeDirectory, SqliteClaimRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<ConcreteSubmissionService>,
    pub review_service: Arc<ConcreteReviewService>,
    pub pending_service: Arc<ConcretePendingService>,
    pub profile_service: Arc<ConcreteProfileService>,
    pub catalog: Arc<SqliteSkillCatalog>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("skillmatrix.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_config(&data_dir).await;

        // Each repository is a thin handle over the shared pool.
        let submission_service = SubmissionService::new(
            SqliteEmployeeDirectory::new(db_pool.clone()),
            SqliteSkillCatalog::new(db_pool.clone()),
            SqliteClaimRepository::new(db_pool.clone()),
            HttpNotificationDispatcher::new(&config),
        );
        let review_service = ReviewService::new(SqliteClaimRepository::new(db_pool.clone()));
        let pending_service =
            PendingReviewService::new(SqliteClaimRepository::new(db_pool.clone()));
        let profile_service = EmployeeProfileService::new(
            SqliteEmployeeDirectory::new(db_pool.clone()),
            SqliteClaimRepository::new(db_pool.clone()),
        );
        let catalog = SqliteSkillCatalog::new(db_pool.clone());

        Ok(Self {
            submission_service: Arc::new(submission_service),
            review_service: Arc::new(review_service),
            pending_service: Arc::new(pending_service),
            profile_service: Arc::new(profile_service),
            catalog: Arc::new(catalog),
            data_dir,
        })
    }
}
