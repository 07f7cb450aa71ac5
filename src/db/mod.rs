use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::WriteOutcome;
pub use repositories::admin::{Admin, PasswordCheck};
pub use repositories::application::{Application, NewApplication};
pub use repositories::blog::{BlogPost, BlogPostInput};
pub use repositories::contact::{Contact, ContactInput};
pub use repositories::course::{Course, CourseInput, FamilySync};
pub use repositories::partner::{Partner, PartnerInput};
pub use repositories::review::{Review, ReviewInput};
pub use repositories::teacher::{Teacher, TeacherInput};
pub use repositories::track_step::{TrackStep, TrackStepInput};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every in-memory connection would see its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn admins(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn courses(&self) -> repositories::course::CourseRepository {
        repositories::course::CourseRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn applications(&self) -> repositories::application::ApplicationRepository {
        repositories::application::ApplicationRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn teachers(&self) -> repositories::teacher::TeacherRepository {
        repositories::teacher::TeacherRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn reviews(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn blog(&self) -> repositories::blog::BlogRepository {
        repositories::blog::BlogRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn track_steps(&self) -> repositories::track_step::TrackStepRepository {
        repositories::track_step::TrackStepRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn partners(&self) -> repositories::partner::PartnerRepository {
        repositories::partner::PartnerRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn contacts(&self) -> repositories::contact::ContactRepository {
        repositories::contact::ContactRepository::new(self.conn.clone())
    }
}
