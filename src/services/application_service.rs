use std::sync::Arc;

use tracing::info;

use crate::db::{Application, NewApplication, Store};
use crate::domain::ApplicationStatus;
use crate::services::course_service::ContentError;
use crate::services::notification::{Notifier, application_message, dispatch};

/// A public application whose fields have already been validated and normalized.
#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub name: String,
    pub phone: String,
    pub tg_username: String,
    pub course: Option<String>,
    pub course_id: Option<i32>,
}

/// Records course applications and notifies staff about new ones.
pub struct ApplicationService {
    store: Store,
    notifier: Arc<dyn Notifier>,
}

impl ApplicationService {
    #[must_use]
    pub fn new(store: Store, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Persists the application with status `new`, then notifies in the background.
    ///
    /// The course is looked up by id when one is given, otherwise by exact name.
    /// An unmatched course keeps the submitted name as a free-text title.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<Application, ContentError> {
        let courses = self.store.courses();
        let course = match (submission.course_id, submission.course.as_deref()) {
            (Some(id), _) => courses.get(id).await?,
            (None, Some(name)) if !name.trim().is_empty() => courses.get_by_name(name.trim()).await?,
            _ => None,
        };

        let course_title = course
            .as_ref()
            .map(|c| c.name.clone())
            .or_else(|| submission.course.filter(|c| !c.trim().is_empty()));

        let application = self
            .store
            .applications()
            .create(NewApplication {
                name: submission.name,
                phone: submission.phone,
                tg_username: submission.tg_username,
                course_id: course.as_ref().map(|c| c.id),
                course_title,
            })
            .await?;

        dispatch(
            Arc::clone(&self.notifier),
            application_message(&application, course.as_ref()),
        );

        Ok(application)
    }

    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ContentError> {
        Ok(self.store.applications().list(status).await?)
    }

    pub async fn set_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Application, ContentError> {
        let updated = self
            .store
            .applications()
            .set_status(id, status)
            .await?
            .ok_or_else(|| ContentError::NotFound(format!("Application {id}")))?;

        info!("Application {} moved to {}", id, status);
        Ok(updated)
    }

    pub async fn remove(&self, id: i32) -> Result<(), ContentError> {
        if self.store.applications().remove(id).await? {
            info!("Deleted application {}", id);
            Ok(())
        } else {
            Err(ContentError::NotFound(format!("Application {id}")))
        }
    }
}
