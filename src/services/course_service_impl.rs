//! `SeaORM` implementation of the `CourseService` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{Course, CourseInput, FamilySync, Store, WriteOutcome};
use crate::domain::{CourseId, LocaleFamilyResolver, LocaleSet};
use crate::services::course_service::{ContentError, CourseService, CourseUpdate};

pub struct SeaOrmCourseService {
    store: Store,
    resolver: Arc<dyn LocaleFamilyResolver>,
    locales: LocaleSet,
}

impl SeaOrmCourseService {
    #[must_use]
    pub fn new(store: Store, resolver: Arc<dyn LocaleFamilyResolver>, locales: LocaleSet) -> Self {
        Self {
            store,
            resolver,
            locales,
        }
    }

    fn validate(&self, input: &CourseInput) -> Result<(), ContentError> {
        if input.name.trim().is_empty() {
            return Err(ContentError::Validation("Course name is required".to_string()));
        }
        if input.slug.trim().is_empty() {
            return Err(ContentError::Validation("Course slug is required".to_string()));
        }
        if !self.locales.contains(&input.locale) {
            return Err(ContentError::Validation(format!(
                "Unknown locale '{}', expected one of: {}",
                input.locale, self.locales
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseService for SeaOrmCourseService {
    async fn list_all(&self) -> Result<Vec<Course>, ContentError> {
        Ok(self.store.courses().list_all().await?)
    }

    async fn list_active(&self, locale: Option<&str>) -> Result<Vec<Course>, ContentError> {
        Ok(self.store.courses().list_active(locale).await?)
    }

    async fn get_by_slug(
        &self,
        slug: &str,
        locale: Option<&str>,
    ) -> Result<Course, ContentError> {
        self.store
            .courses()
            .get_by_slug(slug, locale)
            .await?
            .ok_or_else(|| ContentError::NotFound("Course".to_string()))
    }

    async fn create(&self, input: CourseInput) -> Result<Course, ContentError> {
        self.validate(&input)?;
        let slug = input.slug.clone();

        match self.store.courses().create(input).await? {
            WriteOutcome::Done(course) => Ok(course),
            WriteOutcome::SlugTaken => Err(ContentError::Conflict(slug)),
            WriteOutcome::NotFound => Err(ContentError::NotFound("Course".to_string())),
        }
    }

    async fn update(
        &self,
        id: CourseId,
        input: CourseInput,
    ) -> Result<CourseUpdate, ContentError> {
        self.validate(&input)?;
        let slug = input.slug.clone();

        match self
            .store
            .courses()
            .update_with_family(id.value(), input, self.resolver.as_ref())
            .await?
        {
            WriteOutcome::Done((course, family)) => Ok(CourseUpdate { course, family }),
            WriteOutcome::NotFound => Err(ContentError::NotFound(format!("Course {id}"))),
            WriteOutcome::SlugTaken => Err(ContentError::Conflict(slug)),
        }
    }

    async fn delete(&self, id: CourseId) -> Result<FamilySync, ContentError> {
        match self
            .store
            .courses()
            .delete_family(id.value(), self.resolver.as_ref())
            .await?
        {
            WriteOutcome::Done(family) => Ok(family),
            WriteOutcome::NotFound | WriteOutcome::SlugTaken => {
                Err(ContentError::NotFound(format!("Course {id}")))
            }
        }
    }
}
