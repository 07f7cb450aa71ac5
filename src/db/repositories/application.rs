use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::domain::ApplicationStatus;
use crate::entities::{applications, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub tg_username: String,
    pub course_id: Option<i32>,
    pub course_title: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<applications::Model> for Application {
    fn from(m: applications::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            tg_username: m.tg_username,
            course_id: m.course_id,
            course_title: m.course_title,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub name: String,
    pub phone: String,
    pub tg_username: String,
    pub course_id: Option<i32>,
    pub course_title: Option<String>,
}

pub struct ApplicationRepository {
    conn: DatabaseConnection,
}

impl ApplicationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewApplication) -> Result<Application> {
        let model = applications::ActiveModel {
            name: Set(new.name),
            phone: Set(new.phone),
            tg_username: Set(new.tg_username),
            course_id: Set(new.course_id),
            course_title: Set(new.course_title),
            status: Set(ApplicationStatus::New.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Recorded application {} for {:?}", model.id, model.course_title);
        Ok(Application::from(model))
    }

    pub async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<Application>> {
        let mut query = Applications::find();
        if let Some(status) = status {
            query = query.filter(applications::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_desc(applications::Column::CreatedAt)
            .order_by_desc(applications::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Application::from).collect())
    }

    pub async fn set_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let Some(existing) = Applications::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: applications::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        let model = active.update(&self.conn).await?;

        Ok(Some(Application::from(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Applications::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
