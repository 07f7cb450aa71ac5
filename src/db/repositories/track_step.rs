use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, track_steps};

/// One step of the learning track shown on the landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStep {
    pub id: i32,
    pub title: String,
    pub body: Option<String>,
    pub sort_order: i32,
    pub course_links: Option<serde_json::Value>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<track_steps::Model> for TrackStep {
    fn from(m: track_steps::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            body: m.body,
            sort_order: m.sort_order,
            course_links: m.course_links,
            locale: m.locale,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackStepInput {
    pub title: String,
    pub body: Option<String>,
    pub sort_order: i32,
    pub course_links: Option<serde_json::Value>,
    pub locale: String,
}

impl TrackStepInput {
    fn apply(self, active: &mut track_steps::ActiveModel) {
        active.title = Set(self.title);
        active.body = Set(self.body);
        active.sort_order = Set(self.sort_order);
        active.course_links = Set(self.course_links);
        active.locale = Set(self.locale);
    }
}

pub struct TrackStepRepository {
    conn: DatabaseConnection,
}

impl TrackStepRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Steps in display order.
    pub async fn list(&self, locale: Option<&str>) -> Result<Vec<TrackStep>> {
        let mut query = TrackSteps::find();
        if let Some(locale) = locale {
            query = query.filter(track_steps::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_asc(track_steps::Column::SortOrder)
            .order_by_asc(track_steps::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(TrackStep::from).collect())
    }

    pub async fn create(&self, input: TrackStepInput) -> Result<TrackStep> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = track_steps::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        Ok(TrackStep::from(active.insert(&self.conn).await?))
    }

    pub async fn update(&self, id: i32, input: TrackStepInput) -> Result<Option<TrackStep>> {
        let Some(existing) = TrackSteps::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: track_steps::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(TrackStep::from(active.update(&self.conn).await?)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = TrackSteps::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
