use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, teachers};

#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub photo_base64: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<teachers::Model> for Teacher {
    fn from(m: teachers::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            bio: m.bio,
            photo_base64: m.photo_base64,
            socials: m.socials,
            locale: m.locale,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeacherInput {
    pub name: String,
    pub bio: Option<String>,
    pub photo_base64: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub locale: String,
}

impl TeacherInput {
    fn apply(self, active: &mut teachers::ActiveModel) {
        active.name = Set(self.name);
        active.bio = Set(self.bio);
        active.photo_base64 = Set(self.photo_base64);
        active.socials = Set(self.socials);
        active.locale = Set(self.locale);
    }
}

pub struct TeacherRepository {
    conn: DatabaseConnection,
}

impl TeacherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, locale: Option<&str>) -> Result<Vec<Teacher>> {
        let mut query = Teachers::find();
        if let Some(locale) = locale {
            query = query.filter(teachers::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_desc(teachers::Column::CreatedAt)
            .order_by_desc(teachers::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Teacher::from).collect())
    }

    pub async fn create(&self, input: TeacherInput) -> Result<Teacher> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = teachers::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        Ok(Teacher::from(active.insert(&self.conn).await?))
    }

    pub async fn update(&self, id: i32, input: TeacherInput) -> Result<Option<Teacher>> {
        let Some(existing) = Teachers::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: teachers::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(Teacher::from(active.update(&self.conn).await?)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Teachers::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
