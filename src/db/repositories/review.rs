use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, reviews};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub is_visible: bool,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<reviews::Model> for Review {
    fn from(m: reviews::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role: m.role,
            quote: m.quote,
            is_visible: m.is_visible,
            locale: m.locale,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub is_visible: bool,
    pub locale: String,
}

impl ReviewInput {
    fn apply(self, active: &mut reviews::ActiveModel) {
        active.name = Set(self.name);
        active.role = Set(self.role);
        active.quote = Set(self.quote);
        active.is_visible = Set(self.is_visible);
        active.locale = Set(self.locale);
    }
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn list_visible(&self, locale: Option<&str>) -> Result<Vec<Review>> {
        let mut query = Reviews::find().filter(reviews::Column::IsVisible.eq(true));
        if let Some(locale) = locale {
            query = query.filter(reviews::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn create(&self, input: ReviewInput) -> Result<Review> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = reviews::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        Ok(Review::from(active.insert(&self.conn).await?))
    }

    pub async fn update(&self, id: i32, input: ReviewInput) -> Result<Option<Review>> {
        let Some(existing) = Reviews::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: reviews::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(Review::from(active.update(&self.conn).await?)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Reviews::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
