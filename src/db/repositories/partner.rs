use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{partners, prelude::*};

#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    pub logo_base64: Option<String>,
    pub locale: String,
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<partners::Model> for Partner {
    fn from(m: partners::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            url: m.url,
            logo_base64: m.logo_base64,
            locale: m.locale,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerInput {
    pub name: String,
    pub url: Option<String>,
    pub logo_base64: Option<String>,
    pub locale: String,
    pub sort_order: i32,
}

impl PartnerInput {
    fn apply(self, active: &mut partners::ActiveModel) {
        active.name = Set(self.name);
        active.url = Set(self.url);
        active.logo_base64 = Set(self.logo_base64);
        active.locale = Set(self.locale);
        active.sort_order = Set(self.sort_order);
    }
}

pub struct PartnerRepository {
    conn: DatabaseConnection,
}

impl PartnerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Ordered by `sort_order`, newest first within the same position.
    pub async fn list(&self, locale: Option<&str>) -> Result<Vec<Partner>> {
        let mut query = Partners::find();
        if let Some(locale) = locale {
            query = query.filter(partners::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_asc(partners::Column::SortOrder)
            .order_by_desc(partners::Column::CreatedAt)
            .order_by_desc(partners::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Partner::from).collect())
    }

    pub async fn create(&self, input: PartnerInput) -> Result<Partner> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = partners::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        Ok(Partner::from(active.insert(&self.conn).await?))
    }

    pub async fn update(&self, id: i32, input: PartnerInput) -> Result<Option<Partner>> {
        let Some(existing) = Partners::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: partners::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(Partner::from(active.update(&self.conn).await?)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Partners::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
