use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{contact_info, prelude::*};

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i32,
    pub locale: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub map_embed: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<contact_info::Model> for Contact {
    fn from(m: contact_info::Model) -> Self {
        Self {
            id: m.id,
            locale: m.locale,
            address: m.address,
            phone: m.phone,
            email: m.email,
            socials: m.socials,
            map_embed: m.map_embed,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInput {
    pub locale: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub map_embed: Option<String>,
}

impl ContactInput {
    fn apply(self, active: &mut contact_info::ActiveModel) {
        active.locale = Set(self.locale);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.email = Set(self.email);
        active.socials = Set(self.socials);
        active.map_embed = Set(self.map_embed);
    }
}

pub struct ContactRepository {
    conn: DatabaseConnection,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Contact>> {
        let rows = ContactInfo::find()
            .order_by_asc(contact_info::Column::Locale)
            .order_by_asc(contact_info::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    /// The oldest contact block, optionally restricted to `locale`.
    pub async fn first(&self, locale: Option<&str>) -> Result<Option<Contact>> {
        let mut query = ContactInfo::find();
        if let Some(locale) = locale {
            query = query.filter(contact_info::Column::Locale.eq(locale));
        }

        let row = query
            .order_by_asc(contact_info::Column::Id)
            .one(&self.conn)
            .await?;

        Ok(row.map(Contact::from))
    }

    pub async fn create(&self, input: ContactInput) -> Result<Contact> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = contact_info::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        Ok(Contact::from(active.insert(&self.conn).await?))
    }

    pub async fn update(&self, id: i32, input: ContactInput) -> Result<Option<Contact>> {
        let Some(existing) = ContactInfo::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: contact_info::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(Contact::from(active.update(&self.conn).await?)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = ContactInfo::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
