use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique, indexed)]
    pub slug: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub cover_base64: Option<String>,

    #[sea_orm(indexed)]
    pub locale: String,

    #[sea_orm(indexed)]
    pub is_published: bool,

    /// RFC 3339; unpublished drafts usually have none
    pub published_at: Option<String>,

    pub seo_title: Option<String>,

    pub seo_description: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
