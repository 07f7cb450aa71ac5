use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use tracing::info;

use super::{WriteOutcome, is_unique_violation};
use crate::entities::{blog_posts, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub cover_base64: Option<String>,
    pub locale: String,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<blog_posts::Model> for BlogPost {
    fn from(m: blog_posts::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            body: m.body,
            excerpt: m.excerpt,
            cover_base64: m.cover_base64,
            locale: m.locale,
            is_published: m.is_published,
            published_at: m.published_at,
            seo_title: m.seo_title,
            seo_description: m.seo_description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub cover_base64: Option<String>,
    pub locale: String,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

impl BlogPostInput {
    fn apply(self, active: &mut blog_posts::ActiveModel) {
        active.title = Set(self.title);
        active.slug = Set(self.slug);
        active.body = Set(self.body);
        active.excerpt = Set(self.excerpt);
        active.cover_base64 = Set(self.cover_base64);
        active.locale = Set(self.locale);
        active.is_published = Set(self.is_published);
        active.published_at = Set(self.published_at);
        active.seo_title = Set(self.seo_title);
        active.seo_description = Set(self.seo_description);
    }
}

pub struct BlogRepository {
    conn: DatabaseConnection,
}

impl BlogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<BlogPost>> {
        let rows = BlogPosts::find()
            .order_by_desc(blog_posts::Column::CreatedAt)
            .order_by_desc(blog_posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    /// Published posts, newest first, posts without a publication date last.
    pub async fn list_published(&self, locale: Option<&str>) -> Result<Vec<BlogPost>> {
        let mut query = BlogPosts::find().filter(blog_posts::Column::IsPublished.eq(true));
        if let Some(locale) = locale {
            query = query.filter(blog_posts::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_asc(Expr::col(blog_posts::Column::PublishedAt).is_null())
            .order_by_desc(blog_posts::Column::PublishedAt)
            .order_by_desc(blog_posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    pub async fn get_published_by_slug(
        &self,
        slug: &str,
        locale: Option<&str>,
    ) -> Result<Option<BlogPost>> {
        let mut query = BlogPosts::find()
            .filter(blog_posts::Column::Slug.eq(slug))
            .filter(blog_posts::Column::IsPublished.eq(true));
        if let Some(locale) = locale {
            query = query.filter(blog_posts::Column::Locale.eq(locale));
        }

        Ok(query.one(&self.conn).await?.map(BlogPost::from))
    }

    pub async fn create(&self, input: BlogPostInput) -> Result<WriteOutcome<BlogPost>> {
        if slug_taken(&self.conn, &input.slug, None).await? {
            return Ok(WriteOutcome::SlugTaken);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let mut active = blog_posts::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!("Created blog post {}", model.slug);
                Ok(WriteOutcome::Done(BlogPost::from(model)))
            }
            Err(e) if is_unique_violation(&e) => Ok(WriteOutcome::SlugTaken),
            Err(e) => Err(e).context("Failed to insert blog post"),
        }
    }

    pub async fn update(&self, id: i32, input: BlogPostInput) -> Result<WriteOutcome<BlogPost>> {
        let Some(existing) = BlogPosts::find_by_id(id).one(&self.conn).await? else {
            return Ok(WriteOutcome::NotFound);
        };

        if input.slug != existing.slug && slug_taken(&self.conn, &input.slug, Some(id)).await? {
            return Ok(WriteOutcome::SlugTaken);
        }

        let mut active: blog_posts::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        match active.update(&self.conn).await {
            Ok(model) => Ok(WriteOutcome::Done(BlogPost::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(WriteOutcome::SlugTaken),
            Err(e) => Err(e).context("Failed to update blog post"),
        }
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = BlogPosts::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}

async fn slug_taken<C>(db: &C, slug: &str, except_id: Option<i32>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let mut query = BlogPosts::find().filter(blog_posts::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(blog_posts::Column::Id.ne(id));
    }

    Ok(query.one(db).await?.is_some())
}
