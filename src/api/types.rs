use serde::{Deserialize, Serialize};

use crate::db::{
    Application, BlogPost, Contact, Course, FamilySync, Partner, Review, Teacher, TrackStep,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Optional `?locale=` filter shared by public listings.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: i32,
    pub name: String,
    pub language: String,
    pub level: Option<String>,
    pub price: Option<String>,
    pub discount: Option<String>,
    pub duration: Option<String>,
    pub advantages: Vec<String>,
    pub is_active: bool,
    pub slug: String,
    pub description: Option<String>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseDto {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            language: c.language,
            level: c.level,
            price: c.price,
            discount: c.discount,
            duration: c.duration,
            advantages: c.advantages.unwrap_or_default(),
            is_active: c.is_active,
            slug: c.slug,
            description: c.description,
            locale: c.locale,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Rows touched by a family-wide course mutation.
#[derive(Debug, Serialize)]
pub struct FamilySyncDto {
    pub base_slug: String,
    pub rows_affected: u64,
}

impl From<FamilySync> for FamilySyncDto {
    fn from(f: FamilySync) -> Self {
        Self {
            base_slug: f.base_slug,
            rows_affected: f.rows_affected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseUpdateDto {
    pub course: CourseDto,
    pub family: FamilySyncDto,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDto {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub tg_username: String,
    pub course_id: Option<i32>,
    pub course_title: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Application> for ApplicationDto {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            name: a.name,
            phone: a.phone,
            tg_username: a.tg_username,
            course_id: a.course_id,
            course_title: a.course_title,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeacherDto {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub photo_base64: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Teacher> for TeacherDto {
    fn from(t: Teacher) -> Self {
        Self {
            id: t.id,
            name: t.name,
            bio: t.bio,
            photo_base64: t.photo_base64,
            socials: t.socials,
            locale: t.locale,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub is_visible: bool,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            name: r.name,
            role: r.role,
            quote: r.quote,
            is_visible: r.is_visible,
            locale: r.locale,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostDto {
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

impl From<BlogPost> for BlogPostDto {
    fn from(p: BlogPost) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            body: p.body,
            excerpt: p.excerpt,
            cover_base64: p.cover_base64,
            locale: p.locale,
            is_published: p.is_published,
            published_at: p.published_at,
            seo_title: p.seo_title,
            seo_description: p.seo_description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct TrackStepDto {
    pub id: i32,
    pub title: String,
    pub body: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub course_links: Option<serde_json::Value>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TrackStep> for TrackStepDto {
    fn from(t: TrackStep) -> Self {
        Self {
            id: t.id,
            title: t.title,
            body: t.body,
            sort_order: t.sort_order,
            course_links: t.course_links,
            locale: t.locale,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PartnerDto {
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    pub logo_base64: Option<String>,
    pub locale: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Partner> for PartnerDto {
    fn from(p: Partner) -> Self {
        Self {
            id: p.id,
            name: p.name,
            url: p.url,
            logo_base64: p.logo_base64,
            locale: p.locale,
            sort_order: p.sort_order,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactDto {
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

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            locale: c.locale,
            address: c.address,
            phone: c.phone,
            email: c.email,
            socials: c.socials,
            map_embed: c.map_embed,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
