use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LikeExpr},
};
use tracing::info;

use super::{WriteOutcome, is_unique_violation};
use crate::domain::locale::{FamilyPattern, LIKE_ESCAPE, LocaleFamilyResolver};
use crate::entities::{courses, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub language: String,
    pub level: Option<String>,
    pub price: Option<String>,
    pub discount: Option<String>,
    pub duration: Option<String>,
    pub advantages: Option<Vec<String>>,
    pub is_active: bool,
    pub slug: String,
    pub description: Option<String>,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<courses::Model> for Course {
    fn from(m: courses::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            language: m.language,
            level: m.level,
            price: m.price,
            discount: m.discount,
            duration: m.duration,
            advantages: m
                .advantages
                .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok()),
            is_active: m.is_active,
            slug: m.slug,
            description: m.description,
            locale: m.locale,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Every writable course field. Updates replace all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
    pub language: String,
    pub level: Option<String>,
    pub price: Option<String>,
    pub discount: Option<String>,
    pub duration: Option<String>,
    pub advantages: Option<Vec<String>>,
    pub is_active: bool,
    pub slug: String,
    pub description: Option<String>,
    pub locale: String,
}

impl CourseInput {
    fn apply(self, active: &mut courses::ActiveModel) {
        active.name = Set(self.name);
        active.language = Set(self.language);
        active.level = Set(self.level);
        active.price = Set(self.price);
        active.discount = Set(self.discount);
        active.duration = Set(self.duration);
        active.advantages = Set(self.advantages.map(|a| serde_json::json!(a)));
        active.is_active = Set(self.is_active);
        active.slug = Set(self.slug);
        active.description = Set(self.description);
        active.locale = Set(self.locale);
    }
}

/// What a family-wide mutation touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySync {
    pub base_slug: String,
    pub rows_affected: u64,
}

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .order_by_desc(courses::Column::CreatedAt)
            .order_by_desc(courses::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    pub async fn list_active(&self, locale: Option<&str>) -> Result<Vec<Course>> {
        let mut query = Courses::find().filter(courses::Column::IsActive.eq(true));
        if let Some(locale) = locale {
            query = query.filter(courses::Column::Locale.eq(locale));
        }

        let rows = query
            .order_by_desc(courses::Column::CreatedAt)
            .order_by_desc(courses::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Course>> {
        let row = Courses::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Course::from))
    }

    pub async fn get_by_slug(&self, slug: &str, locale: Option<&str>) -> Result<Option<Course>> {
        let mut query = Courses::find().filter(courses::Column::Slug.eq(slug));
        if let Some(locale) = locale {
            query = query.filter(courses::Column::Locale.eq(locale));
        }

        Ok(query.one(&self.conn).await?.map(Course::from))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Course>> {
        let row = Courses::find()
            .filter(courses::Column::Name.eq(name))
            .order_by_asc(courses::Column::Id)
            .one(&self.conn)
            .await?;

        Ok(row.map(Course::from))
    }

    pub async fn create(&self, input: CourseInput) -> Result<WriteOutcome<Course>> {
        if slug_taken(&self.conn, &input.slug, None).await? {
            return Ok(WriteOutcome::SlugTaken);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let mut active = courses::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply(&mut active);

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!("Created course {} ({})", model.slug, model.locale);
                Ok(WriteOutcome::Done(Course::from(model)))
            }
            Err(e) if is_unique_violation(&e) => Ok(WriteOutcome::SlugTaken),
            Err(e) => Err(e).context("Failed to insert course"),
        }
    }

    /// Replaces the fields of course `id`, then sets `is_active` on every row
    /// of the family the course belonged to before the update. One transaction.
    pub async fn update_with_family(
        &self,
        id: i32,
        input: CourseInput,
        resolver: &dyn LocaleFamilyResolver,
    ) -> Result<WriteOutcome<(Course, FamilySync)>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Courses::find_by_id(id).one(&txn).await? else {
            return Ok(WriteOutcome::NotFound);
        };

        if input.slug != existing.slug && slug_taken(&txn, &input.slug, Some(id)).await? {
            return Ok(WriteOutcome::SlugTaken);
        }

        let family = resolver.family_of(&existing.slug);
        let is_active = input.is_active;
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: courses::ActiveModel = existing.into();
        input.apply(&mut active);
        active.updated_at = Set(now.clone());

        let updated = match active.update(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => return Ok(WriteOutcome::SlugTaken),
            Err(e) => return Err(e).context("Failed to update course"),
        };

        let member_ids = family_member_ids(&txn, &family).await?;
        let rows_affected = if member_ids.is_empty() {
            0
        } else {
            Courses::update_many()
                .col_expr(courses::Column::IsActive, Expr::value(is_active))
                .col_expr(courses::Column::UpdatedAt, Expr::value(now))
                .filter(courses::Column::Id.is_in(member_ids))
                .exec(&txn)
                .await
                .context("Failed to sync activation across locale family")?
                .rows_affected
        };

        txn.commit().await?;

        info!(
            "Updated course {} and set is_active={} on {} row(s) of family '{}'",
            id,
            is_active,
            rows_affected,
            family.base()
        );

        Ok(WriteOutcome::Done((
            Course::from(updated),
            FamilySync {
                base_slug: family.base().to_string(),
                rows_affected,
            },
        )))
    }

    /// Deletes course `id` together with every other locale variant of it. One transaction.
    pub async fn delete_family(
        &self,
        id: i32,
        resolver: &dyn LocaleFamilyResolver,
    ) -> Result<WriteOutcome<FamilySync>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Courses::find_by_id(id).one(&txn).await? else {
            return Ok(WriteOutcome::NotFound);
        };

        let family = resolver.family_of(&existing.slug);
        let mut member_ids = family_member_ids(&txn, &family).await?;
        if !member_ids.contains(&id) {
            member_ids.push(id);
        }

        let result = Courses::delete_many()
            .filter(courses::Column::Id.is_in(member_ids))
            .exec(&txn)
            .await
            .context("Failed to delete locale family")?;

        txn.commit().await?;

        info!(
            "Deleted {} course row(s) of family '{}' (requested id {})",
            result.rows_affected,
            family.base(),
            id
        );

        Ok(WriteOutcome::Done(FamilySync {
            base_slug: family.base().to_string(),
            rows_affected: result.rows_affected,
        }))
    }
}

/// IDs of every row whose slug is the family base or `base-<anything>`.
async fn family_member_ids<C>(db: &C, family: &FamilyPattern) -> Result<Vec<i32>>
where
    C: ConnectionTrait,
{
    let candidates: Vec<(i32, String)> = Courses::find()
        .select_only()
        .column(courses::Column::Id)
        .column(courses::Column::Slug)
        .filter(
            Condition::any()
                .add(courses::Column::Slug.eq(family.base()))
                .add(
                    courses::Column::Slug
                        .like(LikeExpr::new(family.like_pattern()).escape(LIKE_ESCAPE)),
                ),
        )
        .into_tuple()
        .all(db)
        .await
        .context("Failed to query locale family")?;

    Ok(candidates
        .into_iter()
        .filter(|(_, slug)| family.matches(slug))
        .map(|(id, _)| id)
        .collect())
}

async fn slug_taken<C>(db: &C, slug: &str, except_id: Option<i32>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let mut query = Courses::find().filter(courses::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(courses::Column::Id.ne(id));
    }

    Ok(query.one(db).await?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::domain::{LocaleSet, SuffixFamilyResolver};

    fn resolver() -> SuffixFamilyResolver {
        SuffixFamilyResolver::new(LocaleSet::new(["ru", "uz", "en", "ja"]))
    }

    fn input(slug: &str, locale: &str) -> CourseInput {
        CourseInput {
            name: format!("Course {slug}"),
            language: "Japanese".to_string(),
            level: None,
            price: None,
            discount: None,
            duration: None,
            advantages: Some(vec!["Small groups".to_string()]),
            is_active: true,
            slug: slug.to_string(),
            description: None,
            locale: locale.to_string(),
        }
    }

    async fn seed(repo: &CourseRepository, slug: &str, locale: &str) -> Course {
        match repo.create(input(slug, locale)).await.unwrap() {
            WriteOutcome::Done(course) => course,
            _ => panic!("failed to seed {slug}"),
        }
    }

    async fn active_slugs(repo: &CourseRepository) -> Vec<String> {
        let mut slugs: Vec<String> = repo
            .list_active(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.slug)
            .collect();
        slugs.sort();
        slugs
    }

    #[tokio::test]
    async fn test_deactivation_spreads_to_family_only() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        let ru = seed(&repo, "intro", "ru").await;
        seed(&repo, "intro-en", "en").await;
        seed(&repo, "intro-ja", "ja").await;
        seed(&repo, "introduction", "ru").await;

        let mut update = input("intro", "ru");
        update.is_active = false;

        let WriteOutcome::Done((course, sync)) =
            repo.update_with_family(ru.id, update, &resolver()).await.unwrap()
        else {
            panic!("expected update to succeed");
        };

        assert!(!course.is_active);
        assert_eq!(sync.base_slug, "intro");
        assert_eq!(sync.rows_affected, 3);
        assert_eq!(active_slugs(&repo).await, vec!["introduction"]);
    }

    #[tokio::test]
    async fn test_family_uses_slug_before_rename() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        let en = seed(&repo, "intro-en", "en").await;
        seed(&repo, "intro", "ru").await;

        let mut update = input("intro-english", "en");
        update.is_active = false;

        let WriteOutcome::Done((course, sync)) =
            repo.update_with_family(en.id, update, &resolver()).await.unwrap()
        else {
            panic!("expected update to succeed");
        };

        assert_eq!(course.slug, "intro-english");
        assert_eq!(sync.base_slug, "intro");
        assert!(active_slugs(&repo).await.is_empty());
    }

    #[tokio::test]
    async fn test_like_metacharacters_are_literal() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        let sale = seed(&repo, "50%-off", "ru").await;
        seed(&repo, "50%-off-en", "en").await;
        seed(&repo, "50-percent-off-en", "en").await;
        seed(&repo, "a_b", "ru").await;
        seed(&repo, "axb-en", "en").await;

        let WriteOutcome::Done(sync) = repo.delete_family(sale.id, &resolver()).await.unwrap()
        else {
            panic!("expected delete to succeed");
        };
        assert_eq!(sync.rows_affected, 2);

        let a_b = repo.get_by_slug("a_b", None).await.unwrap().unwrap();
        let WriteOutcome::Done(sync) = repo.delete_family(a_b.id, &resolver()).await.unwrap()
        else {
            panic!("expected delete to succeed");
        };
        assert_eq!(sync.rows_affected, 1);

        assert_eq!(
            active_slugs(&repo).await,
            vec!["50-percent-off-en", "axb-en"]
        );
    }

    #[tokio::test]
    async fn test_family_match_is_case_sensitive() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        let intro = seed(&repo, "intro", "ru").await;
        seed(&repo, "INTRO-en", "en").await;

        let WriteOutcome::Done(sync) = repo.delete_family(intro.id, &resolver()).await.unwrap()
        else {
            panic!("expected delete to succeed");
        };

        assert_eq!(sync.rows_affected, 1);
        assert_eq!(active_slugs(&repo).await, vec!["INTRO-en"]);
    }

    #[tokio::test]
    async fn test_missing_course_changes_nothing() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();
        seed(&repo, "intro", "ru").await;

        let mut update = input("intro", "ru");
        update.is_active = false;

        assert!(matches!(
            repo.update_with_family(999, update, &resolver()).await.unwrap(),
            WriteOutcome::NotFound
        ));
        assert!(matches!(
            repo.delete_family(999, &resolver()).await.unwrap(),
            WriteOutcome::NotFound
        ));
        assert_eq!(active_slugs(&repo).await, vec!["intro"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_reported() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        seed(&repo, "intro", "ru").await;
        let other = seed(&repo, "grammar", "ru").await;

        assert!(matches!(
            repo.create(input("intro", "en")).await.unwrap(),
            WriteOutcome::SlugTaken
        ));
        assert!(matches!(
            repo.update_with_family(other.id, input("intro", "ru"), &resolver())
                .await
                .unwrap(),
            WriteOutcome::SlugTaken
        ));
        assert_eq!(
            repo.get(other.id).await.unwrap().unwrap().slug,
            "grammar"
        );
    }

    #[tokio::test]
    async fn test_advantages_round_trip_as_list() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = store.courses();

        let course = seed(&repo, "intro", "ru").await;
        let loaded = repo.get(course.id).await.unwrap().unwrap();

        assert_eq!(loaded.advantages, Some(vec!["Small groups".to_string()]));
    }
}
