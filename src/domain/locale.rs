//! Locale families: rows that are the same logical item in different languages.
//!
//! A family is keyed by its base slug. Variants use either the bare base or
//! `base-<locale>`, so the base is recovered by stripping one recognized
//! trailing locale segment.
//!
//! Suffix stripping cannot tell `courses-for-en` (a title that happens to end in
//! a locale code) from a real `en` variant of `courses-for`. That ambiguity is
//! left as is until families get an explicit id column; callers only depend on
//! [`LocaleFamilyResolver`].

use std::collections::BTreeSet;
use std::fmt;

/// Character used to escape LIKE metacharacters in family patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Closed set of recognized locale codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    codes: BTreeSet<String>,
}

impl LocaleSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl fmt::Display for LocaleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Derives the language-independent family key of a per-locale slug.
pub trait LocaleFamilyResolver: Send + Sync {
    fn base_slug(&self, slug: &str) -> String;

    /// Builds the pattern that selects every variant of `slug`'s family.
    fn family_of(&self, slug: &str) -> FamilyPattern {
        FamilyPattern::new(self.base_slug(slug))
    }
}

/// Strips a single trailing `-<locale>` segment.
#[derive(Debug, Clone)]
pub struct SuffixFamilyResolver {
    locales: LocaleSet,
}

impl SuffixFamilyResolver {
    #[must_use]
    pub const fn new(locales: LocaleSet) -> Self {
        Self { locales }
    }

    #[must_use]
    pub const fn locales(&self) -> &LocaleSet {
        &self.locales
    }
}

impl LocaleFamilyResolver for SuffixFamilyResolver {
    fn base_slug(&self, slug: &str) -> String {
        match slug.rsplit_once('-') {
            Some((head, last)) if self.locales.contains(last) => {
                if head.is_empty() {
                    slug.to_string()
                } else {
                    head.to_string()
                }
            }
            // A slug without any separator is its own single segment; "en" stays "en".
            _ => slug.to_string(),
        }
    }
}

/// Selector for all rows of one locale family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyPattern {
    base: String,
}

impl FamilyPattern {
    #[must_use]
    pub const fn new(base: String) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// LIKE pattern for `base-%`, with the base escaped using [`LIKE_ESCAPE`].
    #[must_use]
    pub fn like_pattern(&self) -> String {
        format!("{}-%", escape_like(&self.base))
    }

    /// Exact, case-sensitive membership test. LIKE in SQLite folds ASCII case,
    /// so database candidates are re-checked with this.
    #[must_use]
    pub fn matches(&self, slug: &str) -> bool {
        slug == self.base
            || slug
                .strip_prefix(self.base.as_str())
                .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Escapes `%`, `_` and the escape marker itself for use in a LIKE pattern.
#[must_use]
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SuffixFamilyResolver {
        SuffixFamilyResolver::new(LocaleSet::new(["ru", "uz", "en", "ja"]))
    }

    #[test]
    fn test_base_slug_without_locale_suffix() {
        assert_eq!(resolver().base_slug("course-intro"), "course-intro");
        assert_eq!(resolver().base_slug("intro"), "intro");
    }

    #[test]
    fn test_base_slug_strips_recognized_suffix() {
        assert_eq!(resolver().base_slug("course-intro-en"), "course-intro");
        assert_eq!(resolver().base_slug("intro-ja"), "intro");
    }

    #[test]
    fn test_base_slug_only_strips_one_segment() {
        assert_eq!(resolver().base_slug("intro-ru-en"), "intro-ru");
    }

    #[test]
    fn test_base_slug_degenerate_cases() {
        assert_eq!(resolver().base_slug("en"), "en");
        assert_eq!(resolver().base_slug("-en"), "-en");
        assert_eq!(resolver().base_slug(""), "");
    }

    #[test]
    fn test_base_slug_suffix_must_match_exactly() {
        assert_eq!(resolver().base_slug("intro-EN"), "intro-EN");
        assert_eq!(resolver().base_slug("intro-eng"), "intro-eng");
        assert_eq!(resolver().base_slug("intro-"), "intro-");
    }

    #[test]
    fn test_trailing_locale_in_title_is_stripped() {
        // Known ambiguity: indistinguishable from an `en` variant of "courses-for".
        assert_eq!(resolver().base_slug("courses-for-en"), "courses-for");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%-off"), "50\\%-off");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_family_pattern() {
        let family = resolver().family_of("50%-off-en");
        assert_eq!(family.base(), "50%-off");
        assert_eq!(family.like_pattern(), "50\\%-off-%");

        assert!(family.matches("50%-off"));
        assert!(family.matches("50%-off-ja"));
        assert!(!family.matches("50-percent-off"));
        assert!(!family.matches("50%-offer"));
        assert!(!family.matches("50%-OFF-ru"));
    }

    #[test]
    fn test_locale_set() {
        let set = LocaleSet::new(["ru", "en"]);
        assert!(set.contains("ru"));
        assert!(!set.contains("ja"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "en, ru");
    }
}
