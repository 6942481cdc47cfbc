use crate::markdown::Heading;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A language a post can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Ja,
}

pub const VALID_LOCALES: [Locale; 3] = [Locale::En, Locale::Es, Locale::Ja];

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Ja => "ja",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        VALID_LOCALES
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| anyhow!("unknown locale `{s}` (expected one of en, es, ja)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Hiragana,
    Katakana,
    Kanji,
    Vocabulary,
    Grammar,
    Culture,
    StudyTips,
}

pub const VALID_CATEGORIES: &[&str] = &[
    "hiragana",
    "katakana",
    "kanji",
    "vocabulary",
    "grammar",
    "culture",
    "study-tips",
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Hiragana => "hiragana",
            Category::Katakana => "katakana",
            Category::Kanji => "kanji",
            Category::Vocabulary => "vocabulary",
            Category::Grammar => "grammar",
            Category::Culture => "culture",
            Category::StudyTips => "study-tips",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

pub const VALID_DIFFICULTIES: &[&str] = &["beginner", "intermediate", "advanced"];

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Everything about a post except its body: the front matter, plus the
/// fields we derive from the file (slug, locale) and its contents (reading
/// time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostMeta {
    pub title: String,
    pub description: String,
    /// The file name without its extension.
    pub slug: String,
    pub published_at: String,
    pub updated_at: Option<String>,
    pub author: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    /// Estimated minutes to read.
    pub reading_time: u32,
    pub difficulty: Option<Difficulty>,
    pub related_posts: Option<Vec<String>>,
    /// The locale the post was actually read in. When a translation is
    /// missing and we fall back, this is the fallback locale.
    pub locale: Locale,
}

/// A fully loaded post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub meta: BlogPostMeta,
    /// The Markdown body, without front matter.
    pub content: String,
    pub headings: Vec<Heading>,
}
