//! Content handling for a Markdown blog: tables of contents with unique
//! anchor IDs, front matter validation, reading-time estimates, and
//! locale-aware post loading.

pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod parallel;
pub mod post;
pub mod store;

pub use config::Config;
pub use frontmatter::{REQUIRED_FRONTMATTER_FIELDS, ValidationResult, validate_frontmatter};
pub use markdown::{Heading, calculate_reading_time, extract_headings, generate_heading_id};
pub use post::{
    BlogPost, BlogPostMeta, Category, Difficulty, Locale, VALID_CATEGORIES, VALID_DIFFICULTIES,
    VALID_LOCALES,
};
pub use store::{PostStore, sort_posts_by_date};
