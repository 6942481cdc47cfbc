use crate::config::Config;
use crate::frontmatter::{parse_date, parse_frontmatter, validate_frontmatter};
use crate::markdown::{calculate_reading_time, extract_headings};
use crate::parallel;
use crate::post::{BlogPost, BlogPostMeta, Category, Difficulty, Locale, VALID_LOCALES};
use anyhow::{Context as _, Result, bail};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Preferred post file extension. Plain `.md` files are used when there is no
/// `.mdx` file for the same slug.
const POST_EXTENSION: &str = "mdx";
const PLAIN_EXTENSION: &str = "md";

/// A directory of posts, laid out as `<root>/<locale>/<slug>.mdx`.
pub struct PostStore {
    root: PathBuf,
    config: Config,
}

/// The front matter fields, as they appear on disk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostFrontmatter {
    title: String,
    description: String,
    published_at: String,
    updated_at: Option<String>,
    author: String,
    category: Category,
    tags: Vec<String>,
    featured_image: Option<String>,
    difficulty: Option<Difficulty>,
    related_posts: Option<Vec<String>>,
}

impl PostStore {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Open a content directory, reading its `_config.toml` if there is one.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The canonical path for a post, whether or not it exists.
    pub fn post_path(&self, locale: Locale, slug: &str) -> PathBuf {
        self.root
            .join(locale.as_str())
            .join(format!("{slug}.{POST_EXTENSION}"))
    }

    /// Find the file for a post, if it exists.
    fn find_post(&self, locale: Locale, slug: &str) -> Option<PathBuf> {
        if !is_safe_slug(slug) {
            return None;
        }
        let path = self.post_path(locale, slug);
        if path.is_file() {
            return Some(path);
        }
        let path = path.with_extension(PLAIN_EXTENSION);
        path.is_file().then_some(path)
    }

    pub fn post_exists(&self, locale: Locale, slug: &str) -> bool {
        self.find_post(locale, slug).is_some()
    }

    /// All the locales this post has been written in.
    pub fn get_post_locales(&self, slug: &str) -> Vec<Locale> {
        VALID_LOCALES
            .into_iter()
            .filter(|&locale| self.post_exists(locale, slug))
            .collect()
    }

    /// Load a post in the requested locale, or in the default locale if it
    /// hasn't been translated. The returned post's locale says which one we
    /// actually got. Returns `None` if the post doesn't exist in either
    /// locale, or if it can't be loaded.
    pub fn get_blog_post(&self, slug: &str, locale: Locale) -> Option<BlogPost> {
        if let Some(path) = self.find_post(locale, slug) {
            return self.load_post_logged(&path, locale);
        }

        let fallback = self.config.default_locale;
        if locale != fallback
            && let Some(path) = self.find_post(fallback, slug)
        {
            debug!(slug, %locale, %fallback, "falling back to default locale");
            return self.load_post_logged(&path, fallback);
        }

        debug!(slug, %locale, "post not found");
        None
    }

    fn load_post_logged(&self, path: &Path, locale: Locale) -> Option<BlogPost> {
        match self.load_post(path, locale) {
            Ok(post) => Some(post),
            Err(e) => {
                error!(path = %path.display(), "error loading post: {e:#}");
                None
            }
        }
    }

    /// Read, validate, and parse a single post file.
    pub fn load_post(&self, path: &Path, locale: Locale) -> Result<BlogPost> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let (data, body) = parse_frontmatter(&source)?;

        let validation = validate_frontmatter(&data);
        if !validation.success {
            bail!("invalid frontmatter: {validation}");
        }
        let fm: PostFrontmatter = serde_yaml::from_value(serde_yaml::Value::Mapping(data))?;

        let slug = path
            .file_stem()
            .context("post path has no file name")?
            .to_string_lossy()
            .into_owned();

        let meta = BlogPostMeta {
            title: fm.title,
            description: fm.description,
            slug,
            published_at: fm.published_at,
            updated_at: fm.updated_at,
            author: fm.author,
            category: fm.category,
            tags: fm.tags,
            featured_image: fm.featured_image,
            reading_time: calculate_reading_time(body, self.config.words_per_minute),
            difficulty: fm.difficulty,
            related_posts: fm.related_posts,
            locale,
        };

        Ok(BlogPost {
            meta,
            content: body.to_string(),
            headings: extract_headings(body),
        })
    }

    /// List the post files for a locale, one per slug.
    pub fn post_files(&self, locale: Locale) -> Vec<PathBuf> {
        let dir = self.root.join(locale.as_str());
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no posts for locale");
            return vec![];
        }

        let mut by_slug = BTreeMap::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|e| !ignore_filename(e.file_name()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("directory walk error: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let Some(ext) = path.extension().and_then(OsStr::to_str) else {
                continue;
            };
            if ext != POST_EXTENSION && ext != PLAIN_EXTENSION {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            match by_slug.entry(slug.to_string()) {
                Entry::Vacant(v) => {
                    v.insert(path);
                }
                Entry::Occupied(mut o) => {
                    if ext == POST_EXTENSION {
                        o.insert(path);
                    }
                }
            }
        }

        by_slug.into_values().collect()
    }

    /// Load every post in a locale, newest first. Posts that fail to load are
    /// logged and left out.
    pub fn get_blog_posts(&self, locale: Locale) -> Vec<BlogPostMeta> {
        let mut posts: Vec<_> = self
            .load_all(locale)
            .into_iter()
            .filter_map(|(path, res)| match res {
                Ok(post) => Some(post.meta),
                Err(e) => {
                    warn!(path = %path.display(), "skipping post: {e:#}");
                    None
                }
            })
            .collect();
        sort_posts_by_date(&mut posts);
        posts
    }

    /// Try to load every post in every locale, returning the ones that fail.
    pub fn check_posts(&self) -> Vec<(PathBuf, anyhow::Error)> {
        VALID_LOCALES
            .into_iter()
            .flat_map(|locale| self.load_all(locale))
            .filter_map(|(path, res)| res.err().map(|e| (path, e)))
            .collect()
    }

    fn load_all(&self, locale: Locale) -> Vec<(PathBuf, Result<BlogPost>)> {
        let files = self.post_files(locale);
        debug!(%locale, count = files.len(), "loading posts");
        parallel::map_pool(self.config.thread_count(), files, |path| {
            let res = self.load_post(&path, locale);
            (path, res)
        })
    }
}

/// Order posts newest first. Posts with the same date are ordered by slug, and
/// posts whose date can't be parsed go last.
pub fn sort_posts_by_date(posts: &mut [BlogPostMeta]) {
    posts.sort_by_cached_key(|p| (Reverse(parse_date(&p.published_at)), p.slug.clone()));
}

/// Should we skip a given file when listing posts? We skip hidden files
/// (prefixed with .) and ones starting with _, which are special.
pub fn ignore_filename(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.starts_with(b".") || bytes.starts_with(b"_")
}

/// Is this slug a plain file name, safe to join onto a locale directory?
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains(['/', '\\'])
        && !ignore_filename(OsStr::new(slug))
}
