use anyhow::{Result, bail};
use argh::FromArgs;
use folio::markdown::Heading;
use folio::{BlogPostMeta, Locale, PostStore, extract_headings, generate_heading_id};
use std::fs;
use std::num::NonZero;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(FromArgs)]
/// Tools for a Markdown blog's content directory.
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Slug(SlugArgs),
    Toc(TocArgs),
    Post(PostArgs),
    List(ListArgs),
    Check(CheckArgs),
}

#[derive(FromArgs)]
/// Print the anchor ID for some heading text.
#[argh(subcommand, name = "slug")]
struct SlugArgs {
    /// heading text
    #[argh(positional)]
    text: Vec<String>,
}

#[derive(FromArgs)]
/// Print the table of contents of a Markdown file.
#[argh(subcommand, name = "toc")]
struct TocArgs {
    /// markdown file, with or without front matter
    #[argh(positional)]
    file: PathBuf,
}

#[derive(FromArgs)]
/// Show a post's metadata and table of contents.
#[argh(subcommand, name = "post")]
struct PostArgs {
    /// post slug (its file name without extension)
    #[argh(positional)]
    slug: String,

    /// content root, containing one directory per locale
    #[argh(option, short = 'r', default = "default_root()")]
    root: PathBuf,

    /// locale to read (en, es, or ja)
    #[argh(option, short = 'l')]
    locale: Option<Locale>,
}

#[derive(FromArgs)]
/// List the posts in a locale, newest first.
#[argh(subcommand, name = "list")]
struct ListArgs {
    /// content root, containing one directory per locale
    #[argh(option, short = 'r', default = "default_root()")]
    root: PathBuf,

    /// locale to list (en, es, or ja)
    #[argh(option, short = 'l')]
    locale: Option<Locale>,

    /// number of threads for loading posts
    #[argh(option, short = 'j')]
    threads: Option<NonZero<usize>>,
}

#[derive(FromArgs)]
/// Validate every post in every locale.
#[argh(subcommand, name = "check")]
struct CheckArgs {
    /// content root, containing one directory per locale
    #[argh(option, short = 'r', default = "default_root()")]
    root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("content/posts")
}

fn print_toc(headings: &[Heading]) {
    for h in headings {
        let indent = "  ".repeat(usize::from(h.level.saturating_sub(2)));
        println!("{indent}{} (#{})", h.text, h.id);
    }
}

fn print_meta(meta: &BlogPostMeta) {
    println!("{} [{}]", meta.title, meta.locale);
    println!("  {}", meta.description);
    print!("  {} by {}", meta.published_at, meta.author);
    if let Some(updated) = &meta.updated_at {
        print!(", updated {updated}");
    }
    println!(", {} min read", meta.reading_time);
    print!("  {}", meta.category.as_str());
    if let Some(difficulty) = meta.difficulty {
        print!(", {}", difficulty.as_str());
    }
    if !meta.tags.is_empty() {
        print!(" · {}", meta.tags.join(", "));
    }
    println!();
}

/// Log filter from `RUST_LOG`, showing warnings and errors when it is unset.
fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();

    let args: Args = argh::from_env();
    match args.command {
        Command::Slug(cmd) => {
            println!("{}", generate_heading_id(&cmd.text.join(" ")));
        }
        Command::Toc(cmd) => {
            let source = fs::read_to_string(&cmd.file)?;
            let body = folio::frontmatter::split_frontmatter(&source).body;
            print_toc(&extract_headings(body));
        }
        Command::Post(cmd) => {
            let store = PostStore::open(&cmd.root)?;
            let locale = cmd.locale.unwrap_or(store.config().default_locale);
            let Some(post) = store.get_blog_post(&cmd.slug, locale) else {
                bail!("no post `{}` in {locale}", cmd.slug);
            };
            if post.meta.locale != locale {
                eprintln!(
                    "note: `{}` is not available in {locale}; showing {}",
                    cmd.slug, post.meta.locale
                );
            }
            print_meta(&post.meta);
            println!();
            print_toc(&post.headings);
        }
        Command::List(cmd) => {
            let mut config = folio::Config::load(&cmd.root)?;
            if cmd.threads.is_some() {
                config.threads = cmd.threads;
            }
            let locale = cmd.locale.unwrap_or(config.default_locale);
            let store = PostStore::new(&cmd.root, config);
            for meta in store.get_blog_posts(locale) {
                println!("{}  {}  {}", meta.published_at, meta.slug, meta.title);
            }
        }
        Command::Check(cmd) => {
            let store = PostStore::open(&cmd.root)?;
            let problems = store.check_posts();
            for (path, e) in &problems {
                eprintln!("{}: {e:#}", path.display());
            }
            if !problems.is_empty() {
                bail!("{} invalid post(s)", problems.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, argh::EarlyExit> {
        Args::from_args(&["folio"], args)
    }

    #[test]
    fn slug() {
        let Command::Slug(cmd) = parse(&["slug", "Hello", "World"]).unwrap().command else {
            panic!("expected slug");
        };
        assert_eq!(cmd.text, &["Hello", "World"]);
    }

    #[test]
    fn toc() {
        let Command::Toc(cmd) = parse(&["toc", "notes.md"]).unwrap().command else {
            panic!("expected toc");
        };
        assert_eq!(cmd.file, PathBuf::from("notes.md"));
    }

    #[test]
    fn post_with_root_after_subcommand() {
        let Command::Post(cmd) = parse(&["post", "kanji", "--locale", "ja", "--root", "x"])
            .unwrap()
            .command
        else {
            panic!("expected post");
        };
        assert_eq!(cmd.slug, "kanji");
        assert_eq!(cmd.locale, Some(Locale::Ja));
        assert_eq!(cmd.root, PathBuf::from("x"));
    }

    #[test]
    fn post_defaults() {
        let Command::Post(cmd) = parse(&["post", "kanji"]).unwrap().command else {
            panic!("expected post");
        };
        assert_eq!(cmd.locale, None);
        assert_eq!(cmd.root, default_root());
    }

    #[test]
    fn bad_locale() {
        assert!(parse(&["post", "kanji", "--locale", "fr"]).is_err());
    }

    #[test]
    fn list() {
        let Command::List(cmd) = parse(&["list", "-l", "es", "-r", "site", "-j", "2"])
            .unwrap()
            .command
        else {
            panic!("expected list");
        };
        assert_eq!(cmd.locale, Some(Locale::Es));
        assert_eq!(cmd.root, PathBuf::from("site"));
        assert_eq!(cmd.threads.map(NonZero::get), Some(2));
    }

    #[test]
    fn check() {
        let Command::Check(cmd) = parse(&["check", "--root", "site"]).unwrap().command else {
            panic!("expected check");
        };
        assert_eq!(cmd.root, PathBuf::from("site"));
    }

    #[test]
    fn unknown_subcommand() {
        assert!(parse(&["render"]).is_err());
    }

    #[test]
    fn log_filter_defaults_to_warn() {
        // Only meaningful when the test environment leaves RUST_LOG unset.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log_filter().to_string(), "warn");
        }
    }
}
