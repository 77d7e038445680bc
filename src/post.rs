//! Defines the [`Post`] record and the derivations that hang off of it: the
//! slug, the output file name, and the site-relative URL. A [`Post`] is built
//! once per run from the command-line arguments and then drives every file
//! update.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// The site-relative directory in which post pages are served.
pub const POSTS_URL_PREFIX: &str = "/posts/";

const HTML_EXTENSION: &str = ".html";

/// The slug used when a title has no characters that survive slugification.
const FALLBACK_SLUG: &str = "post";

/// A new post. Immutable once constructed via [`Post::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The trimmed title, unescaped.
    pub title: String,

    /// The publication date.
    pub date: NaiveDate,

    /// The URL-safe form of the title. See [`slugify`].
    pub slug: String,

    /// The one-line summary used by the feed and search index. Defaults to
    /// the title.
    pub summary: String,

    /// Tags in the order they were given.
    pub tags: Vec<String>,
}

impl Post {
    /// Builds a post from raw arguments. `summary` falls back to the title
    /// when missing or empty and `tags` is a comma-separated list (see
    /// [`parse_tags`]). Fails if the title is blank.
    pub fn new(
        title: &str,
        date: NaiveDate,
        summary: Option<&str>,
        tags: Option<&str>,
    ) -> Result<Post> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        let summary = match summary {
            Some(summary) if !summary.is_empty() => summary,
            _ => title,
        };

        Ok(Post {
            title: title.to_owned(),
            date,
            slug: slugify(title),
            summary: summary.trim().to_owned(),
            tags: tags.map(parse_tags).unwrap_or_default(),
        })
    }

    /// The date as `YYYY-MM-DD`.
    pub fn date_iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// The post page's file name, `{date}-{slug}.html`.
    pub fn file_name(&self) -> String {
        format!("{}-{}{}", self.date_iso(), self.slug, HTML_EXTENSION)
    }

    /// The site-relative URL, `/posts/{file_name}`.
    pub fn url(&self) -> String {
        format!("{}{}", POSTS_URL_PREFIX, self.file_name())
    }
}

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\- _]+").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[ _]+").unwrap();
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-+").unwrap();
}

/// Converts a title into a slug: lowercase ASCII letters, digits, and single
/// hyphens, never starting or ending with a hyphen. Em- and en-dashes become
/// hyphens, spaces and underscores become hyphens, and everything else
/// outside `[a-z0-9-]` is dropped. Yields `"post"` if nothing survives.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase().replace(['—', '–'], "-");
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = SEPARATORS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    match collapsed.trim_matches('-') {
        "" => FALLBACK_SLUG.to_owned(),
        slug => slug.to_owned(),
    }
}

/// Splits a comma-separated tag list, trimming each tag and dropping empty
/// ones.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The result of constructing a [`Post`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem constructing a [`Post`] from its arguments.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when the title is empty after trimming.
    EmptyTitle,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTitle => write!(f, "Title cannot be empty."),
        }
    }
}

impl std::error::Error for Error {}
