//! Exports the [`publish`] function which stitches together the steps of
//! adding a post to the site: building the [`Post`] record ([`crate::post`]),
//! writing its page ([`crate::page`]), linking it from the index page
//! ([`crate::index`]), announcing it in the feed ([`crate::feed`]), and
//! recording it in the search index ([`crate::search`]).

use crate::config::Config;
use crate::feed::{self, Error as FeedError, FeedItem};
use crate::index::{self, Error as IndexError};
use crate::page::{self, Error as PageError};
use crate::post::{Error as PostError, Post};
use crate::search::{self, Error as SearchError};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// The raw inputs for a new post, as given on the command line.
#[derive(Debug, Clone)]
pub struct Draft<'a> {
    pub title: &'a str,
    pub date: NaiveDate,
    pub summary: Option<&'a str>,

    /// Comma-separated.
    pub tags: Option<&'a str>,
}

/// What a successful [`publish`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub post: Post,

    /// Where the post page was written.
    pub page_path: PathBuf,

    /// The absolute link used in the feed.
    pub link: String,
}

/// Adds a post to the site described by `config`.
///
/// Nothing is touched unless the title is non-empty and both the index page
/// and the feed exist. After that the steps run in order (page, index, feed,
/// search index) and the first failure stops the run; earlier steps are not
/// rolled back.
pub fn publish(config: &Config, draft: &Draft) -> Result<Published> {
    let post = Post::new(draft.title, draft.date, draft.summary, draft.tags)?;
    info!(title = %post.title, url = %post.url(), "publishing post");

    ensure_exists(&config.index_file, "index page")?;
    ensure_exists(&config.feed_file, "feed")?;

    let page_path = page::write_post_page(&config.posts_directory, &config.brand, &post)?;
    info!(path = %page_path.display(), "wrote post page");

    index::prepend_post(&config.index_file, &post)?;
    info!(path = %config.index_file.display(), "linked post from index page");

    let link = config.link(&post.url());
    feed::append_item(
        &config.feed_file,
        &FeedItem {
            post: &post,
            link: &link,
            publish_time: &config.publish_time,
        },
    )?;
    info!(path = %config.feed_file.display(), link = %link, "added feed item");

    search::upsert(&config.search_index_file, &post)?;
    info!(path = %config.search_index_file.display(), "updated search index");

    Ok(Published {
        post,
        page_path,
        link,
    })
}

fn ensure_exists(path: &std::path::Path, kind: &'static str) -> Result<()> {
    match path.is_file() {
        true => Ok(()),
        false => Err(Error::MissingFile {
            kind,
            path: path.to_owned(),
        }),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for publishing a post. Every variant is fatal to the run.
#[derive(Debug)]
pub enum Error {
    /// Returned when the post arguments are invalid.
    Post(PostError),

    /// Returned when the index page or feed doesn't exist.
    MissingFile { kind: &'static str, path: PathBuf },

    /// Returned for errors rendering or writing the post page.
    Page(PageError),

    /// Returned for errors updating the index page.
    Index(IndexError),

    /// Returned for errors updating the feed.
    Feed(FeedError),

    /// Returned for errors writing the search index.
    Search(SearchError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Post(err) => err.fmt(f),
            Error::MissingFile { kind, path } => {
                write!(f, "{} not found at {}.", kind, path.display())
            }
            Error::Page(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Search(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Post(err) => Some(err),
            Error::MissingFile { .. } => None,
            Error::Page(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Search(err) => Some(err),
        }
    }
}

impl From<PostError> for Error {
    /// Converts [`PostError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PostError) -> Error {
        Error::Post(err)
    }
}

impl From<PageError> for Error {
    /// Converts [`PageError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<SearchError> for Error {
    /// Converts [`SearchError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SearchError) -> Error {
        Error::Search(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;
    use url::Url;

    const INDEX: &str = "<ul class=\"post-list\">\n</ul>\n";
    const FEED: &str = "<rss><channel>\n  </channel></rss>\n";

    fn site() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
        std::fs::write(dir.path().join("feed.xml"), FEED).unwrap();
        let base_url = Url::parse("https://jane.github.io").unwrap();
        let config = Config::from_directory(dir.path(), Some(base_url)).unwrap();
        (dir, config)
    }

    fn draft<'a>(title: &'a str, date: &str) -> Draft<'a> {
        Draft {
            title,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            summary: None,
            tags: None,
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_publish() -> Result<()> {
        let (_dir, config) = site();
        let published = publish(&config, &draft("My Title", "2025-11-06"))?;

        assert_eq!(
            config.posts_directory.join("2025-11-06-my-title.html"),
            published.page_path
        );
        assert_eq!(
            "https://jane.github.io/posts/2025-11-06-my-title.html",
            published.link
        );
        assert!(published.page_path.is_file());
        assert!(read(&config.index_file).contains(r#"<a href="/posts/2025-11-06-my-title.html">My Title</a>"#));
        assert!(read(&config.feed_file).contains("<pubDate>Thu, 06 Nov 2025 12:00:00 +0000</pubDate>"));
        assert!(read(&config.search_index_file).contains(r#""url": "/posts/2025-11-06-my-title.html""#));
        Ok(())
    }

    #[test]
    fn test_publish_twice_duplicates_index_and_feed_but_not_search() -> Result<()> {
        let (_dir, config) = site();
        publish(&config, &draft("Again", "2025-11-06"))?;
        publish(&config, &draft("Again", "2025-11-06"))?;

        assert_eq!(2, read(&config.index_file).matches("<li>").count());
        assert_eq!(2, read(&config.feed_file).matches("<item>").count());
        assert_eq!(1, search::load(&config.search_index_file).len());
        Ok(())
    }

    #[test]
    fn test_publish_empty_title_touches_nothing() {
        let (_dir, config) = site();
        match publish(&config, &draft("   ", "2025-11-06")) {
            Err(Error::Post(PostError::EmptyTitle)) => {}
            other => panic!("wanted EmptyTitle; found {:?}", other),
        }
        assert!(!config.posts_directory.exists());
        assert_eq!(INDEX, read(&config.index_file));
    }

    #[test]
    fn test_publish_missing_feed_touches_nothing() {
        let (_dir, config) = site();
        std::fs::remove_file(&config.feed_file).unwrap();

        match publish(&config, &draft("Hello", "2025-11-06")) {
            Err(Error::MissingFile { kind: "feed", path }) => assert_eq!(config.feed_file, path),
            other => panic!("wanted MissingFile; found {:?}", other),
        }
        assert!(!config.posts_directory.exists());
        assert_eq!(INDEX, read(&config.index_file));
        assert!(!config.search_index_file.exists());
    }

    #[test]
    fn test_publish_missing_index_marker_keeps_page() {
        let (_dir, config) = site();
        std::fs::write(&config.index_file, "<p>no list</p>").unwrap();

        match publish(&config, &draft("Hello", "2025-11-06")) {
            Err(Error::Index(IndexError::MissingMarker(_))) => {}
            other => panic!("wanted MissingMarker; found {:?}", other),
        }
        assert!(config.posts_directory.join("2025-11-06-hello.html").is_file());
        assert_eq!(FEED, read(&config.feed_file));
        assert!(!config.search_index_file.exists());
    }

    #[test]
    fn test_publish_missing_channel_close_is_not_rolled_back() {
        let (_dir, config) = site();
        std::fs::write(&config.feed_file, "<rss/>").unwrap();

        match publish(&config, &draft("Hello", "2025-11-06")) {
            Err(Error::Feed(FeedError::MissingChannelClose(_))) => {}
            other => panic!("wanted MissingChannelClose; found {:?}", other),
        }
        assert!(read(&config.index_file).contains("2025-11-06-hello.html"));
        assert!(!config.search_index_file.exists());
    }

    #[test]
    fn test_publish_search_index_newest_first() -> Result<()> {
        let (_dir, config) = site();
        publish(&config, &draft("First", "2025-01-01"))?;
        publish(&config, &draft("Second", "2025-06-01"))?;

        let records = search::load(&config.search_index_file);
        assert_eq!("2025-06-01", records[0]["date"]);
        assert_eq!("2025-01-01", records[1]["date"]);
        Ok(())
    }
}
