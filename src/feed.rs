//! Support for appending a new post to the site's RSS feed. The feed is
//! hand-maintained XML, so rather than parsing and re-serializing it, a
//! fixed-shape `<item>` is spliced in just before `</channel>`.

use crate::post::Post;
use crate::util::escape_html;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

/// The closing tag every feed document must contain.
const CHANNEL_CLOSE: &str = "</channel>";

/// The time-of-day and offset appended to every item's `pubDate`.
pub const DEFAULT_PUBLISH_TIME: &str = "12:00:00 +0000";

/// Bundled inputs for a feed item.
pub struct FeedItem<'a> {
    /// The post the item announces.
    pub post: &'a Post,

    /// The absolute URL of the post page. Used verbatim as both `<link>` and
    /// `<guid>`.
    pub link: &'a str,

    /// The time-of-day and offset to publish at, e.g. `12:00:00 +0000`.
    pub publish_time: &'a str,
}

impl FeedItem<'_> {
    /// Renders the `<item>` fragment, including its leading newline.
    fn to_xml(&self) -> String {
        format!(
            "\n    <item>\n      <title>{title}</title>\n      <link>{link}</link>\n      \
             <pubDate>{pub_date}</pubDate>\n      <guid>{link}</guid>\n      \
             <description><![CDATA[{summary}]]></description>\n    </item>",
            title = escape_html(&self.post.title),
            link = self.link,
            pub_date = pub_date(self.post.date, self.publish_time),
            summary = self.post.summary,
        )
    }
}

/// Formats an RFC-822 style publish date from a calendar date and a fixed
/// time-of-day, e.g. `Thu, 06 Nov 2025 12:00:00 +0000`.
pub fn pub_date(date: NaiveDate, publish_time: &str) -> String {
    format!("{} {}", date.format("%a, %d %b %Y"), publish_time)
}

/// Inserts `item` before the first `</channel>` in `feed`, returning the new
/// document, or `None` if the feed has no `</channel>`.
pub fn insert_item(feed: &str, item: &FeedItem) -> Option<String> {
    let at = feed.find(CHANNEL_CLOSE)?;
    let mut out = String::with_capacity(feed.len() + 512);
    out.push_str(&feed[..at]);
    out.push_str(&item.to_xml());
    out.push_str("\n  ");
    out.push_str(&feed[at..]);
    Some(out)
}

/// Reads the feed at `path`, appends `item` as the channel's last item, and
/// rewrites the file. No duplicate detection is done.
pub fn append_item(path: &Path, item: &FeedItem) -> Result<()> {
    let feed = std::fs::read_to_string(path)?;
    match insert_item(&feed, item) {
        Some(updated) => Ok(std::fs::write(path, updated)?),
        None => Err(Error::MissingChannelClose(path.to_owned())),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem updating the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when the feed has no `</channel>`.
    MissingChannelClose(PathBuf),

    /// Returned when there is a generic I/O error.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingChannelClose(path) => {
                write!(f, "{} missing {}.", path.display(), CHANNEL_CLOSE)
            }
            Error::Io(err) => write!(f, "Updating feed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingChannelClose(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
