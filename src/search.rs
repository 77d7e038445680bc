//! Maintains the site's client-side search index: a JSON array of flat
//! records, one per post, keyed by URL and kept newest-first.
//!
//! Unlike the index page and the feed, the search index is an upsert:
//! re-publishing a post replaces its record instead of adding a second one.
//! A missing or malformed index file is never fatal; it is treated as empty
//! and rewritten from scratch.

use crate::post::Post;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A search index record for a new post. Records already on disk are kept as
/// opaque [`Value`]s so fields this type doesn't know about survive a
/// rewrite.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub url: String,
    pub date: String,

    /// Same as `date`; read by the search page for recency scoring.
    pub date_iso: String,

    pub summary: String,
    pub tags: Vec<String>,

    /// Searchable body text. Only the summary for now.
    pub content: String,
}

impl From<&Post> for Entry {
    fn from(post: &Post) -> Entry {
        Entry {
            title: post.title.clone(),
            url: post.url(),
            date: post.date_iso(),
            date_iso: post.date_iso(),
            summary: post.summary.clone(),
            tags: post.tags.clone(),
            content: post.summary.clone(),
        }
    }
}

/// Loads the records in the search index at `path`. A missing file, an
/// unreadable file, invalid JSON, or JSON that isn't an array all yield an
/// empty list.
pub fn load(path: &Path) -> Vec<Value> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "search index unreadable; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!(path = %path.display(), "search index is not a JSON array; starting empty");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "search index is not valid JSON; starting empty");
            Vec::new()
        }
    }
}

/// Replaces any record whose `url` matches `entry.url` with `entry`, then
/// sorts newest-first. See [`sort_by_date_desc`].
pub fn merge(mut records: Vec<Value>, entry: &Entry) -> Result<Vec<Value>> {
    records.retain(|record| record.get("url").and_then(Value::as_str) != Some(entry.url.as_str()));
    records.push(serde_json::to_value(entry)?);
    if !sort_by_date_desc(&mut records) {
        warn!("search index has records without a string `date`; leaving order as is");
    }
    Ok(records)
}

/// Stable-sorts `records` by their `date` field, descending, as plain string
/// comparison (correct for ISO-8601 dates). Records with no `date` compare as
/// the empty string. If any record isn't an object or has a non-string
/// `date`, `records` is left untouched and `false` is returned.
pub fn sort_by_date_desc(records: &mut Vec<Value>) -> bool {
    let mut keyed: Vec<(String, Value)> = Vec::with_capacity(records.len());
    for record in records.iter() {
        let key = match record {
            Value::Object(fields) => match fields.get("date") {
                None => String::new(),
                Some(Value::String(date)) => date.clone(),
                Some(_) => return false,
            },
            _ => return false,
        };
        keyed.push((key, record.clone()));
    }

    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    *records = keyed.into_iter().map(|(_, record)| record).collect();
    true
}

/// Upserts the record for `post` into the search index at `path` and rewrites
/// the whole file as pretty-printed JSON.
pub fn upsert(path: &Path, post: &Post) -> Result<()> {
    let records = merge(load(path), &Entry::from(post))?;
    std::fs::write(path, serde_json::to_string_pretty(&records)?)?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem writing the search index. Problems reading it are
/// never errors; see [`load`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a record can't be serialized.
    Json(serde_json::Error),

    /// Returned when the search index can't be written.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "Serializing search index: {}", err),
            Error::Io(err) => write!(f, "Writing search index: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
