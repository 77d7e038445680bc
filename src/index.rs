//! Links a new post from the site's hand-authored index page by splicing a
//! list item in right after the opening `<ul class="post-list">` tag, so the
//! newest post is always listed first.

use crate::post::Post;
use crate::util::escape_html;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref POST_LIST_OPEN: Regex =
        Regex::new(r#"(?i)<ul\s+class="post-list"\s*>"#).unwrap();
}

/// Inserts the list item for `post` into `index`, returning the new document.
/// Everything outside the inserted fragment is left byte-for-byte intact.
/// Returns `None` if the post list marker is missing.
pub fn insert_post(index: &str, post: &Post) -> Option<String> {
    let marker = POST_LIST_OPEN.find(index)?;
    let item = format!(
        "\n          <li><a href=\"{}\">{}</a> <span class=\"meta\">— {}</span></li>",
        post.url(),
        escape_html(&post.title),
        post.date_iso(),
    );

    let mut out = String::with_capacity(index.len() + item.len());
    out.push_str(&index[..marker.end()]);
    out.push_str(&item);
    out.push_str(&index[marker.end()..]);
    Some(out)
}

/// Reads the index page at `path`, prepends `post` to its post list, and
/// rewrites the file. Calling this twice for the same post lists it twice.
pub fn prepend_post(path: &Path, post: &Post) -> Result<()> {
    let index = std::fs::read_to_string(path)?;
    match insert_post(&index, post) {
        Some(updated) => Ok(std::fs::write(path, updated)?),
        None => Err(Error::MissingMarker(path.to_owned())),
    }
}

/// The result of a fallible index update.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem updating the index page.
#[derive(Debug)]
pub enum Error {
    /// Returned when the index page has no `<ul class="post-list">`.
    MissingMarker(PathBuf),

    /// Returned for I/O errors reading or writing the index page.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingMarker(path) => write!(
                f,
                "Could not find <ul class=\"post-list\"> in {}.",
                path.display()
            ),
            Error::Io(err) => write!(f, "Updating index page: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingMarker(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn post(title: &str) -> Post {
        let date = NaiveDate::from_ymd_opt(2025, 11, 6).unwrap();
        Post::new(title, date, None, None).unwrap()
    }

    const INDEX: &str = indoc! {r#"
        <main>
          <ul class="post-list">
            <li><a href="/posts/old.html">Old</a></li>
          </ul>
        </main>
    "#};

    #[test]
    fn test_insert_post() {
        let wanted = indoc! {r#"
            <main>
              <ul class="post-list">
                      <li><a href="/posts/2025-11-06-fish-chips.html">Fish &amp; Chips</a> <span class="meta">— 2025-11-06</span></li>
                <li><a href="/posts/old.html">Old</a></li>
              </ul>
            </main>
        "#};
        assert_eq!(Some(wanted.to_owned()), insert_post(INDEX, &post("Fish & Chips")));
    }

    #[test]
    fn test_insert_post_marker_variants() {
        let index = "<UL  class=\"post-list\" >\n</UL>";
        let updated = insert_post(index, &post("Hi")).unwrap();
        assert!(updated.starts_with("<UL  class=\"post-list\" >\n          <li>"));
        assert!(updated.ends_with("</li>\n</UL>"));
    }

    #[test]
    fn test_insert_post_first_marker_only() {
        let index = r#"<ul class="post-list"></ul><ul class="post-list"></ul>"#;
        let updated = insert_post(index, &post("Hi")).unwrap();
        assert!(updated.ends_with(r#"</li></ul><ul class="post-list"></ul>"#));
    }

    #[test]
    fn test_insert_post_missing_marker() {
        assert_eq!(None, insert_post("<ul class=\"other\"></ul>", &post("Hi")));
    }

    #[test]
    fn test_prepend_post_twice_duplicates() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.html");
        std::fs::write(&path, INDEX)?;

        prepend_post(&path, &post("Hello"))?;
        prepend_post(&path, &post("Hello"))?;

        let index = std::fs::read_to_string(&path)?;
        assert_eq!(2, index.matches("2025-11-06-hello.html").count());
        Ok(())
    }

    #[test]
    fn test_prepend_post_missing_marker_leaves_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>no list</p>")?;

        match prepend_post(&path, &post("Hello")) {
            Err(Error::MissingMarker(p)) => assert_eq!(path, p),
            other => panic!("wanted MissingMarker; found {:?}", other),
        }
        assert_eq!("<p>no list</p>", std::fs::read_to_string(&path)?);
        Ok(())
    }
}
