use anyhow::{anyhow, Result};
use std::fs::File;
use std::path::Path;

pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Escapes `&`, `<`, `>`, `"`, and `'` so `s` can be dropped into HTML text
/// or an attribute value.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    // writing into a `String` can't fail
    let _ = pulldown_cmark::escape::escape_html(&mut escaped, s);
    escaped.replace('\'', "&#x27;")
}
