//! Renders the page for a new [`Post`] from a fixed template and writes it
//! into the posts directory.

use crate::post::Post;
use crate::util::escape_html;
use gtmpl::{Context, Template, Value};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The post page. Every field is substituted already escaped; see
/// [`Page::to_value`].
const POST_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{.brand}} — {{.title}}</title>
  <link rel="stylesheet" href="/assets/style.css">
  <meta name="date" content="{{.date}}">
  <!-- Uncomment to enable MathJax on this post
  <script id="MathJax-script" async
    src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
  -->
</head>
<body>
  <div class="container">
    <header class="header">
      <div class="brand">{{.brand}}</div>
      <nav class="nav">
        <a href="/">Home</a>
        <a href="/about.html">About</a>
        <a href="/search.html">Search</a>
        <a href="/subscribe.html">Subscribe</a>
        <a href="/feed.xml">RSS</a>
      </nav>
    </header>

    <article class="card">
      <p class="meta">Published {{.date}}</p>
      <h1>{{.title}}</h1>

      <p>Write here.</p>

    </article>

    <footer class="footer">© <span id="year"></span> {{.brand}}</footer>
    <script>document.getElementById('year').textContent = new Date().getFullYear();</script>
  </div>
</body>
</html>
"#;

/// The values substituted into [`POST_TEMPLATE`].
struct Page<'a> {
    brand: &'a str,
    post: &'a Post,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value::Object`] with fields `brand`,
    /// `title`, and `date`. Brand and title are HTML-escaped.
    fn to_value(&self) -> Value {
        use std::collections::HashMap;

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("brand".to_owned(), Value::String(escape_html(self.brand)));
        m.insert(
            "title".to_owned(),
            Value::String(escape_html(&self.post.title)),
        );
        m.insert("date".to_owned(), Value::String(self.post.date_iso()));
        Value::Object(m)
    }
}

/// Renders the page for `post` into a string.
pub fn render_post_page(brand: &str, post: &Post) -> Result<String> {
    let mut template = Template::default();
    template.parse(POST_TEMPLATE).map_err(Error::ParseTemplate)?;

    let context = Context::from(Page { brand, post }.to_value()).map_err(Error::Template)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

/// Renders the page for `post` and writes it to
/// `{posts_directory}/{post.file_name()}`, creating the directory if needed
/// and overwriting any file already there. Returns the path written.
pub fn write_post_page(posts_directory: &Path, brand: &str, post: &Post) -> Result<PathBuf> {
    let html = render_post_page(brand, post)?;
    std::fs::create_dir_all(posts_directory)?;
    let path = posts_directory.join(post.file_name());
    std::fs::write(&path, html)?;
    Ok(path)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering or writing a post page.
#[derive(Debug)]
pub enum Error {
    /// Returned when the built-in template fails to parse.
    ParseTemplate(String),

    /// An error during templating.
    Template(String),

    /// An error writing the output file.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate(err) => write!(f, "Parsing post template: {}", err),
            Error::Template(err) => write!(f, "Rendering post page: {}", err),
            Error::Io(err) => write!(f, "Writing post page: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
