//! Site configuration. Settings come from an optional `runepost.yaml` in the
//! site root (or any parent directory), with defaults for everything that
//! isn't set.

use crate::feed::DEFAULT_PUBLISH_TIME;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

pub const PROJECT_FILE_NAME: &str = "runepost.yaml";

const DEFAULT_BRAND: &str = "Rabbit & Wolf";
const GITHUB_PAGES_SUFFIX: &str = ".github.io";

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Project {
    brand: Option<String>,
    base_url: Option<Url>,
    publish_time: Option<String>,
    posts_directory: Option<PathBuf>,
    index_file: Option<PathBuf>,
    feed_file: Option<PathBuf>,
    search_index_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The directory containing `runepost.yaml`, or the starting directory if
    /// there is none. Relative paths in the project file resolve against it.
    pub root_directory: PathBuf,

    /// The site name shown in each post page's header, footer, and title.
    pub brand: String,

    /// The absolute URL that site-relative post URLs are appended to when
    /// building feed links. A plain string because the directory-name guess
    /// isn't always a valid URL, and the feed takes it verbatim anyway.
    pub base_url: String,

    /// The time-of-day and offset for feed `pubDate`s.
    pub publish_time: String,

    pub posts_directory: PathBuf,
    pub index_file: PathBuf,
    pub feed_file: PathBuf,
    pub search_index_file: PathBuf,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for `runepost.yaml` and
    /// loads the first one found. Falls back to defaults rooted at `dir` if
    /// there is none. `base_url` takes precedence over the project file's.
    pub fn from_directory(dir: &Path, base_url: Option<Url>) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .map_err(|e| anyhow!("Resolving site root `{}`: {}", dir.display(), e))?;
        let mut candidate = Some(dir.as_path());
        while let Some(current) = candidate {
            let path = current.join(PROJECT_FILE_NAME);
            if path.is_file() {
                return Config::from_project_file(&path, base_url)
                    .map_err(|e| anyhow!("Loading configuration: {:#}", e));
            }
            candidate = current.parent();
        }

        debug!(root = %dir.display(), "no {} found; using defaults", PROJECT_FILE_NAME);
        Config::resolve(&dir, Project::default(), base_url)
    }

    pub fn from_project_file(path: &Path, base_url: Option<Url>) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                debug!(path = %path.display(), "loaded project file");
                Config::resolve(project_root, project, base_url)
            }
        }
    }

    fn resolve(root: &Path, project: Project, base_url: Option<Url>) -> Result<Config> {
        let base_url = match base_url.or(project.base_url) {
            Some(base_url) => base_url.to_string(),
            None => {
                let guess = guess_base_url(root);
                warn!(
                    base_url = %guess,
                    "no base_url configured; guessing from the site directory name"
                );
                guess
            }
        };

        let path_or = |path: Option<PathBuf>, default: &str| {
            root.join(path.unwrap_or_else(|| PathBuf::from(default)))
        };

        Ok(Config {
            root_directory: root.to_owned(),
            brand: project.brand.unwrap_or_else(|| DEFAULT_BRAND.to_owned()),
            base_url,
            publish_time: project
                .publish_time
                .unwrap_or_else(|| DEFAULT_PUBLISH_TIME.to_owned()),
            posts_directory: path_or(project.posts_directory, "posts"),
            index_file: path_or(project.index_file, "index.html"),
            feed_file: path_or(project.feed_file, "feed.xml"),
            search_index_file: path_or(project.search_index_file, "search_index.json"),
        })
    }

    /// Builds the absolute link for a site-relative `url` such as
    /// `/posts/2025-11-06-my-title.html`.
    pub fn link(&self, url: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), url)
    }
}

/// Guesses a GitHub Pages base URL from the site directory's name, e.g. a
/// site checked out at `~/src/jane.github.io` yields
/// `https://jane.github.io`. Never fails: a name that isn't a valid host
/// (`my blog`, or the empty name of `/`) still yields a link, with a warning.
pub fn guess_base_url(root: &Path) -> String {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_owned());
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let owner = name.strip_suffix(GITHUB_PAGES_SUFFIX).unwrap_or(&name);
    let guess = format!("https://{}{}", owner, GITHUB_PAGES_SUFFIX);
    if let Err(e) = Url::parse(&guess) {
        warn!(base_url = %guess, error = %e, "guessed base URL is not a valid URL; using it as is");
    }
    guess
}
