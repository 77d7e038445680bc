//! The library code for `runepost`, which adds a new post to a hand-authored
//! static blog. A run is a straight line of file updates:
//!
//! 1. Build the [`post::Post`] record from the title, date, summary, and tags,
//!    deriving its slug, file name, and URL
//! 2. Render the post page from a fixed template ([`page`])
//! 3. Prepend a link to the post to the index page's post list ([`index`])
//! 4. Append an `<item>` to the RSS feed ([`feed`])
//! 5. Upsert the post's record into the JSON search index ([`search`])
//!
//! [`publish::publish`] runs these in order. The index page and the feed are
//! edited as text around fixed markers rather than parsed, so everything
//! outside the inserted fragments is preserved exactly. Neither of those two
//! steps checks for duplicates, whereas the search index is keyed by URL.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod feed;
pub mod index;
pub mod page;
pub mod post;
pub mod publish;
pub mod search;
mod util;
