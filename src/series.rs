//! Defines [`SeriesPage`], the page listing every post in one series, and the
//! [`Error`] returned for a series with no posts.
//!
//! Pinned posts are listed first and the rest after them, each group in the
//! order the query produced. The combined list is never re-sorted, so the
//! "last updated" date is the date of the final entry of the combined list:
//! the oldest of the unpinned posts, or of the pinned posts when there are
//! no unpinned ones.

use crate::date;
use crate::post::PostSummary;
use crate::query::SeriesPosts;
use crate::theme::ThemeColors;
use crate::value::{escaped, object};
use gtmpl_value::Value;
use std::fmt;
use url::Url;

/// Site-wide values rendered into every series page's metadata.
pub struct SiteMeta<'a> {
    /// The site title, shown in the page chrome.
    pub title: &'a str,

    /// Used verbatim as the page's meta description.
    pub description: &'a str,

    /// Used verbatim as the page's canonical URL.
    pub url: &'a Url,
}

/// A series page. A [`SeriesPage`] always holds at least one post.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPage {
    name: String,
    posts: Vec<PostSummary>,
    pinned: usize,
}

impl SeriesPage {
    /// Builds the page for the series `name` from its pinned posts followed
    /// by its other posts. Fails with [`Error::EmptySeries`] when both are
    /// empty.
    pub fn new(
        name: &str,
        pinned: Vec<PostSummary>,
        others: Vec<PostSummary>,
    ) -> Result<SeriesPage> {
        if pinned.is_empty() && others.is_empty() {
            return Err(Error::EmptySeries(name.to_owned()));
        }
        let pinned_count = pinned.len();
        let mut posts = pinned;
        posts.extend(others);
        Ok(SeriesPage {
            name: name.to_owned(),
            posts,
            pinned: pinned_count,
        })
    }

    /// Builds the page from a query result. See [`SeriesPage::new`].
    pub fn from_posts(name: &str, posts: SeriesPosts) -> Result<SeriesPage> {
        SeriesPage::new(name, posts.pinned, posts.others)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All posts in display order: pinned posts, then the rest.
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    /// The pinned posts at the head of [`SeriesPage::posts`].
    pub fn pinned(&self) -> &[PostSummary] {
        &self.posts[..self.pinned]
    }

    /// The unpinned posts following [`SeriesPage::pinned`].
    pub fn others(&self) -> &[PostSummary] {
        &self.posts[self.pinned..]
    }

    pub fn count(&self) -> usize {
        self.posts.len()
    }

    /// The display date of the last post in [`SeriesPage::posts`].
    pub fn last_updated(&self) -> &str {
        date::or_unknown(self.posts.last().and_then(|post| post.date.as_deref()))
    }

    /// The page title used in metadata, e.g. `SERIES: Learning Rust`.
    pub fn seo_title(&self) -> String {
        format!("SERIES: {}", self.name)
    }

    /// Converts the page into the [`Value`] the series template renders:
    ///
    /// * `site`: `title`, `url`
    /// * `seo`: `title`, `description`, `url`
    /// * `theme`: `text`, `bodyBackground`, `tertiaryText`
    /// * `series`: the series name
    /// * `count`: the number of posts
    /// * `lastUpdated`: see [`SeriesPage::last_updated`]
    /// * `posts`: the posts in display order (see
    ///   [`crate::post::PostSummary`]'s conversion for fields)
    pub fn to_value(&self, site: &SiteMeta, colors: &ThemeColors) -> Value {
        object(vec![
            (
                "site",
                object(vec![
                    ("title", escaped(site.title)),
                    ("url", escaped(site.url.as_str())),
                ]),
            ),
            (
                "seo",
                object(vec![
                    ("title", escaped(&self.seo_title())),
                    ("description", escaped(site.description)),
                    ("url", escaped(site.url.as_str())),
                ]),
            ),
            ("theme", colors.into()),
            ("series", escaped(&self.name)),
            ("count", Value::String(self.count().to_string())),
            ("lastUpdated", escaped(self.last_updated())),
            (
                "posts",
                Value::Array(self.posts.iter().map(Value::from).collect()),
            ),
        ])
    }
}

/// The result of building a [`SeriesPage`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a [`SeriesPage`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when a series has no posts; carries the series name.
    EmptySeries(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptySeries(name) => write!(f, "no posts for series `{}`", name),
        }
    }
}

impl std::error::Error for Error {}
