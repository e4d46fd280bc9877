//! Defines [`Post`], the in-memory form of a post source file, and
//! [`PostSummary`], the preformatted view of a post that a series page lists.

use crate::{date, excerpt};
use chrono::NaiveDateTime;
use url::Url;

/// A post parsed from a source file. See [`crate::parser::Parser`] for the
/// source format.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// Identifies the post and locates it under the site root, e.g. `/foo/`
    /// for `posts/foo.md` or `posts/foo/index.md`.
    pub slug: String,

    /// The absolute URL of the post page (`site_url` joined with the slug).
    pub url: Url,

    /// The title of the post.
    pub title: String,

    /// The publication time, if the frontmatter had a recognizable one.
    /// Plain dates are midnight.
    pub date: Option<NaiveDateTime>,

    /// The time of the last revision, if any.
    pub update: Option<NaiveDateTime>,

    /// The tags associated with the post, in frontmatter order.
    pub tags: Vec<String>,

    /// The series the post belongs to, if any.
    pub series: Option<String>,

    /// The raw markdown following the frontmatter.
    pub body: String,
}

impl Post {
    /// Returns whether the post carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns whether the post belongs to the series named `series`.
    pub fn in_series(&self, series: &str) -> bool {
        self.series.as_deref() == Some(series)
    }

    /// Converts the post into the [`PostSummary`] shown in listings, with an
    /// excerpt of at most `excerpt_length` characters.
    pub fn summarize(&self, excerpt_length: usize) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            excerpt: excerpt::excerpt(&self.body, excerpt_length),
            tags: self.tags.clone(),
            date: self.date.map(date::long),
            update: self.update.map(date::short),
        }
    }
}

/// A post as it appears in a series listing. Dates are already formatted for
/// display and the excerpt is already truncated.
#[derive(Clone, Debug, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub url: Url,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,

    /// e.g. `April 03, 2024`
    pub date: Option<String>,

    /// e.g. `Apr 03, 2024`
    pub update: Option<String>,
}

impl PostSummary {
    /// The date to display, falling back to [`date::DATE_UNKNOWN`].
    pub fn display_date(&self) -> &str {
        date::or_unknown(self.date.as_deref())
    }
}
