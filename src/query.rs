//! The build-time data query behind a series page: which posts belong to a
//! series, which of them are pinned ahead of the rest, and in what order.

use crate::post::{Post, PostSummary};
use std::collections::BTreeSet;

/// The posts of one series, split into the two groups a series page lists.
/// Each group is sorted newest first on its own; undated posts come last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesPosts {
    /// Posts tagged with the pinned tag.
    pub pinned: Vec<PostSummary>,

    /// All other posts in the series.
    pub others: Vec<PostSummary>,
}

/// Answers series queries over a fixed set of parsed posts.
pub struct Query<'a> {
    posts: &'a [Post],

    /// Posts carrying this tag are listed ahead of the rest of their series.
    pinned_tag: &'a str,

    /// The maximum excerpt length, in characters.
    excerpt_length: usize,
}

impl<'a> Query<'a> {
    pub fn new(posts: &'a [Post], pinned_tag: &'a str, excerpt_length: usize) -> Query<'a> {
        Query {
            posts,
            pinned_tag,
            excerpt_length,
        }
    }

    /// Returns the distinct series names across all posts, sorted.
    pub fn series_names(&self) -> Vec<&'a str> {
        self.posts
            .iter()
            .filter_map(|post| post.series.as_deref())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .collect()
    }

    /// Returns the posts of `series`. Ties between equal dates keep the order
    /// of the underlying post slice.
    pub fn series(&self, series: &str) -> SeriesPosts {
        let (mut pinned, mut others): (Vec<&Post>, Vec<&Post>) = self
            .posts
            .iter()
            .filter(|post| post.in_series(series))
            .partition(|post| post.has_tag(self.pinned_tag));

        // `None < Some(_)`, so comparing in reverse also sinks undated posts
        pinned.sort_by(|a, b| b.date.cmp(&a.date));
        others.sort_by(|a, b| b.date.cmp(&a.date));

        SeriesPosts {
            pinned: self.summarize(&pinned),
            others: self.summarize(&others),
        }
    }

    fn summarize(&self, posts: &[&Post]) -> Vec<PostSummary> {
        posts
            .iter()
            .map(|post| post.summarize(self.excerpt_length))
            .collect()
    }
}
