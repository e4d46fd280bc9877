//! Conversions into template [`Value`]s. Strings are HTML-escaped on the way
//! in since templates interpolate them verbatim.

use crate::post::PostSummary;
use crate::theme::ThemeColors;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;

/// Escapes `s` for use in HTML text or a quoted attribute.
pub fn escaped(s: &str) -> Value {
    let mut out = String::with_capacity(s.len());
    // writing into a `String` can't fail
    let _ = escape_html(&mut out, s);
    Value::String(out)
}

/// Builds a [`Value::Object`] from `(key, value)` pairs.
pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<HashMap<String, Value>>(),
    )
}

impl From<&PostSummary> for Value {
    /// Converts a [`PostSummary`] into an object with fields `title`, `url`,
    /// `slug`, `excerpt`, `date`, `update` (nil when absent), and `tags`.
    fn from(post: &PostSummary) -> Value {
        object(vec![
            ("title", escaped(&post.title)),
            ("url", escaped(post.url.as_str())),
            ("slug", escaped(&post.slug)),
            ("excerpt", escaped(&post.excerpt)),
            ("date", escaped(post.display_date())),
            (
                "update",
                match &post.update {
                    Some(update) => escaped(update),
                    None => Value::Nil,
                },
            ),
            (
                "tags",
                Value::Array(post.tags.iter().map(|t| escaped(t)).collect()),
            ),
        ])
    }
}

impl From<&ThemeColors> for Value {
    /// Converts [`ThemeColors`] into an object keyed the way themes name
    /// them: `text`, `bodyBackground`, and `tertiaryText`.
    fn from(colors: &ThemeColors) -> Value {
        object(vec![
            ("text", escaped(&colors.text)),
            ("bodyBackground", escaped(&colors.body_background)),
            ("tertiaryText", escaped(&colors.tertiary_text)),
        ])
    }
}
