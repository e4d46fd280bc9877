//! Builds the plain-text preview shown for each post in a series listing.
//! Markdown is parsed only to drop markup; nothing here produces HTML.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Everything after this marker is left out of the excerpt.
pub const FOLD_TAG: &str = "<!-- more -->";

/// Appended to an excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "…";

/// Returns at most `max_chars` characters of the plain text of `markdown`
/// (counting characters, not bytes), followed by [`TRUNCATION_MARKER`] if
/// anything was cut. Whitespace runs collapse to a single space.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = plain_text(above_the_fold(markdown));
    prune(&text, max_chars)
}

fn above_the_fold(markdown: &str) -> &str {
    match markdown.find(FOLD_TAG) {
        Some(i) => &markdown[..i],
        None => markdown,
    }
}

fn plain_text(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut text = String::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(s) | Event::Code(s) => text.push_str(&s),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            // block boundaries would otherwise glue words together
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(_))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_))
            | Event::End(Tag::TableCell) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn prune(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_owned(),
        Some((cut, _)) => {
            let mut pruned = text[..cut].trim_end().to_owned();
            pruned.push_str(TRUNCATION_MARKER);
            pruned
        }
    }
}
