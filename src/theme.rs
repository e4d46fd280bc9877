//! Theme colors and the built-in series page template.

use serde::Deserialize;

/// The series template used when the theme doesn't provide one.
pub const DEFAULT_SERIES_TEMPLATE: &str = include_str!("../theme/series.html");

/// The colors a series page is styled with. Passed explicitly to
/// [`crate::series::SeriesPage::to_value`]; templates see them under `theme`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeColors {
    /// Headings and body text.
    pub text: String,

    /// Page background; also the text color of the inverted `SERIES` label.
    pub body_background: String,

    /// Secondary text such as dates.
    pub tertiary_text: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        ThemeColors {
            text: String::from("#212529"),
            body_background: String::from("#ffffff"),
            tertiary_text: String::from("#868e96"),
        }
    }
}
