use crate::series::{SeriesPage, SiteMeta};
use crate::theme::ThemeColors;
use gtmpl::Template;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Responsible for templating [`SeriesPage`]s and writing them to disk.
pub struct Writer<'a> {
    /// The template for series pages.
    pub template: &'a Template,

    /// Site-wide metadata rendered into every page.
    pub site: SiteMeta<'a>,

    /// The theme colors made available to the template as `theme`.
    pub colors: &'a ThemeColors,

    /// The directory in which series pages are written. The page for a
    /// series is located at `{output_directory}/{series_slug}/index.html`.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Renders `page` into `w` without touching the file system.
    pub fn render<W: io::Write>(&self, page: &SeriesPage, w: &mut W) -> Result<()> {
        let value = page.to_value(&self.site, self.colors);
        self.template
            .execute(w, &gtmpl::Context::from(value)?)?;
        Ok(())
    }

    /// Renders `page` to a string. See [`Writer::render`].
    pub fn render_to_string(&self, page: &SeriesPage) -> Result<String> {
        let mut out = Vec::new();
        self.render(page, &mut out)?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }

    /// Returns the output path for the series named `name`.
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.output_directory.join(series_slug(name)?).join("index.html"))
    }

    /// Templates `page` and writes it to disk, returning the file's path.
    pub fn write_page(&self, page: &SeriesPage) -> Result<PathBuf> {
        let file_path = self.file_path(page.name())?;
        if let Some(dir) = file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.render(page, &mut std::fs::File::create(&file_path)?)?;
        info!(
            series = page.name(),
            posts = page.count(),
            path = %file_path.display(),
            "wrote series page"
        );
        Ok(file_path)
    }
}

/// Returns the directory name for the series named `name`, e.g.
/// `learning-rust` for `Learning Rust`.
pub fn series_slug(name: &str) -> Result<String> {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        return Err(Error::UnnamableSeries(name.to_owned()));
    }
    Ok(slug)
}

/// Checks that no two of `names` share an output directory, returning the
/// slug of each name in order.
pub fn series_slugs(names: &[&str]) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(names.len());
    let mut slugs = Vec::with_capacity(names.len());
    for &name in names {
        let slug = series_slug(name)?;
        if let Some(first) = seen.insert(slug.clone(), name) {
            return Err(Error::SlugCollision {
                slug,
                first: first.to_owned(),
                second: name.to_owned(),
            });
        }
        slugs.push(slug);
    }
    Ok(slugs)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned when a series name has nothing left to build a path from
    /// once slugified (e.g. `!!!`).
    UnnamableSeries(String),

    /// Returned when two series names slugify to the same directory, e.g.
    /// `Learning Rust` and `learning rust`.
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    /// An error writing the output files.
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
            Error::Template(err) => err.fmt(f),
            Error::UnnamableSeries(name) => {
                write!(f, "can't derive an output path for series `{}`", name)
            }
            Error::SlugCollision {
                slug,
                first,
                second,
            } => write!(
                f,
                "series `{}` and `{}` both map to `{}`",
                first, second, slug
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UnnamableSeries(_) => None,
            Error::SlugCollision { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::PostSummary;
    use crate::theme::DEFAULT_SERIES_TEMPLATE;
    use url::Url;

    fn post(title: &str, date: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            slug: format!("/{}/", title.to_lowercase()),
            url: Url::parse("https://example.org/")
                .unwrap()
                .join(&format!("{}/", title.to_lowercase()))
                .unwrap(),
            title: title.to_owned(),
            excerpt: format!("All about {}…", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: Some(date.to_owned()),
            update: None,
        }
    }

    fn template() -> Template {
        let mut template = Template::default();
        template.parse(DEFAULT_SERIES_TEMPLATE).unwrap();
        template
    }

    fn page() -> SeriesPage {
        SeriesPage::new(
            "Learning Rust",
            vec![post("Ownership", "March 01, 2024", &["hiyen", "rust"])],
            vec![
                post("Borrowing", "February 01, 2024", &["rust"]),
                post("Lifetimes", "January 01, 2024", &[]),
            ],
        )
        .unwrap()
    }

    fn with_writer<T>(output_directory: &Path, f: impl FnOnce(&Writer) -> T) -> T {
        let template = template();
        let url = Url::parse("https://example.org/").unwrap();
        let colors = ThemeColors::default();
        let writer = Writer {
            template: &template,
            site: SiteMeta {
                title: "Example Blog",
                description: "Notes & essays",
                url: &url,
            },
            colors: &colors,
            output_directory,
        };
        f(&writer)
    }

    #[test]
    fn test_render_default_template() -> Result<()> {
        let html = with_writer(Path::new("unused"), |w| w.render_to_string(&page()))?;

        assert!(html.contains("<title>SERIES: Learning Rust | Example Blog</title>"));
        assert!(html.contains(r#"<meta name="description" content="Notes &amp; essays">"#));
        assert!(html.contains(r#"<meta property="og:url" content="https://example.org/">"#));
        assert!(html.contains(r#"<h1 class="series-title">Learning Rust</h1>"#));
        assert!(html.contains("<span>3 Posts</span>"));
        assert!(html.contains("Last updated on January 01, 2024"));
        assert!(html.contains(r#"<hr class="divider">"#));
        assert!(html.contains(r#"<li class="tag">#hiyen</li>"#));
        assert!(html.contains("background-color: #ffffff"));

        let ownership = html.find("Ownership").unwrap();
        let borrowing = html.find("Borrowing").unwrap();
        let lifetimes = html.find("Lifetimes").unwrap();
        assert!(ownership < borrowing && borrowing < lifetimes);
        Ok(())
    }

    #[test]
    fn test_render_update_only_when_present() -> Result<()> {
        let mut updated = post("Ownership", "March 01, 2024", &[]);
        updated.update = Some(String::from("Apr 02, 2024"));
        let page = SeriesPage::new("S", vec![updated], vec![post("Plain", "March 02, 2024", &[])])
            .unwrap();
        let html = with_writer(Path::new("unused"), |w| w.render_to_string(&page))?;
        assert_eq!(html.matches("(updated ").count(), 1);
        assert!(html.contains("March 01, 2024 (updated Apr 02, 2024)"));
        Ok(())
    }

    #[test]
    fn test_write_page() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = with_writer(dir.path(), |w| w.write_page(&page()))?;
        assert_eq!(path, dir.path().join("learning-rust").join("index.html"));
        let html = std::fs::read_to_string(&path)?;
        assert!(html.contains("<span>3 Posts</span>"));
        Ok(())
    }

    #[test]
    fn test_unnamable_series() {
        let page = SeriesPage::new("!!!", vec![post("A", "January 01, 2024", &[])], Vec::new())
            .unwrap();
        let result = with_writer(Path::new("unused"), |w| w.write_page(&page));
        match result {
            Err(Error::UnnamableSeries(name)) => assert_eq!(name, "!!!"),
            other => panic!("wanted unnamable series; got {:?}", other),
        }
    }

    #[test]
    fn test_series_slugs() -> Result<()> {
        assert_eq!(
            series_slugs(&["Go Concurrency", "Learning Rust"])?,
            vec!["go-concurrency", "learning-rust"]
        );
        Ok(())
    }

    #[test]
    fn test_series_slug_collision() {
        match series_slugs(&["Learning Rust", "Go", "learning rust"]) {
            Err(err @ Error::SlugCollision { .. }) => assert_eq!(
                err.to_string(),
                "series `Learning Rust` and `learning rust` both map to `learning-rust`"
            ),
            other => panic!("wanted slug collision; got {:?}", other),
        }
    }
}
