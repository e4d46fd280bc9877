//! Exports the [`build_series`] function which stitches together the steps of
//! building series pages: parsing the posts ([`crate::parser`]), querying
//! each series ([`crate::query`]), and rendering the pages to disk
//! ([`crate::write`]).

use crate::config::Config;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::query::Query;
use crate::series::{Error as SeriesError, SeriesPage, SiteMeta};
use crate::theme::DEFAULT_SERIES_TEMPLATE;
use crate::write::{self, Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Builds series pages from a [`Config`] object and returns the paths of the
/// files written. With `only` set, just that series is built and the rest of
/// the output directory is left alone; otherwise the output directory is
/// cleared and every series found among the posts is built.
pub fn build_series(config: &Config, only: Option<&str>) -> Result<Vec<PathBuf>> {
    let post_parser = PostParser::new(&config.site_url);
    let posts = post_parser.parse_posts(&config.posts_source_directory)?;
    let template = parse_template(&config.series_template)?;
    let query = Query::new(&posts, &config.pinned_tag, config.excerpt_length);

    let series_names = match only {
        Some(name) => vec![name],
        None => query.series_names(),
    };

    // one page per series: refuse before anything on disk changes
    write::series_slugs(&series_names)?;
    if only.is_none() {
        rmdir(&config.series_output_directory)?;
    }

    let writer = Writer {
        template: &template,
        site: SiteMeta {
            title: &config.title,
            description: &config.description,
            url: &config.site_url,
        },
        colors: &config.colors,
        output_directory: &config.series_output_directory,
    };

    let mut written = Vec::with_capacity(series_names.len());
    for name in series_names {
        let page = SeriesPage::from_posts(name, query.series(name))?;
        written.push(writer.write_page(&page)?);
    }
    info!(
        posts = posts.len(),
        pages = written.len(),
        "built series pages"
    );
    Ok(written)
}

// Loads the template file contents in order and parses the result into a
// single template. No files means the built-in template.
fn parse_template<P: AsRef<Path>>(template_files: &[P]) -> Result<Template> {
    let mut contents = String::new();
    if template_files.is_empty() {
        contents.push_str(DEFAULT_SERIES_TEMPLATE);
    }
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building series pages. Errors can be during parsing,
/// assembling a page, writing, cleaning the output directory, or loading
/// template files.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned when a requested series has no posts.
    Series(SeriesError),

    /// Returned for errors writing series pages to disk.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while reading template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Series(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Series(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<SeriesError> for Error {
    /// Converts [`SeriesError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SeriesError) -> Error {
        Error::Series(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_template_defaults_to_builtin() -> Result<()> {
        let no_files: &[PathBuf] = &[];
        parse_template(no_files)?;
        Ok(())
    }

    #[test]
    fn test_parse_template_concatenates_files() {
        let dir = tempfile::tempdir().unwrap();
        let head = dir.path().join("head.html");
        let body = dir.path().join("body.html");
        std::fs::write(&head, "<h1>{{.series}}</h1>").unwrap();
        std::fs::write(&body, "<p>{{.count}}</p>").unwrap();
        parse_template(&[head, body]).unwrap();
    }

    #[test]
    fn test_parse_template_missing_file() {
        let missing = PathBuf::from("does/not/exist.html");
        match parse_template(&[missing.clone()]) {
            Err(Error::OpenTemplateFile { path, .. }) => assert_eq!(path, missing),
            other => panic!("wanted open error; got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rmdir_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        rmdir(&dir.path().join("never-created")).unwrap();
    }
}
