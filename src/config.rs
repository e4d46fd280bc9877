//! Loads a project's [`Config`] from its `runeseries.yaml` project file and
//! optional `theme/theme.yaml` theme file.

use crate::theme::ThemeColors;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "runeseries.yaml";
const DEFAULT_PINNED_TAG: &str = "hiyen";
const DEFAULT_EXCERPT_LENGTH: usize = 200;

#[derive(Deserialize)]
struct PinnedTag(String);
impl Default for PinnedTag {
    fn default() -> Self {
        PinnedTag(DEFAULT_PINNED_TAG.to_owned())
    }
}

#[derive(Deserialize)]
struct ExcerptLength(usize);
impl Default for ExcerptLength {
    fn default() -> Self {
        ExcerptLength(DEFAULT_EXCERPT_LENGTH)
    }
}

#[derive(Deserialize)]
struct Project {
    pub title: String,
    pub description: String,
    pub site_url: Url,

    #[serde(default)]
    pub pinned_tag: PinnedTag,

    #[serde(default)]
    pub excerpt_length: ExcerptLength,
}

#[derive(Deserialize, Default)]
struct Theme {
    #[serde(default)]
    series_template: Vec<PathBuf>,

    #[serde(default)]
    colors: ThemeColors,
}

/// The resolved configuration for a build.
#[derive(Debug)]
pub struct Config {
    /// The site title.
    pub title: String,

    /// The site description, used verbatim as every series page's meta
    /// description.
    pub description: String,

    /// The root URL of the site, always with a trailing slash.
    pub site_url: Url,

    /// Posts carrying this tag are listed first on their series page.
    pub pinned_tag: String,

    /// The maximum excerpt length, in characters.
    pub excerpt_length: usize,

    /// The directory post source files are read from: `{project}/posts`.
    pub posts_source_directory: PathBuf,

    /// The series template files, concatenated in order. Empty means the
    /// built-in template.
    pub series_template: Vec<PathBuf>,

    /// The theme colors.
    pub colors: ThemeColors,

    /// The directory series pages are written into: `{output}/series`.
    pub series_output_directory: PathBuf,
}

impl Config {
    /// Looks for `runeseries.yaml` in `dir` (made absolute) and then in each
    /// of its ancestors, and loads the first one found. Output goes to
    /// `output_directory` or, if [`None`], to `_output` beside the project
    /// file.
    pub fn from_directory(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .map_err(|err| Error::Open(dir.to_owned(), err))?;
        let mut candidate = Some(dir.as_path());
        while let Some(dir) = candidate {
            let path = dir.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path, output_directory);
            }
            candidate = dir.parent();
        }
        Err(Error::ProjectFileNotFound)
    }

    /// Loads the project file at `path`. See [`Config::from_directory`].
    pub fn from_project_file(path: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path)?)
            .map_err(|err| Error::Deserialize(path.to_owned(), err))?;
        let project_root = path.parent().ok_or_else(|| Error::NoParent(path.to_owned()))?;

        let theme_dir = project_root.join("theme");
        let theme_path = theme_dir.join("theme.yaml");
        let theme: Theme = if theme_path.exists() {
            serde_yaml::from_reader(open(&theme_path)?)
                .map_err(|err| Error::Deserialize(theme_path.clone(), err))?
        } else {
            Theme::default()
        };

        let output_directory = match output_directory {
            Some(dir) => dir.to_owned(),
            None => project_root.join("_output"),
        };

        Ok(Config {
            title: project.title,
            description: project.description,
            site_url: with_trailing_slash(project.site_url),
            pinned_tag: project.pinned_tag.0,
            excerpt_length: project.excerpt_length.0,
            posts_source_directory: project_root.join("posts"),
            series_template: theme
                .series_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            colors: theme.colors,
            series_output_directory: output_directory.join("series"),
        })
    }
}

// `Url::join` treats the last path segment as a file name unless it ends in
// a slash, so `https://example.org/blog` would resolve posts against `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| Error::Open(path.to_owned(), err))
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when no `runeseries.yaml` exists in the directory or any of
    /// its ancestors.
    ProjectFileNotFound,

    /// Returned when the project or theme file can't be opened.
    Open(PathBuf, std::io::Error),

    /// Returned when the project or theme file isn't valid.
    Deserialize(PathBuf, serde_yaml::Error),

    /// Returned when the project file path has no parent directory.
    NoParent(PathBuf),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::Open(path, err) => {
                write!(f, "Opening '{}': {}", path.display(), err)
            }
            Error::Deserialize(path, err) => {
                write!(f, "Loading '{}': {}", path.display(), err)
            }
            Error::NoParent(path) => write!(
                f,
                "Can't get parent directory for project file '{}'",
                path.display()
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::Open(_, err) => Some(err),
            Error::Deserialize(_, err) => Some(err),
            Error::NoParent(_) => None,
        }
    }
}
