//! Defines the [`Parser`] and [`Error`] types and the logic for loading
//! [`Post`]s from the file system into memory.

use std::{
    fmt,
    fs::File,
    path::{Component, Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;
use walkdir::WalkDir;

use crate::{date, post::Post};

const MARKDOWN_EXTENSION: &str = "md";
const BUNDLE_INDEX: &str = "index.md";

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `site_url` is the base URL for post pages. A post's URL is
    /// `{site_url}{slug}` with the leading slash of the slug dropped, so this
    /// should end in a trailing slash.
    site_url: &'a Url,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(site_url: &'a Url) -> Parser<'a> {
        Parser { site_url }
    }

    /// Searches `source_directory` recursively for post files (extension =
    /// `.md`) and returns them in file-name order. A directory holding an
    /// `index.md` is a post bundle and the post takes the directory's name.
    /// Each post file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with `title` and optionally `date`, `update`,
    ///    `tags`, and `series`
    /// 3. Terminal frontmatter fence (`---`) on its own line
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Ownership
    /// date: 2024-04-03
    /// tags: [hiyen, rust]
    /// series: Learning Rust
    /// ---
    /// # Ownership
    ///
    /// Every value has an owner.
    /// ```
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let walker = WalkDir::new(source_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));
        for result in walker {
            let entry = result?;
            if entry.file_type().is_file()
                && entry.path().extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
            {
                posts.push(self.parse_post(
                    source_directory,
                    // strip_prefix() should never fail; every entry is
                    // beneath `source_directory`
                    entry
                        .path()
                        .strip_prefix(source_directory)
                        .unwrap_or_else(|_| entry.path()),
                )?);
            }
        }
        debug!(count = posts.len(), "parsed posts");
        Ok(posts)
    }

    /// Parses the post at `relative_path` (relative to
    /// `posts_source_directory`), annotating any error with the path.
    fn parse_post(
        &self,
        posts_source_directory: &Path,
        relative_path: &Path,
    ) -> Result<Post> {
        match self._parse_post(posts_source_directory, relative_path) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", relative_path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(
        &self,
        posts_source_directory: &Path,
        relative_path: &Path,
    ) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(posts_source_directory.join(relative_path))?
            .read_to_string(&mut contents)?;
        self.parse_str(relative_path, &contents)
    }

    /// Parses a single [`Post`] from the file contents `input`.
    /// `relative_path` is the path of the source file relative to the posts
    /// directory and determines the slug.
    pub fn parse_str(&self, relative_path: &Path, input: &str) -> Result<Post> {
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let slug = slug_for(relative_path)?;
        let url = self.site_url.join(slug.trim_start_matches('/'))?;
        let date = parse_date(&slug, "date", frontmatter.date.as_deref());
        let update = parse_date(&slug, "update", frontmatter.update.as_deref());

        Ok(Post {
            url,
            title: frontmatter.title,
            date,
            update,
            tags: frontmatter.tags,
            series: frontmatter.series,
            body: input[body_start..].to_owned(),
            slug,
        })
    }
}

/// Returns the frontmatter bounds: `(yaml_start, yaml_stop, body_start)`.
/// Both fences must be lines holding exactly `---` (a trailing `\r` is
/// allowed).
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    let mut lines = input.split_inclusive('\n');
    let yaml_start = match lines.next() {
        Some(first) if is_fence(first) => first.len(),
        _ => return Err(Error::FrontmatterMissingStartFence),
    };

    let mut offset = yaml_start;
    for line in lines {
        if is_fence(line) {
            return Ok((yaml_start, offset, offset + line.len()));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\n').trim_end_matches('\r') == "---"
}

/// Derives a slug from a path relative to the posts directory:
/// `foo/bar.md` becomes `/foo/bar/` and the bundle `foo/index.md` becomes
/// `/foo/`.
fn slug_for(relative_path: &Path) -> Result<String> {
    let without_extension = if relative_path.ends_with(BUNDLE_INDEX) {
        relative_path.parent().unwrap_or_else(|| Path::new("")).to_owned()
    } else {
        relative_path.with_extension("")
    };

    let mut slug = String::from("/");
    for component in without_extension.components() {
        match component {
            Component::Normal(name) => {
                let name = name
                    .to_str()
                    .ok_or_else(|| InvalidFileNameError(relative_path.to_owned()))?;
                slug.push_str(name);
                slug.push('/');
            }
            Component::CurDir => {}
            _ => return Err(InvalidFileNameError(relative_path.to_owned()).into()),
        }
    }
    Ok(slug)
}

fn parse_date(slug: &str, field: &str, raw: Option<&str>) -> Option<chrono::NaiveDateTime> {
    let raw = raw?;
    let parsed = date::parse(raw);
    if parsed.is_none() {
        warn!(post = slug, field, value = raw, "unrecognized date");
    }
    parsed
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    title: String,

    /// The publication date of the post.
    #[serde(default)]
    date: Option<String>,

    /// The date the post was last revised.
    #[serde(default)]
    update: Option<String>,

    /// The tags associated with the post.
    #[serde(default)]
    tags: Vec<String>,

    /// The series the post belongs to.
    #[serde(default)]
    series: Option<String>,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when there is a problem building a post URL.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn midnight(y: i32, m: u32, d: u32) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    fn site_url() -> Url {
        Url::parse("https://example.org/blog/").unwrap()
    }

    #[test]
    fn test_parse_str() -> Result<()> {
        let site_url = site_url();
        let parser = Parser::new(&site_url);
        let post = parser.parse_str(
            Path::new("rust/ownership.md"),
            "---\ntitle: Ownership\ndate: 2024-04-03\nupdate: 2024-05-01\ntags: [hiyen, rust]\nseries: Learning Rust\n---\nEvery value has an owner.\n",
        )?;

        assert_eq!(post.slug, "/rust/ownership/");
        assert_eq!(post.url.as_str(), "https://example.org/blog/rust/ownership/");
        assert_eq!(post.title, "Ownership");
        assert_eq!(post.date, midnight(2024, 4, 3));
        assert_eq!(post.update, midnight(2024, 5, 1));
        assert_eq!(post.tags, vec!["hiyen", "rust"]);
        assert_eq!(post.series.as_deref(), Some("Learning Rust"));
        assert_eq!(post.body, "Every value has an owner.\n");
        Ok(())
    }

    #[test]
    fn test_parse_str_optional_fields() -> Result<()> {
        let site_url = site_url();
        let post = Parser::new(&site_url)
            .parse_str(Path::new("bare.md"), "---\ntitle: Bare\n---\n")?;
        assert_eq!(post.date, None);
        assert_eq!(post.update, None);
        assert!(post.tags.is_empty());
        assert_eq!(post.series, None);
        assert_eq!(post.body, "");
        Ok(())
    }

    #[test]
    fn test_parse_str_malformed_date() -> Result<()> {
        let site_url = site_url();
        let post = Parser::new(&site_url)
            .parse_str(Path::new("odd.md"), "---\ntitle: Odd\ndate: last tuesday\n---\nbody")?;
        assert_eq!(post.date, None);
        Ok(())
    }

    #[test]
    fn test_dashes_inside_frontmatter() -> Result<()> {
        let site_url = site_url();
        let post = Parser::new(&site_url)
            .parse_str(Path::new("dashes.md"), "---\ntitle: a---b\n---\nbody")?;
        assert_eq!(post.title, "a---b");
        assert_eq!(post.body, "body");
        Ok(())
    }

    #[test]
    fn test_fence_must_be_whole_line() -> Result<()> {
        let site_url = site_url();
        let post = Parser::new(&site_url).parse_str(
            Path::new("rules.md"),
            "---\ntitle: Rules\nseries: |\n  a\n  ----\n  b\n---\nbody",
        )?;
        assert_eq!(post.series.as_deref(), Some("a\n----\nb\n"));
        assert_eq!(post.body, "body");

        match Parser::new(&site_url)
            .parse_str(Path::new("note.md"), "---\ntitle: A\n--- note\n----\n")
        {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("wanted missing end fence; got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_crlf_fences() -> Result<()> {
        let site_url = site_url();
        let post = Parser::new(&site_url)
            .parse_str(Path::new("crlf.md"), "---\r\ntitle: Windows\r\n---\r\nbody\r\n")?;
        assert_eq!(post.title, "Windows");
        assert_eq!(post.body, "body\r\n");
        Ok(())
    }

    #[test]
    fn test_missing_fences() {
        let site_url = site_url();
        let parser = Parser::new(&site_url);
        match parser.parse_str(Path::new("a.md"), "title: A\n") {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("wanted missing start fence; got {:?}", other),
        }
        match parser.parse_str(Path::new("a.md"), "---\ntitle: A\n") {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("wanted missing end fence; got {:?}", other),
        }
        match parser.parse_str(Path::new("a.md"), "") {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("wanted missing start fence; got {:?}", other),
        }
    }

    #[test]
    fn test_slug_for() -> Result<()> {
        assert_eq!(slug_for(Path::new("simple.md"))?, "/simple/");
        assert_eq!(slug_for(Path::new("nested/deeper.md"))?, "/nested/deeper/");
        assert_eq!(slug_for(Path::new("bundle/index.md"))?, "/bundle/");
        Ok(())
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.md"), "---\ntitle: B\n---\n")?;
        fs::write(dir.path().join("a.md"), "---\ntitle: A\n---\n")?;
        fs::write(dir.path().join("notes.txt"), "not a post")?;
        fs::create_dir(dir.path().join("c"))?;
        fs::write(dir.path().join("c").join("index.md"), "---\ntitle: C\n---\n")?;
        fs::write(dir.path().join("c").join("image.png"), [0u8; 4])?;

        let site_url = site_url();
        let posts = Parser::new(&site_url).parse_posts(dir.path())?;
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/a/", "/b/", "/c/"]);
        Ok(())
    }

    #[test]
    fn test_parse_posts_annotates_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("broken.md"), "no frontmatter")?;

        let site_url = site_url();
        match Parser::new(&site_url).parse_posts(dir.path()) {
            Err(err @ Error::Annotated(_, _)) => {
                assert_eq!(
                    err.to_string(),
                    "parsing post `broken.md`: Post must begin with `---`"
                );
            }
            other => panic!("wanted annotated error; got {:?}", other.map(|p| p.len())),
        }
        Ok(())
    }
}
