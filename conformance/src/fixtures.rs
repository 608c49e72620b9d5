//! Fixture retrieval with a disk-backed cache.
//!
//! A fixture name is resolved against the manifest location. The first
//! request for a name downloads it and stores a copy under the suite
//! directory; later requests (in this run or the next) read the copy.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use url::Url;

use crate::error::FetchError;

/// Retrieves the body of a resolved fixture location.
pub trait Fetch: Send + Sync {
    /// Returns the text behind `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the resource cannot be read.
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Fetches over HTTP(S) with `ureq`, and reads `file:` URLs from disk.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Creates a fetcher with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if url.scheme() == "file" {
            let path = url.to_file_path().map_err(|()| FetchError::InvalidName {
                name: url.to_string(),
                reason: "file URL has no local path".to_string(),
            })?;
            return std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source });
        }

        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        response.into_string().map_err(|e| FetchError::Http {
            url: url.to_string(),
            message: format!("reading body: {e}"),
        })
    }
}

/// An in-memory fetcher keyed by absolute URL. Records every request.
#[derive(Default)]
pub struct StaticFetcher {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// Creates an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document at `url`.
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })
    }
}

impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Name-keyed fixture cache backed by a local directory.
pub struct FixtureCache {
    base: Url,
    base_dir: Option<Url>,
    dir: PathBuf,
    fetcher: Box<dyn Fetch>,
}

impl FixtureCache {
    /// Creates a cache resolving names against `base` and storing copies
    /// under `dir`.
    pub fn new(base: Url, dir: impl Into<PathBuf>, fetcher: Box<dyn Fetch>) -> Self {
        let base_dir = base.join("./").ok();
        Self {
            base,
            base_dir,
            dir: dir.into(),
            fetcher,
        }
    }

    /// Resolves a fixture name to an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidName`] if the reference does not resolve.
    pub fn resolve(&self, name: &str) -> Result<Url, FetchError> {
        self.base.join(name).map_err(|e| FetchError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns the fixture name for an absolute location: the path relative
    /// to the manifest's directory when it lies beneath it, else the location
    /// unchanged.
    #[must_use]
    pub fn name_for(&self, location: &str) -> String {
        self.base_dir
            .as_ref()
            .and_then(|dir| location.strip_prefix(dir.as_str()))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(location)
            .to_string()
    }

    /// Returns the local cache path for `name`.
    ///
    /// Relative names map to the same relative path under the suite
    /// directory; absolute URLs map to `<host>/<path>`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidName`] for empty names or names that
    /// would escape the suite directory.
    pub fn local_path(&self, name: &str) -> Result<PathBuf, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let mut path = self.dir.clone();
        let relative = match Url::parse(name) {
            Ok(url) => {
                path.push(url.host_str().unwrap_or("_local"));
                url.path().to_string()
            }
            Err(_) => name.to_string(),
        };
        let mut pushed = false;
        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(invalid("parent directory references are not cached")),
                s if s.contains('\\') => return Err(invalid("backslash in path segment")),
                s => {
                    path.push(s);
                    pushed = true;
                }
            }
        }
        if pushed {
            Ok(path)
        } else {
            Err(invalid("name has no file component"))
        }
    }

    /// Returns the content of fixture `name`, fetching and persisting it on
    /// a cache miss. An empty name yields empty content.
    ///
    /// A copy that cannot be persisted is logged and skipped; the fetched
    /// content is still returned, and the next request fetches again.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error verbatim on a miss that cannot be
    /// retrieved, or an I/O error if a cached copy exists but is unreadable.
    pub fn fetch(&self, name: &str) -> Result<String, FetchError> {
        if name.is_empty() {
            return Ok(String::new());
        }
        let path = self.local_path(name)?;
        if path.is_file() {
            tracing::debug!(name, path = %path.display(), "fixture cache hit");
            return std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source });
        }

        let url = self.resolve(name)?;
        tracing::debug!(name, %url, "fixture cache miss");
        let body = self.fetcher.fetch(&url)?;
        if let Err(e) = persist(&path, &body) {
            tracing::warn!(name, error = %e, "could not cache fixture");
        }
        Ok(body)
    }
}

/// Writes through a temporary sibling and renames, so a concurrent reader
/// never observes a half-written copy.
fn persist(path: &Path, body: &str) -> Result<(), FetchError> {
    let io = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io)?;
    tmp.write_all(body.as_bytes()).map_err(io)?;
    tmp.persist(path).map_err(|e| io(e.error))?;
    Ok(())
}
