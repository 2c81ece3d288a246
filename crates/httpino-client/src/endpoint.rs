//! URL construction for API endpoints under a base host

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use url::Url;

/// Base used by [`Endpoint::localhost`]
pub const LOCALHOST: &str = "http://localhost:8080/";

/// Endpoint construction errors
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Invalid URL parse error
    #[error("Invalid base URL '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// URL cannot be used as a base
    #[error("URL cannot be a base: {0}")]
    CannotBeABase(Url),
}

/// A server that API calls are made against, e.g. `http://localhost:8080/api/`
#[derive(Debug, Clone)]
pub struct Host {
    url: Url,
}

impl Host {
    pub fn parse(base: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(base).map_err(|source| EndpointError::Parse {
            input: base.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(url));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn segments(&self) -> Vec<String> {
        split_segments(self.url.path())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.url.as_str() == other.url.as_str()
    }
}

impl Eq for Host {}

impl Hash for Host {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.as_str().hash(state);
    }
}

/// A path (and optional query parameters) under a [`Host`].
///
/// Endpoints are immutable: [`Endpoint::with_path_segment`] and
/// [`Endpoint::with_parameter`] return modified copies, so a shared base
/// endpoint can be specialised per request.
#[derive(Debug, Clone)]
pub struct Endpoint {
    host: Host,
    path: Vec<String>,
    parameters: BTreeMap<String, String>,
}

impl Endpoint {
    /// `path` is appended to the host's own path; leading and trailing
    /// slashes make no difference.
    pub fn new(host: Host, path: &str) -> Self {
        let mut segments = host.segments();
        segments.extend(split_segments(path));
        Self {
            host,
            path: segments,
            parameters: BTreeMap::new(),
        }
    }

    pub fn parse(base: &str, path: &str) -> Result<Self, EndpointError> {
        Ok(Self::new(Host::parse(base)?, path))
    }

    /// An endpoint on `http://localhost:8080/`, for quick local testing
    pub fn localhost(path: &str) -> Result<Self, EndpointError> {
        Self::parse(LOCALHOST, path)
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Copy of this endpoint with one more path segment. Blank segments are ignored.
    pub fn with_path_segment(&self, segment: impl AsRef<str>) -> Self {
        let mut configured = self.clone();
        let segment = segment.as_ref();
        if !segment.trim().is_empty() {
            configured.path.push(segment.to_string());
        }
        configured
    }

    /// Copy of this endpoint with a query parameter set, replacing any
    /// previous value. Blank names are ignored.
    pub fn with_parameter(&self, name: impl AsRef<str>, value: impl ToString) -> Self {
        let mut configured = self.clone();
        let name = name.as_ref();
        if !name.trim().is_empty() {
            configured
                .parameters
                .insert(name.to_string(), value.to_string());
        }
        configured
    }

    /// Full URL: host, joined path, then query parameters sorted by name.
    ///
    /// Query parameters already present on the host URL are kept unless an
    /// endpoint parameter of the same name replaces them.
    pub fn url(&self) -> Url {
        let mut url = self.host.url.clone();
        url.set_path(&format!("/{}", self.path.join("/")));

        let mut query: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
        query.extend(
            self.parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url().as_str())
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.url() == other.url()
    }
}

impl Eq for Endpoint {}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.trim().is_empty())
        .map(str::to_string)
        .collect()
}
