//! Resource locators and the lazily-resolved providers that wrap them.

use crate::core::error::LocatorError;
use std::fmt;
use url::Url;

const LOCAL_SCHEME: &str = "file";
const LOCAL_ROOT: &str = "file:///";

/// A parsed, normalized reference to a file or directory.
///
/// Two ids are equal when url and kind match; no file system is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    url: Url,
    is_directory: bool,
}

impl ResourceId {
    /// Parses `scheme://path` or a bare local path into a new resource id.
    ///
    /// Bare relative paths are rooted at `/`, so the result never depends on the
    /// working directory of the process that parsed it.
    pub fn new_resource(spec: &str, is_directory: bool) -> Result<Self, LocatorError> {
        let unusable = |reason| LocatorError::Unusable {
            spec: spec.to_string(),
            reason,
        };
        if spec.trim().is_empty() {
            return Err(unusable("empty location"));
        }

        let parsed = if spec.contains("://") {
            Url::parse(spec)
        } else {
            Url::parse(LOCAL_ROOT).and_then(|root| root.join(spec))
        };
        let url = parsed.map_err(|source| LocatorError::InvalidSpec {
            spec: spec.to_string(),
            source,
        })?;
        Self::from_url(url, is_directory).map_err(unusable)
    }

    /// Drops empty segments and fixes the trailing separator to match the kind.
    fn from_url(mut url: Url, is_directory: bool) -> Result<Self, &'static str> {
        if url.scheme() != LOCAL_SCHEME && url.host_str().is_none_or(str::is_empty) {
            return Err("missing bucket or host");
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err("query or fragment in a resource path");
        }

        let segments: Vec<String> = url
            .path_segments()
            .ok_or("not a hierarchical path")?
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() && !is_directory {
            return Err("a file needs a name");
        }
        // Segments are already percent-encoded, so set the path as text.
        let mut path = format!("/{}", segments.join("/"));
        if is_directory && !segments.is_empty() {
            path.push('/');
        }
        url.set_path(&path);
        Ok(Self { url, is_directory })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Resolves `name` relative to this directory. `name` may hold several
    /// `/`-separated segments, but no empty, `.` or `..` ones.
    pub fn child(&self, name: &str, is_directory: bool) -> Result<ResourceId, LocatorError> {
        let unusable = |reason| LocatorError::Unusable {
            spec: format!("{}{}", self, name),
            reason,
        };
        if !self.is_directory {
            return Err(unusable("parent is not a directory"));
        }
        let segments: Vec<&str> = name.split('/').collect();
        if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
            return Err(unusable("child names must be plain relative segments"));
        }

        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| unusable("not a hierarchical path"))?
            .pop_if_empty()
            .extend(segments);
        Self::from_url(url, is_directory).map_err(unusable)
    }

    /// The directory containing this resource; `None` at the root.
    pub fn parent(&self) -> Option<ResourceId> {
        if self.url.path() == "/" {
            return None;
        }
        let mut url = self.url.clone();
        url.path_segments_mut().ok()?.pop_if_empty().pop();
        Self::from_url(url, true).ok()
    }

    /// Last path segment, without a trailing separator.
    pub fn filename(&self) -> &str {
        self.url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or("")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.scheme() == LOCAL_SCHEME {
            f.write_str(self.url.path())
        } else {
            f.write_str(self.url.as_str())
        }
    }
}

/// A destination that may only become known when the pipeline runs.
#[derive(Debug, Clone)]
pub enum LocatorProvider {
    /// Known at construction time.
    Static(ResourceId),
    /// Supplied by the named runtime option; inaccessible until then.
    Deferred { option: String },
}

impl LocatorProvider {
    pub fn of(resource: ResourceId) -> Self {
        LocatorProvider::Static(resource)
    }

    pub fn deferred(option: impl Into<String>) -> Self {
        LocatorProvider::Deferred {
            option: option.into(),
        }
    }

    pub fn is_accessible(&self) -> bool {
        matches!(self, LocatorProvider::Static(_))
    }

    /// Produces the concrete resource, or explains why it is not available yet.
    pub fn resolve(&self) -> Result<&ResourceId, LocatorError> {
        match self {
            LocatorProvider::Static(resource) => Ok(resource),
            LocatorProvider::Deferred { option } => Err(LocatorError::NotAccessible {
                option: option.clone(),
            }),
        }
    }

    /// Binds a deferred provider to its runtime value. Static providers are returned as is.
    pub fn bind(self, resource: ResourceId) -> Self {
        match self {
            LocatorProvider::Deferred { .. } => LocatorProvider::Static(resource),
            resolved => resolved,
        }
    }

    /// True only when both sides resolve and point at the same resource.
    pub fn same_resource(&self, other: &LocatorProvider) -> bool {
        match (self.resolve(), other.resolve()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl From<ResourceId> for LocatorProvider {
    fn from(resource: ResourceId) -> Self {
        LocatorProvider::Static(resource)
    }
}
