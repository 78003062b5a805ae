use serde::Serialize;
use std::{fmt, path::PathBuf};

/// A specifier string captured from an import/export statement, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpecifier {
    pub request: String,
    pub from_file: PathBuf,
}

/// A specifier that resolved to an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub specifier: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] =
        [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete, HttpMethod::Patch];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    /// Case-insensitive lookup (`get`, `GET` and `Get` are the same method).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// One detected HTTP-client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCall {
    pub method: HttpMethod,
    pub raw_path: String,
    pub dynamic: bool,
    /// Interpolated expressions, verbatim, in order of appearance
    pub variables: Vec<String>,
    /// The file the call was found in
    pub file: PathBuf,
}

/// Canonical route pattern: single leading slash, no empty segments,
/// `${expr}` interpolations replaced by `:name` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedRoute(pub(crate) String);

impl NormalizedRoute {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The route below the leading `api` segment, e.g. `user/:user/posts`
    /// for `/api/user/:user/posts`. `None` when there is nothing below `api`.
    pub fn api_tail(&self) -> Option<String> {
        let mut segments = self.segments();
        if segments.next() != Some("api") {
            return None;
        }
        let tail: Vec<&str> = segments.collect();
        if tail.is_empty() { None } else { Some(tail.join("/")) }
    }
}

impl fmt::Display for NormalizedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
