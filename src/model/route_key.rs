//! Route key newtype with smart constructors.
//!
//! A `RouteKey` is `pathname + search`. Two keys are equal iff both parts are
//! byte-identical. Fragments are dropped at construction.

use std::fmt;

/// Unique identifier for a navigable location (path + query string).
///
/// Used as the cache key for scroll positions and as the transition
/// controller's `current_path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    raw: String,
    query_start: usize,
}

impl RouteKey {
    /// Smart constructor from a combined `pathname?search` string.
    ///
    /// Rejects empty input and input not starting with `/`.
    /// A `#fragment` suffix is stripped.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRouteKey> {
        let mut raw = raw.into();
        if let Some(hash) = raw.find('#') {
            raw.truncate(hash);
        }
        if raw.is_empty() {
            return Err(InvalidRouteKey::Empty);
        }
        if !raw.starts_with('/') {
            return Err(InvalidRouteKey::NotAbsolute(raw));
        }
        let query_start = raw.find('?').unwrap_or(raw.len());
        Ok(Self { raw, query_start })
    }

    /// The site root, `/`.
    pub fn root() -> Self {
        Self {
            raw: "/".to_string(),
            query_start: 1,
        }
    }

    /// Build a key from router-provided `pathname` and `search` parts.
    ///
    /// `search` may be empty or carry its leading `?`.
    pub fn from_parts(pathname: &str, search: &str) -> Result<Self, InvalidRouteKey> {
        let search = search.strip_prefix('?').unwrap_or(search);
        if search.is_empty() {
            Self::new(pathname)
        } else {
            Self::new(format!("{pathname}?{search}"))
        }
    }

    /// The full key, `pathname` followed by the search string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The pathname portion (everything before `?`).
    pub fn pathname(&self) -> &str {
        &self.raw[..self.query_start]
    }

    /// The search portion including its leading `?`, or `""`.
    pub fn search(&self) -> &str {
        &self.raw[self.query_start..]
    }

    /// Whether both keys point at the same pathname (query may differ).
    pub fn same_pathname(&self, other: &RouteKey) -> bool {
        self.pathname() == other.pathname()
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for RouteKey {
    type Err = InvalidRouteKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> serde::Deserialize<'de> for RouteKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for RouteKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

// ===== Error Types =====

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRouteKey {
    #[error("Route key cannot be empty")]
    Empty,
    #[error("Route key must start with '/': {0:?}")]
    NotAbsolute(String),
}

// ===== Tests =====
