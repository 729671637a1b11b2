use derive_more::Display;
use thiserror::Error;

/// An absolute path identifying an object within a container hierarchy.
///
/// The root object is `/`. Every other object is addressed by the `/`-joined
/// names of the groups leading to it, e.g. `/trajectory/positions`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display("{_0}")]
pub struct ObjectPath(String);

/// An invalid object path.
#[derive(Debug, Error)]
#[error("invalid object path {0}")]
pub struct ObjectPathError(String);

impl ObjectPath {
    /// Create a new object path from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectPathError`] if `path` is not valid according to [`ObjectPath::validate`].
    pub fn new(path: &str) -> Result<Self, ObjectPathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(ObjectPathError(path.to_string()))
        }
    }

    /// The root object path.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the whole path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Indicates if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the final component of the path (the object name).
    ///
    /// The root path has the empty name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Returns the path of the containing group, or [`None`] for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some(("", _)) => Some(Self::root()),
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => None,
        }
    }

    /// Returns the path of the immediate child named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectPathError`] if `name` is empty or contains a `/`.
    pub fn child(&self, name: &str) -> Result<Self, ObjectPathError> {
        if name.is_empty() || name.contains('/') {
            return Err(ObjectPathError(name.to_string()));
        }
        if self.is_root() {
            Ok(Self(format!("/{name}")))
        } else {
            Ok(Self(format!("{}/{name}", self.0)))
        }
    }

    /// Validates a path according to the following rules:
    /// - a path always starts with `/`, and
    /// - a non-root path cannot end with `/`, because object names must be non-empty and cannot contain `/`.
    ///
    /// Additionally, it checks that there are no empty components (i.e. a `//` substring).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path == "/" || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }
}

impl TryFrom<&str> for ObjectPath {
    type Error = ObjectPathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}
