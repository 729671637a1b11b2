//! Read access to hierarchical containers.
//!
//! A container is a hierarchical scientific data file: a root [file
//! object](ObjectKind::File) holding [groups](ObjectKind::Group) and
//! [datasets](ObjectKind::Dataset), any of which can carry attributes.
//!
//! The metadata collector only ever sees a container through
//! [`ReadableContainerTraits`], the narrow read-only boundary defined here.
//! The caller owns the container handle: it opens the container before
//! collection, and closing it afterwards is its responsibility — nothing in
//! this crate closes a handle it did not open.
//!
//! [`MemoryContainer`] is the bundled implementation: an in-memory container
//! buildable programmatically or loaded from a JSON container document (see
//! [`MemoryContainer::open`]).

mod document;
mod memory;
mod object_path;

pub use document::OpenError;
pub use memory::{DatasetBuilder, MemoryContainer};
pub use object_path::{ObjectPath, ObjectPathError};

use thiserror::Error;

use crate::value::{DataType, NativeValue, UnsupportedDataTypeError};

/// The kind of an object in a container hierarchy.
///
/// Every object has exactly one kind. [`ObjectKind::Other`] is the safety
/// fallback for object kinds a future container may expose; the collector
/// records such objects without a kind-specific sub-record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// The container itself, i.e. the root object.
    File,
    /// An interior node that contains other objects.
    Group,
    /// A leaf node holding a typed, shaped array of values.
    Dataset,
    /// An object kind this crate does not model.
    Other,
}

impl ObjectKind {
    /// The lowercase label of the kind, as used in member counts and
    /// serialized records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Group => "group",
            Self::Dataset => "dataset",
            Self::Other => "other",
        }
    }
}

impl core::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A container read error.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No object at the given path.
    #[error("object not found at {0}")]
    ObjectNotFound(ObjectPath),
    /// An object already exists at the given path.
    #[error("object already exists at {0}")]
    ObjectExists(ObjectPath),
    /// A dataset operation was attempted on a non-dataset object.
    #[error("object at {0} is not a dataset")]
    NotADataset(ObjectPath),
    /// A child was added to an object that cannot contain children.
    #[error("object at {0} cannot contain children")]
    NotAGroup(ObjectPath),
    /// An invalid object path.
    #[error(transparent)]
    InvalidPath(#[from] ObjectPathError),
    /// A datatype the container cannot map onto [`DataType`].
    #[error(transparent)]
    UnsupportedDataType(#[from] UnsupportedDataTypeError),
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for ContainerError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for ContainerError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

/// Readable container traits.
///
/// This is the complete interface the metadata collector needs from an open
/// container handle: self-identity, per-object identity and attributes,
/// child enumeration with kind tags, dataset shape/datatype/value reads, and
/// a full-hierarchy visitor. Implementations never mutate the container.
pub trait ReadableContainerTraits: Send + Sync {
    /// The container's self-reported path.
    fn container_path(&self) -> String;

    /// The identity of the container segment owning the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no object exists at `path`.
    fn file_number(&self, path: &ObjectPath) -> Result<u64, ContainerError>;

    /// The container-assigned numeric identity of the object at `path`.
    ///
    /// Identities are opaque and only meaningful within one open session.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no object exists at `path`.
    fn object_id(&self, path: &ObjectPath) -> Result<u64, ContainerError>;

    /// The kind of the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no object exists at `path`.
    fn kind(&self, path: &ObjectPath) -> Result<ObjectKind, ContainerError>;

    /// The attributes of the object at `path`, in the container's attribute
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no object exists at `path` or the
    /// attributes cannot be read.
    fn attributes(&self, path: &ObjectPath)
        -> Result<Vec<(String, NativeValue)>, ContainerError>;

    /// The immediate children of the object at `path` with their kinds, in
    /// the container's natural enumeration order. Leaf objects have no
    /// children.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no object exists at `path` or the
    /// children cannot be enumerated.
    fn children(&self, path: &ObjectPath) -> Result<Vec<(String, ObjectKind)>, ContainerError>;

    /// The dimension sizes of the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no dataset exists at `path`.
    fn dataset_shape(&self, path: &ObjectPath) -> Result<Vec<u64>, ContainerError>;

    /// The datatype of the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no dataset exists at `path` or its
    /// datatype cannot be mapped onto [`DataType`].
    fn dataset_data_type(&self, path: &ObjectPath) -> Result<DataType, ContainerError>;

    /// The fully materialized value of the dataset at `path`.
    ///
    /// This reads the entire dataset into memory.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if no dataset exists at `path` or its value
    /// cannot be read.
    fn dataset_value(&self, path: &ObjectPath) -> Result<NativeValue, ContainerError>;

    /// Visit every descendant of the object at `path` exactly once,
    /// depth-first, in the container's natural enumeration order. The object
    /// at `path` itself is not visited.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if enumeration fails or the visitor returns
    /// an error; visiting stops at the first error.
    fn visit(
        &self,
        path: &ObjectPath,
        visitor: &mut dyn FnMut(&ObjectPath, ObjectKind) -> Result<(), ContainerError>,
    ) -> Result<(), ContainerError> {
        for (name, kind) in self.children(path)? {
            let child = path.child(&name)?;
            visitor(&child, kind)?;
            if matches!(kind, ObjectKind::Group | ObjectKind::File) {
                self.visit(&child, visitor)?;
            }
        }
        Ok(())
    }
}
