//! JSON container documents.
//!
//! A container document describes a whole container in one JSON file: the
//! root object's attributes and a tree of `kind`-tagged child objects.
//! For example:
//! ```json
//! {
//!     "attributes": {"producer": "simulator 2.1"},
//!     "children": {
//!         "g": {
//!             "kind": "group",
//!             "children": {
//!                 "ds": {
//!                     "kind": "dataset",
//!                     "shape": [2, 3],
//!                     "dtype": "int64",
//!                     "value": [[1, 2, 3], [4, 5, 6]],
//!                     "attributes": {"note": "hi"}
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```
//! Scalar values map directly from JSON; byte-string values use the
//! `{"binary": "0x.."}` hex form (see
//! [`NativeValue::from_document`](crate::value::NativeValue::from_document)).
//! A `dtype` is kept as a raw descriptor, so a document may carry datatypes
//! this crate cannot read; they surface as datatype read errors during
//! collection, not at load time.

use serde::Deserialize;

use std::collections::BTreeMap;
use std::path::Path;

use crate::value::{NativeValue, UnsupportedValueError};

use super::{ContainerError, DatasetBuilder, MemoryContainer, ObjectPath};

/// A container opening error.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// The document is not valid JSON or not a container document.
    #[error("error parsing container document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
    /// A document value with no container-native counterpart.
    #[error("invalid value at {0}: {1}")]
    Value(String, UnsupportedValueError),
    /// An error building the in-memory container.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ContainerDocument {
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    children: BTreeMap<String, ObjectDocument>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ObjectDocument {
    Group {
        #[serde(default)]
        attributes: serde_json::Map<String, serde_json::Value>,
        #[serde(default)]
        children: BTreeMap<String, ObjectDocument>,
    },
    Dataset {
        shape: Vec<u64>,
        dtype: String,
        value: serde_json::Value,
        #[serde(default)]
        attributes: serde_json::Map<String, serde_json::Value>,
    },
}

impl MemoryContainer {
    /// Open the container document at `path`.
    ///
    /// The container's self-reported path is `path` as given.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the file cannot be read or is not a valid
    /// container document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        let bytes = std::fs::read(&path)?;
        let document = serde_json::from_slice(&bytes)?;
        build_container(path.as_ref().display().to_string(), &document)
    }

    /// Build a container from the container document in `document`, reporting
    /// `path` as the container's own path.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if `document` is not a valid container document.
    pub fn from_document_str(path: impl Into<String>, document: &str) -> Result<Self, OpenError> {
        let document = serde_json::from_str(document)?;
        build_container(path.into(), &document)
    }
}

fn build_container(path: String, document: &ContainerDocument) -> Result<MemoryContainer, OpenError> {
    let container = MemoryContainer::new(path);
    let root = ObjectPath::root();
    apply_attributes(&container, &root, &document.attributes)?;
    for (name, child) in &document.children {
        build_object(&container, &root, name, child)?;
    }
    Ok(container)
}

fn build_object(
    container: &MemoryContainer,
    parent: &ObjectPath,
    name: &str,
    object: &ObjectDocument,
) -> Result<(), OpenError> {
    let path = parent.child(name).map_err(ContainerError::from)?;
    match object {
        ObjectDocument::Group {
            attributes,
            children,
        } => {
            container.create_group(path.as_str())?;
            apply_attributes(container, &path, attributes)?;
            for (child_name, child) in children {
                build_object(container, &path, child_name, child)?;
            }
        }
        ObjectDocument::Dataset {
            shape,
            dtype,
            value,
            attributes,
        } => {
            let value = NativeValue::from_document(value)
                .map_err(|err| OpenError::Value(path.to_string(), err))?;
            DatasetBuilder::with_type_descriptor(shape.clone(), dtype.as_str(), value)
                .build(container, path.as_str())?;
            apply_attributes(container, &path, attributes)?;
        }
    }
    Ok(())
}

fn apply_attributes(
    container: &MemoryContainer,
    path: &ObjectPath,
    attributes: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), OpenError> {
    for (name, value) in attributes {
        let value = NativeValue::from_document(value)
            .map_err(|err| OpenError::Value(format!("{path} attribute {name}"), err))?;
        container.set_attribute(path.as_str(), name.as_str(), value)?;
    }
    Ok(())
}
