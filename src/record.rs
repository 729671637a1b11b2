//! Metadata records.
//!
//! A [`MetadataRecord`] is the unit of a snapshot: one record per visited
//! object, holding the kind-independent facts (name, identity, attributes)
//! and exactly one kind-specific sub-record for files, groups, and datasets.
//! Records hold only normalized JSON values, so a snapshot stays valid after
//! the container handle it was collected from is closed.

mod record_store;

pub use record_store::RecordStore;

use serde::Serialize;

use crate::container::ObjectKind;

/// Metadata collected from a single container object.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MetadataRecord {
    /// The full path-qualified name of the object.
    pub name: String,
    /// The container-assigned numeric identity of the object. Opaque, and
    /// only meaningful within one open session.
    pub id: u64,
    /// The kind of the object.
    pub kind: ObjectKind,
    /// The object's attributes, normalized, in the container's attribute
    /// order.
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Messages for attributes whose values failed normalization. Such
    /// attributes appear in [`attributes`](Self::attributes) with a `null`
    /// value; no attribute is silently omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_errors: Option<serde_json::Map<String, serde_json::Value>>,
    /// Dataset facts, present iff `kind` is [`ObjectKind::Dataset`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetRecord>,
    /// Group facts, present iff `kind` is [`ObjectKind::Group`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRecord>,
    /// File facts, present iff `kind` is [`ObjectKind::File`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRecord>,
}

/// Dataset facts of a [`MetadataRecord`].
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DatasetRecord {
    /// The dimension sizes of the dataset.
    pub shape: Vec<u64>,
    /// The number of dimensions.
    pub ndim: usize,
    /// The datatype descriptor name, or `null` when the datatype could not
    /// be read (see [`dtype_error`](Self::dtype_error)).
    pub dtype: Option<String>,
    /// Why the datatype could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype_error: Option<String>,
    /// The fully materialized, normalized dataset value. Absent when
    /// materialization or normalization failed (see
    /// [`value_error`](Self::value_error)).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// The category label of the native value behind
    /// [`value`](Self::value), e.g. `"array"` or `"opaque"`. Distinguishes
    /// the lossy opaque-value fallback from a genuinely string-valued
    /// dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<String>,
    /// Why the value could not be materialized or normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_error: Option<String>,
}

/// Group facts of a [`MetadataRecord`].
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GroupRecord {
    /// The identity of the container segment owning the group.
    pub file_number: u64,
    /// Immediate member counts by kind label, plus a `"total"` entry equal
    /// to their sum. One level only; nested members are counted by their own
    /// group's record.
    pub member_counts: serde_json::Map<String, serde_json::Value>,
}

/// File facts of a [`MetadataRecord`].
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FileRecord {
    /// The container's self-reported path.
    pub path: String,
}
