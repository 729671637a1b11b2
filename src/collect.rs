//! Recursive metadata collection.
//!
//! [`collect_hierarchy`] walks every object reachable from a container's
//! root and produces one [`MetadataRecord`] per object via
//! [`extract_object`]. Failures confined to a single dataset's datatype or
//! value are recorded in that record and never stop the traversal; failures
//! of the traversal itself are fatal and surface as [`ContainerError`].

use itertools::Itertools;

use crate::container::{ContainerError, ObjectKind, ObjectPath, ReadableContainerTraits};
use crate::record::{DatasetRecord, FileRecord, GroupRecord, MetadataRecord};
use crate::value::normalize;

/// Options for metadata collection.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    max_value_elements: Option<u64>,
}

impl CollectOptions {
    /// Get the dataset value materialization cap.
    #[must_use]
    pub fn max_value_elements(&self) -> Option<u64> {
        self.max_value_elements
    }

    /// Set the dataset value materialization cap.
    ///
    /// Datasets with more elements than the cap are not materialized; their
    /// records carry a value error instead. The default is unbounded: every
    /// dataset value is read eagerly and in full, which can exhaust memory
    /// on very large datasets.
    pub fn set_max_value_elements(&mut self, max_value_elements: Option<u64>) -> &mut Self {
        self.max_value_elements = max_value_elements;
        self
    }
}

/// Collect a metadata record for every object in `container`.
///
/// The root object is visited first under its own path `/`, then every
/// descendant exactly once, depth-first, in the container's natural
/// enumeration order. Each record's name is the object's full hierarchical
/// path.
///
/// # Errors
///
/// Returns [`ContainerError`] if the traversal itself fails; per-dataset
/// datatype and value read failures are recorded in the affected record and
/// do not stop collection.
pub fn collect_hierarchy<TContainer: ReadableContainerTraits + ?Sized>(
    container: &TContainer,
    options: &CollectOptions,
) -> Result<Vec<MetadataRecord>, ContainerError> {
    let root = ObjectPath::root();
    let root_kind = container.kind(&root)?;
    let mut records = vec![extract_object(container, &root, root_kind, options)?];
    container.visit(&root, &mut |path, kind| {
        records.push(extract_object(container, path, kind, options)?);
        Ok(())
    })?;
    Ok(records)
}

/// Extract the metadata record of the object at `path`.
///
/// The kind-independent facts (name, identity, attributes) are always
/// extracted; `kind` selects the one kind-specific sub-record. Attribute
/// values that fail normalization are recorded as `null` with a message in
/// the record's attribute errors, independently of the rest of the record.
///
/// # Errors
///
/// Returns [`ContainerError`] if the object's identity, attributes, or
/// child enumeration cannot be read. Dataset datatype and value failures are
/// not errors here; they are recorded in the returned record.
pub fn extract_object<TContainer: ReadableContainerTraits + ?Sized>(
    container: &TContainer,
    path: &ObjectPath,
    kind: ObjectKind,
    options: &CollectOptions,
) -> Result<MetadataRecord, ContainerError> {
    let id = container.object_id(path)?;
    let mut attributes = serde_json::Map::new();
    let mut attribute_errors = serde_json::Map::new();
    for (name, value) in container.attributes(path)? {
        match normalize(&value) {
            Ok(normalized) => {
                attributes.insert(name, normalized);
            }
            Err(err) => {
                attributes.insert(name.clone(), serde_json::Value::Null);
                attribute_errors.insert(name, serde_json::Value::String(err.to_string()));
            }
        }
    }
    let mut record = MetadataRecord {
        name: path.as_str().to_string(),
        id,
        kind,
        attributes,
        attribute_errors: (!attribute_errors.is_empty()).then_some(attribute_errors),
        dataset: None,
        group: None,
        file: None,
    };
    match kind {
        ObjectKind::Dataset => {
            record.dataset = Some(extract_dataset(container, path, options)?);
        }
        ObjectKind::Group => record.group = Some(extract_group(container, path)?),
        ObjectKind::File => {
            record.file = Some(FileRecord {
                path: container.container_path(),
            });
        }
        ObjectKind::Other => {}
    }
    Ok(record)
}

fn extract_dataset<TContainer: ReadableContainerTraits + ?Sized>(
    container: &TContainer,
    path: &ObjectPath,
    options: &CollectOptions,
) -> Result<DatasetRecord, ContainerError> {
    let shape = container.dataset_shape(path)?;
    let ndim = shape.len();
    // The datatype and value reads are independent; a failure in either is
    // recorded in the record and must not suppress the other.
    let (dtype, dtype_error) = match container.dataset_data_type(path) {
        Ok(data_type) => (Some(data_type.identifier().to_string()), None),
        Err(err) => (None, Some(err.to_string())),
    };
    let mut record = DatasetRecord {
        shape,
        ndim,
        dtype,
        dtype_error,
        value: None,
        value_kind: None,
        value_error: None,
    };
    let num_elements = record.shape.iter().product::<u64>();
    if let Some(cap) = options.max_value_elements() {
        if num_elements > cap {
            record.value_error = Some(format!(
                "value not materialized: {num_elements} elements exceeds the cap of {cap}"
            ));
            return Ok(record);
        }
    }
    match container.dataset_value(path) {
        Ok(value) => match normalize(&value) {
            Ok(normalized) => {
                record.value_kind = Some(value.kind_label().to_string());
                record.value = Some(normalized);
            }
            Err(err) => record.value_error = Some(err.to_string()),
        },
        Err(err) => record.value_error = Some(err.to_string()),
    }
    Ok(record)
}

fn extract_group<TContainer: ReadableContainerTraits + ?Sized>(
    container: &TContainer,
    path: &ObjectPath,
) -> Result<GroupRecord, ContainerError> {
    let children = container.children(path)?;
    let counts = children.iter().map(|(_, kind)| kind.label()).counts();
    let mut member_counts = serde_json::Map::new();
    for label in counts.keys().copied().sorted_unstable() {
        member_counts.insert(label.to_string(), counts[label].into());
    }
    member_counts.insert("total".to_string(), children.len().into());
    Ok(GroupRecord {
        file_number: container.file_number(path)?,
        member_counts,
    })
}
