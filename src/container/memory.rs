//! An in-memory container.

use parking_lot::RwLock;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::{DataType, NativeValue};

use super::{ContainerError, ObjectKind, ObjectPath, ReadableContainerTraits};

#[derive(Debug)]
struct DatasetEntry {
    shape: Vec<u64>,
    /// Raw datatype descriptor, parsed when the datatype is read. A
    /// descriptor with no [`DataType`] counterpart fails at read time, like
    /// an on-disk element type the reader cannot map.
    type_descriptor: String,
    value: NativeValue,
}

#[derive(Debug)]
struct ObjectEntry {
    id: u64,
    kind: ObjectKind,
    attributes: Vec<(String, NativeValue)>,
    dataset: Option<DatasetEntry>,
}

/// An in-memory container.
///
/// Objects live in a path-ordered table, so child enumeration follows name
/// order. The root object exists from construction and has kind
/// [`ObjectKind::File`]. Object identities are assigned in creation order
/// and are only meaningful within this container instance.
#[derive(Debug)]
pub struct MemoryContainer {
    path: String,
    file_number: u64,
    next_id: AtomicU64,
    objects: RwLock<BTreeMap<ObjectPath, ObjectEntry>>,
}

impl MemoryContainer {
    /// Create a new container whose self-reported path is `path`, containing
    /// only the root object.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let root = ObjectEntry {
            id: 1,
            kind: ObjectKind::File,
            attributes: Vec::new(),
            dataset: None,
        };
        Self {
            path: path.into(),
            file_number: 0,
            next_id: AtomicU64::new(2),
            objects: RwLock::new(BTreeMap::from([(ObjectPath::root(), root)])),
        }
    }

    /// Sets the identity of the container segment reported for every object.
    #[must_use]
    pub fn with_file_number(mut self, file_number: u64) -> Self {
        self.file_number = file_number;
        self
    }

    /// Create an empty group at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if `path` is invalid, already occupied, or
    /// its parent is missing or cannot contain children.
    pub fn create_group(&self, path: &str) -> Result<(), ContainerError> {
        self.insert_object(ObjectPath::new(path)?, ObjectKind::Group, None)
    }

    /// Set an attribute on the object at `path`, replacing any attribute with
    /// the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if `path` is invalid or no object exists
    /// there.
    pub fn set_attribute(
        &self,
        path: &str,
        name: impl Into<String>,
        value: NativeValue,
    ) -> Result<(), ContainerError> {
        let path = ObjectPath::new(path)?;
        let mut objects = self.objects.write();
        let entry = objects
            .get_mut(&path)
            .ok_or_else(|| ContainerError::ObjectNotFound(path.clone()))?;
        let name = name.into();
        if let Some(attribute) = entry
            .attributes
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            attribute.1 = value;
        } else {
            entry.attributes.push((name, value));
        }
        Ok(())
    }

    fn insert_object(
        &self,
        path: ObjectPath,
        kind: ObjectKind,
        dataset: Option<DatasetEntry>,
    ) -> Result<(), ContainerError> {
        let parent = path
            .parent()
            .ok_or_else(|| ContainerError::ObjectExists(path.clone()))?;
        let mut objects = self.objects.write();
        match objects.get(&parent) {
            None => return Err(ContainerError::ObjectNotFound(parent)),
            Some(entry) if !matches!(entry.kind, ObjectKind::File | ObjectKind::Group) => {
                return Err(ContainerError::NotAGroup(parent))
            }
            Some(_) => {}
        }
        if objects.contains_key(&path) {
            return Err(ContainerError::ObjectExists(path));
        }
        let entry = ObjectEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            attributes: Vec::new(),
            dataset,
        };
        objects.insert(path, entry);
        Ok(())
    }

    fn with_entry<T>(
        &self,
        path: &ObjectPath,
        f: impl FnOnce(&ObjectEntry) -> T,
    ) -> Result<T, ContainerError> {
        let objects = self.objects.read();
        let entry = objects
            .get(path)
            .ok_or_else(|| ContainerError::ObjectNotFound(path.clone()))?;
        Ok(f(entry))
    }

    fn with_dataset<T>(
        &self,
        path: &ObjectPath,
        f: impl FnOnce(&DatasetEntry) -> T,
    ) -> Result<T, ContainerError> {
        self.with_entry(path, |entry| {
            entry
                .dataset
                .as_ref()
                .map(f)
                .ok_or_else(|| ContainerError::NotADataset(path.clone()))
        })?
    }
}

impl ReadableContainerTraits for MemoryContainer {
    fn container_path(&self) -> String {
        self.path.clone()
    }

    fn file_number(&self, path: &ObjectPath) -> Result<u64, ContainerError> {
        self.with_entry(path, |_| self.file_number)
    }

    fn object_id(&self, path: &ObjectPath) -> Result<u64, ContainerError> {
        self.with_entry(path, |entry| entry.id)
    }

    fn kind(&self, path: &ObjectPath) -> Result<ObjectKind, ContainerError> {
        self.with_entry(path, |entry| entry.kind)
    }

    fn attributes(
        &self,
        path: &ObjectPath,
    ) -> Result<Vec<(String, NativeValue)>, ContainerError> {
        self.with_entry(path, |entry| entry.attributes.clone())
    }

    fn children(&self, path: &ObjectPath) -> Result<Vec<(String, ObjectKind)>, ContainerError> {
        let objects = self.objects.read();
        if !objects.contains_key(path) {
            return Err(ContainerError::ObjectNotFound(path.clone()));
        }
        Ok(objects
            .iter()
            .filter(|(candidate, _)| candidate.parent().as_ref() == Some(path))
            .map(|(candidate, entry)| (candidate.name().to_string(), entry.kind))
            .collect())
    }

    fn dataset_shape(&self, path: &ObjectPath) -> Result<Vec<u64>, ContainerError> {
        self.with_dataset(path, |dataset| dataset.shape.clone())
    }

    fn dataset_data_type(&self, path: &ObjectPath) -> Result<DataType, ContainerError> {
        let descriptor = self.with_dataset(path, |dataset| dataset.type_descriptor.clone())?;
        Ok(descriptor.parse::<DataType>()?)
    }

    fn dataset_value(&self, path: &ObjectPath) -> Result<NativeValue, ContainerError> {
        self.with_dataset(path, |dataset| dataset.value.clone())
    }
}

/// A builder for a dataset in a [`MemoryContainer`].
#[derive(Debug)]
pub struct DatasetBuilder {
    shape: Vec<u64>,
    type_descriptor: String,
    value: NativeValue,
    attributes: Vec<(String, NativeValue)>,
}

impl DatasetBuilder {
    /// Create a new dataset builder with `shape`, `data_type`, and the
    /// dataset's full `value`.
    #[must_use]
    pub fn new(shape: Vec<u64>, data_type: DataType, value: NativeValue) -> Self {
        Self::with_type_descriptor(shape, data_type.identifier(), value)
    }

    /// Create a new dataset builder with a raw datatype descriptor.
    ///
    /// A descriptor with no [`DataType`] counterpart builds fine but fails
    /// when the dataset's datatype is read.
    #[must_use]
    pub fn with_type_descriptor(
        shape: Vec<u64>,
        type_descriptor: impl Into<String>,
        value: NativeValue,
    ) -> Self {
        Self {
            shape,
            type_descriptor: type_descriptor.into(),
            value,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: NativeValue) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Build the dataset into `container` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if `path` is invalid, already occupied, or
    /// its parent is missing or cannot contain children.
    pub fn build(self, container: &MemoryContainer, path: &str) -> Result<(), ContainerError> {
        let object_path = ObjectPath::new(path)?;
        container.insert_object(
            object_path,
            ObjectKind::Dataset,
            Some(DatasetEntry {
                shape: self.shape,
                type_descriptor: self.type_descriptor,
                value: self.value,
            }),
        )?;
        for (name, value) in self.attributes {
            container.set_attribute(path, name, value)?;
        }
        Ok(())
    }
}
