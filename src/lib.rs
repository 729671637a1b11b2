//! A library for serializable structural metadata snapshots of hierarchical
//! scientific data containers.
//!
//! A container (a file of groups and datasets, each carrying attributes) is
//! inspected through the read-only [`container::ReadableContainerTraits`]
//! boundary. The collector walks the whole hierarchy, producing one
//! type-tagged [`record::MetadataRecord`] per object — names, identities,
//! attributes, dataset shapes and datatypes, group member counts, and (for
//! small payloads) fully materialized values. Records are indexed into a
//! [`record::RecordStore`] and rendered losslessly as canonical JSON text or
//! an in-memory tree of basic types.
//!
//! Values that JSON cannot represent directly are normalized under explicit
//! rules (see [`value::normalize`]); per-dataset datatype and value read
//! failures are annotated in place without aborting the traversal.
//!
//! ## Example
//! ```rust
//! use h5meta::collect::CollectOptions;
//! use h5meta::container::{DatasetBuilder, MemoryContainer};
//! use h5meta::record::RecordStore;
//! use h5meta::serialize::to_json_text;
//! use h5meta::value::{DataType, NativeValue};
//!
//! let container = MemoryContainer::new("sample.h5");
//! container.create_group("/g")?;
//! DatasetBuilder::new(vec![2], DataType::Int64, NativeValue::Array(vec![
//!     NativeValue::Int(1),
//!     NativeValue::Int(2),
//! ]))
//! .attribute("note", NativeValue::Text("hi".to_string()))
//! .build(&container, "/g/ds")?;
//!
//! let store = RecordStore::from_container(&container, &CollectOptions::default())?;
//! println!("{}", to_json_text(&store)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod collect;
pub mod container;
pub mod record;
pub mod serialize;
pub mod value;
