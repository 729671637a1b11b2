use std::error::Error;
use std::io::Write;

use h5meta::collect::{collect_hierarchy, CollectOptions};
use h5meta::container::{DatasetBuilder, MemoryContainer, ObjectKind, OpenError};
use h5meta::record::RecordStore;
use h5meta::serialize::{to_json_text, to_plain_structure};
use h5meta::value::{DataType, NativeValue};

fn sample_container() -> Result<MemoryContainer, Box<dyn Error>> {
    let container = MemoryContainer::new("sample.h5");
    container.create_group("/g")?;
    DatasetBuilder::new(
        vec![2, 3],
        DataType::Int64,
        NativeValue::Array(vec![
            NativeValue::Array(vec![
                NativeValue::Int(1),
                NativeValue::Int(2),
                NativeValue::Int(3),
            ]),
            NativeValue::Array(vec![
                NativeValue::Int(4),
                NativeValue::Int(5),
                NativeValue::Int(6),
            ]),
        ]),
    )
    .attribute("note", NativeValue::Text("hi".to_string()))
    .build(&container, "/g/ds")?;
    Ok(container)
}

#[test]
fn collects_root_and_descendants() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    let records = collect_hierarchy(&container, &CollectOptions::default())?;

    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["/", "/g", "/g/ds"]);
    assert_eq!(
        records.iter().map(|record| record.kind).collect::<Vec<_>>(),
        vec![ObjectKind::File, ObjectKind::Group, ObjectKind::Dataset]
    );
    // Exactly one kind-specific sub-record per record.
    for record in &records {
        let sub_records = [
            record.file.is_some(),
            record.group.is_some(),
            record.dataset.is_some(),
        ];
        assert_eq!(sub_records.iter().filter(|&&present| present).count(), 1);
    }
    Ok(())
}

#[test]
fn collects_deep_hierarchies() -> Result<(), Box<dyn Error>> {
    let container = MemoryContainer::new("deep.h5");
    container.create_group("/a")?;
    container.create_group("/a/b")?;
    DatasetBuilder::new(vec![], DataType::Bool, NativeValue::Bool(true))
        .build(&container, "/a/b/ds")?;
    container.create_group("/z")?;

    let records = collect_hierarchy(&container, &CollectOptions::default())?;
    assert_eq!(records.len(), 1 + 4);
    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["/", "/a", "/a/b", "/a/b/ds", "/z"]);
    Ok(())
}

#[test]
fn dataset_record_facts() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    let store = RecordStore::from_container(&container, &CollectOptions::default())?;

    let record = store.get("/g/ds").expect("record for /g/ds");
    assert_eq!(record.id, 3);
    assert_eq!(
        record.attributes,
        serde_json::json!({"note": "hi"}).as_object().cloned().unwrap()
    );
    let dataset = record.dataset.as_ref().expect("dataset sub-record");
    assert_eq!(dataset.shape, vec![2, 3]);
    assert_eq!(dataset.ndim, 2);
    assert_eq!(dataset.dtype.as_deref(), Some("int64"));
    assert_eq!(dataset.value, Some(serde_json::json!([[1, 2, 3], [4, 5, 6]])));
    assert_eq!(dataset.value_kind.as_deref(), Some("array"));
    assert!(dataset.value_error.is_none());
    Ok(())
}

#[test]
fn group_and_file_records() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    let store = RecordStore::from_container(&container, &CollectOptions::default())?;

    let group = store.get("/g").expect("record for /g");
    let group_record = group.group.as_ref().expect("group sub-record");
    assert_eq!(group_record.file_number, 0);
    assert_eq!(
        group_record.member_counts,
        serde_json::json!({"dataset": 1, "total": 1})
            .as_object()
            .cloned()
            .unwrap()
    );

    let root = store.get("/").expect("record for /");
    assert_eq!(root.kind, ObjectKind::File);
    assert!(root.group.is_none());
    assert_eq!(root.file.as_ref().expect("file sub-record").path, "sample.h5");
    Ok(())
}

#[test]
fn member_counts_sum_to_total() -> Result<(), Box<dyn Error>> {
    let container = MemoryContainer::new("mixed.h5").with_file_number(7);
    container.create_group("/g")?;
    container.create_group("/g/sub1")?;
    container.create_group("/g/sub2")?;
    DatasetBuilder::new(vec![], DataType::Int8, NativeValue::Int(0)).build(&container, "/g/ds")?;

    let store = RecordStore::from_container(&container, &CollectOptions::default())?;
    let counts = &store
        .get("/g")
        .and_then(|record| record.group.as_ref())
        .expect("group sub-record")
        .member_counts;
    let total = counts["total"].as_u64().unwrap();
    let sum: u64 = counts
        .iter()
        .filter(|(label, _)| *label != "total")
        .map(|(_, count)| count.as_u64().unwrap())
        .sum();
    assert_eq!(total, sum);
    assert_eq!(total, 3);
    assert_eq!(
        store
            .get("/g")
            .and_then(|record| record.group.as_ref())
            .unwrap()
            .file_number,
        7
    );
    Ok(())
}

#[test]
fn wide_integer_attribute_stays_numeric() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    container.set_attribute("/", "big", NativeValue::Int(9_223_372_036_854_775_807))?;

    let store = RecordStore::from_container(&container, &CollectOptions::default())?;
    let text = to_json_text(&store)?;
    assert!(text.contains("\"big\": 9223372036854775807"));
    assert!(!text.contains("\"9223372036854775807\""));
    Ok(())
}

#[test]
fn unreadable_datatype_is_annotated_in_place() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    DatasetBuilder::with_type_descriptor(vec![4], "float128", NativeValue::Float(0.5))
        .attribute("unit", NativeValue::Text("eV".to_string()))
        .build(&container, "/g/weird")?;

    let store = RecordStore::from_container(&container, &CollectOptions::default())?;
    let record = store.get("/g/weird").expect("record for /g/weird");
    let dataset = record.dataset.as_ref().expect("dataset sub-record");
    assert!(dataset.dtype.is_none());
    assert_eq!(
        dataset.dtype_error.as_deref(),
        Some("unsupported data type float128")
    );
    // Shape, attributes, and the value read are unaffected.
    assert_eq!(dataset.shape, vec![4]);
    assert_eq!(record.attributes["unit"], serde_json::json!("eV"));
    assert_eq!(dataset.value, Some(serde_json::json!(0.5)));
    // The sibling dataset and the rest of the traversal are intact.
    assert_eq!(store.len(), 4);
    assert!(store.get("/g/ds").is_some());
    Ok(())
}

#[test]
fn undecodable_value_is_annotated_in_place() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    DatasetBuilder::new(
        vec![],
        DataType::String,
        NativeValue::Bytes(vec![0xff, 0xfe]),
    )
    .build(&container, "/g/raw")?;

    let store = RecordStore::from_container(&container, &CollectOptions::default())?;
    let dataset = store
        .get("/g/raw")
        .and_then(|record| record.dataset.as_ref())
        .expect("dataset sub-record");
    assert_eq!(dataset.dtype.as_deref(), Some("string"));
    assert!(dataset.value.is_none());
    assert!(dataset
        .value_error
        .as_deref()
        .unwrap()
        .contains("not valid UTF-8"));
    assert!(store.get("/g/ds").is_some());
    Ok(())
}

#[test]
fn value_cap_is_per_dataset() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    DatasetBuilder::new(
        vec![2],
        DataType::Int64,
        NativeValue::Array(vec![NativeValue::Int(7), NativeValue::Int(8)]),
    )
    .build(&container, "/g/small")?;

    let mut options = CollectOptions::default();
    options.set_max_value_elements(Some(2));
    let store = RecordStore::from_container(&container, &options)?;

    let capped = store
        .get("/g/ds")
        .and_then(|record| record.dataset.as_ref())
        .expect("dataset sub-record");
    assert!(capped.value.is_none());
    assert!(capped.value_error.as_deref().unwrap().contains("cap"));

    let small = store
        .get("/g/small")
        .and_then(|record| record.dataset.as_ref())
        .expect("dataset sub-record");
    assert_eq!(small.value, Some(serde_json::json!([7, 8])));
    Ok(())
}

#[test]
fn serialization_paths_agree() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    container.set_attribute("/", "big", NativeValue::UInt(u64::MAX))?;
    container.set_attribute("/g", "weight", NativeValue::Float(0.1))?;
    let store = RecordStore::from_container(&container, &CollectOptions::default())?;

    let direct = to_json_text(&store)?;
    let via_plain = to_json_text(&to_plain_structure(&store)?)?;
    assert_eq!(direct, via_plain);
    Ok(())
}

#[test]
fn collection_is_idempotent() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    let first = to_json_text(&RecordStore::from_container(
        &container,
        &CollectOptions::default(),
    )?)?;
    let second = to_json_text(&RecordStore::from_container(
        &container,
        &CollectOptions::default(),
    )?)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn keyed_by_id_keeps_every_record() -> Result<(), Box<dyn Error>> {
    let container = sample_container()?;
    let records = collect_hierarchy(&container, &CollectOptions::default())?;
    let count = records.len();
    let store = RecordStore::new_with_key(records, |record| record.id.to_string());
    assert_eq!(store.len(), count);
    Ok(())
}

#[test]
fn document_open_matches_programmatic_build() -> Result<(), Box<dyn Error>> {
    let document = r#"{
        "children": {
            "g": {
                "kind": "group",
                "children": {
                    "ds": {
                        "kind": "dataset",
                        "shape": [2],
                        "dtype": "int64",
                        "value": [1, 2],
                        "attributes": {"note": "hi"}
                    }
                }
            }
        }
    }"#;
    let opened = MemoryContainer::from_document_str("doc.h5", document)?;

    let built = MemoryContainer::new("doc.h5");
    built.create_group("/g")?;
    DatasetBuilder::new(
        vec![2],
        DataType::Int64,
        NativeValue::Array(vec![NativeValue::Int(1), NativeValue::Int(2)]),
    )
    .attribute("note", NativeValue::Text("hi".to_string()))
    .build(&built, "/g/ds")?;

    let options = CollectOptions::default();
    assert_eq!(
        to_json_text(&RecordStore::from_container(&opened, &options)?)?,
        to_json_text(&RecordStore::from_container(&built, &options)?)?
    );
    Ok(())
}

#[test]
fn document_open_from_disk() -> Result<(), Box<dyn Error>> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(br#"{"attributes": {"run": 12}}"#)?;
    let container = MemoryContainer::open(file.path())?;
    let store = RecordStore::from_container(&container, &CollectOptions::default())?;
    let root = store.get("/").expect("root record");
    assert_eq!(root.attributes["run"], serde_json::json!(12));
    assert_eq!(
        root.file.as_ref().expect("file sub-record").path,
        file.path().display().to_string()
    );
    Ok(())
}

#[test]
fn open_missing_path_fails() {
    let err = MemoryContainer::open("/nonexistent/container.json").unwrap_err();
    assert!(matches!(err, OpenError::IOError(_)));
    assert!(!err.to_string().is_empty());
}
