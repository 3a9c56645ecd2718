#![expect(missing_docs)]

use std::fs;

use jsonbind::{Error, GenerateOptions, Map, Mode, ParseOptions, Value, dump_file, load_file};

#[test_log::test]
fn dump_file_then_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let v: Map = [
        ("name", Value::str("widget")),
        ("sizes", Value::from(vec![Value::from(1), Value::Float(2.5)])),
    ]
    .into_iter()
    .collect();
    let v = Value::Map(v);

    dump_file(&v, &path, &GenerateOptions::new().pretty(true)).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("\n  \"name\": \"widget\""));
    assert_eq!(load_file(&path, &ParseOptions::new()).unwrap(), v);
}

#[test]
fn load_file_honours_read_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("commented.json");
    fs::write(&path, "// header\n{\"id\": 1}\n").unwrap();

    let v = load_file(&path, &ParseOptions::new().mode(Mode::Rails)).unwrap();
    assert!(v.as_map().unwrap().keys()[0].as_symbol().is_some());

    let err = load_file(&path, &ParseOptions::new().mode(Mode::Strict)).unwrap_err();
    assert!(matches!(err, Error::Parse { position: 0, .. }), "{err:?}");
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_file(&path, &ParseOptions::new()).unwrap_err();
    let Error::File { path: reported, source } = &err else {
        panic!("expected a file error, got {err:?}");
    };
    assert_eq!(reported, &path);
    assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn failed_generation_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nan.json");
    let v = Value::from(vec![Value::Float(f64::NAN)]);
    let err = dump_file(&v, &path, &GenerateOptions::new().mode(Mode::Strict)).unwrap_err();
    assert!(matches!(err, Error::Generate(_)));
    assert!(!path.exists());
}

#[test]
fn unwritable_path_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.json");
    let err = dump_file(&Value::Null, &path, &GenerateOptions::new()).unwrap_err();
    assert!(matches!(err, Error::File { .. }), "{err:?}");
}
