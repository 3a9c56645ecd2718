#![expect(missing_docs)]

use jsonbind::{GenerateOptions, Map, Mode, ParseOptions, Value, dump, load};

fn sample() -> Value {
    let owner: Map = [("login", Value::str("octo")), ("site", Value::str("https://example.com/"))]
        .into_iter()
        .collect();
    let v: Map = [
        ("id", Value::from(42)),
        ("tags", Value::from(vec![Value::symbol("a"), Value::str("<b>")])),
        ("owner", Value::Map(owner)),
        ("score", Value::Float(0.5)),
        ("empty", Value::from(Vec::new())),
        ("none", Value::Null),
    ]
    .into_iter()
    .collect();
    Value::Map(v)
}

#[test]
fn snapshot_compat_compact() {
    insta::assert_snapshot!(dump(&sample(), &GenerateOptions::new()).unwrap(), @r#"{"id":42,"tags":["a","<b>"],"owner":{"login":"octo","site":"https://example.com/"},"score":0.5,"empty":[],"none":null}"#);
}

#[test]
fn snapshot_strict_pretty() {
    let opts = GenerateOptions::new().mode(Mode::Strict).pretty(true);
    insta::assert_snapshot!(dump(&sample(), &opts).unwrap(), @r#"
    {
      "id": 42,
      "tags": [
        "a",
        "<b>"
      ],
      "owner": {
        "login": "octo",
        "site": "https:\/\/example.com\/"
      },
      "score": 0.5,
      "empty": [],
      "none": null
    }
    "#);
}

#[test]
fn snapshot_rails_indent_four() {
    let opts = GenerateOptions::new().mode(Mode::Rails).indent_width(4);
    insta::assert_snapshot!(dump(&sample(), &opts).unwrap(), @r#"
    {
        "id": 42,
        "tags": [
            "a",
            "\u003cb\u003e"
        ],
        "owner": {
            "login": "octo",
            "site": "https://example.com/"
        },
        "score": 0.5,
        "empty": [],
        "none": null
    }
    "#);
}

#[test]
fn snapshot_loaded_document_debug() {
    let v = load(r#"{"a":[1,2.5,"x"],"b":null}"#, &ParseOptions::new().mode(Mode::Rails)).unwrap();
    insta::assert_snapshot!(format!("{v:?}"), @r#"Map({Symbol(:a): Array([Int(1), Float(2.5), Str("x")]), Symbol(:b): Null})"#);
}
