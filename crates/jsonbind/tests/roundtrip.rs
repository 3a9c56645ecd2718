#![expect(missing_docs)]
#![allow(clippy::float_cmp)]

use jsonbind::{GenerateOptions, Key, Map, ParseOptions, Value, dump, load};
use num_bigint::BigInt;
use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

/// A host value that only uses the JSON-representable subset.
#[derive(Clone, Debug)]
struct Doc(Value);

fn gen_value(g: &mut Gen, depth: u8) -> Value {
    let kinds = if depth == 0 { 7 } else { 9 };
    match u8::arbitrary(g) % kinds {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::from(i64::arbitrary(g)),
        3 => Value::integer(u64::arbitrary(g) | (1 << 63)),
        4 => {
            // Past u64 in either direction.
            let n: BigInt = BigInt::from(u64::arbitrary(g)) * BigInt::from(u64::MAX) + BigInt::from(u64::MAX) + 1;
            Value::integer(if bool::arbitrary(g) { -n } else { n })
        }
        5 => {
            let f = f64::arbitrary(g);
            Value::Float(if f.is_finite() { f } else { 0.5 })
        }
        6 => Value::str(String::arbitrary(g)),
        7 => {
            let len = usize::arbitrary(g) % 4;
            Value::from((0..len).map(|_| gen_value(g, depth - 1)).collect::<Vec<_>>())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let map: Map = (0..len)
                .map(|_| (Key::from(String::arbitrary(g).as_str()), gen_value(g, depth - 1)))
                .collect();
            Value::Map(map)
        }
    }
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        Doc(gen_value(g, 3))
    }
}

fn tests() -> u64 {
    if is_ci::cached() { 2_000 } else { 300 }
}

/// Property: loading what was dumped gives back an equal value.
#[test]
fn dump_then_load_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, pretty: bool, escape_slash: bool, escape_html: bool) -> TestResult {
        let opts = GenerateOptions::new()
            .pretty(pretty)
            .escape_slash(escape_slash)
            .escape_html(escape_html);
        let json = match dump(&doc.0, &opts) {
            Ok(json) => json,
            Err(err) => return TestResult::error(err.to_string()),
        };
        match load(&json, &ParseOptions::new()) {
            Ok(back) => TestResult::from_bool(back == doc.0),
            Err(err) => TestResult::error(format!("{err} in {json}")),
        }
    }
    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, bool, bool, bool) -> TestResult);
}

/// Property: a second dump of a loaded value is byte-identical to the first.
#[test]
fn dump_is_stable_across_a_load_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let opts = GenerateOptions::new();
        let Ok(first) = dump(&doc.0, &opts) else {
            return false;
        };
        load(&first, &ParseOptions::new())
            .ok()
            .and_then(|back| dump(&back, &opts).ok())
            .is_some_and(|second| second == first)
    }
    QuickCheck::new().tests(tests()).quickcheck(prop as fn(Doc) -> bool);
}
