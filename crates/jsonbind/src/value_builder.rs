//! Read tree to host value conversion.

use jsontree::{Node, Number};

use crate::{
    factory::ValueFactory,
    key_cache::{CacheStats, KeyCache},
    options::ReadOptions,
};

/// Key cache usage of one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub string_keys: CacheStats,
    pub symbol_keys: CacheStats,
}

/// Convert `node` and everything below it into host values.
///
/// Only the `symbolize_keys` and `freeze_result` options matter here; the
/// other read options were already applied by the reader. Never fails on a
/// tree the reader produced.
pub fn build<F: ValueFactory>(node: &Node<'_>, opts: &ReadOptions, factory: &mut F) -> F::Value {
    build_with_stats(node, opts, factory).0
}

/// [`build`], also reporting how the key caches were used.
pub fn build_with_stats<F: ValueFactory>(
    node: &Node<'_>,
    opts: &ReadOptions,
    factory: &mut F,
) -> (F::Value, BuildStats) {
    let mut builder = ValueBuilder {
        symbolize_keys: opts.symbolize_keys,
        freeze: opts.freeze_result,
        factory,
        // Neither cache allocates before its first cacheable key.
        string_keys: KeyCache::new(),
        symbol_keys: KeyCache::new(),
    };
    let value = builder.build_node(node);
    let stats = BuildStats {
        string_keys: builder.string_keys.stats(),
        symbol_keys: builder.symbol_keys.stats(),
    };
    (value, stats)
}

struct ValueBuilder<'t, 'f, F: ValueFactory> {
    symbolize_keys: bool,
    freeze: bool,
    factory: &'f mut F,
    string_keys: KeyCache<'t, F::Key>,
    symbol_keys: KeyCache<'t, F::Key>,
}

impl<'t, F: ValueFactory> ValueBuilder<'t, '_, F> {
    fn build_node(&mut self, node: &'t Node<'_>) -> F::Value {
        let factory = &mut *self.factory;
        match node {
            Node::Null => factory.null(),
            Node::Bool(b) => factory.boolean(*b),
            Node::Num(Number::Sint(n)) => factory.int(*n),
            Node::Num(Number::Uint(n)) => factory.uint(*n),
            Node::Num(Number::BigInt(digits)) => factory.big_int(digits),
            Node::Num(Number::Real(f)) => factory.float(*f),
            Node::Str(s) => factory.string(s, self.freeze),
            Node::Arr(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.build_node(item));
                }
                self.factory.array(values, self.freeze)
            }
            Node::Obj(pairs) => {
                let mut map = self.factory.new_map(pairs.len());
                for (key, value) in pairs {
                    self.build_member(&mut map, key, value);
                }
                self.factory.finish_map(map, self.freeze)
            }
        }
    }

    fn build_member(&mut self, map: &mut F::Map, key: &'t str, value: &'t Node<'_>) {
        let key = self.intern_key(key);
        let value = self.build_node(value);
        self.factory.map_insert(map, key, value);
    }

    fn intern_key(&mut self, key: &'t str) -> F::Key {
        let factory = &mut *self.factory;
        if self.symbolize_keys {
            self.symbol_keys.lookup_or_intern(key, |s| factory.symbol_key(s))
        } else {
            self.string_keys.lookup_or_intern(key, |s| factory.string_key(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use jsontree::{MutNode, MutObject, ReadFlags, WriteFlags, read, write};
    use num_bigint::BigInt;

    use super::*;
    use crate::{
        factory::NativeFactory,
        options::{Mode, ReadOverride},
        value::{Key, Str, Value},
    };

    fn load(src: &str, opts: &ReadOptions) -> (Value, BuildStats) {
        let flags = ReadFlags {
            allow_inf_and_nan: true,
            bignum_as_raw: true,
            ..ReadFlags::default()
        };
        let doc = read(src.as_bytes(), flags).unwrap();
        build_with_stats(doc.root(), opts, &mut NativeFactory)
    }

    #[test]
    fn repeated_keys_share_one_string() {
        let (v, stats) = load(r#"[{"name":"a"},{"name":"b"}]"#, &ReadOptions::COMPAT);
        let items = v.as_array().unwrap().to_vec();
        let k0 = items[0].as_map().unwrap().keys().remove(0);
        let k1 = items[1].as_map().unwrap().keys().remove(0);
        assert!(Str::ptr_eq(k0.as_str_key().unwrap(), k1.as_str_key().unwrap()));
        assert!(k0.as_str_key().unwrap().is_frozen());
        assert_eq!(stats.string_keys.hits, 1);
        assert_eq!(stats.symbol_keys.lookups(), 0);
    }

    #[test]
    fn symbolized_keys_go_through_the_symbol_cache() {
        let opts = ReadOptions::resolve(Mode::Rails, &[]);
        let (v, stats) = load(r#"{"a":1,"_b":2}"#, &opts);
        let keys = v.as_map().unwrap().keys();
        assert!(keys.iter().all(|k| k.as_symbol().is_some()));
        assert_eq!(stats.symbol_keys.inserts, 1);
        assert_eq!(stats.symbol_keys.bypasses, 1);
        assert_eq!(stats.string_keys.lookups(), 0);
    }

    #[test]
    fn scalar_and_empty_roots_never_use_the_cache() {
        for src in ["1", "\"s\"", "null", "{}", "[]", "[[], {}]"] {
            let (_, stats) = load(src, &ReadOptions::COMPAT);
            assert_eq!(stats, BuildStats::default(), "{src}");
        }
    }

    #[test]
    fn freeze_applies_to_strings_arrays_and_maps() {
        let opts = ReadOptions::resolve(Mode::Compat, &[ReadOverride::Freeze(true)]);
        let (v, _) = load(r#"{"a":["x",{}]}"#, &opts);
        let map = v.as_map().unwrap();
        assert!(map.is_frozen());
        let inner = map.get_str("a").unwrap();
        assert!(inner.is_frozen());
        let inner = inner.as_array().unwrap().to_vec();
        assert!(inner[0].is_frozen());
        assert!(inner[1].is_frozen());

        let (v, _) = load(r#"{"a":["x"]}"#, &ReadOptions::COMPAT);
        assert!(!v.is_frozen());
        let inner = v.as_map().unwrap().get_str("a").unwrap();
        assert!(!inner.is_frozen());
        assert!(!inner.as_array().unwrap().get(0).unwrap().is_frozen());
    }

    #[test]
    fn frozen_scalar_root() {
        let opts = ReadOptions::resolve(Mode::Compat, &[ReadOverride::Freeze(true)]);
        let (v, _) = load(r#""solo""#, &opts);
        assert!(v.is_frozen());
    }

    #[test]
    fn integers_pick_fast_or_boxed_representation() {
        let (v, _) = load(
            "[1, -4611686018427387904, 4611686018427387904, 18446744073709551615, -100000000000000000000000]",
            &ReadOptions::COMPAT,
        );
        let items = v.as_array().unwrap().to_vec();
        assert!(matches!(items[0], Value::Int(1)));
        assert!(matches!(items[1], Value::Int(-4_611_686_018_427_387_904)));
        assert!(matches!(&items[2], Value::BigInt(n) if **n == BigInt::from(1u64 << 62)));
        assert!(matches!(&items[3], Value::BigInt(n) if **n == BigInt::from(u64::MAX)));
        assert!(matches!(&items[4], Value::BigInt(n) if **n == -BigInt::from(10).pow(23)));
    }

    #[test]
    fn non_finite_floats_pass_through() {
        let (v, _) = load("[NaN, -Infinity]", &ReadOptions::COMPAT);
        let items = v.as_array().unwrap().to_vec();
        assert!(items[0].as_f64().unwrap().is_nan());
        assert_eq!(items[1].as_f64(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn duplicate_members_keep_the_last_value() {
        let (v, _) = load(r#"{"a":1,"b":2,"a":3}"#, &ReadOptions::COMPAT);
        let map = v.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys()[0], Key::from("a"));
        assert_eq!(map.get_str("a"), Some(Value::Int(3)));
    }

    #[test]
    fn more_distinct_keys_than_the_cache_holds() {
        let members: Vec<String> = (0..100).map(|i| format!("\"k{i}\":{i}")).collect();
        let src = format!("[{{{0}}},{{{0}}}]", members.join(","));
        let (v, stats) = load(&src, &ReadOptions::COMPAT);
        let items = v.as_array().unwrap().to_vec();
        assert_eq!(items[0], items[1]);
        assert_eq!(items[0].as_map().unwrap().len(), 100);
        assert_eq!(stats.string_keys.inserts, crate::key_cache::CAPACITY);
        assert_eq!(stats.string_keys.hits, crate::key_cache::CAPACITY);
        assert_eq!(stats.string_keys.overflows, 2 * (100 - crate::key_cache::CAPACITY));
    }

    /// A factory that re-encodes into a write tree.
    struct MutNodeFactory;

    impl ValueFactory for MutNodeFactory {
        type Value = MutNode;
        type Key = String;
        type Map = MutObject;

        fn null(&mut self) -> MutNode {
            MutNode::Null
        }
        fn boolean(&mut self, b: bool) -> MutNode {
            MutNode::Bool(b)
        }
        fn int(&mut self, n: i64) -> MutNode {
            MutNode::Sint(n)
        }
        fn uint(&mut self, n: u64) -> MutNode {
            MutNode::Uint(n)
        }
        fn float(&mut self, f: f64) -> MutNode {
            MutNode::Real(f)
        }
        fn big_int(&mut self, digits: &str) -> MutNode {
            MutNode::Raw(digits.to_owned())
        }
        fn string(&mut self, s: &str, _frozen: bool) -> MutNode {
            MutNode::from(s)
        }
        fn string_key(&mut self, s: &str) -> String {
            s.to_owned()
        }
        fn symbol_key(&mut self, s: &str) -> String {
            format!(":{s}")
        }
        fn array(&mut self, items: Vec<MutNode>, _frozen: bool) -> MutNode {
            MutNode::Arr(items)
        }
        fn new_map(&mut self, capacity: usize) -> MutObject {
            MutObject::with_capacity(capacity)
        }
        fn map_insert(&mut self, map: &mut MutObject, key: String, value: MutNode) {
            map.insert(key, value);
        }
        fn finish_map(&mut self, map: MutObject, _frozen: bool) -> MutNode {
            MutNode::Obj(map)
        }
    }

    #[test]
    fn builder_is_generic_over_the_factory() {
        let src = br#"{"a":[1,2.5,"x"],"b":{"c":null}}"#;
        let doc = read(src, ReadFlags::default()).unwrap();
        let tree = build(doc.root(), &ReadOptions::COMPAT, &mut MutNodeFactory);
        assert_eq!(write(&tree, WriteFlags::default()).unwrap(), src);

        let opts = ReadOptions::resolve(Mode::Rails, &[]);
        let tree = build(doc.root(), &opts, &mut MutNodeFactory);
        let out = write(&tree, WriteFlags::default()).unwrap();
        assert_eq!(out, br#"{":a":[1,2.5,"x"],":b":{":c":null}}"#);
    }
}
