//! Conversion core between JSON text and a dynamic host object model.
//!
//! Reading goes `bytes -> jsontree::Doc -> Value`: the reader validates the
//! text, then the value builder walks the read tree and asks a
//! [`ValueFactory`] for every host value, interning repeated object keys
//! through a small [`KeyCache`]. Writing goes `Value -> jsontree::MutNode ->
//! bytes`: the object dumper walks the host graph, detects cycles, enforces
//! [`MAX_DEPTH`] and resolves opaque [`HostObject`]s, then the writer
//! serializes the tree.
//!
//! Options are resolved once per call from a [`Mode`] and a list of explicit
//! overrides; see [`ParseOptions`] and [`GenerateOptions`].
//!
//! ```rust
//! use jsonbind::{GenerateOptions, Mode, ParseOptions, dump, load};
//!
//! let v = load(r#"{"id": 1, "tags": ["a", "b"]}"#, &ParseOptions::new().mode(Mode::Rails)).unwrap();
//! assert!(v.as_map().unwrap().keys()[0].as_symbol().is_some());
//!
//! let json = dump(&v, &GenerateOptions::new()).unwrap();
//! assert_eq!(json, r#"{"id":1,"tags":["a","b"]}"#);
//! ```

#![allow(missing_docs)]

mod error;
mod facade;
mod factory;
mod key_cache;
mod object_dumper;
mod options;
mod temporal;
mod value;
mod value_builder;

pub use error::{Error, FrozenError, GenerateError, NonFinite, UnknownMode};
pub use facade::{dump, dump_file, dump_with, generate, load, load_file, load_with, parse};
pub use factory::{NativeFactory, ValueFactory};
pub use key_cache::{CAPACITY as KEY_CACHE_CAPACITY, CacheStats, KeyCache, MAX_KEY_LEN, fnv1a, is_cacheable};
pub use object_dumper::MAX_DEPTH;
pub use options::{GenerateOptions, Mode, ParseOptions, ReadOptions, ReadOverride, WriteOptions, WriteOverride};
pub use value::{Array, FIXNUM_MAX, FIXNUM_MIN, HostObject, Key, Map, Str, Symbol, Value};
pub use value_builder::{BuildStats, build, build_with_stats};

/// Convert a host value into a write tree without serializing it.
///
/// # Errors
///
/// As [`dump`].
pub fn dump_tree(value: &Value, opts: &WriteOptions) -> Result<jsontree::MutNode, GenerateError> {
    object_dumper::dump(value, opts)
}
