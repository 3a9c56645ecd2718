//! Construction of host values.
//!
//! The value builder never creates host objects directly; it asks a
//! [`ValueFactory`]. [`NativeFactory`] builds this crate's [`Value`] model.

use num_bigint::BigInt;

use crate::value::{Array, Key, Map, Str, Symbol, Value};

/// Factory trait that creates host values from JSON pieces.
pub trait ValueFactory {
    type Value;
    /// Map key type. Keys are cloned out of the key cache, so a clone must
    /// keep the key's identity.
    type Key: Clone;
    /// An object under construction.
    type Map;

    fn null(&mut self) -> Self::Value;
    fn boolean(&mut self, b: bool) -> Self::Value;
    fn int(&mut self, n: i64) -> Self::Value;
    fn uint(&mut self, n: u64) -> Self::Value;
    fn float(&mut self, f: f64) -> Self::Value;
    /// An integer beyond 64 bits, given as its decimal text (optional `-`,
    /// then digits).
    fn big_int(&mut self, digits: &str) -> Self::Value;
    /// A string value; the result must not borrow `s`.
    fn string(&mut self, s: &str, frozen: bool) -> Self::Value;

    fn string_key(&mut self, s: &str) -> Self::Key;
    fn symbol_key(&mut self, s: &str) -> Self::Key;

    /// Build an array from all of its elements at once.
    fn array(&mut self, items: Vec<Self::Value>, frozen: bool) -> Self::Value;

    fn new_map(&mut self, capacity: usize) -> Self::Map;
    fn map_insert(&mut self, map: &mut Self::Map, key: Self::Key, value: Self::Value);
    fn finish_map(&mut self, map: Self::Map, frozen: bool) -> Self::Value;
}

/// Factory producing [`Value`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeFactory;

impl ValueFactory for NativeFactory {
    type Value = Value;
    type Key = Key;
    type Map = Map;

    #[inline]
    fn null(&mut self) -> Value {
        Value::Null
    }

    #[inline]
    fn boolean(&mut self, b: bool) -> Value {
        Value::Bool(b)
    }

    #[inline]
    fn int(&mut self, n: i64) -> Value {
        Value::from(n)
    }

    #[inline]
    fn uint(&mut self, n: u64) -> Value {
        Value::integer(n)
    }

    #[inline]
    fn float(&mut self, f: f64) -> Value {
        Value::Float(f)
    }

    fn big_int(&mut self, digits: &str) -> Value {
        match digits.parse::<BigInt>() {
            Ok(n) => Value::integer(n),
            // Not reachable with reader output; keep the magnitude.
            Err(_) => Value::Float(digits.parse().unwrap_or(f64::NAN)),
        }
    }

    #[inline]
    fn string(&mut self, s: &str, frozen: bool) -> Value {
        let s = Str::new(s);
        if frozen {
            s.freeze();
        }
        Value::Str(s)
    }

    #[inline]
    fn string_key(&mut self, s: &str) -> Key {
        Key::Str(Str::frozen(s))
    }

    #[inline]
    fn symbol_key(&mut self, s: &str) -> Key {
        Key::Symbol(Symbol::new(s))
    }

    fn array(&mut self, items: Vec<Value>, frozen: bool) -> Value {
        let array = Array::from_vec(items);
        if frozen {
            array.freeze();
        }
        Value::Array(array)
    }

    #[inline]
    fn new_map(&mut self, capacity: usize) -> Map {
        Map::with_capacity(capacity)
    }

    #[inline]
    fn map_insert(&mut self, map: &mut Map, key: Key, value: Value) {
        map.insert_unchecked(key, value);
    }

    fn finish_map(&mut self, map: Map, frozen: bool) -> Value {
        if frozen {
            map.freeze();
        }
        Value::Map(map)
    }
}
