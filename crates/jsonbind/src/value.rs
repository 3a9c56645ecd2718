//! The host object model values are built into and dumped from.
//!
//! Scalars are immediates. Strings, arrays and maps are reference types:
//! cloning a [`Value`] shares the underlying object, [`Str::ptr_eq`] and
//! friends observe identity, and each object carries a freeze flag after which
//! every mutator returns [`FrozenError`].

use std::{
    cell::{Cell, Ref, RefCell},
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::error::FrozenError;

/// Largest integer stored as [`Value::Int`].
pub const FIXNUM_MAX: i64 = (1 << 62) - 1;
/// Smallest integer stored as [`Value::Int`].
pub const FIXNUM_MIN: i64 = -(1 << 62);

/// Behaviour the dumper needs from an opaque host object.
///
/// Only [`to_display_string`](HostObject::to_display_string) is required; the
/// remaining hooks default to "not supported".
pub trait HostObject: fmt::Debug {
    /// The object's plain string form, used when nothing better applies.
    fn to_display_string(&self) -> String;

    /// A JSON-ready replacement for this object.
    fn as_json(&self) -> Option<Value> {
        None
    }

    /// ISO 8601 rendering for temporal objects.
    fn iso8601(&self) -> Option<String> {
        None
    }

    /// Date, time and date-time objects.
    fn is_temporal(&self) -> bool {
        false
    }

    /// Objects that already behave like one of the basic JSON types and never
    /// need their `as_json` hook consulted in compat or rails mode.
    fn is_basic_json(&self) -> bool {
        false
    }
}

fn rc_id<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc).cast::<()>() as usize
}

// -- strings ----------------------------------------------------------------

struct StrInner {
    text: RefCell<String>,
    frozen: Cell<bool>,
}

/// A host string.
#[derive(Clone)]
pub struct Str(Rc<StrInner>);

impl Str {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(Rc::new(StrInner {
            text: RefCell::new(text.into()),
            frozen: Cell::new(false),
        }))
    }

    /// A string that is frozen from the start.
    #[must_use]
    pub fn frozen(text: impl Into<String>) -> Self {
        let s = Self::new(text);
        s.freeze();
        s
    }

    #[must_use]
    pub fn borrow(&self) -> Ref<'_, str> {
        Ref::map(self.0.text.borrow(), String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.text.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append to the string.
    ///
    /// # Errors
    ///
    /// [`FrozenError`] when the string is frozen.
    pub fn push_str(&self, tail: &str) -> Result<(), FrozenError> {
        if self.is_frozen() {
            return Err(FrozenError("String"));
        }
        self.0.text.borrow_mut().push_str(tail);
        Ok(())
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    /// Whether both handles refer to the same string object.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Identity of the underlying object.
    #[must_use]
    pub fn id(&self) -> usize {
        rc_id(&self.0)
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.borrow() == *other.borrow()
    }
}

impl Eq for Str {}

impl Hash for Str {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.borrow().hash(state);
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.borrow(), f)
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.borrow())
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// -- symbols ----------------------------------------------------------------

/// An interned host atom. Equal names compare equal regardless of allocation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- arrays -----------------------------------------------------------------

struct ArrayInner {
    items: RefCell<Vec<Value>>,
    frozen: Cell<bool>,
}

/// A host array.
#[derive(Clone)]
pub struct Array(Rc<ArrayInner>);

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    #[must_use]
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Rc::new(ArrayInner {
            items: RefCell::new(items),
            frozen: Cell::new(false),
        }))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.borrow().get(index).cloned()
    }

    /// Shallow copy of the elements. The copy shares element identity.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.borrow().clone()
    }

    #[must_use]
    pub fn borrow(&self) -> Ref<'_, [Value]> {
        Ref::map(self.0.items.borrow(), Vec::as_slice)
    }

    /// # Errors
    ///
    /// [`FrozenError`] when the array is frozen.
    pub fn push(&self, value: Value) -> Result<(), FrozenError> {
        if self.is_frozen() {
            return Err(FrozenError("Array"));
        }
        self.0.items.borrow_mut().push(value);
        Ok(())
    }

    /// Replace the element at `index`, growing the array with nulls if needed.
    ///
    /// # Errors
    ///
    /// [`FrozenError`] when the array is frozen.
    pub fn set(&self, index: usize, value: Value) -> Result<(), FrozenError> {
        if self.is_frozen() {
            return Err(FrozenError("Array"));
        }
        let mut items = self.0.items.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        items[index] = value;
        Ok(())
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    #[must_use]
    pub fn id(&self) -> usize {
        rc_id(&self.0)
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.borrow() == *other.borrow()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.borrow().iter()).finish()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

// -- map keys ---------------------------------------------------------------

/// A host map key.
///
/// Floats hash and compare by bit pattern and objects by identity, so every
/// key is usable in a hash table.
#[derive(Clone, Debug)]
pub enum Key {
    Str(Str),
    Symbol(Symbol),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Object(Rc<dyn HostObject>),
}

impl Key {
    /// The name a JSON object member gets for this key.
    #[must_use]
    pub fn to_json_name(&self) -> String {
        match self {
            Key::Str(s) => s.borrow().to_owned(),
            Key::Symbol(s) => s.as_str().to_owned(),
            Key::Int(n) => n.to_string(),
            Key::Float(f) => float_display(*f),
            Key::Bool(b) => b.to_string(),
            Key::Null => String::new(),
            Key::Object(obj) => obj.to_display_string(),
        }
    }

    #[must_use]
    pub fn as_str_key(&self) -> Option<&Str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Key::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Shortest round-trip float text (`1.0`, `1e20`, `NaN`).
pub(crate) fn float_display(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else {
        format!("{f:?}")
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Symbol(a), Key::Symbol(b)) => a == b,
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Float(a), Key::Float(b)) => a.to_bits() == b.to_bits(),
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Null, Key::Null) => true,
            (Key::Object(a), Key::Object(b)) => rc_id(a) == rc_id(b),
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Key::Str(s) => s.hash(state),
            Key::Symbol(s) => s.hash(state),
            Key::Int(n) => n.hash(state),
            Key::Float(f) => f.to_bits().hash(state),
            Key::Bool(b) => b.hash(state),
            Key::Null => {}
            Key::Object(obj) => rc_id(obj).hash(state),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(Str::frozen(s))
    }
}

impl From<Str> for Key {
    fn from(s: Str) -> Self {
        Key::Str(s)
    }
}

impl From<Symbol> for Key {
    fn from(s: Symbol) -> Self {
        Key::Symbol(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

// -- maps -------------------------------------------------------------------

struct MapInner {
    entries: RefCell<IndexMap<Key, Value>>,
    frozen: Cell<bool>,
}

/// A host map preserving insertion order.
#[derive(Clone)]
pub struct Map(Rc<MapInner>);

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Rc::new(MapInner {
            entries: RefCell::new(IndexMap::with_capacity(capacity)),
            frozen: Cell::new(false),
        }))
    }

    /// Insert a member, returning the value it replaced.
    ///
    /// A string key that is still mutable is copied and frozen first, so later
    /// changes to the caller's string never reach the map.
    ///
    /// # Errors
    ///
    /// [`FrozenError`] when the map is frozen.
    pub fn insert(&self, key: impl Into<Key>, value: Value) -> Result<Option<Value>, FrozenError> {
        if self.is_frozen() {
            return Err(FrozenError("Hash"));
        }
        let key = match key.into() {
            Key::Str(s) if !s.is_frozen() => Key::Str(Str::frozen(s.borrow().to_owned())),
            key => key,
        };
        Ok(self.0.entries.borrow_mut().insert(key, value))
    }

    /// Insert while building a map that nobody else has seen yet: no frozen
    /// check and the key is stored as given.
    pub(crate) fn insert_unchecked(&self, key: Key, value: Value) {
        self.0.entries.borrow_mut().insert(key, value);
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.0.entries.borrow().get(key).cloned()
    }

    /// Look up a string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<Value> {
        self.get(&Key::from(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.0.entries.borrow().keys().cloned().collect()
    }

    /// Shallow copy of the members in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.0
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    #[must_use]
    pub fn id(&self) -> usize {
        rc_id(&self.0)
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality ignores order.
        Self::ptr_eq(self, other) || *self.0.entries.borrow() == *other.0.entries.borrow()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.entries.borrow().iter()).finish()
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let map = Map::new();
        for (k, v) in iter {
            // A fresh map is never frozen.
            let _ = map.insert(k, v);
        }
        map
    }
}

// -- values -----------------------------------------------------------------

/// Any host value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    /// An integer within `FIXNUM_MIN..=FIXNUM_MAX`.
    Int(i64),
    BigInt(Rc<BigInt>),
    Float(f64),
    Str(Str),
    Symbol(Symbol),
    Array(Array),
    Map(Map),
    Object(Rc<dyn HostObject>),
}

impl Value {
    /// A mutable string value.
    #[must_use]
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(Str::new(text))
    }

    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    /// An integer, boxed when it falls outside the fast range.
    #[must_use]
    pub fn integer(n: impl Into<BigInt>) -> Self {
        let n = n.into();
        match i64::try_from(&n) {
            Ok(small) if (FIXNUM_MIN..=FIXNUM_MAX).contains(&small) => Value::Int(small),
            _ => Value::BigInt(Rc::new(n)),
        }
    }

    #[must_use]
    pub fn object(obj: impl HostObject + 'static) -> Self {
        Value::Object(Rc::new(obj))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::BigInt(n) => i64::try_from(n.as_ref()).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&Str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Frozen state of reference values. Immediates always report `true`.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Str(s) => s.is_frozen(),
            Value::Array(a) => a.is_frozen(),
            Value::Map(m) => m.is_frozen(),
            _ => true,
        }
    }

    /// Freeze a reference value in place (shallow).
    pub fn freeze(&self) {
        match self {
            Value::Str(s) => s.freeze(),
            Value::Array(a) => a.freeze(),
            Value::Map(m) => m.freeze(),
            _ => {}
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Int(a), Value::BigInt(b)) | (Value::BigInt(b), Value::Int(a)) => {
                BigInt::from(*a) == **b
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => rc_id(a) == rc_id(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        if (FIXNUM_MIN..=FIXNUM_MAX).contains(&n) {
            Value::Int(n)
        } else {
            Value::BigInt(Rc::new(BigInt::from(n)))
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<Str> for Value {
    fn from(s: Str) -> Self {
        Value::Str(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(items))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}
