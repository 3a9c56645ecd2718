//! Host value to write tree conversion.
//!
//! Each call owns a [`DumpContext`] that tracks how many arrays and maps
//! enclose the value being converted and which of them are currently open.
//! Re-entering an open container is a cycle; nesting past [`MAX_DEPTH`] is an
//! error rather than a stack overflow.
//!
//! Opaque host objects go through an ordered table of converters. The first
//! converter that accepts the object wins; objects nobody accepts are written
//! as their display string.

use std::collections::HashSet;

use jsontree::{MutNode, MutObject};
use num_bigint::BigInt;

use crate::{
    error::{GenerateError, NonFinite},
    options::{Mode, WriteOptions},
    value::{Array, HostObject, Key, Map, Value},
};

/// Deepest container nesting the dumper accepts.
pub const MAX_DEPTH: usize = 100;

/// Convert `value` into a write tree.
///
/// # Errors
///
/// - [`GenerateError::CircularReference`] when an array or map contains
///   itself.
/// - [`GenerateError::DepthExceeded`] when more than [`MAX_DEPTH`] containers
///   (or `as_json` hops) enclose a value.
/// - [`GenerateError::InvalidNumber`] for NaN or an infinity when
///   `allow_nan` is off.
pub fn dump(value: &Value, opts: &WriteOptions) -> Result<MutNode, GenerateError> {
    DumpContext::new(opts).dump_value(value)
}

/// Per-call state of the dumper.
struct DumpContext<'o> {
    opts: &'o WriteOptions,
    depth: usize,
    visited: HashSet<usize>,
}

type Converter = fn(&mut DumpContext<'_>, &dyn HostObject) -> Option<Result<MutNode, GenerateError>>;

/// Tried in order for opaque host objects.
const CONVERTERS: &[Converter] = &[convert_temporal, convert_basic, convert_as_json];

impl<'o> DumpContext<'o> {
    fn new(opts: &'o WriteOptions) -> Self {
        Self {
            opts,
            depth: 0,
            visited: HashSet::new(),
        }
    }

    fn dump_value(&mut self, value: &Value) -> Result<MutNode, GenerateError> {
        Ok(match value {
            Value::Null => MutNode::Null,
            Value::Bool(b) => MutNode::Bool(*b),
            Value::Int(n) => MutNode::Sint(*n),
            Value::BigInt(n) => big_int(n),
            Value::Float(f) => self.dump_float(*f)?,
            Value::Str(s) => MutNode::Str(s.borrow().to_owned()),
            Value::Symbol(s) => MutNode::Str(s.as_str().to_owned()),
            Value::Array(a) => self.enter(a.id(), |ctx| ctx.dump_array(a))?,
            Value::Map(m) => self.enter(m.id(), |ctx| ctx.dump_map(m))?,
            Value::Object(obj) => self.dump_object(obj.as_ref())?,
        })
    }

    fn check_depth(&self) -> Result<(), GenerateError> {
        if self.depth > MAX_DEPTH {
            return Err(GenerateError::DepthExceeded { depth: self.depth });
        }
        Ok(())
    }

    /// Run `body` one level deeper with container `id` marked as open.
    fn enter(
        &mut self,
        id: usize,
        body: impl FnOnce(&mut Self) -> Result<MutNode, GenerateError>,
    ) -> Result<MutNode, GenerateError> {
        self.check_depth()?;
        if !self.visited.insert(id) {
            return Err(GenerateError::CircularReference);
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        self.visited.remove(&id);
        result
    }

    fn dump_float(&self, f: f64) -> Result<MutNode, GenerateError> {
        match NonFinite::of(f) {
            Some(kind) if !self.opts.allow_nan => Err(GenerateError::InvalidNumber(kind)),
            _ => Ok(MutNode::Real(f)),
        }
    }

    fn dump_array(&mut self, array: &Array) -> Result<MutNode, GenerateError> {
        // Snapshot so host code run by hooks may touch the array.
        let items = array.to_vec();
        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            out.push(self.dump_value(item)?);
        }
        Ok(MutNode::Arr(out))
    }

    fn dump_map(&mut self, map: &Map) -> Result<MutNode, GenerateError> {
        let entries = map.entries();
        let mut obj = MutObject::with_capacity(entries.len());
        for (key, value) in &entries {
            self.dump_member(&mut obj, key, value)?;
        }
        Ok(MutNode::Obj(obj))
    }

    fn dump_member(&mut self, obj: &mut MutObject, key: &Key, value: &Value) -> Result<(), GenerateError> {
        let node = self.dump_value(value)?;
        obj.insert(key.to_json_name(), node);
        Ok(())
    }

    fn dump_object(&mut self, obj: &dyn HostObject) -> Result<MutNode, GenerateError> {
        for convert in CONVERTERS {
            if let Some(result) = convert(self, obj) {
                return result;
            }
        }
        Ok(MutNode::Str(obj.to_display_string()))
    }
}

fn convert_temporal(_: &mut DumpContext<'_>, obj: &dyn HostObject) -> Option<Result<MutNode, GenerateError>> {
    if !obj.is_temporal() {
        return None;
    }
    let text = obj.iso8601().unwrap_or_else(|| obj.to_display_string());
    Some(Ok(MutNode::Str(text)))
}

fn convert_basic(ctx: &mut DumpContext<'_>, obj: &dyn HostObject) -> Option<Result<MutNode, GenerateError>> {
    let skips_hook = matches!(ctx.opts.mode, Mode::Compat | Mode::Rails);
    (skips_hook && obj.is_basic_json()).then(|| Ok(MutNode::Str(obj.to_display_string())))
}

fn convert_as_json(ctx: &mut DumpContext<'_>, obj: &dyn HostObject) -> Option<Result<MutNode, GenerateError>> {
    let replacement = obj.as_json().filter(|v| !v.is_null())?;
    // Each hop counts as a level so self-returning hooks terminate.
    Some(ctx.check_depth().and_then(|()| {
        ctx.depth += 1;
        let result = ctx.dump_value(&replacement);
        ctx.depth -= 1;
        result
    }))
}

fn big_int(n: &BigInt) -> MutNode {
    if let Ok(small) = i64::try_from(n) {
        MutNode::Sint(small)
    } else if let Ok(large) = u64::try_from(n) {
        MutNode::Uint(large)
    } else {
        MutNode::Raw(n.to_string())
    }
}
