//! The immutable read tree.
//!
//! A [`Doc`] owns the root [`Node`] of one parsed document. Nodes carry their
//! tag in the enum discriminant and their size in the backing `Vec`, so both
//! are available in O(1) without walking children.

use alloc::{borrow::Cow, vec::Vec};

/// Numeric subtype of a number node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number<'src> {
    /// An integer that fits in `i64`.
    Sint(i64),
    /// A non-negative integer above `i64::MAX`.
    Uint(u64),
    /// The literal text of an integer outside both integer ranges, read with
    /// [`ReadFlags::bignum_as_raw`](crate::ReadFlags::bignum_as_raw).
    BigInt(&'src str),
    /// Anything with a fraction or exponent, other out-of-range integers, and
    /// (when permitted) NaN and the infinities.
    Real(f64),
}

/// The type tag of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Bool,
    Num,
    Str,
    Arr,
    Obj,
}

/// One node of a read tree.
///
/// Strings and object keys borrow from the input when they contained no
/// escapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'src> {
    Null,
    Bool(bool),
    Num(Number<'src>),
    Str(Cow<'src, str>),
    Arr(Vec<Node<'src>>),
    Obj(Vec<(Cow<'src, str>, Node<'src>)>),
}

impl Node<'_> {
    /// The node's tag.
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            Node::Null => Tag::Null,
            Node::Bool(_) => Tag::Bool,
            Node::Num(_) => Tag::Num,
            Node::Str(_) => Tag::Str,
            Node::Arr(_) => Tag::Arr,
            Node::Obj(_) => Tag::Obj,
        }
    }

    /// Element count for arrays, pair count for objects, byte length for
    /// strings, and `0` for everything else.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Node::Str(s) => s.len(),
            Node::Arr(items) => items.len(),
            Node::Obj(pairs) => pairs.len(),
            Node::Null | Node::Bool(_) | Node::Num(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for arrays and objects.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Arr(_) | Node::Obj(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number<'_>> {
        match self {
            Node::Num(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl<'src> Node<'src> {
    #[must_use]
    pub fn as_array(&self) -> Option<&[Node<'src>]> {
        match self {
            Node::Arr(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&[(Cow<'src, str>, Node<'src>)]> {
        match self {
            Node::Obj(pairs) => Some(pairs),
            _ => None,
        }
    }
}

/// A parsed document: the root node plus how much input was consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc<'src> {
    pub(crate) root: Node<'src>,
    pub(crate) read_len: usize,
}

impl<'src> Doc<'src> {
    #[must_use]
    pub fn root(&self) -> &Node<'src> {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Node<'src> {
        self.root
    }

    /// Number of input bytes consumed, trailing whitespace included.
    #[must_use]
    pub fn read_len(&self) -> usize {
        self.read_len
    }
}
