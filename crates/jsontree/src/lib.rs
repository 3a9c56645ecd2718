//! Typed JSON trees and the two primitives that connect them to bytes.
//!
//! - [`read`] turns a byte buffer into an immutable [`Doc`] of tagged
//!   [`Node`]s. String nodes borrow from the input whenever no escape had to
//!   be decoded, so a `Doc<'src>` never outlives the buffer it was read from.
//! - [`write`] serializes a [`MutNode`] tree, built from scratch by the
//!   caller, into bytes.
//!
//! Both primitives are controlled by small flag structs ([`ReadFlags`],
//! [`WriteFlags`]) and never hold state between calls.
//!
//! ```rust
//! use jsontree::{MutNode, ReadFlags, WriteFlags, read, write};
//!
//! let doc = read(br#"{"k": [1, 2.5]}"#, ReadFlags::default()).unwrap();
//! assert_eq!(doc.root().len(), 1);
//!
//! let out = write(&MutNode::from("hi"), WriteFlags::default()).unwrap();
//! assert_eq!(out, br#""hi""#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod escape;
mod mut_node;
mod node;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use error::{ReadError, ReadErrorKind, WriteError};
pub use mut_node::{MutNode, MutObject};
pub use node::{Doc, Node, Number, Tag};
pub use reader::{NESTING_LIMIT, ReadFlags, read};
pub use writer::{DEFAULT_INDENT, WriteFlags, write, write_string};
