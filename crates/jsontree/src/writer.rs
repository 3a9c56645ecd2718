//! Serializer for [`MutNode`] trees.

use alloc::{string::String, vec::Vec};
use core::fmt::Write as _;

use crate::{
    error::WriteError,
    mut_node::{MutNode, MutObject},
};

/// Indentation used by pretty output when [`WriteFlags::indent`] is `0`.
pub const DEFAULT_INDENT: usize = 2;

/// Options for [`write`].
///
/// # Default
///
/// Compact output, `/` left as is, non-finite floats rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteFlags {
    /// One member per line, nested members indented.
    pub pretty: bool,
    /// Spaces per nesting level in pretty output; `0` selects
    /// [`DEFAULT_INDENT`].
    pub indent: usize,
    /// Write `/` as `\/`.
    pub escape_slashes: bool,
    /// Write NaN and the infinities as `NaN`, `Infinity` and `-Infinity`
    /// instead of failing.
    pub allow_inf_and_nan: bool,
}

/// Serialize `node` to JSON bytes.
///
/// # Errors
///
/// [`WriteError::NanOrInfinity`] when the tree holds a non-finite float and
/// [`WriteFlags::allow_inf_and_nan`] is off.
pub fn write(node: &MutNode, flags: WriteFlags) -> Result<Vec<u8>, WriteError> {
    write_string(node, flags).map(String::into_bytes)
}

/// [`write`], keeping the output as a `String`.
///
/// # Errors
///
/// Same as [`write`].
pub fn write_string(node: &MutNode, flags: WriteFlags) -> Result<String, WriteError> {
    let indent = if flags.indent == 0 {
        DEFAULT_INDENT
    } else {
        flags.indent
    };
    let mut writer = Writer {
        out: String::new(),
        flags,
        indent,
        level: 0,
    };
    writer.write_node(node)?;
    log::trace!("jsontree: wrote {} bytes", writer.out.len());
    Ok(writer.out)
}

struct Writer {
    out: String,
    flags: WriteFlags,
    indent: usize,
    level: usize,
}

impl Writer {
    fn write_node(&mut self, node: &MutNode) -> Result<(), WriteError> {
        match node {
            MutNode::Null => self.out.push_str("null"),
            MutNode::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            MutNode::Sint(n) => write!(self.out, "{n}")?,
            MutNode::Uint(n) => write!(self.out, "{n}")?,
            MutNode::Real(f) => self.write_real(*f)?,
            MutNode::Raw(raw) => self.out.push_str(raw),
            MutNode::Str(s) => self.write_string(s),
            MutNode::Arr(items) => self.write_array(items)?,
            MutNode::Obj(obj) => self.write_object(obj)?,
        }
        Ok(())
    }

    fn write_real(&mut self, f: f64) -> Result<(), WriteError> {
        if f.is_finite() {
            // `Debug` always keeps a fraction or an exponent, so the value
            // reads back as a float.
            write!(self.out, "{f:?}")?;
            return Ok(());
        }
        if !self.flags.allow_inf_and_nan {
            return Err(WriteError::NanOrInfinity);
        }
        self.out.push_str(if f.is_nan() {
            "NaN"
        } else if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        });
        Ok(())
    }

    fn newline(&mut self) {
        if self.flags.pretty {
            self.out.push('\n');
            for _ in 0..self.level * self.indent {
                self.out.push(' ');
            }
        }
    }

    fn write_array(&mut self, items: &[MutNode]) -> Result<(), WriteError> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        self.level += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.write_node(item)?;
        }
        self.level -= 1;
        self.newline();
        self.out.push(']');
        Ok(())
    }

    fn write_object(&mut self, obj: &MutObject) -> Result<(), WriteError> {
        if obj.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        self.level += 1;
        for (i, (key, value)) in obj.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.write_string(key);
            self.out.push(':');
            if self.flags.pretty {
                self.out.push(' ');
            }
            self.write_node(value)?;
        }
        self.level -= 1;
        self.newline();
        self.out.push('}');
        Ok(())
    }

    fn write_string(&mut self, src: &str) {
        const HEX: &[u8; 16] = b"0123456789abcdef";

        self.out.push('"');
        for c in src.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '/' if self.flags.escape_slashes => self.out.push_str("\\/"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    let b = c as usize;
                    self.out.push_str("\\u00");
                    self.out.push(char::from(HEX[b >> 4]));
                    self.out.push(char::from(HEX[b & 0xF]));
                }
                // Line separators break pre-2019 JavaScript parsers.
                '\u{2028}' => self.out.push_str("\\u2028"),
                '\u{2029}' => self.out.push_str("\\u2029"),
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec};

    use super::{WriteFlags, write};
    use crate::{MutNode, MutObject, WriteError};

    fn compact(node: &MutNode) -> String {
        String::from_utf8(write(node, WriteFlags::default()).unwrap()).unwrap()
    }

    #[test]
    fn floats_keep_a_fraction_or_exponent() {
        assert_eq!(compact(&MutNode::Real(1.0)), "1.0");
        assert_eq!(compact(&MutNode::Real(-0.5)), "-0.5");
        assert_eq!(compact(&MutNode::Real(1e300)), "1e300");
    }

    #[test]
    fn non_finite_needs_permission() {
        assert_eq!(
            write(&MutNode::Real(f64::NAN), WriteFlags::default()),
            Err(WriteError::NanOrInfinity)
        );
        let flags = WriteFlags {
            allow_inf_and_nan: true,
            ..WriteFlags::default()
        };
        let node = MutNode::Arr(vec![
            MutNode::Real(f64::NAN),
            MutNode::Real(f64::INFINITY),
            MutNode::Real(f64::NEG_INFINITY),
        ]);
        assert_eq!(write(&node, flags).unwrap(), b"[NaN,Infinity,-Infinity]");
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(
            compact(&MutNode::from("a\"b\\c\n\u{1}")),
            r#""a\"b\\c\n\u0001""#
        );
    }

    #[test]
    fn slashes_only_escaped_on_request() {
        let node = MutNode::from("a/b");
        assert_eq!(compact(&node), r#""a/b""#);
        let flags = WriteFlags {
            escape_slashes: true,
            ..WriteFlags::default()
        };
        assert_eq!(write(&node, flags).unwrap(), br#""a\/b""#);
    }

    #[test]
    fn raw_numbers_are_verbatim() {
        let node = MutNode::Raw("123456789012345678901234567890".into());
        assert_eq!(compact(&node), "123456789012345678901234567890");
    }

    #[test]
    fn empty_containers_stay_on_one_line_when_pretty() {
        let obj: MutObject = [("a", MutNode::Arr(vec![])), ("b", MutNode::Obj(MutObject::new()))]
            .into_iter()
            .collect();
        let flags = WriteFlags {
            pretty: true,
            ..WriteFlags::default()
        };
        let out = String::from_utf8(write(&MutNode::Obj(obj), flags).unwrap()).unwrap();
        assert_eq!(out, "{\n  \"a\": [],\n  \"b\": {}\n}");
    }
}
