//! Whole-document reader producing a [`Doc`].
//!
//! The reader is a recursive-descent pass over the input bytes. It borrows
//! string slices straight from the input when a string contains no escapes and
//! only allocates for strings that needed decoding. Comments and the
//! non-standard `NaN`/`Infinity` literals are accepted only when the matching
//! [`ReadFlags`] are set.

use alloc::{borrow::Cow, string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{
    error::{ReadError, ReadErrorKind},
    escape::decode_unicode_escape,
    node::{Doc, Node, Number},
};

/// Options for [`read`].
///
/// # Default
///
/// Strict RFC 8259 input with unlimited nesting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFlags {
    /// Accept `// line` and `/* block */` comments wherever whitespace is
    /// allowed.
    pub allow_comments: bool,
    /// Accept `NaN`, `Infinity`, `-Infinity` (and the short `Inf`), case
    /// insensitively, and accept number literals that overflow `f64` as
    /// infinities.
    pub allow_inf_and_nan: bool,
    /// Maximum container nesting; the root container is at depth 1. `0`
    /// leaves only the [`NESTING_LIMIT`] in place.
    pub max_depth: usize,
    /// Keep integers that fit neither `i64` nor `u64` as their literal text
    /// ([`Number::BigInt`](crate::Number::BigInt)) instead of rounding them
    /// to `f64`.
    pub bignum_as_raw: bool,
}

/// Nesting the reader never goes beyond, whatever
/// [`ReadFlags::max_depth`] says. Reading is recursive, so this bounds its
/// stack use.
pub const NESTING_LIMIT: usize = 512;

/// Read a single JSON document from `input`.
///
/// # Errors
///
/// Returns a [`ReadError`] carrying the byte offset of the first problem.
pub fn read(input: &[u8], flags: ReadFlags) -> Result<Doc<'_>, ReadError> {
    log::trace!("jsontree: reading {} bytes with {flags:?}", input.len());
    Reader {
        input,
        pos: 0,
        depth: 0,
        flags,
    }
    .read_doc()
}

struct Reader<'src> {
    input: &'src [u8],
    pos: usize,
    depth: usize,
    flags: ReadFlags,
}

impl<'src> Reader<'src> {
    fn read_doc(mut self) -> Result<Doc<'src>, ReadError> {
        self.skip_trivia()?;
        if self.pos >= self.input.len() {
            return Err(self.error(ReadErrorKind::EmptyInput));
        }
        let root = self.read_value()?;
        self.skip_trivia()?;
        if self.pos < self.input.len() {
            return Err(self.error(ReadErrorKind::TrailingContent));
        }
        Ok(Doc {
            root,
            read_len: self.pos,
        })
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn error(&self, kind: ReadErrorKind) -> ReadError {
        ReadError::new(kind, self.pos)
    }

    fn unexpected(&self) -> ReadError {
        match self.peek() {
            Some(b) => self.error(ReadErrorKind::UnexpectedCharacter(b)),
            None => self.error(ReadErrorKind::UnexpectedEnd),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ReadError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\n' | b'\r' | b'\t') => self.pos += 1,
                Some(b'/') if self.flags.allow_comments => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ReadError> {
        let start = self.pos;
        let body = self.pos + 2;
        match self.input.get(self.pos + 1) {
            Some(b'/') => {
                self.pos = match self.input[body..].find_byte(b'\n') {
                    Some(nl) => body + nl + 1,
                    None => self.input.len(),
                };
                Ok(())
            }
            Some(b'*') => match self.input[body..].find("*/") {
                Some(end) => {
                    self.pos = body + end + 2;
                    Ok(())
                }
                None => Err(ReadError::new(ReadErrorKind::UnclosedComment, start)),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn read_value(&mut self) -> Result<Node<'src>, ReadError> {
        match self.peek() {
            None => Err(self.error(ReadErrorKind::UnexpectedEnd)),
            Some(b'{') => self.read_object(),
            Some(b'[') => self.read_array(),
            Some(b'"') => self.read_string().map(Node::Str),
            Some(b't') => self.read_literal(b"true", Node::Bool(true)),
            Some(b'f') => self.read_literal(b"false", Node::Bool(false)),
            Some(b'n') if self.input[self.pos..].starts_with(b"null") => {
                self.read_literal(b"null", Node::Null)
            }
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(b'N' | b'n' | b'I' | b'i') if self.flags.allow_inf_and_nan => {
                self.read_non_finite(self.pos, false)
            }
            Some(b'n') => Err(self.error(ReadErrorKind::InvalidLiteral)),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn read_literal(&mut self, word: &'static [u8], node: Node<'src>) -> Result<Node<'src>, ReadError> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(node)
        } else {
            Err(self.error(ReadErrorKind::InvalidLiteral))
        }
    }

    fn enter(&mut self) -> Result<(), ReadError> {
        self.depth += 1;
        let limit = match self.flags.max_depth {
            0 => NESTING_LIMIT,
            n => n.min(NESTING_LIMIT),
        };
        if self.depth > limit {
            return Err(self.error(ReadErrorKind::TooDeep(self.depth)));
        }
        Ok(())
    }

    fn read_array(&mut self) -> Result<Node<'src>, ReadError> {
        self.enter()?;
        self.pos += 1; // '['
        self.skip_trivia()?;

        let mut items = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Arr(items));
        }

        loop {
            items.push(self.read_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_trivia()?;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error(ReadErrorKind::ExpectedArrayNext)),
                None => return Err(self.error(ReadErrorKind::UnexpectedEnd)),
            }
        }

        self.depth -= 1;
        Ok(Node::Arr(items))
    }

    fn read_object(&mut self) -> Result<Node<'src>, ReadError> {
        self.enter()?;
        self.pos += 1; // '{'
        self.skip_trivia()?;

        let mut pairs = Vec::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Obj(pairs));
        }

        loop {
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.error(ReadErrorKind::ExpectedKey)),
                None => return Err(self.error(ReadErrorKind::UnexpectedEnd)),
            }
            let key = self.read_string()?;

            self.skip_trivia()?;
            if self.peek() != Some(b':') {
                return Err(self.error(ReadErrorKind::ExpectedColon));
            }
            self.pos += 1;
            self.skip_trivia()?;

            let value = self.read_value()?;
            pairs.push((key, value));

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_trivia()?;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error(ReadErrorKind::ExpectedObjectNext)),
                None => return Err(self.error(ReadErrorKind::UnexpectedEnd)),
            }
        }

        self.depth -= 1;
        Ok(Node::Obj(pairs))
    }

    fn utf8(&self, start: usize, end: usize) -> Result<&'src str, ReadError> {
        core::str::from_utf8(&self.input[start..end])
            .map_err(|e| ReadError::new(ReadErrorKind::InvalidUtf8, start + e.valid_up_to()))
    }

    /// Read a string starting at the opening quote. Escape-free strings are
    /// borrowed from the input.
    fn read_string(&mut self) -> Result<Cow<'src, str>, ReadError> {
        let open = self.pos;
        let start = open + 1;
        let mut i = start;

        // Fast path: no escapes.
        loop {
            match self.input.get(i) {
                None => return Err(ReadError::new(ReadErrorKind::UnclosedString, open)),
                Some(b'"') => {
                    let s = self.utf8(start, i)?;
                    self.pos = i + 1;
                    return Ok(Cow::Borrowed(s));
                }
                Some(b'\\') => break,
                Some(&b) if b < 0x20 => {
                    return Err(ReadError::new(ReadErrorKind::ControlCharacter, i));
                }
                Some(_) => i += 1,
            }
        }

        let mut out = String::with_capacity(i - start + 16);
        let mut segment = start;
        loop {
            match self.input.get(i) {
                None => return Err(ReadError::new(ReadErrorKind::UnclosedString, open)),
                Some(b'"') => {
                    out.push_str(self.utf8(segment, i)?);
                    self.pos = i + 1;
                    return Ok(Cow::Owned(out));
                }
                Some(b'\\') => {
                    out.push_str(self.utf8(segment, i)?);
                    i = self.read_escape(i, &mut out)?;
                    segment = i;
                }
                Some(&b) if b < 0x20 => {
                    return Err(ReadError::new(ReadErrorKind::ControlCharacter, i));
                }
                Some(_) => i += 1,
            }
        }
    }

    /// Decode the escape whose backslash sits at `at`, returning the index of
    /// the first byte after it.
    fn read_escape(&self, at: usize, out: &mut String) -> Result<usize, ReadError> {
        let decoded = match self.input.get(at + 1) {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{8}',
            Some(b'f') => '\u{c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                let (ch, used) = decode_unicode_escape(&self.input[at + 2..])
                    .map_err(|kind| ReadError::new(kind, at))?;
                out.push(ch);
                return Ok(at + 2 + used);
            }
            Some(_) => return Err(ReadError::new(ReadErrorKind::InvalidEscape, at)),
            None => return Err(ReadError::new(ReadErrorKind::UnexpectedEnd, at + 1)),
        };
        out.push(decoded);
        Ok(at + 2)
    }

    fn read_number(&mut self) -> Result<Node<'src>, ReadError> {
        let start = self.pos;
        let input = self.input;
        let mut i = start;

        let negative = input[i] == b'-';
        if negative {
            i += 1;
            if self.flags.allow_inf_and_nan
                && matches!(input.get(i), Some(b'N' | b'n' | b'I' | b'i'))
            {
                return self.read_non_finite(i, true);
            }
        }

        match input.get(i) {
            Some(b'0') => i += 1,
            Some(b'1'..=b'9') => {
                while input.get(i).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                }
            }
            _ => return Err(ReadError::new(ReadErrorKind::InvalidNumber, start)),
        }

        let mut is_real = false;
        if input.get(i) == Some(&b'.') {
            is_real = true;
            i += 1;
            if !input.get(i).is_some_and(u8::is_ascii_digit) {
                return Err(ReadError::new(ReadErrorKind::InvalidNumber, start));
            }
            while input.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        if matches!(input.get(i), Some(b'e' | b'E')) {
            is_real = true;
            i += 1;
            if matches!(input.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            if !input.get(i).is_some_and(u8::is_ascii_digit) {
                return Err(ReadError::new(ReadErrorKind::InvalidNumber, start));
            }
            while input.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }

        let text = core::str::from_utf8(&input[start..i])
            .map_err(|_| ReadError::new(ReadErrorKind::InvalidNumber, start))?;
        self.pos = i;

        if !is_real {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Node::Num(Number::Sint(n)));
            }
            if !negative {
                if let Ok(n) = text.parse::<u64>() {
                    return Ok(Node::Num(Number::Uint(n)));
                }
            }
            if self.flags.bignum_as_raw {
                return Ok(Node::Num(Number::BigInt(text)));
            }
        }

        let value: f64 = text
            .parse()
            .map_err(|_| ReadError::new(ReadErrorKind::InvalidNumber, start))?;
        if value.is_infinite() && !self.flags.allow_inf_and_nan {
            return Err(ReadError::new(ReadErrorKind::NumberOutOfRange, start));
        }
        Ok(Node::Num(Number::Real(value)))
    }

    /// Read `NaN`, `Infinity` or `Inf` (any case) starting at `at`; the sign,
    /// if any, has already been consumed.
    fn read_non_finite(&mut self, at: usize, negative: bool) -> Result<Node<'src>, ReadError> {
        let rest = &self.input[at..];
        let (value, len) = if starts_with_ignore_case(rest, b"nan") {
            (f64::NAN, 3)
        } else if starts_with_ignore_case(rest, b"infinity") {
            (f64::INFINITY, 8)
        } else if starts_with_ignore_case(rest, b"inf") {
            (f64::INFINITY, 3)
        } else {
            return Err(ReadError::new(ReadErrorKind::InvalidLiteral, self.pos));
        };
        self.pos = at + len;
        let value = if negative { -value } else { value };
        Ok(Node::Num(Number::Real(value)))
    }
}

fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .get(..needle.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(needle))
}
