#![allow(clippy::struct_excessive_bools)]

//! Read and write option resolution.
//!
//! Every call starts from the compat baseline, applies the deltas of the
//! requested [`Mode`], then applies explicit overrides in the order they were
//! given. Explicit settings therefore beat mode defaults, and mode defaults
//! beat the baseline.
//!
//! ```rust
//! use jsonbind::{Mode, ReadOptions, ReadOverride};
//!
//! let opts = ReadOptions::resolve(Mode::Rails, &[ReadOverride::SymbolizeKeys(false)]);
//! assert!(!opts.symbolize_keys);
//! assert!(opts.allow_nan);
//! ```

use core::str::FromStr;

use crate::error::UnknownMode;

/// Compatibility profile selecting default option values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// RFC 8259 only: no NaN, no comments, escaped slashes on output.
    Strict,
    /// Behaves like the common JSON gem.
    #[default]
    Compat,
    /// Symbol keys on input, HTML-safe output.
    Rails,
    Object,
    Custom,
}

impl Mode {
    /// Map a host token to a mode. Unknown tokens select [`Mode::Compat`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_else(|err: UnknownMode| {
            log::warn!("jsonbind: {err}, falling back to compat");
            Mode::Compat
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Strict => "strict",
            Mode::Compat => "compat",
            Mode::Rails => "rails",
            Mode::Object => "object",
            Mode::Custom => "custom",
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Mode::Strict),
            "compat" => Ok(Mode::Compat),
            "rails" => Ok(Mode::Rails),
            "object" => Ok(Mode::Object),
            "custom" => Ok(Mode::Custom),
            other => Err(UnknownMode(other.to_owned())),
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved options for one read call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Build object keys as symbols instead of strings.
    pub symbolize_keys: bool,
    /// Freeze every string, array and map produced.
    pub freeze_result: bool,
    /// Accept `NaN`, `Infinity` and `-Infinity`.
    pub allow_nan: bool,
    /// Accept `//` and `/* */` comments.
    pub allow_comments: bool,
    /// Deepest container nesting accepted; `0` means unlimited.
    pub max_nesting: usize,
    pub mode: Mode,
}

/// One explicit read setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOverride {
    SymbolizeKeys(bool),
    Freeze(bool),
    AllowNan(bool),
    AllowComments(bool),
    MaxNesting(usize),
}

impl ReadOptions {
    /// The compat baseline.
    pub const COMPAT: Self = Self {
        symbolize_keys: false,
        freeze_result: false,
        allow_nan: true,
        allow_comments: true,
        max_nesting: 100,
        mode: Mode::Compat,
    };

    /// Resolve `mode` and `overrides` against the baseline.
    #[must_use]
    pub fn resolve(mode: Mode, overrides: &[ReadOverride]) -> Self {
        if mode == Mode::Compat && overrides.is_empty() {
            return Self::COMPAT;
        }

        let mut opts = Self { mode, ..Self::COMPAT };
        match mode {
            Mode::Strict => {
                opts.allow_nan = false;
                opts.allow_comments = false;
                opts.symbolize_keys = false;
            }
            Mode::Rails => {
                opts.symbolize_keys = true;
                opts.allow_nan = true;
                opts.allow_comments = true;
            }
            Mode::Compat | Mode::Object | Mode::Custom => {}
        }

        for o in overrides {
            match *o {
                ReadOverride::SymbolizeKeys(v) => opts.symbolize_keys = v,
                ReadOverride::Freeze(v) => opts.freeze_result = v,
                ReadOverride::AllowNan(v) => opts.allow_nan = v,
                ReadOverride::AllowComments(v) => opts.allow_comments = v,
                ReadOverride::MaxNesting(v) => opts.max_nesting = v,
            }
        }
        opts
    }

    pub(crate) fn read_flags(&self) -> jsontree::ReadFlags {
        jsontree::ReadFlags {
            allow_comments: self.allow_comments,
            allow_inf_and_nan: self.allow_nan,
            max_depth: self.max_nesting,
            bignum_as_raw: true,
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::COMPAT
    }
}

/// Fully resolved options for one write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Multi-line output.
    pub pretty: bool,
    /// Write `/` as `\/`.
    pub escape_slash: bool,
    /// Write NaN and the infinities instead of failing.
    pub allow_nan: bool,
    /// Escape `<`, `>`, `&` and `'` as `\u` sequences.
    pub escape_html: bool,
    /// Spaces per level in pretty output; `0` uses the default of two.
    pub indent_width: usize,
    pub mode: Mode,
}

/// One explicit write setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOverride {
    Pretty(bool),
    /// A positive width also turns on pretty output.
    IndentWidth(usize),
    EscapeSlash(bool),
    AllowNan(bool),
    EscapeHtml(bool),
}

impl WriteOptions {
    /// The compat baseline.
    pub const COMPAT: Self = Self {
        pretty: false,
        escape_slash: false,
        allow_nan: true,
        escape_html: false,
        indent_width: 0,
        mode: Mode::Compat,
    };

    /// Resolve `mode` and `overrides` against the baseline.
    #[must_use]
    pub fn resolve(mode: Mode, overrides: &[WriteOverride]) -> Self {
        if mode == Mode::Compat && overrides.is_empty() {
            return Self::COMPAT;
        }

        let mut opts = Self { mode, ..Self::COMPAT };
        match mode {
            Mode::Strict => {
                opts.allow_nan = false;
                opts.escape_slash = true;
            }
            Mode::Rails => opts.escape_html = true,
            Mode::Compat | Mode::Object | Mode::Custom => {}
        }

        for o in overrides {
            match *o {
                WriteOverride::Pretty(v) => opts.pretty = v,
                WriteOverride::IndentWidth(v) => opts.indent_width = v,
                WriteOverride::EscapeSlash(v) => opts.escape_slash = v,
                WriteOverride::AllowNan(v) => opts.allow_nan = v,
                WriteOverride::EscapeHtml(v) => opts.escape_html = v,
            }
        }
        // A width always indents, whatever order `pretty` was set in.
        if opts.indent_width > 0 {
            opts.pretty = true;
        }
        opts
    }

    pub(crate) fn write_flags(&self) -> jsontree::WriteFlags {
        jsontree::WriteFlags {
            pretty: self.pretty,
            indent: self.indent_width,
            escape_slashes: self.escape_slash,
            allow_inf_and_nan: self.allow_nan,
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::COMPAT
    }
}

/// Unresolved read settings as a caller supplies them.
///
/// ```rust
/// use jsonbind::{Mode, ParseOptions};
///
/// let opts = ParseOptions::new().mode(Mode::Strict).freeze(true).resolve();
/// assert!(opts.freeze_result && !opts.allow_nan);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    mode: Mode,
    overrides: Vec<ReadOverride>,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Select the mode named by a host token; see [`Mode::from_token`].
    #[must_use]
    pub fn mode_token(self, token: &str) -> Self {
        self.mode(Mode::from_token(token))
    }

    #[must_use]
    pub fn set(mut self, o: ReadOverride) -> Self {
        self.overrides.push(o);
        self
    }

    #[must_use]
    pub fn symbolize_keys(self, v: bool) -> Self {
        self.set(ReadOverride::SymbolizeKeys(v))
    }

    #[must_use]
    pub fn freeze(self, v: bool) -> Self {
        self.set(ReadOverride::Freeze(v))
    }

    #[must_use]
    pub fn allow_nan(self, v: bool) -> Self {
        self.set(ReadOverride::AllowNan(v))
    }

    #[must_use]
    pub fn allow_comments(self, v: bool) -> Self {
        self.set(ReadOverride::AllowComments(v))
    }

    #[must_use]
    pub fn max_nesting(self, v: usize) -> Self {
        self.set(ReadOverride::MaxNesting(v))
    }

    #[must_use]
    pub fn resolve(&self) -> ReadOptions {
        ReadOptions::resolve(self.mode, &self.overrides)
    }
}

/// Unresolved write settings as a caller supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    mode: Mode,
    overrides: Vec<WriteOverride>,
}

impl GenerateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn mode_token(self, token: &str) -> Self {
        self.mode(Mode::from_token(token))
    }

    #[must_use]
    pub fn set(mut self, o: WriteOverride) -> Self {
        self.overrides.push(o);
        self
    }

    #[must_use]
    pub fn pretty(self, v: bool) -> Self {
        self.set(WriteOverride::Pretty(v))
    }

    #[must_use]
    pub fn indent_width(self, v: usize) -> Self {
        self.set(WriteOverride::IndentWidth(v))
    }

    #[must_use]
    pub fn escape_slash(self, v: bool) -> Self {
        self.set(WriteOverride::EscapeSlash(v))
    }

    #[must_use]
    pub fn allow_nan(self, v: bool) -> Self {
        self.set(WriteOverride::AllowNan(v))
    }

    #[must_use]
    pub fn escape_html(self, v: bool) -> Self {
        self.set(WriteOverride::EscapeHtml(v))
    }

    #[must_use]
    pub fn resolve(&self) -> WriteOptions {
        WriteOptions::resolve(self.mode, &self.overrides)
    }
}
