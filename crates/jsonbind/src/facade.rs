//! Entry points taking text or files in and handing host values out.

use std::{fs, path::Path};

use crate::{
    error::Error,
    factory::NativeFactory,
    object_dumper,
    options::{GenerateOptions, ParseOptions, ReadOptions, WriteOptions},
    value::Value,
    value_builder,
};

/// Parse `source` into a host value.
///
/// ```rust
/// use jsonbind::{ParseOptions, Value, load};
///
/// let v = load(r#"{"a": [1, 2]} // trailing"#, &ParseOptions::new()).unwrap();
/// assert_eq!(v.as_map().unwrap().get_str("a").unwrap().as_array().unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// [`Error::Parse`] when `source` is not acceptable JSON under the resolved
/// options.
pub fn load(source: impl AsRef<[u8]>, opts: &ParseOptions) -> Result<Value, Error> {
    load_with(source.as_ref(), &opts.resolve())
}

/// [`load`] with options that were already resolved.
///
/// # Errors
///
/// As [`load`].
pub fn load_with(source: &[u8], opts: &ReadOptions) -> Result<Value, Error> {
    log::debug!("jsonbind: load {} bytes in {} mode", source.len(), opts.mode);
    let doc = jsontree::read(source, opts.read_flags()).inspect_err(|err| {
        log::debug!("jsonbind: load failed: {err}");
    })?;
    let (value, stats) = value_builder::build_with_stats(doc.root(), opts, &mut NativeFactory);
    log::trace!("jsonbind: key caches {stats:?}");
    Ok(value)
}

/// Same as [`load`].
///
/// # Errors
///
/// As [`load`].
pub fn parse(source: impl AsRef<[u8]>, opts: &ParseOptions) -> Result<Value, Error> {
    load(source, opts)
}

/// Read the file at `path` and parse it.
///
/// # Errors
///
/// [`Error::File`] when the file cannot be read, otherwise as [`load`].
pub fn load_file(path: impl AsRef<Path>, opts: &ParseOptions) -> Result<Value, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::File {
        path: path.to_owned(),
        source,
    })?;
    load_with(&bytes, &opts.resolve())
}

/// Serialize `value` to JSON text.
///
/// ```rust
/// use jsonbind::{GenerateOptions, Mode, Value, dump};
///
/// let v = Value::from(vec![Value::str("</b>"), Value::Float(f64::NAN)]);
/// assert_eq!(dump(&v, &GenerateOptions::new()).unwrap(), r#"["</b>",NaN]"#);
///
/// let rails = GenerateOptions::new().mode(Mode::Rails).allow_nan(false);
/// assert!(dump(&v, &rails).is_err());
/// ```
///
/// # Errors
///
/// [`Error::Generate`] for circular references, nesting beyond
/// [`MAX_DEPTH`](crate::MAX_DEPTH), and non-finite floats that are not
/// allowed.
pub fn dump(value: &Value, opts: &GenerateOptions) -> Result<String, Error> {
    dump_with(value, &opts.resolve())
}

/// [`dump`] with options that were already resolved.
///
/// # Errors
///
/// As [`dump`].
pub fn dump_with(value: &Value, opts: &WriteOptions) -> Result<String, Error> {
    log::debug!("jsonbind: dump in {} mode", opts.mode);
    let tree = object_dumper::dump(value, opts).inspect_err(|err| {
        log::debug!("jsonbind: dump failed: {err}");
    })?;
    let json = jsontree::write_string(&tree, opts.write_flags()).map_err(crate::GenerateError::from)?;
    let json = if opts.escape_html { escape_html(json) } else { json };
    log::debug!("jsonbind: dumped {} bytes", json.len());
    Ok(json)
}

/// Same as [`dump`].
///
/// # Errors
///
/// As [`dump`].
pub fn generate(value: &Value, opts: &GenerateOptions) -> Result<String, Error> {
    dump(value, opts)
}

/// Serialize `value` and write it to `path`.
///
/// The file is only touched once serialization succeeded.
///
/// # Errors
///
/// As [`dump`], or [`Error::File`] when the file cannot be written.
pub fn dump_file(value: &Value, path: impl AsRef<Path>, opts: &GenerateOptions) -> Result<(), Error> {
    let path = path.as_ref();
    let json = dump(value, opts)?;
    fs::write(path, json).map_err(|source| Error::File {
        path: path.to_owned(),
        source,
    })
}

/// Replace `<`, `>`, `&` and `'` with `\u` escapes.
///
/// None of these characters can occur outside a string in JSON text, so the
/// output stays valid and decodes to the same values.
fn escape_html(json: String) -> String {
    if !json.contains(['<', '>', '&', '\'']) {
        return json;
    }
    let mut out = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\'' => out.push_str("\\u0027"),
            c => out.push(c),
        }
    }
    out
}
