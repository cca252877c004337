//! Deterministic name synthesis from factory parameters.
//!
//! Cell names are GDS cell identifiers, so they must be short, composed of
//! identifier-safe characters, and above all deterministic: the same factory
//! called with the same parameters must produce the same name in any call
//! order and in any process run. This module turns arbitrary parameter
//! values into short string tokens and joins them into a canonical name.

use arcstr::ArcStr;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The maximum length of a cell name.
///
/// Longer names are replaced by `{factory}_{8-hex-char hash}`; the long
/// form is preserved on the component as auxiliary metadata.
pub const MAX_NAME_LENGTH: usize = 32;

/// An ordered map of parameter names to values.
pub type Params = IndexMap<ArcStr, ParamValue>;

/// A parameter value passed to a cell factory.
///
/// This is a closed set: every kind of value that may influence a cell name
/// is one of these variants, so canonicalization is an exhaustive match
/// rather than open-ended runtime dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(ArcStr),
    /// An ordered sequence of values.
    Seq(Vec<ParamValue>),
    /// A string-keyed mapping of values.
    Map(Params),
    /// A previously built component, represented by its (already sanitized) name.
    Cell(ArcStr),
    /// A cell factory, represented by its identifying name.
    Func(ArcStr),
}

impl ParamValue {
    /// The value as a float, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<ArcStr> for ParamValue {
    fn from(value: ArcStr) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(value: Vec<ParamValue>) -> Self {
        Self::Seq(value)
    }
}

impl From<(f64, f64)> for ParamValue {
    fn from(value: (f64, f64)) -> Self {
        Self::Seq(vec![value.0.into(), value.1.into()])
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        Self::Map(value)
    }
}

/// Builds a [`Params`] map from `key = value` pairs.
///
/// # Example
///
/// ```
/// # use picl::params;
/// let p = params! { length: 3, width: 0.5 };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::name::Params::default() };
    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut params = $crate::name::Params::default();
        $(
            params.insert(
                ::arcstr::ArcStr::from(stringify!($key)),
                $crate::name::ParamValue::from($value),
            );
        )+
        params
    }};
}

/// Replaces characters that are unsafe in cell identifiers.
///
/// Space and `! # % * , / : @` become `_`; `-` becomes `m`; `.` becomes
/// `p`; brackets, parentheses and `=` are removed. Alphanumerics and
/// underscores pass through, which makes this function idempotent.
///
/// # Example
///
/// ```
/// # use picl::name::clean_name;
/// assert_eq!(clean_name("wg(:_=_2852"), "wg___2852");
/// ```
pub fn clean_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ' ' | '!' | '#' | '%' | '*' | ',' | '/' | ':' | '@' => out.push('_'),
            '-' => out.push('m'),
            '.' => out.push('p'),
            '(' | ')' | '[' | ']' | '=' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Canonicalizes a parameter value into a short deterministic token.
///
/// Floats use SI-style shorthand where a scale bucket applies (for example
/// `0.5` becomes `500m`), and 2-decimal fixed notation otherwise; sequences
/// join their element tokens with `_`; maps recurse through
/// [`name_from_params`]; components and factories contribute their names,
/// never their contents.
pub fn clean_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::Int(i) => i.to_string(),
        ParamValue::Float(f) => clean_float(*f),
        ParamValue::Str(s) => clean_name(s),
        ParamValue::Seq(values) => values.iter().map(clean_value).join("_"),
        ParamValue::Map(map) => name_from_params("", map, &[]),
        ParamValue::Cell(name) => name.to_string(),
        ParamValue::Func(name) => name.to_string(),
    }
}

/// SI-style float shorthand.
///
/// The buckets are mutually exclusive and cover every positive magnitude
/// from 1e-12 up to 1e12, scanned from the largest scale down. Zero,
/// negative values, values at or above 1e12 or below 1e-12, and the
/// unscaled range `[1, 1e3)` fall back to 2-decimal fixed notation, which
/// is then sanitized (`2.50` becomes `2p50`).
fn clean_float(value: f64) -> String {
    let token = if (1e9..1e12).contains(&value) {
        format!("{}G", (value / 1e9).round() as i64)
    } else if (1e6..1e9).contains(&value) {
        format!("{}M", (value / 1e6).round() as i64)
    } else if (1e3..1e6).contains(&value) {
        format!("{}K", (value / 1e3).round() as i64)
    } else if (1e-3..1.0).contains(&value) {
        format!("{}m", (value * 1e3).round() as i64)
    } else if (1e-6..1e-3).contains(&value) {
        format!("{}u", (value * 1e6).round() as i64)
    } else if (1e-9..1e-6).contains(&value) {
        format!("{}n", (value * 1e9).round() as i64)
    } else if (1e-12..1e-9).contains(&value) {
        format!("{}p", (value * 1e12).round() as i64)
    } else {
        format!("{value:.2}")
    };
    clean_name(&token)
}

/// Joins the first letter of each underscore-separated word
/// (`taper_length` becomes `tl`).
pub fn join_first_letters(name: &str) -> String {
    name.split('_').filter_map(|word| word.chars().next()).collect()
}

/// Builds a sanitized name from a parameter map.
///
/// Keys are sorted lexicographically so the result is independent of
/// insertion order; keys in `ignore` are dropped; each key is abbreviated
/// to its uppercased first-letter acronym and concatenated with its
/// canonicalized value; tokens (and the optional prefix) are joined with
/// `_` and the whole string is sanitized.
pub fn name_from_params(prefix: &str, params: &Params, ignore: &[ArcStr]) -> String {
    let mut parts = Vec::with_capacity(params.len() + 1);
    if !prefix.is_empty() {
        parts.push(prefix.to_string());
    }
    let mut entries: Vec<(&ArcStr, &ParamValue)> = params
        .iter()
        .filter(|(key, _)| !ignore.contains(key))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in entries {
        let abbrev = join_first_letters(key).to_uppercase();
        parts.push(format!("{abbrev}{}", clean_value(value)));
    }
    clean_name(&parts.join("_"))
}

/// The canonical name for a factory invocation: the factory identity,
/// followed by the parameter tokens when any non-ignored parameter is
/// present.
pub fn component_name(component_type: &str, params: &Params, ignore: &[ArcStr]) -> String {
    if params.keys().any(|key| !ignore.contains(key)) {
        format!(
            "{}_{}",
            component_type,
            name_from_params("", params, ignore)
        )
    } else {
        component_type.to_string()
    }
}

/// The first 8 hex characters of the SHA-256 digest of `name`.
///
/// Used to replace names longer than [`MAX_NAME_LENGTH`]; deterministic
/// across processes.
pub fn hash8(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    hex::encode(&digest[..4])
}
