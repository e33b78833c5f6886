//! Canonical serialization and hashing of key/value records.
//!
//! Records are converted to JSON, object keys are sorted recursively and the
//! result is written as `{"a": 1, "b": [1.0, 2.5]}` (sorted-key JSON with
//! `", "` / `": "` separators, ASCII-only output). The SHA-256 of those bytes,
//! hex-encoded, is the record hash.

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// Convert any serializable record into a JSON value with sorted keys.
pub fn to_canonical_value<T: Serialize + ?Sized>(record: &T) -> Value {
    let value = serde_json::to_value(record).expect("record must serialize to JSON");
    sort_keys(value)
}

/// Canonical byte form of a record.
pub fn canonical_bytes<T: Serialize + ?Sized>(record: &T) -> Vec<u8> {
    let value = to_canonical_value(record);
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    value
        .serialize(&mut ser)
        .expect("writing JSON into memory cannot fail");
    out
}

/// Hex-encoded SHA-256 of the canonical byte form of `record`.
pub fn hash<T: Serialize + ?Sized>(record: &T) -> String {
    hex::encode(sha256(&canonical_bytes(record)))
}

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Hash of the empty record `{}`.
pub fn empty_record_hash() -> String {
    hash(&Map::new())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(repr_f64(value).as_bytes())
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.bytes().all(|b| (b' '..=b'~').contains(&b)) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip float text: fixed notation for exponents in -4..16,
/// otherwise `d.ddde+XX`. Integral values keep a trailing `.0`.
fn repr_f64(value: f64) -> String {
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci
        .split_once('e')
        .expect("LowerExp output always has an exponent");
    let exp: i32 = exp.parse().expect("LowerExp exponent is an integer");
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let point = exp as usize + 1;
            if digits.len() <= point {
                format!("{sign}{digits}{}.0", "0".repeat(point - digits.len()))
            } else {
                format!("{sign}{}.{}", &digits[..point], &digits[point..])
            }
        } else {
            format!("{sign}0.{}{digits}", "0".repeat((-exp - 1) as usize))
        }
    } else {
        let (lead, frac) = digits.split_at(1);
        let mantissa = if frac.is_empty() {
            lead.to_string()
        } else {
            format!("{lead}.{frac}")
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs())
    }
}
