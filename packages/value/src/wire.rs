//! MessagePack encoding of [`Value`].
//!
//! Encoding is canonical: integers take their smallest form, floats are
//! always 64-bit, and map keys are written in sorted order. Instants use the
//! MessagePack timestamp extension (type -1) in its 32, 64 or 96-bit form.
//!
//! Decoding is strict. Every byte must belong to exactly one value, and
//! anything the [`Value`] model has no room for is an error rather than
//! being coerced.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use rmp::decode::{self, NumValueReadError};
use rmp::{encode, Marker};

use crate::{instant, Error, Value};

/// Extension type reserved for timestamps.
const TIMESTAMP: i8 = -1;

/// Arrays and maps nest at most this deep, on both encode and decode.
pub(crate) const MAX_DEPTH: usize = 256;

pub(crate) fn to_bytes(value: &Value) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    write_value(&mut out, value, 0)?;
    Ok(out)
}

pub(crate) fn from_bytes(input: &[u8]) -> Result<Value, Error> {
    let mut reader = Reader { input, depth: 0 };
    let value = reader.value()?;
    if !reader.input.is_empty() {
        return Err(Error::malformed(format!(
            "{} trailing bytes after value",
            reader.input.len()
        )));
    }
    Ok(value)
}

fn write_failed(err: impl Display) -> Error {
    Error::rejected(format!("write failed: {}", err))
}

fn read_failed(err: impl Display) -> Error {
    Error::malformed(err.to_string())
}

fn length(len: usize, what: &str) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| Error::rejected(format!("{} of {} entries is too long", what, len)))
}

/// The depth of a container holding `depth` levels above it.
fn nested(depth: usize) -> Result<usize, Error> {
    if depth >= MAX_DEPTH {
        return Err(Error::rejected(format!(
            "nesting deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(depth + 1)
}

fn write_value(out: &mut Vec<u8>, value: &Value, depth: usize) -> Result<(), Error> {
    match value {
        Value::Bool(b) => encode::write_bool(out, *b).map_err(write_failed)?,
        Value::Integer(i) => {
            encode::write_sint(out, *i).map_err(write_failed)?;
        }
        Value::Float(f) => encode::write_f64(out, *f).map_err(write_failed)?,
        Value::String(s) => {
            length(s.len(), "string")?;
            encode::write_str(out, s).map_err(write_failed)?;
        }
        Value::Bytes(b) => {
            length(b.len(), "byte string")?;
            encode::write_bin(out, b).map_err(write_failed)?;
        }
        Value::Instant(t) => write_instant(out, t)?,
        Value::Array(items) => {
            let depth = nested(depth)?;
            encode::write_array_len(out, length(items.len(), "array")?).map_err(write_failed)?;
            for item in items {
                write_value(out, item, depth)?;
            }
        }
        Value::Map(map) => {
            let depth = nested(depth)?;
            encode::write_map_len(out, length(map.len(), "map")?).map_err(write_failed)?;
            for (key, item) in map {
                encode::write_str(out, key).map_err(write_failed)?;
                write_value(out, item, depth)?;
            }
        }
    }
    Ok(())
}

fn write_instant(out: &mut Vec<u8>, instant: &DateTime<Utc>) -> Result<(), Error> {
    let secs = instant.timestamp();
    let nanos = instant.timestamp_subsec_nanos();
    if nanos >= 1_000_000_000 {
        return Err(Error::rejected("leap second instants have no representation"));
    }

    if secs >= 0 && secs >> 34 == 0 {
        if nanos == 0 && secs <= i64::from(u32::MAX) {
            encode::write_ext_meta(out, 4, TIMESTAMP).map_err(write_failed)?;
            out.extend_from_slice(&(secs as u32).to_be_bytes());
        } else {
            let packed = (u64::from(nanos) << 34) | secs as u64;
            encode::write_ext_meta(out, 8, TIMESTAMP).map_err(write_failed)?;
            out.extend_from_slice(&packed.to_be_bytes());
        }
    } else {
        encode::write_ext_meta(out, 12, TIMESTAMP).map_err(write_failed)?;
        out.extend_from_slice(&nanos.to_be_bytes());
        out.extend_from_slice(&secs.to_be_bytes());
    }
    Ok(())
}

/// Decodes one value at a time off the front of `input`.
///
/// The marker is peeked to pick the `rmp::decode` reader for it; that reader
/// then consumes marker and length or data from the slice.
struct Reader<'a> {
    input: &'a [u8],
    depth: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: u32) -> Result<&'a [u8], Error> {
        let len = len as usize;
        if len > self.input.len() {
            return Err(Error::malformed(format!(
                "unexpected end of input: wanted {} bytes, {} left",
                len,
                self.input.len()
            )));
        }
        let (head, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(head)
    }

    fn value(&mut self) -> Result<Value, Error> {
        let first = *self
            .input
            .first()
            .ok_or_else(|| Error::malformed("unexpected end of input"))?;
        let rd = &mut self.input;

        match Marker::from_u8(first) {
            Marker::Null => Err(Error::mismatch("nil has no representation")),
            Marker::True | Marker::False => {
                decode::read_bool(rd).map(Value::Bool).map_err(read_failed)
            }
            Marker::FixPos(_)
            | Marker::FixNeg(_)
            | Marker::U8
            | Marker::U16
            | Marker::U32
            | Marker::U64
            | Marker::I8
            | Marker::I16
            | Marker::I32
            | Marker::I64 => match decode::read_int::<i64, _>(rd) {
                Ok(n) => Ok(Value::Integer(n)),
                Err(NumValueReadError::OutOfRange) => {
                    Err(Error::mismatch("integer does not fit in 64 signed bits"))
                }
                Err(err) => Err(read_failed(err)),
            },
            Marker::F32 => decode::read_f32(rd)
                .map(|f| Value::Float(f.into()))
                .map_err(read_failed),
            Marker::F64 => decode::read_f64(rd).map(Value::Float).map_err(read_failed),
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => {
                let len = decode::read_str_len(rd).map_err(read_failed)?;
                let raw = self.take(len)?;
                std::str::from_utf8(raw)
                    .map(|s| Value::String(s.to_owned()))
                    .map_err(|e| Error::malformed(format!("string is not UTF-8: {}", e)))
            }
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => {
                let len = decode::read_bin_len(rd).map_err(read_failed)?;
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => {
                let len = decode::read_array_len(rd).map_err(read_failed)?;
                self.array(len)
            }
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => {
                let len = decode::read_map_len(rd).map_err(read_failed)?;
                self.map(len)
            }
            Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32 => {
                let meta = decode::read_ext_meta(rd).map_err(read_failed)?;
                let data = self.take(meta.size)?;
                if meta.typeid != TIMESTAMP {
                    return Err(Error::malformed(format!(
                        "unknown extension type {}",
                        meta.typeid
                    )));
                }
                timestamp(data)
            }
            Marker::Reserved => Err(Error::malformed("reserved marker 0xc1")),
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::malformed(format!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn array(&mut self, len: u32) -> Result<Value, Error> {
        self.enter()?;
        // Every element takes at least one byte.
        let mut items = Vec::with_capacity((len as usize).min(self.input.len()));
        for _ in 0..len {
            items.push(self.value()?);
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn map(&mut self, len: u32) -> Result<Value, Error> {
        self.enter()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = match self.value()? {
                Value::String(key) => key,
                other => {
                    return Err(Error::mismatch(format!(
                        "map keys must be strings, found {}",
                        other.kind()
                    )))
                }
            };
            match map.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(Error::malformed(format!(
                        "duplicate map key {:?}",
                        entry.key()
                    )))
                }
                Entry::Vacant(entry) => {
                    entry.insert(self.value()?);
                }
            }
        }
        self.depth -= 1;
        Ok(Value::Map(map))
    }
}

/// Decode a timestamp extension payload (32, 64 or 96-bit form).
fn timestamp(data: &[u8]) -> Result<Value, Error> {
    let (secs, nanos) = match data.len() {
        4 => (i64::from(u32::from_be_bytes(be(data)?)), 0),
        8 => {
            let packed = u64::from_be_bytes(be(data)?);
            ((packed & 0x3_ffff_ffff) as i64, (packed >> 34) as u32)
        }
        12 => (
            i64::from_be_bytes(be(&data[4..])?),
            u32::from_be_bytes(be(&data[..4])?),
        ),
        len => {
            return Err(Error::malformed(format!(
                "timestamp extension of {} bytes",
                len
            )))
        }
    };
    instant::from_parts(secs, nanos)
        .map(Value::Instant)
        .ok_or_else(|| Error::malformed("timestamp out of range"))
}

fn be<const N: usize>(data: &[u8]) -> Result<[u8; N], Error> {
    data.try_into()
        .map_err(|_| Error::malformed("truncated timestamp"))
}
