// src/common/codec/decode.rs

use core::str;

use super::error::DecodeError;
use crate::common::command::{LogicalCommand, ResponseShape};
use crate::common::types::{
    DecodedValue, EulerAngles, FloatVector, IntegerVector, Quaternion, Text,
};

/// Removes a trailing `\n` or `\r\n` from a reply line.
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits a reply body on commas, trimming ASCII whitespace around each field.
///
/// An empty (or all-whitespace) body has zero fields.
pub fn split_fields(body: &str) -> impl Iterator<Item = &str> + Clone {
    let trimmed = body.trim();
    trimmed
        .split(',')
        .map(str::trim)
        .filter(move |_| !trimmed.is_empty())
}

pub(crate) fn parse_float(field: &str, index: usize) -> Result<f32, DecodeError> {
    match field.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DecodeError::NumericParse { field: index }),
    }
}

fn parse_integer(field: &str, index: usize) -> Result<u32, DecodeError> {
    field
        .parse::<u32>()
        .map_err(|_| DecodeError::NumericParse { field: index })
}

/// Parses exactly `N` floats from `fields`, the `offset` giving the index of
/// the first one within the whole line (for error reporting).
pub(crate) fn parse_float_array<'a, const N: usize>(
    fields: &mut impl Iterator<Item = &'a str>,
    offset: usize,
) -> Result<[f32; N], DecodeError> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let field = fields.next().ok_or(DecodeError::FieldCount { expected: N, got: i })?;
        *slot = parse_float(field, offset + i)?;
    }
    Ok(out)
}

/// Decodes the fields of one value of `shape`, consuming them from `fields`.
///
/// The caller has already checked the total field count.
pub(crate) fn decode_fields<'a>(
    shape: ResponseShape,
    fields: &mut impl Iterator<Item = &'a str>,
    offset: usize,
) -> Result<DecodedValue, DecodeError> {
    let value = match shape {
        ResponseShape::Float => {
            let [v] = parse_float_array::<1>(fields, offset)?;
            DecodedValue::Float(v)
        }
        ResponseShape::Quaternion => {
            let [x, y, z, w] = parse_float_array::<4>(fields, offset)?;
            DecodedValue::Quaternion(Quaternion { x, y, z, w })
        }
        ResponseShape::EulerAngles => {
            let [pitch, yaw, roll] = parse_float_array::<3>(fields, offset)?;
            DecodedValue::EulerAngles(EulerAngles { pitch, yaw, roll })
        }
        ResponseShape::FloatVector(n) => {
            let mut values = FloatVector::new();
            for i in 0..n as usize {
                let field = fields.next().ok_or(DecodeError::FieldCount { expected: n as usize, got: i })?;
                values
                    .push(parse_float(field, offset + i)?)
                    .map_err(|_| DecodeError::FieldCount { expected: n as usize, got: i + 1 })?;
            }
            DecodedValue::FloatVector(values)
        }
        ResponseShape::Integer => {
            let field = fields.next().ok_or(DecodeError::FieldCount { expected: 1, got: 0 })?;
            DecodedValue::IntegerEnum(parse_integer(field, offset)?)
        }
        ResponseShape::IntegerVector(n) => {
            let mut values = IntegerVector::new();
            for i in 0..n as usize {
                let field = fields.next().ok_or(DecodeError::FieldCount { expected: n as usize, got: i })?;
                values
                    .push(parse_integer(field, offset + i)?)
                    .map_err(|_| DecodeError::FieldCount { expected: n as usize, got: i + 1 })?;
            }
            DecodedValue::IntegerVector(values)
        }
        ResponseShape::None | ResponseShape::Text | ResponseShape::StreamingBatch => {
            return Err(DecodeError::FieldCount { expected: 0, got: fields.count() });
        }
    };
    Ok(value)
}

fn decode_text(body: &str) -> Result<DecodedValue, DecodeError> {
    let body = body.trim();
    if !body.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
        return Err(DecodeError::InvalidText);
    }
    let mut text = Text::new();
    text.push_str(body).map_err(|_| DecodeError::InvalidText)?;
    Ok(DecodedValue::Text(text))
}

/// Decodes one reply line against the shape `command` declares.
///
/// The line may still carry its `\n` / `\r\n` terminator. Decoding is
/// all-or-nothing: a wrong field count fails with
/// [`DecodeError::FieldCount`], an unparsable field with
/// [`DecodeError::NumericParse`].
///
/// Commands without a reply, and `GetStreamingBatch` (whose layout depends on
/// the configured slots, see [`super::decode_frame`]), cannot be decoded here.
pub fn decode(command: LogicalCommand, response: &[u8]) -> Result<DecodedValue, DecodeError> {
    let body = str::from_utf8(strip_line_ending(response))?;
    let shape = command.response_shape();

    if let ResponseShape::Text = shape {
        return decode_text(body);
    }

    let fields = split_fields(body);
    let got = fields.clone().count();
    let expected = match shape.field_count() {
        Some(n) if shape.expects_reply() => n,
        _ => return Err(DecodeError::FieldCount { expected: 0, got }),
    };
    if got != expected {
        return Err(DecodeError::FieldCount { expected, got });
    }

    decode_fields(shape, &mut fields.clone(), 0)
}
