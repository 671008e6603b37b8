//! This module contains the pure, stateless kernels for the numpress family of
//! semi-lossy encodings for scientific floating-point series.
//!
//! Three variants are provided:
//! - **linear**: values are scaled to fixed-point integers and each one is stored as
//!   its residual against a linear extrapolation of the previous two. Absolute error
//!   is bounded by `0.5 / fixed_point`.
//! - **pic**: values are rounded to the nearest non-negative integer.
//! - **slof**: `ln(x + 1)` is scaled to a 16-bit unsigned integer. Relative error on
//!   `x + 1` is bounded by roughly `0.5 / fixed_point`.
//!
//! Linear and pic residuals are packed as variable-length half-byte integers. The
//! encoded bytes do not identify their variant; the caller must know it.
//! Fixed points are stored as big-endian IEEE-754 doubles in the first 8 bytes.
//!
//! Linear encoding and its fixed point come from the `numpress` crate. Decoding
//! is done here so that corrupt residuals surface as errors.

use crate::error::MzbinError;
use crate::types::NumpressVariant;

const FIXED_POINT_LEN: usize = 8;
const NIBBLE_MASK: u32 = 0xf000_0000;

//==================================================================================
// 1. Half-byte Integer Packing
//==================================================================================

struct HalfByteWriter<'a> {
    out: &'a mut Vec<u8>,
    pending: Option<u8>,
}

impl<'a> HalfByteWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, pending: None }
    }

    fn push(&mut self, nibble: u8) {
        match self.pending.take() {
            None => self.pending = Some(nibble & 0xf),
            Some(high) => self.out.push((high << 4) | (nibble & 0xf)),
        }
    }

    /// Flushes a dangling half byte, padded with a zero low nibble.
    fn finish(self) {
        if let Some(high) = self.pending {
            self.out.push(high << 4);
        }
    }
}

struct HalfByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// True when the next nibble is the low half of `data[pos]`.
    low: bool,
}

impl<'a> HalfByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, low: false }
    }

    fn next(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        if self.low {
            self.low = false;
            self.pos += 1;
            Some(byte & 0xf)
        } else {
            self.low = true;
            Some(byte >> 4)
        }
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// A zero low nibble in the final byte, where an integer would start, is padding.
    fn at_padding(&self) -> bool {
        self.low && self.pos + 1 == self.data.len() && self.data[self.pos] & 0xf == 0
    }
}

/// Writes `x` as a head nibble followed by its significant nibbles, least
/// significant first. The head counts leading zero nibbles (0-8), or leading
/// `0xf` nibbles plus 8 (9-15).
fn encode_int(x: u32, writer: &mut HalfByteWriter<'_>) {
    let init = x & NIBBLE_MASK;
    let (head, leading) = if init == 0 {
        let leading = (0..8)
            .find(|&i| x & (NIBBLE_MASK >> (4 * i)) != 0)
            .unwrap_or(8);
        (leading, leading)
    } else if init == NIBBLE_MASK {
        let leading = (0..8)
            .find(|&i| {
                let m = NIBBLE_MASK >> (4 * i);
                x & m != m
            })
            .unwrap_or(7);
        (leading + 8, leading)
    } else {
        (0, 0)
    };

    writer.push(head as u8);
    for i in leading..8 {
        writer.push((x >> (4 * (i - leading))) as u8);
    }
}

fn decode_int(reader: &mut HalfByteReader<'_>) -> Result<u32, MzbinError> {
    let truncated = || MzbinError::NumpressError("Corrupt input: truncated integer".to_string());

    let head = reader.next().ok_or_else(truncated)? as u32;
    let (leading, mut value) = if head <= 8 {
        (head, 0u32)
    } else {
        let leading = head - 8;
        let ones = (0..leading).fold(0u32, |acc, i| acc | (NIBBLE_MASK >> (4 * i)));
        (leading, ones)
    };

    for i in leading..8 {
        let nibble = reader.next().ok_or_else(truncated)? as u32;
        value |= nibble << ((i - leading) * 4);
    }
    Ok(value)
}

//==================================================================================
// 2. Fixed Point Helpers
//==================================================================================

fn write_fixed_point(fixed_point: f64, output_buf: &mut Vec<u8>) {
    output_buf.extend_from_slice(&fixed_point.to_be_bytes());
}

fn read_fixed_point(input_bytes: &[u8]) -> Result<f64, MzbinError> {
    let raw: [u8; FIXED_POINT_LEN] = input_bytes
        .get(..FIXED_POINT_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            MzbinError::NumpressError(format!(
                "Corrupt input: {} bytes is too short for a fixed point",
                input_bytes.len()
            ))
        })?;
    Ok(f64::from_be_bytes(raw))
}

/// The largest fixed point for which every linear residual fits in 32 bits.
pub fn optimal_linear_fixed_point(values: &[f64]) -> f64 {
    numpress::optimal_scaling(values)
}

/// The largest fixed point for which every `ln(x + 1)` fits in 16 bits.
pub fn optimal_slof_fixed_point(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max_double = values
        .iter()
        .map(|v| (v + 1.0).ln())
        .fold(1.0f64, |acc, x| if x > acc { x } else { acc });
    (u16::MAX as f64 / max_double).floor()
}

//==================================================================================
// 3. Variant Kernels
//==================================================================================

fn encode_linear(values: &[f64], output_buf: &mut Vec<u8>, fixed_point: f64) -> Result<(), MzbinError> {
    let encoded = numpress::numpress_compress(values, fixed_point)
        .map_err(|e| MzbinError::NumpressError(e.to_string()))?;
    output_buf.extend_from_slice(&encoded);
    Ok(())
}

fn decode_linear(input_bytes: &[u8]) -> Result<Vec<f64>, MzbinError> {
    let fixed_point = read_fixed_point(input_bytes)?;
    let body = &input_bytes[FIXED_POINT_LEN..];
    if body.is_empty() {
        return Ok(Vec::new());
    }
    if !(fixed_point.is_finite() && fixed_point > 0.0) {
        return Err(MzbinError::NumpressError(format!(
            "Corrupt input: invalid fixed point {}",
            fixed_point
        )));
    }
    let read_u32 = |range: std::ops::Range<usize>| -> Result<i64, MzbinError> {
        let raw: [u8; 4] = body
            .get(range)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                MzbinError::NumpressError("Corrupt input: truncated leading value".to_string())
            })?;
        Ok(u32::from_le_bytes(raw) as i64)
    };

    let mut values = Vec::with_capacity(2 + body.len() * 2);
    let mut older = read_u32(0..4)?;
    values.push(older as f64 / fixed_point);
    if body.len() == 4 {
        return Ok(values);
    }
    let mut newer = read_u32(4..8)?;
    values.push(newer as f64 / fixed_point);

    let mut reader = HalfByteReader::new(&body[8..]);
    while !reader.is_exhausted() && !reader.at_padding() {
        let diff = decode_int(&mut reader)? as i32 as i64;
        let current = newer
            .checked_mul(2)
            .and_then(|x| x.checked_sub(older))
            .and_then(|x| x.checked_add(diff))
            .ok_or_else(|| {
                MzbinError::NumpressError(format!(
                    "Corrupt input: residual overflow after {} values",
                    values.len()
                ))
            })?;
        values.push(current as f64 / fixed_point);
        older = newer;
        newer = current;
    }
    Ok(values)
}

fn encode_pic(values: &[f64], output_buf: &mut Vec<u8>) -> Result<(), MzbinError> {
    let mut writer = HalfByteWriter::new(output_buf);
    for &value in values {
        if !(value >= -0.5 && value + 0.5 <= i32::MAX as f64) {
            return Err(MzbinError::NumpressError(format!(
                "Value {} is outside the positive integer range",
                value
            )));
        }
        encode_int((value + 0.5) as u32, &mut writer);
    }
    writer.finish();
    Ok(())
}

fn decode_pic(input_bytes: &[u8]) -> Result<Vec<f64>, MzbinError> {
    let mut values = Vec::with_capacity(input_bytes.len() * 2);
    let mut reader = HalfByteReader::new(input_bytes);
    while !reader.is_exhausted() && !reader.at_padding() {
        values.push(decode_int(&mut reader)? as f64);
    }
    Ok(values)
}

fn encode_slof(values: &[f64], output_buf: &mut Vec<u8>, fixed_point: f64) -> Result<(), MzbinError> {
    write_fixed_point(fixed_point, output_buf);
    output_buf.reserve(values.len() * 2);
    for &value in values {
        let scaled = (value + 1.0).ln() * fixed_point;
        if !(scaled.is_finite() && scaled >= 0.0 && scaled <= u16::MAX as f64) {
            return Err(MzbinError::NumpressError(format!(
                "Value {} does not fit a 16-bit log scale at fixed point {}",
                value, fixed_point
            )));
        }
        let x = (scaled + 0.5) as u16;
        output_buf.extend_from_slice(&x.to_le_bytes());
    }
    Ok(())
}

fn decode_slof(input_bytes: &[u8]) -> Result<Vec<f64>, MzbinError> {
    let fixed_point = read_fixed_point(input_bytes)?;
    let body = &input_bytes[FIXED_POINT_LEN..];
    if body.len() % 2 != 0 {
        return Err(MzbinError::BufferMismatch(2, body.len()));
    }
    if !body.is_empty() && !(fixed_point.is_finite() && fixed_point > 0.0) {
        return Err(MzbinError::NumpressError(format!(
            "Corrupt input: invalid fixed point {}",
            fixed_point
        )));
    }
    Ok(body
        .chunks_exact(2)
        .map(|c| (u16::from_le_bytes([c[0], c[1]]) as f64 / fixed_point).exp() - 1.0)
        .collect())
}

//==================================================================================
// 4. Public API
//==================================================================================

/// Encodes `values` with the given variant, replacing the contents of `output_buf`.
///
/// `fixed_point` applies to linear and slof; `None` computes the optimal value
/// from `values`. Pic ignores it.
pub fn encode(
    values: &[f64],
    output_buf: &mut Vec<u8>,
    variant: NumpressVariant,
    fixed_point: Option<f64>,
) -> Result<(), MzbinError> {
    output_buf.clear();
    match variant {
        NumpressVariant::Linear => {
            let fp = fixed_point.unwrap_or_else(|| optimal_linear_fixed_point(values));
            encode_linear(values, output_buf, fp)
        }
        NumpressVariant::Pic => encode_pic(values, output_buf),
        NumpressVariant::Slof => {
            let fp = fixed_point.unwrap_or_else(|| optimal_slof_fixed_point(values));
            encode_slof(values, output_buf, fp)
        }
    }
}

/// Decodes bytes produced by [`encode`] with the same variant.
pub fn decode(input_bytes: &[u8], variant: NumpressVariant) -> Result<Vec<f64>, MzbinError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }
    match variant {
        NumpressVariant::Linear => decode_linear(input_bytes),
        NumpressVariant::Pic => decode_pic(input_bytes),
        NumpressVariant::Slof => decode_slof(input_bytes),
    }
}

//==================================================================================
// 5. Unit Tests
//==================================================================================
