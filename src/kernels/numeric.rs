//! This module contains the pure, stateless kernel for numeric re-encoding.
//!
//! This is the type-conversion stage of every pipeline. It converts a byte buffer
//! between the six fixed-width little-endian encodings by decoding the source width
//! into an intermediate `f64` array and re-encoding it at the target width. Integer
//! targets use Rust's narrowing `as` cast (truncation toward zero, saturating at
//! the type bounds). With `Float64` on both sides it doubles as the plain
//! double <-> bytes conversion.

use num_traits::AsPrimitive;

use crate::error::MzbinError;
use crate::types::NumericType;

//==================================================================================
// 1. Private Core Logic
//==================================================================================

/// A fixed-width scalar with a little-endian byte representation.
trait LeScalar: Copy + AsPrimitive<f64> + 'static {
    const WIDTH: usize;
    fn read_le(chunk: &[u8]) -> Self;
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_le_scalar {
    ($($t:ty),+) => {
        $(
            impl LeScalar for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn read_le(chunk: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(chunk);
                    <$t>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_le_scalar!(i8, i16, i32, i64, f32, f64);

fn widen<T>(input_bytes: &[u8]) -> Result<Vec<f64>, MzbinError>
where
    T: LeScalar,
    f64: AsPrimitive<T>,
{
    if input_bytes.len() % T::WIDTH != 0 {
        return Err(MzbinError::BufferMismatch(T::WIDTH, input_bytes.len()));
    }
    Ok(input_bytes
        .chunks_exact(T::WIDTH)
        .map(|chunk| <T as AsPrimitive<f64>>::as_(T::read_le(chunk)))
        .collect())
}

fn narrow<T>(values: &[f64], output_buf: &mut Vec<u8>)
where
    T: LeScalar,
    f64: AsPrimitive<T>,
{
    output_buf.reserve(values.len() * T::WIDTH);
    for &v in values {
        let x = <f64 as AsPrimitive<T>>::as_(v);
        x.write_le(output_buf);
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Decodes a buffer of `from`-typed elements into doubles.
pub fn decode_to_f64(input_bytes: &[u8], from: NumericType) -> Result<Vec<f64>, MzbinError> {
    match from {
        NumericType::Float64 => widen::<f64>(input_bytes),
        NumericType::Float32 => widen::<f32>(input_bytes),
        NumericType::Int8 => widen::<i8>(input_bytes),
        NumericType::Int16 => widen::<i16>(input_bytes),
        NumericType::Int32 => widen::<i32>(input_bytes),
        NumericType::Int64 => widen::<i64>(input_bytes),
    }
}

/// Encodes doubles as `to`-typed elements, replacing the contents of `output_buf`.
pub fn encode_from_f64(values: &[f64], to: NumericType, output_buf: &mut Vec<u8>) {
    output_buf.clear();
    match to {
        NumericType::Float64 => narrow::<f64>(values, output_buf),
        NumericType::Float32 => narrow::<f32>(values, output_buf),
        NumericType::Int8 => narrow::<i8>(values, output_buf),
        NumericType::Int16 => narrow::<i16>(values, output_buf),
        NumericType::Int32 => narrow::<i32>(values, output_buf),
        NumericType::Int64 => narrow::<i64>(values, output_buf),
    }
}

/// Converts `from`-typed bytes into `to`-typed bytes.
pub fn convert(
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    from: NumericType,
    to: NumericType,
) -> Result<(), MzbinError> {
    if from == to {
        if input_bytes.len() % from.width() != 0 {
            return Err(MzbinError::BufferMismatch(from.width(), input_bytes.len()));
        }
        output_buf.clear();
        output_buf.extend_from_slice(input_bytes);
        return Ok(());
    }
    let values = decode_to_f64(input_bytes, from)?;
    encode_from_f64(&values, to, output_buf);
    Ok(())
}

/// The forward direction: `from` bytes in, `to` bytes out.
pub fn encode(
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    from: NumericType,
    to: NumericType,
) -> Result<(), MzbinError> {
    convert(input_bytes, output_buf, from, to)
}

/// The reverse direction: `to` bytes in, `from` bytes out.
pub fn decode(
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    from: NumericType,
    to: NumericType,
) -> Result<(), MzbinError> {
    convert(input_bytes, output_buf, to, from)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{doubles_to_le_bytes, le_bytes_to_doubles};

    /// Values exactly representable in every one of the six encodings.
    fn representable() -> Vec<f64> {
        vec![0.0, 1.0, -1.0, 42.0, -100.0, 127.0, -128.0]
    }

    #[test]
    fn test_roundtrip_all_type_pairs() {
        let original = doubles_to_le_bytes(&representable());
        for from in NumericType::ALL {
            // Build a `from`-typed source buffer first.
            let mut source = Vec::new();
            encode(&original, &mut source, NumericType::Float64, from).unwrap();

            for to in NumericType::ALL {
                let mut forward = Vec::new();
                encode(&source, &mut forward, from, to).unwrap();
                assert_eq!(forward.len(), representable().len() * to.width());

                let mut back = Vec::new();
                decode(&forward, &mut back, from, to).unwrap();
                assert_eq!(back, source, "roundtrip failed for {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_empty_and_single_element() {
        for to in NumericType::ALL {
            let mut out = vec![9u8];
            encode(&[], &mut out, NumericType::Float64, to).unwrap();
            assert!(out.is_empty());

            let single = doubles_to_le_bytes(&[5.0]);
            encode(&single, &mut out, NumericType::Float64, to).unwrap();
            assert_eq!(out.len(), to.width());
            let mut back = Vec::new();
            decode(&out, &mut back, NumericType::Float64, to).unwrap();
            assert_eq!(le_bytes_to_doubles(&back).unwrap(), vec![5.0]);
        }
    }

    #[test]
    fn test_float32_narrowing_precision() {
        let original = doubles_to_le_bytes(&[1.0, 2.54, 1234.5678]);
        let mut narrowed = Vec::new();
        encode(&original, &mut narrowed, NumericType::Float64, NumericType::Float32).unwrap();
        assert_eq!(narrowed.len(), 12);
        assert_eq!(&narrowed[0..4], &1.0f32.to_le_bytes());

        let mut back = Vec::new();
        decode(&narrowed, &mut back, NumericType::Float64, NumericType::Float32).unwrap();
        let values = le_bytes_to_doubles(&back).unwrap();
        assert!((values[1] - 2.54).abs() < 1e-6);
        assert!((values[2] - 1234.5678).abs() < 1e-3);
    }

    #[test]
    fn test_integer_encoding_truncates() {
        let original = doubles_to_le_bytes(&[2.9, -2.9, 300.0]);
        let mut out = Vec::new();
        encode(&original, &mut out, NumericType::Float64, NumericType::Int16).unwrap();
        assert_eq!(decode_to_f64(&out, NumericType::Int16).unwrap(), vec![2.0, -2.0, 300.0]);

        encode(&original, &mut out, NumericType::Float64, NumericType::Int8).unwrap();
        // `as` saturates at the bounds of the narrow type.
        assert_eq!(decode_to_f64(&out, NumericType::Int8).unwrap(), vec![2.0, -2.0, 127.0]);
    }

    #[test]
    fn test_length_not_multiple_of_width_is_error() {
        let mut out = Vec::new();
        let result = encode(&[0u8; 7], &mut out, NumericType::Int32, NumericType::Float64);
        assert!(matches!(result, Err(MzbinError::BufferMismatch(4, 7))));

        let result = decode(&[0u8; 7], &mut out, NumericType::Float64, NumericType::Float64);
        assert!(matches!(result, Err(MzbinError::BufferMismatch(8, 7))));
    }
}
