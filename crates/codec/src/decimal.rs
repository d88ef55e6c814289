//! Arbitrary-precision decimals in text and two's-complement binary forms.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use datameta_buffers::{BinarySink, BinarySource};
use num_bigint::{BigInt, Sign};

use crate::primitive::{read_text, write_text};
use crate::varint::{read_len, read_vint, write_len, write_vint};
use crate::CodecError;

/// Selects the wire form of a decimal field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecimalEncoding {
    /// Length-prefixed canonical decimal string.
    #[default]
    Text,
    /// VarInt(scale) + VarInt(len) + two's-complement unscaled value.
    ///
    /// Only readers that format big integers exactly the same way can decode
    /// this form; do not use it for data that leaves the process family.
    Binary,
}

pub fn write_decimal<W: BinarySink + ?Sized>(out: &mut W, value: &BigDecimal) {
    write_text(out, &format_decimal(value));
}

pub fn read_decimal<R: BinarySource + ?Sized>(src: &mut R) -> Result<BigDecimal, CodecError> {
    parse_decimal(&read_text(src)?)
}

pub fn write_decimal_bin<W: BinarySink + ?Sized>(out: &mut W, value: &BigDecimal) -> Result<(), CodecError> {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let scale = i32::try_from(scale).map_err(|_| CodecError::InvalidDecimal(format!("scale {scale} out of range")))?;
    let bytes = unscaled.to_signed_bytes_be();
    write_vint(out, scale);
    write_len(out, bytes.len());
    out.put_slice(&bytes);
    Ok(())
}

pub fn read_decimal_bin<R: BinarySource + ?Sized>(src: &mut R) -> Result<BigDecimal, CodecError> {
    let scale = read_vint(src)?;
    let len = read_len(src)?;
    let bytes = src.take_vec(len)?;
    Ok(BigDecimal::new(BigInt::from_signed_bytes_be(&bytes), i64::from(scale)))
}

pub fn write_decimal_with<W: BinarySink + ?Sized>(
    out: &mut W,
    value: &BigDecimal,
    encoding: DecimalEncoding,
) -> Result<(), CodecError> {
    match encoding {
        DecimalEncoding::Text => {
            write_decimal(out, value);
            Ok(())
        }
        DecimalEncoding::Binary => write_decimal_bin(out, value),
    }
}

pub fn read_decimal_with<R: BinarySource + ?Sized>(
    src: &mut R,
    encoding: DecimalEncoding,
) -> Result<BigDecimal, CodecError> {
    match encoding {
        DecimalEncoding::Text => read_decimal(src),
        DecimalEncoding::Binary => read_decimal_bin(src),
    }
}

/// Canonical decimal text that keeps the scale.
///
/// Plain notation when the scale is non-negative and the adjusted exponent is
/// at least -6, otherwise scientific notation with one digit before the point:
/// `(1, -3)` prints `1E+3`, `(0, -2)` prints `0E+2`, `(123, 10)` prints `1.23E-8`.
pub fn format_decimal(value: &BigDecimal) -> String {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let digits = unscaled.magnitude().to_str_radix(10);
    let mut out = String::with_capacity(digits.len() + 8);
    if unscaled.sign() == Sign::Minus {
        out.push('-');
    }
    let len = digits.len() as i64;
    let adjusted = (len - 1) - scale;
    if scale >= 0 && adjusted >= -6 {
        if scale == 0 {
            out.push_str(&digits);
        } else if len > scale {
            let (int, frac) = digits.split_at((len - scale) as usize);
            out.push_str(int);
            out.push('.');
            out.push_str(frac);
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((scale - len) as usize));
            out.push_str(&digits);
        }
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        if adjusted != 0 {
            out.push('E');
            if adjusted > 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }
    }
    out
}

/// Parses canonical decimal text, as written by [`write_decimal`].
pub fn parse_decimal(text: &str) -> Result<BigDecimal, CodecError> {
    BigDecimal::from_str(text).map_err(|_| CodecError::InvalidDecimal(text.to_string()))
}
