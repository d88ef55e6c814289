//! Variable-length signed integers.
//!
//! Wire layout:
//! - `-112..=127`: the value itself, one byte
//! - otherwise: a header byte then 1-8 magnitude bytes, most significant first.
//!   Header is `-112 - len` for non-negative values and `-120 - len` for
//!   negative ones, whose magnitude is stored complemented (`!value`).
//!
//! This is not zigzag/LEB128; the layout is fixed for compatibility with
//! previously written data.

use datameta_buffers::{BinarySink, BinarySource};

use crate::CodecError;

/// Encoded size in bytes, header included.
pub fn vlong_size(value: i64) -> usize {
    if (-112..=127).contains(&value) {
        return 1;
    }
    let magnitude = if value < 0 { !value } else { value };
    1 + magnitude_len(magnitude)
}

#[inline]
fn magnitude_len(magnitude: i64) -> usize {
    (64 - magnitude.leading_zeros() as usize + 7) / 8
}

pub fn write_vlong<W: BinarySink + ?Sized>(out: &mut W, value: i64) {
    if (-112..=127).contains(&value) {
        out.put_i8(value as i8);
        return;
    }
    let (magnitude, base) = if value < 0 {
        (!value, -120i32)
    } else {
        (value, -112i32)
    };
    let len = magnitude_len(magnitude);
    out.put_i8((base - len as i32) as i8);
    out.put_slice(&magnitude.to_be_bytes()[8 - len..]);
}

pub fn write_vint<W: BinarySink + ?Sized>(out: &mut W, value: i32) {
    write_vlong(out, value as i64);
}

pub fn read_vlong<R: BinarySource + ?Sized>(src: &mut R) -> Result<i64, CodecError> {
    let header = src.take_i8()? as i32;
    if header >= -112 {
        return Ok(header as i64);
    }
    let negative = header < -120;
    let len = (if negative { -120 - header } else { -112 - header }) as usize;
    let mut buf = [0u8; 8];
    src.take_exact(&mut buf[8 - len..])?;
    let magnitude = i64::from_be_bytes(buf);
    Ok(if negative { !magnitude } else { magnitude })
}

pub fn read_vint<R: BinarySource + ?Sized>(src: &mut R) -> Result<i32, CodecError> {
    let value = read_vlong(src)?;
    i32::try_from(value).map_err(|_| CodecError::VarIntOverflow(value))
}

/// Writes a collection or buffer length as a VarInt.
pub(crate) fn write_len<W: BinarySink + ?Sized>(out: &mut W, len: usize) {
    write_vlong(out, len as i64);
}

/// Reads a length prefix, rejecting negative values.
pub(crate) fn read_len<R: BinarySource + ?Sized>(src: &mut R) -> Result<usize, CodecError> {
    let len = read_vint(src)?;
    usize::try_from(len).map_err(|_| CodecError::NegativeLength(len))
}
