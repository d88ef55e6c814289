//! Length-prefixed text, byte and long arrays, bitsets and fixed-width scalars.

use datameta_buffers::{BinarySink, BinarySource, BufferError};
use datameta_core::{DomainBitSet, PresenceBitSet};

use crate::varint::{read_len, read_vint, read_vlong, write_len, write_vlong};
use crate::CodecError;

/// VarInt(byte length) followed by the UTF-8 bytes.
pub fn write_text<W: BinarySink + ?Sized>(out: &mut W, text: &str) {
    write_len(out, text.len());
    out.put_slice(text.as_bytes());
}

/// Writes the text, or the empty string when absent.
pub fn write_text_if_any<W: BinarySink + ?Sized>(out: &mut W, text: Option<&str>) {
    write_text(out, text.unwrap_or(""));
}

pub fn read_text<R: BinarySource + ?Sized>(src: &mut R) -> Result<String, CodecError> {
    let len = read_len(src)?;
    let bytes = src.take_vec(len)?;
    String::from_utf8(bytes).map_err(|_| CodecError::Buffer(BufferError::InvalidUtf8))
}

pub fn write_bool<W: BinarySink + ?Sized>(out: &mut W, value: bool) {
    out.put_u8(u8::from(value));
}

pub fn read_bool<R: BinarySource + ?Sized>(src: &mut R) -> Result<bool, CodecError> {
    Ok(src.take_u8()? != 0)
}

/// Uncompressed bytes, length first.
pub fn write_byte_array<W: BinarySink + ?Sized>(out: &mut W, bytes: &[u8]) {
    write_len(out, bytes.len());
    out.put_slice(bytes);
}

/// A length below one reads as an empty array.
pub fn read_byte_array<R: BinarySource + ?Sized>(src: &mut R) -> Result<Vec<u8>, CodecError> {
    let len = read_vint(src)?;
    if len < 1 {
        return Ok(Vec::new());
    }
    Ok(src.take_vec(len as usize)?)
}

pub fn write_long_array<W: BinarySink + ?Sized>(out: &mut W, values: &[i64]) {
    write_len(out, values.len());
    for &v in values {
        write_vlong(out, v);
    }
}

pub fn read_long_array<R: BinarySource + ?Sized>(src: &mut R) -> Result<Vec<i64>, CodecError> {
    let len = read_vint(src)?;
    if len < 1 {
        return Ok(Vec::new());
    }
    // The prefix is untrusted; let the vector grow as elements actually arrive.
    let mut result = Vec::with_capacity((len as usize).min(1024));
    for _ in 0..len {
        result.push(read_vlong(src)?);
    }
    Ok(result)
}

/// The trimmed image as a long array.
pub fn write_bitset<W: BinarySink + ?Sized>(out: &mut W, bits: &PresenceBitSet) {
    let image: Vec<i64> = bits.trimmed_image().into_iter().map(|w| w as i64).collect();
    write_long_array(out, &image);
}

pub fn read_bitset<R: BinarySource + ?Sized>(
    src: &mut R,
    capacity: usize,
) -> Result<PresenceBitSet, CodecError> {
    let image = read_image(src)?;
    Ok(PresenceBitSet::from_image(capacity, &image)?)
}

pub fn read_domain_bitset<T: 'static, R: BinarySource + ?Sized>(
    src: &mut R,
    domain: &'static [T],
) -> Result<DomainBitSet<T>, CodecError> {
    let image = read_image(src)?;
    Ok(DomainBitSet::from_image(domain, &image)?)
}

fn read_image<R: BinarySource + ?Sized>(src: &mut R) -> Result<Vec<u64>, CodecError> {
    Ok(read_long_array(src)?.into_iter().map(|w| w as u64).collect())
}
