//! One-element codecs that the collection codec is generic over.
//!
//! The scalar codecs are zero-sized, so a `read_list(src, &VarLongCodec)` call
//! monomorphizes into a plain loop over `read_vlong`.

use bigdecimal::BigDecimal;
use datameta_buffers::{BinarySink, BinarySource};

use crate::datetime::{read_utc, read_zoned, write_utc, write_zoned, ZonedDateTime};
use crate::decimal::{read_decimal_with, write_decimal_with, DecimalEncoding};
use crate::primitive::{read_bool, read_text, write_bool, write_text};
use crate::record::RecordCodec;
use crate::varint::{read_vint, read_vlong, write_vint, write_vlong};
use crate::CodecError;

/// Encodes and decodes a single collection element.
pub trait ElementCodec {
    type Item;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &Self::Item) -> Result<(), CodecError>;

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<Self::Item, CodecError>;
}

/// `i32` as VarInt.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarIntCodec;

impl ElementCodec for VarIntCodec {
    type Item = i32;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &i32) -> Result<(), CodecError> {
        write_vint(out, *item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<i32, CodecError> {
        read_vint(src)
    }
}

/// `i64` as VarLong.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarLongCodec;

impl ElementCodec for VarLongCodec {
    type Item = i64;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &i64) -> Result<(), CodecError> {
        write_vlong(out, *item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<i64, CodecError> {
        read_vlong(src)
    }
}

/// Big-endian IEEE 754 single precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct F32Codec;

impl ElementCodec for F32Codec {
    type Item = f32;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &f32) -> Result<(), CodecError> {
        out.put_f32(*item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<f32, CodecError> {
        Ok(src.take_f32()?)
    }
}

/// Big-endian IEEE 754 double precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Codec;

impl ElementCodec for F64Codec {
    type Item = f64;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &f64) -> Result<(), CodecError> {
        out.put_f64(*item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<f64, CodecError> {
        Ok(src.take_f64()?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl ElementCodec for BoolCodec {
    type Item = bool;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &bool) -> Result<(), CodecError> {
        write_bool(out, *item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<bool, CodecError> {
        read_bool(src)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ElementCodec for TextCodec {
    type Item = String;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &String) -> Result<(), CodecError> {
        write_text(out, item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<String, CodecError> {
        read_text(src)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec {
    pub encoding: DecimalEncoding,
}

impl DecimalCodec {
    pub const fn new(encoding: DecimalEncoding) -> Self {
        Self { encoding }
    }
}

impl ElementCodec for DecimalCodec {
    type Item = BigDecimal;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &BigDecimal) -> Result<(), CodecError> {
        write_decimal_with(out, item, self.encoding)
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<BigDecimal, CodecError> {
        read_decimal_with(src, self.encoding)
    }
}

/// Zoned date-time: registry key + epoch millis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZonedCodec;

impl ElementCodec for ZonedCodec {
    type Item = ZonedDateTime;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &ZonedDateTime) -> Result<(), CodecError> {
        write_zoned(out, item)
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<ZonedDateTime, CodecError> {
        read_zoned(src)
    }
}

/// Date-time stored as UTC epoch millis only.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcCodec;

impl ElementCodec for UtcCodec {
    type Item = ZonedDateTime;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &ZonedDateTime) -> Result<(), CodecError> {
        write_utc(out, item);
        Ok(())
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<ZonedDateTime, CodecError> {
        read_utc(src)
    }
}

/// Uses a record codec for each element of a record collection.
pub struct Records<'a, C: ?Sized>(pub &'a C);

impl<C: RecordCodec + ?Sized> ElementCodec for Records<'_, C> {
    type Item = C::Record;

    fn write_item<W: BinarySink + ?Sized>(&self, out: &mut W, item: &C::Record) -> Result<(), CodecError> {
        self.0.write(out, item)
    }

    fn read_item<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<C::Record, CodecError> {
        self.0.read(src)
    }
}
