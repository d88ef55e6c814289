//! Field-level helpers that generated JSON codecs are written in terms of.
//!
//! Readers take the [`TokenReader`] positioned on the value token (the field
//! name already consumed) and leave it on the last token of that value.
//! Collections follow one rule: `None` is written as `null` in value position
//! and the whole field is left out in field position.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use bigdecimal::BigDecimal;
use datameta_codec::{format_decimal, parse_decimal, ZonedDateTime};
use datameta_core::PresenceBitSet;

use crate::{JsonCodecError, JsonRecordCodec, JsonToken, ReadOptions, TokenReader, TokenWriter};

/// A value with a direct scalar JSON representation.
pub trait JsonScalar: Sized {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W);

    /// Reads the value of the token `src` is positioned on.
    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError>;
}

fn unexpected(expected: &str, found: Option<JsonToken>) -> JsonCodecError {
    JsonCodecError::malformed(format!("expected {expected}, found {found:?}"))
}

fn expect_current<R: TokenReader + ?Sized>(src: &R, token: JsonToken) -> Result<(), JsonCodecError> {
    match src.current_token() {
        Some(found) if found == token => Ok(()),
        found => Err(unexpected(&format!("{token:?}"), found)),
    }
}

impl JsonScalar for i64 {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.i64(*self);
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        expect_current(src, JsonToken::Number)?;
        Ok(src.i64_value()?)
    }
}

impl JsonScalar for i32 {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.i64(i64::from(*self));
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        let wide = i64::read_json(src)?;
        i32::try_from(wide).map_err(|_| JsonCodecError::malformed(format!("{wide} does not fit in 32 bits")))
    }
}

impl JsonScalar for f64 {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.f64(*self);
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        expect_current(src, JsonToken::Number)?;
        Ok(src.f64_value()?)
    }
}

impl JsonScalar for f32 {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.f64(f64::from(*self));
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        Ok(f64::read_json(src)? as f32)
    }
}

impl JsonScalar for bool {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.bool(*self);
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        match src.current_token() {
            Some(JsonToken::True) => Ok(true),
            Some(JsonToken::False) => Ok(false),
            found => Err(unexpected("a boolean", found)),
        }
    }
}

impl JsonScalar for String {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.string(self);
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        expect_current(src, JsonToken::String)?;
        Ok(src.text().to_owned())
    }
}

/// Written as a JSON number with every digit kept; read from a number or a string.
impl JsonScalar for BigDecimal {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.number_text(&format_decimal(self));
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        match src.current_token() {
            Some(JsonToken::Number | JsonToken::String) => Ok(parse_decimal(src.text())?),
            found => Err(unexpected("a decimal", found)),
        }
    }
}

/// ISO-8601 text, zone bracket included.
impl JsonScalar for ZonedDateTime {
    fn write_json<W: TokenWriter + ?Sized>(&self, out: &mut W) {
        out.string(&self.to_iso_string());
    }

    fn read_json<R: TokenReader + ?Sized>(src: &R) -> Result<Self, JsonCodecError> {
        expect_current(src, JsonToken::String)?;
        Ok(ZonedDateTime::parse_iso(src.text())?)
    }
}

pub fn write_scalar_field<T: JsonScalar, W: TokenWriter + ?Sized>(out: &mut W, name: &str, value: &T) {
    out.field_name(name);
    value.write_json(out);
}

/// `None` when positioned on `null`, otherwise whatever `read` produces.
pub fn read_nullable<R, T, F>(src: &mut R, read: F) -> Result<Option<T>, JsonCodecError>
where
    R: TokenReader + ?Sized,
    F: FnOnce(&mut R) -> Result<T, JsonCodecError>,
{
    if src.current_token() == Some(JsonToken::Null) {
        return Ok(None);
    }
    read(src).map(Some)
}

fn read_array<R, C, T, F>(src: &mut R, mut out: C, mut item: F) -> Result<C, JsonCodecError>
where
    R: TokenReader + ?Sized,
    C: Extend<T>,
    F: FnMut(&mut R) -> Result<T, JsonCodecError>,
{
    expect_current(src, JsonToken::StartArray)?;
    loop {
        match src.next_token()? {
            Some(JsonToken::EndArray) => return Ok(out),
            Some(_) => out.extend(std::iter::once(item(src)?)),
            None => return Err(JsonCodecError::malformed("document ended inside an array")),
        }
    }
}

/// Bytes as an array of signed 8-bit numbers.
pub fn write_byte_array<W: TokenWriter + ?Sized>(out: &mut W, bytes: &[u8]) {
    out.start_array();
    for &b in bytes {
        out.i64(i64::from(b as i8));
    }
    out.end_array();
}

pub fn write_byte_array_field<W: TokenWriter + ?Sized>(out: &mut W, name: &str, bytes: &[u8]) {
    out.field_name(name);
    write_byte_array(out, bytes);
}

pub fn read_byte_array<R: TokenReader + ?Sized>(src: &mut R) -> Result<Vec<u8>, JsonCodecError> {
    read_array(src, Vec::new(), |src| {
        let value = i64::read_json(src)?;
        i8::try_from(value)
            .map(|b| b as u8)
            .map_err(|_| JsonCodecError::malformed(format!("{value} is not a byte")))
    })
}

pub fn write_long_array<W: TokenWriter + ?Sized>(out: &mut W, values: &[i64]) {
    out.start_array();
    for &v in values {
        out.i64(v);
    }
    out.end_array();
}

pub fn write_long_array_field<W: TokenWriter + ?Sized>(out: &mut W, name: &str, values: &[i64]) {
    out.field_name(name);
    write_long_array(out, values);
}

pub fn read_long_array<R: TokenReader + ?Sized>(src: &mut R) -> Result<Vec<i64>, JsonCodecError> {
    read_array(src, Vec::new(), |src| i64::read_json(src))
}

/// The trimmed image as an array of signed 64-bit words.
pub fn write_bitset_field<W: TokenWriter + ?Sized>(out: &mut W, name: &str, bits: &PresenceBitSet) {
    let image: Vec<i64> = bits.trimmed_image().into_iter().map(|w| w as i64).collect();
    write_long_array_field(out, name, &image);
}

pub fn read_bitset<R: TokenReader + ?Sized>(src: &mut R, capacity: usize) -> Result<PresenceBitSet, JsonCodecError> {
    let image: Vec<u64> = read_long_array(src)?.into_iter().map(|w| w as u64).collect();
    PresenceBitSet::from_image(capacity, &image)
        .map_err(|err| JsonCodecError::Codec(err.into()))
}

/// Array of scalars, or `null` when absent.
pub fn write_collection<'a, T, W, I>(out: &mut W, items: Option<I>)
where
    T: JsonScalar + 'a,
    W: TokenWriter + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let Some(items) = items else {
        out.null();
        return;
    };
    out.start_array();
    for item in items {
        item.write_json(out);
    }
    out.end_array();
}

/// Array of scalars under `name`; nothing at all when absent.
pub fn write_collection_field<'a, T, W, I>(out: &mut W, name: &str, items: Option<I>)
where
    T: JsonScalar + 'a,
    W: TokenWriter + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    if items.is_some() {
        out.field_name(name);
        write_collection(out, items);
    }
}

pub fn read_list<T: JsonScalar, R: TokenReader + ?Sized>(src: &mut R) -> Result<Vec<T>, JsonCodecError> {
    read_array(src, Vec::new(), |src| T::read_json(src))
}

pub fn read_deque<T: JsonScalar, R: TokenReader + ?Sized>(src: &mut R) -> Result<VecDeque<T>, JsonCodecError> {
    read_array(src, VecDeque::new(), |src| T::read_json(src))
}

pub fn read_set<T, R>(src: &mut R) -> Result<HashSet<T>, JsonCodecError>
where
    T: JsonScalar + Eq + Hash,
    R: TokenReader + ?Sized,
{
    read_array(src, HashSet::new(), |src| T::read_json(src))
}

/// Array of record objects, or `null` when absent.
pub fn write_record_collection<'a, C, W, I>(out: &mut W, items: Option<I>, codec: &C) -> Result<(), JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    C::Record: 'a,
    W: TokenWriter + ?Sized,
    I: IntoIterator<Item = &'a C::Record>,
{
    let Some(items) = items else {
        out.null();
        return Ok(());
    };
    out.start_array();
    for item in items {
        out.start_object();
        codec.write(out, item)?;
        out.end_object();
    }
    out.end_array();
    Ok(())
}

/// Array of record objects under `name`; nothing at all when absent.
pub fn write_record_collection_field<'a, C, W, I>(
    out: &mut W,
    name: &str,
    items: Option<I>,
    codec: &C,
) -> Result<(), JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    C::Record: 'a,
    W: TokenWriter + ?Sized,
    I: IntoIterator<Item = &'a C::Record>,
{
    if items.is_none() {
        return Ok(());
    }
    out.field_name(name);
    write_record_collection(out, items, codec)
}

fn read_record<C, R>(src: &mut R, codec: &C, options: ReadOptions) -> Result<C::Record, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    R: TokenReader + ?Sized,
{
    expect_current(src, JsonToken::StartObject)?;
    codec.read(src, options)
}

pub fn read_record_list<C, R>(src: &mut R, codec: &C, options: ReadOptions) -> Result<Vec<C::Record>, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    R: TokenReader + ?Sized,
{
    read_array(src, Vec::new(), |src| read_record(src, codec, options))
}

pub fn read_record_deque<C, R>(
    src: &mut R,
    codec: &C,
    options: ReadOptions,
) -> Result<VecDeque<C::Record>, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    R: TokenReader + ?Sized,
{
    read_array(src, VecDeque::new(), |src| read_record(src, codec, options))
}

pub fn read_record_set<C, R>(src: &mut R, codec: &C, options: ReadOptions) -> Result<HashSet<C::Record>, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    C::Record: Eq + Hash,
    R: TokenReader + ?Sized,
{
    read_array(src, HashSet::new(), |src| read_record(src, codec, options))
}

/// Reads a nested record object; the value token must be `{`.
pub fn read_nested<C, R>(src: &mut R, codec: &C, options: ReadOptions) -> Result<C::Record, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    R: TokenReader + ?Sized,
{
    read_record(src, codec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonReader, JsonWriter};

    fn reader_on_value(json: &str) -> JsonReader<'_> {
        let mut reader = JsonReader::new(json.as_bytes());
        reader.next_token().unwrap();
        reader
    }

    #[test]
    fn bytes_are_signed_numbers() {
        let mut writer = JsonWriter::new();
        write_byte_array(&mut writer, &[0, 127, 128, 255]);
        let json = writer.into_string();
        assert_eq!(json, "[0,127,-128,-1]");
        assert_eq!(read_byte_array(&mut reader_on_value(&json)).unwrap(), vec![0, 127, 128, 255]);
        assert!(read_byte_array(&mut reader_on_value("[300]")).is_err());
    }

    #[test]
    fn absent_collection_is_null_in_value_position() {
        let mut writer = JsonWriter::new();
        writer.start_array();
        write_collection::<i64, _, &Vec<i64>>(&mut writer, None);
        write_collection(&mut writer, Some(&vec![1i64, 2]));
        writer.end_array();
        assert_eq!(writer.into_string(), "[null,[1,2]]");
    }

    #[test]
    fn absent_collection_field_is_omitted() {
        let mut writer = JsonWriter::new();
        writer.start_object();
        write_collection_field::<String, _, &Vec<String>>(&mut writer, "gone", None);
        write_collection_field(&mut writer, "here", Some(&vec!["x".to_string()]));
        writer.end_object();
        assert_eq!(writer.into_string(), r#"{"here":["x"]}"#);
    }

    #[test]
    fn decimals_keep_every_digit() {
        let text = "12345678909876543210123456789.56";
        let value: BigDecimal = parse_decimal(text).unwrap();
        let mut writer = JsonWriter::new();
        value.write_json(&mut writer);
        let json = writer.into_string();
        assert_eq!(json, text);
        assert_eq!(BigDecimal::read_json(&reader_on_value(&json)).unwrap(), value);
        assert_eq!(BigDecimal::read_json(&reader_on_value("\"-0.5\"")).unwrap(), parse_decimal("-0.5").unwrap());
    }

    #[test]
    fn decimals_keep_their_scale() {
        for (unscaled, scale, text) in [(1, -3, "1E+3"), (0, -2, "0E+2"), (-25, 9, "-2.5E-8"), (1250, 2, "12.50")] {
            let value = BigDecimal::new(unscaled.into(), scale);
            let mut writer = JsonWriter::new();
            value.write_json(&mut writer);
            let json = writer.into_string();
            assert_eq!(json, text);
            let back = BigDecimal::read_json(&reader_on_value(&json)).unwrap();
            assert_eq!(back.as_bigint_and_exponent(), value.as_bigint_and_exponent());
        }
    }

    #[test]
    fn nullable_and_type_checks() {
        let mut reader = reader_on_value("null");
        assert_eq!(read_nullable(&mut reader, |r| String::read_json(r)).unwrap(), None);
        assert!(matches!(
            i32::read_json(&reader_on_value("\"7\"")),
            Err(JsonCodecError::MalformedDocument(_))
        ));
        assert!(i32::read_json(&reader_on_value("4294967296")).is_err());
        assert_eq!(f32::read_json(&reader_on_value("1.1")).unwrap(), 1.1f32);
    }

    #[test]
    fn bitset_field_round_trips() {
        let mut bits = PresenceBitSet::new(70);
        bits.set(0).unwrap();
        bits.set(69).unwrap();
        let mut writer = JsonWriter::new();
        writer.start_object();
        write_bitset_field(&mut writer, "bits", &bits);
        writer.end_object();
        let json = writer.into_string();
        assert_eq!(json, r#"{"bits":[1,32]}"#);
        let mut reader = JsonReader::new(json.as_bytes());
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        assert_eq!(read_bitset(&mut reader, 70).unwrap(), bits);
    }
}
