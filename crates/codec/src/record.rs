//! The per-type binary record contract and the framing helpers built on it.

use datameta_buffers::{BinarySink, BinarySource, Reader, Writer};
use datameta_core::{DataMetaEntity, SemanticVersion};
use tracing::trace;

use crate::primitive::{read_text, write_text};
use crate::CodecError;

/// Binary codec for one generated record type.
///
/// `write` emits only the field bodies; any enclosing framing belongs to the
/// caller. Reads consume exactly what `write` produced.
pub trait RecordCodec {
    type Record: DataMetaEntity + Default;

    fn write<W: BinarySink + ?Sized>(&self, out: &mut W, value: &Self::Record) -> Result<(), CodecError>;

    /// Repopulates an existing instance in place.
    fn read_into<R: BinarySource + ?Sized>(&self, src: &mut R, target: &mut Self::Record) -> Result<(), CodecError>;

    fn read<R: BinarySource + ?Sized>(&self, src: &mut R) -> Result<Self::Record, CodecError> {
        let mut value = Self::Record::default();
        self.read_into(src, &mut value)?;
        Ok(value)
    }
}

/// Writes `major.minor.patch`; pre-release and build metadata are not persisted.
pub fn write_version<W: BinarySink + ?Sized>(out: &mut W, version: &SemanticVersion) {
    write_text(out, &version.semantic_parts_only());
}

pub fn read_version<R: BinarySource + ?Sized>(src: &mut R) -> Result<SemanticVersion, CodecError> {
    Ok(SemanticVersion::parse(&read_text(src)?)?)
}

pub fn write_versioned<C, W>(codec: &C, out: &mut W, value: &C::Record) -> Result<(), CodecError>
where
    C: RecordCodec + ?Sized,
    W: BinarySink + ?Sized,
{
    write_version(out, value.version());
    codec.write(out, value)
}

/// Reads and discards the version prefix, then the record body.
pub fn read_versioned<C, R>(codec: &C, src: &mut R) -> Result<C::Record, CodecError>
where
    C: RecordCodec + ?Sized,
    R: BinarySource + ?Sized,
{
    let version = read_version(src)?;
    trace!(%version, "skipping stored record version");
    codec.read(src)
}

pub fn to_bytes<C: RecordCodec + ?Sized>(codec: &C, value: &C::Record) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new();
    codec.write(&mut writer, value)?;
    Ok(writer.flush())
}

pub fn from_bytes<C: RecordCodec + ?Sized>(codec: &C, bytes: &[u8]) -> Result<C::Record, CodecError> {
    codec.read(&mut Reader::new(bytes))
}

pub fn to_bytes_versioned<C: RecordCodec + ?Sized>(codec: &C, value: &C::Record) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new();
    write_versioned(codec, &mut writer, value)?;
    Ok(writer.flush())
}

pub fn from_bytes_versioned<C: RecordCodec + ?Sized>(codec: &C, bytes: &[u8]) -> Result<C::Record, CodecError> {
    read_versioned(codec, &mut Reader::new(bytes))
}
