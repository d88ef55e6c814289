//! The top-level JSON envelope: reserved version and type keys ahead of the body.
//!
//! ```text
//! {"*v*":"1.2.0","*dt*":"org.example.Person","name":"...", ...}
//! ```

use std::fmt;

use datameta_core::{DataMetaEntity, SemanticVersion};
use tracing::trace;

use crate::registry::{TypeHandle, TypeRegistry};
use crate::{
    JsonCodecError, JsonReader, JsonRecordCodec, JsonToken, JsonWriter, JsonWriterOptions, ReadOptions,
    TokenReader, TokenWriter,
};

/// Full version string of the record's schema.
pub const VERSION_KEY: &str = "*v*";
/// Registered type name of the record.
pub const DATA_TYPE_KEY: &str = "*dt*";

pub(crate) fn is_reserved_key(name: &str) -> bool {
    name == VERSION_KEY || name == DATA_TYPE_KEY
}

/// Writes `{ version, data type, body... }`.
pub fn write_object<C, W>(codec: &C, out: &mut W, value: &C::Record) -> Result<(), JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    W: TokenWriter + ?Sized,
{
    out.start_object();
    out.string_field(VERSION_KEY, &value.version().to_string());
    out.string_field(DATA_TYPE_KEY, codec.type_name());
    codec.write(out, value)?;
    out.end_object();
    trace!(record = codec.type_name(), "wrote record envelope");
    Ok(())
}

/// Reads a whole object with a codec the caller picked; the envelope keys are skipped.
pub fn read_object<C, R>(codec: &C, src: &mut R, options: ReadOptions) -> Result<C::Record, JsonCodecError>
where
    C: JsonRecordCodec + ?Sized,
    R: TokenReader + ?Sized,
{
    match src.next_token()? {
        Some(JsonToken::StartObject) => codec.read(src, options),
        found => Err(JsonCodecError::malformed(format!("expected an object, found {found:?}"))),
    }
}

pub fn to_json_string<C: JsonRecordCodec + ?Sized>(
    codec: &C,
    value: &C::Record,
    options: JsonWriterOptions,
) -> Result<String, JsonCodecError> {
    let mut writer = JsonWriter::with_options(options);
    write_object(codec, &mut writer, value)?;
    Ok(writer.into_string())
}

pub fn from_json_str<C: JsonRecordCodec + ?Sized>(
    codec: &C,
    json: &str,
    options: ReadOptions,
) -> Result<C::Record, JsonCodecError> {
    read_object(codec, &mut JsonReader::new(json.as_bytes()), options)
}

/// Version and resolved type of an enveloped document, read without decoding the body.
#[derive(Debug)]
pub struct VerAndDataType<'r> {
    version: SemanticVersion,
    data_type: &'r TypeHandle,
}

impl<'r> VerAndDataType<'r> {
    /// Scans the top-level members of `json` for the two reserved keys.
    ///
    /// Members other than the reserved ones are skipped, and scanning stops as
    /// soon as both are found, so the rest of the body need not be valid.
    pub fn from_json(json: &str, registry: &'r TypeRegistry) -> Result<Self, JsonCodecError> {
        Self::from_reader(&mut JsonReader::new(json.as_bytes()), registry)
    }

    pub fn from_reader<R: TokenReader + ?Sized>(src: &mut R, registry: &'r TypeRegistry) -> Result<Self, JsonCodecError> {
        match src.next_token()? {
            Some(JsonToken::StartObject) => {}
            found => return Err(JsonCodecError::malformed(format!("expected an object, found {found:?}"))),
        }
        let mut version = None;
        let mut data_type = None;
        loop {
            let name = match src.next_token()? {
                Some(JsonToken::FieldName) => src.text().to_owned(),
                Some(JsonToken::EndObject) => {
                    return Err(JsonCodecError::malformed("object closed before the version and data type"))
                }
                found => return Err(JsonCodecError::malformed(format!("unexpected token {found:?} in envelope"))),
            };
            let token = src
                .next_token()?
                .ok_or_else(|| JsonCodecError::malformed(format!("no value for field {name:?}")))?;
            match name.as_str() {
                VERSION_KEY | DATA_TYPE_KEY if token != JsonToken::String => {
                    return Err(JsonCodecError::malformed(format!("{name} must be a string, found {token:?}")));
                }
                VERSION_KEY => version = Some(SemanticVersion::parse(src.text())?),
                DATA_TYPE_KEY => data_type = Some(registry.resolve(src.text())?),
                _ => src.skip_children()?,
            }
            if let (Some(version), Some(data_type)) = (&version, data_type) {
                return Ok(Self {
                    version: version.clone(),
                    data_type,
                });
            }
        }
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    pub fn data_type(&self) -> &'r TypeHandle {
        self.data_type
    }

    pub fn type_name(&self) -> &'static str {
        self.data_type.name()
    }
}

impl fmt::Display for VerAndDataType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerAndDataType{{{}#{}}}", self.data_type.name(), self.version)
    }
}
