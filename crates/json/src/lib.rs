//! datameta-json - the JSON wire form of DataMeta records.
//!
//! Generated code implements [`JsonRecordCodec`] per record type in terms of
//! the [`fields`] helpers. A top-level document carries an envelope: the
//! reserved [`VERSION_KEY`] and [`DATA_TYPE_KEY`] members come first, so
//! [`VerAndDataType::from_json`] can route a document to the right codec
//! through a [`TypeRegistry`] without parsing the body.

mod envelope;
mod error;
pub mod fields;
mod reader;
mod record;
mod registry;
mod token;
mod writer;

pub use envelope::{
    from_json_str, read_object, to_json_string, write_object, VerAndDataType, DATA_TYPE_KEY, VERSION_KEY,
};
pub use error::{JsonCodecError, JsonError};
pub use fields::JsonScalar;
pub use reader::{JsonReader, TokenReader};
pub use record::{read_object_fields, JsonRecordCodec, ReadOptions};
pub use registry::{TypeHandle, TypeRegistry, TypeRegistryBuilder};
pub use token::JsonToken;
pub use writer::{JsonWriter, JsonWriterOptions, TokenWriter};
