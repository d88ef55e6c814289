//! datameta-codec - the compact binary wire form of DataMeta records.
//!
//! Everything here is written against the [`BinarySink`] / [`BinarySource`]
//! seams from `datameta-buffers`, so the same codec drives an in-memory
//! [`Writer`](datameta_buffers::Writer) or any other sink.
//!
//! Layout summary (big-endian throughout):
//!
//! | Value | Encoding |
//! |---|---|
//! | integer / long | VarInt / VarLong, see [`varint`] |
//! | zoned date-time | VarInt(zone key) + VarLong(epoch millis) |
//! | UTC date-time | VarLong(epoch millis) |
//! | decimal (text) | length-prefixed canonical decimal string |
//! | decimal (binary) | VarInt(scale) + VarInt(len) + two's-complement bytes |
//! | byte array | VarInt(len) + raw bytes |
//! | collection | VarInt(count) + elements, nothing when absent |
//! | versioned record | `major.minor.patch` text + record body |
//!
//! [`BinarySink`]: datameta_buffers::BinarySink
//! [`BinarySource`]: datameta_buffers::BinarySource

mod error;

pub mod collection;
pub mod datetime;
pub mod decimal;
pub mod element;
pub mod primitive;
pub mod record;
pub mod varint;
pub mod zone;

pub use collection::{read_deque, read_list, read_set, write_collection};
pub use datetime::{read_utc, read_zoned, write_utc, write_zoned, ZonedDateTime};
pub use decimal::{
    format_decimal, parse_decimal, read_decimal, read_decimal_bin, read_decimal_with, write_decimal, write_decimal_bin,
    write_decimal_with, DecimalEncoding,
};
pub use element::{
    BoolCodec, DecimalCodec, ElementCodec, F32Codec, F64Codec, Records, TextCodec, UtcCodec,
    VarIntCodec, VarLongCodec, ZonedCodec,
};
pub use error::CodecError;
pub use primitive::{
    read_bitset, read_bool, read_byte_array, read_domain_bitset, read_long_array, read_text,
    write_bitset, write_bool, write_byte_array, write_long_array, write_text, write_text_if_any,
};
pub use record::{
    from_bytes, from_bytes_versioned, read_version, read_versioned, to_bytes, to_bytes_versioned,
    write_version, write_versioned, RecordCodec,
};
pub use varint::{read_vint, read_vlong, vlong_size, write_vint, write_vlong};
pub use zone::{TimeZoneRegistry, ZoneId, REGISTERED_ZONES};
