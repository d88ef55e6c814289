//! datameta-buffers - binary sink and source primitives for the DataMeta codecs.
//!
//! The codecs never touch raw byte storage directly: they write into a
//! [`BinarySink`] and read from a [`BinarySource`]. [`Writer`] and [`Reader`]
//! are the in-memory implementations used by the whole-buffer helpers.

mod error;
mod reader;
mod sink;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use sink::{BinarySink, BinarySource};
pub use writer::{Writer, WriterOptions};
