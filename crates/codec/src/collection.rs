//! Count-prefixed collections: lists, deques and sets over any [`ElementCodec`].
//!
//! An absent collection writes nothing at all. Presence is tracked by the
//! record's [`PresenceBitSet`](datameta_core::PresenceBitSet), so the reader
//! only calls into here for collections that were written.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use datameta_buffers::{BinarySink, BinarySource};

use crate::element::ElementCodec;
use crate::varint::{read_len, write_len};
use crate::CodecError;

/// Upper bound on up-front allocation; the count prefix comes off the wire.
const MAX_PREALLOC: usize = 1024;

/// VarInt(count) followed by each element in iteration order.
pub fn write_collection<'a, W, E, I>(out: &mut W, items: Option<I>, codec: &E) -> Result<(), CodecError>
where
    W: BinarySink + ?Sized,
    E: ElementCodec,
    E::Item: 'a,
    I: IntoIterator<Item = &'a E::Item>,
    I::IntoIter: ExactSizeIterator,
{
    let Some(items) = items else {
        return Ok(());
    };
    let items = items.into_iter();
    write_len(out, items.len());
    for item in items {
        codec.write_item(out, item)?;
    }
    Ok(())
}

fn read_into<R, E, C>(src: &mut R, codec: &E, make: impl FnOnce(usize) -> C) -> Result<C, CodecError>
where
    R: BinarySource + ?Sized,
    E: ElementCodec,
    C: Extend<E::Item>,
{
    let count = read_len(src)?;
    let mut out = make(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let item = codec.read_item(src)?;
        out.extend(std::iter::once(item));
    }
    Ok(out)
}

/// Reads into a `Vec`, keeping wire order and duplicates.
pub fn read_list<R, E>(src: &mut R, codec: &E) -> Result<Vec<E::Item>, CodecError>
where
    R: BinarySource + ?Sized,
    E: ElementCodec,
{
    read_into(src, codec, Vec::with_capacity)
}

/// Same as [`read_list`] but into a structure with cheap head and tail insertion.
pub fn read_deque<R, E>(src: &mut R, codec: &E) -> Result<VecDeque<E::Item>, CodecError>
where
    R: BinarySource + ?Sized,
    E: ElementCodec,
{
    read_into(src, codec, VecDeque::with_capacity)
}

/// Reads into a `HashSet`; duplicates on the wire collapse.
pub fn read_set<R, E>(src: &mut R, codec: &E) -> Result<HashSet<E::Item>, CodecError>
where
    R: BinarySource + ?Sized,
    E: ElementCodec,
    E::Item: Eq + Hash,
{
    read_into(src, codec, HashSet::with_capacity)
}
