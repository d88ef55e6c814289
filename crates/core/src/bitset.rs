//! Presence tracking for optional fields and enum sets.
//!
//! A [`PresenceBitSet`] is a fixed-capacity bit vector. Word `k` of its image
//! holds bits `64k..64k+64`, bit `i` at position `i % 64`. The image handed
//! to the wire is trimmed to the words that cover the highest set bit.

use std::collections::HashSet;
use std::hash::Hash;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitSetError {
    #[error("bit index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
}

/// Number of 64-bit words needed to hold `bit_len` bits.
pub const fn long_array_len(bit_len: usize) -> usize {
    bit_len / 64 + if bit_len & 0x3f == 0 { 0 } else { 1 }
}

/// Fixed-capacity bit vector; not synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresenceBitSet {
    capacity: usize,
    words: Vec<u64>,
}

impl PresenceBitSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            words: vec![0; long_array_len(capacity)],
        }
    }

    /// Rebuilds a bitset from a (possibly trimmed) image.
    ///
    /// Fails if the image sets a bit at or beyond `capacity`.
    pub fn from_image(capacity: usize, image: &[u64]) -> Result<Self, BitSetError> {
        let mut set = Self::new(capacity);
        for (k, &word) in image.iter().enumerate() {
            if word == 0 {
                continue;
            }
            let highest = k * 64 + 63 - word.leading_zeros() as usize;
            if highest >= capacity {
                return Err(BitSetError::IndexOutOfRange {
                    index: highest,
                    capacity,
                });
            }
            set.words[k] = word;
        }
        Ok(set)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn check(&self, index: usize) -> Result<(), BitSetError> {
        if index >= self.capacity {
            return Err(BitSetError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn set(&mut self, index: usize) -> Result<(), BitSetError> {
        self.check(index)?;
        self.words[index / 64] |= 1u64 << (index % 64);
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<(), BitSetError> {
        self.check(index)?;
        self.words[index / 64] &= !(1u64 << (index % 64));
        Ok(())
    }

    /// Out-of-range indices read as absent.
    pub fn get(&self, index: usize) -> bool {
        index < self.capacity && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn highest_set_bit(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(k, &w)| k * 64 + 63 - w.leading_zeros() as usize)
    }

    /// Minimal image covering the highest set bit; empty when nothing is set.
    ///
    /// Recomputed on every call.
    pub fn trimmed_image(&self) -> Vec<u64> {
        match self.highest_set_bit() {
            Some(highest) => self.words[..long_array_len(highest + 1)].to_vec(),
            None => Vec::new(),
        }
    }

    /// Set indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.capacity).filter(move |&ix| self.get(ix))
    }
}

/// A [`PresenceBitSet`] paired with the ordered, immutable value domain it indexes.
///
/// Index `i` is present iff bit `i` is set; the capacity is the domain length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainBitSet<T: 'static> {
    bits: PresenceBitSet,
    domain: &'static [T],
}

impl<T: 'static> DomainBitSet<T> {
    pub fn new(domain: &'static [T]) -> Self {
        Self {
            bits: PresenceBitSet::new(domain.len()),
            domain,
        }
    }

    pub fn from_image(domain: &'static [T], image: &[u64]) -> Result<Self, BitSetError> {
        Ok(Self {
            bits: PresenceBitSet::from_image(domain.len(), image)?,
            domain,
        })
    }

    pub fn bits(&self) -> &PresenceBitSet {
        &self.bits
    }

    pub fn count(&self) -> usize {
        self.domain.len()
    }

    pub fn set(&mut self, index: usize) -> Result<(), BitSetError> {
        self.bits.set(index)
    }

    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index)
    }

    pub fn trimmed_image(&self) -> Vec<u64> {
        self.bits.trimmed_image()
    }

    /// Domain value at `index`, present or not.
    pub fn value(&self, index: usize) -> Result<&'static T, BitSetError> {
        self.domain
            .get(index)
            .ok_or(BitSetError::IndexOutOfRange {
                index,
                capacity: self.domain.len(),
            })
    }

    /// Present values in ascending index order.
    pub fn values(&self) -> Vec<&'static T> {
        let domain = self.domain;
        self.bits.iter().map(|ix| &domain[ix]).collect()
    }
}

impl<T: PartialEq + 'static> DomainBitSet<T> {
    /// Marks the first domain slot equal to `value` as present.
    pub fn set_value(&mut self, value: &T) -> Result<(), BitSetError> {
        match self.domain.iter().position(|v| v == value) {
            Some(ix) => self.bits.set(ix),
            None => Err(BitSetError::IndexOutOfRange {
                index: self.domain.len(),
                capacity: self.domain.len(),
            }),
        }
    }
}

impl<T: Eq + Hash + 'static> DomainBitSet<T> {
    /// Present values, unordered.
    pub fn value_set(&self) -> HashSet<&'static T> {
        let domain = self.domain;
        self.bits.iter().map(|ix| &domain[ix]).collect()
    }
}
