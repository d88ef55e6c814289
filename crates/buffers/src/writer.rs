//! Growable in-memory binary sink.

use crate::BinarySink;

/// Construction options for [`Writer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Allocation step used when the buffer needs to grow.
    pub alloc_size: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            alloc_size: 16 * 1024,
        }
    }
}

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use datameta_buffers::{BinarySink, Writer};
///
/// let mut writer = Writer::new();
/// writer.put_u8(0x01);
/// writer.put_slice(&[0x02, 0x03]);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a writer with the default 16KB allocation step.
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    pub fn with_options(options: WriterOptions) -> Self {
        let alloc_size = options.alloc_size.max(1);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Ensures the buffer has at least `capacity` bytes available past the cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining >= capacity {
            return;
        }
        let pending = self.x - self.x0;
        let required = pending + capacity;
        let new_size = if required <= self.alloc_size {
            self.alloc_size
        } else {
            required * 2
        };
        let mut grown = vec![0u8; new_size];
        grown[..pending].copy_from_slice(&self.uint8[self.x0..self.x]);
        self.uint8 = grown;
        self.x = pending;
        self.x0 = 0;
    }

    /// Returns the bytes written since the last flush and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Borrows the bytes written since the last flush without consuming them.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }
}

impl BinarySink for Writer {
    #[inline]
    fn put_u8(&mut self, byte: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = byte;
        self.x += 1;
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        let length = bytes.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(bytes);
        self.x += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.put_u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        writer.put_u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_grows_past_alloc_size() {
        let mut writer = Writer::with_options(WriterOptions { alloc_size: 4 });
        writer.put_slice(&[1, 2, 3]);
        writer.put_slice(&[4, 5, 6, 7, 8]);
        assert_eq!(writer.len(), 8);
        assert_eq!(writer.flush(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_grow_keeps_unflushed_tail_only() {
        let mut writer = Writer::with_options(WriterOptions { alloc_size: 2 });
        writer.put_u8(9);
        writer.flush();
        writer.put_slice(&[1, 2, 3]);
        assert_eq!(writer.as_slice(), [1, 2, 3]);
    }

    #[test]
    fn test_zero_alloc_size_is_clamped() {
        let mut writer = Writer::with_options(WriterOptions { alloc_size: 0 });
        writer.put_i8(-2);
        assert_eq!(writer.flush(), [0xfe]);
    }
}
