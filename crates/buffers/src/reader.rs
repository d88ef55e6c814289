//! Cursor-tracking binary source over a borrowed byte slice.

use std::str;

use crate::{BinarySource, BufferError};

/// A binary buffer reader that reads data from a byte slice.
///
/// Every read is bounds-checked; running past the end yields
/// [`BufferError::EndOfBuffer`] and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use datameta_buffers::{BinarySource, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.take_u8(), Ok(0x01));
/// assert_eq!(reader.try_buf(2), Ok(&[0x02, 0x03][..]));
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of unread bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..self.x])
    }

    /// Reads a UTF-8 string of `size` bytes.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let text = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.x += size;
        Ok(text)
    }
}

impl BinarySource for Reader<'_> {
    #[inline]
    fn take_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    fn take_exact(&mut self, out: &mut [u8]) -> Result<(), BufferError> {
        out.copy_from_slice(self.try_buf(out.len())?);
        Ok(())
    }

    fn take_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        Ok(self.try_buf(len)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinarySink, Writer};

    #[test]
    fn test_f64_roundtrip_through_writer() {
        let mut writer = Writer::new();
        writer.put_f64(std::f64::consts::PI);
        writer.put_f32(1.5);
        let data = writer.flush();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.take_f64(), Ok(std::f64::consts::PI));
        assert_eq!(reader.take_f32(), Ok(1.5));
        assert_eq!(reader.size(), 0);
    }

    #[test]
    fn test_take_u8_end_of_buffer() {
        let data: [u8; 0] = [];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.take_u8(), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.try_peek(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_take_vec_end_of_buffer_keeps_cursor() {
        let data = [1u8, 2];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.take_vec(5), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 0);
        assert_eq!(reader.take_vec(2), Ok(vec![1, 2]));
    }

    #[test]
    fn test_take_f64_end_of_buffer() {
        let data = [0u8; 7];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.take_f64(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_try_utf8_invalid() {
        let data = [0xffu8, 0xfe];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_utf8(2), Err(BufferError::InvalidUtf8));
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn test_try_utf8_success() {
        let data = "café".as_bytes();
        let mut reader = Reader::new(data);
        assert_eq!(reader.try_utf8(data.len()), Ok("café"));
    }
}
