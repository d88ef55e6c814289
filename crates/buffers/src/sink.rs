//! The sink/source seams every codec in the workspace is written against.

use crate::BufferError;

/// Bytes pulled per step by the default [`BinarySource::take_vec`], so a bogus
/// length prefix cannot force a large up-front allocation.
const TAKE_CHUNK: usize = 4096;

/// Append-only binary sink.
///
/// Multi-byte numbers are always written big-endian.
pub trait BinarySink {
    /// Appends a single byte.
    fn put_u8(&mut self, byte: u8);

    /// Appends a run of bytes.
    fn put_slice(&mut self, bytes: &[u8]);

    fn put_i8(&mut self, val: i8) {
        self.put_u8(val as u8);
    }

    fn put_f32(&mut self, val: f32) {
        self.put_slice(&val.to_be_bytes());
    }

    fn put_f64(&mut self, val: f64) {
        self.put_slice(&val.to_be_bytes());
    }
}

/// Forward-only binary source with a single read position and no seek.
pub trait BinarySource {
    /// Pulls the next byte.
    fn take_u8(&mut self) -> Result<u8, BufferError>;

    /// Fills `out` completely or fails without a usable partial result.
    fn take_exact(&mut self, out: &mut [u8]) -> Result<(), BufferError>;

    fn take_i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.take_u8()? as i8)
    }

    /// Pulls `len` bytes into a fresh vector.
    fn take_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        let mut out = Vec::with_capacity(len.min(TAKE_CHUNK));
        let mut chunk = [0u8; TAKE_CHUNK];
        let mut left = len;
        while left > 0 {
            let n = left.min(TAKE_CHUNK);
            self.take_exact(&mut chunk[..n])?;
            out.extend_from_slice(&chunk[..n]);
            left -= n;
        }
        Ok(out)
    }

    fn take_f32(&mut self) -> Result<f32, BufferError> {
        let mut bytes = [0u8; 4];
        self.take_exact(&mut bytes)?;
        Ok(f32::from_be_bytes(bytes))
    }

    fn take_f64(&mut self) -> Result<f64, BufferError> {
        let mut bytes = [0u8; 8];
        self.take_exact(&mut bytes)?;
        Ok(f64::from_be_bytes(bytes))
    }
}

impl BinarySink for Vec<u8> {
    #[inline]
    fn put_u8(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: BinarySink + ?Sized> BinarySink for &mut S {
    #[inline]
    fn put_u8(&mut self, byte: u8) {
        (**self).put_u8(byte);
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        (**self).put_slice(bytes);
    }
}

impl<S: BinarySource + ?Sized> BinarySource for &mut S {
    #[inline]
    fn take_u8(&mut self) -> Result<u8, BufferError> {
        (**self).take_u8()
    }

    #[inline]
    fn take_exact(&mut self, out: &mut [u8]) -> Result<(), BufferError> {
        (**self).take_exact(out)
    }

    fn take_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        (**self).take_vec(len)
    }
}
