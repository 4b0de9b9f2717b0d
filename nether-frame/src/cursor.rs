//! Bounds-tracked binary cursor
//!
//! A [`ByteCursor`] is a read/write position over a fixed-size window of a
//! byte buffer. Every primitive accessor advances the position by exactly its
//! wire width, and nothing is ever read or written past the window's end.
//!
//! All multi-byte integers are big-endian.
//!
//! The same type serves both directions: reading needs `B: AsRef<[u8]>`,
//! writing additionally needs `B: AsMut<[u8]>`. Decoding usually borrows
//! (`ByteCursor<&[u8]>`), encoding owns (`ByteCursor<Vec<u8>>`).

use byteorder::{BigEndian, ByteOrder};

use crate::error::{FrameError, Result};
use crate::text::TextCodec;
use crate::MAX_BYTES_LEN;

/// Read/write cursor over a fixed-length byte window
#[derive(Debug, Clone)]
pub struct ByteCursor<B> {
    buf: B,
    /// Absolute start of the window inside `buf`
    start: usize,
    /// Window length, fixed at construction
    len: usize,
    /// Position relative to `start`
    offset: usize,
}

impl ByteCursor<Vec<u8>> {
    /// Allocate a zeroed buffer of exactly `len` bytes and wrap it
    pub fn with_len(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    /// Consume the cursor and return the bytes written so far
    ///
    /// When the window covers the whole buffer and every byte has been
    /// written, the buffer is returned as-is without copying.
    pub fn into_bytes(self) -> Vec<u8> {
        if self.start == 0 && self.offset == self.buf.len() {
            return self.buf;
        }
        self.buf[self.start..self.start + self.offset].to_vec()
    }
}

impl<B: AsRef<[u8]>> ByteCursor<B> {
    /// Wrap a whole buffer, positioned at offset 0
    pub fn new(buf: B) -> Self {
        let len = buf.as_ref().len();
        Self {
            buf,
            start: 0,
            len,
            offset: 0,
        }
    }

    /// Wrap `len` bytes of `buf` starting at absolute offset `start`
    pub fn window(buf: B, start: usize, len: usize) -> Result<Self> {
        let buf_len = buf.as_ref().len();
        let fits = start.checked_add(len).is_some_and(|end| end <= buf_len);
        if !fits {
            return Err(FrameError::OutOfBounds {
                needed: len,
                remaining: buf_len.saturating_sub(start),
            });
        }
        Ok(Self {
            buf,
            start,
            len,
            offset: 0,
        })
    }

    /// Rewind to offset 0 without touching the buffer
    #[inline]
    pub fn reset(&mut self) -> &mut Self {
        self.offset = 0;
        self
    }

    /// Current position relative to the window start
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Fixed window length
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length window
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the position and the end of the window
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len - self.offset
    }

    /// True exactly when the position has reached the end of the window
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.offset == self.len
    }

    /// View of the bytes between the window start and the current position
    pub fn written(&self) -> &[u8] {
        &self.buf.as_ref()[self.start..self.start + self.offset]
    }

    /// Consume the cursor and return the backing buffer
    pub fn into_inner(self) -> B {
        self.buf
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if n > self.remaining() {
            return Err(FrameError::OutOfBounds {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let at = self.start + self.offset;
        self.offset += n;
        Ok(&self.buf.as_ref()[at..at + n])
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian u16
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Read a big-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Read a big-endian u64
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    /// Read one byte as a flag; only `1` is true, any other byte is false
    pub fn read_flag(&mut self) -> Result<bool> {
        Ok(self.read_u8()? == 1)
    }

    /// Read a one-byte length followed by that many bytes
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&[u8]> {
        let len = self.read_u8()? as usize;
        if len == 0 {
            return Ok(&[]);
        }
        if len > self.remaining() {
            return Err(FrameError::LengthPrefixMismatch {
                expected: len,
                remaining: self.remaining(),
            });
        }
        self.take(len)
    }

    /// Read a length-prefixed text value through `codec`
    pub fn read_text<C: TextCodec + ?Sized>(&mut self, codec: &C) -> Result<String> {
        let bytes = self.read_length_prefixed_bytes()?;
        codec.decode(bytes)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteCursor<B> {
    fn take_mut(&mut self, n: usize) -> Result<&mut [u8]> {
        if n > self.remaining() {
            return Err(FrameError::OutOfBounds {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let at = self.start + self.offset;
        self.offset += n;
        Ok(&mut self.buf.as_mut()[at..at + n])
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> Result<&mut Self> {
        self.take_mut(1)?[0] = value;
        Ok(self)
    }

    /// Write a big-endian u16
    pub fn write_u16(&mut self, value: u16) -> Result<&mut Self> {
        BigEndian::write_u16(self.take_mut(2)?, value);
        Ok(self)
    }

    /// Write a big-endian u32
    pub fn write_u32(&mut self, value: u32) -> Result<&mut Self> {
        BigEndian::write_u32(self.take_mut(4)?, value);
        Ok(self)
    }

    /// Write a big-endian u64
    pub fn write_u64(&mut self, value: u64) -> Result<&mut Self> {
        BigEndian::write_u64(self.take_mut(8)?, value);
        Ok(self)
    }

    /// Write a flag as `1` or `0`
    pub fn write_flag(&mut self, value: bool) -> Result<&mut Self> {
        self.write_u8(u8::from(value))
    }

    /// Write a one-byte length followed by `bytes`
    ///
    /// Fails without writing anything if `bytes` is longer than 255 or does
    /// not fit in the remaining window.
    pub fn write_length_prefixed_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        if bytes.len() > MAX_BYTES_LEN {
            return Err(FrameError::BytesTooLong { len: bytes.len() });
        }
        let dst = self.take_mut(1 + bytes.len())?;
        dst[0] = bytes.len() as u8;
        dst[1..].copy_from_slice(bytes);
        Ok(self)
    }

    /// Write a text value through `codec` as length-prefixed bytes
    pub fn write_text<C: TextCodec + ?Sized>(&mut self, text: &str, codec: &C) -> Result<&mut Self> {
        let encoded = codec.encode(text);
        self.write_length_prefixed_bytes(&encoded)
    }
}
