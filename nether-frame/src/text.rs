//! Text encoding for `Text` fields
//!
//! A frame holds one codec instance for its whole lifetime instead of building
//! an encoder/decoder per field.

use std::borrow::Cow;

use crate::error::Result;

/// Converts between `str` and the bytes stored after a length prefix
pub trait TextCodec {
    /// Encode text to wire bytes
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]>;

    /// Decode wire bytes to text
    fn decode(&self, bytes: &[u8]) -> Result<String>;

    /// Encoded byte length of `text`, used for size calculation
    fn encoded_len(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Strict UTF-8: invalid sequences are a format error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl TextCodec for Utf8 {
    #[inline]
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    #[inline]
    fn encoded_len(&self, text: &str) -> usize {
        text.len()
    }
}

/// UTF-8 that replaces invalid sequences with U+FFFD on decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LossyUtf8;

impl TextCodec for LossyUtf8 {
    #[inline]
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    #[inline]
    fn encoded_len(&self, text: &str) -> usize {
        text.len()
    }
}
