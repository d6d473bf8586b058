// ABOUTME: Bounds-checked reader and writer for SSH length-prefixed frames.
// ABOUTME: Frames are a big-endian u32 length followed by that many bytes.

use crate::error::{HwsshError, Result};

/// Read cursor over an immutable byte buffer.
///
/// Every read checks bounds and returns `HwsshError::Truncated` instead of
/// panicking on short input.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(HwsshError::Truncated {
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume `n` bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a length-prefixed frame.
    pub fn read_frame(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Read a length-prefixed frame holding UTF-8 text.
    pub fn read_string(&mut self, field: &'static str) -> Result<&'a str> {
        let bytes = self.read_frame()?;
        std::str::from_utf8(bytes).map_err(|_| HwsshError::InvalidString { field })
    }

    /// Assert the input is fully consumed.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(HwsshError::TrailingBytes(n)),
        }
    }
}

/// Append `data` as a length-prefixed frame.
pub fn put_frame(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

/// Append an unsigned big-endian integer as an SSH mpint.
///
/// Leading zeros are stripped and a zero byte is prepended when the top bit
/// would otherwise mark the value negative.
pub fn put_mpint(out: &mut Vec<u8>, magnitude: &[u8]) {
    let start = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let digits = &magnitude[start..];
    let pad = digits.first().is_some_and(|&b| b & 0x80 != 0);

    let len = digits.len() + usize::from(pad);
    out.extend_from_slice(&(len as u32).to_be_bytes());
    if pad {
        out.push(0);
    }
    out.extend_from_slice(digits);
}
