//! The bounded copy primitive between caller and device memory.
//!
//! The device never touches caller memory directly. Writes pull bytes through
//! a [`CopySource`], reads push the record through a [`CopySink`]. Either may
//! fail with a native error code, which the device reports unchanged.
//!
//! [`Grant`] is the in-process implementation: a window of caller memory
//! backed by a `BytesMut`, with out-of-bounds access reported as
//! [`CopyError::EFAULT`].

use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// Failure of the copy primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("copy failed with code {code}")]
pub struct CopyError {
    /// Native error code.
    pub code: i32,
}

impl CopyError {
    /// Bad address: the copy fell outside the granted window.
    pub const EFAULT: Self = Self { code: 14 };

    /// Build an error from a native code.
    pub const fn new(code: i32) -> Self {
        Self { code }
    }
}

/// Caller memory the device may copy from.
pub trait CopySource {
    /// Fill `dst` with the bytes starting at `offset` in the caller's window.
    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyError>;
}

/// Caller memory the device may copy into.
pub trait CopySink {
    /// Write `src` at `offset` in the caller's window.
    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyError>;
}

/// A window of caller memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    buf: BytesMut,
}

impl Grant {
    /// Grant access to a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(data),
        }
    }

    /// Grant `len` zeroed bytes, typically as a read destination.
    pub fn zeroed(len: usize) -> Self {
        Self {
            buf: BytesMut::zeroed(len),
        }
    }

    /// Size of the window.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current contents of the window.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Give the window back to the caller.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    fn window(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>, CopyError> {
        let end = offset.checked_add(len).ok_or(CopyError::EFAULT)?;
        if end > self.buf.len() {
            return Err(CopyError::EFAULT);
        }
        Ok(offset..end)
    }
}

impl From<Bytes> for Grant {
    fn from(data: Bytes) -> Self {
        Self {
            buf: BytesMut::from(&data[..]),
        }
    }
}

impl CopySource for Grant {
    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyError> {
        let range = self.window(offset, dst.len())?;
        dst.copy_from_slice(&self.buf[range]);
        Ok(())
    }
}

impl CopySink for Grant {
    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyError> {
        let range = self.window(offset, src.len())?;
        self.buf[range].copy_from_slice(src);
        Ok(())
    }
}

impl CopySource for [u8] {
    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyError> {
        let end = offset.checked_add(dst.len()).ok_or(CopyError::EFAULT)?;
        let src = self.get(offset..end).ok_or(CopyError::EFAULT)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopySink for Vec<u8> {
    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyError> {
        let end = offset.checked_add(src.len()).ok_or(CopyError::EFAULT)?;
        let dst = self.get_mut(offset..end).ok_or(CopyError::EFAULT)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_copy_from() {
        let grant = Grant::from_bytes(b"abcdef");
        let mut dst = [0u8; 3];
        grant.copy_from(2, &mut dst).unwrap();
        assert_eq!(&dst, b"cde");
    }

    #[test]
    fn test_grant_copy_from_out_of_bounds() {
        let grant = Grant::from_bytes(b"abc");
        let mut dst = [0u8; 4];
        assert_eq!(grant.copy_from(0, &mut dst), Err(CopyError::EFAULT));
        assert_eq!(grant.copy_from(usize::MAX, &mut dst), Err(CopyError::EFAULT));
    }

    #[test]
    fn test_grant_copy_to() {
        let mut grant = Grant::zeroed(8);
        grant.copy_to(4, b"abcd").unwrap();
        assert_eq!(grant.as_slice(), b"\0\0\0\0abcd");
        assert_eq!(grant.copy_to(5, b"abcd"), Err(CopyError::EFAULT));
        assert_eq!(grant.into_bytes(), Bytes::from_static(b"\0\0\0\0abcd"));
    }

    #[test]
    fn test_slice_and_vec_impls() {
        let src: &[u8] = b"xyz";
        let mut dst = [0u8; 2];
        src.copy_from(1, &mut dst).unwrap();
        assert_eq!(&dst, b"yz");

        let mut sink = vec![0u8; 2];
        assert_eq!(sink.copy_to(1, b"ab"), Err(CopyError::EFAULT));
        sink.copy_to(0, b"ab").unwrap();
        assert_eq!(sink, b"ab");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(CopyError::new(14).to_string(), "copy failed with code 14");
    }
}
