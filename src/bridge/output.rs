//! The fixed-size reply buffer handed across the C boundary.

use std::ffi::{c_char, CStr};

/// Capacity of the reply buffer in bytes, terminator included.
pub const OUTPUT_CAPACITY: usize = 8192;

/// A NUL-terminated reply of at most `OUTPUT_CAPACITY - 1` bytes.
///
/// Every write replaces the previous reply, so a pointer obtained from
/// [`OutputBuffer::as_ptr`] is valid only until the next write.
pub struct OutputBuffer {
    bytes: Box<[u8; OUTPUT_CAPACITY]>,
    len: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        OutputBuffer {
            bytes: Box::new([0; OUTPUT_CAPACITY]),
            len: 0,
        }
    }

    /// Copy `text` in, truncated to capacity - 1 bytes on a character
    /// boundary, and terminate it. Returns the stored text.
    pub fn set(&mut self, text: &str) -> &str {
        let mut len = text.len().min(OUTPUT_CAPACITY - 1);
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        // An interior NUL would end the C string early; stop there.
        if let Some(nul) = text.as_bytes()[..len].iter().position(|&b| b == 0) {
            len = nul;
        }
        self.bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        self.bytes[len] = 0;
        self.len = len;
        self.as_str()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_with_nul(&self.bytes[..=self.len]).unwrap_or_default()
    }

    #[must_use]
    pub fn as_ptr(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
