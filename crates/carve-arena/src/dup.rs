//! Copy-into-arena helpers built on [`Arena::allocate`].

#![allow(unsafe_code)]
#![allow(clippy::mut_from_ref)]

use std::ffi::CStr;
use std::str;

use crate::arena::Arena;
use crate::error::ArenaError;

impl<'a> Arena<'a> {
    /// Allocate `src.len()` bytes and copy `src` into them.
    pub fn duplicate_bytes(&self, src: &[u8]) -> Result<&mut [u8], ArenaError> {
        let dst = self.allocate(src.len())?;
        dst.copy_from_slice(src);
        Ok(dst)
    }

    /// Copy a string slice into the arena. No terminator is added.
    pub fn duplicate_str(&self, src: &str) -> Result<&mut str, ArenaError> {
        let dst = self.duplicate_bytes(src.as_bytes())?;
        // SAFETY: the bytes are a verbatim copy of a `str`.
        Ok(unsafe { str::from_utf8_unchecked_mut(dst) })
    }

    /// Copy a C string, terminator included (`len + 1` bytes).
    pub fn duplicate_c_str(&self, src: &CStr) -> Result<&CStr, ArenaError> {
        let dst = self.duplicate_bytes(src.to_bytes_with_nul())?;
        // SAFETY: verbatim copy of a NUL-terminated string with no
        // interior NUL.
        Ok(unsafe { CStr::from_bytes_with_nul_unchecked(dst) })
    }

    /// Copy at most `max_size` bytes of `src`, stopping early at the first
    /// NUL, and terminate the copy.
    ///
    /// Always allocates `len + 1` bytes where `len` is the number of bytes
    /// copied, so the result is terminated even when `src` was cut short.
    pub fn duplicate_c_str_bounded(&self, src: &[u8], max_size: usize) -> Result<&CStr, ArenaError> {
        let window = &src[..src.len().min(max_size)];
        let len = window.iter().position(|&b| b == 0).unwrap_or(window.len());
        let dst = self.allocate(len + 1)?;
        dst[..len].copy_from_slice(&window[..len]);
        dst[len] = 0;
        // SAFETY: `dst[..len]` holds no NUL and `dst[len]` is the terminator.
        Ok(unsafe { CStr::from_bytes_with_nul_unchecked(dst) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carve_test_utils::AlignedBlock;

    #[test]
    fn duplicate_bytes_copies() {
        let mut block = AlignedBlock::<64>::filled(0xAB);
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(copy, &[1, 2, 3]);
        assert_eq!(arena.used(), 3);
    }

    #[test]
    fn duplicate_bytes_propagates_oom() {
        let mut block = AlignedBlock::<8>::new();
        let arena = Arena::new(block.as_mut_slice());
        let err = arena.duplicate_bytes(&[0; 9]).unwrap_err();
        assert!(err.is_out_of_memory());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn duplicate_str_is_mutable_copy() {
        let mut block = AlignedBlock::<64>::new();
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_str("hello").unwrap();
        copy.make_ascii_uppercase();
        assert_eq!(copy, "HELLO");
    }

    #[test]
    fn duplicate_c_str_includes_terminator() {
        let mut block = AlignedBlock::<64>::filled(0xFF);
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_c_str(c"arena").unwrap();
        assert_eq!(copy, c"arena");
        assert_eq!(copy.to_bytes_with_nul(), b"arena\0");
        assert_eq!(arena.used(), 6);
    }

    #[test]
    fn bounded_copy_truncates_and_terminates() {
        let mut block = AlignedBlock::<64>::filled(0xFF);
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_c_str_bounded(b"truncate me", 8).unwrap();
        assert_eq!(copy.to_bytes(), b"truncate");
        assert_eq!(arena.used(), 9);
    }

    #[test]
    fn bounded_copy_stops_at_nul() {
        let mut block = AlignedBlock::<64>::new();
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_c_str_bounded(b"ab\0cd", 10).unwrap();
        assert_eq!(copy.to_bytes(), b"ab");
        assert_eq!(arena.used(), 3);
    }

    #[test]
    fn bounded_copy_of_nothing_is_empty_string() {
        let mut block = AlignedBlock::<16>::new();
        let arena = Arena::new(block.as_mut_slice());
        let copy = arena.duplicate_c_str_bounded(b"anything", 0).unwrap();
        assert!(copy.is_empty());
        assert_eq!(arena.used(), 1);
    }
}
