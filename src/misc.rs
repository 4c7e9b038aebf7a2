// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

/* misc utilities that do not really belong in any module */

use crate::error::Result;
use crate::pkcs11::*;

#[macro_export]
macro_rules! void_ptr {
    ($ptr:expr) => {
        $ptr as *const _ as CK_VOID_PTR
    };
}

/// Copies `len` bytes from a C buffer, a NULL pointer yields an empty vector
///
/// # Safety
///
/// `ptr` must be NULL or point to at least `len` readable bytes.
pub unsafe fn bytes_to_vec(ptr: CK_VOID_PTR, len: CK_ULONG) -> Result<Vec<u8>> {
    let size = usize::try_from(len)?;
    if ptr.is_null() || size == 0 {
        return Ok(Vec::new());
    }
    Ok(std::slice::from_raw_parts(ptr as *const u8, size).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_c_buffer() {
        let src = [1u8, 2, 3];
        let v = unsafe { bytes_to_vec(void_ptr!(src.as_ptr()), 3) }.unwrap();
        assert_eq!(v, vec![1, 2, 3]);
        let e = unsafe { bytes_to_vec(std::ptr::null_mut(), 3) }.unwrap();
        assert!(e.is_empty());
    }
}
