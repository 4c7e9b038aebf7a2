// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Helpers for the vendor defined ranges of PKCS#11 codes

use crate::pkcs11::*;

/// The bit that marks a code as vendor defined
///
/// It is the same value for attribute types, object classes, key types,
/// certificate types, hardware feature types and mechanisms.
pub const VENDOR_DEFINED_BIT: CK_ULONG = CKA_VENDOR_DEFINED;

/// Returns true if the code falls in the vendor defined range
pub fn is_vendor_defined(code: CK_ULONG) -> bool {
    code & VENDOR_DEFINED_BIT == VENDOR_DEFINED_BIT
}

/// Formats an unknown code, marking vendor defined ones
pub fn unknown_code_name(code: CK_ULONG) -> String {
    if is_vendor_defined(code) {
        format!("VENDOR_DEFINED [0x{:08X}]", code)
    } else {
        format!("[0x{:08X}]", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_bit() {
        assert!(is_vendor_defined(CKK_VENDOR_DEFINED | 0x41));
        assert!(!is_vendor_defined(CKK_EC));
        assert_eq!(unknown_code_name(0x55), "[0x00000055]");
        assert_eq!(
            unknown_code_name(CKC_VENDOR_DEFINED | 0x10),
            "VENDOR_DEFINED [0x80000010]"
        );
    }
}
