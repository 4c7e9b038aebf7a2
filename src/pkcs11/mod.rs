// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! PKCS#11 ABI types and constants
//!
//! The bulk of the definitions come from the `cryptoki-sys` bindings, a
//! few PKCS#11 3.0 additions are pinned here so that the object model
//! does not depend on which header revision the bindings were
//! generated from.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(dead_code)]

pub use cryptoki_sys::*;

pub mod vendor;

pub const CK_INVALID_HANDLE: CK_ULONG = 0;

/* PKCS#11 3.0 object classes and attributes */
pub const CKO_PROFILE: CK_OBJECT_CLASS = 0x00000009;
pub const CKA_UNIQUE_ID: CK_ATTRIBUTE_TYPE = 0x00000004;
pub const CKA_PROFILE_ID: CK_ATTRIBUTE_TYPE = 0x00000601;
pub const CKA_DERIVE_TEMPLATE: CK_ATTRIBUTE_TYPE =
    CKF_ARRAY_ATTRIBUTE | 0x00000213;

/* default values of certificate attributes */
pub const CK_CERTIFICATE_CATEGORY_UNSPECIFIED: CK_ULONG = 0;
pub const CK_SECURITY_DOMAIN_UNSPECIFIED: CK_ULONG = 0;

/* Size of the native CK_ULONG encoding used in attribute values */
pub const CK_ULONG_SIZE: usize = std::mem::size_of::<CK_ULONG>();
