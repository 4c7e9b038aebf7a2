// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use super::*;

pub const SESSION: CK_SESSION_HANDLE = 1;

macro_rules! ret_or_panic {
    ($ret:expr) => {
        match $ret {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        }
    };
}

/// Adds a RSA private key with a sensitive private exponent
pub fn add_rsa_private_key(token: &MemoryToken) -> CK_OBJECT_HANDLE {
    let handle = ret_or_panic!(token.add_object(vec![
        RawAttr::from_ulong(CKA_CLASS, CKO_PRIVATE_KEY),
        RawAttr::from_ulong(CKA_KEY_TYPE, CKK_RSA),
        RawAttr::from_bool(CKA_TOKEN, true),
        RawAttr::from_bool(CKA_PRIVATE, true),
        RawAttr::from_bytes(CKA_LABEL, b"Test RSA Key".to_vec()),
        RawAttr::from_bytes(CKA_ID, vec![0xAA, 0x55]),
        RawAttr::from_bool(CKA_SENSITIVE, true),
        RawAttr::from_bool(CKA_SIGN, true),
        RawAttr::from_bytes(CKA_MODULUS, vec![0x01, 0x02, 0x03]),
        RawAttr::from_bytes(CKA_PUBLIC_EXPONENT, vec![0x01, 0x00, 0x01]),
        RawAttr::from_bytes(CKA_PRIVATE_EXPONENT, vec![0x09, 0x09, 0x09]),
    ]));
    ret_or_panic!(token.set_sensitive(handle, CKA_PRIVATE_EXPONENT));
    handle
}

/// Adds an object with just a class and a second level type
pub fn add_typed(
    token: &MemoryToken,
    class: CK_OBJECT_CLASS,
    subtype: Option<(CK_ATTRIBUTE_TYPE, CK_ULONG)>,
) -> CK_OBJECT_HANDLE {
    let mut attrs = vec![RawAttr::from_ulong(CKA_CLASS, class)];
    if let Some((t, v)) = subtype {
        attrs.push(RawAttr::from_ulong(t, v));
    }
    ret_or_panic!(token.add_object(attrs))
}

/// A representative value for each payload type, None for the
/// discriminators
pub fn sample_value(atype: AttrType) -> Option<AttrValue> {
    Some(match atype {
        AttrType::BoolType => AttrValue::Bool(true),
        AttrType::NumType | AttrType::MechanismType => AttrValue::Ulong(42),
        AttrType::BytesType | AttrType::OpaqueType => {
            AttrValue::Bytes(vec![0x01, 0x02, 0x03])
        }
        AttrType::StringType => AttrValue::String(String::from("sample")),
        AttrType::DateType => AttrValue::Date(CkDate {
            year: 2024,
            month: 1,
            day: 31,
        }),
        AttrType::MechanismArrayType => {
            AttrValue::UlongArray(vec![CKM_AES_CBC, CKM_SHA256])
        }
        AttrType::TemplateType => {
            let mut t = Object::new_generic_template();
            ret_or_panic!(t.put_attr(CKA_TOKEN, AttrValue::Bool(true)));
            ret_or_panic!(
                t.put_attr(CKA_LABEL, AttrValue::String(String::from("in")))
            );
            AttrValue::Template(Box::new(t))
        }
        AttrType::ClassType
        | AttrType::KeyType
        | AttrType::CertType
        | AttrType::HwFeatureType => return None,
    })
}

/// Clears the process wide dispatch hooks on creation and when dropped
pub struct HookGuard;

impl HookGuard {
    pub fn new() -> HookGuard {
        set_vendor_builder(None);
        set_code_converter(None);
        HookGuard
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        set_vendor_builder(None);
        set_code_converter(None);
    }
}
