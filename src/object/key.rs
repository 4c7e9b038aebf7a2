// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Attribute lists of the key kinds

use crate::attribute::Attribute;
use crate::object::factory::{add_common_storage_attrs, OAFlags, ObjectAttr};
use crate::pkcs11::*;

use super::attr_element;

fn add_common_key_attrs(attrs: &mut Vec<ObjectAttr>, private: bool) {
    add_common_storage_attrs(attrs, private);
    attrs.push(attr_element!(CKA_KEY_TYPE; OAFlags::Discriminator));
    attrs.push(attr_element!(CKA_ID; OAFlags::empty()));
    attrs.push(attr_element!(CKA_START_DATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_END_DATE; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_DERIVE; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(CKA_LOCAL; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_KEY_GEN_MECHANISM; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_ALLOWED_MECHANISMS; OAFlags::empty()));
}

/// Public keys
pub fn add_common_public_key_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_key_attrs(attrs, false);
    attrs.push(attr_element!(CKA_SUBJECT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ENCRYPT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VERIFY; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VERIFY_RECOVER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_WRAP; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_TRUSTED; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(CKA_WRAP_TEMPLATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PUBLIC_KEY_INFO; OAFlags::empty()));
}

/// Private keys
pub fn add_common_private_key_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_key_attrs(attrs, true);
    attrs.push(attr_element!(CKA_SUBJECT; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_SENSITIVE; OAFlags::empty(); Attribute::from_bool; val true));
    attrs.push(attr_element!(CKA_DECRYPT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SIGN; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SIGN_RECOVER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_UNWRAP; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_EXTRACTABLE; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(CKA_ALWAYS_SENSITIVE; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_NEVER_EXTRACTABLE; OAFlags::NeverSettable));
    attrs.push(attr_element!(
        CKA_WRAP_WITH_TRUSTED; OAFlags::empty(); Attribute::from_bool;
        val false));
    attrs.push(attr_element!(CKA_UNWRAP_TEMPLATE; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_ALWAYS_AUTHENTICATE; OAFlags::empty(); Attribute::from_bool;
        val false));
    attrs.push(attr_element!(CKA_PUBLIC_KEY_INFO; OAFlags::empty()));
    attrs.push(attr_element!(CKA_DERIVE_TEMPLATE; OAFlags::empty()));
}

/// Secret keys
pub fn add_common_secret_key_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_key_attrs(attrs, true);
    attrs.push(attr_element!(
        CKA_SENSITIVE; OAFlags::empty(); Attribute::from_bool; val true));
    attrs.push(attr_element!(CKA_ENCRYPT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_DECRYPT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SIGN; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VERIFY; OAFlags::empty()));
    attrs.push(attr_element!(CKA_WRAP; OAFlags::empty()));
    attrs.push(attr_element!(CKA_UNWRAP; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_EXTRACTABLE; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(CKA_ALWAYS_SENSITIVE; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_NEVER_EXTRACTABLE; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_CHECK_VALUE; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_WRAP_WITH_TRUSTED; OAFlags::empty(); Attribute::from_bool;
        val false));
    attrs.push(attr_element!(
        CKA_TRUSTED; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(CKA_WRAP_TEMPLATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_UNWRAP_TEMPLATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_DERIVE_TEMPLATE; OAFlags::empty()));
}

pub fn add_rsa_public_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_public_key_attrs(attrs);
    attrs.push(attr_element!(CKA_MODULUS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_MODULUS_BITS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PUBLIC_EXPONENT; OAFlags::empty()));
}

pub fn add_rsa_private_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_private_key_attrs(attrs);
    attrs.push(attr_element!(CKA_MODULUS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PUBLIC_EXPONENT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PRIVATE_EXPONENT; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_PRIME_1; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_PRIME_2; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_EXPONENT_1; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_EXPONENT_2; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_COEFFICIENT; OAFlags::Sensitive));
}

/// Keys over a prime, subprime and base domain (DSA, KEA, X9.42 DH
/// public keys)
pub fn add_pqg_public_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_public_key_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

pub fn add_pqg_private_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_private_key_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
}

pub fn add_ec_public_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_public_key_attrs(attrs);
    attrs.push(attr_element!(CKA_EC_PARAMS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_EC_POINT; OAFlags::empty()));
}

pub fn add_ec_private_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_private_key_attrs(attrs);
    attrs.push(attr_element!(CKA_EC_PARAMS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
}

pub fn add_dh_public_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_public_key_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

pub fn add_dh_private_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_private_key_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_VALUE_BITS; OAFlags::empty()));
}

pub fn add_x942_dh_private_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_private_key_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
}

/// Secret keys with a variable length value
pub fn add_variable_secret_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_secret_key_attrs(attrs);
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
    attrs.push(attr_element!(CKA_VALUE_LEN; OAFlags::empty()));
}

/// Secret keys with a fixed length value (the DES family)
pub fn add_fixed_secret_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_secret_key_attrs(attrs);
    attrs.push(attr_element!(CKA_VALUE; OAFlags::Sensitive));
}
