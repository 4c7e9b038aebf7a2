// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Attribute lists of the domain parameters kinds

use crate::object::factory::{add_common_storage_attrs, OAFlags, ObjectAttr};
use crate::pkcs11::*;

use super::attr_element;

pub fn add_common_params_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_storage_attrs(attrs, false);
    attrs.push(attr_element!(CKA_KEY_TYPE; OAFlags::Discriminator));
    attrs.push(attr_element!(CKA_LOCAL; OAFlags::NeverSettable));
}

pub fn add_dsa_params_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_params_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PRIME_BITS; OAFlags::empty()));
}

pub fn add_dh_params_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_params_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PRIME_BITS; OAFlags::empty()));
}

pub fn add_x942_dh_params_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_params_attrs(attrs);
    attrs.push(attr_element!(CKA_PRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BASE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PRIME_BITS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SUBPRIME_BITS; OAFlags::empty()));
}

pub fn add_ec_params_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_params_attrs(attrs);
    attrs.push(attr_element!(CKA_EC_PARAMS; OAFlags::empty()));
}
