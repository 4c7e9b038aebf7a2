// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Attribute lists of the certificate kinds

use crate::attribute::Attribute;
use crate::object::factory::{add_common_storage_attrs, OAFlags, ObjectAttr};
use crate::pkcs11::*;

use super::attr_element;

pub fn add_common_certificate_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_storage_attrs(attrs, false);
    attrs.push(attr_element!(CKA_CERTIFICATE_TYPE; OAFlags::Discriminator));
    attrs.push(attr_element!(
        CKA_TRUSTED; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(
        CKA_CERTIFICATE_CATEGORY; OAFlags::empty(); Attribute::from_ulong;
        val CK_CERTIFICATE_CATEGORY_UNSPECIFIED));
    attrs.push(attr_element!(CKA_CHECK_VALUE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_START_DATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_END_DATE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PUBLIC_KEY_INFO; OAFlags::empty()));
}

pub fn add_x509_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_certificate_attrs(attrs);
    attrs.push(attr_element!(CKA_SUBJECT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ID; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ISSUER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SERIAL_NUMBER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_URL; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_HASH_OF_SUBJECT_PUBLIC_KEY; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_HASH_OF_ISSUER_PUBLIC_KEY; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_JAVA_MIDP_SECURITY_DOMAIN; OAFlags::empty(); Attribute::from_ulong;
        val CK_SECURITY_DOMAIN_UNSPECIFIED));
    attrs.push(attr_element!(
        CKA_NAME_HASH_ALGORITHM; OAFlags::empty(); Attribute::from_ulong;
        val CKM_SHA_1));
}

pub fn add_x509_attr_cert_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_certificate_attrs(attrs);
    attrs.push(attr_element!(CKA_OWNER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_AC_ISSUER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_SERIAL_NUMBER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ATTR_TYPES; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

pub fn add_wtls_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_certificate_attrs(attrs);
    attrs.push(attr_element!(CKA_SUBJECT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ISSUER; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
    attrs.push(attr_element!(CKA_URL; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_HASH_OF_SUBJECT_PUBLIC_KEY; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_HASH_OF_ISSUER_PUBLIC_KEY; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_NAME_HASH_ALGORITHM; OAFlags::empty(); Attribute::from_ulong;
        val CKM_SHA_1));
}
