// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Attribute lists of the hardware feature kinds

use crate::object::factory::{add_common_object_attrs, OAFlags, ObjectAttr};
use crate::pkcs11::*;

use super::attr_element;

pub fn add_common_hw_feature_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_object_attrs(attrs);
    attrs.push(attr_element!(CKA_HW_FEATURE_TYPE; OAFlags::Discriminator));
}

pub fn add_counter_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_hw_feature_attrs(attrs);
    attrs.push(attr_element!(CKA_RESET_ON_INIT; OAFlags::empty()));
    attrs.push(attr_element!(CKA_HAS_RESET; OAFlags::NeverSettable));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

pub fn add_clock_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_hw_feature_attrs(attrs);
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

pub fn add_user_interface_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_hw_feature_attrs(attrs);
    attrs.push(attr_element!(CKA_PIXEL_X; OAFlags::empty()));
    attrs.push(attr_element!(CKA_PIXEL_Y; OAFlags::empty()));
    attrs.push(attr_element!(CKA_RESOLUTION; OAFlags::empty()));
    attrs.push(attr_element!(CKA_CHAR_ROWS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_CHAR_COLUMNS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_COLOR; OAFlags::empty()));
    attrs.push(attr_element!(CKA_BITS_PER_PIXEL; OAFlags::empty()));
    attrs.push(attr_element!(CKA_CHAR_SETS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_ENCODING_METHODS; OAFlags::empty()));
    attrs.push(attr_element!(CKA_MIME_TYPES; OAFlags::empty()));
}
