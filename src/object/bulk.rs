// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Reading attribute values from a token
//!
//! All the attributes of an object are first requested in a single
//! batched call. Tokens commonly fail the whole batch when a single
//! attribute is not available (unknown type, sensitive value), so any
//! batch failure falls back to one call per attribute, where a missing
//! attribute marks its cell not present and a sensitive one marks it
//! sensitive.

use crate::attribute::Attribute;
use crate::error::Result;
use crate::pkcs11::*;
use crate::template::find_raw;
use crate::token::TokenAccess;

use log::debug;

/// Reads the values of all the given attributes of a token object
pub fn read_many(
    token: &dyn TokenAccess,
    session: CK_SESSION_HANDLE,
    handle: CK_OBJECT_HANDLE,
    attrs: &mut [Attribute],
) -> Result<()> {
    if attrs.is_empty() {
        return Ok(());
    }
    let types: Vec<CK_ATTRIBUTE_TYPE> =
        attrs.iter().map(|a| a.get_type()).collect();
    match token.get_attribute_values(session, handle, &types) {
        Ok(values) => {
            for a in attrs.iter_mut() {
                match find_raw(&values, a.get_type()) {
                    Some(raw) => a.set_raw(&raw.value),
                    None => a.set_present(false),
                }
            }
            Ok(())
        }
        Err(e) => {
            debug!(
                "object {}: batch read of {} attributes failed ({}), \
                 reading them one at a time",
                handle,
                types.len(),
                e
            );
            for a in attrs.iter_mut() {
                read_into(token, session, handle, a)?;
            }
            Ok(())
        }
    }
}

/// Reads a single attribute value into an existing cell
///
/// Only errors other than an invalid type or a sensitive value are
/// returned.
pub fn read_into(
    token: &dyn TokenAccess,
    session: CK_SESSION_HANDLE,
    handle: CK_OBJECT_HANDLE,
    attr: &mut Attribute,
) -> Result<()> {
    match token.get_attribute_value(session, handle, attr.get_type()) {
        Ok(value) => {
            attr.set_raw(&value);
            Ok(())
        }
        Err(e) => match e.rv() {
            CKR_ATTRIBUTE_TYPE_INVALID => {
                attr.set_present(false);
                Ok(())
            }
            CKR_ATTRIBUTE_SENSITIVE => {
                attr.set_sensitive(true);
                Ok(())
            }
            _ => Err(e),
        },
    }
}

/// Reads a single attribute of a token object
pub fn read_one(
    token: &dyn TokenAccess,
    session: CK_SESSION_HANDLE,
    handle: CK_OBJECT_HANDLE,
    t: CK_ATTRIBUTE_TYPE,
) -> Result<Attribute> {
    let mut attr = Attribute::new(t);
    read_into(token, session, handle, &mut attr)?;
    Ok(attr)
}
