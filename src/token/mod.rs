// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! The narrow interface through which objects reach a token
//!
//! Session management, login and the native call boundary live behind
//! this trait. The object model only ever reads raw attribute values
//! for a handle and submits raw templates to create or search objects.

use crate::error::Result;
use crate::pkcs11::*;
use crate::template::{RawAttr, RawValue};

pub mod json;
pub mod memory;

pub use memory::{BatchMode, MemoryToken};

/// Token access collaborator
///
/// Errors carry the PKCS#11 return value of the failed call, callers
/// interpret `CKR_ATTRIBUTE_TYPE_INVALID` and `CKR_ATTRIBUTE_SENSITIVE`
/// per attribute.
pub trait TokenAccess {
    /// Reads many attributes at once
    ///
    /// Implementations may fail the whole call when any single
    /// attribute cannot be returned.
    fn get_attribute_values(
        &self,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        types: &[CK_ATTRIBUTE_TYPE],
    ) -> Result<Vec<RawAttr>>;

    /// Reads a single attribute
    fn get_attribute_value(
        &self,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        t: CK_ATTRIBUTE_TYPE,
    ) -> Result<RawValue>;

    /// Creates a new object from a template, returns its handle
    fn create_object(
        &self,
        session: CK_SESSION_HANDLE,
        template: &[RawAttr],
    ) -> Result<CK_OBJECT_HANDLE>;

    /// Returns the handles of all objects matching the template
    fn find_objects(
        &self,
        session: CK_SESSION_HANDLE,
        template: &[RawAttr],
    ) -> Result<Vec<CK_OBJECT_HANDLE>>;
}
