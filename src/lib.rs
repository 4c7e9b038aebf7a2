// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! This is p11objects
//!
//! A typed model of the objects stored on PKCS#11 tokens. Token objects
//! are read through a narrow [token::TokenAccess] interface and turned
//! into [object::Object] instances of the most specific
//! [object::ObjectKind] their class and type attributes select, with
//! every legal attribute decoded into an [attribute::Attribute] cell.
//! Objects also serve as templates to create and search token objects.

pub mod pkcs11;

pub mod attribute;
pub mod config;
pub mod error;
pub mod log;
pub mod object;
pub mod registry;
pub mod template;
pub mod token;

mod misc;

pub use attribute::{AttrState, AttrType, AttrValue, Attribute, CkDate};
pub use error::{Error, ErrorKind, Result};
pub use object::{Object, ObjectKind, Resolution};
pub use template::{CkAttrs, RawAttr, RawValue};
pub use token::TokenAccess;

#[cfg(test)]
mod tests;
