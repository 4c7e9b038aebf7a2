// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! This module provides the typed attribute cell ([Attribute]) used by
//! every object, the payload it can hold ([AttrValue]), the cell state
//! ([AttrState]) and the [AttrType] classification of attribute codes.
//!
//! An attribute is either not present, present but sensitive (the token
//! acknowledged it but refused to reveal it), or present with a value.
//! A present attribute may carry an empty value, which is what a token
//! returns for a zero length attribute.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::object::Object;
use crate::pkcs11::*;
use crate::registry;
use crate::template::{RawAttr, RawValue};

use itertools::Itertools;
use zeroize::Zeroize;

/// List of attribute types we understand
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum AttrType {
    BoolType,
    NumType,
    BytesType,
    StringType,
    DateType,
    MechanismType,
    MechanismArrayType,
    TemplateType,
    ClassType,
    KeyType,
    CertType,
    HwFeatureType,
    OpaqueType,
}

impl AttrType {
    /// Parses the short type names used in configuration files
    pub fn from_config_name(s: &str) -> Result<AttrType> {
        Ok(match s {
            "bool" => AttrType::BoolType,
            "num" => AttrType::NumType,
            "bytes" => AttrType::BytesType,
            "string" => AttrType::StringType,
            "date" => AttrType::DateType,
            "mechanism" => AttrType::MechanismType,
            "mechanism_array" => AttrType::MechanismArrayType,
            "template" => AttrType::TemplateType,
            "opaque" => AttrType::OpaqueType,
            _ => {
                return Err(Error::ck_rv_with_errmsg(
                    CKR_ARGUMENTS_BAD,
                    format!("unknown attribute type \"{}\"", s),
                ))
            }
        })
    }

    /// Whether values of this type are carried as a single CK_ULONG
    pub fn is_ulong(&self) -> bool {
        match self {
            AttrType::NumType
            | AttrType::MechanismType
            | AttrType::ClassType
            | AttrType::KeyType
            | AttrType::CertType
            | AttrType::HwFeatureType => true,
            _ => false,
        }
    }

    fn accepts(&self, value: &AttrValue) -> bool {
        match value {
            AttrValue::Bool(_) => *self == AttrType::BoolType,
            AttrValue::Ulong(_) => self.is_ulong(),
            AttrValue::Bytes(_) => match self {
                AttrType::BytesType | AttrType::OpaqueType => true,
                _ => false,
            },
            AttrValue::String(_) => *self == AttrType::StringType,
            AttrValue::Date(d) => *self == AttrType::DateType && d.is_valid(),
            AttrValue::UlongArray(_) => *self == AttrType::MechanismArrayType,
            AttrValue::Template(_) => *self == AttrType::TemplateType,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            AttrType::BoolType => "bool",
            AttrType::BytesType | AttrType::OpaqueType => "bytes",
            AttrType::StringType => "string",
            AttrType::DateType => "date",
            AttrType::MechanismArrayType => "mechanism array",
            AttrType::TemplateType => "template",
            _ => "ulong",
        }
    }
}

/// A PKCS#11 date, stored as its numeric components
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CkDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CkDate {
    /// Creates a date, the components must fit the `YYYYMMDD` form
    pub fn new(year: u16, month: u8, day: u8) -> Result<CkDate> {
        let date = CkDate { year, month, day };
        if !date.is_valid() {
            return Err(Error::ck_rv_with_errmsg(
                CKR_ATTRIBUTE_VALUE_INVALID,
                format!("invalid date {}", date),
            ));
        }
        Ok(date)
    }

    pub fn is_valid(&self) -> bool {
        self.year <= 9999
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
    }

    /// Parses the 8 ASCII digits `YYYYMMDD` wire form
    pub fn from_bytes(val: &[u8]) -> Result<CkDate> {
        if val.len() != 8 || !val.iter().all(|c| c.is_ascii_digit()) {
            return Err(CKR_ATTRIBUTE_VALUE_INVALID)?;
        }
        let num = |s: &[u8]| -> u16 {
            s.iter().fold(0u16, |acc, c| acc * 10 + u16::from(c - b'0'))
        };
        CkDate::new(
            num(&val[0..4]),
            u8::try_from(num(&val[4..6]))?,
            u8::try_from(num(&val[6..8]))?,
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
            .into_bytes()
    }
}

impl fmt::Display for CkDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// The decoded payload of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Ulong(CK_ULONG),
    Bytes(Vec<u8>),
    String(String),
    Date(CkDate),
    UlongArray(Vec<CK_ULONG>),
    Template(Box<Object>),
}

impl AttrValue {
    fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match self {
            AttrValue::Bool(b) => b.hash(&mut hasher),
            AttrValue::Ulong(u) => u.hash(&mut hasher),
            AttrValue::Bytes(v) => v.hash(&mut hasher),
            AttrValue::String(s) => s.hash(&mut hasher),
            AttrValue::Date(d) => d.hash(&mut hasher),
            AttrValue::UlongArray(a) => a.hash(&mut hasher),
            AttrValue::Template(o) => return o.hash_code(),
        }
        hasher.finish()
    }
}

/// The state of an attribute cell
///
/// A sensitive attribute is a present attribute whose value the token
/// refused to disclose, so there is no way to be sensitive and absent.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum AttrState {
    NotPresent,
    Sensitive,
    Present,
}

/// A typed attribute cell
#[derive(Debug, Clone)]
pub struct Attribute {
    ck_type: CK_ATTRIBUTE_TYPE,
    attrtype: AttrType,
    state: AttrState,
    value: Option<AttrValue>,
}

impl Attribute {
    /// Creates an empty, not present, attribute of the given type
    pub fn new(t: CK_ATTRIBUTE_TYPE) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: registry::attr_type(t),
            state: AttrState::NotPresent,
            value: None,
        }
    }

    fn with_value(t: CK_ATTRIBUTE_TYPE, value: AttrValue) -> Attribute {
        Attribute {
            ck_type: t,
            attrtype: registry::attr_type(t),
            state: AttrState::Present,
            value: Some(value),
        }
    }

    /// Creates a present boolean attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_bool(t: CK_ATTRIBUTE_TYPE, val: bool) -> Attribute {
        Self::with_value(t, AttrValue::Bool(val))
    }

    /// Creates a present CK_ULONG attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_ulong(t: CK_ATTRIBUTE_TYPE, val: CK_ULONG) -> Attribute {
        Self::with_value(t, AttrValue::Ulong(val))
    }

    /// Creates a present byte array attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_bytes(t: CK_ATTRIBUTE_TYPE, val: Vec<u8>) -> Attribute {
        Self::with_value(t, AttrValue::Bytes(val))
    }

    /// Creates a present string attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_string(t: CK_ATTRIBUTE_TYPE, val: String) -> Attribute {
        Self::with_value(t, AttrValue::String(val))
    }

    /// Creates a present date attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_date(t: CK_ATTRIBUTE_TYPE, val: CkDate) -> Attribute {
        Self::with_value(t, AttrValue::Date(val))
    }

    /// Creates a present mechanism array attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_ulong_array(
        t: CK_ATTRIBUTE_TYPE,
        val: Vec<CK_ULONG>,
    ) -> Attribute {
        Self::with_value(t, AttrValue::UlongArray(val))
    }

    /// Creates a present nested template attribute
    ///
    /// Note: Does not verify that the attribute id type is correct
    pub fn from_template(t: CK_ATTRIBUTE_TYPE, val: Object) -> Attribute {
        Self::with_value(t, AttrValue::Template(Box::new(val)))
    }

    /// Creates a present attribute by decoding a raw value
    pub fn from_raw(raw: &RawAttr) -> Attribute {
        let mut a = Attribute::new(raw.type_);
        a.set_raw(&raw.value);
        a
    }

    pub fn get_type(&self) -> CK_ATTRIBUTE_TYPE {
        self.ck_type
    }

    pub fn get_attrtype(&self) -> AttrType {
        self.attrtype
    }

    pub fn state(&self) -> AttrState {
        self.state
    }

    pub fn is_present(&self) -> bool {
        self.state != AttrState::NotPresent
    }

    pub fn is_sensitive(&self) -> bool {
        self.state == AttrState::Sensitive
    }

    /// Returns the value, None if the attribute holds an empty value
    ///
    /// Reading an absent or sensitive attribute is an error
    pub fn get_value(&self) -> Result<Option<&AttrValue>> {
        match self.state {
            AttrState::NotPresent => Err(Error::not_found(self.name())),
            AttrState::Sensitive => Err(CKR_ATTRIBUTE_SENSITIVE)?,
            AttrState::Present => Ok(self.value.as_ref()),
        }
    }

    /// Returns the printable name of the attribute type
    pub fn name(&self) -> String {
        registry::attr_name(self.ck_type)
    }

    /// Checks that the value, if any, has the shape the attribute type
    /// requires
    pub fn check_type(&self) -> Result<()> {
        match &self.value {
            Some(v) if !self.attrtype.accepts(v) => Err(Error::type_mismatch(
                self.ck_type,
                self.attrtype.expected(),
            )),
            _ => Ok(()),
        }
    }

    /// Type checked assignment, marks the attribute as present
    pub fn set_value(&mut self, value: AttrValue) -> Result<()> {
        if !self.attrtype.accepts(&value) {
            return Err(Error::type_mismatch(
                self.ck_type,
                self.attrtype.expected(),
            ));
        }
        self.zeroize();
        self.value = Some(value);
        self.state = AttrState::Present;
        Ok(())
    }

    /// Marks the attribute present or not present
    ///
    /// Marking an absent attribute as present gives it an empty value,
    /// marking it not present drops any value.
    pub fn set_present(&mut self, present: bool) {
        if present {
            if self.state == AttrState::NotPresent {
                self.state = AttrState::Present;
            }
        } else {
            self.zeroize();
            self.value = None;
            self.state = AttrState::NotPresent;
        }
    }

    /// Marks the attribute as sensitive (and therefore present) or
    /// clears the sensitive mark
    pub fn set_sensitive(&mut self, sensitive: bool) {
        if sensitive {
            self.zeroize();
            self.value = None;
            self.state = AttrState::Sensitive;
        } else if self.state == AttrState::Sensitive {
            self.state = AttrState::Present;
        }
    }

    fn wrong_shape(&self) -> Error {
        Error::type_mismatch(self.ck_type, self.attrtype.expected())
    }

    pub fn to_bool(&self) -> Result<bool> {
        match self.get_value()? {
            Some(AttrValue::Bool(b)) => Ok(*b),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_ulong(&self) -> Result<CK_ULONG> {
        match self.get_value()? {
            Some(AttrValue::Ulong(u)) => Ok(*u),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_bytes(&self) -> Result<&Vec<u8>> {
        match self.get_value()? {
            Some(AttrValue::Bytes(v)) => Ok(v),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_str(&self) -> Result<&str> {
        match self.get_value()? {
            Some(AttrValue::String(s)) => Ok(s.as_str()),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_date(&self) -> Result<CkDate> {
        match self.get_value()? {
            Some(AttrValue::Date(d)) => Ok(*d),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_ulong_array(&self) -> Result<&Vec<CK_ULONG>> {
        match self.get_value()? {
            Some(AttrValue::UlongArray(a)) => Ok(a),
            _ => Err(self.wrong_shape()),
        }
    }

    pub fn to_template(&self) -> Result<&Object> {
        match self.get_value()? {
            Some(AttrValue::Template(o)) => Ok(o),
            _ => Err(self.wrong_shape()),
        }
    }

    /// Encodes the value in the form the token expects
    ///
    /// An empty value encodes as an empty byte array.
    pub fn to_raw(&self) -> Result<RawValue> {
        Ok(match self.get_value()? {
            None => RawValue::Bytes(Vec::new()),
            Some(AttrValue::Bool(b)) => {
                RawValue::Bytes(vec![if *b { CK_TRUE } else { CK_FALSE }])
            }
            Some(AttrValue::Ulong(u)) => {
                RawValue::Bytes(u.to_ne_bytes().to_vec())
            }
            Some(AttrValue::Bytes(v)) => RawValue::Bytes(v.clone()),
            Some(AttrValue::String(s)) => {
                RawValue::Bytes(s.as_bytes().to_vec())
            }
            Some(AttrValue::Date(d)) => RawValue::Bytes(d.to_bytes()),
            Some(AttrValue::UlongArray(a)) => {
                let mut v = Vec::with_capacity(a.len() * CK_ULONG_SIZE);
                for e in a {
                    v.extend_from_slice(&e.to_ne_bytes());
                }
                RawValue::Bytes(v)
            }
            Some(AttrValue::Template(o)) => {
                RawValue::Array(o.export_legal_attributes())
            }
        })
    }

    /// Returns the raw type/value pair for this attribute
    pub fn to_raw_attr(&self) -> Result<RawAttr> {
        Ok(RawAttr {
            type_: self.ck_type,
            value: self.to_raw()?,
        })
    }

    /// Decodes a raw value returned by the token and marks the attribute
    /// present
    ///
    /// Values that do not decode for the attribute type are kept as raw
    /// bytes rather than dropped.
    pub fn set_raw(&mut self, raw: &RawValue) {
        self.zeroize();
        self.state = AttrState::Present;
        self.value = match raw {
            RawValue::Bytes(b) => self.decode_bytes(b),
            RawValue::Array(list) => {
                if self.attrtype == AttrType::TemplateType {
                    let mut tmpl = Object::new_generic_template();
                    if let Err(e) = tmpl.import_raw(list) {
                        log::warn!(
                            "{}: bad nested template: {}",
                            self.name(),
                            e
                        );
                    }
                    Some(AttrValue::Template(Box::new(tmpl)))
                } else {
                    log::warn!(
                        "{} received an attribute array, value dropped",
                        self.name()
                    );
                    None
                }
            }
        };
    }

    fn decode_bytes(&self, b: &[u8]) -> Option<AttrValue> {
        let decoded = match self.attrtype {
            AttrType::BytesType | AttrType::OpaqueType => {
                return Some(AttrValue::Bytes(b.to_vec()))
            }
            AttrType::StringType => {
                match std::str::from_utf8(b) {
                    Ok(s) => return Some(AttrValue::String(s.to_string())),
                    Err(_) => None,
                }
            }
            _ if b.is_empty() => {
                if self.attrtype == AttrType::MechanismArrayType {
                    return Some(AttrValue::UlongArray(Vec::new()));
                }
                return None;
            }
            AttrType::BoolType => match b.len() {
                1 => Some(AttrValue::Bool(b[0] != CK_FALSE)),
                _ => None,
            },
            AttrType::DateType => match CkDate::from_bytes(b) {
                Ok(d) => Some(AttrValue::Date(d)),
                Err(_) => None,
            },
            AttrType::MechanismArrayType => {
                if b.len() % CK_ULONG_SIZE == 0 {
                    Some(AttrValue::UlongArray(
                        b.chunks_exact(CK_ULONG_SIZE)
                            .filter_map(|c| c.try_into().ok())
                            .map(CK_ULONG::from_ne_bytes)
                            .collect(),
                    ))
                } else {
                    None
                }
            }
            AttrType::TemplateType => None,
            _ => match <[u8; CK_ULONG_SIZE]>::try_from(b) {
                Ok(a) => Some(AttrValue::Ulong(CK_ULONG::from_ne_bytes(a))),
                Err(_) => None,
            },
        };
        match decoded {
            Some(v) => Some(v),
            None => {
                log::warn!(
                    "{}: failed to decode {} bytes as {}, keeping raw value",
                    self.name(),
                    b.len(),
                    self.attrtype.expected()
                );
                Some(AttrValue::Bytes(b.to_vec()))
            }
        }
    }

    /// Zeroizes the internal value
    pub fn zeroize(&mut self) {
        match &mut self.value {
            Some(AttrValue::Bytes(v)) => v.zeroize(),
            Some(AttrValue::String(s)) => s.zeroize(),
            Some(AttrValue::Template(o)) => o.zeroize(),
            _ => (),
        }
    }

    /// Hash of the type code xored with the hash of the payload
    ///
    /// Absent attributes hash to 0 as they all compare equal.
    pub fn hash_code(&self) -> u64 {
        if self.state == AttrState::NotPresent {
            return 0;
        }
        let payload = match &self.value {
            Some(v) => v.hash_code(),
            None => 0,
        };
        u64::from(self.ck_type) ^ payload
    }

    fn fmt_value(&self, indent: usize) -> String {
        let value = match self.state {
            AttrState::NotPresent => {
                return String::from("<Attribute not present>")
            }
            AttrState::Sensitive => return String::from("<Value is sensitive>"),
            AttrState::Present => match &self.value {
                Some(v) => v,
                None => return String::from("<NULL_PTR>"),
            },
        };
        match value {
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Ulong(u) => match self.attrtype {
                AttrType::ClassType => registry::class_name(*u),
                AttrType::KeyType => registry::key_type_name(*u),
                AttrType::CertType => registry::cert_type_name(*u),
                AttrType::HwFeatureType => registry::hw_feature_name(*u),
                AttrType::MechanismType => registry::mechanism_name(*u),
                _ => u.to_string(),
            },
            AttrValue::Bytes(v) => hex::encode(v),
            AttrValue::String(s) => s.clone(),
            AttrValue::Date(d) => d.to_string(),
            AttrValue::UlongArray(a) => a
                .iter()
                .map(|m| registry::mechanism_name(*m))
                .join(", "),
            AttrValue::Template(o) => {
                format!("\n{}", o.to_display_string(indent + 1))
            }
        }
    }

    /// Human readable rendering, optionally prefixed by the name
    pub fn to_display_string(&self, with_name: bool) -> String {
        self.display_indented(with_name, 0)
    }

    pub(crate) fn display_indented(
        &self,
        with_name: bool,
        indent: usize,
    ) -> String {
        if with_name {
            format!("{}: {}", self.name(), self.fmt_value(indent))
        } else {
            self.fmt_value(indent)
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        if self.state == AttrState::NotPresent
            && other.state == AttrState::NotPresent
        {
            return true;
        }
        self.state == other.state
            && self.ck_type == other.ck_type
            && self.value == other.value
    }
}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_display_string(true))
    }
}
