// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Wire level attribute templates
//!
//! [RawAttr] is the `(type, value)` pair exchanged with a token: the
//! value is either the encoded bytes of the attribute or, for the
//! template attributes (`CKF_ARRAY_ATTRIBUTE` types), a nested list of
//! raw attributes. [CkAttrs] turns a list of raw attributes into a
//! `CK_ATTRIBUTE` array that can be handed to a C_* function, and
//! [raw_attrs_from_ptr] goes the other way.

use crate::error::Result;
use crate::misc::bytes_to_vec;
use crate::pkcs11::*;
use crate::void_ptr;

use zeroize::Zeroize;

/// A raw attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Bytes(Vec<u8>),
    Array(Vec<RawAttr>),
}

/// A raw `(type, value)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    pub type_: CK_ATTRIBUTE_TYPE,
    pub value: RawValue,
}

impl RawAttr {
    pub fn from_bytes(t: CK_ATTRIBUTE_TYPE, val: Vec<u8>) -> RawAttr {
        RawAttr {
            type_: t,
            value: RawValue::Bytes(val),
        }
    }

    pub fn from_ulong(t: CK_ATTRIBUTE_TYPE, val: CK_ULONG) -> RawAttr {
        Self::from_bytes(t, val.to_ne_bytes().to_vec())
    }

    pub fn from_bool(t: CK_ATTRIBUTE_TYPE, val: bool) -> RawAttr {
        Self::from_bytes(t, vec![if val { CK_TRUE } else { CK_FALSE }])
    }

    pub fn from_array(t: CK_ATTRIBUTE_TYPE, val: Vec<RawAttr>) -> RawAttr {
        RawAttr {
            type_: t,
            value: RawValue::Array(val),
        }
    }

    /// Interprets the value as a native CK_ULONG, if it has the right size
    pub fn to_ulong(&self) -> Option<CK_ULONG> {
        match &self.value {
            RawValue::Bytes(b) => match <[u8; CK_ULONG_SIZE]>::try_from(
                b.as_slice(),
            ) {
                Ok(a) => Some(CK_ULONG::from_ne_bytes(a)),
                Err(_) => None,
            },
            RawValue::Array(_) => None,
        }
    }

    /// Copies a C attribute into an owned raw attribute
    ///
    /// # Safety
    ///
    /// The attribute value pointer must be valid for `ulValueLen` bytes,
    /// nested arrays must be valid `CK_ATTRIBUTE` arrays.
    pub unsafe fn from_ck_attribute(attr: &CK_ATTRIBUTE) -> Result<RawAttr> {
        if attr.type_ & CKF_ARRAY_ATTRIBUTE != 0 && !attr.pValue.is_null() {
            let count = usize::try_from(attr.ulValueLen)?
                / std::mem::size_of::<CK_ATTRIBUTE>();
            let nested = raw_attrs_from_ptr(
                attr.pValue as *const CK_ATTRIBUTE,
                CK_ULONG::try_from(count)?,
            )?;
            return Ok(RawAttr::from_array(attr.type_, nested));
        }
        Ok(RawAttr::from_bytes(
            attr.type_,
            bytes_to_vec(attr.pValue, attr.ulValueLen)?,
        ))
    }
}

/// Finds a raw attribute by type in a list
pub fn find_raw(list: &[RawAttr], t: CK_ATTRIBUTE_TYPE) -> Option<&RawAttr> {
    list.iter().find(|a| a.type_ == t)
}

/// Copies a C array of attributes into owned raw attributes
///
/// # Safety
///
/// `ptr` must be NULL or point to `count` valid `CK_ATTRIBUTE` elements.
pub unsafe fn raw_attrs_from_ptr(
    ptr: *const CK_ATTRIBUTE,
    count: CK_ULONG,
) -> Result<Vec<RawAttr>> {
    if ptr.is_null() {
        return Err(CKR_ARGUMENTS_BAD)?;
    }
    let attrs = std::slice::from_raw_parts(ptr, usize::try_from(count)?);
    let mut v = Vec::with_capacity(attrs.len());
    for a in attrs {
        v.push(RawAttr::from_ck_attribute(a)?);
    }
    Ok(v)
}

/// Helper object to represent managed arrays of CK_ATTRIBUTEs
///
/// All the values pointed to by the array are owned by this object, so
/// the array remains valid for as long as the object lives. Nested
/// templates are kept as owned sub arrays.
#[derive(Debug)]
pub struct CkAttrs {
    /// Storage for owned byte buffers backing the values.
    v: Vec<Vec<u8>>,
    /// Storage for nested attribute arrays.
    nested: Vec<CkAttrs>,
    /// The actual `CK_ATTRIBUTE` array.
    p: Vec<CK_ATTRIBUTE>,
    pub zeroize: bool,
}

impl Drop for CkAttrs {
    fn drop(&mut self) {
        if self.zeroize {
            while let Some(mut elem) = self.v.pop() {
                elem.zeroize();
            }
        }
    }
}

impl CkAttrs {
    /// Creates a new empty managed array of CK_ATTRIBUTEs
    pub fn new() -> CkAttrs {
        Self::with_capacity(0)
    }

    /// Creates a new empty managed array of CK_ATTRIBUTEs
    /// with the specified capacity
    pub fn with_capacity(capacity: usize) -> CkAttrs {
        CkAttrs {
            v: Vec::new(),
            nested: Vec::new(),
            p: Vec::with_capacity(capacity),
            zeroize: false,
        }
    }

    /// Builds the array from a list of raw attributes
    pub fn from_raw(list: &[RawAttr]) -> Result<CkAttrs> {
        let mut attrs = CkAttrs::with_capacity(list.len());
        for a in list {
            attrs.add_raw(a)?;
        }
        Ok(attrs)
    }

    /// Add a new attribute to the array, the value is a vector of bytes
    ///
    /// The vector ownership is transferred to the array
    pub fn add_vec(
        &mut self,
        typ: CK_ATTRIBUTE_TYPE,
        val: Vec<u8>,
    ) -> Result<()> {
        let len = CK_ULONG::try_from(val.len())?;
        let ptr = if val.is_empty() {
            std::ptr::null_mut()
        } else {
            void_ptr!(val.as_ptr())
        };
        self.v.push(val);
        self.p.push(CK_ATTRIBUTE {
            type_: typ,
            pValue: ptr,
            ulValueLen: len,
        });
        Ok(())
    }

    /// Add a new attribute to the array, the value is a CK_ULONG
    pub fn add_ulong(
        &mut self,
        typ: CK_ATTRIBUTE_TYPE,
        val: CK_ULONG,
    ) -> Result<()> {
        self.add_vec(typ, val.to_ne_bytes().to_vec())
    }

    /// Add a nested attribute array
    pub fn add_array(
        &mut self,
        typ: CK_ATTRIBUTE_TYPE,
        val: CkAttrs,
    ) -> Result<()> {
        let len = CK_ULONG::try_from(
            val.len() * std::mem::size_of::<CK_ATTRIBUTE>(),
        )?;
        let ptr = if val.len() == 0 {
            std::ptr::null_mut()
        } else {
            void_ptr!(val.as_ptr())
        };
        self.nested.push(val);
        self.p.push(CK_ATTRIBUTE {
            type_: typ,
            pValue: ptr,
            ulValueLen: len,
        });
        Ok(())
    }

    /// Add a raw attribute, recursing into nested arrays
    pub fn add_raw(&mut self, a: &RawAttr) -> Result<()> {
        match &a.value {
            RawValue::Bytes(b) => self.add_vec(a.type_, b.clone()),
            RawValue::Array(list) => {
                let mut sub = CkAttrs::from_raw(list)?;
                sub.zeroize = self.zeroize;
                self.add_array(a.type_, sub)
            }
        }
    }

    /// Converts the array back into owned raw attributes
    pub fn to_raw(&self) -> Result<Vec<RawAttr>> {
        if self.p.is_empty() {
            return Ok(Vec::new());
        }
        let count = CK_ULONG::try_from(self.len())?;
        unsafe { raw_attrs_from_ptr(self.as_ptr(), count) }
    }

    /// Returns the number of elements in the array
    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Returns a pointer to the array of CK_ATTRIBUTEs
    pub fn as_ptr(&self) -> *const CK_ATTRIBUTE {
        self.p.as_ptr()
    }

    /// Returns a mutable pointer to the array of CK_ATTRIBUTEs
    pub fn as_mut_ptr(&mut self) -> *mut CK_ATTRIBUTE {
        self.p.as_mut_ptr()
    }

    /// Returns a reference to the internal CK_ATTRIBUTEs array
    pub fn as_slice(&self) -> &[CK_ATTRIBUTE] {
        self.p.as_slice()
    }

    /// Finds an attribute by attribute id and return a reference to it
    /// if present, None if not found
    pub fn find_attr(&self, typ: CK_ATTRIBUTE_TYPE) -> Option<&CK_ATTRIBUTE> {
        self.p.iter().find(|a| a.type_ == typ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_array() {
        let inner = vec![
            RawAttr::from_ulong(CKA_CLASS, CKO_SECRET_KEY),
            RawAttr::from_bool(CKA_EXTRACTABLE, false),
        ];
        let list = vec![
            RawAttr::from_bytes(CKA_ID, vec![0xAA, 0x55]),
            RawAttr::from_bytes(CKA_LABEL, Vec::new()),
            RawAttr::from_array(CKA_UNWRAP_TEMPLATE, inner.clone()),
        ];
        let attrs = CkAttrs::from_raw(&list).unwrap();
        assert_eq!(attrs.len(), 3);
        assert!(attrs.find_attr(CKA_LABEL).unwrap().pValue.is_null());

        let unwrap = attrs.find_attr(CKA_UNWRAP_TEMPLATE).unwrap();
        assert_eq!(
            usize::try_from(unwrap.ulValueLen).unwrap(),
            2 * std::mem::size_of::<CK_ATTRIBUTE>()
        );

        /* the array survives a move of its owner */
        let moved = attrs;
        assert_eq!(moved.to_raw().unwrap(), list);
    }

    #[test]
    fn ulong_view() {
        let a = RawAttr::from_ulong(CKA_KEY_TYPE, CKK_AES);
        assert_eq!(a.to_ulong(), Some(CKK_AES));
        let b = RawAttr::from_bytes(CKA_KEY_TYPE, vec![1]);
        assert_eq!(b.to_ulong(), None);
        assert_eq!(find_raw(&[a.clone(), b], CKA_KEY_TYPE), Some(&a));
    }
}
