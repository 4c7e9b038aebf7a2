// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! An in memory token
//!
//! Objects are stored as lists of raw attributes. Individual attributes
//! can be marked sensitive or made to fail with a given return value,
//! and the way batched reads behave is selectable, which makes this
//! token suitable to exercise every path of the object model.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::object::NEVER_SETTABLE;
use crate::pkcs11::*;
use crate::template::{find_raw, RawAttr, RawValue};

use super::TokenAccess;

/// How the token answers batched attribute reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// The batch fails with the error of the first attribute that
    /// can not be returned
    #[default]
    FirstErrorAborts,
    /// Batched reads are not available at all
    Unsupported,
    /// Batched reads always fail
    Broken,
}

#[derive(Debug, Default)]
struct MemoryObject {
    attrs: Vec<RawAttr>,
    sensitive: HashSet<CK_ATTRIBUTE_TYPE>,
    errors: HashMap<CK_ATTRIBUTE_TYPE, CK_RV>,
}

impl MemoryObject {
    fn get(&self, t: CK_ATTRIBUTE_TYPE) -> Result<RawValue> {
        if let Some(rv) = self.errors.get(&t) {
            return Err(*rv)?;
        }
        match find_raw(&self.attrs, t) {
            Some(a) => {
                if self.sensitive.contains(&t) {
                    Err(CKR_ATTRIBUTE_SENSITIVE)?
                } else {
                    Ok(a.value.clone())
                }
            }
            None => Err(CKR_ATTRIBUTE_TYPE_INVALID)?,
        }
    }

    fn matches(&self, template: &[RawAttr]) -> bool {
        template.iter().all(|t| match find_raw(&self.attrs, t.type_) {
            Some(a) => a.value == t.value,
            None => false,
        })
    }
}

#[derive(Debug)]
struct Objects {
    objects: BTreeMap<CK_OBJECT_HANDLE, MemoryObject>,
    next_handle: CK_OBJECT_HANDLE,
}

/// A token that keeps its objects in memory
#[derive(Debug)]
pub struct MemoryToken {
    store: Mutex<Objects>,
    batch_mode: BatchMode,
    batch_reads: AtomicUsize,
    single_reads: AtomicUsize,
}

impl Default for MemoryToken {
    fn default() -> Self {
        MemoryToken::new()
    }
}

impl MemoryToken {
    pub fn new() -> MemoryToken {
        MemoryToken {
            store: Mutex::new(Objects {
                objects: BTreeMap::new(),
                next_handle: 1,
            }),
            batch_mode: BatchMode::default(),
            batch_reads: AtomicUsize::new(0),
            single_reads: AtomicUsize::new(0),
        }
    }

    pub fn with_batch_mode(mut self, mode: BatchMode) -> MemoryToken {
        self.batch_mode = mode;
        self
    }

    pub fn set_batch_mode(&mut self, mode: BatchMode) {
        self.batch_mode = mode;
    }

    fn lock(&self) -> Result<MutexGuard<'_, Objects>> {
        match self.store.lock() {
            Ok(g) => Ok(g),
            Err(_) => Err(CKR_GENERAL_ERROR)?,
        }
    }

    fn check_session(session: CK_SESSION_HANDLE) -> Result<()> {
        if session == CK_INVALID_HANDLE {
            return Err(CKR_SESSION_HANDLE_INVALID)?;
        }
        Ok(())
    }

    /// Stores a new object as is and returns its handle
    pub fn add_object(&self, attrs: Vec<RawAttr>) -> Result<CK_OBJECT_HANDLE> {
        let mut store = self.lock()?;
        let handle = store.next_handle;
        store.next_handle += 1;
        store.objects.insert(
            handle,
            MemoryObject {
                attrs,
                ..Default::default()
            },
        );
        Ok(handle)
    }

    /// Stores a new object under a specific handle
    pub fn insert_object(
        &self,
        handle: CK_OBJECT_HANDLE,
        attrs: Vec<RawAttr>,
    ) -> Result<()> {
        if handle == CK_INVALID_HANDLE {
            return Err(CKR_OBJECT_HANDLE_INVALID)?;
        }
        let mut store = self.lock()?;
        if store.objects.contains_key(&handle) {
            return Err(CKR_ARGUMENTS_BAD)?;
        }
        store.objects.insert(
            handle,
            MemoryObject {
                attrs,
                ..Default::default()
            },
        );
        if handle >= store.next_handle {
            store.next_handle = handle + 1;
        }
        Ok(())
    }

    fn with_object<F, R>(&self, handle: CK_OBJECT_HANDLE, f: F) -> Result<R>
    where
        F: FnOnce(&mut MemoryObject) -> R,
    {
        let mut store = self.lock()?;
        match store.objects.get_mut(&handle) {
            Some(o) => Ok(f(o)),
            None => Err(CKR_OBJECT_HANDLE_INVALID)?,
        }
    }

    /// Makes reads of the attribute fail with `CKR_ATTRIBUTE_SENSITIVE`
    pub fn set_sensitive(
        &self,
        handle: CK_OBJECT_HANDLE,
        t: CK_ATTRIBUTE_TYPE,
    ) -> Result<()> {
        self.with_object(handle, |o| {
            o.sensitive.insert(t);
        })
    }

    /// Makes reads of the attribute fail with the given error
    pub fn inject_error(
        &self,
        handle: CK_OBJECT_HANDLE,
        t: CK_ATTRIBUTE_TYPE,
        rv: CK_RV,
    ) -> Result<()> {
        self.with_object(handle, |o| {
            o.errors.insert(t, rv);
        })
    }

    /// Returns a copy of the stored attributes of an object
    pub fn object_attrs(
        &self,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<Vec<RawAttr>> {
        self.with_object(handle, |o| o.attrs.clone())
    }

    /// Returns the types marked sensitive on an object
    pub fn sensitive_attrs(
        &self,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<Vec<CK_ATTRIBUTE_TYPE>> {
        self.with_object(handle, |o| {
            let mut v: Vec<CK_ATTRIBUTE_TYPE> =
                o.sensitive.iter().copied().collect();
            v.sort();
            v
        })
    }

    /// Returns the injected errors of an object
    pub fn injected_errors(
        &self,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<Vec<(CK_ATTRIBUTE_TYPE, CK_RV)>> {
        self.with_object(handle, |o| {
            let mut v: Vec<(CK_ATTRIBUTE_TYPE, CK_RV)> =
                o.errors.iter().map(|(t, rv)| (*t, *rv)).collect();
            v.sort();
            v
        })
    }

    /// All handles, in ascending order
    pub fn handles(&self) -> Result<Vec<CK_OBJECT_HANDLE>> {
        Ok(self.lock()?.objects.keys().copied().collect())
    }

    /// Number of batched read calls received so far
    pub fn batch_reads(&self) -> usize {
        self.batch_reads.load(Ordering::Relaxed)
    }

    /// Number of single attribute read calls received so far
    pub fn single_reads(&self) -> usize {
        self.single_reads.load(Ordering::Relaxed)
    }

    pub fn reset_counters(&self) {
        self.batch_reads.store(0, Ordering::Relaxed);
        self.single_reads.store(0, Ordering::Relaxed);
    }
}

impl TokenAccess for MemoryToken {
    fn get_attribute_values(
        &self,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        types: &[CK_ATTRIBUTE_TYPE],
    ) -> Result<Vec<RawAttr>> {
        self.batch_reads.fetch_add(1, Ordering::Relaxed);
        Self::check_session(session)?;
        match self.batch_mode {
            BatchMode::FirstErrorAborts => (),
            BatchMode::Unsupported => return Err(CKR_FUNCTION_NOT_SUPPORTED)?,
            BatchMode::Broken => return Err(CKR_GENERAL_ERROR)?,
        }
        let store = self.lock()?;
        let obj = match store.objects.get(&handle) {
            Some(o) => o,
            None => return Err(CKR_OBJECT_HANDLE_INVALID)?,
        };
        let mut values = Vec::with_capacity(types.len());
        for t in types {
            values.push(RawAttr {
                type_: *t,
                value: obj.get(*t)?,
            });
        }
        Ok(values)
    }

    fn get_attribute_value(
        &self,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        t: CK_ATTRIBUTE_TYPE,
    ) -> Result<RawValue> {
        self.single_reads.fetch_add(1, Ordering::Relaxed);
        Self::check_session(session)?;
        let store = self.lock()?;
        match store.objects.get(&handle) {
            Some(o) => o.get(t),
            None => Err(CKR_OBJECT_HANDLE_INVALID)?,
        }
    }

    /// The class is mandatory, attributes only a token can set are
    /// rejected, `CKA_LOCAL` and `CKA_UNIQUE_ID` are filled in
    fn create_object(
        &self,
        session: CK_SESSION_HANDLE,
        template: &[RawAttr],
    ) -> Result<CK_OBJECT_HANDLE> {
        Self::check_session(session)?;
        if find_raw(template, CKA_CLASS).is_none() {
            return Err(CKR_TEMPLATE_INCOMPLETE)?;
        }
        if template.iter().any(|a| NEVER_SETTABLE.contains(&a.type_)) {
            return Err(CKR_ATTRIBUTE_READ_ONLY)?;
        }
        let mut store = self.lock()?;
        let handle = store.next_handle;
        store.next_handle += 1;
        let mut attrs = template.to_vec();
        attrs.push(RawAttr::from_bool(CKA_LOCAL, false));
        attrs.push(RawAttr::from_bytes(
            CKA_UNIQUE_ID,
            handle.to_string().into_bytes(),
        ));
        store.objects.insert(
            handle,
            MemoryObject {
                attrs,
                ..Default::default()
            },
        );
        Ok(handle)
    }

    fn find_objects(
        &self,
        session: CK_SESSION_HANDLE,
        template: &[RawAttr],
    ) -> Result<Vec<CK_OBJECT_HANDLE>> {
        Self::check_session(session)?;
        let store = self.lock()?;
        Ok(store
            .objects
            .iter()
            .filter(|(_, o)| o.matches(template))
            .map(|(h, _)| *h)
            .collect())
    }
}
