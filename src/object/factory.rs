// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Attribute descriptors used to build the per kind schemas, and the
//! runtime dispatch that turns a token object handle into the right
//! [ObjectKind] by reading its discriminator attributes.
//!
//! Dispatch walks the states of [Resolution]: the object class is read
//! first, then the class specific second level discriminator (key type,
//! certificate type or hardware feature type). A recognized pair builds
//! the concrete kind. Anything else is handed to the registered
//! [VendorBuilder], and when that is missing or fails the object is built
//! as the minimal kind for its class so that a valid handle always yields
//! an object. Token errors other than a missing or sensitive attribute
//! are returned to the caller.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, LazyLock, RwLock};

use crate::attribute::Attribute;
use crate::error::Result;
use crate::pkcs11::vendor::is_vendor_defined;
use crate::pkcs11::*;
use crate::registry;
use crate::template::{find_raw, RawAttr};
use crate::token::TokenAccess;

use super::bulk::read_one;
use super::{Object, ObjectKind};

use bitflags::bitflags;
use log::{debug, warn};

bitflags! {
    /// A bitflag set that defines attribute properties
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OAFlags: u32 {
        /// The attribute holds secret material and is zeroized when the
        /// object is dropped
        const Sensitive     = 0x00000001;

        /// The attribute has a default value defined by PKCS#11 that
        /// applies when the token does not report one
        const Defval        = 0x00000002;

        /// The attribute selects the object kind
        const Discriminator = 0x00000004;

        /// The attribute is only ever set by the token, it is never
        /// part of a creation template
        const NeverSettable = 0x00000008;
    }
}

/// This object is used to list the attributes that are allowed for
/// specific object kinds and also can define what if any their default
/// value is.
#[derive(Debug, Clone)]
pub struct ObjectAttr {
    ck_type: CK_ATTRIBUTE_TYPE,
    /// The flags that define the attribute properties for the object
    /// kind this ObjectAttr is applied to
    flags: OAFlags,
    default: Option<Attribute>,
}

impl ObjectAttr {
    /// Creates a new ObjectAttr
    pub fn new(
        ck_type: CK_ATTRIBUTE_TYPE,
        flags: OAFlags,
        default: Option<Attribute>,
    ) -> ObjectAttr {
        ObjectAttr {
            ck_type,
            flags,
            default,
        }
    }

    /// Gets the internal attribute id (type)
    pub fn get_type(&self) -> CK_ATTRIBUTE_TYPE {
        self.ck_type
    }

    /// Check if a specific flag is present on the ObjectAttr
    pub fn is(&self, val: OAFlags) -> bool {
        if val.is_empty() {
            return false;
        }
        self.flags.contains(val)
    }

    /// Checks if the ObjectAttr has a default value
    pub fn has_default(&self) -> bool {
        self.flags.contains(OAFlags::Defval)
    }

    pub fn default_value(&self) -> Option<&Attribute> {
        self.default.as_ref()
    }
}

/// Helper to quickly instantiate an ObjectAttr element
#[macro_export]
macro_rules! attr_element {
    ($id:expr; $flags:expr; $from_type:expr; val $defval:expr) => {
        $crate::object::factory::ObjectAttr::new(
            $id,
            $flags | $crate::object::factory::OAFlags::Defval,
            Some($from_type($id, $defval)),
        )
    };
    ($id:expr; $flags:expr) => {
        $crate::object::factory::ObjectAttr::new($id, $flags, None)
    };
}
pub use attr_element;

/// Adds the attributes common to every object
pub fn add_common_object_attrs(attrs: &mut Vec<ObjectAttr>) {
    attrs.push(attr_element!(CKA_CLASS; OAFlags::Discriminator));
}

/// Adds the storage object attributes
pub fn add_common_storage_attrs(attrs: &mut Vec<ObjectAttr>, private: bool) {
    add_common_object_attrs(attrs);
    attrs.push(attr_element!(
        CKA_TOKEN; OAFlags::empty(); Attribute::from_bool; val false));
    attrs.push(attr_element!(
        CKA_PRIVATE; OAFlags::empty(); Attribute::from_bool; val private));
    attrs.push(attr_element!(
        CKA_MODIFIABLE; OAFlags::empty(); Attribute::from_bool; val true));
    attrs.push(attr_element!(CKA_LABEL; OAFlags::empty()));
    attrs.push(attr_element!(
        CKA_COPYABLE; OAFlags::empty(); Attribute::from_bool; val true));
    attrs.push(attr_element!(
        CKA_DESTROYABLE; OAFlags::empty(); Attribute::from_bool; val true));
    attrs.push(attr_element!(CKA_UNIQUE_ID; OAFlags::NeverSettable));
}

/// Data objects
pub fn add_data_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_storage_attrs(attrs, false);
    attrs.push(attr_element!(CKA_APPLICATION; OAFlags::empty()));
    attrs.push(attr_element!(CKA_OBJECT_ID; OAFlags::empty()));
    attrs.push(attr_element!(CKA_VALUE; OAFlags::empty()));
}

/// Mechanism objects
pub fn add_mechanism_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_object_attrs(attrs);
    attrs.push(attr_element!(CKA_MECHANISM_TYPE; OAFlags::empty()));
}

/// Profile objects
pub fn add_profile_attrs(attrs: &mut Vec<ObjectAttr>) {
    add_common_object_attrs(attrs);
    attrs.push(attr_element!(CKA_PROFILE_ID; OAFlags::empty()));
}

/// Structure that defines an Object Type
///
/// Holds a Class type and the underlying second level discriminator
/// value (key type, certificate type or hardware feature type).
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct ObjectType {
    class: CK_OBJECT_CLASS,
    type_: CK_ULONG,
}

impl ObjectType {
    /// Initializes and returns a new ObjectType
    pub fn new(class: CK_OBJECT_CLASS, type_: CK_ULONG) -> ObjectType {
        ObjectType { class, type_ }
    }
}

/// The states of the discriminator resolution
///
/// `Unresolved` and `ClassResolved` are transient, dispatch always ends
/// in one of the other three, all of which yield an object.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Resolution {
    Unresolved,
    ClassResolved,
    SubtypeResolved,
    VendorFallback,
    MinimalFallback,
}

/// Hook used to build objects the dispatch table does not know
///
/// Called with the class and, when it could be read, the second level
/// discriminator. Errors are not fatal, dispatch falls back to the
/// minimal kind for the class.
pub trait VendorBuilder: Send + Sync {
    fn build(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        class: CK_OBJECT_CLASS,
        subtype: Option<CK_ULONG>,
    ) -> Result<Object>;
}

/// Hook that maps vendor key types to a standard equivalent before
/// dispatch
pub trait CodeConverter: Send + Sync {
    fn convert_key_type(&self, key_type: CK_KEY_TYPE) -> CK_KEY_TYPE;
}

/// A [CodeConverter] backed by a fixed table
#[derive(Debug, Clone, Default)]
pub struct KeyTypeMap {
    map: HashMap<CK_KEY_TYPE, CK_KEY_TYPE>,
}

impl KeyTypeMap {
    pub fn new() -> KeyTypeMap {
        KeyTypeMap::default()
    }

    pub fn add(&mut self, vendor: CK_KEY_TYPE, generic: CK_KEY_TYPE) {
        self.map.insert(vendor, generic);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl CodeConverter for KeyTypeMap {
    fn convert_key_type(&self, key_type: CK_KEY_TYPE) -> CK_KEY_TYPE {
        match self.map.get(&key_type) {
            Some(k) => *k,
            None => key_type,
        }
    }
}

static VENDOR_BUILDER: RwLock<Option<Arc<dyn VendorBuilder>>> =
    RwLock::new(None);

static CODE_CONVERTER: RwLock<Option<Arc<dyn CodeConverter>>> =
    RwLock::new(None);

/// Registers (or removes) the process wide vendor builder
pub fn set_vendor_builder(builder: Option<Arc<dyn VendorBuilder>>) {
    match VENDOR_BUILDER.write() {
        Ok(mut b) => *b = builder,
        Err(e) => *e.into_inner() = builder,
    }
}

/// Registers (or removes) the process wide key type converter
pub fn set_code_converter(converter: Option<Arc<dyn CodeConverter>>) {
    match CODE_CONVERTER.write() {
        Ok(mut c) => *c = converter,
        Err(e) => *e.into_inner() = converter,
    }
}

fn vendor_builder() -> Option<Arc<dyn VendorBuilder>> {
    match VENDOR_BUILDER.read() {
        Ok(b) => b.clone(),
        Err(e) => e.into_inner().clone(),
    }
}

fn convert_key_type(key_type: CK_KEY_TYPE) -> CK_KEY_TYPE {
    let converter = match CODE_CONVERTER.read() {
        Ok(c) => c.clone(),
        Err(e) => e.into_inner().clone(),
    };
    match converter {
        Some(c) => {
            let converted = c.convert_key_type(key_type);
            if converted != key_type {
                debug!(
                    "key type {} converted to {}",
                    registry::key_type_name(key_type),
                    registry::key_type_name(converted)
                );
            }
            converted
        }
        None => key_type,
    }
}

/// This structure holds the `(class, subtype)` to [ObjectKind] table and
/// implements dispatch on top of it.
#[derive(Debug)]
pub struct ObjectFactories {
    factories: HashMap<ObjectType, ObjectKind>,
}

impl ObjectFactories {
    /// Creates the table of all concrete kinds
    pub fn new() -> ObjectFactories {
        let mut factories = HashMap::new();
        for kind in ObjectKind::ALL {
            if let (Some(class), Some(subtype)) = (kind.class(), kind.subtype())
            {
                factories.insert(ObjectType::new(class, subtype), kind);
            }
        }
        ObjectFactories { factories }
    }

    /// Retrieves the concrete kind for the specified object type
    pub fn get_kind(&self, otype: ObjectType) -> Option<ObjectKind> {
        self.factories.get(&otype).copied()
    }

    /// Reads the discriminators of a token object and builds the
    /// matching object, returning also how it was resolved
    ///
    /// Token errors while reading the object are returned to the caller,
    /// vendor builder failures are not.
    pub fn dispatch(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<(Object, Resolution)> {
        debug!("object {}: {:?}", handle, Resolution::Unresolved);
        let class = match read_one(token, session, handle, CKA_CLASS)?
            .to_ulong()
        {
            Ok(c) => c,
            Err(e) => {
                debug!("object {}: no usable class ({})", handle, e);
                return self.minimal(
                    token,
                    session,
                    handle,
                    ObjectKind::Generic,
                );
            }
        };

        let fallback = match ObjectKind::class_fallback(class) {
            Some(k) => k,
            None => {
                debug!(
                    "object {}: unknown class {}",
                    handle,
                    registry::class_name(class)
                );
                return self.vendor_or_minimal(
                    token,
                    session,
                    handle,
                    class,
                    None,
                    ObjectKind::Generic,
                );
            }
        };
        debug!(
            "object {}: {:?} as {}",
            handle,
            Resolution::ClassResolved,
            registry::class_name(class)
        );

        let subtype_attr = match fallback.subtype_attr() {
            Some(t) => t,
            None => {
                /* classes with no second level discriminator */
                let obj = Object::read(fallback, token, session, handle)?;
                debug!("object {}: {:?}", handle, Resolution::SubtypeResolved);
                return Ok((obj, Resolution::SubtypeResolved));
            }
        };
        let subtype = match read_one(token, session, handle, subtype_attr)?
            .to_ulong()
        {
            Ok(s) => {
                if subtype_attr == CKA_KEY_TYPE {
                    Some(convert_key_type(s))
                } else {
                    Some(s)
                }
            }
            Err(_) => None,
        };

        let kind = match subtype {
            Some(s) if !is_vendor_defined(s) => {
                self.get_kind(ObjectType::new(class, s))
            }
            _ => None,
        };
        if let Some(k) = kind {
            /* token errors past the attribute mapping are fatal */
            let obj = Object::read(k, token, session, handle)?;
            debug!(
                "object {}: {:?} as {}",
                handle,
                Resolution::SubtypeResolved,
                k
            );
            return Ok((obj, Resolution::SubtypeResolved));
        }
        self.vendor_or_minimal(token, session, handle, class, subtype, fallback)
    }

    fn vendor_or_minimal(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        class: CK_OBJECT_CLASS,
        subtype: Option<CK_ULONG>,
        minimal: ObjectKind,
    ) -> Result<(Object, Resolution)> {
        if let Some(builder) = vendor_builder() {
            match builder.build(token, session, handle, class, subtype) {
                Ok(mut obj) => {
                    obj.set_handle(handle);
                    debug!(
                        "object {}: {:?} as {}",
                        handle,
                        Resolution::VendorFallback,
                        obj.kind()
                    );
                    return Ok((obj, Resolution::VendorFallback));
                }
                Err(e) => {
                    warn!("object {}: vendor builder failed: {}", handle, e)
                }
            }
        }
        self.minimal(token, session, handle, minimal)
    }

    fn minimal(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
        kind: ObjectKind,
    ) -> Result<(Object, Resolution)> {
        let obj = Object::read(kind, token, session, handle)?;
        debug!(
            "object {}: {:?} as {}",
            handle,
            Resolution::MinimalFallback,
            kind
        );
        Ok((obj, Resolution::MinimalFallback))
    }

    /// Reads a token object as the most specific kind available
    pub fn read_object(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<Object> {
        Ok(self.dispatch(token, session, handle)?.0)
    }

    /// Builds a typed template from raw attributes
    ///
    /// The kind is resolved from the raw class and second level
    /// discriminator, no vendor hooks are involved. When no concrete
    /// kind matches the result is an open template.
    pub fn from_template(&self, list: &[RawAttr]) -> Result<Object> {
        let kind = match find_raw(list, CKA_CLASS).and_then(|a| a.to_ulong())
        {
            Some(class) => match ObjectKind::class_fallback(class) {
                Some(fallback) => match fallback.subtype_attr() {
                    None => fallback,
                    Some(t) => {
                        let subtype = find_raw(list, t)
                            .and_then(|a| a.to_ulong())
                            .map(|s| {
                                if t == CKA_KEY_TYPE {
                                    convert_key_type(s)
                                } else {
                                    s
                                }
                            });
                        match subtype.and_then(|s| {
                            self.get_kind(ObjectType::new(class, s))
                        }) {
                            Some(k) => k,
                            None => ObjectKind::Template,
                        }
                    }
                },
                None => ObjectKind::Template,
            },
            None => ObjectKind::Template,
        };
        let mut obj = Object::new(kind);
        obj.import_raw(list)?;
        Ok(obj)
    }

    /// Searches the token for objects matching the template and returns
    /// them dispatched to their kinds
    pub fn find_objects(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        template: &Object,
    ) -> Result<Vec<Object>> {
        let handles =
            token.find_objects(session, &template.export_legal_attributes())?;
        let mut objects = Vec::with_capacity(handles.len());
        for h in handles {
            objects.push(self.read_object(token, session, h)?);
        }
        Ok(objects)
    }

    /// Creates an object on the token from the template and returns it
    /// as read back from the token
    pub fn create_object(
        &self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        template: &Object,
    ) -> Result<Object> {
        let handle =
            token.create_object(session, &template.creation_template())?;
        self.read_object(token, session, handle)
    }
}

static OBJECT_FACTORIES: LazyLock<ObjectFactories> =
    LazyLock::new(ObjectFactories::new);

/// Returns the process wide dispatch table
pub fn object_factories() -> &'static ObjectFactories {
    &OBJECT_FACTORIES
}
