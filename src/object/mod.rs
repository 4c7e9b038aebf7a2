// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! This module defines the representation of PKCS#11 objects ([Object])
//! and the closed set of object kinds ([ObjectKind]) they can take.
//!
//! Every kind has a fixed schema, the list of attributes that are legal
//! for it, built by concatenating the attribute lists of its roles
//! (object, storage, key, private key, RSA private key, ...). An object
//! always holds one cell per legal attribute, so the attribute set never
//! changes after construction. The one exception is the generic
//! [ObjectKind::Template] kind that accepts any attribute type and is
//! used for ad hoc search and creation templates.
//!
//! Objects are either templates (handle set to `CK_INVALID_HANDLE`) or
//! bound to a token object handle, in which case their attributes are
//! read from the token through the [TokenAccess] collaborator.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::attribute::{AttrValue, Attribute, CkDate};
use crate::error::{Error, Result};
use crate::pkcs11::*;
use crate::template::RawAttr;
use crate::token::TokenAccess;

pub mod bulk;
pub mod certs;
pub mod factory;
pub mod hwfeature;
pub mod key;
pub mod params;

pub use factory::{
    attr_element, object_factories, set_code_converter, set_vendor_builder,
    CodeConverter, KeyTypeMap, OAFlags, ObjectAttr, ObjectFactories,
    ObjectType, Resolution, VendorBuilder,
};

/// Attributes only a token can set, never part of a creation template
pub const NEVER_SETTABLE: [CK_ATTRIBUTE_TYPE; 6] = [
    CKA_LOCAL,
    CKA_KEY_GEN_MECHANISM,
    CKA_ALWAYS_SENSITIVE,
    CKA_NEVER_EXTRACTABLE,
    CKA_UNIQUE_ID,
    CKA_HAS_RESET,
];

/// The closed set of object kinds
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// Open template, accepts any attribute
    Template,
    /// Minimal object, only the object class is known
    Generic,
    Data,
    Mechanism,
    Profile,
    Certificate,
    X509Certificate,
    X509AttributeCertificate,
    WtlsCertificate,
    PublicKey,
    PrivateKey,
    SecretKey,
    RsaPublicKey,
    RsaPrivateKey,
    DsaPublicKey,
    DsaPrivateKey,
    EcPublicKey,
    EcPrivateKey,
    DhPublicKey,
    DhPrivateKey,
    X942DhPublicKey,
    X942DhPrivateKey,
    KeaPublicKey,
    KeaPrivateKey,
    GenericSecretKey,
    AesKey,
    DesKey,
    Des2Key,
    Des3Key,
    Rc2Key,
    Rc4Key,
    BlowfishKey,
    TwofishKey,
    CamelliaKey,
    DomainParameters,
    DsaParameters,
    DhParameters,
    X942DhParameters,
    EcParameters,
    HwFeature,
    MonotonicCounter,
    Clock,
    UserInterface,
}

impl ObjectKind {
    /// All kinds, in declaration order
    pub const ALL: [ObjectKind; 43] = [
        ObjectKind::Template,
        ObjectKind::Generic,
        ObjectKind::Data,
        ObjectKind::Mechanism,
        ObjectKind::Profile,
        ObjectKind::Certificate,
        ObjectKind::X509Certificate,
        ObjectKind::X509AttributeCertificate,
        ObjectKind::WtlsCertificate,
        ObjectKind::PublicKey,
        ObjectKind::PrivateKey,
        ObjectKind::SecretKey,
        ObjectKind::RsaPublicKey,
        ObjectKind::RsaPrivateKey,
        ObjectKind::DsaPublicKey,
        ObjectKind::DsaPrivateKey,
        ObjectKind::EcPublicKey,
        ObjectKind::EcPrivateKey,
        ObjectKind::DhPublicKey,
        ObjectKind::DhPrivateKey,
        ObjectKind::X942DhPublicKey,
        ObjectKind::X942DhPrivateKey,
        ObjectKind::KeaPublicKey,
        ObjectKind::KeaPrivateKey,
        ObjectKind::GenericSecretKey,
        ObjectKind::AesKey,
        ObjectKind::DesKey,
        ObjectKind::Des2Key,
        ObjectKind::Des3Key,
        ObjectKind::Rc2Key,
        ObjectKind::Rc4Key,
        ObjectKind::BlowfishKey,
        ObjectKind::TwofishKey,
        ObjectKind::CamelliaKey,
        ObjectKind::DomainParameters,
        ObjectKind::DsaParameters,
        ObjectKind::DhParameters,
        ObjectKind::X942DhParameters,
        ObjectKind::EcParameters,
        ObjectKind::HwFeature,
        ObjectKind::MonotonicCounter,
        ObjectKind::Clock,
        ObjectKind::UserInterface,
    ];

    /// The object class this kind implies, if any
    pub fn class(&self) -> Option<CK_OBJECT_CLASS> {
        use ObjectKind::*;
        Some(match self {
            Template | Generic => return None,
            Data => CKO_DATA,
            Mechanism => CKO_MECHANISM,
            Profile => CKO_PROFILE,
            Certificate
            | X509Certificate
            | X509AttributeCertificate
            | WtlsCertificate => CKO_CERTIFICATE,
            PublicKey | RsaPublicKey | DsaPublicKey | EcPublicKey
            | DhPublicKey | X942DhPublicKey | KeaPublicKey => CKO_PUBLIC_KEY,
            PrivateKey | RsaPrivateKey | DsaPrivateKey | EcPrivateKey
            | DhPrivateKey | X942DhPrivateKey | KeaPrivateKey => {
                CKO_PRIVATE_KEY
            }
            SecretKey | GenericSecretKey | AesKey | DesKey | Des2Key
            | Des3Key | Rc2Key | Rc4Key | BlowfishKey | TwofishKey
            | CamelliaKey => CKO_SECRET_KEY,
            DomainParameters | DsaParameters | DhParameters
            | X942DhParameters | EcParameters => CKO_DOMAIN_PARAMETERS,
            HwFeature | MonotonicCounter | Clock | UserInterface => {
                CKO_HW_FEATURE
            }
        })
    }

    /// The second level discriminator attribute for this kind's class,
    /// the schema entry flagged as discriminator besides the class
    pub fn subtype_attr(&self) -> Option<CK_ATTRIBUTE_TYPE> {
        self.schema()
            .iter()
            .find(|oa| {
                oa.is(OAFlags::Discriminator) && oa.get_type() != CKA_CLASS
            })
            .map(|oa| oa.get_type())
    }

    /// The second level discriminator value for concrete kinds
    pub fn subtype(&self) -> Option<CK_ULONG> {
        use ObjectKind::*;
        Some(match self {
            X509Certificate => CKC_X_509,
            X509AttributeCertificate => CKC_X_509_ATTR_CERT,
            WtlsCertificate => CKC_WTLS,
            RsaPublicKey | RsaPrivateKey => CKK_RSA,
            DsaPublicKey | DsaPrivateKey | DsaParameters => CKK_DSA,
            EcPublicKey | EcPrivateKey | EcParameters => CKK_EC,
            DhPublicKey | DhPrivateKey | DhParameters => CKK_DH,
            X942DhPublicKey | X942DhPrivateKey | X942DhParameters => {
                CKK_X9_42_DH
            }
            KeaPublicKey | KeaPrivateKey => CKK_KEA,
            GenericSecretKey => CKK_GENERIC_SECRET,
            AesKey => CKK_AES,
            DesKey => CKK_DES,
            Des2Key => CKK_DES2,
            Des3Key => CKK_DES3,
            Rc2Key => CKK_RC2,
            Rc4Key => CKK_RC4,
            BlowfishKey => CKK_BLOWFISH,
            TwofishKey => CKK_TWOFISH,
            CamelliaKey => CKK_CAMELLIA,
            MonotonicCounter => CKH_MONOTONIC_COUNTER,
            Clock => CKH_CLOCK,
            UserInterface => CKH_USER_INTERFACE,
            _ => return None,
        })
    }

    /// The kind used when an object of the given class cannot be
    /// resolved further, None for classes we do not model
    pub fn class_fallback(class: CK_OBJECT_CLASS) -> Option<ObjectKind> {
        Some(match class {
            CKO_DATA => ObjectKind::Data,
            CKO_MECHANISM => ObjectKind::Mechanism,
            CKO_PROFILE => ObjectKind::Profile,
            CKO_CERTIFICATE => ObjectKind::Certificate,
            CKO_PUBLIC_KEY => ObjectKind::PublicKey,
            CKO_PRIVATE_KEY => ObjectKind::PrivateKey,
            CKO_SECRET_KEY => ObjectKind::SecretKey,
            CKO_DOMAIN_PARAMETERS => ObjectKind::DomainParameters,
            CKO_HW_FEATURE => ObjectKind::HwFeature,
            _ => return None,
        })
    }

    /// The nearest minimal ancestor of this kind
    pub fn minimal(&self) -> ObjectKind {
        match self.class() {
            Some(c) => match ObjectKind::class_fallback(c) {
                Some(k) => k,
                None => ObjectKind::Generic,
            },
            None => ObjectKind::Generic,
        }
    }

    /// Kinds whose objects hold secret material
    pub fn holds_secrets(&self) -> bool {
        match self.class() {
            Some(CKO_PRIVATE_KEY) | Some(CKO_SECRET_KEY) => true,
            _ => false,
        }
    }

    /// The legal attribute list of this kind, empty for templates
    pub fn schema(&self) -> &'static [ObjectAttr] {
        match SCHEMAS.get(self) {
            Some(s) => s.as_slice(),
            None => &[],
        }
    }

    fn build_schema(&self) -> Vec<ObjectAttr> {
        use ObjectKind::*;
        let mut attrs = Vec::new();
        match self {
            Template => (),
            Generic => factory::add_common_object_attrs(&mut attrs),
            Data => factory::add_data_attrs(&mut attrs),
            Mechanism => factory::add_mechanism_attrs(&mut attrs),
            Profile => factory::add_profile_attrs(&mut attrs),
            Certificate => certs::add_common_certificate_attrs(&mut attrs),
            X509Certificate => certs::add_x509_attrs(&mut attrs),
            X509AttributeCertificate => {
                certs::add_x509_attr_cert_attrs(&mut attrs)
            }
            WtlsCertificate => certs::add_wtls_attrs(&mut attrs),
            PublicKey => key::add_common_public_key_attrs(&mut attrs),
            PrivateKey => key::add_common_private_key_attrs(&mut attrs),
            SecretKey => key::add_common_secret_key_attrs(&mut attrs),
            RsaPublicKey => key::add_rsa_public_attrs(&mut attrs),
            RsaPrivateKey => key::add_rsa_private_attrs(&mut attrs),
            DsaPublicKey | KeaPublicKey => {
                key::add_pqg_public_attrs(&mut attrs)
            }
            DsaPrivateKey | KeaPrivateKey => {
                key::add_pqg_private_attrs(&mut attrs)
            }
            EcPublicKey => key::add_ec_public_attrs(&mut attrs),
            EcPrivateKey => key::add_ec_private_attrs(&mut attrs),
            DhPublicKey => key::add_dh_public_attrs(&mut attrs),
            DhPrivateKey => key::add_dh_private_attrs(&mut attrs),
            X942DhPublicKey => key::add_pqg_public_attrs(&mut attrs),
            X942DhPrivateKey => key::add_x942_dh_private_attrs(&mut attrs),
            GenericSecretKey | AesKey | Rc2Key | Rc4Key | BlowfishKey
            | TwofishKey | CamelliaKey => {
                key::add_variable_secret_attrs(&mut attrs)
            }
            DesKey | Des2Key | Des3Key => {
                key::add_fixed_secret_attrs(&mut attrs)
            }
            DomainParameters => params::add_common_params_attrs(&mut attrs),
            DsaParameters => params::add_dsa_params_attrs(&mut attrs),
            DhParameters => params::add_dh_params_attrs(&mut attrs),
            X942DhParameters => params::add_x942_dh_params_attrs(&mut attrs),
            EcParameters => params::add_ec_params_attrs(&mut attrs),
            HwFeature => hwfeature::add_common_hw_feature_attrs(&mut attrs),
            MonotonicCounter => hwfeature::add_counter_attrs(&mut attrs),
            Clock => hwfeature::add_clock_attrs(&mut attrs),
            UserInterface => hwfeature::add_user_interface_attrs(&mut attrs),
        }
        attrs
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

static SCHEMAS: LazyLock<HashMap<ObjectKind, Vec<ObjectAttr>>> =
    LazyLock::new(|| {
        ObjectKind::ALL
            .iter()
            .map(|k| (*k, k.build_schema()))
            .collect()
    });

/// Helper macro that generates methods to check specific boolean
/// attributes on objects
macro_rules! create_bool_checker {
    (make $name:ident; from $id:expr; def $def:expr) => {
        #[doc = concat!("Returns the value of [", stringify!($id), "] as a boolean")]
        pub fn $name(&self) -> bool {
            match self.get_attr($id) {
                Some(a) => a.to_bool().unwrap_or($def),
                None => $def,
            }
        }
    };
}

/// Helper macro that generates methods to retrieve attributes
/// values of a specific type from objects
macro_rules! attr_as_type {
    (make $name:ident; with $r:ty; via $conv:ident) => {
        #[doc = concat!("Returns the value of the attribute as a `", stringify!($r), "`")]
        ///
        /// None if the attribute is not legal, not present, sensitive
        /// or of a different type.
        pub fn $name(&self, t: CK_ATTRIBUTE_TYPE) -> Option<$r> {
            match self.get_attr(t) {
                Some(a) => a.$conv().ok(),
                None => None,
            }
        }
    };
}

/// This is a generic container for all PKCS#11 Objects
///
/// Private and secret keys are zeroized when dropped, other objects only
/// zeroize the attributes their schema marks as sensitive.
#[derive(Debug, Clone)]
pub struct Object {
    /// The object handle value
    ///
    /// CK_INVALID_HANDLE on templates
    handle: CK_OBJECT_HANDLE,
    kind: ObjectKind,
    /// One cell per legal attribute, in schema order
    attributes: Vec<Attribute>,
    zeroize: bool,
}

impl Drop for Object {
    fn drop(&mut self) {
        let schema = self.kind.schema();
        let sensitive = |t: CK_ATTRIBUTE_TYPE| {
            schema
                .iter()
                .any(|oa| oa.get_type() == t && oa.is(OAFlags::Sensitive))
        };
        for a in self.attributes.iter_mut() {
            if self.zeroize || sensitive(a.get_type()) {
                a.zeroize();
            }
        }
    }
}

impl Object {
    /// Creates a template of the given kind, no attribute is present
    pub fn new(kind: ObjectKind) -> Object {
        Object {
            handle: CK_INVALID_HANDLE,
            kind,
            attributes: kind
                .schema()
                .iter()
                .map(|oa| Attribute::new(oa.get_type()))
                .collect(),
            zeroize: kind.holds_secrets(),
        }
    }

    /// Creates an open template that accepts any attribute
    pub fn new_generic_template() -> Object {
        Object::new(ObjectKind::Template)
    }

    /// Creates a template of the given kind with the discriminators set
    pub fn new_typed_template(kind: ObjectKind) -> Object {
        let mut obj = Object::new(kind);
        if let Some(class) = kind.class() {
            obj.force_ulong(CKA_CLASS, class);
        }
        if let (Some(t), Some(v)) = (kind.subtype_attr(), kind.subtype()) {
            obj.force_ulong(t, v);
        }
        obj
    }

    fn force_ulong(&mut self, t: CK_ATTRIBUTE_TYPE, val: CK_ULONG) {
        if let Some(a) = self.get_attr_mut(t) {
            *a = Attribute::from_ulong(t, val);
        }
    }

    /// Creates an object of the given kind bound to a token handle and
    /// reads all its legal attributes
    pub fn read(
        kind: ObjectKind,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
        handle: CK_OBJECT_HANDLE,
    ) -> Result<Object> {
        let mut obj = Object::new(kind);
        obj.handle = handle;
        obj.read_attributes(token, session)?;
        Ok(obj)
    }

    /// Re-reads all attributes from the token
    pub fn read_attributes(
        &mut self,
        token: &dyn TokenAccess,
        session: CK_SESSION_HANDLE,
    ) -> Result<()> {
        if self.handle == CK_INVALID_HANDLE {
            return Err(CKR_OBJECT_HANDLE_INVALID)?;
        }
        bulk::read_many(token, session, self.handle, &mut self.attributes)
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Gets the object's handle
    pub fn get_handle(&self) -> CK_OBJECT_HANDLE {
        self.handle
    }

    pub fn set_handle(&mut self, h: CK_OBJECT_HANDLE) {
        self.handle = h
    }

    /// True if no token object backs this instance
    pub fn is_template(&self) -> bool {
        self.handle == CK_INVALID_HANDLE
    }

    /// Gets the object's class, if known
    pub fn get_class(&self) -> Option<CK_OBJECT_CLASS> {
        self.get_attr_as_ulong(CKA_CLASS)
    }

    create_bool_checker! {make is_token; from CKA_TOKEN; def false}
    create_bool_checker! {make is_private; from CKA_PRIVATE; def false}
    create_bool_checker! {make is_modifiable; from CKA_MODIFIABLE; def true}
    create_bool_checker! {make is_copyable; from CKA_COPYABLE; def true}
    create_bool_checker! {make is_destroyable; from CKA_DESTROYABLE; def true}
    create_bool_checker! {make is_local; from CKA_LOCAL; def false}
    create_bool_checker! {make is_trusted; from CKA_TRUSTED; def false}
    create_bool_checker! {make is_always_sensitive; from CKA_ALWAYS_SENSITIVE; def false}
    create_bool_checker! {make is_never_extractable; from CKA_NEVER_EXTRACTABLE; def false}
    create_bool_checker! {make always_auth; from CKA_ALWAYS_AUTHENTICATE; def false}
    create_bool_checker! {make can_derive; from CKA_DERIVE; def false}

    /// Report if the object is sensitive with a sensible default
    pub fn is_sensitive(&self) -> bool {
        match self.get_attr(CKA_SENSITIVE) {
            Some(a) => a.to_bool().unwrap_or(self.kind.holds_secrets()),
            None => self.kind.holds_secrets(),
        }
    }

    /// Report is the object is extractable with a sensible default
    pub fn is_extractable(&self) -> bool {
        match self.get_attr(CKA_EXTRACTABLE) {
            Some(a) => a.to_bool().unwrap_or(false),
            None => !self.kind.holds_secrets(),
        }
    }

    attr_as_type! {make get_attr_as_bool; with bool; via to_bool}
    attr_as_type! {make get_attr_as_ulong; with CK_ULONG; via to_ulong}
    attr_as_type! {make get_attr_as_bytes; with &Vec<u8>; via to_bytes}
    attr_as_type! {make get_attr_as_string; with &str; via to_str}
    attr_as_type! {make get_attr_as_date; with CkDate; via to_date}
    attr_as_type! {make get_attr_as_ulong_array; with &Vec<CK_ULONG>; via to_ulong_array}
    attr_as_type! {make get_attr_as_template; with &Object; via to_template}

    /// Get an attribute from the object by attribute id
    ///
    /// None if the attribute type is not legal for this object
    pub fn get_attr(&self, ck_type: CK_ATTRIBUTE_TYPE) -> Option<&Attribute> {
        self.attributes.iter().find(|r| r.get_type() == ck_type)
    }

    pub fn get_attr_mut(
        &mut self,
        ck_type: CK_ATTRIBUTE_TYPE,
    ) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|r| r.get_type() == ck_type)
    }

    /// Gets a reference to the internal vector of object attributes
    pub fn get_attributes(&self) -> &Vec<Attribute> {
        &self.attributes
    }

    fn legal_cell(
        &mut self,
        ck_type: CK_ATTRIBUTE_TYPE,
    ) -> Result<&mut Attribute> {
        let idx = match self
            .attributes
            .iter()
            .position(|r| r.get_type() == ck_type)
        {
            Some(idx) => idx,
            None => {
                if self.kind != ObjectKind::Template {
                    return Err(Error::unsupported_attr(
                        ck_type,
                        &self.kind.to_string(),
                    ));
                }
                self.attributes.push(Attribute::new(ck_type));
                self.attributes.len() - 1
            }
        };
        Ok(&mut self.attributes[idx])
    }

    /// Type checked assignment of a legal attribute
    pub fn put_attr(
        &mut self,
        ck_type: CK_ATTRIBUTE_TYPE,
        value: AttrValue,
    ) -> Result<()> {
        self.legal_cell(ck_type)?.set_value(value)
    }

    /// Replaces a legal attribute cell, the value is type checked
    pub fn set_attr(&mut self, a: Attribute) -> Result<()> {
        a.check_type()?;
        let t = a.get_type();
        *self.legal_cell(t)? = a;
        Ok(())
    }

    /// Marks every attribute of the template present or not present
    pub fn set_all_present(&mut self, present: bool) {
        for a in self.attributes.iter_mut() {
            a.set_present(present);
        }
    }

    /// Emits the present, non sensitive, attributes in wire form
    pub fn export_legal_attributes(&self) -> Vec<RawAttr> {
        self.attributes
            .iter()
            .filter(|a| a.is_present() && !a.is_sensitive())
            .filter_map(|a| a.to_raw_attr().ok())
            .collect()
    }

    fn never_settable(&self, ck_type: CK_ATTRIBUTE_TYPE) -> bool {
        if NEVER_SETTABLE.contains(&ck_type) {
            return true;
        }
        self.kind.schema().iter().any(|oa| {
            oa.get_type() == ck_type && oa.is(OAFlags::NeverSettable)
        })
    }

    /// Like [Object::export_legal_attributes] but without the attributes
    /// only a token may set
    pub fn creation_template(&self) -> Vec<RawAttr> {
        let mut list = self.export_legal_attributes();
        list.retain(|a| !self.never_settable(a.type_));
        list
    }

    /// Imports a list of raw attributes, as emitted by
    /// [Object::export_legal_attributes]
    pub fn import_raw(&mut self, list: &[RawAttr]) -> Result<()> {
        for raw in list {
            self.legal_cell(raw.type_)?.set_raw(&raw.value);
        }
        Ok(())
    }

    /// Zeroizes all attribute values
    pub fn zeroize(&mut self) {
        for a in self.attributes.iter_mut() {
            a.zeroize();
        }
    }

    /// Order independent hash of all attributes, consistent with
    /// equality
    pub fn hash_code(&self) -> u64 {
        self.attributes
            .iter()
            .fold(0u64, |acc, a| acc ^ a.hash_code())
    }

    /// Multi line human readable rendering
    pub fn to_display_string(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let mut s = if self.is_template() {
            format!("{}{} (template)", pad, self.kind)
        } else {
            format!("{}{} (handle {})", pad, self.kind, self.handle)
        };
        let inner = "  ".repeat(indent + 1);
        for a in &self.attributes {
            s.push('\n');
            s.push_str(&inner);
            s.push_str(&a.display_indented(true, indent + 1));
        }
        s
    }
}

impl PartialEq for Object {
    /// Objects are equal when they hold equal attributes, a type missing
    /// on one side compares like an absent attribute
    fn eq(&self, other: &Self) -> bool {
        let absent = |a: &Attribute| !a.is_present();
        for a in &self.attributes {
            match other.get_attr(a.get_type()) {
                Some(b) => {
                    if a != b {
                        return false;
                    }
                }
                None => {
                    if !absent(a) {
                        return false;
                    }
                }
            }
        }
        other
            .attributes
            .iter()
            .filter(|b| self.get_attr(b.get_type()).is_none())
            .all(absent)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_display_string(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_unique() {
        for kind in ObjectKind::ALL {
            let schema = kind.schema();
            for (i, oa) in schema.iter().enumerate() {
                assert!(
                    !schema[i + 1..]
                        .iter()
                        .any(|o| o.get_type() == oa.get_type()),
                    "{} lists {} twice",
                    kind,
                    oa.get_type()
                );
            }
            if kind != ObjectKind::Template {
                assert_eq!(schema[0].get_type(), CKA_CLASS);
            }
        }
    }

    #[test]
    fn kinds_round_trip_through_fallback() {
        for kind in ObjectKind::ALL {
            if let Some(class) = kind.class() {
                let fallback = ObjectKind::class_fallback(class).unwrap();
                assert_eq!(kind.minimal(), fallback);
                assert_eq!(kind.subtype_attr(), fallback.subtype_attr());
            }
        }
    }

    #[test]
    fn typed_template() {
        let t = Object::new_typed_template(ObjectKind::EcPrivateKey);
        assert!(t.is_template());
        assert_eq!(t.get_class(), Some(CKO_PRIVATE_KEY));
        assert_eq!(t.get_attr_as_ulong(CKA_KEY_TYPE), Some(CKK_EC));
        assert!(t.is_sensitive());
        assert!(!t.is_extractable());
        assert!(t.get_attr(CKA_EC_PARAMS).is_some());
        assert!(t.get_attr(CKA_MODULUS).is_none());
    }

    #[test]
    fn legal_set_enforced() {
        let mut t = Object::new_typed_template(ObjectKind::AesKey);
        let err = t
            .put_attr(CKA_MODULUS, AttrValue::Bytes(vec![1]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedAttribute);
        assert!(t.get_attr(CKA_MODULUS).is_none());

        let mut g = Object::new_generic_template();
        g.put_attr(CKA_MODULUS, AttrValue::Bytes(vec![1])).unwrap();
        assert_eq!(g.get_attr_as_bytes(CKA_MODULUS), Some(&vec![1]));
    }

    #[test]
    fn creation_template_skips_token_set() {
        let mut t = Object::new_typed_template(ObjectKind::GenericSecretKey);
        t.put_attr(CKA_LOCAL, AttrValue::Bool(true)).unwrap();
        t.put_attr(CKA_VALUE_LEN, AttrValue::Ulong(32)).unwrap();
        let types: Vec<CK_ATTRIBUTE_TYPE> =
            t.creation_template().iter().map(|a| a.type_).collect();
        assert_eq!(types, vec![CKA_CLASS, CKA_KEY_TYPE, CKA_VALUE_LEN]);
        assert_eq!(t.export_legal_attributes().len(), 4);
    }

    #[test]
    fn display() {
        let mut t = Object::new_generic_template();
        t.put_attr(CKA_ID, AttrValue::Bytes(vec![0xAA, 0x55])).unwrap();
        assert_eq!(
            t.to_display_string(1),
            "  Template (template)\n    CKA_ID: aa55"
        );
    }
}
