// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! This module provides the static lookup tables that map PKCS#11 codes
//! to printable names and attribute types to the kind of payload they
//! carry ([AttrType]).
//!
//! The standard tables are compiled in and sorted by code so they can be
//! binary searched. Vendor attributes can be added exactly once per
//! process, before first use, through [init]; after that the global
//! [Registry] is immutable and shared by every thread.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::attribute::AttrType;
use crate::error::{Error, Result};
use crate::pkcs11::vendor::unknown_code_name;
use crate::pkcs11::*;

use bimap::BiHashMap;
use once_cell::sync::OnceCell;

/// Struct to map a PKCS#11 attribute to a type and a printable name
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Attrmap<'a> {
    id: CK_ULONG,
    name: &'a str,
    atype: AttrType,
}

impl PartialOrd for Attrmap<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attrmap<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Struct to map any other PKCS#11 code to a printable name
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
struct Namemap<'a> {
    id: CK_ULONG,
    name: &'a str,
}

/// Helper macro to populate the static attributes map
macro_rules! attrmap_element {
    ($id:expr; as $attrtype:ident) => {
        Attrmap {
            id: $id,
            name: stringify!($id),
            atype: AttrType::$attrtype,
        }
    };
}

/// Helper macro to populate the static name maps
macro_rules! namemap_element {
    ($id:expr) => {
        Namemap {
            id: $id,
            name: stringify!($id),
        }
    };
}

/// The main attributes map, list all known attributes
static ATTRMAP: &[Attrmap<'static>] = &[
    attrmap_element!(CKA_CLASS; as ClassType),
    attrmap_element!(CKA_TOKEN; as BoolType),
    attrmap_element!(CKA_PRIVATE; as BoolType),
    attrmap_element!(CKA_LABEL; as StringType),
    attrmap_element!(CKA_UNIQUE_ID; as StringType),
    attrmap_element!(CKA_APPLICATION; as StringType),
    attrmap_element!(CKA_VALUE; as BytesType),
    attrmap_element!(CKA_OBJECT_ID; as BytesType),
    attrmap_element!(CKA_CERTIFICATE_TYPE; as CertType),
    attrmap_element!(CKA_ISSUER; as BytesType),
    attrmap_element!(CKA_SERIAL_NUMBER; as BytesType),
    attrmap_element!(CKA_AC_ISSUER; as BytesType),
    attrmap_element!(CKA_OWNER; as BytesType),
    attrmap_element!(CKA_ATTR_TYPES; as BytesType),
    attrmap_element!(CKA_TRUSTED; as BoolType),
    attrmap_element!(CKA_CERTIFICATE_CATEGORY; as NumType),
    attrmap_element!(CKA_JAVA_MIDP_SECURITY_DOMAIN; as NumType),
    attrmap_element!(CKA_URL; as StringType),
    attrmap_element!(CKA_HASH_OF_SUBJECT_PUBLIC_KEY; as BytesType),
    attrmap_element!(CKA_HASH_OF_ISSUER_PUBLIC_KEY; as BytesType),
    attrmap_element!(CKA_NAME_HASH_ALGORITHM; as MechanismType),
    attrmap_element!(CKA_CHECK_VALUE; as BytesType),
    attrmap_element!(CKA_KEY_TYPE; as KeyType),
    attrmap_element!(CKA_SUBJECT; as BytesType),
    attrmap_element!(CKA_ID; as BytesType),
    attrmap_element!(CKA_SENSITIVE; as BoolType),
    attrmap_element!(CKA_ENCRYPT; as BoolType),
    attrmap_element!(CKA_DECRYPT; as BoolType),
    attrmap_element!(CKA_WRAP; as BoolType),
    attrmap_element!(CKA_UNWRAP; as BoolType),
    attrmap_element!(CKA_SIGN; as BoolType),
    attrmap_element!(CKA_SIGN_RECOVER; as BoolType),
    attrmap_element!(CKA_VERIFY; as BoolType),
    attrmap_element!(CKA_VERIFY_RECOVER; as BoolType),
    attrmap_element!(CKA_DERIVE; as BoolType),
    attrmap_element!(CKA_START_DATE; as DateType),
    attrmap_element!(CKA_END_DATE; as DateType),
    attrmap_element!(CKA_MODULUS; as BytesType),
    attrmap_element!(CKA_MODULUS_BITS; as NumType),
    attrmap_element!(CKA_PUBLIC_EXPONENT; as BytesType),
    attrmap_element!(CKA_PRIVATE_EXPONENT; as BytesType),
    attrmap_element!(CKA_PRIME_1; as BytesType),
    attrmap_element!(CKA_PRIME_2; as BytesType),
    attrmap_element!(CKA_EXPONENT_1; as BytesType),
    attrmap_element!(CKA_EXPONENT_2; as BytesType),
    attrmap_element!(CKA_COEFFICIENT; as BytesType),
    attrmap_element!(CKA_PUBLIC_KEY_INFO; as BytesType),
    attrmap_element!(CKA_PRIME; as BytesType),
    attrmap_element!(CKA_SUBPRIME; as BytesType),
    attrmap_element!(CKA_BASE; as BytesType),
    attrmap_element!(CKA_PRIME_BITS; as NumType),
    attrmap_element!(CKA_SUBPRIME_BITS; as NumType),
    attrmap_element!(CKA_VALUE_BITS; as NumType),
    attrmap_element!(CKA_VALUE_LEN; as NumType),
    attrmap_element!(CKA_EXTRACTABLE; as BoolType),
    attrmap_element!(CKA_LOCAL; as BoolType),
    attrmap_element!(CKA_NEVER_EXTRACTABLE; as BoolType),
    attrmap_element!(CKA_ALWAYS_SENSITIVE; as BoolType),
    attrmap_element!(CKA_KEY_GEN_MECHANISM; as MechanismType),
    attrmap_element!(CKA_MODIFIABLE; as BoolType),
    attrmap_element!(CKA_COPYABLE; as BoolType),
    attrmap_element!(CKA_DESTROYABLE; as BoolType),
    attrmap_element!(CKA_EC_PARAMS; as BytesType),
    attrmap_element!(CKA_EC_POINT; as BytesType),
    attrmap_element!(CKA_ALWAYS_AUTHENTICATE; as BoolType),
    attrmap_element!(CKA_WRAP_WITH_TRUSTED; as BoolType),
    attrmap_element!(CKA_OTP_FORMAT; as NumType),
    attrmap_element!(CKA_OTP_LENGTH; as NumType),
    attrmap_element!(CKA_OTP_TIME_INTERVAL; as NumType),
    attrmap_element!(CKA_OTP_USER_FRIENDLY_MODE; as BoolType),
    attrmap_element!(CKA_OTP_CHALLENGE_REQUIREMENT; as NumType),
    attrmap_element!(CKA_OTP_TIME_REQUIREMENT; as NumType),
    attrmap_element!(CKA_OTP_COUNTER_REQUIREMENT; as NumType),
    attrmap_element!(CKA_OTP_PIN_REQUIREMENT; as NumType),
    attrmap_element!(CKA_OTP_USER_IDENTIFIER; as StringType),
    attrmap_element!(CKA_OTP_SERVICE_IDENTIFIER; as StringType),
    attrmap_element!(CKA_OTP_SERVICE_LOGO; as BytesType),
    attrmap_element!(CKA_OTP_SERVICE_LOGO_TYPE; as StringType),
    attrmap_element!(CKA_OTP_COUNTER; as BytesType),
    attrmap_element!(CKA_OTP_TIME; as StringType),
    attrmap_element!(CKA_GOSTR3410_PARAMS; as BytesType),
    attrmap_element!(CKA_GOSTR3411_PARAMS; as BytesType),
    attrmap_element!(CKA_GOST28147_PARAMS; as BytesType),
    attrmap_element!(CKA_HW_FEATURE_TYPE; as HwFeatureType),
    attrmap_element!(CKA_RESET_ON_INIT; as BoolType),
    attrmap_element!(CKA_HAS_RESET; as BoolType),
    attrmap_element!(CKA_PIXEL_X; as NumType),
    attrmap_element!(CKA_PIXEL_Y; as NumType),
    attrmap_element!(CKA_RESOLUTION; as NumType),
    attrmap_element!(CKA_CHAR_ROWS; as NumType),
    attrmap_element!(CKA_CHAR_COLUMNS; as NumType),
    attrmap_element!(CKA_COLOR; as BoolType),
    attrmap_element!(CKA_BITS_PER_PIXEL; as NumType),
    attrmap_element!(CKA_CHAR_SETS; as StringType),
    attrmap_element!(CKA_ENCODING_METHODS; as StringType),
    attrmap_element!(CKA_MIME_TYPES; as StringType),
    attrmap_element!(CKA_MECHANISM_TYPE; as MechanismType),
    attrmap_element!(CKA_REQUIRED_CMS_ATTRIBUTES; as BytesType),
    attrmap_element!(CKA_DEFAULT_CMS_ATTRIBUTES; as BytesType),
    attrmap_element!(CKA_SUPPORTED_CMS_ATTRIBUTES; as BytesType),
    attrmap_element!(CKA_PROFILE_ID; as NumType),
    attrmap_element!(CKA_WRAP_TEMPLATE; as TemplateType),
    attrmap_element!(CKA_UNWRAP_TEMPLATE; as TemplateType),
    attrmap_element!(CKA_DERIVE_TEMPLATE; as TemplateType),
    attrmap_element!(CKA_ALLOWED_MECHANISMS; as MechanismArrayType),
];

static CLASSMAP: &[Namemap<'static>] = &[
    namemap_element!(CKO_DATA),
    namemap_element!(CKO_CERTIFICATE),
    namemap_element!(CKO_PUBLIC_KEY),
    namemap_element!(CKO_PRIVATE_KEY),
    namemap_element!(CKO_SECRET_KEY),
    namemap_element!(CKO_HW_FEATURE),
    namemap_element!(CKO_DOMAIN_PARAMETERS),
    namemap_element!(CKO_MECHANISM),
    namemap_element!(CKO_OTP_KEY),
    namemap_element!(CKO_PROFILE),
];

static KEYTYPEMAP: &[Namemap<'static>] = &[
    namemap_element!(CKK_RSA),
    namemap_element!(CKK_DSA),
    namemap_element!(CKK_DH),
    namemap_element!(CKK_EC),
    namemap_element!(CKK_X9_42_DH),
    namemap_element!(CKK_KEA),
    namemap_element!(CKK_GENERIC_SECRET),
    namemap_element!(CKK_RC2),
    namemap_element!(CKK_RC4),
    namemap_element!(CKK_DES),
    namemap_element!(CKK_DES2),
    namemap_element!(CKK_DES3),
    namemap_element!(CKK_CAST),
    namemap_element!(CKK_CAST3),
    namemap_element!(CKK_CAST128),
    namemap_element!(CKK_RC5),
    namemap_element!(CKK_IDEA),
    namemap_element!(CKK_SKIPJACK),
    namemap_element!(CKK_BATON),
    namemap_element!(CKK_JUNIPER),
    namemap_element!(CKK_CDMF),
    namemap_element!(CKK_AES),
    namemap_element!(CKK_BLOWFISH),
    namemap_element!(CKK_TWOFISH),
    namemap_element!(CKK_SECURID),
    namemap_element!(CKK_HOTP),
    namemap_element!(CKK_ACTI),
    namemap_element!(CKK_CAMELLIA),
    namemap_element!(CKK_ARIA),
];

static CERTTYPEMAP: &[Namemap<'static>] = &[
    namemap_element!(CKC_X_509),
    namemap_element!(CKC_X_509_ATTR_CERT),
    namemap_element!(CKC_WTLS),
];

static HWFEATUREMAP: &[Namemap<'static>] = &[
    namemap_element!(CKH_MONOTONIC_COUNTER),
    namemap_element!(CKH_CLOCK),
    namemap_element!(CKH_USER_INTERFACE),
];

static MECHMAP: &[Namemap<'static>] = &[
    namemap_element!(CKM_RSA_PKCS_KEY_PAIR_GEN),
    namemap_element!(CKM_RSA_PKCS),
    namemap_element!(CKM_RSA_9796),
    namemap_element!(CKM_RSA_X_509),
    namemap_element!(CKM_SHA1_RSA_PKCS),
    namemap_element!(CKM_RSA_PKCS_OAEP),
    namemap_element!(CKM_RSA_X9_31_KEY_PAIR_GEN),
    namemap_element!(CKM_RSA_PKCS_PSS),
    namemap_element!(CKM_SHA1_RSA_PKCS_PSS),
    namemap_element!(CKM_DSA_KEY_PAIR_GEN),
    namemap_element!(CKM_DSA),
    namemap_element!(CKM_DSA_SHA1),
    namemap_element!(CKM_DH_PKCS_KEY_PAIR_GEN),
    namemap_element!(CKM_DH_PKCS_DERIVE),
    namemap_element!(CKM_X9_42_DH_KEY_PAIR_GEN),
    namemap_element!(CKM_X9_42_DH_DERIVE),
    namemap_element!(CKM_SHA256_RSA_PKCS),
    namemap_element!(CKM_SHA384_RSA_PKCS),
    namemap_element!(CKM_SHA512_RSA_PKCS),
    namemap_element!(CKM_SHA256_RSA_PKCS_PSS),
    namemap_element!(CKM_SHA384_RSA_PKCS_PSS),
    namemap_element!(CKM_SHA512_RSA_PKCS_PSS),
    namemap_element!(CKM_RC2_KEY_GEN),
    namemap_element!(CKM_RC4_KEY_GEN),
    namemap_element!(CKM_RC4),
    namemap_element!(CKM_DES_KEY_GEN),
    namemap_element!(CKM_DES_ECB),
    namemap_element!(CKM_DES_CBC),
    namemap_element!(CKM_DES2_KEY_GEN),
    namemap_element!(CKM_DES3_KEY_GEN),
    namemap_element!(CKM_DES3_ECB),
    namemap_element!(CKM_DES3_CBC),
    namemap_element!(CKM_SHA_1),
    namemap_element!(CKM_SHA_1_HMAC),
    namemap_element!(CKM_SHA256),
    namemap_element!(CKM_SHA256_HMAC),
    namemap_element!(CKM_SHA384),
    namemap_element!(CKM_SHA384_HMAC),
    namemap_element!(CKM_SHA512),
    namemap_element!(CKM_SHA512_HMAC),
    namemap_element!(CKM_GENERIC_SECRET_KEY_GEN),
    namemap_element!(CKM_CAMELLIA_KEY_GEN),
    namemap_element!(CKM_KEA_KEY_PAIR_GEN),
    namemap_element!(CKM_KEA_KEY_DERIVE),
    namemap_element!(CKM_EC_KEY_PAIR_GEN),
    namemap_element!(CKM_ECDSA),
    namemap_element!(CKM_ECDSA_SHA1),
    namemap_element!(CKM_ECDSA_SHA256),
    namemap_element!(CKM_ECDSA_SHA384),
    namemap_element!(CKM_ECDSA_SHA512),
    namemap_element!(CKM_ECDH1_DERIVE),
    namemap_element!(CKM_AES_KEY_GEN),
    namemap_element!(CKM_AES_ECB),
    namemap_element!(CKM_AES_CBC),
    namemap_element!(CKM_AES_CBC_PAD),
    namemap_element!(CKM_AES_GCM),
    namemap_element!(CKM_BLOWFISH_KEY_GEN),
    namemap_element!(CKM_TWOFISH_KEY_GEN),
    namemap_element!(CKM_DSA_PARAMETER_GEN),
    namemap_element!(CKM_DH_PKCS_PARAMETER_GEN),
    namemap_element!(CKM_X9_42_DH_PARAMETER_GEN),
    namemap_element!(CKM_AES_KEY_WRAP),
    namemap_element!(CKM_AES_KEY_WRAP_PAD),
];

static RVMAP: &[Namemap<'static>] = &[
    namemap_element!(CKR_OK),
    namemap_element!(CKR_CANCEL),
    namemap_element!(CKR_HOST_MEMORY),
    namemap_element!(CKR_SLOT_ID_INVALID),
    namemap_element!(CKR_GENERAL_ERROR),
    namemap_element!(CKR_FUNCTION_FAILED),
    namemap_element!(CKR_ARGUMENTS_BAD),
    namemap_element!(CKR_ATTRIBUTE_READ_ONLY),
    namemap_element!(CKR_ATTRIBUTE_SENSITIVE),
    namemap_element!(CKR_ATTRIBUTE_TYPE_INVALID),
    namemap_element!(CKR_ATTRIBUTE_VALUE_INVALID),
    namemap_element!(CKR_DATA_INVALID),
    namemap_element!(CKR_DEVICE_ERROR),
    namemap_element!(CKR_DEVICE_MEMORY),
    namemap_element!(CKR_DEVICE_REMOVED),
    namemap_element!(CKR_FUNCTION_NOT_SUPPORTED),
    namemap_element!(CKR_OBJECT_HANDLE_INVALID),
    namemap_element!(CKR_SESSION_CLOSED),
    namemap_element!(CKR_SESSION_HANDLE_INVALID),
    namemap_element!(CKR_TEMPLATE_INCOMPLETE),
    namemap_element!(CKR_TEMPLATE_INCONSISTENT),
    namemap_element!(CKR_TOKEN_NOT_PRESENT),
    namemap_element!(CKR_TOKEN_NOT_RECOGNIZED),
    namemap_element!(CKR_USER_NOT_LOGGED_IN),
    namemap_element!(CKR_BUFFER_TOO_SMALL),
    namemap_element!(CKR_CRYPTOKI_NOT_INITIALIZED),
    namemap_element!(CKR_CRYPTOKI_ALREADY_INITIALIZED),
];

fn search_attrmap(id: CK_ULONG) -> Option<&'static Attrmap<'static>> {
    match ATTRMAP.binary_search_by(|a| a.id.cmp(&id)) {
        Ok(i) => Some(&ATTRMAP[i]),
        Err(_) => None,
    }
}

fn search_namemap(
    map: &'static [Namemap<'static>],
    id: CK_ULONG,
) -> Option<&'static str> {
    match map.binary_search_by(|n| n.id.cmp(&id)) {
        Ok(i) => Some(map[i].name),
        Err(_) => None,
    }
}

fn search_namemap_by_name(
    map: &'static [Namemap<'static>],
    s: &str,
) -> Option<CK_ULONG> {
    map.iter().find(|n| n.name == s).map(|n| n.id)
}

fn code_name(map: &'static [Namemap<'static>], id: CK_ULONG) -> String {
    match search_namemap(map, id) {
        Some(n) => n.to_string(),
        None => unknown_code_name(id),
    }
}

/// A vendor defined attribute description, usually sourced from the
/// configuration file
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VendorAttr {
    pub id: CK_ATTRIBUTE_TYPE,
    pub name: String,
    pub atype: AttrType,
}

/// The attribute registry
///
/// Holds the standard attribute table plus any vendor attributes the
/// application registered. Unknown attribute types map to
/// [AttrType::OpaqueType].
#[derive(Debug)]
pub struct Registry {
    vendor_names: BiHashMap<CK_ATTRIBUTE_TYPE, String>,
    vendor_types: HashMap<CK_ATTRIBUTE_TYPE, AttrType>,
}

impl Registry {
    /// A registry with only the standard attributes
    pub fn standard() -> Registry {
        Registry {
            vendor_names: BiHashMap::new(),
            vendor_types: HashMap::new(),
        }
    }

    /// A registry extended with vendor attributes
    ///
    /// Vendor entries may not redefine a standard attribute code or name
    /// and must be unique among themselves.
    pub fn with_vendor_attrs(vendor: &[VendorAttr]) -> Result<Registry> {
        let mut reg = Registry::standard();
        for va in vendor {
            if search_attrmap(va.id).is_some()
                || ATTRMAP.iter().any(|a| a.name == va.name)
            {
                return Err(Error::ck_rv_with_errmsg(
                    CKR_ARGUMENTS_BAD,
                    format!(
                        "vendor attribute {} shadows a standard one",
                        va.name
                    ),
                ));
            }
            if reg
                .vendor_names
                .insert_no_overwrite(va.id, va.name.clone())
                .is_err()
            {
                return Err(Error::ck_rv_with_errmsg(
                    CKR_ARGUMENTS_BAD,
                    format!("duplicate vendor attribute {}", va.name),
                ));
            }
            reg.vendor_types.insert(va.id, va.atype);
        }
        Ok(reg)
    }

    /// Returns the printable name of an attribute type
    pub fn attr_name(&self, id: CK_ATTRIBUTE_TYPE) -> String {
        if let Some(a) = search_attrmap(id) {
            return a.name.to_string();
        }
        match self.vendor_names.get_by_left(&id) {
            Some(n) => n.clone(),
            None => unknown_code_name(id),
        }
    }

    /// Returns the payload type of an attribute type
    pub fn attr_type(&self, id: CK_ATTRIBUTE_TYPE) -> AttrType {
        if let Some(a) = search_attrmap(id) {
            return a.atype;
        }
        match self.vendor_types.get(&id) {
            Some(t) => *t,
            None => AttrType::OpaqueType,
        }
    }

    /// Finds an attribute id and type from its printable name
    pub fn attr_by_name(
        &self,
        s: &str,
    ) -> Option<(CK_ATTRIBUTE_TYPE, AttrType)> {
        if let Some(a) = ATTRMAP.iter().find(|a| a.name == s) {
            return Some((a.id, a.atype));
        }
        match self.vendor_names.get_by_right(s) {
            Some(id) => Some((*id, self.attr_type(*id))),
            None => None,
        }
    }

    /// Returns true if the attribute type is known to the registry
    pub fn is_known(&self, id: CK_ATTRIBUTE_TYPE) -> bool {
        search_attrmap(id).is_some() || self.vendor_types.contains_key(&id)
    }
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Explicit one-time initialization of the process wide registry
///
/// Must be called before anything else touches the registry, otherwise
/// the standard-only registry is already in place and this returns
/// CKR_CRYPTOKI_ALREADY_INITIALIZED.
pub fn init(vendor: &[VendorAttr]) -> Result<()> {
    let reg = Registry::with_vendor_attrs(vendor)?;
    match REGISTRY.set(reg) {
        Ok(()) => Ok(()),
        Err(_) => Err(CKR_CRYPTOKI_ALREADY_INITIALIZED)?,
    }
}

/// Returns the process wide registry, populating it on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::standard)
}

/// Returns the printable name of an attribute type
pub fn attr_name(id: CK_ATTRIBUTE_TYPE) -> String {
    registry().attr_name(id)
}

/// Returns the payload type of an attribute type
pub fn attr_type(id: CK_ATTRIBUTE_TYPE) -> AttrType {
    registry().attr_type(id)
}

pub fn class_name(class: CK_OBJECT_CLASS) -> String {
    code_name(CLASSMAP, class)
}

pub fn key_type_name(key_type: CK_KEY_TYPE) -> String {
    code_name(KEYTYPEMAP, key_type)
}

pub fn cert_type_name(cert_type: CK_CERTIFICATE_TYPE) -> String {
    code_name(CERTTYPEMAP, cert_type)
}

pub fn hw_feature_name(hw_type: CK_HW_FEATURE_TYPE) -> String {
    code_name(HWFEATUREMAP, hw_type)
}

pub fn mechanism_name(mech: CK_MECHANISM_TYPE) -> String {
    code_name(MECHMAP, mech)
}

pub fn rv_name(rv: CK_RV) -> String {
    code_name(RVMAP, rv)
}

pub fn class_by_name(s: &str) -> Option<CK_OBJECT_CLASS> {
    search_namemap_by_name(CLASSMAP, s)
}

pub fn key_type_by_name(s: &str) -> Option<CK_KEY_TYPE> {
    search_namemap_by_name(KEYTYPEMAP, s)
}

pub fn cert_type_by_name(s: &str) -> Option<CK_CERTIFICATE_TYPE> {
    search_namemap_by_name(CERTTYPEMAP, s)
}

pub fn hw_feature_by_name(s: &str) -> Option<CK_HW_FEATURE_TYPE> {
    search_namemap_by_name(HWFEATUREMAP, s)
}

pub fn mechanism_by_name(s: &str) -> Option<CK_MECHANISM_TYPE> {
    search_namemap_by_name(MECHMAP, s)
}

pub fn rv_by_name(s: &str) -> Option<CK_RV> {
    search_namemap_by_name(RVMAP, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_order_of_maps() {
        let mut copy = ATTRMAP.to_vec();
        copy.sort();
        assert_eq!(ATTRMAP, copy.as_slice());

        for map in [
            CLASSMAP,
            KEYTYPEMAP,
            CERTTYPEMAP,
            HWFEATUREMAP,
            MECHMAP,
            RVMAP,
        ] {
            let mut copy = map.to_vec();
            copy.sort();
            assert_eq!(map, copy.as_slice());
        }
    }

    #[test]
    fn names() {
        assert_eq!(attr_name(CKA_MODULUS), "CKA_MODULUS");
        assert_eq!(attr_name(0x7777), "[0x00007777]");
        assert_eq!(
            attr_name(CKA_VENDOR_DEFINED | 0x99),
            "VENDOR_DEFINED [0x80000099]"
        );
        assert_eq!(class_name(CKO_PRIVATE_KEY), "CKO_PRIVATE_KEY");
        assert_eq!(key_type_name(CKK_X9_42_DH), "CKK_X9_42_DH");
        assert_eq!(cert_type_name(CKC_WTLS), "CKC_WTLS");
        assert_eq!(hw_feature_name(CKH_CLOCK), "CKH_CLOCK");
        assert_eq!(mechanism_name(CKM_ECDSA), "CKM_ECDSA");
        assert_eq!(rv_name(CKR_ATTRIBUTE_SENSITIVE), "CKR_ATTRIBUTE_SENSITIVE");
        assert_eq!(key_type_by_name("CKK_EC"), Some(CKK_EC));
        assert_eq!(mechanism_by_name("CKM_NOPE"), None);
    }

    #[test]
    fn subtypes() {
        assert_eq!(attr_type(CKA_CLASS), AttrType::ClassType);
        assert_eq!(attr_type(CKA_KEY_TYPE), AttrType::KeyType);
        assert_eq!(attr_type(CKA_CERTIFICATE_TYPE), AttrType::CertType);
        assert_eq!(attr_type(CKA_HW_FEATURE_TYPE), AttrType::HwFeatureType);
        assert_eq!(attr_type(CKA_START_DATE), AttrType::DateType);
        assert_eq!(
            attr_type(CKA_ALLOWED_MECHANISMS),
            AttrType::MechanismArrayType
        );
        assert_eq!(attr_type(CKA_WRAP_TEMPLATE), AttrType::TemplateType);
        assert_eq!(attr_type(0x7777), AttrType::OpaqueType);
    }

    #[test]
    fn vendor_attributes() {
        let acme = VendorAttr {
            id: CKA_VENDOR_DEFINED | 0x101,
            name: "ACME_SLOT_INDEX".to_string(),
            atype: AttrType::NumType,
        };
        let reg = Registry::with_vendor_attrs(&[acme.clone()]).unwrap();
        assert_eq!(reg.attr_name(acme.id), "ACME_SLOT_INDEX");
        assert_eq!(reg.attr_type(acme.id), AttrType::NumType);
        assert_eq!(
            reg.attr_by_name("ACME_SLOT_INDEX"),
            Some((acme.id, AttrType::NumType))
        );
        assert!(reg.is_known(acme.id));

        /* duplicates and shadowing are refused */
        assert!(Registry::with_vendor_attrs(&[acme.clone(), acme]).is_err());
        let shadow = VendorAttr {
            id: CKA_LABEL,
            name: "MY_LABEL".to_string(),
            atype: AttrType::StringType,
        };
        assert!(Registry::with_vendor_attrs(&[shadow]).is_err());
    }
}
