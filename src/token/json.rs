// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! JSON descriptions of [MemoryToken] contents
//!
//! ```json
//! {"objects": [{
//!     "handle": 7,
//!     "attributes": {
//!         "CKA_CLASS": "CKO_SECRET_KEY",
//!         "CKA_KEY_TYPE": "CKK_AES",
//!         "CKA_VALUE": "AAECAwQFBgcICQoLDA0ODw==",
//!         "CKA_VALUE_LEN": 16
//!     },
//!     "sensitive": ["CKA_VALUE"],
//!     "errors": {"CKA_LABEL": "CKR_DEVICE_ERROR"}
//! }]}
//! ```
//!
//! Attributes are keyed by their registry name, or by their `0x` prefixed
//! hexadecimal value when the registry does not know them. Codes (classes, key
//! types, mechanisms, ...) may be given by name or number, byte arrays
//! are base64 encoded, dates are `YYYYMMDD` strings and nested templates
//! are objects of attributes.

use crate::attribute::{AttrType, CkDate};
use crate::error::{Error, Result};
use crate::pkcs11::*;
use crate::registry;
use crate::template::{RawAttr, RawValue};

use super::MemoryToken;

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_string_pretty, Map, Number, Value};

fn uninit(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::ck_rv_from_error(CKR_TOKEN_NOT_PRESENT, e)
    } else {
        Error::other_error(e)
    }
}

fn bad_value(name: &str) -> Error {
    Error::ck_rv_with_errmsg(
        CKR_ATTRIBUTE_VALUE_INVALID,
        format!("invalid value for {}", name),
    )
}

fn name_to_type(name: &str) -> Result<(CK_ATTRIBUTE_TYPE, AttrType)> {
    if let Some(t) = registry::registry().attr_by_name(name) {
        return Ok(t);
    }
    /* attributes the registry does not know are saved by number */
    if let Some(hex) = name.strip_prefix("0x") {
        if let Ok(id) = CK_ATTRIBUTE_TYPE::from_str_radix(hex, 16) {
            return Ok((id, registry::attr_type(id)));
        }
    }
    Err(Error::ck_rv_with_errmsg(
        CKR_ATTRIBUTE_TYPE_INVALID,
        format!("unknown attribute {}", name),
    ))
}

fn type_to_name(id: CK_ATTRIBUTE_TYPE) -> String {
    if registry::registry().is_known(id) {
        registry::attr_name(id)
    } else {
        format!("0x{:08X}", id)
    }
}

fn rv_to_json(rv: CK_RV) -> Value {
    let name = registry::rv_name(rv);
    if registry::rv_by_name(&name) == Some(rv) {
        Value::String(name)
    } else {
        Value::Number(Number::from(rv))
    }
}

fn code_lookup(atype: AttrType) -> Option<fn(&str) -> Option<CK_ULONG>> {
    match atype {
        AttrType::ClassType => Some(registry::class_by_name),
        AttrType::KeyType => Some(registry::key_type_by_name),
        AttrType::CertType => Some(registry::cert_type_by_name),
        AttrType::HwFeatureType => Some(registry::hw_feature_by_name),
        AttrType::MechanismType | AttrType::MechanismArrayType => {
            Some(registry::mechanism_by_name)
        }
        _ => None,
    }
}

fn code_naming(atype: AttrType) -> Option<fn(CK_ULONG) -> String> {
    match atype {
        AttrType::ClassType => Some(registry::class_name),
        AttrType::KeyType => Some(registry::key_type_name),
        AttrType::CertType => Some(registry::cert_type_name),
        AttrType::HwFeatureType => Some(registry::hw_feature_name),
        AttrType::MechanismType | AttrType::MechanismArrayType => {
            Some(registry::mechanism_name)
        }
        _ => None,
    }
}

fn json_to_code(
    name: &str,
    atype: AttrType,
    val: &Value,
) -> Result<CK_ULONG> {
    if let Some(n) = val.as_u64() {
        return Ok(CK_ULONG::try_from(n)?);
    }
    let s = match val.as_str() {
        Some(s) => s,
        None => return Err(bad_value(name)),
    };
    if let Some(lookup) = code_lookup(atype) {
        if let Some(code) = lookup(s) {
            return Ok(code);
        }
    }
    match s.strip_prefix("0x") {
        Some(hex) => match CK_ULONG::from_str_radix(hex, 16) {
            Ok(code) => Ok(code),
            Err(_) => Err(bad_value(name)),
        },
        None => Err(bad_value(name)),
    }
}

fn code_to_json(atype: AttrType, code: CK_ULONG) -> Value {
    if let (Some(naming), Some(lookup)) =
        (code_naming(atype), code_lookup(atype))
    {
        let name = naming(code);
        if lookup(&name) == Some(code) {
            return Value::String(name);
        }
    }
    Value::Number(Number::from(code))
}

fn json_to_raw(name: &str, val: &Value) -> Result<RawAttr> {
    let (id, atype) = name_to_type(name)?;
    let value = match atype {
        AttrType::BoolType => match val.as_bool() {
            Some(b) => {
                RawValue::Bytes(vec![if b { CK_TRUE } else { CK_FALSE }])
            }
            None => return Err(bad_value(name)),
        },
        AttrType::NumType
        | AttrType::MechanismType
        | AttrType::ClassType
        | AttrType::KeyType
        | AttrType::CertType
        | AttrType::HwFeatureType => RawValue::Bytes(
            json_to_code(name, atype, val)?.to_ne_bytes().to_vec(),
        ),
        AttrType::StringType => match val.as_str() {
            Some(s) => RawValue::Bytes(s.as_bytes().to_vec()),
            None => return Err(bad_value(name)),
        },
        AttrType::BytesType | AttrType::OpaqueType => match val.as_str() {
            Some(s) => match BASE64.decode(s.as_bytes()) {
                Ok(v) => RawValue::Bytes(v),
                Err(_) => return Err(bad_value(name)),
            },
            None => return Err(bad_value(name)),
        },
        AttrType::DateType => match val.as_str() {
            /* special case for default empty value */
            Some("") => RawValue::Bytes(Vec::new()),
            Some(s) => {
                RawValue::Bytes(CkDate::from_bytes(s.as_bytes())?.to_bytes())
            }
            None => return Err(bad_value(name)),
        },
        AttrType::MechanismArrayType => match val.as_array() {
            Some(list) => {
                let mut v = Vec::with_capacity(list.len() * CK_ULONG_SIZE);
                for m in list {
                    v.extend_from_slice(
                        &json_to_code(name, atype, m)?.to_ne_bytes(),
                    );
                }
                RawValue::Bytes(v)
            }
            None => return Err(bad_value(name)),
        },
        AttrType::TemplateType => match val.as_object() {
            Some(map) => RawValue::Array(json_to_raw_list(map)?),
            None => return Err(bad_value(name)),
        },
    };
    Ok(RawAttr {
        type_: id,
        value,
    })
}

fn json_to_raw_list(map: &Map<String, Value>) -> Result<Vec<RawAttr>> {
    let mut list = Vec::with_capacity(map.len());
    for (key, val) in map {
        list.push(json_to_raw(key, val)?);
    }
    Ok(list)
}

fn raw_to_json(raw: &RawAttr) -> Value {
    let atype = registry::attr_type(raw.type_);
    let bytes = match &raw.value {
        RawValue::Array(list) => {
            return Value::Object(raw_list_to_json(list));
        }
        RawValue::Bytes(b) => b,
    };
    let as_base64 = || Value::String(BASE64.encode(bytes));
    match atype {
        AttrType::BoolType if bytes.len() == 1 => {
            Value::Bool(bytes[0] != CK_FALSE)
        }
        AttrType::StringType => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => as_base64(),
        },
        AttrType::DateType => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => as_base64(),
        },
        AttrType::MechanismArrayType if bytes.len() % CK_ULONG_SIZE == 0 => {
            Value::Array(
                bytes
                    .chunks_exact(CK_ULONG_SIZE)
                    .filter_map(|c| c.try_into().ok())
                    .map(|c| code_to_json(atype, CK_ULONG::from_ne_bytes(c)))
                    .collect(),
            )
        }
        AttrType::NumType
        | AttrType::MechanismType
        | AttrType::ClassType
        | AttrType::KeyType
        | AttrType::CertType
        | AttrType::HwFeatureType => {
            match <[u8; CK_ULONG_SIZE]>::try_from(bytes.as_slice()) {
                Ok(a) => code_to_json(atype, CK_ULONG::from_ne_bytes(a)),
                Err(_) => as_base64(),
            }
        }
        _ => as_base64(),
    }
}

fn raw_list_to_json(list: &[RawAttr]) -> Map<String, Value> {
    let mut map = Map::new();
    for raw in list {
        map.insert(type_to_name(raw.type_), raw_to_json(raw));
    }
    map
}

/// One token object
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<CK_OBJECT_HANDLE>,
    attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sensitive: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    errors: Map<String, Value>,
}

/// The contents of a token
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonObjects {
    objects: Vec<JsonObject>,
}

impl JsonObjects {
    pub fn load(filename: &str) -> Result<JsonObjects> {
        match std::fs::File::open(filename) {
            Ok(f) => Ok(from_reader::<std::fs::File, JsonObjects>(f)?),
            Err(e) => Err(uninit(e)),
        }
    }

    pub fn parse(s: &str) -> Result<JsonObjects> {
        Ok(serde_json::from_str(s)?)
    }

    /// Stores all the objects in the token
    ///
    /// Objects with no explicit handle get the next free one.
    pub fn prime_token(&self, token: &MemoryToken) -> Result<()> {
        for jo in &self.objects {
            let attrs = json_to_raw_list(&jo.attributes)?;
            let handle = match jo.handle {
                Some(h) => {
                    token.insert_object(h, attrs)?;
                    h
                }
                None => token.add_object(attrs)?,
            };
            for name in &jo.sensitive {
                token.set_sensitive(handle, name_to_type(name)?.0)?;
            }
            for (name, rv) in &jo.errors {
                let code = match rv.as_str().and_then(registry::rv_by_name) {
                    Some(code) => code,
                    None => match rv.as_u64() {
                        Some(n) => CK_RV::try_from(n)?,
                        None => return Err(bad_value(name)),
                    },
                };
                token.inject_error(handle, name_to_type(name)?.0, code)?;
            }
        }
        Ok(())
    }

    /// Builds a new token holding the objects
    pub fn to_token(&self) -> Result<MemoryToken> {
        let token = MemoryToken::new();
        self.prime_token(&token)?;
        Ok(token)
    }

    pub fn from_token(token: &MemoryToken) -> Result<JsonObjects> {
        let handles = token.handles()?;
        let mut jt = JsonObjects {
            objects: Vec::with_capacity(handles.len()),
        };
        for h in handles {
            let mut errors = Map::new();
            for (t, rv) in token.injected_errors(h)? {
                errors.insert(type_to_name(t), rv_to_json(rv));
            }
            jt.objects.push(JsonObject {
                handle: Some(h),
                attributes: raw_list_to_json(&token.object_attrs(h)?),
                sensitive: token
                    .sensitive_attrs(h)?
                    .into_iter()
                    .map(type_to_name)
                    .collect(),
                errors,
            });
        }
        Ok(jt)
    }

    pub fn save(&self, filename: &str) -> Result<()> {
        let jstr = match to_string_pretty(&self) {
            Ok(j) => j,
            Err(e) => return Err(Error::other_error(e)),
        };
        match std::fs::write(filename, jstr) {
            Ok(_) => Ok(()),
            Err(e) => Err(Error::other_error(e)),
        }
    }
}

/// Loads a token from a JSON file
pub fn load_token(filename: &str) -> Result<MemoryToken> {
    JsonObjects::load(filename)?.to_token()
}
