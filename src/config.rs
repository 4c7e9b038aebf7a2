// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Configuration file support
//!
//! The configuration describes the vendor extensions of the tokens the
//! application talks to: names and payload types of vendor attributes,
//! and vendor key types that should be handled as a standard one.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::attribute::AttrType;
use crate::error::{Error, Result};
use crate::object::{set_code_converter, KeyTypeMap};
use crate::pkcs11::vendor::is_vendor_defined;
use crate::pkcs11::*;
use crate::registry::{self, VendorAttr};

use serde::de;
use serde::{Deserialize, Serialize};
use toml;

#[cfg(not(test))]
const DEFAULT_CONF_DIR: &str = {
    match option_env!("CONFDIR") {
        Some(p) => p,
        None => "/usr/local/etc",
    }
};
#[cfg(test)]
const DEFAULT_CONF_DIR: &str = "test";

pub const DEFAULT_CONF_NAME: &str = "objects.conf";

/// A vendor attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: CK_ATTRIBUTE_TYPE,
    pub name: String,
    #[serde(rename = "type")]
    pub atype: String,
}

/// A vendor key type handled as a standard key type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyTypeAlias {
    pub vendor: CK_KEY_TYPE,
    /// The standard key type name, e.g. `CKK_EC`
    pub generic: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub attribute: Vec<Attribute>,
    #[serde(default)]
    pub key_type: Vec<KeyTypeAlias>,
}

fn config_error<E: de::Error + Send + Sync + 'static>(error: E) -> Error {
    Error::ck_rv_from_error(CKR_ARGUMENTS_BAD, error)
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn find_conf() -> Result<String> {
        /* First check for our own env var,
         * this has the highest precedence */
        if let Ok(var) = env::var("P11OBJECTS_CONF") {
            return Ok(var);
        }
        let conffile = match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => format!("{}/p11objects/{}", xdg, DEFAULT_CONF_NAME),
            Err(_) => match env::var("HOME") {
                Ok(home) => format!(
                    "{}/.config/p11objects/{}",
                    home, DEFAULT_CONF_NAME
                ),
                Err(_) => format!(
                    "{}/p11objects/{}",
                    DEFAULT_CONF_DIR, DEFAULT_CONF_NAME
                ),
            },
        };
        if Path::new(&conffile).is_file() {
            Ok(conffile)
        } else {
            Err(CKR_ARGUMENTS_BAD)?
        }
    }

    /// Loads the configuration file found by [Config::find_conf], an
    /// empty configuration is returned when there is none
    pub fn load() -> Result<Config> {
        match Config::find_conf() {
            Ok(filename) => Config::from_file(&filename),
            Err(_) => Ok(Config::new()),
        }
    }

    pub fn from_file(filename: &str) -> Result<Config> {
        let config_str = fs::read_to_string(filename)?;
        Config::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Config> {
        let conf: Config = toml::from_str(config_str).map_err(config_error)?;
        Ok(conf)
    }

    /// The vendor attributes to register
    pub fn vendor_attrs(&self) -> Result<Vec<VendorAttr>> {
        let mut attrs = Vec::with_capacity(self.attribute.len());
        for a in &self.attribute {
            if !is_vendor_defined(a.id) {
                return Err(Error::ck_rv_with_errmsg(
                    CKR_ARGUMENTS_BAD,
                    format!("{} is not a vendor attribute", a.name),
                ));
            }
            attrs.push(VendorAttr {
                id: a.id,
                name: a.name.clone(),
                atype: AttrType::from_config_name(&a.atype)?,
            });
        }
        Ok(attrs)
    }

    /// The key type converter described by the `key_type` aliases
    pub fn key_type_map(&self) -> Result<KeyTypeMap> {
        let mut map = KeyTypeMap::new();
        for k in &self.key_type {
            match registry::key_type_by_name(&k.generic) {
                Some(generic) => map.add(k.vendor, generic),
                None => {
                    return Err(Error::ck_rv_with_errmsg(
                        CKR_ARGUMENTS_BAD,
                        format!("unknown key type {}", k.generic),
                    ))
                }
            }
        }
        Ok(map)
    }

    /// Initializes the registry with the vendor attributes and installs
    /// the key type converter
    ///
    /// Must run before any attribute is created.
    pub fn apply(&self) -> Result<()> {
        let map = self.key_type_map()?;
        registry::init(&self.vendor_attrs()?)?;
        if !map.is_empty() {
            set_code_converter(Some(Arc::new(map)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serial_test::serial;

    static CONF: &str = r#"
[[attribute]]
id = 0x80000101
name = "ACME_SLOT_INDEX"
type = "num"

[[key_type]]
vendor = 0x80000041
generic = "CKK_EC"
"#;

    #[test]
    fn parse_conf() {
        let conf = Config::parse(CONF).unwrap();
        let attrs = conf.vendor_attrs().unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].id, 0x80000101);
        assert_eq!(attrs[0].atype, AttrType::NumType);

        use crate::object::CodeConverter;
        let map = conf.key_type_map().unwrap();
        assert_eq!(map.convert_key_type(0x80000041), CKK_EC);
        assert_eq!(map.convert_key_type(CKK_RSA), CKK_RSA);
    }

    #[test]
    fn bad_conf() {
        assert!(Config::parse("attribute = 3").is_err());
        let conf = Config::parse(
            "[[attribute]]\nid = 0x101\nname = \"X\"\ntype = \"num\"\n",
        )
        .unwrap();
        assert_eq!(conf.vendor_attrs().unwrap_err().rv(), CKR_ARGUMENTS_BAD);
        let conf = Config::parse(
            "[[attribute]]\nid = 0x80000001\nname = \"X\"\ntype = \"long\"\n",
        )
        .unwrap();
        assert!(conf.vendor_attrs().is_err());
        let conf =
            Config::parse("[[key_type]]\nvendor = 1\ngeneric = \"CKK_NOPE\"\n")
                .unwrap();
        assert!(conf.key_type_map().is_err());
    }

    #[test]
    #[serial]
    fn load_from_env() {
        env::set_var("P11OBJECTS_CONF", "testdata/objects.conf");
        assert_eq!(Config::find_conf().unwrap(), "testdata/objects.conf");
        let conf = Config::load().unwrap();
        let attrs = conf.vendor_attrs().unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].name, "ACME_POLICY");
        assert_eq!(attrs[1].atype, AttrType::BytesType);
        assert!(!conf.key_type_map().unwrap().is_empty());

        env::set_var("P11OBJECTS_CONF", "testdata/missing.conf");
        assert!(Config::load().is_err());
        env::remove_var("P11OBJECTS_CONF");
    }

    #[test]
    fn apply_after_use() {
        let conf = Config::parse(CONF).unwrap();
        /* the registry is populated on first use */
        let _ = registry::attr_name(CKA_LABEL);
        let err = conf.apply().unwrap_err();
        assert_eq!(err.rv(), CKR_CRYPTOKI_ALREADY_INITIALIZED);
    }
}
