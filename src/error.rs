// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

//! Error type used by the whole crate
//!
//! Token level failures carry the PKCS#11 return value they originate
//! from, local failures (a payload of the wrong shape, an attribute that
//! is not legal for an object kind) have their own kinds so that callers
//! can tell an application bug from a token refusing an operation.

use std::error;
use std::fmt;

use crate::pkcs11::*;
use crate::registry;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    origin: Option<Box<dyn error::Error + Send + Sync>>,
    errmsg: Option<String>,
    ckrv: CK_RV,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /* A Cryptoki-style error, see ckrv Error field */
    CkError,
    /* A value of the wrong shape for the attribute, see errmsg */
    TypeMismatch,
    /* The attribute is not legal for the object kind, see errmsg */
    UnsupportedAttribute,
    /* The attribute was not found, see errmsg */
    AttributeNotFound,
    /* Other error, see origin */
    Nested,
}

impl Error {
    pub fn ck_rv(ckrv: CK_RV) -> Error {
        Error {
            kind: ErrorKind::CkError,
            origin: None,
            errmsg: None,
            ckrv,
        }
    }

    pub fn ck_rv_from_error<E>(ckrv: CK_RV, error: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error {
            kind: ErrorKind::CkError,
            origin: Some(error.into()),
            errmsg: None,
            ckrv,
        }
    }

    pub fn ck_rv_with_errmsg(ckrv: CK_RV, errmsg: String) -> Error {
        Error {
            kind: ErrorKind::CkError,
            origin: None,
            errmsg: Some(errmsg),
            ckrv,
        }
    }

    /// A payload of the wrong shape was assigned to an attribute
    pub fn type_mismatch(ck_type: CK_ATTRIBUTE_TYPE, expected: &str) -> Error {
        Error {
            kind: ErrorKind::TypeMismatch,
            origin: None,
            errmsg: Some(format!(
                "{} expects a value of type {}",
                registry::attr_name(ck_type),
                expected
            )),
            ckrv: CKR_ATTRIBUTE_VALUE_INVALID,
        }
    }

    /// The attribute type is not part of the object's legal set
    pub fn unsupported_attr(ck_type: CK_ATTRIBUTE_TYPE, kind: &str) -> Error {
        Error {
            kind: ErrorKind::UnsupportedAttribute,
            origin: None,
            errmsg: Some(format!(
                "{} is not an attribute of {}",
                registry::attr_name(ck_type),
                kind
            )),
            ckrv: CKR_ATTRIBUTE_TYPE_INVALID,
        }
    }

    pub fn not_found(errmsg: String) -> Error {
        Error {
            kind: ErrorKind::AttributeNotFound,
            origin: None,
            errmsg: Some(errmsg),
            ckrv: CKR_GENERAL_ERROR,
        }
    }

    pub fn other_error<E>(error: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error {
            kind: ErrorKind::Nested,
            origin: Some(error.into()),
            errmsg: None,
            ckrv: CKR_GENERAL_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn attr_not_found(&self) -> bool {
        self.kind == ErrorKind::AttributeNotFound
    }

    pub fn rv(&self) -> CK_RV {
        self.ckrv
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::CkError => match self.errmsg {
                Some(ref e) => write!(f, "{}", e),
                None => match self.origin {
                    Some(ref o) => {
                        write!(f, "{}: {}", registry::rv_name(self.ckrv), o)
                    }
                    None => write!(f, "{}", registry::rv_name(self.ckrv)),
                },
            },
            ErrorKind::TypeMismatch => match self.errmsg {
                Some(ref e) => write!(f, "type mismatch: {}", e),
                None => write!(f, "type mismatch"),
            },
            ErrorKind::UnsupportedAttribute => match self.errmsg {
                Some(ref e) => write!(f, "unsupported attribute: {}", e),
                None => write!(f, "unsupported attribute"),
            },
            ErrorKind::AttributeNotFound => match self.errmsg {
                Some(ref e) => write!(f, "attribute not found: {}", e),
                None => write!(f, "attribute not found"),
            },
            ErrorKind::Nested => match self.origin {
                Some(ref o) => o.fmt(f),
                None => write!(f, "{}", registry::rv_name(self.ckrv)),
            },
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.origin {
            Some(ref o) => Some(o.as_ref()),
            None => None,
        }
    }
}

impl From<CK_RV> for Error {
    fn from(error: CK_RV) -> Error {
        Error::ck_rv(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::other_error(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::other_error(error)
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Error {
        Error::other_error(error)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Error {
        Error::other_error(error)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(error: std::convert::Infallible) -> Error {
        Error::other_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rv_mapping() {
        let e: Error = CKR_DEVICE_ERROR.into();
        assert_eq!(e.kind(), ErrorKind::CkError);
        assert_eq!(e.rv(), CKR_DEVICE_ERROR);
        assert_eq!(format!("{}", e), "CKR_DEVICE_ERROR");

        let e = Error::type_mismatch(CKA_TOKEN, "bool");
        assert_eq!(e.kind(), ErrorKind::TypeMismatch);
        assert_eq!(e.rv(), CKR_ATTRIBUTE_VALUE_INVALID);
        assert_eq!(
            format!("{}", e),
            "type mismatch: CKA_TOKEN expects a value of type bool"
        );

        let e = Error::unsupported_attr(CKA_MODULUS, "CKO_DATA");
        assert_eq!(e.kind(), ErrorKind::UnsupportedAttribute);
        assert_eq!(e.rv(), CKR_ATTRIBUTE_TYPE_INVALID);
    }
}
