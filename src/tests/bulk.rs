// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use super::*;

use crate::object::bulk::{read_many, read_one};

use serial_test::parallel;

#[test]
#[parallel]
fn test_rsa_private_key_read() {
    let token = MemoryToken::new();
    let handle = add_rsa_private_key(&token);
    /* unrelated attribute the key does not carry */
    token
        .inject_error(handle, CKA_EC_PARAMS, CKR_ATTRIBUTE_TYPE_INVALID)
        .unwrap();

    let key =
        Object::read(ObjectKind::RsaPrivateKey, &token, SESSION, handle)
            .unwrap();
    assert_eq!(key.get_handle(), handle);
    assert!(!key.is_template());

    let exp = key.get_attr(CKA_PRIVATE_EXPONENT).unwrap();
    assert!(exp.is_present());
    assert!(exp.is_sensitive());
    assert_eq!(exp.to_display_string(false), "<Value is sensitive>");

    assert_eq!(
        key.get_attr_as_bytes(CKA_MODULUS),
        Some(&vec![0x01, 0x02, 0x03])
    );
    assert_eq!(key.get_attr_as_string(CKA_LABEL), Some("Test RSA Key"));
    assert!(key.is_token());
    assert!(key.is_private());
    assert!(key.is_sensitive());
    assert!(!key.get_attr(CKA_PRIME_1).unwrap().is_present());
    assert!(key.get_attr(CKA_EC_PARAMS).is_none());
}

#[test]
#[parallel]
fn test_batch_failure_falls_back() {
    /* the batch aborts on the sensitive exponent and on every missing
     * attribute, the serial reads must sort it out */
    let token = MemoryToken::new();
    let handle = add_rsa_private_key(&token);
    let schema_len = ObjectKind::RsaPrivateKey.schema().len();

    let key =
        Object::read(ObjectKind::RsaPrivateKey, &token, SESSION, handle)
            .unwrap();
    assert_eq!(token.batch_reads(), 1);
    assert_eq!(token.single_reads(), schema_len);

    for a in key.get_attributes() {
        let stored = token.object_attrs(handle).unwrap();
        match find_raw(&stored, a.get_type()) {
            Some(raw) => {
                assert!(a.is_present(), "{} missing", a.name());
                if a.get_type() == CKA_PRIVATE_EXPONENT {
                    assert!(a.is_sensitive());
                } else {
                    assert_eq!(a.to_raw().unwrap(), raw.value);
                }
            }
            None => assert!(!a.is_present(), "{} present", a.name()),
        }
    }
}

#[test]
#[parallel]
fn test_batch_success() {
    let token = MemoryToken::new();
    let handle = token
        .add_object(vec![
            RawAttr::from_ulong(CKA_CLASS, CKO_HW_FEATURE),
            RawAttr::from_ulong(CKA_HW_FEATURE_TYPE, CKH_CLOCK),
            RawAttr::from_bytes(CKA_VALUE, b"2024013112000000".to_vec()),
        ])
        .unwrap();
    let clock =
        Object::read(ObjectKind::Clock, &token, SESSION, handle).unwrap();
    assert_eq!(token.batch_reads(), 1);
    assert_eq!(token.single_reads(), 0);
    assert_eq!(
        clock.get_attr_as_bytes(CKA_VALUE),
        Some(&b"2024013112000000".to_vec())
    );
}

#[test]
#[parallel]
fn test_batch_modes() {
    for mode in [BatchMode::Broken, BatchMode::Unsupported] {
        let token = MemoryToken::new().with_batch_mode(mode);
        let handle = add_rsa_private_key(&token);
        let key =
            Object::read(ObjectKind::RsaPrivateKey, &token, SESSION, handle)
                .unwrap();
        assert_eq!(token.batch_reads(), 1);
        assert_eq!(
            key.get_attr_as_bytes(CKA_PUBLIC_EXPONENT),
            Some(&vec![0x01, 0x00, 0x01])
        );
        assert!(key.get_attr(CKA_PRIVATE_EXPONENT).unwrap().is_sensitive());

        /* a broken batch is retried on every read */
        token.reset_counters();
        assert_eq!(token.single_reads(), 0);
        let mut key = key;
        key.read_attributes(&token, SESSION).unwrap();
        assert_eq!(token.batch_reads(), 1);
        assert_eq!(
            token.single_reads(),
            ObjectKind::RsaPrivateKey.schema().len()
        );
    }
}

#[test]
#[parallel]
fn test_fatal_errors_propagate() {
    let token = MemoryToken::new();
    let handle = add_rsa_private_key(&token);
    token
        .inject_error(handle, CKA_LABEL, CKR_DEVICE_ERROR)
        .unwrap();
    let err = Object::read(ObjectKind::RsaPrivateKey, &token, SESSION, handle)
        .unwrap_err();
    assert_eq!(err.rv(), CKR_DEVICE_ERROR);

    let err = Object::read(ObjectKind::Data, &token, SESSION, handle + 100)
        .unwrap_err();
    assert_eq!(err.rv(), CKR_OBJECT_HANDLE_INVALID);

    let err = read_one(&token, CK_INVALID_HANDLE, handle, CKA_CLASS)
        .unwrap_err();
    assert_eq!(err.rv(), CKR_SESSION_HANDLE_INVALID);
}

#[test]
#[parallel]
fn test_empty_and_template_reads() {
    let token = MemoryToken::new();
    let handle = add_rsa_private_key(&token);
    read_many(&token, SESSION, handle, &mut []).unwrap();
    assert_eq!(token.batch_reads(), 0);
    assert_eq!(token.single_reads(), 0);

    let mut tmpl = Object::new(ObjectKind::RsaPrivateKey);
    let err = tmpl.read_attributes(&token, SESSION).unwrap_err();
    assert_eq!(err.rv(), CKR_OBJECT_HANDLE_INVALID);

    let class = read_one(&token, SESSION, handle, CKA_CLASS).unwrap();
    assert_eq!(class.to_ulong().unwrap(), CKO_PRIVATE_KEY);
    let missing = read_one(&token, SESSION, handle, CKA_VALUE).unwrap();
    assert!(!missing.is_present());
}

#[test]
#[parallel]
fn test_reread_updates_cells() {
    let token = MemoryToken::new();
    let handle = token
        .add_object(vec![
            RawAttr::from_ulong(CKA_CLASS, CKO_DATA),
            RawAttr::from_bytes(CKA_APPLICATION, b"app".to_vec()),
        ])
        .unwrap();
    let mut data =
        Object::read(ObjectKind::Data, &token, SESSION, handle).unwrap();
    assert_eq!(data.get_attr_as_string(CKA_APPLICATION), Some("app"));

    token
        .inject_error(handle, CKA_APPLICATION, CKR_ATTRIBUTE_SENSITIVE)
        .unwrap();
    data.read_attributes(&token, SESSION).unwrap();
    assert!(data.get_attr(CKA_APPLICATION).unwrap().is_sensitive());
}
