// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use super::*;

use serial_test::parallel;

#[test]
#[parallel]
fn test_absent_attributes_are_equal() {
    /* different types, one of them was sensitive before being unset */
    let a = Attribute::new(CKA_LABEL);
    let mut b = Attribute::new(CKA_ID);
    b.set_sensitive(true);
    assert_ne!(a, b);
    b.set_present(false);
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());

    /* a present empty value is not absent */
    let mut c = Attribute::new(CKA_LABEL);
    c.set_present(true);
    assert_ne!(a, c);

    /* objects of different kinds compare by their attributes */
    let empty_aes = Object::new(ObjectKind::AesKey);
    let empty_tmpl = Object::new_generic_template();
    assert_eq!(empty_aes, empty_tmpl);
    assert_eq!(empty_aes.hash_code(), empty_tmpl.hash_code());
}

#[test]
#[parallel]
fn test_sensitive_implies_present() {
    let mut a = Attribute::new(CKA_VALUE);
    a.set_sensitive(true);
    assert!(a.is_present());
    assert_eq!(a.state(), AttrState::Sensitive);

    a.set_present(false);
    assert!(!a.is_sensitive());

    /* marking present keeps the sensitive state */
    a.set_sensitive(true);
    a.set_present(true);
    assert!(a.is_sensitive());

    /* a fresh value clears it */
    a.set_value(AttrValue::Bytes(vec![1])).unwrap();
    assert!(!a.is_sensitive());
    assert_eq!(a.to_bytes().unwrap(), &vec![1]);
}

#[test]
#[parallel]
fn test_export_import_round_trip() {
    for kind in ObjectKind::ALL {
        if kind == ObjectKind::Template {
            continue;
        }
        let mut tmpl = Object::new_typed_template(kind);
        let mut set = Vec::new();
        for oa in kind.schema() {
            let t = oa.get_type();
            let atype = registry::attr_type(t);
            if let Some(v) = sample_value(atype) {
                tmpl.put_attr(t, v).unwrap();
                set.push(t);
            }
        }

        let exported = tmpl.export_legal_attributes();
        let mut fresh = Object::new(kind);
        fresh.import_raw(&exported).unwrap();

        for t in set {
            assert_eq!(
                tmpl.get_attr(t),
                fresh.get_attr(t),
                "{} differs on {}",
                kind,
                registry::attr_name(t)
            );
        }
        assert_eq!(tmpl, fresh, "{} differs", kind);
        assert_eq!(tmpl.hash_code(), fresh.hash_code());
    }
}

#[test]
#[parallel]
fn test_export_generic_search_template() {
    let mut tmpl = Object::new_generic_template();
    tmpl.put_attr(CKA_ID, AttrValue::Bytes(hex::decode("AA55").unwrap()))
        .unwrap();
    let exported = tmpl.export_legal_attributes();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0], RawAttr::from_bytes(CKA_ID, vec![0xAA, 0x55]));

    /* an absent cell is not exported */
    tmpl.put_attr(CKA_LABEL, AttrValue::String(String::from("x")))
        .unwrap();
    tmpl.get_attr_mut(CKA_LABEL).unwrap().set_present(false);
    assert_eq!(tmpl.export_legal_attributes().len(), 1);
}

#[test]
#[parallel]
fn test_fetch_everything_template() {
    let mut tmpl = Object::new(ObjectKind::AesKey);
    tmpl.set_all_present(true);
    let requested = tmpl.export_legal_attributes();
    assert_eq!(requested.len(), ObjectKind::AesKey.schema().len());
    assert!(requested
        .iter()
        .all(|a| a.value == RawValue::Bytes(Vec::new())));

    tmpl.set_all_present(false);
    assert!(tmpl.export_legal_attributes().is_empty());
}

#[test]
#[parallel]
fn test_order_independent_equality() {
    let mut a = Object::new_generic_template();
    a.put_attr(CKA_ID, AttrValue::Bytes(vec![1])).unwrap();
    a.put_attr(CKA_TOKEN, AttrValue::Bool(true)).unwrap();

    let mut b = Object::new_generic_template();
    b.put_attr(CKA_TOKEN, AttrValue::Bool(true)).unwrap();
    b.put_attr(CKA_ID, AttrValue::Bytes(vec![1])).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());

    b.put_attr(CKA_TOKEN, AttrValue::Bool(false)).unwrap();
    assert_ne!(a, b);
}

#[test]
#[parallel]
fn test_nested_template_display() {
    let mut inner = Object::new_generic_template();
    inner.put_attr(CKA_EXTRACTABLE, AttrValue::Bool(false)).unwrap();

    let mut key = Object::new(ObjectKind::SecretKey);
    key.put_attr(CKA_UNWRAP_TEMPLATE, AttrValue::Template(Box::new(inner)))
        .unwrap();
    let s = key.to_display_string(0);
    assert!(s.starts_with("SecretKey (template)\n  CKA_CLASS: "));
    assert!(s.contains(
        "  CKA_UNWRAP_TEMPLATE: \n    Template (template)\n      \
         CKA_EXTRACTABLE: false"
    ));
    assert_eq!(
        key.get_attr_as_template(CKA_UNWRAP_TEMPLATE)
            .unwrap()
            .get_attr_as_bool(CKA_EXTRACTABLE),
        Some(false)
    );
}

#[test]
#[parallel]
fn test_typed_getters() {
    let mut key = Object::new_typed_template(ObjectKind::RsaPublicKey);
    key.put_attr(CKA_MODULUS_BITS, AttrValue::Ulong(2048)).unwrap();
    key.put_attr(CKA_LABEL, AttrValue::String(String::from("pub")))
        .unwrap();
    assert_eq!(key.get_attr_as_ulong(CKA_MODULUS_BITS), Some(2048));
    assert_eq!(key.get_attr_as_string(CKA_LABEL), Some("pub"));
    /* wrong type, not present, not legal */
    assert_eq!(key.get_attr_as_bool(CKA_MODULUS_BITS), None);
    assert_eq!(key.get_attr_as_bytes(CKA_MODULUS), None);
    assert_eq!(key.get_attr_as_bytes(CKA_PRIME_1), None);

    /* boolean checkers fall back to their defaults */
    assert!(!key.is_token());
    assert!(key.is_modifiable());
    assert!(!key.is_sensitive());
    assert!(key.is_extractable());
    assert_eq!(
        key.put_attr(CKA_TOKEN, AttrValue::Ulong(1)).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
#[parallel]
fn test_set_whole_cells() {
    let mut key = Object::new(ObjectKind::AesKey);
    key.set_attr(Attribute::from_bool(CKA_TOKEN, true)).unwrap();
    key.set_attr(Attribute::from_ulong(CKA_VALUE_LEN, 16)).unwrap();
    assert!(key.is_token());
    assert_eq!(key.get_attr_as_ulong(CKA_VALUE_LEN), Some(16));

    /* cells built without checks are still verified */
    let err = key
        .set_attr(Attribute::from_ulong(CKA_TOKEN, 5))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(key.is_token());
    let bad_date = CkDate {
        year: 2024,
        month: 13,
        day: 40,
    };
    assert!(key
        .set_attr(Attribute::from_date(CKA_START_DATE, bad_date))
        .is_err());
    assert!(!key.get_attr(CKA_START_DATE).unwrap().is_present());

    /* not legal for the kind */
    let err = key
        .set_attr(Attribute::from_bytes(CKA_MODULUS, vec![1]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedAttribute);

    /* absent and sensitive cells carry no value to check */
    let mut secret = Attribute::new(CKA_VALUE);
    secret.set_sensitive(true);
    key.set_attr(secret).unwrap();
    assert!(key.get_attr(CKA_VALUE).unwrap().is_sensitive());
    key.set_attr(Attribute::new(CKA_TOKEN)).unwrap();
    assert!(!key.is_token());

    let exported = key.export_legal_attributes();
    assert_eq!(exported, vec![RawAttr::from_ulong(CKA_VALUE_LEN, 16)]);
}

#[test]
#[parallel]
fn test_schema_defaults() {
    let schema = ObjectKind::RsaPrivateKey.schema();
    let sensitive = schema
        .iter()
        .find(|oa| oa.get_type() == CKA_SENSITIVE)
        .unwrap();
    assert!(sensitive.has_default());
    assert_eq!(sensitive.default_value().unwrap().to_bool().unwrap(), true);

    let exponent = schema
        .iter()
        .find(|oa| oa.get_type() == CKA_PRIVATE_EXPONENT)
        .unwrap();
    assert!(exponent.is(OAFlags::Sensitive));
    assert!(!exponent.has_default());

    let class = schema.iter().find(|oa| oa.get_type() == CKA_CLASS).unwrap();
    assert!(class.is(OAFlags::Discriminator));
    assert!(!class.is(OAFlags::empty()));

    /* the second level discriminator comes from the schema flags */
    for (kind, attr) in [
        (ObjectKind::RsaPrivateKey, Some(CKA_KEY_TYPE)),
        (ObjectKind::SecretKey, Some(CKA_KEY_TYPE)),
        (ObjectKind::EcParameters, Some(CKA_KEY_TYPE)),
        (ObjectKind::X509Certificate, Some(CKA_CERTIFICATE_TYPE)),
        (ObjectKind::Clock, Some(CKA_HW_FEATURE_TYPE)),
        (ObjectKind::Data, None),
        (ObjectKind::Generic, None),
        (ObjectKind::Template, None),
    ] {
        assert_eq!(kind.subtype_attr(), attr, "{kind}");
    }
}
