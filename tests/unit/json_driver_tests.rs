/*!
 * Tests for the JSON column layout
 */

use serde_json::{json, Value};

use polyglot_columns::drivers::JSON_DRIVER;
use polyglot_columns::query::{ColumnPath, Predicate};
use polyglot_columns::{AttributeBag, DriverOptions, Record};

use crate::common::{decoded, locale_map, registry_with, resolve_driver, retaining_config, test_config};

#[test]
fn test_set_thenGet_shouldRoundTripEveryValueKind() {
    let registry = registry_with(retaining_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post");

    let values = [
        json!("Hello"),
        json!(""),
        json!("Grüße / こんにちは"),
        json!(null),
        json!(42),
        json!({"nested": ["a", 1]}),
    ];
    for (i, value) in values.iter().enumerate() {
        let locale = format!("l{}", i);
        driver.set(&mut record, &locale, value.clone()).unwrap();
        assert_eq!(driver.get(&record, &locale, false), Some(value.clone()));
    }
}

#[test]
fn test_get_withMalformedColumn_shouldDegradeToNoTranslations() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = AttributeBag::new("Post").with_attribute("title", json!("{not json"));

    assert_eq!(driver.get(&record, "en", true), None);
    assert!(driver.all(&record, None).is_empty());
}

#[test]
fn test_set_withMalformedColumn_shouldOverwriteWithValidObject() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post").with_attribute("title", json!("{not json"));

    driver.set(&mut record, "en", json!("Hello")).unwrap();
    assert_eq!(decoded(record.raw_attribute("title")), json!({"en": "Hello"}));
}

#[test]
fn test_all_withAllowedLocales_shouldRestrictAndFilterEmpty() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = AttributeBag::new("Post").with_attribute(
        "title",
        json!({"en": "Hello", "es": "Hola", "fr": "Bonjour", "de": ""}),
    );

    assert_eq!(
        Value::Object(driver.all(&record, Some(&["fr"][..]))),
        json!({"fr": "Bonjour"})
    );
    assert_eq!(
        driver.translated_locales(&record),
        vec!["en".to_string(), "es".to_string(), "fr".to_string()]
    );
    assert!(!driver.has(&record, "de"));
}

#[test]
fn test_forget_twice_shouldBeNoOp() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post");
    driver
        .set_many(&mut record, locale_map(json!({"en": "Hello", "fr": "Bonjour"})))
        .unwrap();

    driver.forget(&mut record, "fr").unwrap();
    let after_first = record.clone();
    driver.forget(&mut record, "fr").unwrap();

    assert_eq!(record, after_first);
    assert_eq!(decoded(record.raw_attribute("title")), json!({"en": "Hello"}));
}

#[test]
fn test_forget_onAbsentColumn_shouldNotCreateIt() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post");

    driver.forget(&mut record, "fr").unwrap();
    assert!(!record.has_attribute("title"));
}

#[test]
fn test_forgetAll_shouldHonourAsNull() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post").with_attribute("title", json!({"en": "Hello"}));

    driver.forget_all(&mut record, false).unwrap();
    assert_eq!(record.raw_attribute("title"), Some(&json!("{}")));

    driver.set(&mut record, "en", json!("Hello")).unwrap();
    driver.forget_all(&mut record, true).unwrap();
    assert_eq!(record.raw_attribute("title"), Some(&Value::Null));
}

#[test]
fn test_replace_shouldDropLocalesNotGiven() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post")
        .with_attribute("title", json!({"en": "Hello", "fr": "Bonjour"}));

    driver
        .replace(&mut record, locale_map(json!({"es": "Hola"})))
        .unwrap();

    assert_eq!(decoded(record.raw_attribute("title")), json!({"es": "Hola"}));
}

#[test]
fn test_nestedPath_shouldReadAndWriteInsideLargerDocument() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "meta->seo->title", JSON_DRIVER, DriverOptions::default());
    let mut record = AttributeBag::new("Post").with_attribute(
        "meta",
        json!({"seo": {"title": {"en": "Hello"}, "robots": "index"}, "views": 3}),
    );

    assert_eq!(driver.get(&record, "en", false), Some(json!("Hello")));
    driver.set(&mut record, "fr", json!("Bonjour")).unwrap();

    assert_eq!(
        decoded(record.raw_attribute("meta")),
        json!({"seo": {"title": {"en": "Hello", "fr": "Bonjour"}, "robots": "index"}, "views": 3})
    );
}

#[test]
fn test_predicates_shouldUseColumnPath() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());

    assert_eq!(
        driver.locale_predicate("fr"),
        Predicate::NotNull(ColumnPath::column("title").key("fr"))
    );
    assert_eq!(
        driver.any_locale_predicate(&["fr", "es"]),
        Predicate::Or(vec![
            Predicate::NotNull(ColumnPath::column("title").key("fr")),
            Predicate::NotNull(ColumnPath::column("title").key("es")),
        ])
    );
}
