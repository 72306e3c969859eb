/*!
 * Tests for locale fallback and the missing-translation hook
 */

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

use polyglot_columns::drivers::{MissingTranslation, HYBRID_DRIVER, JSON_DRIVER};
use polyglot_columns::errors::CallbackError;
use polyglot_columns::{AttributeBag, Config, DriverOptions, DriverRegistry, DriverSettings};

use crate::common::{init_logging, resolve_driver, registry_with, test_config};

fn bracket_requested(miss: &MissingTranslation<'_>) -> Result<Option<Value>, CallbackError> {
    Ok(Some(json!(format!("[{}]", miss.requested_locale))))
}

fn keep_resolved(_miss: &MissingTranslation<'_>) -> Result<Option<Value>, CallbackError> {
    Ok(None)
}

fn broken_hook(_miss: &MissingTranslation<'_>) -> Result<Option<Value>, CallbackError> {
    Err("hook exploded".into())
}

fn hooked_registry(settings: DriverSettings) -> DriverRegistry {
    init_logging();
    DriverRegistry::new(settings)
}

fn titled_post() -> AttributeBag {
    AttributeBag::new("Post").with_attribute("title", json!({"en": "Hello", "fr": "Bonjour"}))
}

#[test]
fn test_get_withMissingLocale_shouldUseConfiguredFallback() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = titled_post();

    assert_eq!(driver.get(&record, "de", true), Some(json!("Hello")));
    assert_eq!(driver.get(&record, "de", false), None);
}

#[test]
fn test_get_withRecordFallback_shouldOverrideConfig() {
    let registry = registry_with(test_config());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = titled_post().with_fallback_locale("fr");

    assert_eq!(driver.get(&record, "de", true), Some(json!("Bonjour")));
}

#[test]
fn test_get_withoutFallbackLocale_shouldReturnNone() {
    let registry = registry_with(Config::default());
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = AttributeBag::new("Post").with_attribute("title", json!({"es": "Hola"}));

    assert_eq!(driver.get(&record, "de", true), None);
}

#[test]
fn test_get_withFallbackAny_shouldUseFirstTranslatedLocale() {
    let registry = registry_with(Config {
        fallback_any: true,
        ..Config::default()
    });
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = AttributeBag::new("Post").with_attribute("title", json!({"es": "Hola", "fr": "Bonjour"}));

    assert_eq!(driver.get(&record, "de", true), Some(json!("Hola")));
}

#[test]
fn test_get_withFilteredEmptyValue_shouldFallBack() {
    let registry = registry_with(Config {
        fallback_locale: Some("fr".to_string()),
        ..Config::default()
    });
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = AttributeBag::new("Post").with_attribute("title", json!({"en": "", "fr": "Bonjour"}));

    assert_eq!(driver.get(&record, "en", true), Some(json!("Bonjour")));
    assert_eq!(driver.get(&record, "en", false), None);
}

#[test]
fn test_hook_withSubstitute_shouldReplaceFallbackValue() {
    let registry = hooked_registry(
        DriverSettings::new(test_config()).with_missing_translation_hook(bracket_requested),
    );
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());
    let record = titled_post();

    assert_eq!(driver.get(&record, "de", true), Some(json!("[de]")));
    assert_eq!(driver.get(&record, "fr", true), Some(json!("Bonjour")));
}

#[test]
fn test_hook_withNoSubstitute_shouldKeepFallbackValue() {
    let registry = hooked_registry(
        DriverSettings::new(test_config()).with_missing_translation_hook(keep_resolved),
    );
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());

    assert_eq!(driver.get(&titled_post(), "de", true), Some(json!("Hello")));
}

#[test]
fn test_hook_withError_shouldBeSwallowed() {
    let registry = hooked_registry(
        DriverSettings::new(test_config()).with_missing_translation_hook(broken_hook),
    );
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());

    assert_eq!(driver.get(&titled_post(), "de", true), Some(json!("Hello")));
}

#[test]
fn test_hook_shouldReceiveRequestedAndResolvedLocales() {
    let seen: Arc<Mutex<Vec<(String, String, Option<Value>)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let settings = DriverSettings::new(test_config()).with_missing_translation_hook(
        move |miss: &MissingTranslation<'_>| -> Result<Option<Value>, CallbackError> {
            recorder.lock().push((
                miss.requested_locale.to_string(),
                miss.resolved_locale.to_string(),
                miss.value.cloned(),
            ));
            Ok(None)
        },
    );
    let registry = hooked_registry(settings);
    let driver = resolve_driver(
        &registry,
        "title",
        HYBRID_DRIVER,
        DriverOptions::default().with_base_locale("en"),
    );
    let record = AttributeBag::new("Post").with_attribute("title", json!("Hello"));

    assert_eq!(driver.get(&record, "de", true), Some(json!("Hello")));
    assert_eq!(driver.get(&record, "en", true), Some(json!("Hello")));

    assert_eq!(
        seen.lock().clone(),
        vec![("de".to_string(), "en".to_string(), Some(json!("Hello")))]
    );
}

#[test]
fn test_hook_withNothingTranslated_shouldNotBeCalled() {
    let registry = hooked_registry(
        DriverSettings::new(test_config()).with_missing_translation_hook(bracket_requested),
    );
    let driver = resolve_driver(&registry, "title", JSON_DRIVER, DriverOptions::default());

    assert_eq!(driver.get(&AttributeBag::new("Post"), "de", true), None);
}
