/*!
 * Tests for error types and their classification
 */

use polyglot_columns::errors::TranslatableError;

#[test]
fn test_unknownDriver_shouldDisplayDriverName() {
    let error = TranslatableError::UnknownDriver("redis".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Unknown translation driver"));
    assert!(display.contains("redis"));
}

#[test]
fn test_nestedPathUnsupported_shouldDisplayDriverAndAttribute() {
    let error = TranslatableError::NestedPathUnsupported {
        driver: "hybrid".to_string(),
        attribute: "meta->title".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("hybrid"));
    assert!(display.contains("meta->title"));
}

#[test]
fn test_notTranslatable_shouldDisplayAttribute() {
    let error = TranslatableError::NotTranslatable("slug".to_string());
    assert_eq!(format!("{}", error), "Attribute 'slug' is not translatable");
}

#[test]
fn test_isConfigurationError_shouldSeparateMisuseFromConfig() {
    assert!(TranslatableError::UnknownDriver("x".to_string()).is_configuration_error());
    assert!(TranslatableError::InvalidAttributePath("->".to_string()).is_configuration_error());
    assert!(TranslatableError::InvalidIdentifier("a b".to_string()).is_configuration_error());
    assert!(!TranslatableError::NotTranslatable("slug".to_string()).is_configuration_error());
    assert!(!TranslatableError::Driver("boom".to_string()).is_configuration_error());
}
