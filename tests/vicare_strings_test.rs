//! Behaviour of the bundled ViCare strings.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;

use googletest::prelude::*;
use rstest::*;
use vicare_i18n::catalog::{
    FlowStep,
    Platform,
    TranslatedError,
};
use vicare_i18n::input::shared::SharedStrings;
use vicare_i18n::{
    ParseError,
    TranslationCatalog,
    TranslationError,
    bundled,
};

#[fixture]
fn catalog() -> TranslationCatalog {
    bundled::catalog().unwrap()
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

#[rstest]
#[case("entity.sensor.outside_temperature.name", "Outside temperature")]
#[case("entity.binary_sensor.burner.name", "Burner")]
#[case("config.step.user.data.client_id", "Client ID")]
fn literal_strings_resolve_unchanged(
    catalog: TranslationCatalog,
    #[case] key: &str,
    #[case] expected: &str,
) {
    assert_eq!(catalog.resolve(key).unwrap(), expected);
}

#[rstest]
fn aliased_entity_shares_its_target_name(catalog: TranslationCatalog) {
    let alias = catalog.entity_name("en", Platform::Number, "normal_heating_temperature").unwrap();
    let target = catalog.entity_name("en", Platform::Number, "normal_temperature").unwrap();

    assert_eq!(alias, target);
}

#[rstest]
#[case("config.step.user.data.username", "Email")]
#[case("config.step.user.data.password", "Password")]
#[case("config.error.invalid_auth", "Invalid authentication")]
#[case("config.abort.unknown", "Unexpected error")]
fn common_references_resolve_through_host_namespace(
    catalog: TranslationCatalog,
    #[case] key: &str,
    #[case] expected: &str,
) {
    assert_eq!(catalog.resolve(key).unwrap(), expected);
}

#[rstest]
fn reauth_step_reuses_user_step_strings(catalog: TranslationCatalog) {
    assert_that!(
        catalog.step_field_label("en", FlowStep::ReauthConfirm, "client_id").unwrap(),
        eq(&catalog.step_field_label("en", FlowStep::User, "client_id").unwrap())
    );
    assert_that!(
        catalog.step_field_description("en", FlowStep::ReauthConfirm, "password").unwrap(),
        eq("The password to log in to your ViCare account.")
    );
}

#[rstest]
fn program_unknown_message_is_formatted(catalog: TranslationCatalog) {
    let message =
        catalog.exception_message("en", "program_unknown", &params(&[("preset", "eco")])).unwrap();

    assert_eq!(message, "Cannot translate preset eco into a valid ViCare program");
}

#[rstest]
fn missing_placeholder_value_is_an_error(catalog: TranslationCatalog) {
    let result = catalog.exception_message("en", "program_not_activated", &params(&[]));

    assert!(matches!(
        result,
        Err(TranslationError::MissingPlaceholder { placeholder }) if placeholder == "program"
    ));
}

#[rstest]
fn german_strings_resolve_with_english_fallback(catalog: TranslationCatalog) {
    assert_that!(
        catalog.entity_name("de", Platform::Sensor, "outside_temperature").unwrap(),
        eq("Außentemperatur")
    );
    assert_that!(
        catalog.entity_name("de", Platform::Number, "normal_heating_temperature").unwrap(),
        eq("Normaltemperatur")
    );
    assert_that!(
        catalog.step_field_label("de", FlowStep::ReauthConfirm, "client_id").unwrap(),
        eq("Client-ID")
    );
    // The alias is only in the source strings, its target is translated.
    assert_that!(
        catalog.entity_name("de", Platform::Number, "reduced_heating_temperature").unwrap(),
        eq("Reduzierte Temperatur")
    );
    assert_that!(
        catalog.step_field_description("de", FlowStep::User, "password").unwrap(),
        eq("The password to log in to your ViCare account.")
    );
}

#[rstest]
fn german_exception_is_formatted(catalog: TranslationCatalog) {
    let error = TranslatedError::new("vicare", "program_unknown").with_placeholder("preset", "eco");

    assert_eq!(
        catalog.render_error("de", &error),
        "Voreinstellung eco kann keinem gültigen ViCare-Programm zugeordnet werden"
    );
}

#[rstest]
fn unknown_key_is_not_found(catalog: TranslationCatalog) {
    assert!(matches!(
        catalog.resolve("entity.sensor.does_not_exist.name"),
        Err(TranslationError::KeyNotFound { .. })
    ));
}

#[rstest]
fn unresolved_reference_fails_to_load() {
    let source = r#"{"config": {"abort": {"gone": "[%key:common::config_flow::abort::no_such_reason%]"}}}"#;

    let result = TranslationCatalog::load("vicare", source, bundled::common_strings().unwrap());

    assert!(matches!(result, Err(TranslationError::UnresolvedReference { key, .. }) if key == "config.abort.gone"));
}

#[rstest]
fn duplicate_entity_key_fails_to_load() {
    let source = r#"{
  "entity": {
    "binary_sensor": {
      "burner": { "name": "Burner" },
      "burner": { "name": "Burner 2" }
    }
  }
}"#;

    let result = TranslationCatalog::load("vicare", source, SharedStrings::empty());

    match result {
        Err(TranslationError::Parse(ParseError::DuplicateKey { key, .. })) => {
            assert_eq!(key, "entity.binary_sensor.burner");
        }
        other => panic!("expected a duplicate key error, got {other:?}"),
    }
}

#[rstest]
fn every_bundled_string_resolves(catalog: TranslationCatalog) {
    for language in ["en", "de"] {
        let strings = catalog.host_strings(language).unwrap();

        assert_that!(strings.is_empty(), eq(false));
        assert!(strings.keys().all(|key| key.starts_with("component.vicare.")));
        assert!(strings.values().all(|value| !value.contains("[%key:")), "{strings:?}");
    }
}

#[rstest]
fn bundled_sources_have_no_errors() {
    let diagnostics = bundled::sources().unwrap().diagnose();

    assert!(
        diagnostics.iter().all(|d| d.severity != vicare_i18n::catalog::Severity::Error),
        "{diagnostics:?}"
    );
}
