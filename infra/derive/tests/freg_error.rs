use freg_derive::freg_error;
use std::borrow::Cow;

#[freg_error]
pub enum RegistryError {
    #[error("Validation failed{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn failing_io() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk gone"))
}

#[test]
fn freg_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/freg_error_pass.rs");
}

#[test]
fn kind_is_snake_case_variant_name() {
    let validation =
        RegistryError::Validation { message: "name is empty".into(), context: None };
    assert_eq!(validation.kind(), "validation");
    let internal = RegistryError::Internal { message: "boom".into(), context: None };
    assert_eq!(internal.kind(), "internal");
    assert_eq!(RegistryError::from(std::io::Error::other("x")).kind(), "io");
}

#[test]
fn context_is_attached_to_source_errors() {
    let err = failing_io().context("Writing record").unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
    assert_eq!(err.to_string(), "Hardware I/O failure (Writing record): disk gone");
}

#[test]
fn context_overrides_existing_error_context() {
    let res: Result<(), RegistryError> =
        Err(RegistryError::Internal { message: "first".into(), context: Some("old".into()) });
    let err = res.context("second").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (second): first");
}

#[test]
fn with_context_sets_the_note_on_any_variant() {
    let err = RegistryError::Validation { message: "name is empty".into(), context: None }
        .with_context(format!("facility {}", 7));
    assert_eq!(err.kind(), "validation");
    assert_eq!(err.to_string(), "Validation failed (facility 7): name is empty");
}
