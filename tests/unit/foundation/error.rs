use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LayerpressError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(LayerpressError::asset("x").to_string().contains("asset error:"));
    assert!(
        LayerpressError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        LayerpressError::subprocess("x")
            .to_string()
            .contains("subprocess error:")
    );
    assert!(
        LayerpressError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(LayerpressError::io("x").to_string().contains("io error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LayerpressError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn context_keeps_kind_and_prefixes_message() {
    let err = LayerpressError::render("payload too long").context("overlay 2 (qr)");
    assert!(matches!(err, LayerpressError::Render(_)));
    assert_eq!(
        err.to_string(),
        "render error: overlay 2 (qr): payload too long"
    );
}

#[test]
fn only_config_errors_are_run_fatal() {
    assert!(LayerpressError::config("x").is_run_fatal());
    assert!(!LayerpressError::asset("x").is_run_fatal());
    assert!(!LayerpressError::subprocess("x").is_run_fatal());
    assert!(!LayerpressError::io("x").is_run_fatal());
}
