use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MoonriseError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MoonriseError::unsupported("x")
            .to_string()
            .contains("encoding unsupported:")
    );
    assert!(
        MoonriseError::encoder("x")
            .to_string()
            .contains("encoder fault:")
    );
    assert!(
        MoonriseError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn stale_runs_are_flagged() {
    let err = MoonriseError::StaleRunCancelled { run: 7 };
    assert!(err.is_stale());
    assert_eq!(err.to_string(), "stale run 7 cancelled");
    assert!(!MoonriseError::encoder("x").is_stale());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MoonriseError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
