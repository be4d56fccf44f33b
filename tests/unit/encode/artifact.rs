use super::*;

#[test]
fn empty_output_cannot_be_minted() {
    let mut reg = ArtifactRegistry::new();
    let err = reg.mint("video/webm", Vec::new()).unwrap_err();
    assert!(matches!(err, MoonriseError::EncoderFault(_)));
    assert_eq!(reg.minted(), 0);
}

#[test]
fn uri_carries_serial_and_digest() {
    let mut reg = ArtifactRegistry::new();
    let h = reg.mint("video/webm", b"abc".to_vec()).unwrap();
    assert_eq!(
        h.uri(),
        format!("blob:moonrise/1-{:016x}", fnv1a64(b"abc"))
    );
    assert_eq!(h.mime(), "video/webm");
    assert_eq!(h.len(), 3);
    assert_eq!(h.bytes(), b"abc");
    assert!(!h.is_empty());
}

#[test]
fn install_releases_previous_handle() {
    let mut reg = ArtifactRegistry::new();
    let a = reg.mint("video/webm", b"a".to_vec()).unwrap();
    let b = reg.mint("video/webm", b"a".to_vec()).unwrap();
    assert_ne!(a.uri(), b.uri());

    reg.install(a.clone());
    assert_eq!(reg.releases(), 0);
    reg.install(b.clone());
    assert_eq!(reg.releases(), 1);
    assert_eq!(reg.live_count(), 1);
    assert_eq!(reg.resolve(a.uri()), None);
    assert_eq!(reg.resolve(b.uri()), Some(b.clone()));
    // Released handles keep their bytes for holders.
    assert_eq!(a.bytes(), b"a");
}

#[test]
fn release_only_matches_live_uri() {
    let mut reg = ArtifactRegistry::new();
    let h = reg.mint("video/webm", b"x".to_vec()).unwrap();
    reg.install(h.clone());
    assert!(!reg.release("blob:moonrise/99-0"));
    assert!(reg.release(h.uri()));
    assert!(!reg.release(h.uri()));
    assert_eq!(reg.live(), None);
    assert_eq!(reg.releases(), 1);
}

#[test]
fn write_to_creates_file() {
    let mut reg = ArtifactRegistry::new();
    let h = reg.mint("video/webm", b"payload".to_vec()).unwrap();
    let dir = std::env::temp_dir().join(format!("moonrise_artifact_{}", std::process::id()));
    let path = dir.join("out").join("clip.webm");
    h.write_to(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    let _ = std::fs::remove_dir_all(&dir);
}
