use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = StudioConfig::default();
    assert_eq!(cfg.duration_ms, 8_000);
    assert_eq!((cfg.width, cfg.height), (1280, 720));
    assert_eq!(cfg.frame_rate, 60);
    assert_eq!(cfg.watchdog_grace_ms, 120);
    assert_eq!(cfg.codec, CodecPair::default());
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.watchdog_after_us(), 8_120_000);
}

#[test]
fn empty_json_yields_defaults() {
    assert_eq!(StudioConfig::from_json_str("{}").unwrap(), StudioConfig::default());
}

#[test]
fn json_round_trips() {
    let mut cfg = StudioConfig::default();
    cfg.duration_ms = 500;
    cfg.width = 64;
    cfg.height = 36;
    cfg.audio = Some(AudioInputConfig {
        path: "mix.f32le".into(),
        sample_rate: 48_000,
        channels: 2,
    });
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(StudioConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn partial_json_overrides_fields() {
    let cfg = StudioConfig::from_json_str(
        r#"{"duration_ms": 2000, "frame_rate": 30, "codec": {"container": "mp4", "video": "libx264", "audio": "aac"}}"#,
    )
    .unwrap();
    assert_eq!(cfg.duration_ms, 2_000);
    assert_eq!(cfg.frame_rate, 30);
    assert_eq!(cfg.codec.mime(), "video/mp4");
    assert_eq!(cfg.width, 1280);
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"duration_ms": 0}"#,
        r#"{"width": 0}"#,
        r#"{"height": 0}"#,
        r#"{"width": 641}"#,
        r#"{"height": 361}"#,
        r#"{"frame_rate": 0}"#,
        r#"{"width": 70000}"#,
    ] {
        let err = StudioConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, MoonriseError::Validation(_)), "{json}: {err}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    for json in ["{", r#"{"bogus": 1}"#, r#"{"width": "wide"}"#] {
        let err = StudioConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, MoonriseError::Serde(_)), "{json}: {err}");
    }
}

#[test]
fn from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("moonrise_cfg_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"width": 320, "height": 180}"#).unwrap();
    let cfg = StudioConfig::from_path(&path).unwrap();
    assert_eq!(cfg.canvas(), Canvas { width: 320, height: 180 });
    let _ = std::fs::remove_file(&path);

    assert!(StudioConfig::from_path("/nonexistent/moonrise.json").is_err());
}

#[test]
fn encode_config_carries_codec_and_background() {
    let mut cfg = StudioConfig::default();
    cfg.background_rgba = [1, 2, 3, 255];
    let enc = cfg.encode_config().unwrap();
    assert_eq!(enc.fps, Fps::new(60, 1).unwrap());
    assert_eq!(enc.bg_rgba, [1, 2, 3, 255]);
    assert_eq!((enc.width, enc.height), (1280, 720));
}
