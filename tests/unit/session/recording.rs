use super::*;
use crate::encode::encoder::{CodecPair, NoEncoderHost};
use crate::encode::memory::{InMemoryDigest, InMemoryFaults, InMemoryHost};

const INTERVAL_US: u64 = 100_000;

fn cfg() -> EncodeConfig {
    EncodeConfig {
        width: 4,
        height: 2,
        fps: Fps::new(10, 1).unwrap(),
        codec: CodecPair::default(),
        bg_rgba: [0, 0, 0, 255],
        audio: None,
    }
}

fn frame(fill: u8) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: vec![fill; 32],
        premultiplied: true,
    }
}

fn started(host: &InMemoryHost) -> RecordingSession {
    let mut rec = RecordingSession::new(1);
    rec.begin(host, cfg(), HostTime::from_millis(620)).unwrap();
    rec
}

#[test]
fn frame_stream_skips_duplicate_slots_and_fills_gaps() {
    let mut s = FrameStream::new(Fps::new(10, 1).unwrap());
    assert_eq!(s.admit(0), 1);
    assert_eq!(s.admit(50_000), 0);
    assert_eq!(s.admit(100_000), 1);
    assert_eq!(s.admit(400_000), 3);
    assert_eq!(s.admit(399_000), 0);
}

#[test]
fn unsupported_host_leaves_session_unsupported() {
    let mut rec = RecordingSession::new(3);
    let err = rec
        .begin(&NoEncoderHost, cfg(), HostTime(0))
        .unwrap_err();
    assert!(matches!(err, MoonriseError::EncodingUnsupported(_)));
    assert_eq!(rec.state(), RecordingState::Unsupported);
    assert_eq!(rec.watchdog_deadline(), None);
}

#[test]
fn invalid_geometry_is_reported_as_unsupported() {
    let mut rec = RecordingSession::new(1);
    let mut odd = cfg();
    odd.width = 3;
    let err = rec.begin(&InMemoryHost::new(), odd, HostTime(0)).unwrap_err();
    assert!(matches!(err, MoonriseError::EncodingUnsupported(_)));
    assert_eq!(rec.state(), RecordingState::Unsupported);
}

#[test]
fn begin_twice_is_rejected() {
    let host = InMemoryHost::new();
    let mut rec = started(&host);
    assert_eq!(rec.state(), RecordingState::Recording);
    assert_eq!(rec.watchdog_deadline(), Some(HostTime::from_millis(620)));
    assert!(rec.begin(&host, cfg(), HostTime(0)).is_err());
}

#[test]
fn finalize_produces_artifact_once() {
    let host = InMemoryHost::new();
    let mut rec = started(&host);
    let mut reg = ArtifactRegistry::new();
    for i in 0..4u64 {
        assert_eq!(rec.capture_frame(i * INTERVAL_US, &frame(i as u8)).unwrap(), 1);
    }
    rec.pump_chunks();
    assert_eq!(rec.chunk_count(), 5);

    let handle = rec.finalize(&mut reg).unwrap().unwrap();
    assert_eq!(rec.state(), RecordingState::Ready);
    assert_eq!(rec.watchdog_deadline(), None);
    assert_eq!(handle.mime(), "video/webm");
    assert_eq!(reg.live(), Some(&handle));

    let digest = InMemoryDigest::parse(handle.bytes()).unwrap();
    assert_eq!(digest.frames.len(), 4);
    assert_eq!(digest.frames[2].1, frame(2).fingerprint());

    assert_eq!(rec.finalize(&mut reg).unwrap(), None);
    assert_eq!(reg.minted(), 1);
    assert_eq!(host.stats().finished(), 1);
}

#[test]
fn capture_outside_recording_is_ignored() {
    let mut rec = RecordingSession::new(1);
    assert_eq!(rec.capture_frame(0, &frame(0)).unwrap(), 0);
    let mut reg = ArtifactRegistry::new();
    assert_eq!(rec.finalize(&mut reg).unwrap(), None);
    assert_eq!(rec.state(), RecordingState::Idle);
}

#[test]
fn frame_fault_fails_and_discards_chunks() {
    let host = InMemoryHost::new().with_faults(InMemoryFaults {
        fail_at_frame: Some(2),
        ..InMemoryFaults::default()
    });
    let mut rec = started(&host);
    rec.capture_frame(0, &frame(0)).unwrap();
    rec.capture_frame(INTERVAL_US, &frame(1)).unwrap();
    let err = rec.capture_frame(2 * INTERVAL_US, &frame(2)).unwrap_err();
    assert!(matches!(err, MoonriseError::EncoderFault(_)));
    assert_eq!(rec.state(), RecordingState::Failed);
    assert_eq!(rec.chunk_count(), 0);
    assert!(rec.failure().unwrap().contains("injected fault"));
    assert_eq!(host.stats().aborted(), 1);

    let mut reg = ArtifactRegistry::new();
    assert_eq!(rec.finalize(&mut reg).unwrap(), None);
    assert_eq!(reg.minted(), 0);
}

#[test]
fn finish_fault_keeps_previous_artifact() {
    let mut reg = ArtifactRegistry::new();
    let prior = reg.mint("video/webm", b"prior".to_vec()).unwrap();
    reg.install(prior.clone());

    let host = InMemoryHost::new().with_faults(InMemoryFaults {
        fail_on_finish: true,
        ..InMemoryFaults::default()
    });
    let mut rec = started(&host);
    rec.capture_frame(0, &frame(0)).unwrap();
    assert!(rec.finalize(&mut reg).is_err());
    assert_eq!(rec.state(), RecordingState::Failed);
    assert_eq!(reg.live(), Some(&prior));
    assert_eq!(reg.releases(), 0);
}

#[test]
fn empty_output_is_a_fault() {
    let host = InMemoryHost::new().with_faults(InMemoryFaults {
        empty_output: true,
        ..InMemoryFaults::default()
    });
    let mut rec = started(&host);
    rec.capture_frame(0, &frame(0)).unwrap();
    let mut reg = ArtifactRegistry::new();
    let err = rec.finalize(&mut reg).unwrap_err();
    assert!(matches!(err, MoonriseError::EncoderFault(_)));
    assert_eq!(rec.state(), RecordingState::Failed);
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn abort_and_drop_release_the_encoder() {
    let host = InMemoryHost::new();
    let mut rec = started(&host);
    rec.abort();
    assert_eq!(rec.state(), RecordingState::Idle);
    assert_eq!(host.stats().aborted(), 1);

    let rec = started(&host);
    drop(rec);
    assert_eq!(host.stats().aborted(), 2);
}
