//! Scanning the test process itself through the platform backend

use remote_sigscan::{
    Address, MemoryError, MemoryRange, ProcessHandle, ProcessSession, ProcessTarget,
    RemoteMemory, ScannerConfig,
};

static MARKER: [u8; 24] = *b"sigscan:marker:9d41b7e0!";

fn marker_address() -> Address {
    Address::from(std::hint::black_box(&MARKER).as_ptr())
}

/// Cross-process reads can be forbidden by the sandbox even on ourselves
fn can_read_self(handle: &ProcessHandle) -> bool {
    let mut probe = [0u8; 4];
    handle.read(marker_address(), &mut probe) == probe.len()
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_session_module_contains_marker() {
    let session = ProcessSession::open_pid(std::process::id()).unwrap();
    let module = session.module();
    assert!(module.range().contains(marker_address()));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_find_marker_text_near_its_address() {
    let config = ScannerConfig {
        max_threads: 2,
        chunk_size: 4096,
    };
    let session = ProcessSession::open(&ProcessTarget::Pid(std::process::id()), config).unwrap();
    if !can_read_self(session.handle()) {
        return;
    }

    let range = MemoryRange::with_len(marker_address(), MARKER.len());
    let needle = String::from_utf8(MARKER.to_vec()).unwrap();

    let found = session
        .scanner()
        .find_text(&needle, range, session.config().chunk_size)
        .unwrap();
    assert_eq!(found, Some(marker_address()));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_find_marker_pattern_with_wildcards() {
    let session = ProcessSession::open_pid(std::process::id()).unwrap();
    if !can_read_self(session.handle()) {
        return;
    }

    // "sigscan:" then two wildcards then "rker"
    let pattern = "73 69 67 73 63 61 6E 3A ?? ?? 72 6B 65 72";
    let range = MemoryRange::with_len(marker_address(), MARKER.len());
    let report = session
        .scanner()
        .find_pattern(pattern, range, 4096)
        .unwrap();
    assert_eq!(report.first(), Some(marker_address()));
}

#[test]
fn test_unknown_process_is_access_failure() {
    let target: ProcessTarget = "no-such-process-4f1c9e".parse().unwrap();
    let err = ProcessSession::open(&target, ScannerConfig::default()).unwrap_err();
    assert!(err.is_process_access());
    assert!(matches!(err, MemoryError::ProcessNotFound(_)));
}
