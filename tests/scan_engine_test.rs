//! Integration tests for pattern-mode scanning

use common::*;
use pretty_assertions::assert_eq;
use remote_sigscan::{Address, MemoryError, MemoryRange, Pattern, Scanner};

mod common;

const SIG: [u8; 5] = [0xCC, 0x8B, 0x11, 0x22, 0xCC];

#[test]
fn test_match_at_offset_ten_of_first_chunk() {
    let mut image = filler(4096);
    place(&mut image, 10, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let report = scanner
        .find_pattern("CC 8B ?? ?? CC", reader.range(), 1024)
        .unwrap();

    assert_eq!(report.addresses, vec![addr(10)]);
    assert_eq!(report.chunks_read, 4);
}

#[test]
fn test_match_spanning_chunk_boundary_is_not_found() {
    let chunk = 512;
    let mut image = filler(chunk * 2);
    place(&mut image, chunk - 2, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let report = scanner
        .find_pattern("CC 8B ?? ?? CC", reader.range(), chunk)
        .unwrap();

    assert!(report.is_empty());
    assert!(!report.terminated_early);
}

#[test]
fn test_same_match_found_with_larger_chunk() {
    let mut image = filler(1024);
    place(&mut image, 510, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let report = scanner
        .find_pattern("CC 8B ?? ?? CC", reader.range(), 1024)
        .unwrap();
    assert_eq!(report.addresses, vec![addr(510)]);
}

#[test]
fn test_inverted_range_rejected_without_reads() {
    let reader = CountingReader::new(filler(256));
    let scanner = Scanner::new(&reader);
    let range = MemoryRange::new(addr(128), addr(0));

    let result = scanner.find_pattern("CC", range, 64);
    assert!(matches!(result, Err(MemoryError::InvalidRange { .. })));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_empty_pattern_rejected_without_reads() {
    let reader = CountingReader::new(filler(256));
    let scanner = Scanner::new(&reader);

    let result = scanner.find_pattern("  ", reader.range(), 64);
    assert!(matches!(result, Err(MemoryError::InvalidPattern(_))));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_zero_chunk_size_rejected_without_reads() {
    let reader = CountingReader::new(filler(256));
    let scanner = Scanner::new(&reader);

    let result = scanner.find_pattern("CC", reader.range(), 0);
    assert!(matches!(result, Err(MemoryError::InvalidRange { .. })));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_malformed_patterns_never_touch_memory() {
    let reader = CountingReader::new(filler(256));
    let scanner = Scanner::new(&reader);

    for bad in ["C", "CC 8", "ZZ", "CC-8B", "0x90"] {
        let result = scanner.find_pattern(bad, reader.range(), 64);
        assert!(
            matches!(result, Err(MemoryError::InvalidPattern(_))),
            "pattern {:?} should be rejected",
            bad
        );
    }
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_range_shorter_than_pattern_rejected() {
    let reader = CountingReader::new(filler(256));
    let scanner = Scanner::new(&reader);
    let range = MemoryRange::with_len(addr(0), 4);

    let result = scanner.find_pattern("CC 8B ?? ?? CC", range, 64);
    assert!(matches!(result, Err(MemoryError::InvalidRange { .. })));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_invalid_handle_rejected_without_reads() {
    let reader = CountingReader::invalid(filler(256));
    let scanner = Scanner::new(&reader);

    let result = scanner.find_pattern("CC", reader.range(), 64);
    assert!(matches!(result, Err(MemoryError::InvalidHandle(_))));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_huge_chunk_size_on_small_range() {
    let mut image = filler(64);
    place(&mut image, 20, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let report = scanner
        .find_pattern("CC 8B ?? ?? CC", reader.range(), 1 << 46)
        .unwrap();

    assert_eq!(report.addresses, vec![addr(20)]);
    assert_eq!(reader.reads(), 1);
    assert_eq!(report.bytes_read, 64);
}

#[test]
fn test_allocation_failure_aborts_without_reads() {
    let reader = CountingReader::new(filler(64));
    let scanner = Scanner::new(&reader);
    let whole_space = MemoryRange::new(Address::new(0), Address::new(usize::MAX));

    let result = scanner.find_pattern("CC 8B ?? ?? CC", whole_space, usize::MAX);
    assert!(matches!(
        result,
        Err(MemoryError::AllocationFailed { size }) if size == usize::MAX
    ));

    let result = scanner.find_text("needle", whole_space, usize::MAX);
    assert!(matches!(result, Err(MemoryError::AllocationFailed { .. })));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_one_read_per_chunk() {
    let reader = CountingReader::new(filler(1000));
    let scanner = Scanner::new(&reader);

    let report = scanner.find_pattern("CC", reader.range(), 100).unwrap();
    assert_eq!(reader.reads(), 10);
    assert_eq!(report.chunks_read, 10);
    assert_eq!(report.bytes_read, 1000);
}

#[test]
fn test_empty_read_ends_scan() {
    let mut image = filler(300);
    place(&mut image, 250, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);
    let range = MemoryRange::with_len(addr(0), 10_000);

    let report = scanner
        .find_pattern("CC 8B ?? ?? CC", range, 100)
        .unwrap();

    assert_eq!(report.addresses, vec![addr(250)]);
    assert!(report.terminated_early);
    // Three full chunks, then the fourth read comes back empty
    assert_eq!(reader.reads(), 4);
}

#[test]
fn test_no_matches_is_not_an_error() {
    let reader = CountingReader::new(filler(2048));
    let scanner = Scanner::new(&reader);

    let report = scanner
        .find_pattern("CC CC CC CC", reader.range(), 256)
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(report.first(), None);
}

#[test]
fn test_compiled_pattern_reuse() {
    let mut image = filler(2048);
    place(&mut image, 100, &SIG);
    place(&mut image, 1500, &SIG);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);
    let pattern = Pattern::compile("CC8B????CC").unwrap();

    let whole = scanner
        .find_pattern_compiled(&pattern, reader.range(), 512)
        .unwrap();
    assert_eq!(whole.addresses, vec![addr(100), addr(1500)]);

    let tail = scanner
        .find_pattern_compiled(&pattern, MemoryRange::new(addr(1024), addr(2048)), 512)
        .unwrap();
    assert_eq!(tail.addresses, vec![addr(1500)]);
}

#[test]
fn test_overlapping_matches_all_reported() {
    let reader = CountingReader::new(vec![0xCC; 16]);
    let scanner = Scanner::new(&reader);

    let report = scanner.find_pattern("CC CC", reader.range(), 16).unwrap();
    let expected: Vec<Address> = (0..15).map(addr).collect();
    assert_eq!(report.addresses, expected);
}
