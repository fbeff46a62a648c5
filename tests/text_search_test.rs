//! Integration tests for text-mode scanning

use common::*;
use remote_sigscan::{CancelToken, MemoryError, MemoryRange, Scanner};
use std::sync::Arc;
use std::thread;

mod common;

const MESSAGE: &[u8] = b"Internal memory error 49";

#[test]
fn test_text_found_at_exact_address() {
    let mut image = filler(8192);
    place(&mut image, 5000, MESSAGE);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let found = scanner
        .find_text("Internal memory error 49", reader.range(), 4096)
        .unwrap();
    assert_eq!(found, Some(addr(5000)));
}

#[test]
fn test_text_absent_is_none_not_error() {
    let reader = CountingReader::new(filler(8192));
    let scanner = Scanner::new(&reader);

    let result = scanner.find_text("Internal memory error 49", reader.range(), 4096);
    assert!(matches!(result, Ok(None)));
}

#[test]
fn test_text_stops_after_first_hit() {
    let mut image = filler(64 * 1024);
    place(&mut image, 100, MESSAGE);
    place(&mut image, 40_000, MESSAGE);
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    let found = scanner
        .find_text("Internal memory error 49", reader.range(), 1024)
        .unwrap();
    assert_eq!(found, Some(addr(100)));
    // Only the chunk holding the match was read
    assert_eq!(reader.reads(), 1);
}

#[test]
fn test_text_has_no_wildcards() {
    let mut image = filler(512);
    place(&mut image, 64, b"AB");
    let reader = CountingReader::new(image);
    let scanner = Scanner::new(&reader);

    assert_eq!(scanner.find_text("A?", reader.range(), 512).unwrap(), None);
    assert_eq!(
        scanner.find_text("AB", reader.range(), 512).unwrap(),
        Some(addr(64))
    );
}

#[test]
fn test_text_validation_reads_nothing() {
    let reader = CountingReader::new(filler(512));
    let scanner = Scanner::new(&reader);

    assert!(matches!(
        scanner.find_text("", reader.range(), 64),
        Err(MemoryError::InvalidPattern(_))
    ));
    assert!(matches!(
        scanner.find_text("漢字", reader.range(), 64),
        Err(MemoryError::InvalidPattern(_))
    ));
    assert!(matches!(
        scanner.find_text("abc", MemoryRange::new(addr(10), addr(0)), 64),
        Err(MemoryError::InvalidRange { .. })
    ));
    assert!(matches!(
        scanner.find_text("abc", reader.range(), 0),
        Err(MemoryError::InvalidRange { .. })
    ));
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_cancelled_search_stops_at_chunk_boundary() {
    let reader = CountingReader::new(filler(4096));
    let scanner = Scanner::new(&reader);
    let cancel = CancelToken::new();
    cancel.cancel();

    let found = scanner
        .find_text_until("never", reader.range(), 256, &cancel)
        .unwrap();
    assert_eq!(found, None);
    assert_eq!(reader.reads(), 0);
}

#[test]
fn test_shared_token_stops_sibling_search() {
    let mut image = filler(16 * 1024);
    place(&mut image, 8, MESSAGE);
    let reader = Arc::new(CountingReader::new(image));
    let cancel = CancelToken::new();

    // The first search finds its text and sets the shared token
    let first = Scanner::new(reader.as_ref())
        .find_text_until("Internal memory error 49", reader.range(), 1024, &cancel)
        .unwrap();
    assert_eq!(first, Some(addr(8)));
    assert!(cancel.is_cancelled());

    let before = reader.reads();
    let sibling = {
        let reader = Arc::clone(&reader);
        let cancel = cancel.clone();
        thread::spawn(move || {
            Scanner::new(reader.as_ref())
                .find_text_until("absent", reader.range(), 1024, &cancel)
                .unwrap()
        })
        .join()
        .unwrap()
    };
    assert_eq!(sibling, None);
    assert_eq!(reader.reads(), before);
}
