//! tests/decrypt_tests.rs
//! Random-access reads, slicing, and the sequential stream cursor.

mod common;
use common::{encrypt_at, TEST_KEY};

use klbdec::{DecryptStream, DecryptingSource, KlbdecError, SliceSource};

use std::io::{Read, Seek, SeekFrom};

/// 4 KiB of varied ciphertext for the range tests.
fn ciphertext() -> Vec<u8> {
    (0..4096u32).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect()
}

/// Ground truth: decrypt the whole buffer sequentially from offset 0.
fn full_plaintext(data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    TEST_KEY.state_at(0).apply(&mut buf);
    buf
}

#[test]
fn random_reads_match_sequential_decryption() {
    let data = ciphertext();
    let expected = full_plaintext(&data);
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);

    for &(offset, len) in &[(0usize, 16usize), (1, 1), (7, 100), (4000, 96), (4095, 1)] {
        let got = source.read_at(offset as u64, len).unwrap();
        assert_eq!(got, &expected[offset..offset + len], "offset={offset} len={len}");
    }
}

#[test]
fn split_reads_concatenate() {
    let data = ciphertext();
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);

    let whole = source.read_at(0, 16).unwrap();
    let mut halves = source.read_at(0, 8).unwrap();
    halves.extend(source.read_at(8, 8).unwrap());
    assert_eq!(whole, halves);
}

#[test]
fn overlapping_ranges_agree_with_truncation() {
    let data = ciphertext();
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);

    let o = 100u64;
    let n = 64usize;
    let base = source.read_at(o, n).unwrap();
    for k in 0..=n {
        let tail = source.read_at(o + k as u64, n - k).unwrap();
        assert_eq!(tail, &base[k..], "k={k}");
    }
}

#[test]
fn read_into_matches_read_at() {
    let data = ciphertext();
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);

    let mut buf = [0u8; 64];
    source.read_into(777, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), source.read_at(777, 64).unwrap());

    // Empty buffer short-circuits like a zero-length read.
    source.read_into(u64::MAX, &mut []).unwrap();

    assert!(source
        .read_into(data.len() as u64 - 4, &mut buf)
        .unwrap_err()
        .is_out_of_range());
}

#[test]
fn io_read_fills_caller_buffers_exactly() {
    let data = ciphertext();
    let expected = full_plaintext(&data);
    let mut stream = DecryptStream::open(data.as_slice(), TEST_KEY);

    // Fixed buffer, repeated reads: each call fills it completely until
    // the tail, which comes back short.
    let mut buf = [0u8; 1000];
    let mut collected = Vec::new();
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }
    assert_eq!(collected, expected);

    // A buffer larger than the remainder reports the clamped count.
    stream.seek(SeekFrom::End(-96)).unwrap();
    let n = stream.read(&mut buf).unwrap();
    assert_eq!(n, 96);
    assert_eq!(&buf[..96], &expected[expected.len() - 96..]);
}

#[test]
fn zero_length_reads_are_empty() {
    let data = ciphertext();
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);
    assert!(source.read_at(0, 0).unwrap().is_empty());
    // Short-circuits before extent validation, so any offset is fine.
    assert!(source.read_at(u64::MAX, 0).unwrap().is_empty());
}

#[test]
fn reads_past_the_extent_fail() {
    let data = ciphertext();
    let size = data.len() as u64;
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);

    match source.read_at(size - 4, 8) {
        Err(KlbdecError::OutOfRange {
            offset,
            length,
            size: reported,
        }) => {
            assert_eq!(offset, size - 4);
            assert_eq!(length, 8);
            assert_eq!(reported, size);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert!(source.read_at(size + 1000, 1).unwrap_err().is_out_of_range());
}

#[test]
fn package_slice_decrypts_like_a_standalone_container() {
    // An asset encrypted against its own offset origin, embedded at an
    // arbitrary position inside a larger package blob.
    let asset = b"embedded asset payload, definitely not random";
    let asset_ct = encrypt_at(TEST_KEY, 0, asset);

    let mut package = vec![0x5A_u8; 10_000];
    let start = 2345usize;
    package[start..start + asset_ct.len()].copy_from_slice(&asset_ct);

    let slice = SliceSource::new(package.as_slice(), start as u64, asset_ct.len() as u64).unwrap();
    let source = DecryptingSource::new(slice, TEST_KEY);

    assert_eq!(source.size(), asset_ct.len() as u64);
    assert_eq!(source.read_at(0, asset.len()).unwrap(), asset);

    // Interior reads stay offset-correct through the window translation.
    assert_eq!(source.read_at(9, 6).unwrap(), &asset[9..15]);
}

#[test]
fn slice_window_must_fit_the_inner_source() {
    let data = vec![0u8; 100];
    assert!(SliceSource::new(data.as_slice(), 90, 20).unwrap_err().is_out_of_range());
}

#[test]
fn stream_cursor_advances_and_clamps() {
    let data = ciphertext();
    let expected = full_plaintext(&data);
    let mut stream = DecryptStream::open(data.as_slice(), TEST_KEY);

    let first = stream.read_next(100).unwrap();
    assert_eq!(first, &expected[..100]);
    assert_eq!(stream.position(), 100);

    let second = stream.read_next(50).unwrap();
    assert_eq!(second, &expected[100..150]);

    // Clamp at EOF, then nothing.
    stream.seek_to(expected.len() as u64 - 10);
    assert_eq!(stream.read_next(1000).unwrap(), &expected[expected.len() - 10..]);
    assert!(stream.read_next(1).unwrap().is_empty());
}

#[test]
fn stream_seek_equals_direct_read() {
    let data = ciphertext();
    let source = DecryptingSource::new(data.as_slice(), TEST_KEY);
    let mut stream = DecryptStream::open(data.as_slice(), TEST_KEY);

    stream.seek_to(3000);
    assert_eq!(stream.read_next(64).unwrap(), source.read_at(3000, 64).unwrap());
}

#[test]
fn copy_to_drains_the_whole_resource() {
    let data = ciphertext();
    let expected = full_plaintext(&data);

    let mut out = Vec::new();
    let mut stream = DecryptStream::open(data.as_slice(), TEST_KEY);
    let written = stream.copy_to(&mut out).unwrap();

    assert_eq!(written, expected.len() as u64);
    assert_eq!(out, expected);
}

#[test]
fn stream_implements_io_read_and_seek() {
    let data = ciphertext();
    let expected = full_plaintext(&data);
    let mut stream = DecryptStream::open(data.as_slice(), TEST_KEY);

    stream.seek(SeekFrom::End(-256)).unwrap();
    let mut tail = Vec::new();
    stream.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, &expected[expected.len() - 256..]);

    stream.seek(SeekFrom::Start(0)).unwrap();
    let mut copied = Vec::new();
    std::io::copy(&mut stream, &mut copied).unwrap();
    assert_eq!(copied, expected);
}
