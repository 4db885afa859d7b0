//! tests/jump_tests.rs
//! Closed-form offset jump vs. the sequential recurrence.

mod common;
use common::{brute_jump, TEST_KEY};

use klbdec::jump_word;

const SEEDS: &[u32] = &[0, 1, 2, 0x0000_3039, 0xDEAD_BEEF, 0xFFFF_FFFF];

#[test]
fn jump_zero_is_identity() {
    for &seed in SEEDS {
        assert_eq!(jump_word(seed, 0), seed);
    }
}

#[test]
fn jump_matches_brute_force() {
    let offsets = [1u64, 2, 3, 7, 8, 31, 32, 33, 255, 256, 1000, 4096, 65_537];
    for &seed in SEEDS {
        for &offset in &offsets {
            assert_eq!(
                jump_word(seed, offset),
                brute_jump(seed, offset),
                "seed={seed:#010x} offset={offset}"
            );
        }
    }
}

#[test]
fn jump_one_is_single_step() {
    for &seed in SEEDS {
        assert_eq!(jump_word(seed, 1), common::step_word(seed));
    }
}

#[test]
fn jumps_compose() {
    let pairs = [(0u64, 0u64), (0, 17), (5, 5), (100, 4096), (1 << 20, 1 << 21)];
    for &seed in SEEDS {
        for &(o1, o2) in &pairs {
            let total = o1 + o2;
            assert_eq!(
                jump_word(jump_word(seed, o1), o2),
                jump_word(seed, total),
                "seed={seed:#010x} o1={o1} o2={o2}"
            );
        }
    }
}

#[test]
fn jumps_compose_at_huge_offsets() {
    // Too far to brute-force; composability is the check that the wide
    // arithmetic holds up at the top of the u64 range.
    let half = u64::MAX / 2;
    for &seed in SEEDS {
        assert_eq!(
            jump_word(jump_word(seed, half), half),
            jump_word(seed, half * 2)
        );
    }
}

#[test]
fn state_at_jumps_each_word() {
    let offset = 12_345u64;
    let state = TEST_KEY.state_at(offset);
    let (k0, k1, k2) = TEST_KEY.words();

    let mut expected = klbdec::Key::new(
        jump_word(k0, offset),
        jump_word(k1, offset),
        jump_word(k2, offset),
    )
    .state_at(0);

    // Same position, same mask stream.
    let mut got = state;
    for _ in 0..16 {
        assert_eq!(got.mask_byte(), expected.mask_byte());
        got.advance();
        expected.advance();
    }
}
