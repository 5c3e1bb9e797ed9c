#![no_main]

//! Brain parser fuzzer.
//!
//! Arbitrary text must either fail with an error or parse into a program
//! whose canonical text parses back to the same states.

use antwar::brain::{MAX_STATES, parse_brain_str};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|src: &str| {
    let Ok(brain) = parse_brain_str("fuzz", src) else {
        return;
    };
    assert!(!brain.is_empty());
    assert!(brain.len() <= MAX_STATES);

    let again = parse_brain_str("fuzz", &brain.to_source()).expect("canonical text must parse");
    assert_eq!(brain.states(), again.states());
});
