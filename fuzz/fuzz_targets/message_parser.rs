//! Fuzz target for IRC line parsing
//!
//! Feeds arbitrary input to the parser and checks it neither panics nor
//! alters the line beyond stripping the terminator.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings; the session decodes lossily before parsing
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 8191 {
            return;
        }

        let msg = ircsess::Message::parse(input);
        assert!(input.starts_with(&msg.full_text));
    }
});
