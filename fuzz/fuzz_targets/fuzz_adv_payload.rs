//! Fuzz target: advertising payload builder
//!
//! Feeds arbitrary TLV elements into the bounded payload builder and
//! asserts it never panics, never exceeds the 31-byte legacy limit, and
//! leaves the payload untouched when a push is rejected.
//!
//! cargo fuzz run fuzz_adv_payload

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumplink::gatt::adv::{AdvPayload, MAX_ADV_PAYLOAD};

fuzz_target!(|data: &[u8]| {
    let mut payload = AdvPayload::new();

    // Interpret the input as a stream of [type][value_len][value…].
    let mut rest = data;
    while rest.len() >= 2 {
        let ad_type = rest[0];
        let take = usize::from(rest[1]).min(rest.len() - 2);
        let value = &rest[2..2 + take];
        rest = &rest[2 + take..];

        let before = payload.as_bytes().to_vec();
        match payload.push(ad_type, value) {
            Ok(()) => {
                assert!(payload.len() <= MAX_ADV_PAYLOAD);
                assert_eq!(payload.len(), before.len() + 2 + value.len());
            }
            Err(_) => {
                // Rejected element must not disturb the payload.
                assert_eq!(payload.as_bytes(), before.as_slice());
            }
        }
    }
});
