//! Fuzz target: SFLOAT codec
//!
//! Drives arbitrary bit patterns through decode and arbitrary floats
//! through encode, asserting that neither panics, that every non-special
//! encoded code keeps its sign, and that decode(encode(v)) stays finite
//! for finite input.
//!
//! cargo fuzz run fuzz_sfloat

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumplink::sfloat;

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }

    // Any 16-bit pattern must decode without panicking.
    let code = u16::from_le_bytes([data[0], data[1]]);
    let decoded = sfloat::decode(code);
    assert!(decoded.is_finite(), "decode produced a non-finite value");

    // Any f64 bit pattern must encode without panicking.
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[2..10]);
    let value = f64::from_bits(u64::from_le_bytes(raw));

    let encoded = sfloat::encode(value);
    if value.is_nan() {
        assert_eq!(encoded, sfloat::NAN);
        return;
    }
    if encoded == sfloat::NAN || encoded == sfloat::NRES {
        return;
    }

    let back = sfloat::decode(encoded);
    assert!(back.is_finite());
    if value != 0.0 && back != 0.0 {
        assert_eq!(
            back.is_sign_negative(),
            value.is_sign_negative(),
            "round trip flipped the sign of {value}"
        );
    }
});
