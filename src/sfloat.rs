//! IEEE 11073 SFLOAT — the 16-bit medical float used in the IDD Features
//! payload.
//!
//! Layout: 4-bit two's-complement exponent (base 10) in the top nibble,
//! 12-bit two's-complement mantissa in the rest. Mantissa values
//! 0x07FE–0x0802 are reserved for special codes, which is why a positive
//! mantissa tops out at 2045 before the encoder bumps the exponent.

/// Reserved code: "not a number".
pub const NAN: u16 = 0x07FF;

/// Reserved code: "not at this resolution" (magnitude unrepresentable).
pub const NRES: u16 = 0x0800;

/// First mantissa value of the reserved special band (+INFINITY onward).
const MIN_SPECIAL_MANTISSA: i64 = 0x07FE;
/// Largest positive mantissa.
const MAX_MANTISSA: i64 = 0x07FF;
/// Magnitude of the most negative mantissa (two's complement gains one).
const MIN_MANTISSA: i64 = 0x0800;
const MAX_EXPONENT: i32 = 7;
const MIN_EXPONENT: i32 = -8;

/// Decode an SFLOAT code into its numeric value.
///
/// Special codes are not interpreted here; `NAN` decodes to 2047.0 and so
/// on. Callers that care about specials must screen the raw code first.
pub fn decode(code: u16) -> f64 {
    let mut mantissa = i32::from(code & 0x0FFF);
    mantissa -= (mantissa & 0x0800) << 1;

    let mut exponent = i32::from((code >> 12) & 0x0F);
    exponent -= (exponent & 0x08) << 1;

    f64::from(mantissa) * 10f64.powi(exponent)
}

/// Encode a value as SFLOAT, maximising stored precision.
///
/// Exact zero returns the zero code. A magnitude too large for
/// mantissa × 10^7 returns [`NRES`]; NaN returns [`NAN`]. Everything else
/// rounds to the nearest representable value: the mantissa is scaled up
/// while a fractional part remains (to keep decimal places), scaled down
/// while it exceeds the mantissa ceiling, then trailing decimal zeros are
/// folded into the exponent so the stored mantissa is minimal.
pub fn encode(value: f64) -> u16 {
    if value == 0.0 {
        return 0;
    }
    if value.is_nan() {
        return NAN;
    }

    let is_negative = value < 0.0;
    let mut value = value.abs();
    let mantissa_max = if is_negative { MIN_MANTISSA } else { MAX_MANTISSA };
    let mantissa_max_f = mantissa_max as f64;

    let mut exponent: i32 = 0;

    // Scale up while a fractional part remains and the mantissa still fits.
    while value.floor() != value {
        let scaled_up = value * 10.0;
        if scaled_up <= mantissa_max_f && exponent > MIN_EXPONENT {
            value = scaled_up;
            exponent -= 1;
        } else {
            break;
        }
    }

    // Scale down until the mantissa fits, e.g. 123456.78 -> 1234.5678e2.
    while value > mantissa_max_f && exponent < MAX_EXPONENT {
        value /= 10.0;
        exponent += 1;
    }

    // Round half away from the fractional remainder left by scaling.
    let mut mantissa = (value + 0.5).floor() as i64;

    // A rounded mantissa in the reserved band would alias a special code.
    if exponent == 0 && mantissa >= MIN_SPECIAL_MANTISSA {
        exponent = 1;
        mantissa = (mantissa + 5) / 10;
    }

    // Fold trailing decimal zeros into the exponent, e.g. 1000 -> 1e3.
    loop {
        let scaled_down = mantissa / 10;
        if scaled_down * 10 == mantissa && exponent < MAX_EXPONENT {
            mantissa = scaled_down;
            exponent += 1;
        } else {
            break;
        }
    }

    if mantissa > mantissa_max {
        return NRES;
    }
    if is_negative {
        mantissa = -mantissa;
    }

    (((exponent & 0x0F) as u16) << 12) | ((mantissa & 0x0FFF) as u16)
}
