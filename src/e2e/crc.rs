//! Streaming CRC16-CCITT, LSB-first.
//!
//! Bit-reflected variant: polynomial 0x8408 (0x1021 reversed), initial value
//! 0xFFFF, no final XOR, output written little-endian. Matches the
//! CRC-16/MCRF4XX parameterisation.

/// 0x1021 with the bit order reversed.
const POLY_REFLECTED: u16 = 0x8408;

/// Streaming CRC16 accumulator.
#[derive(Debug, Clone)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Self { value: 0xFFFF }
    }

    /// Feed one byte, least-significant bit first.
    pub fn add_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            let in_bit = (byte >> bit) & 1;
            let lsb = (self.value & 1) as u8;
            self.value >>= 1;
            if in_bit ^ lsb != 0 {
                self.value ^= POLY_REFLECTED;
            }
        }
    }

    pub fn add_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.add_byte(b);
        }
    }

    /// The accumulated CRC over everything fed so far.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Stamp a CRC into `buf[crc_offset..crc_offset + 2]` (little-endian),
    /// computed over `buf[..len]` with those two bytes skipped.
    ///
    /// # Panics
    ///
    /// Panics if `len > buf.len()` or the CRC window does not fit inside
    /// `len` — both are assembly-time layout defects, not runtime inputs.
    pub fn fill(buf: &mut [u8], crc_offset: usize, len: usize) {
        assert!(len <= buf.len());
        assert!(crc_offset + 2 <= len);

        let mut crc = Self::new();
        crc.add_bytes(&buf[..crc_offset]);
        crc.add_bytes(&buf[crc_offset + 2..len]);

        let value = crc.value();
        buf[crc_offset] = (value & 0xFF) as u8;
        buf[crc_offset + 1] = (value >> 8) as u8;
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
