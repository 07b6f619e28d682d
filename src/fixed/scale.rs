//! n-bit-channel → Q15.16 scale constants.
//!
//! `fixed_bits_n(n)` returns `(mul, shift)` such that for any `v` in
//! `0..2^n`, `(v * mul) >> shift` is `v`'s Q15.16 representation rescaled
//! to the full `0..=1.0` range — i.e. `((2^n - 1) * mul) >> shift == Fixed::ONE.0`.
//! Used to expand e.g. a 5-bit RGB565 channel to a full-range fixed value
//! without a division per pixel.

const TABLE: [(u32, u32); 15] = [
    (65536, 0),    // n = 1
    (43691, 1),    // n = 2
    (74899, 3),    // n = 3
    (34953, 3),    // n = 4
    (67651, 5),    // n = 5
    (532617, 9),   // n = 6
    (264211, 9),   // n = 7
    (32897, 7),    // n = 8
    (4202561, 15), // n = 9
    (1049613, 14), // n = 10
    (262275, 13),  // n = 11
    (262211, 14),  // n = 12
    (262179, 15),  // n = 13
    (65541, 14),   // n = 14
    (65539, 15),   // n = 15
];

/// Returns the `(multiplier, shift)` pair for an `n`-bit channel, `1 <= n <= 15`.
#[must_use]
pub fn fixed_bits_n(n: u32) -> (u32, u32) {
    debug_assert!((1..=15).contains(&n), "fixed_bits_n: n out of range");
    TABLE[(n - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_channel_value_hits_exactly_one() {
        for n in 1..=15u32 {
            let (mul, shift) = fixed_bits_n(n);
            let max = (1u32 << n) - 1;
            let scaled = (u64::from(max) * u64::from(mul)) >> shift;
            assert_eq!(scaled, 0x1_0000, "n = {n}");
        }
    }

    #[test]
    fn zero_channel_value_is_zero() {
        for n in 1..=15u32 {
            let (mul, shift) = fixed_bits_n(n);
            assert_eq!((0u64 * u64::from(mul)) >> shift, 0, "n = {n}");
        }
    }

    #[test]
    fn monotonic_across_full_range() {
        for n in 1..=15u32 {
            let (mul, shift) = fixed_bits_n(n);
            let mut prev = 0u64;
            for v in 0..=(1u32 << n) - 1 {
                let scaled = (u64::from(v) * u64::from(mul)) >> shift;
                assert!(scaled >= prev, "n = {n}, v = {v}");
                prev = scaled;
            }
        }
    }
}
