//! RFC 1982 serial number arithmetic.

/// Largest distance between two serials for which the smaller one is still
/// considered older. Past this half-range the comparison wraps around.
pub const MAX_SERIAL_INCREMENT: u32 = 2_147_483_647;

/// Returns `true` when `a` is older than `b` under RFC 1982 wraparound rules.
///
/// Total over all `u32` pairs. `is_older(a, a)` is always `false`, and a
/// distance of exactly `MAX_SERIAL_INCREMENT + 1` resolves to "not older".
pub fn is_older(a: u32, b: u32) -> bool {
    if a < b {
        b - a <= MAX_SERIAL_INCREMENT
    } else {
        a - b > MAX_SERIAL_INCREMENT
    }
}
