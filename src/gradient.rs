/// Euclidean magnitude of the gradient `(gx, gy)`, rounded to the nearest
/// integer. Values that do not fit into `i16` are saturated to `i16::MAX`.
#[inline]
pub fn combine(gx: i16, gy: i16) -> i16 {
    let gx = gx as i32;
    let gy = gy as i32;
    // Sum of squares fits into u32 for any pair of i16 values.
    let sum = (gx * gx) as u32 + (gy * gy) as u32;
    let magnitude = (sum as f64).sqrt().round();
    if magnitude >= i16::MAX as f64 {
        i16::MAX
    } else {
        magnitude as i16
    }
}

/// Response of an unidirectional filter.
#[inline]
pub fn combine_unidirectional(gx: i16) -> i16 {
    gx.saturating_abs()
}

/// Clamps a value into the range of 8-bit pixels.
#[inline]
pub fn saturate(value: i16) -> u8 {
    value.clamp(0, u8::MAX as i16) as u8
}
