//! Fixed-point trigonometry
//!
//! Sine and cosine scaled by 1000 from a 90-entry quarter-wave table, no
//! floating point and no libm. Results are bit-exact with the quantisation
//! the watch faces were designed against, so rendered coordinates stay
//! reproducible across builds.

/// `sin(d) * 1000` rounded, for `d` in `[0, 90)`
pub const SINE_TABLE: [i32; 90] = [
    0, 17, 35, 52, 70, 87, 105, 122, 139, 156, //
    174, 191, 208, 225, 242, 259, 276, 292, 309, 326, //
    342, 358, 375, 391, 407, 423, 438, 454, 469, 485, //
    500, 515, 530, 545, 559, 574, 588, 602, 616, 629, //
    643, 656, 669, 682, 695, 707, 719, 731, 743, 755, //
    766, 777, 788, 799, 809, 819, 829, 839, 848, 857, //
    866, 875, 883, 891, 899, 906, 914, 921, 927, 934, //
    940, 946, 951, 956, 961, 966, 970, 974, 978, 982, //
    985, 988, 990, 993, 995, 996, 998, 999, 999, 1000,
];

/// Fixed-point scale of [`sin_k`] and [`cos_k`]
pub const SCALE: i32 = 1000;

/// Wrap any angle into `[0, 360)`
#[inline]
pub const fn normalize_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// `sin(degrees) * 1000`
///
/// Folds every quadrant onto the table; indices never leave `[0, 89]`.
pub fn sin_k(degrees: i32) -> i32 {
    let d = normalize_degrees(degrees) as usize;
    match d {
        270.. => -SINE_TABLE[359 - d],
        180.. => -SINE_TABLE[d - 180],
        90.. => SINE_TABLE[179 - d],
        _ => SINE_TABLE[d],
    }
}

/// `cos(degrees) * 1000`, defined as `sin_k(degrees + 90)`
pub fn cos_k(degrees: i32) -> i32 {
    // Normalise first so the +90 cannot overflow near i32::MAX
    sin_k(normalize_degrees(degrees) + 90)
}

/// Convert a ×1000 quantity back to an integer
///
/// Rounds half away from zero: `from_k(500) == 1`, `from_k(-500) == -1`,
/// so hands pointing left or up are not biased one pixel towards the
/// centre.
#[inline]
pub const fn from_k(value: i32) -> i32 {
    if value >= 0 {
        (value + SCALE / 2) / SCALE
    } else {
        -((SCALE / 2 - value) / SCALE)
    }
}
