//! Chroma normalization

/// Scale a chroma vector so its largest entry is 1 (L∞ normalization)
///
/// Silent vectors (all entries at or below `1e-10`) are left untouched, so an
/// all-zero frame stays all-zero.
pub fn normalize_max(chroma: &mut [f32; 12]) {
    let max = chroma.iter().copied().fold(0.0f32, f32::max);
    if max <= 1e-10 {
        return;
    }
    for x in chroma.iter_mut() {
        *x /= max;
    }
}
