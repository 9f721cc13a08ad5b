const UNITS: [char; 6] = ['k', 'M', 'G', 'T', 'P', 'E'];

/// Formats a byte count using decimal (SI) units, e.g. `3.4 MB`.
///
/// Values in `(-1000, 1000)` are printed as-is with a `B` suffix.
pub fn human_readable_bytes(bytes: i64) -> String {
    if -1000 < bytes && bytes < 1000 {
        return format!("{bytes} B");
    }

    let mut remaining = bytes;
    let mut unit = 0;
    while remaining <= -999_950 || remaining >= 999_950 {
        remaining /= 1000;
        unit += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let value = remaining as f64 / 1000.0;
    format!("{value:.1} {}B", UNITS[unit])
}

/// Same as [`human_readable_bytes`] for unsigned sizes.
pub fn human_readable_size(bytes: u64) -> String {
    human_readable_bytes(i64::try_from(bytes).unwrap_or(i64::MAX))
}
