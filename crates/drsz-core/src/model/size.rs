//! Size formatting utilities — human-readable byte counts.
//!
//! All internal sizes are `u64` bytes. Floating point is only used
//! at the display-formatting boundary.

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Binary units (1 KiB = 1024 B), labelled as such.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    const TIB: f64 = GIB * 1024.0;
    const PIB: f64 = TIB * 1024.0;

    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else if b < GIB {
        format!("{:.1} MiB", b / MIB)
    } else if b < TIB {
        format!("{:.2} GiB", b / GIB)
    } else if b < PIB {
        format!("{:.2} TiB", b / TIB)
    } else {
        format!("{:.2} PiB", b / PIB)
    }
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let s = count.to_string();
    if s.len() <= 3 {
        return s;
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1000), "1000 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1_048_576 / 2), "2.5 MiB");
        assert_eq!(format_size(1_073_741_824), "1.00 GiB");
        assert_eq!(format_size(3 * 1_099_511_627_776), "3.00 TiB");
        assert_eq!(format_size(1_125_899_906_842_624), "1.00 PiB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(12_000), "12,000");
        assert_eq!(format_count(9_876_543), "9,876,543");
    }
}
