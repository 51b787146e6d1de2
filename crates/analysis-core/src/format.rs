//! Display helpers shared by narrative text and reports.

/// Group an integer with comma thousands separators, e.g. `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `₹12,345Cr`
pub fn crores(value: i64) -> String {
    format!("₹{}Cr", group_thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(18345), "18,345");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-45210), "-45,210");
    }

    #[test]
    fn test_crores() {
        assert_eq!(crores(41079), "₹41,079Cr");
    }
}
