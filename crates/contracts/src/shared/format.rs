/// Group the digits of `n` in threes with `separator`
///
/// ```
/// use contracts::shared::format::group_digits;
/// assert_eq!(group_digits(1234567, ','), "1,234,567");
/// assert_eq!(group_digits(-1000, '.'), "-1.000");
/// ```
pub fn group_digits(n: i64, separator: char) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Plain number in the console tables: `12,900`
pub fn format_number(n: i64) -> String {
    group_digits(n, ',')
}

/// Money with the unit attached: `12,900원`
pub fn format_won(n: i64) -> String {
    format!("{}원", format_number(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1000, ','), "1,000");
        assert_eq!(group_digits(i64::MIN, ','), "-9,223,372,036,854,775,808");
        assert_eq!(format_number(12900), "12,900");
        assert_eq!(format_won(12900), "12,900원");
        assert_eq!(format_won(0), "0원");
    }
}
