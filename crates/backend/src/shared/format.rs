use contracts::shared::format::group_digits;

/// Response size column of the request log: `12.345 B`
pub fn byte_count(n: usize) -> String {
    let n = i64::try_from(n).unwrap_or(i64::MAX);
    format!("{} B", group_digits(n, '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_count() {
        assert_eq!(byte_count(0), "0 B");
        assert_eq!(byte_count(512), "512 B");
        assert_eq!(byte_count(1_048_576), "1.048.576 B");
    }
}
