//! Integer parsing with C `%i` conversion rules.

/// Parses the leading integer of `s` the way `sscanf(s, "%i", ..)` does.
///
/// Leading whitespace and an optional sign are accepted. The base follows the
/// prefix: `0x`/`0X` selects hexadecimal, a lone leading `0` octal, anything
/// else decimal. Parsing stops at the first character that is not a digit of
/// that base, so trailing text is ignored.
///
/// Returns `None` when no digit is present or the value does not fit an `i32`.
#[inline]
#[must_use]
pub fn parse_c_int(s: &str) -> Option<i32> {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match hex_digits(rest) {
        Some(digits) => (16, digits),
        None if rest.starts_with('0') => (8, rest),
        None => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Strips a `0x` prefix, but only when a hex digit follows it. Otherwise the
/// `0` is an octal zero and the `x` is trailing text.
fn hex_digits(s: &str) -> Option<&str> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    digits
        .starts_with(|c: char| c.is_ascii_hexdigit())
        .then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_id_in_sysfs_forms() {
        assert_eq!(parse_c_int("0x1137"), Some(0x1137));
        assert_eq!(parse_c_int("0X1137"), Some(0x1137));
        assert_eq!(parse_c_int("4407"), Some(0x1137));
        assert_eq!(parse_c_int("0x1137\n"), Some(0x1137));
        assert_eq!(parse_c_int("  0x10de"), Some(0x10de));
    }

    #[test]
    fn base_follows_prefix() {
        assert_eq!(parse_c_int("010"), Some(8));
        assert_eq!(parse_c_int("0"), Some(0));
        assert_eq!(parse_c_int("09"), Some(0));
        assert_eq!(parse_c_int("0xff"), Some(255));
        assert_eq!(parse_c_int("0xFF"), Some(255));
    }

    #[test]
    fn sign_is_honored() {
        assert_eq!(parse_c_int("-12"), Some(-12));
        assert_eq!(parse_c_int("+12"), Some(12));
        assert_eq!(parse_c_int("-0x10"), Some(-16));
        assert_eq!(parse_c_int("-2147483648"), Some(i32::MIN));
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(parse_c_int("4407abc"), Some(4407));
        assert_eq!(parse_c_int("0x1137zz"), Some(0x1137));
        assert_eq!(parse_c_int("0x"), Some(0));
        assert_eq!(parse_c_int("0xg"), Some(0));
    }

    #[test]
    fn no_digits_is_none() {
        assert_eq!(parse_c_int(""), None);
        assert_eq!(parse_c_int("   "), None);
        assert_eq!(parse_c_int("cisco"), None);
        assert_eq!(parse_c_int("-"), None);
        assert_eq!(parse_c_int("x1137"), None);
        assert_eq!(parse_c_int("- 1"), None);
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(parse_c_int("2147483648"), None);
        assert_eq!(parse_c_int("0xffffffff"), None);
        assert_eq!(parse_c_int("99999999999999999999999"), None);
        assert_eq!(parse_c_int("2147483647"), Some(i32::MAX));
    }
}
