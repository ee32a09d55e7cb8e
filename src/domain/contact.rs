//! Contact details shared by checkout, visitors and contact messages.

/// Rewrites a Ghanaian phone number into the `233…` international form.
///
/// Whitespace is dropped, a `+233` prefix loses its plus and a local leading `0`
/// becomes `233`. Anything else is assumed to already be international.
pub fn normalize_phone(phone: &str) -> String {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(rest) = cleaned.strip_prefix("+233") {
        format!("233{rest}")
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        format!("233{rest}")
    } else {
        cleaned
    }
}

pub fn digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

/// A deliberately small address check: one `@`, a non-empty local part and a
/// dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_number() {
        assert_eq!(normalize_phone("0244123456"), "233244123456");
    }

    #[test]
    fn test_normalize_plus_prefix() {
        assert_eq!(normalize_phone("+233244123456"), "233244123456");
    }

    #[test]
    fn test_normalize_already_international() {
        assert_eq!(normalize_phone("233244123456"), "233244123456");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize_phone(" 024 412 3456 "), "233244123456");
        assert_eq!(normalize_phone("+233 24 412 3456"), "233244123456");
    }

    #[test]
    fn test_digit_count_ignores_formatting() {
        assert_eq!(digit_count("+233 24-412-3456"), 12);
        assert_eq!(digit_count("024412"), 6);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ama@example.com"));
        assert!(is_valid_email("kofi.mensah+food@mail.co.gh"));
        assert!(!is_valid_email("ama@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ama@example"));
        assert!(!is_valid_email("ama @example.com"));
        assert!(!is_valid_email("ama@@example.com"));
    }
}
