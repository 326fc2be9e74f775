//! Small helpers shared by the region renderers.

use crate::model::LinkStatus;

/// Load band for a usage figure such as `"95%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageClass {
    Low,
    Med,
    High,
}

impl UsageClass {
    pub fn css(self) -> &'static str {
        match self {
            Self::Low => "usage-low",
            Self::Med => "usage-med",
            Self::High => "usage-high",
        }
    }
}

/// Classify a usage value by its leading integer.
///
/// `"95%"` → high (> 90), `"75%"` → med (> 70), anything else, including
/// non-numeric input like `"n/a"`, → low.
pub fn usage_class(value: &str) -> UsageClass {
    match leading_integer(value) {
        Some(n) if n > 90.0 => UsageClass::High,
        Some(n) if n > 70.0 => UsageClass::Med,
        _ => UsageClass::Low,
    }
}

/// Parse the integer prefix of `value` (after leading whitespace and an
/// optional sign), ignoring whatever follows. `"42.9%"` → 42.
fn leading_integer(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse::<f64>().ok().map(|n| sign * n)
}

/// CSS class for the little status dot on a card.
pub fn status_dot(status: LinkStatus) -> &'static str {
    if status.is_online() {
        "status-online"
    } else {
        "status-offline"
    }
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only `http(s)` console links are emitted as `href`s.
pub fn safe_href(url: &str) -> Option<String> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(escape(url.trim()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_thresholds() {
        assert_eq!(usage_class("95%"), UsageClass::High);
        assert_eq!(usage_class("75%"), UsageClass::Med);
        assert_eq!(usage_class("10%"), UsageClass::Low);
        assert_eq!(usage_class("n/a"), UsageClass::Low);
    }

    #[test]
    fn usage_boundaries_are_exclusive() {
        assert_eq!(usage_class("90%"), UsageClass::Med);
        assert_eq!(usage_class("91%"), UsageClass::High);
        assert_eq!(usage_class("70%"), UsageClass::Low);
        assert_eq!(usage_class("71"), UsageClass::Med);
    }

    #[test]
    fn usage_uses_integer_prefix() {
        assert_eq!(usage_class("90.9%"), UsageClass::Med);
        assert_eq!(usage_class("  95 %"), UsageClass::High);
        assert_eq!(usage_class("-95%"), UsageClass::Low);
        assert_eq!(usage_class(""), UsageClass::Low);
        assert_eq!(usage_class("%95"), UsageClass::Low);
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(
            escape(r#"<b onclick="x">'a' & b</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;&#39;a&#39; &amp; b&lt;/b&gt;"
        );
        assert_eq!(escape("plain.example.com"), "plain.example.com");
    }

    #[test]
    fn safe_href_rejects_scripts() {
        assert_eq!(
            safe_href("https://10.0.0.1:8006"),
            Some("https://10.0.0.1:8006".to_string())
        );
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href(""), None);
    }
}
