//! Small HTML helpers shared by buttons, menus, and the rich text converters.

use std::sync::LazyLock;

use regex::Regex;

/// Schemes a stored link may use. Relative URLs are always allowed.
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

#[allow(clippy::expect_used)]
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9][-+.a-z0-9]*):").expect("scheme pattern is valid")
});

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Decode character references produced by [`html_escape`] and the common
/// named/numeric forms found in pasted markup.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&candidate[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Return the URL when it is safe to store in a link, `None` otherwise.
///
/// Relative URLs pass; absolute URLs must use an allowed scheme. Whitespace
/// and control characters are ignored when detecting the scheme so that
/// "java\tscript:" style tricks are caught.
pub fn check_url(url: &str) -> Option<&str> {
    let probe: String = decode_entities(url)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    match SCHEME_RE.captures(&probe) {
        Some(caps) => {
            let scheme = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            ALLOWED_URL_SCHEMES.contains(&scheme).then_some(url)
        }
        None => Some(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_special_chars() {
        assert_eq!(
            html_escape("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn decode_reverses_escape() {
        let original = "<a href=\"x\">Tom & Jerry's</a>";
        assert_eq!(decode_entities(&html_escape(original)), original);
    }

    #[test]
    fn decode_numeric_and_named() {
        assert_eq!(decode_entities("&#65;&#x42;&nbsp;"), "AB\u{a0}");
        assert_eq!(decode_entities("fish &chips; & more"), "fish &chips; & more");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn check_url_allows_safe_schemes() {
        assert_eq!(check_url("https://example.com"), Some("https://example.com"));
        assert_eq!(check_url("mailto:a@b.c"), Some("mailto:a@b.c"));
        assert_eq!(check_url("/relative/path"), Some("/relative/path"));
        assert_eq!(check_url("#anchor"), Some("#anchor"));
    }

    #[test]
    fn check_url_rejects_script_schemes() {
        assert_eq!(check_url("javascript:alert(1)"), None);
        assert_eq!(check_url("JavaScript:alert(1)"), None);
        assert_eq!(check_url(" java\tscript:alert(1)"), None);
        assert_eq!(check_url("data:text/html,hi"), None);
    }
}
