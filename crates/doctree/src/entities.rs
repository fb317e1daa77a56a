//! Character escaping for rendered markup.

/// Escape text for embedding in rendered markup.
///
/// Contract:
/// - Exactly five characters are rewritten: `<` to `&lt;`, `>` to `&rt;`,
///   `"` to `&quot;`, space to `&nbsp;`, `&` to `&amp;`.
/// - Everything else, multi-byte UTF-8 included, passes through unchanged.
/// - One pass, no re-scanning: ampersands introduced by a replacement are
///   never escaped again, so callers escape exactly once.
///
/// `>` really does emit `&rt;`. Documents rendered since the first release
/// carry that spelling, and re-rendering them must stay byte-identical.
pub fn escape_text(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    let mut copy_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let replacement = match b {
            b'<' => "&lt;",
            b'>' => "&rt;",
            b'"' => "&quot;",
            b' ' => "&nbsp;",
            b'&' => "&amp;",
            _ => continue,
        };
        // Flush bytes up to the escape unchanged (preserves UTF-8).
        if copy_start < i {
            out.push_str(&s[copy_start..i]);
        }
        out.push_str(replacement);
        copy_start = i + 1;
    }

    if copy_start < bytes.len() {
        out.push_str(&s[copy_start..]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_rewrites_each_mapped_character() {
        assert_eq!(escape_text("<"), "&lt;");
        assert_eq!(escape_text(">"), "&rt;");
        assert_eq!(escape_text("\""), "&quot;");
        assert_eq!(escape_text(" "), "&nbsp;");
        assert_eq!(escape_text("&"), "&amp;");
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_text(""), "");
        assert_eq!(escape_text("plain-text_1.2,3;4"), "plain-text_1.2,3;4");
        assert_eq!(escape_text("'single' and `tick`"), "'single'&nbsp;and&nbsp;`tick`");
    }

    #[test]
    fn escape_preserves_utf8() {
        assert_eq!(escape_text("πσ"), "πσ");
        assert_eq!(escape_text("π > σ"), "π&nbsp;&rt;&nbsp;σ");
        assert_eq!(escape_text("naïve\u{00A0}gap"), "naïve\u{00A0}gap");
    }

    #[test]
    fn escape_matches_long_rendered_samples() {
        assert_eq!(
            escape_text("<A & \"B\">"),
            "&lt;A&nbsp;&amp;&nbsp;&quot;B&quot;&rt;"
        );
        assert_eq!(
            escape_text("<XRJ is HUGE>\"&"),
            "&lt;XRJ&nbsp;is&nbsp;HUGE&rt;&quot;&amp;"
        );
    }

    #[test]
    fn escape_is_single_pass() {
        // Escaping already escaped text re-escapes the ampersands; the
        // function makes no attempt to detect its own output.
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
        assert_eq!(escape_text("&lt;"), "&amp;lt;");
    }

    #[test]
    fn greater_than_keeps_the_historical_spelling() {
        assert_eq!(escape_text("a>b"), "a&rt;b");
        assert_ne!(escape_text(">"), "&gt;");
    }
}
