use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::types::RawLink;

/// Characters inspected by the binary-content guard.
const SAMPLE_CHARS: usize = 8 * 1024;
/// Share of suspicious characters above which a document counts as noise.
const MAX_SUSPICIOUS_RATIO: f64 = 0.10;

#[allow(clippy::expect_used)]
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// The decoded text is not markup at all, usually binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("document is not parseable markup")]
pub struct MalformedMarkup;

/// Finds the href values of `<a>` elements in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkScanner;

impl LinkScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scans `html` for hyperlinks. Other link-like elements (`<link>`,
    /// `<img>`, `<area>`) are not outlinks and are ignored.
    pub fn scan(&self, html: &str) -> Result<Vec<RawLink>, MalformedMarkup> {
        if looks_binary(html) {
            return Err(MalformedMarkup);
        }

        let document = Html::parse_document(html);
        let links = document
            .select(&ANCHOR)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| RawLink {
                href: href.to_string(),
            })
            .collect();
        Ok(links)
    }
}

/// html5ever accepts any input, so garbage has to be recognised up front:
/// a NUL anywhere, or too many control and replacement characters.
fn looks_binary(text: &str) -> bool {
    if text.contains('\0') {
        return true;
    }
    let mut total = 0usize;
    let mut suspicious = 0usize;
    for ch in text.chars().take(SAMPLE_CHARS) {
        total += 1;
        let control = ch.is_control() && !matches!(ch, '\t' | '\n' | '\r' | '\u{0C}');
        if control || ch == char::REPLACEMENT_CHARACTER {
            suspicious += 1;
        }
    }
    total > 0 && suspicious as f64 / total as f64 > MAX_SUSPICIOUS_RATIO
}

#[cfg(test)]
mod tests {
    use super::{looks_binary, LinkScanner, MalformedMarkup};

    fn hrefs(html: &str) -> Vec<String> {
        LinkScanner::new()
            .scan(html)
            .unwrap()
            .into_iter()
            .map(|link| link.href)
            .collect()
    }

    #[test]
    fn anchors_are_returned_in_document_order() {
        let html = r#"<p><a href="/b">B</a> <a href="http://example.com/a">A</a></p>"#;
        assert_eq!(hrefs(html), vec!["/b", "http://example.com/a"]);
    }

    #[test]
    fn missing_and_empty_hrefs_are_skipped() {
        let html = r#"<a name="top">x</a><a href="">y</a><a href="   ">z</a><a href="/ok">ok</a>"#;
        assert_eq!(hrefs(html), vec!["/ok"]);
    }

    #[test]
    fn resource_references_are_not_outlinks() {
        let html = r#"
            <head><link rel="stylesheet" href="/style.css"></head>
            <body><img src="/pic.png"><map><area href="/area"></map><a href=" /real ">r</a></body>
        "#;
        assert_eq!(hrefs(html), vec!["/real"]);
    }

    #[test]
    fn duplicates_are_kept_for_the_normalizer() {
        let html = r#"<a href="/x">1</a><a href="/x">2</a>"#;
        assert_eq!(hrefs(html), vec!["/x", "/x"]);
    }

    #[test]
    fn sloppy_markup_still_scans() {
        let html = r#"<html><body><p><a href="/one">one<a href="/two">two</p></div>"#;
        assert_eq!(hrefs(html), vec!["/one", "/two"]);
    }

    #[test]
    fn binary_noise_is_malformed() {
        let noise: String = (0u8..=255).cycle().take(4096).map(char::from).collect();
        assert_eq!(LinkScanner::new().scan(&noise), Err(MalformedMarkup));
    }

    #[test]
    fn plain_text_is_not_binary() {
        assert!(!looks_binary("just some words\n\twith a tab"));
        assert!(!looks_binary(""));
        assert!(looks_binary("\u{FFFD}\u{FFFD}\u{FFFD}abc"));
    }
}
