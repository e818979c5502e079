use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Whether malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Incremental charset inference over a byte stream.
///
/// Chunks must be fed exactly once and in stream order; `finish` closes the
/// detector and picks the encoding for the accumulated bytes.
pub struct CharsetSniffer {
    detector: EncodingDetector,
    saw_non_ascii: bool,
}

impl CharsetSniffer {
    pub fn new() -> Self {
        Self {
            detector: EncodingDetector::new(),
            saw_non_ascii: false,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        if self.detector.feed(chunk, false) {
            self.saw_non_ascii = true;
        }
    }

    /// Selection order: BOM -> confident detector guess -> UTF-8.
    pub fn finish(mut self, bytes: &[u8]) -> &'static Encoding {
        self.detector.feed(&[], true);

        // chardetng does not look at byte order marks
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return encoding;
        }
        if !self.saw_non_ascii {
            return UTF_8;
        }
        let (encoding, probably_right) = self.detector.guess_assess(None, true);
        if probably_right {
            encoding
        } else {
            UTF_8
        }
    }
}

impl Default for CharsetSniffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode with replacement of malformed sequences. A leading BOM is removed.
pub fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedHtml {
    let (text, used, had_errors) = enc.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: used.name().to_string(),
        had_errors,
    }
}

/// Decode a complete buffer in one go, sniffing the charset from its bytes.
pub fn decode_html(bytes: &[u8]) -> DecodedHtml {
    let mut sniffer = CharsetSniffer::new();
    sniffer.feed(bytes);
    let encoding = sniffer.finish(bytes);
    decode_with(bytes, encoding)
}
