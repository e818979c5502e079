use std::io::{self, Read};

use crawl_logging::{crawl_debug, crawl_warn, single_line_diagnostic};

use crate::collect::{CollectSettings, StreamCollector};
use crate::links::LinkScanner;
use crate::normalize::{LinkPatterns, UrlNormalizer};
use crate::types::{ExtractOutcome, Fault, FetchResult, NoResultReason};

pub const DEFAULT_MAX_SOURCE_URL_LEN: usize = 500;

/// Hands out the body of a page as a forward-only byte stream.
pub trait PageSource: Send + Sync {
    fn open(&self, url: &str) -> io::Result<Box<dyn Read + Send>>;
}

pub trait Extractor: Send + Sync {
    fn extract(&self, url: &str, source: &dyn PageSource) -> ExtractOutcome;
}

#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub max_source_url_len: usize,
    pub collect: CollectSettings,
    pub patterns: LinkPatterns,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_source_url_len: DEFAULT_MAX_SOURCE_URL_LEN,
            collect: CollectSettings::default(),
            patterns: LinkPatterns::default(),
        }
    }
}

/// Extracts the crawlable outlinks of a page:
/// collect and decode the body, scan for `<a href>`, normalize the hrefs.
#[derive(Debug, Clone)]
pub struct OutlinkExtractor {
    max_source_url_len: usize,
    collector: StreamCollector,
    scanner: LinkScanner,
    normalizer: UrlNormalizer,
}

impl OutlinkExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            max_source_url_len: settings.max_source_url_len,
            collector: StreamCollector::new(settings.collect),
            scanner: LinkScanner::new(),
            normalizer: UrlNormalizer::new(settings.patterns),
        }
    }

    pub fn normalizer(&self) -> &UrlNormalizer {
        &self.normalizer
    }

    /// Cheap guard against malformed frontier input, checked before any I/O.
    pub fn accepts(&self, url: &str) -> bool {
        !url.is_empty()
            && has_http_scheme(url)
            && url.chars().count() <= self.max_source_url_len
    }

    /// Runs the pipeline over an already opened stream.
    pub fn extract_from_reader<R: Read>(&self, url: &str, reader: R) -> ExtractOutcome {
        if !self.accepts(url) {
            crawl_debug!("rejected source url of {} bytes", url.len());
            return ExtractOutcome::NoResult(NoResultReason::InputRejected);
        }
        self.run(url, || Ok(reader))
    }

    /// Extracts outlinks from an in-memory document.
    pub fn extract_from_html(&self, url: &str, html: &str) -> ExtractOutcome {
        if !self.accepts(url) {
            return ExtractOutcome::NoResult(NoResultReason::InputRejected);
        }
        let Some(base) = self.normalizer.base_url(url) else {
            return ExtractOutcome::NoResult(NoResultReason::NoBaseUrl);
        };
        self.scan_and_normalize(url, html, &base)
    }

    fn run<R, F>(&self, url: &str, open: F) -> ExtractOutcome
    where
        R: Read,
        F: FnOnce() -> io::Result<R>,
    {
        let Some(base) = self.normalizer.base_url(url) else {
            crawl_debug!("no base url in {url}");
            return ExtractOutcome::NoResult(NoResultReason::NoBaseUrl);
        };

        let collected = match open().and_then(|reader| self.collector.collect(reader)) {
            Ok(collected) => collected,
            Err(err) => return fault(url, &err),
        };
        crawl_debug!(
            "{url}: {} bytes decoded as {}",
            collected.stats.bytes,
            collected.decoded.encoding_label
        );

        self.scan_and_normalize(url, &collected.decoded.html, &base)
    }

    fn scan_and_normalize(&self, url: &str, html: &str, base: &str) -> ExtractOutcome {
        let links = match self.scanner.scan(html) {
            Ok(links) => links,
            Err(_) => return ExtractOutcome::NoResult(NoResultReason::MalformedMarkup),
        };
        let outlinks = self.normalizer.normalize(links, base);
        ExtractOutcome::Extracted(FetchResult::new(url, outlinks))
    }
}

impl Default for OutlinkExtractor {
    fn default() -> Self {
        Self::new(ExtractorSettings::default())
    }
}

impl Extractor for OutlinkExtractor {
    /// The source is only opened once the URL passed the guard and yielded a
    /// base URL.
    fn extract(&self, url: &str, source: &dyn PageSource) -> ExtractOutcome {
        if !self.accepts(url) {
            crawl_debug!("rejected source url of {} bytes", url.len());
            return ExtractOutcome::NoResult(NoResultReason::InputRejected);
        }
        self.run(url, || source.open(url))
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn fault(url: &str, err: &io::Error) -> ExtractOutcome {
    let message = single_line_diagnostic(&err.to_string(), url);
    crawl_warn!("{message}");
    ExtractOutcome::Fault(Fault {
        source_url: url.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::{has_http_scheme, OutlinkExtractor};

    #[test]
    fn scheme_check_is_case_insensitive() {
        assert!(has_http_scheme("http://a"));
        assert!(has_http_scheme("HTTPS://a"));
        assert!(!has_http_scheme("ftp://a"));
        assert!(!has_http_scheme("httpx://a"));
        assert!(!has_http_scheme("ht"));
    }

    #[test]
    fn guard_limits_length_in_characters() {
        let extractor = OutlinkExtractor::default();
        let base = "http://example.com/";
        let fits = format!("{base}{}", "ä".repeat(500 - base.len()));
        let too_long = format!("{fits}x");
        assert!(extractor.accepts(&fits));
        assert!(!extractor.accepts(&too_long));
        assert!(!extractor.accepts(""));
    }
}
