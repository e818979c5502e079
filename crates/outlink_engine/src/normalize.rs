//! Turns raw hrefs into the set of crawlable absolute URLs of a page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::RawLink;

pub const DEFAULT_ABSOLUTE_PREFIX: &str = r"https?://[a-z0-9.\-]+(:[0-9]+)?";
pub const DEFAULT_IGNORED_SUFFIX: &str = r"\.(css|js|bmp|gif|jpe?g|png|tiff?|mid|mp2|mp3|mp4|wav|avi|mov|mpeg|ram|m4v|pdf|rm|smil|wmv|swf|wma|zip|rar|gz)$";

#[allow(clippy::expect_used)]
static DEFAULT_PATTERNS: LazyLock<LinkPatterns> = LazyLock::new(|| {
    LinkPatterns::new(DEFAULT_ABSOLUTE_PREFIX, DEFAULT_IGNORED_SUFFIX)
        .expect("built-in link patterns are valid")
});

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid absolute url pattern: {0}")]
    AbsolutePrefix(#[source] regex::Error),
    #[error("invalid ignored suffix pattern: {0}")]
    IgnoredSuffix(#[source] regex::Error),
}

/// The two patterns that decide which hrefs are crawlable.
///
/// `absolute_prefix` recognises `scheme://host[:port]`; its leftmost match in
/// a page URL is that page's base URL. `ignored_suffix` recognises links to
/// content that is not worth crawling (styles, scripts, media, archives,
/// documents).
#[derive(Debug, Clone)]
pub struct LinkPatterns {
    absolute_prefix: Regex,
    ignored_suffix: Regex,
}

impl LinkPatterns {
    pub fn new(absolute_prefix: &str, ignored_suffix: &str) -> Result<Self, PatternError> {
        Ok(Self {
            absolute_prefix: Regex::new(absolute_prefix).map_err(PatternError::AbsolutePrefix)?,
            ignored_suffix: Regex::new(ignored_suffix).map_err(PatternError::IgnoredSuffix)?,
        })
    }

    pub fn absolute_prefix(&self) -> &Regex {
        &self.absolute_prefix
    }

    pub fn ignored_suffix(&self) -> &Regex {
        &self.ignored_suffix
    }
}

impl Default for LinkPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrlNormalizer {
    patterns: LinkPatterns,
}

impl UrlNormalizer {
    pub fn new(patterns: LinkPatterns) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &LinkPatterns {
        &self.patterns
    }

    /// Leftmost absolute-URL prefix found anywhere in `source_url`.
    pub fn base_url(&self, source_url: &str) -> Option<String> {
        self.patterns
            .absolute_prefix
            .find(source_url)
            .map(|m| m.as_str().to_string())
    }

    /// Absolute-looking from the first character and not an ignored suffix.
    pub fn is_valid(&self, link: &str) -> bool {
        self.patterns
            .absolute_prefix
            .find(link)
            .is_some_and(|m| m.start() == 0)
            && !self.patterns.ignored_suffix.is_match(link)
    }

    /// Resolves one href against `base`.
    ///
    /// Only root-relative hrefs (`/path`) are expanded. `../x`, `./x` and
    /// `//host/x` are dropped, as is anything that is still invalid once
    /// resolved.
    pub fn resolve(&self, href: &str, base: &str) -> Option<String> {
        if self.is_valid(href) {
            return Some(href.to_string());
        }
        if href.starts_with('/') && !href.starts_with("//") {
            let joined = format!("{base}{href}");
            if self.is_valid(&joined) {
                return Some(joined);
            }
        }
        None
    }

    pub fn normalize<I>(&self, links: I, base: &str) -> HashSet<String>
    where
        I: IntoIterator<Item = RawLink>,
    {
        links
            .into_iter()
            .filter_map(|link| self.resolve(&link.href, base))
            .collect()
    }
}
