//! Outlink engine: turns a fetched page into the set of crawlable links it
//! points to.
mod collect;
mod decode;
mod engine;
mod extract;
mod fetch;
mod links;
mod normalize;
mod types;

pub use collect::{CollectSettings, CollectStats, CollectedDocument, StreamCollector};
pub use decode::{decode_html, decode_with, CharsetSniffer, DecodedHtml};
pub use engine::EngineHandle;
pub use extract::{
    Extractor, ExtractorSettings, OutlinkExtractor, PageSource, DEFAULT_MAX_SOURCE_URL_LEN,
};
pub use fetch::{
    BlockingPageSource, BodyReader, FetchSettings, Fetcher, PageStream, ReqwestFetcher,
    DEFAULT_USER_AGENT,
};
pub use links::{LinkScanner, MalformedMarkup};
pub use normalize::{
    LinkPatterns, PatternError, UrlNormalizer, DEFAULT_ABSOLUTE_PREFIX, DEFAULT_IGNORED_SUFFIX,
};
pub use types::{
    EngineEvent, ExtractOutcome, FailureKind, Fault, FetchError, FetchResult, JobId,
    NoResultReason, RawLink,
};
