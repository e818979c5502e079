//! Buffers a page body of unknown length while sniffing its charset.

use std::io::{self, Read};

use crawl_logging::crawl_trace;

use crate::decode::{decode_with, CharsetSniffer, DecodedHtml};

/// Read granularity and starting buffer size for [`StreamCollector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectSettings {
    pub chunk_size: usize,
    pub initial_capacity: usize,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            // most pages fit into a megabyte
            initial_capacity: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub bytes: usize,
    pub chunks: usize,
    pub doublings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedDocument {
    pub decoded: DecodedHtml,
    pub stats: CollectStats,
}

#[derive(Debug, Clone, Default)]
pub struct StreamCollector {
    settings: CollectSettings,
}

impl StreamCollector {
    pub fn new(settings: CollectSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CollectSettings {
        &self.settings
    }

    /// Reads `reader` to the end and decodes it with the sniffed charset.
    ///
    /// Each chunk reaches the charset sniffer once, in order, as it is read.
    /// Any read error other than `Interrupted` aborts the collection.
    pub fn collect<R: Read>(&self, mut reader: R) -> io::Result<CollectedDocument> {
        let chunk_size = self.settings.chunk_size.max(1);
        let mut buffer: Vec<u8> = Vec::with_capacity(self.settings.initial_capacity);
        let mut chunk = vec![0u8; chunk_size];
        let mut sniffer = CharsetSniffer::new();
        let mut stats = CollectStats::default();

        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            let data = &chunk[..read];
            sniffer.feed(data);
            stats.doublings += grow_for(&mut buffer, read);
            buffer.extend_from_slice(data);
            stats.chunks += 1;
        }

        stats.bytes = buffer.len();
        let encoding = sniffer.finish(&buffer);
        crawl_trace!(
            "collected {} bytes in {} chunks ({} doublings), charset {}",
            stats.bytes,
            stats.chunks,
            stats.doublings,
            encoding.name()
        );
        Ok(CollectedDocument {
            decoded: decode_with(&buffer, encoding),
            stats,
        })
    }
}

/// Doubles the capacity of `buffer` until `incoming` more bytes fit.
/// Returns the number of doublings.
fn grow_for(buffer: &mut Vec<u8>, incoming: usize) -> u32 {
    let needed = buffer.len() + incoming;
    if needed <= buffer.capacity() {
        return 0;
    }
    let mut target = buffer.capacity().max(1);
    let mut doublings = 0;
    while target < needed {
        target *= 2;
        doublings += 1;
    }
    buffer.reserve_exact(target - buffer.len());
    doublings
}

#[cfg(test)]
mod tests {
    use super::grow_for;

    #[test]
    fn no_growth_when_chunk_fits() {
        let mut buffer: Vec<u8> = Vec::with_capacity(16);
        assert_eq!(grow_for(&mut buffer, 16), 0);
        assert!(buffer.capacity() >= 16);
    }

    #[test]
    fn capacity_doubles_on_overflow() {
        let mut buffer: Vec<u8> = Vec::with_capacity(16);
        buffer.extend_from_slice(&[0u8; 10]);
        assert_eq!(grow_for(&mut buffer, 10), 1);
        assert!(buffer.capacity() >= 32);
    }

    #[test]
    fn oversized_chunk_doubles_repeatedly() {
        let mut buffer: Vec<u8> = Vec::with_capacity(4);
        assert_eq!(grow_for(&mut buffer, 33), 4);
        assert!(buffer.capacity() >= 64);
    }

    #[test]
    fn zero_capacity_still_grows() {
        let mut buffer: Vec<u8> = Vec::new();
        assert_eq!(grow_for(&mut buffer, 3), 2);
        assert!(buffer.capacity() >= 4);
    }
}
