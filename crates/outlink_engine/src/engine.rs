use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crawl_logging::{crawl_debug, crawl_info};

use crate::extract::{Extractor, ExtractorSettings, OutlinkExtractor};
use crate::fetch::{BlockingPageSource, FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, JobId};

enum EngineCommand {
    Enqueue { job_id: JobId, url: String },
}

/// Runs extractions concurrently on a background runtime, one blocking task
/// per job. Jobs share nothing but the fetcher's connection pool.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(fetch: FetchSettings, extract: ExtractorSettings) -> io::Result<Self> {
        let fetcher = ReqwestFetcher::new(fetch).map_err(io::Error::other)?;
        Self::with_fetcher(Arc::new(fetcher), extract)
    }

    pub fn with_fetcher<F: Fetcher + 'static>(
        fetcher: Arc<F>,
        extract: ExtractorSettings,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let source = Arc::new(BlockingPageSource::new(fetcher, runtime.handle().clone()));
        let extractor = Arc::new(OutlinkExtractor::new(extract));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Enqueue { job_id, url } => {
                        let source = source.clone();
                        let extractor = extractor.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn_blocking(move || {
                            let outcome = extractor.extract(&url, source.as_ref());
                            crawl_debug!("job {job_id} finished, extracted={}", outcome.is_extracted());
                            let _ = event_tx.send(EngineEvent::JobCompleted {
                                job_id,
                                source_url: url,
                                outcome,
                            });
                        });
                    }
                }
            }
            crawl_info!("engine command channel closed, shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn enqueue(&self, job_id: JobId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Enqueue {
            job_id,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
