//! Paginated fetch session
//!
//! A [`Fetcher`] runs as its own task. It requests pages in increasing offset order,
//! pushes every record onto a bounded channel in response order, and stops on exactly one
//! of: limit reached, an empty page, an error, or cancellation. The single terminal error
//! (if any) goes on a separate error channel; both channels close when the task returns.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backends::source::{PageRequest, PageSource};
use crate::core::error::FetchError;
use crate::core::model::LicenseRecord;
use crate::query::predicate::Predicate;

/// Upper bound on buffered records, whatever the page size
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;

/// Record limit and page-size ceiling for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Maximum records to emit; 0 means unlimited
    pub limit: usize,
    /// Largest page requested at once; must be > 0
    pub page_size: usize,
}

impl PageLimits {
    pub fn new(limit: usize, page_size: usize) -> Self {
        Self { limit, page_size }
    }

    /// Page size for the next request given how many records were already emitted.
    /// Zero means the limit is satisfied.
    pub fn next_page_size(&self, records_found: usize) -> usize {
        if self.limit == 0 {
            return self.page_size;
        }
        self.page_size.min(self.limit.saturating_sub(records_found))
    }

    /// Capacity of the record channel: one page worth of records, bounded by
    /// [`MAX_CHANNEL_CAPACITY`].
    pub fn channel_capacity(&self) -> usize {
        self.next_page_size(0).clamp(1, MAX_CHANNEL_CAPACITY)
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    LimitReached,
    Exhausted,
    Failed,
    Cancelled,
}

/// Mutable pagination state, owned by the fetch task
#[derive(Debug, Default)]
struct SessionState {
    offset: usize,
    records_found: usize,
}

/// Receiving half of a running session
pub struct FetchSession {
    pub records: mpsc::Receiver<LicenseRecord>,
    pub errors: mpsc::Receiver<FetchError>,
    pub handle: JoinHandle<SessionEnd>,
}

/// Producer that pages through a [`PageSource`]
pub struct Fetcher<S> {
    source: S,
    predicate: Predicate,
    limits: PageLimits,
}

impl<S: PageSource + 'static> Fetcher<S> {
    pub fn new(source: S, predicate: Predicate, limits: PageLimits) -> Self {
        Self {
            source,
            predicate,
            limits,
        }
    }

    /// Spawn the fetch task on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> FetchSession {
        let (record_tx, records) = mpsc::channel(self.limits.channel_capacity());
        let (error_tx, errors) = mpsc::channel(1);

        let handle = tokio::spawn(self.run(record_tx, error_tx, cancel));

        FetchSession {
            records,
            errors,
            handle,
        }
    }

    /// Drive the session to its end. Both senders are dropped on return, closing the channels.
    pub async fn run(
        self,
        records: mpsc::Sender<LicenseRecord>,
        errors: mpsc::Sender<FetchError>,
        cancel: CancellationToken,
    ) -> SessionEnd {
        let mut state = SessionState::default();

        let end = match self.drive(&mut state, &records, &cancel).await {
            Ok(end) => end,
            Err(err) => {
                // the consumer prints the error itself; keep the log below warn
                let end = if err.is_cancelled() {
                    debug!("search cancelled");
                    SessionEnd::Cancelled
                } else {
                    debug!(error = %err, "search failed");
                    SessionEnd::Failed
                };
                // capacity 1 and a single send: never blocks
                if errors.send(err).await.is_err() {
                    debug!("error receiver already dropped");
                }
                end
            }
        };

        info!(
            ?end,
            records = state.records_found,
            offset = state.offset,
            "fetch session finished"
        );
        end
    }

    async fn drive(
        &self,
        state: &mut SessionState,
        records: &mpsc::Sender<LicenseRecord>,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, FetchError> {
        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let page_size = self.limits.next_page_size(state.records_found);
            if page_size == 0 {
                return Ok(SessionEnd::LimitReached);
            }

            let request = PageRequest {
                predicate: self.predicate.as_param(),
                limit: page_size,
                offset: state.offset,
            };
            debug!(limit = page_size, offset = state.offset, "fetching page");

            let mut page = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                page = self.source.fetch_page(&request) => page?,
            };

            if page.is_empty() {
                return Ok(SessionEnd::Exhausted);
            }

            // never emit past the limit, even if the server over-delivers
            page.truncate(page_size);
            let fetched = page.len();

            for record in page {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                    sent = records.send(record) => {
                        if sent.is_err() {
                            return Err(FetchError::ConsumerClosed);
                        }
                    }
                }
                state.records_found += 1;
            }

            state.offset += fetched;
        }
    }
}
