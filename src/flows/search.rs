//! Search flow
//!
//! Wires the pieces together: predicate, HTTP source, fetch session, interrupt handling
//! and the consumer. Records and errors go to stderr; the final count goes to stdout.

use std::io::Write;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backends::http::HttpPageSource;
use crate::backends::source::PageSource;
use crate::core::config::SearchConfig;
use crate::core::render::RecordRenderer;
use crate::fetch::session::{Fetcher, PageLimits};
use crate::flows::consume::{drain, report_setup_failure, Tally};
use crate::query::filter::FilterCriteria;
use crate::query::predicate::Predicate;

/// Run one search session to completion and print the summary line.
///
/// Every failure, including one building the HTTP client, is reported on stderr and
/// the summary line is still printed.
pub async fn run_search(
    config: SearchConfig,
    criteria: FilterCriteria,
    renderer: RecordRenderer,
) -> Tally {
    if criteria.is_empty() {
        debug!("no filters given, searching the whole dataset");
    }
    let predicate = Predicate::build(&criteria);
    debug!(%predicate, endpoint = %config.endpoint, "starting search");

    let limits = PageLimits::new(config.limit, config.page_size);
    let mut stderr = std::io::stderr();

    let tally = match HttpPageSource::new(&config.endpoint, &config.app_token, config.timeout) {
        Ok(source) => {
            let cancel = CancellationToken::new();
            let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));
            let tally = run_session(source, predicate, limits, &renderer, cancel, &mut stderr).await;
            interrupt.abort();
            tally
        }
        Err(err) => report_setup_failure(&err, &mut stderr),
    };

    println!("{}", summary_line(tally.records));
    tally
}

/// Spawn a fetch session over `source` and drain it into `out`
pub async fn run_session<S: PageSource + 'static, W: Write>(
    source: S,
    predicate: Predicate,
    limits: PageLimits,
    renderer: &RecordRenderer,
    cancel: CancellationToken,
    out: &mut W,
) -> Tally {
    let session = Fetcher::new(source, predicate, limits).spawn(cancel);
    let tally = drain(session.records, session.errors, renderer, out).await;

    match session.handle.await {
        Ok(end) => debug!(?end, records = tally.records, errors = tally.errors, "search finished"),
        Err(e) => warn!(error = %e, "fetch task did not finish cleanly"),
    }
    tally
}

pub fn summary_line(count: usize) -> String {
    format!("Found {} total licenses", count)
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    interrupted().await;
    info!("interrupt received, cancelling search");
    cancel.cancel();
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn interrupted() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
