//! Result consumer
//!
//! Drains the record and error channels of a fetch session until both are closed,
//! rendering every item as it arrives and counting records.

use std::io::Write;

use tokio::sync::mpsc::Receiver;
use tracing::warn;

use crate::core::error::FetchError;
use crate::core::model::LicenseRecord;
use crate::core::render::RecordRenderer;

/// Counts of what a consumer observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub records: usize,
    pub errors: usize,
}

/// Drain both channels to completion.
///
/// Records and errors may interleave in any order; each is written exactly once. A closed
/// channel is no longer polled, and the loop keeps going until the other one closes too.
pub async fn drain<W: Write>(
    mut records: Receiver<LicenseRecord>,
    mut errors: Receiver<FetchError>,
    renderer: &RecordRenderer,
    out: &mut W,
) -> Tally {
    let mut tally = Tally::default();
    let mut records_open = true;
    let mut errors_open = true;

    while records_open || errors_open {
        tokio::select! {
            record = records.recv(), if records_open => match record {
                Some(record) => {
                    tally.records += 1;
                    emit(out, &renderer.render(&record));
                }
                None => records_open = false,
            },
            err = errors.recv(), if errors_open => match err {
                Some(err) => {
                    tally.errors += 1;
                    report_error(out, &err);
                }
                None => errors_open = false,
            },
        }
    }

    tally
}

/// Report a session that could not start at all. Counts as one error, zero records.
pub fn report_setup_failure<W: Write>(err: &FetchError, out: &mut W) -> Tally {
    report_error(out, err);
    Tally {
        records: 0,
        errors: 1,
    }
}

fn report_error<W: Write>(out: &mut W, err: &FetchError) {
    emit(
        out,
        &format!("There was an error while processing your request: {}", err),
    );
}

fn emit<W: Write>(out: &mut W, text: &str) {
    if let Err(e) = writeln!(out, "{}", text) {
        warn!(error = %e, "failed to write output");
    }
}
