use std::{io::Read, path::Path, pin::pin};

use futures::{StreamExt, stream};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    error::LoadError,
    models::{LoadOptions, LoadReport, Title},
    source::TitleSource,
    store::TitleStore,
};

pub async fn load_csv(
    store: &TitleStore,
    path: &Path,
    options: &LoadOptions,
) -> Result<LoadReport, LoadError> {
    info!(path = %path.display(), "loading titles");
    let source = TitleSource::open(path)?;
    load(store, source, options).await
}

/// Replaces the contents of the store with the titles in `source`.
///
/// Options are checked before anything is touched. The collection is then
/// cleared. Rows are read and transformed on a
/// blocking thread and handed over through a bounded channel, then written in
/// batches of `batch_size` with at most `max_in_flight` bulk inserts running.
/// The first failed insert ends the load; batches already written stay.
pub async fn load<R>(
    store: &TitleStore,
    source: TitleSource<R>,
    options: &LoadOptions,
) -> Result<LoadReport, LoadError>
where
    R: Read + Send + 'static,
{
    let capacity = options.channel_capacity()?;
    let batch_size = options.batch_size;
    let max_in_flight = options.max_in_flight;

    let cleared = store.clear().await?;
    debug!(cleared, "cleared titles");

    let (tx, rx) = mpsc::channel::<Title>(capacity);
    let current_year = options.current_year;
    let policy = options.invalid_rows;
    let producer =
        tokio::task::spawn_blocking(move || source.send_titles(tx, current_year, policy));

    let titles = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|t| (t, rx)) });
    let mut batches = pin!(
        titles
            .chunks(batch_size)
            .map(move |batch| async move {
                let len = batch.len();
                store.insert_batch(batch).await.map(|()| len)
            })
            .buffer_unordered(max_in_flight)
    );

    let mut inserted = 0usize;
    while let Some(written) = batches.next().await {
        inserted += written?;
        debug!(inserted, "batch written");
    }

    let summary = producer.await??;

    let report = LoadReport {
        cleared,
        rows_read: summary.rows_read,
        inserted,
        rejected: summary.rejected,
    };
    info!(
        cleared = report.cleared,
        rows_read = report.rows_read,
        inserted = report.inserted,
        rejected = report.rejected,
        "titles loaded"
    );

    Ok(report)
}
