//! The page loop: fetch catalog pages in ascending order until an empty
//! page, reconcile each one, then give deferred variations their second
//! chance.

use importer_engine::{CatalogFeed, FeedError, ReconciliationEngine, StoreApi};
use importer_logging::import_info;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub pages_fetched: u64,
    pub total_processed: usize,
}

pub async fn run_import<F, S>(
    feed: &F,
    engine: &mut ReconciliationEngine<S>,
    start_page: u64,
) -> Result<RunReport, FeedError>
where
    F: CatalogFeed,
    S: StoreApi,
{
    let mut report = RunReport::default();
    let mut page_num = start_page;
    loop {
        import_info!("fetching catalog page {page_num}");
        let records = feed.fetch_page(page_num).await?;
        if records.is_empty() {
            import_info!("page {page_num} is empty, pagination finished");
            break;
        }
        report.pages_fetched += 1;
        engine.process_page(page_num, records).await;
        page_num += 1;
    }

    engine.drain_deferred().await;
    report.total_processed = engine.total_processed();
    Ok(report)
}
