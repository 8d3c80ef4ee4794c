use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use importer_core::{
    build_full_payload, build_minimal_payload, classify, is_in_scope, is_stale, CatalogRecord,
    DeferredParentQueue, Disposition, InclusionRules, NormalizedProduct, StoreProduct,
};
use importer_logging::{import_debug, import_error, import_info, import_warn};

use crate::retry::RetryPolicy;
use crate::store::StoreApi;
use crate::types::{PageSummary, RecordAction, StoreError};

/// Behaviour knobs for a reconciliation run.
#[derive(Clone)]
pub struct ReconcileSettings {
    /// Minimum age of a store product before another update is issued.
    pub staleness_threshold: ChronoDuration,
    /// Pause after each record in live mode, to respect the store's rate
    /// limit.
    pub request_delay: std::time::Duration,
    /// Skip all mutating store calls; lookups and classification still run.
    pub dry_run: bool,
    pub retry: RetryPolicy,
    /// Clock used for the staleness check, injectable for tests.
    pub now_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            staleness_threshold: ChronoDuration::hours(24),
            request_delay: std::time::Duration::from_secs(1),
            dry_run: true,
            retry: RetryPolicy::default(),
            now_utc: Arc::new(Utc::now),
        }
    }
}

/// Reconciles catalog records against the store: filter, normalize, look
/// up, classify, act. Owns the deferred-parent queue.
pub struct ReconciliationEngine<S: StoreApi> {
    store: S,
    rules: InclusionRules,
    settings: ReconcileSettings,
    deferred: DeferredParentQueue,
    total_processed: usize,
}

impl<S: StoreApi> ReconciliationEngine<S> {
    pub fn new(store: S, rules: InclusionRules, settings: ReconcileSettings) -> Self {
        Self {
            store,
            rules,
            settings,
            deferred: DeferredParentQueue::new(),
            total_processed: 0,
        }
    }

    pub fn total_processed(&self) -> usize {
        self.total_processed
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Processes one catalog page in feed order.
    pub async fn process_page(&mut self, page_num: u64, records: Vec<CatalogRecord>) -> PageSummary {
        let mut summary = PageSummary::new(page_num);
        for record in records {
            let (sku, action) = self.process_record(record, true).await;
            summary.record(sku, action);
            self.total_processed += 1;
            self.pace().await;
        }
        summary.deferred_total = self.deferred.len();
        import_info!(
            "page {}: processed {} (created {}, variations {}, updated {}, fresh {}, out of scope {}, failed {}), {} deferred",
            summary.page_num,
            summary.processed,
            summary.created,
            summary.created_variations,
            summary.updated,
            summary.skipped_fresh,
            summary.out_of_scope,
            summary.failed,
            summary.deferred_total
        );
        summary
    }

    /// Retries deferred variations exactly once, after pagination has
    /// finished. Entries whose parent is still missing are dropped with a
    /// final warning.
    pub async fn drain_deferred(&mut self) -> PageSummary {
        let entries = self.deferred.drain();
        let mut summary = PageSummary::new(0);
        if entries.is_empty() {
            return summary;
        }

        import_info!("retrying {} deferred variation(s)", entries.len());
        for record in entries {
            let (sku, action) = self.process_record(record, false).await;
            summary.record(sku, action);
            self.total_processed += 1;
            self.pace().await;
        }
        import_info!(
            "deferred pass: {} resolved, {} dropped unresolved",
            summary.created_variations + summary.created + summary.updated,
            summary
                .actions
                .iter()
                .filter(|(_, action)| *action == RecordAction::DroppedUnresolvedParent)
                .count()
        );
        summary
    }

    async fn process_record(
        &mut self,
        record: CatalogRecord,
        allow_defer: bool,
    ) -> (String, RecordAction) {
        let sku = record.sku.clone();

        for warning in record.consistency_warnings() {
            import_warn!("{warning}");
        }

        // Variations inherit scope from their parent; only standalone
        // records go through the category filter.
        if !record.is_part_of_variant
            && !is_in_scope(
                &record.attributes.categories,
                &record.attributes.subcategories,
                &self.rules,
                &record.sku,
            )
        {
            return (sku, RecordAction::OutOfScope);
        }

        let normalized = NormalizedProduct::from_record(&record);

        let existing = match self.lookup(&record.sku).await {
            Ok(found) => found,
            Err(err) => {
                import_error!("lookup for {sku} failed after retries: {err}");
                return (sku, RecordAction::Failed);
            }
        };

        let parent = match self.lookup_parent(&record).await {
            Ok(found) => found,
            Err(err) => {
                import_error!("parent lookup for {sku} failed after retries: {err}");
                return (sku, RecordAction::Failed);
            }
        };

        match classify(&record, existing.as_ref(), parent.as_ref()) {
            Disposition::New => {
                let payload = build_full_payload(&record, &normalized);
                if self.settings.dry_run {
                    import_info!("dry run: would create product {sku}");
                    return (sku, RecordAction::Created);
                }
                match self
                    .settings
                    .retry
                    .run(|| self.store.create_product(&payload))
                    .await
                {
                    Ok(()) => (sku, RecordAction::Created),
                    Err(err) => {
                        import_error!("creating {sku} failed after retries: {err}");
                        (sku, RecordAction::Failed)
                    }
                }
            }
            Disposition::VariationResolved { parent_id } => {
                let payload = build_minimal_payload(&record, &normalized);
                if self.settings.dry_run {
                    import_info!("dry run: would create variation {sku} under {parent_id}");
                    return (sku, RecordAction::CreatedVariation { parent_id });
                }
                match self
                    .settings
                    .retry
                    .run(|| self.store.create_variation(parent_id, &payload))
                    .await
                {
                    Ok(()) => (sku, RecordAction::CreatedVariation { parent_id }),
                    Err(err) => {
                        import_error!("creating variation {sku} failed after retries: {err}");
                        (sku, RecordAction::Failed)
                    }
                }
            }
            Disposition::VariationPendingParent => {
                let parent_sku = record.variant_parent.clone().unwrap_or_default();
                if allow_defer {
                    import_debug!("parent {parent_sku} for {sku} not in store yet, deferring");
                    self.deferred.push(record);
                    (sku, RecordAction::Deferred)
                } else {
                    import_warn!("parent {parent_sku} for {sku} never resolved, dropping record");
                    (sku, RecordAction::DroppedUnresolvedParent)
                }
            }
            Disposition::Existing { id, date_modified } => {
                let now = (self.settings.now_utc)();
                if !is_stale(&date_modified, now, self.settings.staleness_threshold) {
                    import_debug!("product {sku} modified recently, skipping update");
                    return (sku, RecordAction::SkippedFresh { id });
                }
                let payload = build_minimal_payload(&record, &normalized);
                if self.settings.dry_run {
                    import_info!("dry run: would update product {sku} (id {id})");
                    return (sku, RecordAction::Updated { id });
                }
                match self
                    .settings
                    .retry
                    .run(|| self.store.update_product(id, &payload))
                    .await
                {
                    Ok(()) => (sku, RecordAction::Updated { id }),
                    Err(err) => {
                        import_error!("updating {sku} failed after retries: {err}");
                        (sku, RecordAction::Failed)
                    }
                }
            }
        }
    }

    async fn lookup(&self, sku: &str) -> Result<Option<StoreProduct>, StoreError> {
        self.settings.retry.run(|| self.store.find_by_sku(sku)).await
    }

    async fn lookup_parent(
        &self,
        record: &CatalogRecord,
    ) -> Result<Option<StoreProduct>, StoreError> {
        if !record.is_part_of_variant {
            return Ok(None);
        }
        let Some(parent_sku) = record.variant_parent.as_deref() else {
            return Ok(None);
        };
        import_debug!("record {} names variant parent {parent_sku}", record.sku);
        self.lookup(parent_sku).await
    }

    async fn pace(&self) {
        if !self.settings.dry_run && !self.settings.request_delay.is_zero() {
            tokio::time::sleep(self.settings.request_delay).await;
        }
    }
}
