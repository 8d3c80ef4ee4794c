//! Catalog-to-store importer binary.
//!
//! Usage: `importer_app [START_PAGE] [DRY_RUN] [--config PATH]`
//!
//! START_PAGE is 1-based; DRY_RUN is `0` or `1` and defaults to `1` so an
//! accidental invocation never mutates the store. The config file defaults
//! to `importer.ron` in the current directory.

mod config;
mod logging;
mod run;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use importer_engine::{ReconciliationEngine, ReqwestCatalogFeed, ReqwestStoreApi};
use importer_logging::{import_info, import_warn};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    start_page: u64,
    dry_run: bool,
    config_path: PathBuf,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            start_page: 1,
            dry_run: true,
            config_path: PathBuf::from("importer.ron"),
        }
    }
}

impl CliArgs {
    /// Lenient positional parsing: malformed values fall back to their
    /// defaults with a warning rather than aborting the run.
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        let mut positional = 0;
        while let Some(arg) = args.next() {
            if arg == "--config" {
                match args.next() {
                    Some(path) => parsed.config_path = PathBuf::from(path),
                    None => import_warn!("--config given without a path, keeping default"),
                }
                continue;
            }
            positional += 1;
            match positional {
                1 => match arg.parse::<u64>() {
                    Ok(page) if page >= 1 => parsed.start_page = page,
                    _ => {
                        import_warn!("start page {arg:?} is not a positive number, using page 1");
                        parsed.start_page = 1;
                    }
                },
                2 => {
                    parsed.dry_run = match arg.as_str() {
                        "0" => false,
                        "1" => true,
                        other => {
                            import_warn!("dry-run flag {other:?} is not 0 or 1, staying in dry run");
                            true
                        }
                    }
                }
                _ => import_warn!("ignoring extra argument {arg:?}"),
            }
        }
        parsed
    }
}

fn main() -> anyhow::Result<()> {
    logging::initialize();

    let args = CliArgs::parse(env::args().skip(1));
    let config = config::load(&args.config_path)?;

    if config.rules.is_empty() {
        import_warn!("no inclusion rules configured, every standalone record is out of scope");
    }
    import_info!(
        "starting sync at page {} ({})",
        args.start_page,
        if args.dry_run { "dry run" } else { "live run" }
    );

    let feed = ReqwestCatalogFeed::new(config.feed_settings()).context("building feed client")?;
    let store = ReqwestStoreApi::new(config.store_settings()).context("building store client")?;
    let mut engine = ReconciliationEngine::new(
        store,
        config.rules.clone(),
        config.reconcile_settings(args.dry_run),
    );

    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    let report = runtime.block_on(run::run_import(&feed, &mut engine, args.start_page))?;

    import_info!(
        "sync finished: {} page(s) fetched, {} record(s) processed",
        report.pages_fetched,
        report.total_processed
    );
    Ok(())
}
