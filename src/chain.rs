use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::fetcher::{FetchError, PageSource};
use crate::page::{self, OptionSide};
use crate::store;

/// Bounded random pause between successive page requests, so a long symbol
/// list does not hammer the remote into rate-limiting us.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    min_ms: u64,
    max_ms: u64,
}

impl Throttle {
    pub fn new(min_ms: u64, max_ms: u64) -> Throttle {
        Throttle { min_ms, max_ms }
    }

    /// Zero-delay policy for tests.
    pub fn none() -> Throttle {
        Throttle {
            min_ms: 0,
            max_ms: 0,
        }
    }

    async fn pause(&self) {
        if self.max_ms == 0 {
            return;
        }
        let wait = rand::rng().random_range(self.min_ms..=self.max_ms);
        debug!("Throttling for {wait}ms");
        sleep(Duration::from_millis(wait)).await;
    }
}

impl Default for Throttle {
    fn default() -> Throttle {
        Throttle::new(2000, 5000)
    }
}

/// Per-symbol outcome, one count per expiry page. Write failures are
/// reported here as well as logged, they never abort the run.
#[derive(Debug, Default, Serialize)]
pub struct ChainReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub write_errors: usize,
}

pub struct ChainFetcher<S> {
    source: S,
    output_root: PathBuf,
    throttle: Throttle,
}

impl<S: PageSource> ChainFetcher<S> {
    pub fn new(source: S, output_root: PathBuf, throttle: Throttle) -> ChainFetcher<S> {
        ChainFetcher {
            source,
            output_root,
            throttle,
        }
    }

    /// Downloads every expiry page for `symbol` that is not already on disk.
    ///
    /// A discovery failure aborts the whole symbol. A failed expiry fetch
    /// only loses that expiry. A page without the `optionChain` envelope
    /// stops the remaining expiries: the upstream contract changed and
    /// further requests would all come back the same way.
    pub async fn fetch_symbol(&self, symbol: &str) -> Result<ChainReport, FetchError> {
        let root = self.source.fetch_chain_root(symbol).await?;
        let dates = page::expiry_dates(&root)?;
        let discovery_day = page::market_day(&root)?;
        debug!("Got expiry dates for {symbol} - {dates:?}");

        let mut report = ChainReport::default();
        for (i, &expiry) in dates.iter().enumerate() {
            let expiry_day = page::utc_to_date(expiry);

            // The calls file under the discovery-day partition is the dedup
            // key. Note the asymmetry: the write below partitions by the
            // fetched page's own market day, which can differ if the market
            // day rolls over mid-run. Kept as-is, see DESIGN.md.
            let probe = store::option_file_path(
                &self.output_root,
                OptionSide::Calls,
                symbol,
                discovery_day,
                expiry_day,
            );
            if probe.exists() {
                debug!("Data already downloaded for {symbol} at {expiry_day}");
                report.skipped += 1;
                continue;
            }

            match self.source.fetch_expiry_page(symbol, expiry).await {
                Ok(page) => match self.persist_page(symbol, expiry, &page, &mut report) {
                    Ok(()) => {
                        report.written += 1;
                        debug!("Downloaded data for {symbol} for {expiry_day}");
                    }
                    Err(FetchError::SchemaChanged) => {
                        warn!(
                            "Got invalid results from site, the API output shape changed: \
                             {symbol} {page}"
                        );
                        report.failed += 1;
                        break;
                    }
                    Err(e) => {
                        warn!("Bad page for {symbol} at {expiry_day}: {e:?}");
                        report.failed += 1;
                    }
                },
                Err(e) => {
                    warn!("Failed to fetch {symbol} page for {expiry_day}: {e:?}");
                    report.failed += 1;
                }
            }

            if i + 1 < dates.len() {
                self.throttle.pause().await;
            }
        }

        Ok(report)
    }

    fn persist_page(
        &self,
        symbol: &str,
        expiry: i64,
        page: &Value,
        report: &mut ChainReport,
    ) -> Result<(), FetchError> {
        if !page::has_chain_envelope(page) {
            return Err(FetchError::SchemaChanged);
        }

        // The write path uses the day this page reports, not the discovery one.
        let market_day = page::market_day(page)?;
        let expiry_day = page::utc_to_date(expiry);

        for side in OptionSide::BOTH {
            let records = page::option_records(page, side)?;
            let path =
                store::option_file_path(&self.output_root, side, symbol, market_day, expiry_day);
            if let Err(e) = store::write_records(&path, &records) {
                warn!("Failed to write {}: {e}", path.display());
                report.write_errors += 1;
            }
        }

        Ok(())
    }
}
