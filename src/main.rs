use rustls::crypto::CryptoProvider;
use tracing::{Level, debug, warn};
use yahoo_options::chain::{ChainFetcher, Throttle};
use yahoo_options::config::Config;
use yahoo_options::fetcher::PageFetcher;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_line_number(true)
        .init();

    CryptoProvider::install_default(rustls::crypto::aws_lc_rs::default_provider())
        .expect("Failed to install default crypto provider");

    let config = match Config::from_args().await {
        Some(config) => config,
        None => return,
    };

    println!("Started");
    let fetcher = ChainFetcher::new(PageFetcher::new(), config.output_root, Throttle::default());

    for symbol in &config.symbols {
        println!("{symbol}...");
        debug!("--> Retrieving data for {symbol}");
        match fetcher.fetch_symbol(symbol).await {
            Ok(report) => debug!("--> Done retrieving data for {symbol}: {report:?}"),
            Err(e) => warn!("Skipping {symbol}: {e:?}"),
        }
    }
    println!("Done");
}
