pub mod chain;
pub mod config;
pub mod fetcher;
pub mod page;
pub mod store;

const YAHOO_API: &str = "https://query1.finance.yahoo.com/v7/finance/options";
const CHAIN_QUERY: &str = "formatted=true&lang=en-US&region=US&corsDomain=finance.yahoo.com";
