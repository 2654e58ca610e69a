use reqwest::{Client, header::ACCEPT};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CHAIN_QUERY, YAHOO_API};

#[derive(Debug)]
pub enum FetchError {
    HttpError(String),
    BadStatus(u16),
    MalformedJson(String),
    MissingField(String),
    SchemaChanged,
}

/// One idempotent GET per chain page. The orchestrator only sees this trait,
/// so tests can run it against canned documents.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_chain_root(&self, symbol: &str) -> Result<Value, FetchError>;
    async fn fetch_expiry_page(&self, symbol: &str, expiry: i64) -> Result<Value, FetchError>;
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> PageFetcher {
        Self {
            client: Client::new(),
        }
    }

    async fn get_json(&self, url: String) -> Result<Value, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return Err(FetchError::HttpError(e.to_string())),
        };

        if !response.status().is_success() {
            warn!("Got response code {} for {url}", response.status());
            return Err(FetchError::BadStatus(response.status().as_u16()));
        }

        match response.json::<Value>().await {
            Ok(doc) => Ok(doc),
            Err(e) => Err(FetchError::MalformedJson(e.to_string())),
        }
    }
}

impl Default for PageFetcher {
    fn default() -> PageFetcher {
        PageFetcher::new()
    }
}

impl PageSource for PageFetcher {
    async fn fetch_chain_root(&self, symbol: &str) -> Result<Value, FetchError> {
        self.get_json(chain_root_url(symbol)).await
    }

    async fn fetch_expiry_page(&self, symbol: &str, expiry: i64) -> Result<Value, FetchError> {
        self.get_json(expiry_page_url(symbol, expiry)).await
    }
}

fn chain_root_url(symbol: &str) -> String {
    format!("{YAHOO_API}/{symbol}?{CHAIN_QUERY}")
}

fn expiry_page_url(symbol: &str, expiry: i64) -> String {
    format!("{}&date={expiry}", chain_root_url(symbol))
}
