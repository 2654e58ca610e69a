use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

use crate::fetcher::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSide {
    Calls,
    Puts,
}

impl OptionSide {
    pub const BOTH: [OptionSide; 2] = [OptionSide::Calls, OptionSide::Puts];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionSide::Calls => "calls",
            OptionSide::Puts => "puts",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contract row. The fields keep the `Number` the API sent so the
/// serialized form matches the upstream representation digit for digit.
#[derive(Debug, Clone, Serialize)]
pub struct OptionRecord {
    pub strike: Number,
    pub last_price: Number,
    pub bid: Number,
    pub ask: Number,
    pub open_interest: Number,
    pub volume: Number,
    pub implied_volatility: Number,
}

impl fmt::Display for OptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.strike,
            self.last_price,
            self.bid,
            self.ask,
            self.open_interest,
            self.volume,
            self.implied_volatility
        )
    }
}

/// Convert epoch seconds (UTC) to a calendar date.
pub fn utc_to_date(utc: i64) -> NaiveDate {
    DateTime::from_timestamp(utc, 0)
        .map(|ts| ts.date_naive())
        .unwrap_or_default()
}

/// A response without the `optionChain` envelope means the API output
/// changed shape, not that a field went missing.
pub fn has_chain_envelope(doc: &Value) -> bool {
    doc.get("optionChain").is_some()
}

pub fn expiry_dates(doc: &Value) -> Result<Vec<i64>, FetchError> {
    let dates = chain_result(doc)?
        .get("expirationDates")
        .and_then(Value::as_array)
        .ok_or_else(|| missing("expirationDates"))?;

    dates
        .iter()
        .map(|date| date.as_i64().ok_or_else(|| missing("expirationDates[..]")))
        .collect()
}

pub fn market_day(doc: &Value) -> Result<NaiveDate, FetchError> {
    let market_time = chain_result(doc)?
        .get("quote")
        .and_then(|quote| quote.get("regularMarketTime"))
        .and_then(Value::as_i64)
        .ok_or_else(|| missing("quote.regularMarketTime"))?;

    Ok(utc_to_date(market_time))
}

/// Contract rows for one side of the chain, in response order.
pub fn option_records(doc: &Value, side: OptionSide) -> Result<Vec<OptionRecord>, FetchError> {
    let contracts = chain_result(doc)?
        .get("options")
        .and_then(|options| options.get(0))
        .and_then(|chain| chain.get(side.as_str()))
        .and_then(Value::as_array)
        .ok_or_else(|| missing(side.as_str()))?;

    contracts.iter().map(read_record).collect()
}

fn read_record(contract: &Value) -> Result<OptionRecord, FetchError> {
    // Price,Last,Bid,Ask,Open Int,Volume,IV
    Ok(OptionRecord {
        strike: raw_number(contract, "strike")?,
        last_price: raw_number(contract, "lastPrice")?,
        bid: raw_number(contract, "bid")?,
        ask: raw_number(contract, "ask")?,
        open_interest: raw_number(contract, "openInterest")?,
        volume: raw_number(contract, "volume")?,
        implied_volatility: raw_number(contract, "impliedVolatility")?,
    })
}

fn raw_number(contract: &Value, field: &str) -> Result<Number, FetchError> {
    contract
        .get(field)
        .and_then(|value| value.get("raw"))
        .and_then(Value::as_number)
        .cloned()
        .ok_or_else(|| missing(field))
}

fn chain_result(doc: &Value) -> Result<&Value, FetchError> {
    let chain = doc.get("optionChain").ok_or(FetchError::SchemaChanged)?;
    chain
        .get("result")
        .and_then(|result| result.get(0))
        .ok_or_else(|| missing("optionChain.result[0]"))
}

fn missing(field: &str) -> FetchError {
    FetchError::MissingField(field.to_string())
}
