use anyhow::Result;
use std::env;
use std::path::PathBuf;
use tokio::fs;

pub struct Config {
    pub symbols: Vec<String>,
    pub output_root: PathBuf,
}

impl Config {
    /// Two positional arguments: the symbol list file and the output root.
    pub async fn from_args() -> Option<Config> {
        let args: Vec<String> = env::args().collect();
        if args.len() != 3 {
            println!("Usage: yahoo_options <quote_file> <output_dir>");
            return None;
        }

        let symbols = match load_symbols(&args[1]).await {
            Ok(symbols) => symbols,
            Err(e) => {
                println!("Err reading symbol list {}: {e}", args[1]);
                return None;
            }
        };

        Some(Config {
            symbols,
            output_root: PathBuf::from(&args[2]),
        })
    }
}

async fn load_symbols(path: &str) -> Result<Vec<String>> {
    let data = fs::read_to_string(path).await?;
    Ok(parse_symbols(&data))
}

/// One ticker per line, trimmed, blanks dropped, input order kept.
fn parse_symbols(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::include_str;

    const TEST_SYMBOLS: &str = include_str!("fixtures/symbols.txt");

    #[test]
    fn test_symbols_parse() {
        let symbols = parse_symbols(TEST_SYMBOLS);
        assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA", "GOOG"]);
    }
}
