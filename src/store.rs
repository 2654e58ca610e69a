use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::page::{OptionRecord, OptionSide};

/// Partition path for one side of a chain:
/// `<base>/<expiry_day>/<market_day>/<symbol>_<side>.csv`.
///
/// Pure on its inputs. The same function produces both the dedup probe and
/// the write target.
pub fn option_file_path(
    base: &Path,
    side: OptionSide,
    symbol: &str,
    market_day: NaiveDate,
    expiry_day: NaiveDate,
) -> PathBuf {
    base.join(expiry_day.to_string())
        .join(market_day.to_string())
        .join(format!("{symbol}_{side}.csv"))
}

/// One comma-joined record per line. Creates parent directories and
/// overwrites an existing file at the same path.
pub fn write_records(path: &Path, records: &[OptionRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut data = String::new();
    for record in records {
        data.push_str(&record.to_string());
        data.push('\n');
    }

    fs::write(path, data)
}
