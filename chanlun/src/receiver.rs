//! CSV 行情读取。

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::bar::Bar;
use crate::constant::DataError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "time", alias = "dt")]
    datetime: String,
    #[serde(alias = "open_price")]
    open: f64,
    #[serde(alias = "high_price")]
    high: f64,
    #[serde(alias = "low_price")]
    low: f64,
    #[serde(alias = "close_price")]
    close: f64,
    #[serde(default, alias = "vol")]
    volume: f64,
}

impl CsvBarRow {
    fn into_bar(self) -> Result<Bar, DataError> {
        Ok(Bar {
            time: parse_timestamp_ms(&self.datetime)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// 读取 `datetime,open,high,low,close[,volume]`，时间统一为 UTC 毫秒。
pub fn load_bars_csv(file_path: impl AsRef<Path>) -> Result<Vec<Bar>, DataError> {
    let reader = csv::Reader::from_path(file_path)?;
    read_bars(reader)
}

pub fn read_bars_csv<R: std::io::Read>(input: R) -> Result<Vec<Bar>, DataError> {
    read_bars(csv::Reader::from_reader(input))
}

fn read_bars<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Bar>, DataError> {
    let mut out = Vec::new();
    for row in reader.deserialize::<CsvBarRow>() {
        out.push(row?.into_bar()?);
    }
    Ok(out)
}

// 整数时间戳原样返回
pub fn parse_timestamp_ms(value: &str) -> Result<i64, DataError> {
    let value = value.trim();
    if let Ok(raw) = value.parse::<i64>() {
        return Ok(raw);
    }
    parse_datetime(value).map(|dt| dt.timestamp_millis())
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];

    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(DataError::InvalidDatetime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_aliased_columns() {
        let raw = "datetime,open_price,high_price,low_price,close_price,volume\n\
                   2024-01-02 09:00:00,10,11,9,10.5,100\n\
                   2024-01-02 09:15:00,10.5,12,10,11,120\n";
        let bars = read_bars_csv(raw.as_bytes()).expect("valid csv");
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].time - bars[0].time, 15 * 60 * 1000);
        assert_eq!(bars[1].high, 12.0);
    }

    #[test]
    fn numeric_time_is_kept_verbatim() {
        let raw = "time,open,high,low,close\n1700000000000,1,2,0.5,1.5\n";
        let bars = read_bars_csv(raw.as_bytes()).expect("valid csv");
        assert_eq!(bars[0].time, 1_700_000_000_000);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn rejects_unknown_datetime_layout() {
        assert!(matches!(
            parse_timestamp_ms("02.01.2024"),
            Err(DataError::InvalidDatetime(_))
        ));
        assert!(parse_datetime("2024-01-02").is_ok());
    }
}
