use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalMark {
    Peak,
    Trough,
}

impl FractalMark {
    pub fn opposite(self) -> Self {
        match self {
            Self::Peak => Self::Trough,
            Self::Trough => Self::Peak,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peak => "Peak",
            Self::Trough => "Trough",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub fn from_start_mark(mark: FractalMark) -> Self {
        match mark {
            FractalMark::Trough => Self::Up,
            FractalMark::Peak => Self::Down,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

// 笔的成立条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PenPolicy {
    Old,
    #[default]
    New,
    Fractal,
}

impl PenPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
            Self::Fractal => "fractal",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DataError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "old" | "strict" => Ok(Self::Old),
            "new" | "relaxed" => Ok(Self::New),
            "fractal" | "minimal" => Ok(Self::Fractal),
            _ => Err(DataError::InvalidPenPolicy(value.to_string())),
        }
    }
}

impl TryFrom<String> for PenPolicy {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FirstBuy,
    SecondBuy,
    ThirdBuy,
    QuasiSecondBuy,
    FirstSell,
    SecondSell,
    ThirdSell,
    QuasiSecondSell,
}

impl EventKind {
    pub fn is_buy(self) -> bool {
        matches!(
            self,
            Self::FirstBuy | Self::SecondBuy | Self::ThirdBuy | Self::QuasiSecondBuy
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstBuy => "FirstBuy",
            Self::SecondBuy => "SecondBuy",
            Self::ThirdBuy => "ThirdBuy",
            Self::QuasiSecondBuy => "QuasiSecondBuy",
            Self::FirstSell => "FirstSell",
            Self::SecondSell => "SecondSell",
            Self::ThirdSell => "ThirdSell",
            Self::QuasiSecondSell => "QuasiSecondSell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineVariant {
    Basic,
    Extended,
}

#[derive(Debug)]
pub enum DataError {
    InvalidDatetime(String),
    InvalidPenPolicy(String),
    InvalidConfig(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Polars(polars::error::PolarsError),
}

pub struct Const;

impl Const {
    pub const MIN_INPUT_BARS: usize = 5;
    pub const MIN_MERGED_BARS: usize = 5;
    pub const DEFAULT_MIN_BARS_PER_PEN: usize = 5;
    // 分型间隔（合并序列步数）
    pub const MIN_FX_GAP_STRICT: usize = 2;
    pub const MIN_FX_GAP_FRACTAL: usize = 1;
    pub const BASIC_MIN_FX_GAP: usize = 2;
    pub const BASIC_MIN_PEN_BARS: usize = 4;
    // 二买/三买容差
    pub const SECOND_POINT_TOLERANCE: f64 = 0.002;
    // 类二买下限
    pub const QUASI_SECOND_FLOOR: f64 = 0.01;
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::InvalidPenPolicy(v) => write!(f, "invalid pen policy: {v}"),
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_yaml::Error> for DataError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}
