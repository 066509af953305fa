use serde::{Deserialize, Serialize};

use crate::constant::FractalMark;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // 价格有限且 high >= low
    pub fn is_well_formed(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.high >= self.low
    }
}

/// 合并后的K线，覆盖原始K线 `start_idx..=end_idx`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub start_idx: usize,
    pub end_idx: usize,
}

impl MergedBar {
    pub fn from_bar(bar: &Bar, index: usize) -> Self {
        Self {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            start_idx: index,
            end_idx: index,
        }
    }

    pub fn is_inclusive(&self, other: &Self) -> bool {
        is_inclusive(self.high, self.low, other.high, other.low)
    }

    pub fn span(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    // 合并序列中的位置
    pub position: usize,
    // 原始K线序号
    pub bar_index: usize,
    pub time: i64,
    pub mark: FractalMark,
    pub price: f64,
    pub high: f64,
    pub low: f64,
}

impl Fractal {
    // 中间K线的高低点都必须严格突出
    pub fn verify(left: &MergedBar, middle: &MergedBar, right: &MergedBar) -> Option<FractalMark> {
        let is_peak = left.high < middle.high
            && middle.high > right.high
            && left.low < middle.low
            && middle.low > right.low;
        if is_peak {
            return Some(FractalMark::Peak);
        }

        let is_trough = left.low > middle.low
            && middle.low < right.low
            && left.high > middle.high
            && middle.high < right.high;
        if is_trough {
            return Some(FractalMark::Trough);
        }
        None
    }

    pub fn from_merged(position: usize, bar: &MergedBar, mark: FractalMark) -> Self {
        let price = match mark {
            FractalMark::Peak => bar.high,
            FractalMark::Trough => bar.low,
        };
        Self {
            position,
            bar_index: bar.end_idx,
            time: bar.time,
            mark,
            price,
            high: bar.high,
            low: bar.low,
        }
    }

    pub fn bar_gap(&self, other: &Self) -> usize {
        self.bar_index.abs_diff(other.bar_index)
    }

    pub fn index_gap(&self, other: &Self) -> usize {
        self.position.abs_diff(other.position)
    }

    // 严格包含，边界相等不算
    pub fn strictly_contains_either(&self, other: &Self) -> bool {
        (self.high > other.high && self.low < other.low)
            || (self.high < other.high && self.low > other.low)
    }
}

pub(crate) fn is_inclusive(a_high: f64, a_low: f64, b_high: f64, b_low: f64) -> bool {
    (a_high >= b_high && a_low <= b_low) || (a_high <= b_high && a_low >= b_low)
}
