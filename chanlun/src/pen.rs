//! 笔构建与三种成笔策略。

use serde::Serialize;

use crate::bar::Fractal;
use crate::constant::{Const, Direction, PenPolicy};
use crate::fractal::GapRule;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pen {
    pub start: Fractal,
    pub end: Fractal,
    pub direction: Direction,
    pub span: usize,
    // 起点在交替分型列表中的位置
    pub start_index: usize,
}

impl Pen {
    pub fn high(&self) -> f64 {
        self.start.price.max(self.end.price)
    }

    pub fn low(&self) -> f64 {
        self.start.price.min(self.end.price)
    }

    pub fn distance(&self) -> f64 {
        self.high() - self.low()
    }

    pub fn overlap(&self, other: &Pen) -> bool {
        self.low().max(other.low()) <= self.high().min(other.high())
    }

    pub fn end_index(&self) -> usize {
        self.start_index + 1
    }
}

type Admission = fn(&Fractal, &Fractal, usize) -> bool;

fn admit_old(start: &Fractal, end: &Fractal, min_bars: usize) -> bool {
    start.bar_gap(end) >= min_bars && !start.strictly_contains_either(end)
}

fn admit_new(start: &Fractal, end: &Fractal, min_bars: usize) -> bool {
    start.bar_gap(end) >= min_bars
}

fn admit_fractal(start: &Fractal, end: &Fractal, _min_bars: usize) -> bool {
    start.bar_gap(end) >= 1 && end.index_gap(start) >= Const::MIN_FX_GAP_FRACTAL
}

fn admission(policy: PenPolicy) -> Admission {
    match policy {
        PenPolicy::Old => admit_old,
        PenPolicy::New => admit_new,
        PenPolicy::Fractal => admit_fractal,
    }
}

pub fn gap_rule(policy: PenPolicy, min_bars_per_pen: usize) -> GapRule {
    match policy {
        PenPolicy::Fractal => GapRule::index_only(Const::MIN_FX_GAP_FRACTAL),
        PenPolicy::Old | PenPolicy::New => GapRule {
            min_index_gap: Const::MIN_FX_GAP_STRICT,
            min_bar_gap: min_bars_per_pen,
        },
    }
}

/// 相邻交替分型连笔；被策略拒绝的一对不成笔，后续笔以 `start_index` 定位。
pub fn build_pens(fractals: &[Fractal], policy: PenPolicy, min_bars_per_pen: usize) -> Vec<Pen> {
    build_with(fractals, admission(policy), min_bars_per_pen)
}

pub(crate) fn build_basic_pens(fractals: &[Fractal]) -> Vec<Pen> {
    build_with(fractals, admit_new, Const::BASIC_MIN_PEN_BARS)
}

fn build_with(fractals: &[Fractal], admit: Admission, min_bars: usize) -> Vec<Pen> {
    fractals
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| admit(&pair[0], &pair[1], min_bars))
        .map(|(start_index, pair)| Pen {
            start: pair[0],
            end: pair[1],
            direction: Direction::from_start_mark(pair[0].mark),
            span: pair[0].bar_gap(&pair[1]),
            start_index,
        })
        .collect()
}
