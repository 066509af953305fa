//! 分型识别与顶底交替过滤。

use crate::bar::{Fractal, MergedBar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapRule {
    // 合并序列步数
    pub min_index_gap: usize,
    // 原始K线数
    pub min_bar_gap: usize,
}

impl GapRule {
    pub fn index_only(min_index_gap: usize) -> Self {
        Self {
            min_index_gap,
            min_bar_gap: 0,
        }
    }

    pub fn accepts(&self, last: &Fractal, candidate: &Fractal) -> bool {
        candidate.index_gap(last) >= self.min_index_gap
            && candidate.bar_gap(last) >= self.min_bar_gap
    }
}

pub fn detect_fractals(merged: &[MergedBar]) -> Vec<Fractal> {
    if merged.len() < 3 {
        return Vec::new();
    }

    merged
        .windows(3)
        .enumerate()
        .filter_map(|(offset, window)| {
            let mark = Fractal::verify(&window[0], &window[1], &window[2])?;
            Some(Fractal::from_merged(offset + 1, &window[1], mark))
        })
        .collect()
}

/// 顶底交替：同类型保留最先出现者，间隔不足的候选直接丢弃。
pub fn alternate(fractals: &[Fractal], rule: GapRule) -> Vec<Fractal> {
    let mut out: Vec<Fractal> = Vec::with_capacity(fractals.len());
    for candidate in fractals {
        let Some(last) = out.last() else {
            out.push(*candidate);
            continue;
        };
        if candidate.mark == last.mark {
            continue;
        }
        if rule.accepts(last, candidate) {
            out.push(*candidate);
        }
    }
    out
}
