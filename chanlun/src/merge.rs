//! 包含处理。
//!
//! 负责：
//! - 将原始K线合并为无包含序列；
//! - 方向只看最后两根合并K线，反转后第一根被包含K线仍按旧方向合并。

use tracing::warn;

use crate::bar::{Bar, MergedBar};
use crate::constant::Direction;

pub(crate) struct MergedBarBuilder {
    rows: Vec<MergedBar>,
}

impl MergedBarBuilder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn on_bar(&mut self, bar: &Bar, index: usize) {
        let incoming = MergedBar::from_bar(bar, index);
        let direction = self.direction_hint();
        let Some(current) = self.rows.last_mut() else {
            self.rows.push(incoming);
            return;
        };

        match direction {
            Some(direction) if current.is_inclusive(&incoming) => {
                merge_into(current, &incoming, direction);
            }
            _ => self.rows.push(incoming),
        }
    }

    fn direction_hint(&self) -> Option<Direction> {
        if self.rows.len() < 2 {
            return None;
        }
        let prev = &self.rows[self.rows.len() - 2];
        let last = &self.rows[self.rows.len() - 1];
        if prev.high < last.high {
            Some(Direction::Up)
        } else if prev.high > last.high {
            Some(Direction::Down)
        } else {
            None
        }
    }

    pub(crate) fn into_rows(self) -> Vec<MergedBar> {
        self.rows
    }
}

fn merge_into(current: &mut MergedBar, incoming: &MergedBar, direction: Direction) {
    match direction {
        Direction::Up => {
            current.time = if current.high > incoming.high {
                current.time
            } else {
                incoming.time
            };
            current.high = current.high.max(incoming.high);
            current.low = current.low.max(incoming.low);
        }
        Direction::Down => {
            current.time = if current.low < incoming.low {
                current.time
            } else {
                incoming.time
            };
            current.high = current.high.min(incoming.high);
            current.low = current.low.min(incoming.low);
        }
    }
    current.close = incoming.close;
    current.end_idx = incoming.end_idx;
}

// 坏K线跳过，但保留原始序号
pub fn merge_containment(bars: &[Bar]) -> Vec<MergedBar> {
    let mut builder = MergedBarBuilder::with_capacity(bars.len());
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_well_formed() {
            warn!(index, time = bar.time, "skipping malformed bar");
            continue;
        }
        builder.on_bar(bar, index);
    }
    builder.into_rows()
}

// 基础版不做包含处理
pub fn passthrough(bars: &[Bar]) -> Vec<MergedBar> {
    bars.iter()
        .enumerate()
        .filter(|(index, bar)| {
            let ok = bar.is_well_formed();
            if !ok {
                warn!(index = *index, time = bar.time, "skipping malformed bar");
            }
            ok
        })
        .map(|(index, bar)| MergedBar::from_bar(bar, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, high: f64, low: f64) -> Bar {
        Bar::new(time, low, high, low, high, 1.0)
    }

    #[test]
    fn first_two_bars_never_merge() {
        // no direction exists before two merged bars have been emitted
        let rows = merge_containment(&[bar(1, 10.0, 5.0), bar(2, 9.0, 6.0)]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn uptrend_merge_keeps_higher_high_and_higher_low() {
        let rows = merge_containment(&[
            bar(1, 10.0, 5.0),
            bar(2, 12.0, 7.0),
            bar(3, 11.0, 8.0),
        ]);
        assert_eq!(rows.len(), 2);
        let last = rows[1];
        assert_eq!(last.high, 12.0);
        assert_eq!(last.low, 8.0);
        assert_eq!(last.time, 2);
        assert_eq!((last.start_idx, last.end_idx), (1, 2));
    }

    #[test]
    fn downtrend_merge_keeps_lower_high_and_lower_low() {
        let rows = merge_containment(&[
            bar(1, 12.0, 7.0),
            bar(2, 10.0, 5.0),
            bar(3, 11.0, 4.0),
        ]);
        assert_eq!(rows.len(), 2);
        let last = rows[1];
        assert_eq!(last.high, 10.0);
        assert_eq!(last.low, 4.0);
        assert_eq!(last.time, 3);
        assert_eq!((last.start_idx, last.end_idx), (1, 2));
    }

    #[test]
    fn contained_reversal_bar_merges_with_stale_direction() {
        // bar 3 already points down but is contained in bar 2, so it merges upward
        let rows = merge_containment(&[
            bar(1, 10.0, 5.0),
            bar(2, 12.0, 7.0),
            bar(3, 11.0, 7.5),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].high, 12.0);
        assert_eq!(rows[1].low, 7.5);
        assert_eq!(rows[1].time, 2);
    }

    #[test]
    fn down_direction_applies_after_uncontained_reversal() {
        let rows = merge_containment(&[
            bar(1, 10.0, 5.0),
            bar(2, 12.0, 7.0),
            bar(3, 11.0, 6.0),
            bar(4, 10.5, 6.5),
        ]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].high, 10.5);
        assert_eq!(rows[2].low, 6.0);
    }

    #[test]
    fn malformed_bars_keep_raw_index_space() {
        let rows = merge_containment(&[
            bar(1, 10.0, 5.0),
            Bar::new(2, 1.0, f64::NAN, 1.0, 1.0, 1.0),
            bar(3, 12.0, 7.0),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].start_idx, 2);
    }

    #[test]
    fn passthrough_wraps_each_bar() {
        let rows = passthrough(&[bar(1, 10.0, 5.0), bar(2, 9.0, 6.0)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].end_idx, 1);
    }
}
