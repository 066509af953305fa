use serde::Serialize;

use crate::pen::Pen;

/// 中枢：连续三笔的重叠区间。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Center {
    pub start_time: i64,
    pub end_time: i64,
    // ZG
    pub upper: f64,
    // ZD
    pub lower: f64,
    pub pen_index: usize,
}

impl Center {
    pub fn contains(&self, price: f64) -> bool {
        self.lower <= price && price <= self.upper
    }

    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }
}

// 三笔滑窗，各窗口独立成中枢，不做合并
pub fn detect_centers(pens: &[Pen]) -> Vec<Center> {
    pens.windows(3)
        .enumerate()
        .filter_map(|(pen_index, window)| {
            let upper = window
                .iter()
                .map(Pen::high)
                .fold(f64::INFINITY, f64::min);
            let lower = window
                .iter()
                .map(Pen::low)
                .fold(f64::NEG_INFINITY, f64::max);
            (upper > lower).then(|| Center {
                start_time: window[0].start.time,
                end_time: window[2].end.time,
                upper,
                lower,
                pen_index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::Fractal;
    use crate::constant::{Direction, FractalMark};

    fn pen(start_index: usize, from: f64, to: f64) -> Pen {
        let (start_mark, end_mark, direction) = if from < to {
            (FractalMark::Trough, FractalMark::Peak, Direction::Up)
        } else {
            (FractalMark::Peak, FractalMark::Trough, Direction::Down)
        };
        let fx = |index: usize, mark: FractalMark, price: f64| Fractal {
            position: index,
            bar_index: index * 5,
            time: (index * 5) as i64,
            mark,
            price,
            high: price,
            low: price,
        };
        Pen {
            start: fx(start_index, start_mark, from),
            end: fx(start_index + 1, end_mark, to),
            direction,
            span: 5,
            start_index,
        }
    }

    #[test]
    fn overlapping_window_yields_zg_zd() {
        let pens = [pen(0, 10.0, 20.0), pen(1, 20.0, 12.0), pen(2, 12.0, 18.0)];
        let centers = detect_centers(&pens);
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].upper, 18.0);
        assert_eq!(centers[0].lower, 12.0);
        assert_eq!(centers[0].start_time, 0);
        assert_eq!(centers[0].end_time, 15);
        assert!(centers[0].contains(15.0));
    }

    #[test]
    fn touching_ranges_are_not_a_center() {
        let pens = [pen(0, 10.0, 20.0), pen(1, 20.0, 15.0), pen(2, 15.0, 25.0), pen(3, 25.0, 20.0)];
        let centers = detect_centers(&pens);
        // window 0: ZG = 20, ZD = 15 -> center; window 1: ZG = 20, ZD = 20 -> none
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].pen_index, 0);
    }
}
