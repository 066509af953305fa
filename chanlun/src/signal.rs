//! 买卖点识别。
//!
//! 负责：
//! - 单次前向扫描交替分型，买卖两侧各自维护一类/二类/三类锚点；
//! - 新的一类点会清空后续锚点。

use serde::Serialize;

use crate::bar::Fractal;
use crate::constant::{Const, Direction, EngineVariant, EventKind, FractalMark};
use crate::pen::Pen;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Event {
    pub time: i64,
    pub price: f64,
    pub kind: EventKind,
    pub fractal_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    price: f64,
    index: usize,
}

#[derive(Debug, Default)]
struct SideState {
    first: Option<Anchor>,
    second: Option<Anchor>,
    third_done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Buy,
    Sell,
}

impl Side {
    fn for_mark(mark: FractalMark) -> Self {
        match mark {
            FractalMark::Trough => Self::Buy,
            FractalMark::Peak => Self::Sell,
        }
    }

    fn incoming(self) -> Direction {
        match self {
            Self::Buy => Direction::Down,
            Self::Sell => Direction::Up,
        }
    }

    fn kinds(self) -> [EventKind; 4] {
        match self {
            Self::Buy => [
                EventKind::FirstBuy,
                EventKind::SecondBuy,
                EventKind::ThirdBuy,
                EventKind::QuasiSecondBuy,
            ],
            Self::Sell => [
                EventKind::FirstSell,
                EventKind::SecondSell,
                EventKind::ThirdSell,
                EventKind::QuasiSecondSell,
            ],
        }
    }

    // 未有效跌破（突破）参考价
    fn holds(self, price: f64, reference: f64) -> bool {
        let tol = Const::SECOND_POINT_TOLERANCE;
        match self {
            Self::Buy => price >= reference * (1.0 - tol),
            Self::Sell => price <= reference * (1.0 + tol),
        }
    }

    // 跌破容差但仍在类二买区间内
    fn within_quasi_band(self, price: f64, reference: f64) -> bool {
        let tol = Const::SECOND_POINT_TOLERANCE;
        let floor = Const::QUASI_SECOND_FLOOR;
        match self {
            Self::Buy => reference * (1.0 - floor) <= price && price < reference * (1.0 - tol),
            Self::Sell => reference * (1.0 + tol) < price && price <= reference * (1.0 + floor),
        }
    }

    // 背驰：前一同向极值未明显更极端
    fn no_prior_extreme(self, prior: f64, price: f64) -> bool {
        let tol = Const::SECOND_POINT_TOLERANCE;
        match self {
            Self::Buy => prior >= price * (1.0 - tol),
            Self::Sell => prior <= price * (1.0 + tol),
        }
    }
}

/// `pens` 须由同一分型列表生成，按起点序号查找。
pub fn classify_events(fractals: &[Fractal], pens: &[Pen], variant: EngineVariant) -> Vec<Event> {
    let mut by_start: Vec<Option<&Pen>> = vec![None; fractals.len()];
    for pen in pens {
        if let Some(slot) = by_start.get_mut(pen.start_index) {
            *slot = Some(pen);
        }
    }
    let pen_starting_at = |index: usize| by_start.get(index).copied().flatten();
    let pen_ending_at = |index: usize| {
        index
            .checked_sub(1)
            .and_then(|start| by_start.get(start).copied().flatten())
    };

    let mut buy = SideState::default();
    let mut sell = SideState::default();
    let mut events = Vec::new();

    for (index, fractal) in fractals.iter().enumerate() {
        let side = Side::for_mark(fractal.mark);
        let state = match side {
            Side::Buy => &mut buy,
            Side::Sell => &mut sell,
        };
        let [first_kind, second_kind, third_kind, quasi_kind] = side.kinds();
        let price = fractal.price;
        let emit = |kind: EventKind| Event {
            time: fractal.time,
            price,
            kind,
            fractal_index: index,
        };

        let incoming = pen_ending_at(index);
        let outgoing = pen_starting_at(index);
        let turns = incoming.is_some_and(|pen| pen.direction == side.incoming())
            && outgoing.is_some_and(|pen| pen.direction == side.incoming().opposite());
        if turns {
            let prior = index
                .checked_sub(2)
                .and_then(pen_ending_at)
                .filter(|pen| pen.direction == side.incoming());
            let diverges = prior.is_none_or(|pen| side.no_prior_extreme(pen.end.price, price));
            if diverges {
                events.push(emit(first_kind));
                state.first = Some(Anchor { price, index });
                state.second = None;
                state.third_done = false;
                continue;
            }
        }

        let Some(first) = state.first.filter(|anchor| index > anchor.index) else {
            continue;
        };
        if side.holds(price, first.price) {
            match state.second {
                None => {
                    events.push(emit(second_kind));
                    state.second = Some(Anchor { price, index });
                }
                Some(second)
                    if !state.third_done
                        && index > second.index
                        && side.holds(price, second.price) =>
                {
                    events.push(emit(third_kind));
                    state.third_done = true;
                }
                Some(_) => {}
            }
        } else if variant == EngineVariant::Extended && side.within_quasi_band(price, first.price) {
            events.push(emit(quasi_kind));
        }
    }

    events
}
