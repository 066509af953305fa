//! 分析入口。
//!
//! 负责串联包含处理、分型、笔、中枢与买卖点，并输出图表叠加层。

use serde::Serialize;
use tracing::debug;

use crate::bar::{Bar, Fractal, MergedBar};
use crate::center::{detect_centers, Center};
use crate::config::AnalysisConfig;
use crate::constant::{
    Const, DataError, Direction, EngineVariant, EventKind, FractalMark, PenPolicy,
};
use crate::fractal::{alternate, detect_fractals, GapRule};
use crate::merge::{merge_containment, passthrough};
use crate::pen::{build_basic_pens, build_pens, gap_rule, Pen};
use crate::signal::{classify_events, Event};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub variant: EngineVariant,
    pub config: AnalysisConfig,
    pub merged: Vec<MergedBar>,
    pub fractals: Vec<Fractal>,
    pub pens: Vec<Pen>,
    pub centers: Vec<Center>,
    pub events: Vec<Event>,
}

impl AnalysisResult {
    fn empty(variant: EngineVariant, config: AnalysisConfig) -> Self {
        Self {
            variant,
            config,
            merged: Vec::new(),
            fractals: Vec::new(),
            pens: Vec::new(),
            centers: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fractals.is_empty()
            && self.pens.is_empty()
            && self.centers.is_empty()
            && self.events.is_empty()
    }

    pub fn overlay(&self) -> ChartOverlay {
        ChartOverlay {
            fractals: self
                .fractals
                .iter()
                .map(|fx| FractalPoint {
                    time: fx.time,
                    price: fx.price,
                    mark: fx.mark,
                })
                .collect(),
            pens: self
                .pens
                .iter()
                .map(|pen| PenSegment {
                    start_time: pen.start.time,
                    start_price: pen.start.price,
                    end_time: pen.end.time,
                    end_price: pen.end.price,
                    direction: pen.direction,
                })
                .collect(),
            centers: self
                .centers
                .iter()
                .map(|center| CenterBox {
                    start_time: center.start_time,
                    end_time: center.end_time,
                    low: center.lower,
                    high: center.upper,
                })
                .collect(),
            events: self
                .events
                .iter()
                .map(|event| EventMarker {
                    time: event.time,
                    price: event.price,
                    kind: event.kind,
                })
                .collect(),
        }
    }

    pub fn overlay_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(&self.overlay())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FractalPoint {
    pub time: i64,
    pub price: f64,
    pub mark: FractalMark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenSegment {
    pub start_time: i64,
    pub start_price: f64,
    pub end_time: i64,
    pub end_price: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterBox {
    pub start_time: i64,
    pub end_time: i64,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMarker {
    pub time: i64,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartOverlay {
    pub fractals: Vec<FractalPoint>,
    pub pens: Vec<PenSegment>,
    pub centers: Vec<CenterBox>,
    pub events: Vec<EventMarker>,
}

/// 无状态，可跨线程复用。
#[derive(Debug, Clone, Copy)]
pub struct AnalysisEngine {
    variant: EngineVariant,
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn extended(config: AnalysisConfig) -> Self {
        Self {
            variant: EngineVariant::Extended,
            config,
        }
    }

    pub fn basic() -> Self {
        Self {
            variant: EngineVariant::Basic,
            config: AnalysisConfig::new(PenPolicy::New, Const::BASIC_MIN_PEN_BARS),
        }
    }

    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, bars: &[Bar]) -> AnalysisResult {
        match self.variant {
            EngineVariant::Extended => analyze(bars, &self.config),
            EngineVariant::Basic => analyze_basic(bars),
        }
    }
}

fn well_formed_count(bars: &[Bar]) -> usize {
    bars.iter().filter(|bar| bar.is_well_formed()).count()
}

// 扩展版：包含处理 + 笔策略 + 类二买卖点
pub fn analyze(bars: &[Bar], config: &AnalysisConfig) -> AnalysisResult {
    let variant = EngineVariant::Extended;
    let mut result = AnalysisResult::empty(variant, *config);
    if well_formed_count(bars) < Const::MIN_INPUT_BARS {
        debug!(bars = bars.len(), "not enough bars for analysis");
        return result;
    }

    result.merged = merge_containment(bars);
    if result.merged.len() < Const::MIN_MERGED_BARS {
        debug!(merged = result.merged.len(), "not enough merged bars for analysis");
        return result;
    }

    let raw = detect_fractals(&result.merged);
    let rule = gap_rule(config.pen_policy, config.min_bars_per_pen);
    let fractals = alternate(&raw, rule);
    let pens = build_pens(&fractals, config.pen_policy, config.min_bars_per_pen);
    finish(result, raw.len(), fractals, pens)
}

// 基础版：不做包含处理，固定间隔，无类二买卖点
pub fn analyze_basic(bars: &[Bar]) -> AnalysisResult {
    let variant = EngineVariant::Basic;
    let config = AnalysisConfig::new(PenPolicy::New, Const::BASIC_MIN_PEN_BARS);
    let mut result = AnalysisResult::empty(variant, config);
    if well_formed_count(bars) < Const::MIN_INPUT_BARS {
        debug!(bars = bars.len(), "not enough bars for analysis");
        return result;
    }

    result.merged = passthrough(bars);
    let raw = detect_fractals(&result.merged);
    // 基础版按原始K线序号计间隔，与笔长口径一致
    let rule = GapRule {
        min_index_gap: 0,
        min_bar_gap: Const::BASIC_MIN_FX_GAP,
    };
    let fractals = alternate(&raw, rule);
    let pens = build_basic_pens(&fractals);
    finish(result, raw.len(), fractals, pens)
}

fn finish(
    mut result: AnalysisResult,
    raw_fractals: usize,
    fractals: Vec<Fractal>,
    pens: Vec<Pen>,
) -> AnalysisResult {
    let centers = detect_centers(&pens);
    let events = classify_events(&fractals, &pens, result.variant);
    debug!(
        variant = ?result.variant,
        merged = result.merged.len(),
        raw_fractals,
        fractals = fractals.len(),
        pens = pens.len(),
        centers = centers.len(),
        events = events.len(),
        "analysis finished"
    );
    result.fractals = fractals;
    result.pens = pens;
    result.centers = centers;
    result.events = events;
    result
}
