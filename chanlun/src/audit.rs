//! 结构一致性审计。

use crate::bar::Bar;
use crate::constant::{Direction, EventKind, FractalMark};
use crate::engine::AnalysisResult;

pub fn audit_result(bars: &[Bar], result: &AnalysisResult) -> Vec<String> {
    let mut violations = Vec::new();
    audit_coverage(bars, result, &mut violations);
    audit_structure(result, &mut violations);
    audit_events(result, &mut violations);
    violations
}

fn audit_coverage(bars: &[Bar], result: &AnalysisResult, violations: &mut Vec<String>) {
    let (Some(first), Some(last)) = (result.merged.first(), result.merged.last()) else {
        return;
    };

    // 坏K线被跳过但保留原始序号
    let well_formed = |index: usize| bars.get(index).is_some_and(Bar::is_well_formed);
    let first_valid = (0..bars.len()).find(|&i| well_formed(i));
    let last_valid = (0..bars.len()).rev().find(|&i| well_formed(i));

    if first_valid != Some(first.start_idx) {
        violations.push(format!(
            "MERGED coverage starts at {} (first valid bar {:?})",
            first.start_idx, first_valid
        ));
    }
    if last_valid != Some(last.end_idx) {
        violations.push(format!(
            "MERGED coverage ends at {} (last valid bar {:?})",
            last.end_idx, last_valid
        ));
    }

    for pair in result.merged.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        if right.start_idx <= left.end_idx {
            violations.push(format!(
                "MERGED overlap: [{}..{}] then [{}..{}]",
                left.start_idx, left.end_idx, right.start_idx, right.end_idx
            ));
            continue;
        }
        if let Some(missing) = (left.end_idx + 1..right.start_idx).find(|&i| well_formed(i)) {
            violations.push(format!(
                "MERGED gap drops valid bar {} between [{}..{}] and [{}..{}]",
                missing, left.start_idx, left.end_idx, right.start_idx, right.end_idx
            ));
        }
    }

    for (i, window) in result.merged.windows(3).enumerate() {
        // 前两根相等高点时无方向，允许包含
        if window[0].high != window[1].high && window[1].is_inclusive(&window[2]) {
            violations.push(format!(
                "MERGED inclusive neighbours at {} and {}",
                i + 1,
                i + 2
            ));
        }
    }
}

fn audit_structure(result: &AnalysisResult, violations: &mut Vec<String>) {
    for pair in result.fractals.windows(2) {
        if pair[0].mark == pair[1].mark {
            violations.push(format!(
                "FRACTAL repeated {} at t={} and t={}",
                pair[0].mark.as_str(),
                pair[0].time,
                pair[1].time
            ));
        }
    }

    for pen in &result.pens {
        let expected = match (pen.start.mark, pen.end.mark) {
            (FractalMark::Trough, FractalMark::Peak) => Some(Direction::Up),
            (FractalMark::Peak, FractalMark::Trough) => Some(Direction::Down),
            _ => None,
        };
        if expected != Some(pen.direction) {
            violations.push(format!(
                "PEN direction mismatch t0={} t1={} dir={} start={} end={}",
                pen.start.time,
                pen.end.time,
                pen.direction.as_str(),
                pen.start.mark.as_str(),
                pen.end.mark.as_str()
            ));
        }
    }

    for center in &result.centers {
        if center.upper <= center.lower {
            violations.push(format!(
                "CENTER degenerate t0={} t1={} zg={} zd={}",
                center.start_time, center.end_time, center.upper, center.lower
            ));
        }
    }
}

fn audit_events(result: &AnalysisResult, violations: &mut Vec<String>) {
    for buy in [true, false] {
        let mut first_seen = false;
        let mut second_seen = false;
        for event in result.events.iter().filter(|x| x.kind.is_buy() == buy) {
            let ok = match event.kind {
                EventKind::FirstBuy | EventKind::FirstSell => {
                    first_seen = true;
                    second_seen = false;
                    true
                }
                EventKind::SecondBuy | EventKind::SecondSell => {
                    let ok = first_seen && !second_seen;
                    second_seen = true;
                    ok
                }
                EventKind::ThirdBuy | EventKind::ThirdSell => second_seen,
                EventKind::QuasiSecondBuy | EventKind::QuasiSecondSell => first_seen,
            };
            if !ok {
                violations.push(format!(
                    "EVENT out of order {} at t={}",
                    event.kind.as_str(),
                    event.time
                ));
            }
        }
    }
}
