use chanlun::{
    analyze, AnalysisConfig, Bar, Direction, EventKind, FractalMark, PenPolicy,
};

/// Bars of constant width around a piecewise linear mid path. Every step moves both high
/// and low, so no two neighbours are inclusive and every turn of the path is a fractal.
fn path_bars(start: f64, legs: &[(usize, f64)]) -> Vec<Bar> {
    let mut mids = vec![start];
    let mut from = start;
    for &(steps, target) in legs {
        for k in 1..=steps {
            mids.push(from + (target - from) * k as f64 / steps as f64);
        }
        from = target;
    }
    mids.iter()
        .enumerate()
        .map(|(i, &mid)| {
            let (open, close) = if i % 2 == 0 {
                (mid - 0.2, mid + 0.2)
            } else {
                (mid + 0.2, mid - 0.2)
            };
            Bar::new(i as i64 * 60_000, open, mid + 0.5, mid - 0.5, close, 10.0)
        })
        .collect()
}

fn w_shape() -> Vec<Bar> {
    path_bars(
        100.0,
        &[(6, 106.0), (6, 100.0), (6, 105.0), (5, 101.0), (2, 103.0)],
    )
}

fn minute(index: i64) -> i64 {
    index * 60_000
}

#[test]
fn fewer_than_five_bars_yield_empty_output() {
    let bars = w_shape();
    for count in 0..5 {
        let result = analyze(&bars[..count], &AnalysisConfig::default());
        assert!(result.is_empty(), "expected nothing for {count} bars");
        assert!(result.merged.is_empty());
    }
}

#[test]
fn monotonic_rise_has_no_structure() {
    let bars = path_bars(100.0, &[(9, 109.0)]);
    assert_eq!(bars.len(), 10);
    let result = analyze(&bars, &AnalysisConfig::default());
    assert_eq!(result.merged.len(), 10);
    assert!(result.fractals.is_empty());
    assert!(result.pens.is_empty());
    assert!(result.centers.is_empty());
    assert!(result.events.is_empty());
}

#[test]
fn v_shape_yields_one_trough_and_nothing_else() {
    let bars = path_bars(106.0, &[(6, 100.0), (6, 106.0)]);
    for policy in [PenPolicy::Old, PenPolicy::New, PenPolicy::Fractal] {
        let result = analyze(&bars, &AnalysisConfig::new(policy, 5));
        assert_eq!(result.fractals.len(), 1, "{policy:?}");
        let trough = &result.fractals[0];
        assert_eq!(trough.mark, FractalMark::Trough);
        assert_eq!(trough.time, minute(6));
        assert!((trough.price - 99.5).abs() < 1e-9);
        assert!(result.pens.is_empty());
        assert!(result.centers.is_empty());
        assert!(result.events.is_empty());
    }
}

#[test]
fn w_shape_builds_three_pens_and_buy_points() {
    let result = analyze(&w_shape(), &AnalysisConfig::default());

    let marks = result.fractals.iter().map(|x| x.mark).collect::<Vec<_>>();
    assert_eq!(
        marks,
        vec![
            FractalMark::Peak,
            FractalMark::Trough,
            FractalMark::Peak,
            FractalMark::Trough
        ]
    );
    let times = result.fractals.iter().map(|x| x.time).collect::<Vec<_>>();
    assert_eq!(times, vec![minute(6), minute(12), minute(18), minute(23)]);

    let directions = result.pens.iter().map(|x| x.direction).collect::<Vec<_>>();
    assert_eq!(directions, vec![Direction::Down, Direction::Up, Direction::Down]);
    assert_eq!(
        result.pens.iter().map(|x| x.span).collect::<Vec<_>>(),
        vec![6, 6, 5]
    );

    // The three pens overlap between the second trough and the second peak.
    assert_eq!(result.centers.len(), 1);
    let center = &result.centers[0];
    assert!((center.upper - 105.5).abs() < 1e-9);
    assert!((center.lower - 100.5).abs() < 1e-9);
    assert_eq!((center.start_time, center.end_time), (minute(6), minute(23)));

    let events = result
        .events
        .iter()
        .map(|x| (x.kind, x.time))
        .collect::<Vec<_>>();
    assert_eq!(
        events,
        vec![
            (EventKind::FirstBuy, minute(12)),
            (EventKind::FirstSell, minute(18)),
            (EventKind::SecondBuy, minute(23)),
        ]
    );
}

#[test]
fn longer_minimum_drops_the_short_final_leg() {
    let result = analyze(&w_shape(), &AnalysisConfig::new(PenPolicy::New, 6));
    assert_eq!(result.fractals.len(), 3);
    assert_eq!(result.pens.len(), 2);
    assert!(result.centers.is_empty());
    let kinds = result.events.iter().map(|x| x.kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![EventKind::FirstBuy]);
}

#[test]
fn every_policy_agrees_on_a_clean_w_shape() {
    let bars = w_shape();
    let reference = analyze(&bars, &AnalysisConfig::new(PenPolicy::New, 5));
    for policy in [PenPolicy::Old, PenPolicy::Fractal] {
        let result = analyze(&bars, &AnalysisConfig::new(policy, 5));
        assert_eq!(result.fractals, reference.fractals, "{policy:?}");
        assert_eq!(result.pens, reference.pens, "{policy:?}");
        assert_eq!(result.events, reference.events, "{policy:?}");
    }
}

#[test]
fn fractal_policy_ignores_the_bar_minimum() {
    let bars = path_bars(100.0, &[(3, 103.0), (2, 101.0), (3, 104.0), (2, 102.0), (2, 103.0)]);
    let strict = analyze(&bars, &AnalysisConfig::new(PenPolicy::New, 5));
    let loose = analyze(&bars, &AnalysisConfig::new(PenPolicy::Fractal, 5));
    // Only the first peak and the last trough are far enough apart for a strict pen.
    assert_eq!(strict.fractals.len(), 2);
    assert_eq!(strict.pens.len(), 1);
    assert_eq!(strict.pens[0].span, 7);
    assert_eq!(loose.fractals.len(), 4);
    assert_eq!(loose.pens.len(), 3);
}

#[test]
fn malformed_bars_are_skipped_without_failing() {
    let mut bars = w_shape();
    bars.insert(3, Bar::new(minute(3) + 1, 1.0, f64::NAN, 0.0, 1.0, 0.0));
    bars.insert(9, Bar::new(minute(7) + 1, 1.0, 0.5, 2.0, 1.0, 0.0));
    let result = analyze(&bars, &AnalysisConfig::default());
    assert_eq!(result.fractals.len(), 4);
    assert_eq!(result.pens.len(), 3);
    assert_eq!(result.merged.len(), bars.len() - 2);
}
