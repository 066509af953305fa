use std::fs;
use std::path::PathBuf;

use chanlun::{
    init_logging, load_bars_csv, AnalysisConfig, AnalysisEngine, ChartOverlay, PenPolicy,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ExportPayload {
    source: String,
    engine: String,
    pen_policy: String,
    min_bars_per_pen: usize,
    candles: Vec<CandlePoint>,
    merged_candles: Vec<MergedCandlePoint>,
    overlay: ChartOverlay,
}

#[derive(Debug, Serialize)]
struct CandlePoint {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Serialize)]
struct MergedCandlePoint {
    time: i64,
    high: f64,
    low: f64,
    start_idx: usize,
    end_idx: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = std::env::args().collect();
    let basic = args.iter().any(|x| x == "--basic");
    args.retain(|x| x != "--basic");
    if args.len() < 2 {
        eprintln!(
            "usage: cargo run -p replay --bin export_overlay -- <csv_path> [output_json] [pen_policy:old|new|fractal] [min_bars_per_pen] [--basic]"
        );
        std::process::exit(2);
    }

    init_logging();

    let csv_path = PathBuf::from(&args[1]);
    let output = if args.len() >= 3 {
        PathBuf::from(&args[2])
    } else {
        PathBuf::from("replay/output/chanlun-overlay.json")
    };
    let policy = if args.len() >= 4 {
        PenPolicy::parse(&args[3])?
    } else {
        PenPolicy::New
    };
    let min_bars = if args.len() >= 5 {
        args[4].parse::<usize>()?
    } else {
        AnalysisConfig::default().min_bars_per_pen
    };

    let engine = if basic {
        AnalysisEngine::basic()
    } else {
        let config = AnalysisConfig::new(policy, min_bars);
        config.validate()?;
        AnalysisEngine::extended(config)
    };

    let bars = load_bars_csv(&csv_path)?;
    info!(bars = bars.len(), path = %csv_path.display(), "loaded bars");
    let result = engine.run(&bars);

    let candles = bars
        .iter()
        .map(|bar| CandlePoint {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        })
        .collect::<Vec<_>>();
    let merged_candles = result
        .merged
        .iter()
        .map(|row| MergedCandlePoint {
            time: row.time,
            high: row.high,
            low: row.low,
            start_idx: row.start_idx,
            end_idx: row.end_idx,
        })
        .collect::<Vec<_>>();

    let payload = ExportPayload {
        source: csv_path.display().to_string(),
        engine: format!("{:?}", engine.variant()),
        pen_policy: engine.config().pen_policy.as_str().to_string(),
        min_bars_per_pen: engine.config().min_bars_per_pen,
        candles,
        merged_candles,
        overlay: result.overlay(),
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, serde_json::to_vec_pretty(&payload)?)?;

    println!(
        "exported {} bars to {} (merged={}, fractal={}, pen={}, center={}, event={})",
        payload.candles.len(),
        output.display(),
        payload.merged_candles.len(),
        payload.overlay.fractals.len(),
        payload.overlay.pens.len(),
        payload.overlay.centers.len(),
        payload.overlay.events.len(),
    );

    Ok(())
}
