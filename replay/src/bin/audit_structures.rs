use std::path::PathBuf;

use chanlun::{analyze, audit_result, init_logging, load_bars_csv, AnalysisConfig, PenPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: cargo run -q -p replay --bin audit_structures -- <csv_path> [pen_policy:old|new|fractal] [min_bars_per_pen]"
        );
        std::process::exit(2);
    }

    init_logging();

    let csv_path = PathBuf::from(&args[1]);
    let policy = if args.len() >= 3 {
        PenPolicy::parse(&args[2])?
    } else {
        PenPolicy::New
    };
    let min_bars = if args.len() >= 4 {
        args[3].parse::<usize>()?
    } else {
        AnalysisConfig::default().min_bars_per_pen
    };
    let config = AnalysisConfig::new(policy, min_bars);
    config.validate()?;

    let bars = load_bars_csv(&csv_path)?;
    let result = analyze(&bars, &config);
    let violations = audit_result(&bars, &result);

    println!(
        "AUDIT summary: bars={} merged={} fractals={} pens={} centers={} events={} policy={} min_bars={}",
        bars.len(),
        result.merged.len(),
        result.fractals.len(),
        result.pens.len(),
        result.centers.len(),
        result.events.len(),
        policy.as_str(),
        min_bars,
    );

    if violations.is_empty() {
        println!("AUDIT result: PASS (no structural violations found)");
        return Ok(());
    }

    println!("AUDIT result: FAIL violations={}", violations.len());
    for item in violations.iter().take(30) {
        println!("- {item}");
    }
    if violations.len() > 30 {
        println!("- ... {} more", violations.len() - 30);
    }
    std::process::exit(1);
}
