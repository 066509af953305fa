pub mod audit;
pub mod bar;
pub mod center;
pub mod config;
pub mod constant;
pub mod engine;
pub mod fractal;
mod frame;
pub mod logging;
pub mod merge;
pub mod pen;
pub mod receiver;
pub mod signal;

pub use audit::audit_result;
pub use bar::{Bar, Fractal, MergedBar};
pub use center::{detect_centers, Center};
pub use config::{AnalysisConfig, AnalysisConfigPatch, AnalysisProfileConfig};
pub use constant::{Const, DataError, Direction, EngineVariant, EventKind, FractalMark, PenPolicy};
pub use engine::{
    analyze, analyze_basic, AnalysisEngine, AnalysisResult, CenterBox, ChartOverlay,
    EventMarker, FractalPoint, PenSegment,
};
pub use fractal::{alternate, detect_fractals, GapRule};
pub use logging::init_logging;
pub use merge::merge_containment;
pub use pen::{build_pens, Pen};
pub use receiver::{load_bars_csv, read_bars_csv};
pub use signal::{classify_events, Event};
