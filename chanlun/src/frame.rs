//! 结果 dataframe 视图与 parquet 快照导出。

use std::fs::{create_dir_all, File};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::constant::{DataError, Direction, FractalMark};
use crate::engine::AnalysisResult;

fn mark_code(mark: FractalMark) -> i32 {
    match mark {
        FractalMark::Peak => 1,
        FractalMark::Trough => -1,
    }
}

fn direction_code(direction: Direction) -> i32 {
    match direction {
        Direction::Up => 1,
        Direction::Down => -1,
    }
}

impl AnalysisResult {
    pub fn merged_frame(&self) -> Result<DataFrame, DataError> {
        let rows = &self.merged;
        Ok(df!(
            "time" => rows.iter().map(|x| x.time).collect::<Vec<i64>>(),
            "open" => rows.iter().map(|x| x.open).collect::<Vec<f64>>(),
            "high" => rows.iter().map(|x| x.high).collect::<Vec<f64>>(),
            "low" => rows.iter().map(|x| x.low).collect::<Vec<f64>>(),
            "close" => rows.iter().map(|x| x.close).collect::<Vec<f64>>(),
            "start_idx" => rows.iter().map(|x| x.start_idx as u64).collect::<Vec<u64>>(),
            "end_idx" => rows.iter().map(|x| x.end_idx as u64).collect::<Vec<u64>>()
        )?)
    }

    pub fn fractal_frame(&self) -> Result<DataFrame, DataError> {
        let rows = &self.fractals;
        Ok(df!(
            "position" => rows.iter().map(|x| x.position as u64).collect::<Vec<u64>>(),
            "bar_index" => rows.iter().map(|x| x.bar_index as u64).collect::<Vec<u64>>(),
            "time" => rows.iter().map(|x| x.time).collect::<Vec<i64>>(),
            "mark" => rows.iter().map(|x| mark_code(x.mark)).collect::<Vec<i32>>(),
            "price" => rows.iter().map(|x| x.price).collect::<Vec<f64>>(),
            "high" => rows.iter().map(|x| x.high).collect::<Vec<f64>>(),
            "low" => rows.iter().map(|x| x.low).collect::<Vec<f64>>()
        )?)
    }

    pub fn pen_frame(&self) -> Result<DataFrame, DataError> {
        let rows = &self.pens;
        Ok(df!(
            "start_time" => rows.iter().map(|x| x.start.time).collect::<Vec<i64>>(),
            "start_price" => rows.iter().map(|x| x.start.price).collect::<Vec<f64>>(),
            "end_time" => rows.iter().map(|x| x.end.time).collect::<Vec<i64>>(),
            "end_price" => rows.iter().map(|x| x.end.price).collect::<Vec<f64>>(),
            "direction" => rows.iter().map(|x| direction_code(x.direction)).collect::<Vec<i32>>(),
            "span" => rows.iter().map(|x| x.span as u64).collect::<Vec<u64>>()
        )?)
    }

    pub fn center_frame(&self) -> Result<DataFrame, DataError> {
        let rows = &self.centers;
        Ok(df!(
            "start_time" => rows.iter().map(|x| x.start_time).collect::<Vec<i64>>(),
            "end_time" => rows.iter().map(|x| x.end_time).collect::<Vec<i64>>(),
            "low" => rows.iter().map(|x| x.lower).collect::<Vec<f64>>(),
            "high" => rows.iter().map(|x| x.upper).collect::<Vec<f64>>()
        )?)
    }

    pub fn event_frame(&self) -> Result<DataFrame, DataError> {
        let rows = &self.events;
        Ok(df!(
            "time" => rows.iter().map(|x| x.time).collect::<Vec<i64>>(),
            "price" => rows.iter().map(|x| x.price).collect::<Vec<f64>>(),
            "kind" => rows.iter().map(|x| x.kind.as_str()).collect::<Vec<&str>>()
        )?)
    }

    pub fn write_parquet_snapshot(
        &self,
        output_dir: impl AsRef<Path>,
        label: &str,
    ) -> Result<(), DataError> {
        let output_dir = output_dir.as_ref();
        create_dir_all(output_dir)?;

        let layers = [
            ("merged", self.merged_frame()?),
            ("fractal", self.fractal_frame()?),
            ("pen", self.pen_frame()?),
            ("center", self.center_frame()?),
            ("event", self.event_frame()?),
        ];
        for (layer, mut frame) in layers {
            let mut file = File::create(output_dir.join(format!("{layer}_{label}.parquet")))?;
            ParquetWriter::new(&mut file).finish(&mut frame)?;
        }
        Ok(())
    }
}
