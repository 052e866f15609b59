//! Tabular EDL reports built on polars data frames.

use crate::persistence::{SqliteStore, StoreError, StoreResult};
use polars::prelude::*;

pub const EDL_COLUMNS: [&str; 9] = [
    "edl_id",
    "unit",
    "equipment",
    "phasing_location",
    "quantity",
    "equipment_weight",
    "base_allowance_weight",
    "daily_assault_weight",
    "daily_sustain_weight",
];

const SUMMED_COLUMNS: [&str; 5] = [
    "quantity",
    "equipment_weight",
    "base_allowance_weight",
    "daily_assault_weight",
    "daily_sustain_weight",
];

/// One row per EDL line of the exercise, ordered by EDL id.
pub fn edl_frame(store: &SqliteStore, exercise_id: i64) -> StoreResult<DataFrame> {
    let rows = store.edl_weight_rows(exercise_id)?;

    let edl_ids: Vec<i64> = rows.iter().map(|r| r.edl_id).collect();
    let units: Vec<&str> = rows.iter().map(|r| r.unit.as_str()).collect();
    let equipment: Vec<&str> = rows.iter().map(|r| r.equipment.as_str()).collect();
    let phasing: Vec<&str> = rows.iter().map(|r| r.phasing_location.code()).collect();
    let quantities: Vec<i64> = rows.iter().map(|r| i64::from(r.quantity)).collect();
    let equipment_weight: Vec<f64> = rows.iter().map(|r| r.equipment_weight).collect();
    let base: Vec<i64> = rows.iter().map(|r| r.base_allowance_weight).collect();
    let assault: Vec<i64> = rows.iter().map(|r| r.daily_assault_weight).collect();
    let sustain: Vec<i64> = rows.iter().map(|r| r.daily_sustain_weight).collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("edl_id"), edl_ids).into_column(),
        Series::new(PlSmallStr::from_static("unit"), units).into_column(),
        Series::new(PlSmallStr::from_static("equipment"), equipment).into_column(),
        Series::new(PlSmallStr::from_static("phasing_location"), phasing).into_column(),
        Series::new(PlSmallStr::from_static("quantity"), quantities).into_column(),
        Series::new(PlSmallStr::from_static("equipment_weight"), equipment_weight).into_column(),
        Series::new(PlSmallStr::from_static("base_allowance_weight"), base).into_column(),
        Series::new(PlSmallStr::from_static("daily_assault_weight"), assault).into_column(),
        Series::new(PlSmallStr::from_static("daily_sustain_weight"), sustain).into_column(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Groups an [`edl_frame`] by `unit` or `phasing_location` and sums the
/// quantity and weight columns. Rows are sorted by the grouping key.
pub fn summarize_by(frame: &DataFrame, key: &str) -> StoreResult<DataFrame> {
    if key != "unit" && key != "phasing_location" {
        return Err(StoreError::InvalidData(format!(
            "cannot summarize by '{key}' (expected unit or phasing_location)"
        )));
    }
    let sums: Vec<Expr> = SUMMED_COLUMNS.iter().map(|name| col(*name).sum()).collect();
    let summary = frame
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg(sums)
        .sort_by_exprs([col(key)], SortMultipleOptions::default())
        .collect()?;
    Ok(summary)
}

fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Renders a frame as a boxed ASCII table.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.get(row_idx)
                    .map(|av| cell_text(&av))
                    .unwrap_or_default()
            })
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let format_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&format_row(&names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
