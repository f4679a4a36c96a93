//! Synthetic transaction timing generator
//!
//! Each transaction gets one timing value per step field. Clean steps are
//! uniform noise on [0, 1). Faulty steps carry the same noise plus a delay of
//! 2.0 to 5.0 on every `error_period`-th transaction (`id % error_period == 0`).

use polars::prelude::*;
use rand::Rng;

use super::config::{FieldKind, PipelineConfig, ID_COLUMN};
use super::error::PipelineError;

/// Smallest injected delay
pub const DELAY_BASE: f64 = 2.0;

/// Width of the injected delay range above `DELAY_BASE`
pub const DELAY_SPREAD: f64 = 3.0;

/// Whether a record receives the injected delay on its faulty steps
#[inline]
pub fn is_faulty_record(id: usize, error_period: usize) -> bool {
    id % error_period == 0
}

/// Number of records in `0..transactions` that receive the injected delay
pub fn faulty_record_count(transactions: usize, error_period: usize) -> usize {
    if error_period == 0 {
        return 0;
    }
    transactions.div_ceil(error_period)
}

/// Draw one step value.
///
/// Faulty records draw the base noise first and the delay second, so the draw
/// sequence is fixed for a given layout.
fn draw_step<R: Rng + ?Sized>(rng: &mut R, kind: FieldKind, faulty_record: bool) -> f64 {
    let base: f64 = rng.gen();
    match kind {
        FieldKind::Faulty if faulty_record => {
            let spread: f64 = rng.gen();
            base + (DELAY_BASE + spread * DELAY_SPREAD)
        }
        _ => base,
    }
}

/// Generate the transaction table: `transaction_id` followed by one Float64
/// column per step field, in configuration order.
///
/// The configuration is validated before any value is drawn. Values are drawn
/// record by record, field by field.
pub fn generate_transactions<R: Rng + ?Sized>(
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<DataFrame, PipelineError> {
    config.validate()?;

    let fields = config.step_fields();
    let n = config.transactions;
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(n); fields.len()];

    for id in 0..n {
        let faulty_record = is_faulty_record(id, config.error_period);
        for (field, column) in fields.iter().zip(values.iter_mut()) {
            column.push(draw_step(&mut *rng, field.kind, faulty_record));
        }
    }

    let ids: Vec<i64> = (0..n as i64).collect();
    let mut columns: Vec<Column> = Vec::with_capacity(fields.len() + 1);
    columns.push(Column::new(ID_COLUMN.into(), ids));
    for (field, column) in fields.iter().zip(values) {
        columns.push(Column::new(field.name.as_str().into(), column));
    }

    Ok(DataFrame::new(columns)?)
}
