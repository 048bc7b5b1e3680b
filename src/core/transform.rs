use crate::core::normalize::normalize;
use crate::domain::model::{BadRowPolicy, NormalizedRecord, RawRecord, SkippedRow};
use crate::utils::error::{EtlError, Result};

fn parse_number(line: u64, field: &str, value: Option<&str>) -> Result<f64> {
    let text = value.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Err(EtlError::data_format(line, field, "value is missing"));
    }
    let number = text
        .parse::<f64>()
        .map_err(|_| EtlError::data_format(line, field, format!("not a number: '{}'", text)))?;
    // "NaN" and "inf" parse as f64 but are not data.
    if !number.is_finite() {
        return Err(EtlError::data_format(
            line,
            field,
            format!("not a finite number: '{}'", text),
        ));
    }
    Ok(number)
}

/// Converts one raw row into dollars and counts.
///
/// The category label is copied verbatim; only an absent or empty cell is
/// replaced, by `missing_category`.
pub fn transform(raw: &RawRecord, missing_category: &str) -> Result<NormalizedRecord> {
    let line = raw.line;
    let fatalities = parse_number(line, "fatalities", raw.fatalities.as_deref())?;
    let injuries = parse_number(line, "injuries", raw.injuries.as_deref())?;
    let property_magnitude = parse_number(
        line,
        "property_damage_magnitude",
        raw.property_damage_magnitude.as_deref(),
    )?;
    let crop_magnitude = parse_number(
        line,
        "crop_damage_magnitude",
        raw.crop_damage_magnitude.as_deref(),
    )?;

    let category = match raw.category.as_deref() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => missing_category.to_string(),
    };

    Ok(NormalizedRecord {
        category,
        fatalities,
        injuries,
        property_damage_dollars: normalize(
            property_magnitude,
            raw.property_damage_unit.as_deref().unwrap_or(""),
        ),
        crop_damage_dollars: normalize(
            crop_magnitude,
            raw.crop_damage_unit.as_deref().unwrap_or(""),
        ),
    })
}

#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Transforms every row in input order. Under `Abort` the first malformed
/// row fails the batch; under `Skip` it is left out and reported.
pub fn transform_all(
    raw: &[RawRecord],
    policy: BadRowPolicy,
    missing_category: &str,
) -> Result<TransformOutcome> {
    let mut outcome = TransformOutcome {
        records: Vec::with_capacity(raw.len()),
        skipped: Vec::new(),
    };

    for row in raw {
        match transform(row, missing_category) {
            Ok(record) => outcome.records.push(record),
            Err(e @ EtlError::DataFormat { .. }) if policy == BadRowPolicy::Skip => {
                tracing::debug!("Skipping row: {}", e);
                outcome.skipped.push(SkippedRow {
                    line: row.line,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if !outcome.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} malformed rows out of {}",
            outcome.skipped.len(),
            raw.len()
        );
    }

    Ok(outcome)
}
