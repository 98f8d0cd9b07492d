//! Adapters from fetched data into raw records.
//!
//! Statistical APIs usually deliver one series per indicator. `join_series`
//! merges those into the flat entity×year rows `ObservationStore::load` takes.

use std::collections::BTreeMap;

use foundation::{EntityId, IndicatorName, Year};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IngestError;
use crate::record::{RawRecord, RecordSchema};

/// Reads a JSON array of objects.
pub fn parse_records_json(payload: &str) -> Result<Vec<RawRecord>, IngestError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Array(items) = value else {
        return Err(IngestError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(IngestError::NotAnObject { index }),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub entity: EntityId,
    pub year: Year,
    pub value: Option<f64>,
}

/// All values of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub indicator: IndicatorName,
    pub points: Vec<SeriesPoint>,
}

/// Joins per-indicator series into one record per entity×year.
///
/// Rows are emitted in entity first-seen order (across all series), then year
/// ascending. An indicator without a point for some row is written as `null`.
/// When a series repeats an entity×year, the last point wins.
pub fn join_series(series: &[IndicatorSeries], schema: &RecordSchema) -> Vec<RawRecord> {
    let mut entity_order: Vec<EntityId> = Vec::new();
    let mut rows: BTreeMap<EntityId, BTreeMap<Year, BTreeMap<&str, Option<f64>>>> =
        BTreeMap::new();

    for s in series {
        for p in &s.points {
            if !rows.contains_key(&p.entity) {
                entity_order.push(p.entity.clone());
            }
            rows.entry(p.entity.clone())
                .or_default()
                .entry(p.year)
                .or_default()
                .insert(s.indicator.as_str(), p.value);
        }
    }

    let mut out = Vec::new();
    for entity in &entity_order {
        let Some(per_year) = rows.get(entity) else {
            continue;
        };
        for (year, values) in per_year {
            let mut record = RawRecord::new();
            record.insert(schema.entity_field.clone(), Value::from(entity.as_str()));
            record.insert(schema.year_field.clone(), Value::from(year.0));
            for s in series {
                let v = values.get(s.indicator.as_str()).copied().flatten();
                record.insert(s.indicator.to_string(), v.map_or(Value::Null, Value::from));
            }
            out.push(record);
        }
    }
    out
}
