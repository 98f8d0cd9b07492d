use std::collections::BTreeMap;

use foundation::{EntityId, IndicatorName, Year};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IssueKind, MalformedInput};

/// One untyped input row, as produced by the fetch/parse collaborator.
pub type RawRecord = serde_json::Map<String, Value>;

/// One entity×year fact with all of its indicator values.
///
/// `None` marks a missing observation, which is distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity: EntityId,
    pub year: Year,
    pub indicators: BTreeMap<IndicatorName, Option<f64>>,
}

impl Observation {
    pub fn new(entity: EntityId, year: Year) -> Self {
        Self {
            entity,
            year,
            indicators: BTreeMap::new(),
        }
    }

    pub fn with(mut self, indicator: &str, value: Option<f64>) -> Self {
        self.indicators.insert(IndicatorName::new(indicator), value);
        self
    }

    /// Value of `indicator`, flattening "field missing" and "value absent".
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.indicators.get(indicator).copied().flatten()
    }
}

/// Which raw fields identify the entity and the year.
///
/// Every other field of a record is treated as an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub entity_field: String,
    pub year_field: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            entity_field: "entity".to_string(),
            year_field: "year".to_string(),
        }
    }
}

impl RecordSchema {
    pub fn new(entity_field: impl Into<String>, year_field: impl Into<String>) -> Self {
        Self {
            entity_field: entity_field.into(),
            year_field: year_field.into(),
        }
    }

    /// Converts one raw record.
    ///
    /// Returns `Err` only when the record has no usable entity or year. Field
    /// level problems are reported through `issues` and the field is stored as
    /// absent.
    pub fn coerce(
        &self,
        index: usize,
        raw: &RawRecord,
        issues: &mut Vec<MalformedInput>,
    ) -> Result<Observation, MalformedInput> {
        let entity = raw
            .get(&self.entity_field)
            .and_then(coerce_entity)
            .ok_or_else(|| MalformedInput {
                record: index,
                kind: IssueKind::MissingEntity {
                    field: self.entity_field.clone(),
                },
            })?;
        let year = raw
            .get(&self.year_field)
            .and_then(coerce_year)
            .ok_or_else(|| MalformedInput {
                record: index,
                kind: IssueKind::MissingYear {
                    field: self.year_field.clone(),
                },
            })?;

        let mut obs = Observation::new(entity, year);
        for (field, value) in raw {
            if field == &self.entity_field || field == &self.year_field {
                continue;
            }
            let coerced = match coerce_indicator(value) {
                Ok(v) => v,
                Err(()) => {
                    issues.push(MalformedInput {
                        record: index,
                        kind: IssueKind::UncoercibleField {
                            field: field.clone(),
                        },
                    });
                    None
                }
            };
            obs.indicators.insert(IndicatorName::new(field.as_str()), coerced);
        }
        Ok(obs)
    }
}

fn coerce_entity(value: &Value) -> Option<EntityId> {
    let s = value.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    Some(EntityId::new(s))
}

fn coerce_year(value: &Value) -> Option<Year> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok().map(Year);
            }
            let f = n.as_f64()?;
            if f.fract() != 0.0 || f < i32::MIN as f64 || f > i32::MAX as f64 {
                return None;
            }
            Some(Year(f as i32))
        }
        Value::String(s) => s.trim().parse::<i32>().ok().map(Year),
        _ => None,
    }
}

/// `Ok(None)` is a legitimately missing value, `Err` a field that could not be
/// read as a number.
fn coerce_indicator(value: &Value) -> Result<Option<f64>, ()> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64().filter(|f| f.is_finite())),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(f)),
                Ok(_) => Ok(None),
                Err(_) => Err(()),
            }
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(()),
    }
}
