use std::collections::{BTreeMap, BTreeSet};

use foundation::{EntityId, IndicatorName, Year, YearFilter};
use tracing::{info, warn};

use crate::analysis::Extent;
use crate::error::{IssueKind, MalformedInput, StoreError};
use crate::record::{Observation, RawRecord, RecordSchema};

/// Immutable, fully joined dataset: one observation per entity×year.
///
/// Ordering contract:
/// - `observations()` and `all_for_year` follow input order.
/// - `entities()` is first-seen order, `years()` ascending.
/// - `all_for_entity` is year ascending.
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    observations: Vec<Observation>,
    by_entity: BTreeMap<EntityId, BTreeMap<Year, usize>>,
    entities: Vec<EntityId>,
    years: Vec<Year>,
    indicators: Vec<IndicatorName>,
    issues: Vec<MalformedInput>,
}

impl ObservationStore {
    /// Builds the store from raw records.
    ///
    /// Records without a usable entity or year, and duplicate entity×year
    /// records after the first, are skipped and kept as issues. Fails only when
    /// nothing valid remains.
    pub fn load(
        records: impl IntoIterator<Item = RawRecord>,
        schema: &RecordSchema,
    ) -> Result<Self, StoreError> {
        let mut issues = Vec::new();
        let mut accepted = Vec::new();
        let mut record_count = 0usize;

        for (index, raw) in records.into_iter().enumerate() {
            record_count += 1;
            match schema.coerce(index, &raw, &mut issues) {
                Ok(obs) => accepted.push((index, obs)),
                Err(issue) => issues.push(issue),
            }
        }

        let store = Self::build(accepted, issues, record_count)?;
        info!(
            observations = store.observations.len(),
            entities = store.entities.len(),
            years = store.years.len(),
            indicators = store.indicators.len(),
            issues = store.issues.len(),
            "observation store loaded"
        );
        Ok(store)
    }

    /// Builds the store from already typed observations.
    pub fn from_observations(
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<Self, StoreError> {
        let accepted: Vec<(usize, Observation)> = observations.into_iter().enumerate().collect();
        let record_count = accepted.len();
        Self::build(accepted, Vec::new(), record_count)
    }

    fn build(
        accepted: Vec<(usize, Observation)>,
        mut issues: Vec<MalformedInput>,
        record_count: usize,
    ) -> Result<Self, StoreError> {
        let mut store = ObservationStore::default();
        let mut years = BTreeSet::new();
        let mut seen_indicators = BTreeSet::new();

        for (index, obs) in accepted {
            let per_year = store.by_entity.entry(obs.entity.clone()).or_default();
            if per_year.contains_key(&obs.year) {
                issues.push(MalformedInput {
                    record: index,
                    kind: IssueKind::DuplicateKey {
                        entity: obs.entity,
                        year: obs.year,
                    },
                });
                continue;
            }
            if per_year.is_empty() {
                store.entities.push(obs.entity.clone());
            }
            per_year.insert(obs.year, store.observations.len());
            years.insert(obs.year);
            for (name, value) in &obs.indicators {
                if value.is_some() && seen_indicators.insert(name.clone()) {
                    store.indicators.push(name.clone());
                }
            }
            store.observations.push(obs);
        }

        if store.observations.is_empty() {
            return Err(StoreError::EmptyStore { record_count });
        }

        // Issues are reported in input order regardless of when they were found.
        issues.sort_by_key(|i| i.record);
        for issue in &issues {
            warn!("recovered malformed input: {issue}");
        }

        store.years = years.into_iter().collect();
        store.issues = issues;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Indicators with at least one non-absent value, in first-seen order.
    pub fn indicators(&self) -> &[IndicatorName] {
        &self.indicators
    }

    pub fn issues(&self) -> &[MalformedInput] {
        &self.issues
    }

    pub fn latest_year(&self) -> Option<Year> {
        self.years.last().copied()
    }

    pub fn contains_entity(&self, entity: &str) -> bool {
        self.by_entity.contains_key(entity)
    }

    pub fn contains_year(&self, year: Year) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    pub fn has_indicator(&self, indicator: &str) -> bool {
        self.indicators.iter().any(|i| i.as_str() == indicator)
    }

    /// Stable position of `entity` in first-seen order, for legend colors.
    pub fn legend_index(&self, entity: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.as_str() == entity)
    }

    pub fn lookup(&self, entity: &str, year: Year) -> Option<&Observation> {
        let idx = *self.by_entity.get(entity)?.get(&year)?;
        self.observations.get(idx)
    }

    /// Observations matching `filter`, in input order.
    pub fn all_for_year(&self, filter: YearFilter) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|o| filter.matches(o.year))
            .collect()
    }

    /// Observations of `entity`, year ascending.
    pub fn all_for_entity(&self, entity: &str) -> Vec<&Observation> {
        let Some(per_year) = self.by_entity.get(entity) else {
            return Vec::new();
        };
        per_year
            .values()
            .filter_map(|&idx| self.observations.get(idx))
            .collect()
    }

    /// `[min, max]` of `indicator` over the non-absent values in `subset`.
    ///
    /// Callers are expected to recover from `EmptyExtent`, typically with
    /// [`Extent::UNIT`].
    pub fn extent<'a>(
        &self,
        indicator: &str,
        subset: impl IntoIterator<Item = &'a Observation>,
    ) -> Result<Extent, StoreError> {
        Extent::of(indicator, subset)
    }
}
