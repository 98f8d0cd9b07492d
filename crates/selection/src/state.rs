use foundation::{EntityId, IndicatorName, Year, YearFilter};
use observations::ObservationStore;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::transition::Transition;

/// Session selection: the single source of truth both views derive from.
///
/// Invariants (checked on construction and on every transition):
/// - all indicator names are known to the store;
/// - `focused_entity`, if set, is a store entity;
/// - `year`, if specific, is one of the store's years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub year: YearFilter,
    pub focused_entity: Option<EntityId>,
    pub x_indicator: IndicatorName,
    pub y_indicator: IndicatorName,
    /// Drives the map coloring; fixed for the session.
    pub color_indicator: IndicatorName,
}

/// Optional overrides for the initial state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefaults {
    pub year: Option<YearFilter>,
    pub color_indicator: Option<IndicatorName>,
    pub x_indicator: Option<IndicatorName>,
    pub y_indicator: Option<IndicatorName>,
}

impl SelectionState {
    /// Builds the session start state.
    ///
    /// Unset fields fall back to: the most recent year, no focus, and the
    /// store's indicators in first-seen order (color, x, y).
    pub fn initial(
        store: &ObservationStore,
        defaults: &StateDefaults,
    ) -> Result<Self, SelectionError> {
        let indicators = store.indicators();
        let Some(last) = indicators.last() else {
            return Err(SelectionError::NoIndicators);
        };
        let nth = |n: usize| indicators.get(n).unwrap_or(last).clone();

        let year = match defaults.year {
            Some(filter) => filter,
            // load() never produces a store without years.
            None => store
                .latest_year()
                .map_or(YearFilter::AllYears, YearFilter::Specific),
        };
        if let YearFilter::Specific(y) = year {
            check_year(store, y)?;
        }

        // With three or more indicators: color, x, y. With two, the map and
        // the x axis share the first one.
        let (x_at, y_at) = if indicators.len() >= 3 { (1, 2) } else { (0, 1) };
        let color_indicator = defaults.color_indicator.clone().unwrap_or_else(|| nth(0));
        let x_indicator = defaults.x_indicator.clone().unwrap_or_else(|| nth(x_at));
        let y_indicator = defaults.y_indicator.clone().unwrap_or_else(|| nth(y_at));
        for name in [&color_indicator, &x_indicator, &y_indicator] {
            check_indicator(store, name)?;
        }

        Ok(Self {
            year,
            focused_entity: None,
            x_indicator,
            y_indicator,
            color_indicator,
        })
    }

    /// Returns the successor state for `transition`, leaving `self` untouched.
    pub fn apply(
        &self,
        transition: &Transition,
        store: &ObservationStore,
    ) -> Result<Self, SelectionError> {
        let mut next = self.clone();
        match transition {
            Transition::SelectYear(y) => {
                check_year(store, *y)?;
                next.year = YearFilter::Specific(*y);
            }
            Transition::SelectAllYears => next.year = YearFilter::AllYears,
            Transition::FocusEntity(id) => {
                if !store.contains_entity(id.as_str()) {
                    return Err(SelectionError::UnknownEntity(id.clone()));
                }
                next.focused_entity = Some(id.clone());
            }
            Transition::ClearFocus => next.focused_entity = None,
            Transition::SetAxes { x, y } => {
                check_indicator(store, x)?;
                check_indicator(store, y)?;
                next.x_indicator = x.clone();
                next.y_indicator = y.clone();
            }
        }
        Ok(next)
    }
}

fn check_year(store: &ObservationStore, year: Year) -> Result<(), SelectionError> {
    if store.contains_year(year) {
        Ok(())
    } else {
        Err(SelectionError::InvalidYear(year))
    }
}

fn check_indicator(store: &ObservationStore, name: &IndicatorName) -> Result<(), SelectionError> {
    if store.has_indicator(name.as_str()) {
        Ok(())
    } else {
        Err(SelectionError::UnknownIndicator(name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionState, StateDefaults};
    use crate::error::SelectionError;
    use crate::transition::Transition;
    use foundation::{EntityId, IndicatorName, Year, YearFilter};
    use observations::{Observation, ObservationStore};
    use pretty_assertions::assert_eq;

    fn store() -> ObservationStore {
        ObservationStore::from_observations([
            Observation::new(EntityId::new("NL"), Year(2014))
                .with("energy", Some(0.1))
                .with("exp", Some(10.0))
                .with("pol", Some(5.0)),
            Observation::new(EntityId::new("BE"), Year(2015))
                .with("energy", Some(0.2))
                .with("exp", Some(8.0))
                .with("pol", None),
        ])
        .unwrap()
    }

    #[test]
    fn defaults_to_latest_year_and_indicator_order() {
        let s = SelectionState::initial(&store(), &StateDefaults::default()).unwrap();
        assert_eq!(s.year, YearFilter::Specific(Year(2015)));
        assert_eq!(s.focused_entity, None);
        assert_eq!(s.color_indicator, IndicatorName::new("energy"));
        assert_eq!(s.x_indicator, IndicatorName::new("exp"));
        assert_eq!(s.y_indicator, IndicatorName::new("pol"));
    }

    #[test]
    fn two_indicators_give_distinct_axes() {
        let store = ObservationStore::from_observations([
            Observation::new(EntityId::new("NL"), Year(2014))
                .with("exp", Some(1.0))
                .with("pol", Some(2.0)),
        ])
        .unwrap();
        let s = SelectionState::initial(&store, &StateDefaults::default()).unwrap();
        assert_eq!(s.color_indicator, IndicatorName::new("exp"));
        assert_eq!(s.x_indicator, IndicatorName::new("exp"));
        assert_eq!(s.y_indicator, IndicatorName::new("pol"));
    }

    #[test]
    fn single_indicator_is_used_everywhere() {
        let store = ObservationStore::from_observations([
            Observation::new(EntityId::new("NL"), Year(2014)).with("pol", Some(1.0)),
        ])
        .unwrap();
        let s = SelectionState::initial(&store, &StateDefaults::default()).unwrap();
        assert_eq!(s.x_indicator, IndicatorName::new("pol"));
        assert_eq!(s.y_indicator, IndicatorName::new("pol"));
    }

    #[test]
    fn defaults_are_validated() {
        let defaults = StateDefaults {
            x_indicator: Some(IndicatorName::new("gdp")),
            ..Default::default()
        };
        assert_eq!(
            SelectionState::initial(&store(), &defaults),
            Err(SelectionError::UnknownIndicator(IndicatorName::new("gdp")))
        );

        let defaults = StateDefaults {
            year: Some(YearFilter::Specific(Year(1999))),
            ..Default::default()
        };
        assert_eq!(
            SelectionState::initial(&store(), &defaults),
            Err(SelectionError::InvalidYear(Year(1999)))
        );
    }

    #[test]
    fn transitions_update_exactly_their_field() {
        let store = store();
        let s0 = SelectionState::initial(&store, &StateDefaults::default()).unwrap();

        let s1 = s0.apply(&Transition::SelectYear(Year(2014)), &store).unwrap();
        assert_eq!(s1.year, YearFilter::Specific(Year(2014)));

        let s2 = s1.apply(&Transition::focus("NL"), &store).unwrap();
        assert_eq!(s2.focused_entity, Some(EntityId::new("NL")));
        assert_eq!(s2.year, s1.year);

        let s3 = s2.apply(&Transition::SelectAllYears, &store).unwrap();
        assert_eq!(s3.year, YearFilter::AllYears);
        assert_eq!(s3.focused_entity, Some(EntityId::new("NL")));

        let s4 = s3.apply(&Transition::set_axes("energy", "exp"), &store).unwrap();
        assert_eq!(s4.x_indicator, IndicatorName::new("energy"));
        assert_eq!(s4.y_indicator, IndicatorName::new("exp"));

        let s5 = s4.apply(&Transition::ClearFocus, &store).unwrap();
        assert_eq!(s5.focused_entity, None);
    }

    #[test]
    fn rejected_transitions_report_the_offending_value() {
        let store = store();
        let s0 = SelectionState::initial(&store, &StateDefaults::default()).unwrap();

        assert_eq!(
            s0.apply(&Transition::SelectYear(Year(9999)), &store),
            Err(SelectionError::InvalidYear(Year(9999)))
        );
        assert_eq!(
            s0.apply(&Transition::focus("XX"), &store),
            Err(SelectionError::UnknownEntity(EntityId::new("XX")))
        );
        assert_eq!(
            s0.apply(&Transition::set_axes("exp", "gdp"), &store),
            Err(SelectionError::UnknownIndicator(IndicatorName::new("gdp")))
        );
    }

    #[test]
    fn state_serializes_with_tagged_year() {
        let s = SelectionState::initial(&store(), &StateDefaults::default()).unwrap();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["year"], serde_json::json!({"specific": 2015}));
    }
}
