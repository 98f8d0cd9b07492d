use foundation::{EntityId, IndicatorName, Year, YearFilter};
use observations::{Extent, ObservationStore, Statistics};
use selection::SelectionState;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub entity: EntityId,
    pub x: f64,
    pub y: f64,
    pub year: Year,
    /// Entity position in store first-seen order; stable legend color.
    pub legend_index: usize,
}

/// Everything the scatter view needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub year: YearFilter,
    pub focused: Option<EntityId>,
    pub x_indicator: IndicatorName,
    pub y_indicator: IndicatorName,
    pub points: Vec<ScatterPoint>,
    pub x_extent: Extent,
    pub y_extent: Extent,
    /// Matching observations dropped for lacking x or y.
    pub excluded: usize,
}

impl ScatterData {
    /// Distinct plotted entities in store first-seen order (by
    /// `legend_index`), for the legend.
    pub fn legend(&self) -> Vec<(&EntityId, usize)> {
        let mut out: Vec<(&EntityId, usize)> = Vec::new();
        for p in &self.points {
            if !out.iter().any(|(e, _)| *e == &p.entity) {
                out.push((&p.entity, p.legend_index));
            }
        }
        out.sort_by_key(|(_, idx)| *idx);
        out
    }
}

/// Derives the scatter points for `state`.
///
/// Ordering contract: points are emitted by year ascending, then entity
/// first-seen order. With a focused entity only its observations remain.
pub fn derive_scatter_data(store: &ObservationStore, state: &SelectionState) -> ScatterData {
    let x_name = state.x_indicator.as_str();
    let y_name = state.y_indicator.as_str();
    let focused = state.focused_entity.as_ref().map(|e| e.as_str());

    let mut points = Vec::new();
    let mut excluded = 0usize;

    for &year in store.years() {
        if !state.year.matches(year) {
            continue;
        }
        for (legend_index, entity) in store.entities().iter().enumerate() {
            if focused.is_some_and(|f| f != entity.as_str()) {
                continue;
            }
            let Some(obs) = store.lookup(entity.as_str(), year) else {
                continue;
            };
            match (obs.value(x_name), obs.value(y_name)) {
                (Some(x), Some(y)) => points.push(ScatterPoint {
                    entity: entity.clone(),
                    x,
                    y,
                    year,
                    legend_index,
                }),
                _ => excluded += 1,
            }
        }
    }

    if excluded > 0 {
        debug!(
            excluded,
            x = x_name,
            y = y_name,
            year = %state.year,
            "scatter observations without both coordinates left out"
        );
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    ScatterData {
        year: state.year,
        focused: state.focused_entity.clone(),
        x_indicator: state.x_indicator.clone(),
        y_indicator: state.y_indicator.clone(),
        x_extent: extent_or_unit(&xs),
        y_extent: extent_or_unit(&ys),
        points,
        excluded,
    }
}

fn extent_or_unit(values: &[f64]) -> Extent {
    Statistics::min_max(values).map_or(Extent::UNIT, |(min, max)| Extent::new(min, max))
}
