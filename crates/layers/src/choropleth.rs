use foundation::{EntityId, IndicatorName, YearFilter};
use observations::{Extent, ObservationStore, Statistics};
use selection::SelectionState;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCell {
    pub entity: EntityId,
    /// `None` is "no data" and must be drawn distinctly from zero.
    pub value: Option<f64>,
    /// `value` mapped into `[0, 1]` over the year's extent.
    pub normalized: Option<f64>,
}

/// Everything the map view needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub year: YearFilter,
    pub indicator: IndicatorName,
    pub extent: Extent,
    pub focused: Option<EntityId>,
    /// One cell per store entity, in entity first-seen order.
    pub cells: Vec<MapCell>,
}

impl MapData {
    pub fn get(&self, entity: &str) -> Option<&MapCell> {
        self.cells.iter().find(|c| c.entity.as_str() == entity)
    }

    pub fn no_data_count(&self) -> usize {
        self.cells.iter().filter(|c| c.normalized.is_none()).count()
    }
}

/// Derives the map coloring for `state`.
///
/// For a specific year each entity shows its value for that year. For all
/// years it shows the mean of its non-absent values. Normalization always
/// uses the extent of the color indicator over the observations `state.year`
/// selects.
pub fn derive_map_data(store: &ObservationStore, state: &SelectionState) -> MapData {
    let indicator = state.color_indicator.as_str();
    let subset = store.all_for_year(state.year);

    let extent = match store.extent(indicator, subset.iter().copied()) {
        Ok(e) => Some(e),
        Err(err) => {
            debug!(year = %state.year, "map extent unavailable: {err}");
            None
        }
    };

    let cells = store
        .entities()
        .iter()
        .map(|entity| {
            let value = match state.year {
                YearFilter::Specific(year) => store
                    .lookup(entity.as_str(), year)
                    .and_then(|o| o.value(indicator)),
                YearFilter::AllYears => {
                    let values: Vec<f64> = store
                        .all_for_entity(entity.as_str())
                        .iter()
                        .filter_map(|o| o.value(indicator))
                        .collect();
                    Statistics::mean(&values)
                }
            };
            let normalized = value.zip(extent).and_then(|(v, e)| e.normalize(v));
            MapCell {
                entity: entity.clone(),
                value,
                normalized,
            }
        })
        .collect();

    MapData {
        year: state.year,
        indicator: state.color_indicator.clone(),
        extent: extent.unwrap_or(Extent::UNIT),
        focused: state.focused_entity.clone(),
        cells,
    }
}
