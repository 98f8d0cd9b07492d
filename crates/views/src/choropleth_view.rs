use foundation::{EntityId, YearFilter};
use layers::symbology::ColorRamp;
use layers::{MapData, ViewEvent, ViewKind, ViewRenderer};
use runtime::EventEmitter;
use tracing::trace;

use crate::display::{DisplayList, DrawCommand};

/// Choropleth map: one filled region per entity.
///
/// Pointer callbacks are meant to be wired to the host's input handling; they
/// only emit [`ViewEvent`]s.
#[derive(Debug, Default)]
pub struct ChoroplethView {
    ramp: ColorRamp,
    list: DisplayList,
    events: Option<EventEmitter<ViewEvent>>,
    render_count: u64,
}

impl ChoroplethView {
    pub fn new(ramp: ColorRamp) -> Self {
        Self {
            ramp,
            ..Default::default()
        }
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Pointer moved onto a region. Unknown regions (not drawn) are ignored.
    pub fn pointer_enter(&self, entity: &str) {
        let drawn = self.list.regions().any(|(e, _, _)| e.as_str() == entity);
        if drawn {
            self.emit(ViewEvent::EntityHovered(Some(EntityId::new(entity))));
        }
    }

    pub fn pointer_leave(&self) {
        self.emit(ViewEvent::EntityHovered(None));
    }

    pub fn click(&self, entity: &str) {
        self.emit(ViewEvent::EntitySelected(EntityId::new(entity)));
    }

    /// Year picker next to the map.
    pub fn choose_year(&self, year: YearFilter) {
        self.emit(ViewEvent::YearChosen(year));
    }

    fn emit(&self, event: ViewEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl ViewRenderer<MapData> for ChoroplethView {
    fn kind(&self) -> ViewKind {
        ViewKind::Map
    }

    fn connect(&mut self, events: EventEmitter<ViewEvent>) {
        self.events = Some(events);
    }

    fn render(&mut self, data: &MapData) {
        let mut list = DisplayList::default();
        list.commands
            .push(DrawCommand::Caption(format!("{} ({})", data.indicator, data.year)));
        for cell in &data.cells {
            list.commands.push(DrawCommand::Region {
                entity: cell.entity.clone(),
                fill: self.ramp.fill(cell.normalized),
                highlighted: data.focused.as_ref() == Some(&cell.entity),
            });
        }
        self.list = list;
        self.render_count += 1;
        trace!(regions = data.cells.len(), "map painted");
    }

    fn clear(&mut self) {
        self.list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::ChoroplethView;
    use foundation::{EntityId, Year};
    use layers::symbology::Fill;
    use layers::{ViewEvent, ViewRenderer, derive_map_data};
    use observations::{Observation, ObservationStore};
    use runtime::EventBus;
    use selection::{SelectionState, StateDefaults, Transition};

    fn map_data(focus: Option<&str>) -> layers::MapData {
        let store = ObservationStore::from_observations([
            Observation::new(EntityId::new("NL"), Year(2015)).with("energy", Some(1.0)),
            Observation::new(EntityId::new("BE"), Year(2015)).with("energy", None),
        ])
        .unwrap();
        let mut state = SelectionState::initial(&store, &StateDefaults::default()).unwrap();
        if let Some(f) = focus {
            state = state.apply(&Transition::focus(f), &store).unwrap();
        }
        derive_map_data(&store, &state)
    }

    #[test]
    fn render_is_idempotent() {
        let data = map_data(None);
        let mut view = ChoroplethView::default();
        view.render(&data);
        let once = view.display_list().clone();
        view.render(&data);
        assert_eq!(view.display_list(), &once);
        assert_eq!(view.display_list().len(), 3);
        assert_eq!(view.render_count(), 2);
    }

    #[test]
    fn absent_values_use_no_data_fill() {
        let mut view = ChoroplethView::default();
        view.render(&map_data(Some("BE")));
        let regions: Vec<_> = view.display_list().regions().collect();
        assert!(matches!(regions[0].1, Fill::Ramp(_)));
        assert_eq!(regions[1].1, &Fill::NoData);
        assert!(regions[1].2);
        assert!(!regions[0].2);
    }

    #[test]
    fn clear_releases_elements() {
        let mut view = ChoroplethView::default();
        view.render(&map_data(None));
        view.clear();
        assert!(view.display_list().is_empty());
    }

    #[test]
    fn pointer_callbacks_emit_events() {
        let bus = EventBus::new();
        let mut view = ChoroplethView::default();
        view.connect(bus.emitter());
        view.render(&map_data(None));

        view.pointer_enter("NL");
        view.pointer_enter("XX");
        view.pointer_leave();
        view.click("BE");

        let events: Vec<ViewEvent> = bus.drain().into_iter().map(|q| q.event).collect();
        assert_eq!(
            events,
            vec![
                ViewEvent::EntityHovered(Some(EntityId::new("NL"))),
                ViewEvent::EntityHovered(None),
                ViewEvent::EntitySelected(EntityId::new("BE")),
            ]
        );
    }
}
