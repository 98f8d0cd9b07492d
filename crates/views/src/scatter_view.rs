use foundation::IndicatorName;
use layers::symbology::legend_color;
use layers::{ScatterData, ScatterPoint, ViewEvent, ViewKind, ViewRenderer};
use runtime::EventEmitter;
use tracing::trace;

use crate::display::{DisplayList, DrawCommand};

/// Scatter plot of the selected indicator pair with a per-entity legend.
#[derive(Debug, Default)]
pub struct ScatterView {
    list: DisplayList,
    points: Vec<ScatterPoint>,
    tooltip: Option<usize>,
    events: Option<EventEmitter<ViewEvent>>,
    render_count: u64,
}

impl ScatterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Point under the pointer, shown as a tooltip.
    pub fn tooltip(&self) -> Option<&ScatterPoint> {
        self.points.get(self.tooltip?)
    }

    /// Hovering a dot only shows its tooltip; it does not refocus the views.
    pub fn point_hover(&mut self, index: usize) {
        self.tooltip = (index < self.points.len()).then_some(index);
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip = None;
        self.emit(ViewEvent::EntityHovered(None));
    }

    pub fn background_click(&self) {
        self.emit(ViewEvent::BackgroundClicked);
    }

    /// Axis switcher next to the plot.
    pub fn choose_axes(&self, x: &str, y: &str) {
        self.emit(ViewEvent::AxesChosen {
            x: IndicatorName::new(x),
            y: IndicatorName::new(y),
        });
    }

    fn emit(&self, event: ViewEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl ViewRenderer<ScatterData> for ScatterView {
    fn kind(&self) -> ViewKind {
        ViewKind::Scatter
    }

    fn connect(&mut self, events: EventEmitter<ViewEvent>) {
        self.events = Some(events);
    }

    fn render(&mut self, data: &ScatterData) {
        let mut list = DisplayList::default();
        list.commands.push(DrawCommand::Caption(format!(
            "{} vs {} ({})",
            data.x_indicator, data.y_indicator, data.year
        )));
        for p in &data.points {
            list.commands.push(DrawCommand::Dot {
                entity: p.entity.clone(),
                x: p.x,
                y: p.y,
                year: p.year,
                color: legend_color(p.legend_index),
            });
        }
        for (entity, index) in data.legend() {
            list.commands.push(DrawCommand::LegendEntry {
                entity: entity.clone(),
                color: legend_color(index),
            });
        }

        self.list = list;
        self.points = data.points.clone();
        // A stale tooltip index would point at a different observation.
        self.tooltip = None;
        self.render_count += 1;
        trace!(points = data.points.len(), "scatter painted");
    }

    fn clear(&mut self) {
        self.list.clear();
        self.points.clear();
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::ScatterView;
    use foundation::{EntityId, Year};
    use layers::{ViewEvent, ViewRenderer, derive_scatter_data};
    use observations::{Observation, ObservationStore};
    use runtime::EventBus;
    use selection::{SelectionState, StateDefaults, Transition};

    fn scatter_data() -> layers::ScatterData {
        let store = ObservationStore::from_observations([
            Observation::new(EntityId::new("A"), Year(2014))
                .with("exp", Some(10.0))
                .with("pol", Some(5.0)),
            Observation::new(EntityId::new("A"), Year(2015))
                .with("exp", Some(12.0))
                .with("pol", Some(4.0)),
            Observation::new(EntityId::new("B"), Year(2014))
                .with("exp", Some(8.0))
                .with("pol", Some(9.0)),
        ])
        .unwrap();
        let state = SelectionState::initial(&store, &StateDefaults::default())
            .unwrap()
            .apply(&Transition::SelectAllYears, &store)
            .unwrap();
        derive_scatter_data(&store, &state)
    }

    #[test]
    fn render_is_idempotent() {
        let data = scatter_data();
        let mut view = ScatterView::new();
        view.render(&data);
        let once = view.display_list().clone();
        view.render(&data);
        assert_eq!(view.display_list(), &once);
        // caption + 3 dots + 2 legend entries
        assert_eq!(view.display_list().len(), 6);
        assert_eq!(view.display_list().dots().count(), 3);
    }

    #[test]
    fn tooltip_tracks_hover_and_resets_on_render() {
        let data = scatter_data();
        let mut view = ScatterView::new();
        view.render(&data);
        view.point_hover(1);
        assert_eq!(view.tooltip().unwrap().entity, EntityId::new("B"));
        view.point_hover(99);
        assert!(view.tooltip().is_none());

        view.point_hover(0);
        view.render(&data);
        assert!(view.tooltip().is_none());
    }

    #[test]
    fn leave_and_clicks_emit_events() {
        let bus = EventBus::new();
        let mut view = ScatterView::new();
        view.connect(bus.emitter());
        view.render(&scatter_data());

        view.point_hover(0);
        view.pointer_leave();
        view.background_click();
        view.choose_axes("pol", "exp");

        let events: Vec<ViewEvent> = bus.drain().into_iter().map(|q| q.event).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ViewEvent::EntityHovered(None));
        assert_eq!(events[1], ViewEvent::BackgroundClicked);
        assert!(matches!(events[2], ViewEvent::AxesChosen { .. }));
    }
}
