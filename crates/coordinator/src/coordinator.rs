use std::sync::Arc;

use foundation::EntityId;
use layers::{
    MapData, ScatterData, ViewEvent, ViewRenderer, derive_map_data, derive_scatter_data,
};
use observations::ObservationStore;
use runtime::{Counter, Cycle, EventBus, Metrics};
use selection::{SelectionError, SelectionState, Transition};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::focus::{PinChange, Translation, translate};

/// Owns the selection state and keeps both views consistent with it.
///
/// Every accepted transition runs one cycle to completion: validate, commit,
/// derive both snapshots, then clear and render the map followed by the
/// scatter plot. A rejected transition changes nothing and renders nothing.
///
/// Views report interaction through the shared event bus. Events emitted
/// while a cycle is rendering are queued and handled after it, in order, by
/// [`Coordinator::pump`].
pub struct Coordinator<M, S>
where
    M: ViewRenderer<MapData>,
    S: ViewRenderer<ScatterData>,
{
    store: Arc<ObservationStore>,
    state: SelectionState,
    pinned: Option<EntityId>,
    map: M,
    scatter: S,
    map_data: MapData,
    scatter_data: ScatterData,
    bus: EventBus<ViewEvent>,
    cycle: Cycle,
    max_cascade: usize,
    metrics: Metrics,
}

impl<M, S> Coordinator<M, S>
where
    M: ViewRenderer<MapData>,
    S: ViewRenderer<ScatterData>,
{
    /// Builds the initial state, connects both views and paints cycle 0.
    pub fn new(
        store: Arc<ObservationStore>,
        mut map: M,
        mut scatter: S,
        config: &SessionConfig,
    ) -> Result<Self, SelectionError> {
        let state = SelectionState::initial(&store, &config.state_defaults())?;
        let bus = EventBus::new();
        map.connect(bus.emitter());
        scatter.connect(bus.emitter());

        let map_data = derive_map_data(&store, &state);
        let scatter_data = derive_scatter_data(&store, &state);

        let mut coordinator = Self {
            store,
            state,
            pinned: None,
            map,
            scatter,
            map_data,
            scatter_data,
            bus,
            cycle: Cycle::initial(),
            max_cascade: config.max_cascade,
            metrics: Metrics::new(),
        };
        debug!(
            year = %coordinator.state.year,
            x = %coordinator.state.x_indicator,
            y = %coordinator.state.y_indicator,
            color = %coordinator.state.color_indicator,
            "session started"
        );
        coordinator.paint();
        coordinator.pump();
        Ok(coordinator)
    }

    /// Applies one transition requested by the host.
    ///
    /// View events queued before the call are handled first, so the
    /// transition lands on top of them. On error the state and both views are
    /// left as those earlier events made them.
    pub fn dispatch(&mut self, transition: Transition) -> Result<(), SelectionError> {
        self.pump();
        let pin = match &transition {
            Transition::ClearFocus => PinChange::Release,
            Transition::FocusEntity(_) if self.pinned.is_some() => PinChange::Pin,
            _ => PinChange::Keep,
        };
        self.run(transition, pin)?;
        self.pump();
        Ok(())
    }

    /// Handles one view event after everything already queued, then anything
    /// it queued itself.
    pub fn handle_view_event(&mut self, event: ViewEvent) -> Result<(), SelectionError> {
        self.pump();
        self.process_view_event(event)?;
        self.pump();
        Ok(())
    }

    /// Drains queued view events in FIFO order, each one to completion.
    ///
    /// Rejected events are logged and skipped. Events queued before the call
    /// are always handled. Events emitted by views during cycles this call
    /// started count against `max_cascade`; past that limit the remainder is
    /// dropped so a view that emits on every render cannot stall the session.
    /// Returns the number of handled events.
    pub fn pump(&mut self) -> usize {
        let entry = self.cycle;
        let mut handled = 0usize;
        let mut cascaded = 0usize;
        while let Some(queued) = self.bus.pop() {
            if queued.cycle > entry {
                if cascaded >= self.max_cascade {
                    let dropped = 1 + self.bus.drain().len();
                    warn!(
                        dropped,
                        limit = self.max_cascade,
                        "view event cascade limit reached"
                    );
                    self.metrics.add(Counter::DroppedEvents, dropped as u64);
                    break;
                }
                cascaded += 1;
            }
            handled += 1;
            if let Err(err) = self.process_view_event(queued.event) {
                warn!(emitted_in = queued.cycle.index, "view event rejected: {err}");
            }
        }
        handled
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    /// Snapshot the map was last rendered with.
    pub fn map_data(&self) -> &MapData {
        &self.map_data
    }

    /// Snapshot the scatter plot was last rendered with.
    pub fn scatter_data(&self) -> &ScatterData {
        &self.scatter_data
    }

    pub fn pinned_focus(&self) -> Option<&EntityId> {
        self.pinned.as_ref()
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn pending_events(&self) -> usize {
        self.bus.len()
    }

    pub fn map_view(&self) -> &M {
        &self.map
    }

    pub fn map_view_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn scatter_view(&self) -> &S {
        &self.scatter
    }

    pub fn scatter_view_mut(&mut self) -> &mut S {
        &mut self.scatter
    }

    fn process_view_event(&mut self, event: ViewEvent) -> Result<(), SelectionError> {
        match translate(&event, self.pinned.as_ref()) {
            Translation::Apply(transition, pin) => self.run(transition, pin),
            Translation::Ignore => {
                debug!(?event, "hover ignored while focus is pinned");
                self.metrics.inc(Counter::IgnoredEvents);
                Ok(())
            }
        }
    }

    fn run(&mut self, transition: Transition, pin: PinChange) -> Result<(), SelectionError> {
        let next = match self.state.apply(&transition, &self.store) {
            Ok(next) => next,
            Err(err) => {
                debug!(kind = transition.kind(), "transition rejected: {err}");
                self.metrics.inc(Counter::RejectedTransitions);
                return Err(err);
            }
        };

        match pin {
            PinChange::Keep => {}
            PinChange::Pin => self.pinned = next.focused_entity.clone(),
            PinChange::Release => self.pinned = None,
        }

        self.state = next;
        self.cycle = self.cycle.next();
        self.map_data = derive_map_data(&self.store, &self.state);
        self.scatter_data = derive_scatter_data(&self.store, &self.state);
        debug!(
            cycle = self.cycle.index,
            kind = transition.kind(),
            year = %self.state.year,
            focus = ?self.state.focused_entity,
            points = self.scatter_data.points.len(),
            "transition applied"
        );
        self.paint();
        Ok(())
    }

    fn paint(&mut self) {
        self.bus.set_cycle(self.cycle);

        self.map.clear();
        self.map.render(&self.map_data);
        self.metrics.inc(Counter::MapRenders);

        self.scatter.clear();
        self.scatter.render(&self.scatter_data);
        self.metrics.inc(Counter::ScatterRenders);

        self.metrics.inc(Counter::Cycles);
        self.metrics
            .add(Counter::ExcludedPoints, self.scatter_data.excluded as u64);
        self.metrics
            .record_scatter_points(self.scatter_data.points.len());
    }
}
