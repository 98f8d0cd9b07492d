use foundation::{EntityId, IndicatorName, YearFilter};
use runtime::EventEmitter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Map,
    Scatter,
}

/// User interaction reported by a view.
///
/// Views never change selection state themselves; they emit these and the
/// coordinator decides what happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewEvent {
    /// Pointer entered an entity, or left all entities (`None`).
    EntityHovered(Option<EntityId>),
    EntitySelected(EntityId),
    YearChosen(YearFilter),
    /// Click on empty plot area.
    BackgroundClicked,
    AxesChosen { x: IndicatorName, y: IndicatorName },
}

/// A view that paints derived data of type `D`.
///
/// Contract:
/// - `render` replaces whatever was drawn before; calling it twice with the
///   same data leaves the same output and the same number of drawn elements.
/// - `clear` releases all drawn elements.
/// - Interaction is reported only through the emitter passed to `connect`.
///   Emitting from inside `render` is allowed; the event is handled after the
///   current cycle finishes.
/// - A view must emit `EntityHovered(None)` when the pointer leaves it.
pub trait ViewRenderer<D> {
    fn kind(&self) -> ViewKind;

    fn connect(&mut self, events: EventEmitter<ViewEvent>);

    fn render(&mut self, data: &D);

    fn clear(&mut self);
}
