use foundation::{EntityId, YearFilter};
use layers::ViewEvent;
use selection::Transition;

/// How a transition affects the click-pinned focus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinChange {
    Keep,
    Pin,
    Release,
}

/// Result of translating a view event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Apply(Transition, PinChange),
    /// Hover while focus is pinned by a click.
    Ignore,
}

/// Maps a view event onto a transition.
///
/// Hover focuses and pointer-leave clears, unless a click pinned the focus.
/// Clicking the pinned entity again, or clicking the plot background, releases
/// the pin.
pub fn translate(event: &ViewEvent, pinned: Option<&EntityId>) -> Translation {
    match event {
        ViewEvent::EntityHovered(_) if pinned.is_some() => Translation::Ignore,
        ViewEvent::EntityHovered(Some(id)) => {
            Translation::Apply(Transition::FocusEntity(id.clone()), PinChange::Keep)
        }
        ViewEvent::EntityHovered(None) => {
            Translation::Apply(Transition::ClearFocus, PinChange::Keep)
        }
        ViewEvent::EntitySelected(id) if pinned == Some(id) => {
            Translation::Apply(Transition::ClearFocus, PinChange::Release)
        }
        ViewEvent::EntitySelected(id) => {
            Translation::Apply(Transition::FocusEntity(id.clone()), PinChange::Pin)
        }
        ViewEvent::BackgroundClicked => {
            Translation::Apply(Transition::ClearFocus, PinChange::Release)
        }
        ViewEvent::YearChosen(YearFilter::Specific(y)) => {
            Translation::Apply(Transition::SelectYear(*y), PinChange::Keep)
        }
        ViewEvent::YearChosen(YearFilter::AllYears) => {
            Translation::Apply(Transition::SelectAllYears, PinChange::Keep)
        }
        ViewEvent::AxesChosen { x, y } => Translation::Apply(
            Transition::SetAxes {
                x: x.clone(),
                y: y.clone(),
            },
            PinChange::Keep,
        ),
    }
}
