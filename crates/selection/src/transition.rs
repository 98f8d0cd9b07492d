use foundation::{EntityId, IndicatorName, Year};
use serde::{Deserialize, Serialize};

/// The complete control surface over [`crate::SelectionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    SelectYear(Year),
    SelectAllYears,
    FocusEntity(EntityId),
    ClearFocus,
    SetAxes { x: IndicatorName, y: IndicatorName },
}

impl Transition {
    pub fn set_axes(x: impl Into<String>, y: impl Into<String>) -> Self {
        Transition::SetAxes {
            x: IndicatorName::new(x),
            y: IndicatorName::new(y),
        }
    }

    pub fn focus(entity: impl Into<String>) -> Self {
        Transition::FocusEntity(EntityId::new(entity))
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Transition::SelectYear(_) => "select_year",
            Transition::SelectAllYears => "select_all_years",
            Transition::FocusEntity(_) => "focus_entity",
            Transition::ClearFocus => "clear_focus",
            Transition::SetAxes { .. } => "set_axes",
        }
    }
}
