use foundation::{EntityId, Year};
use layers::symbology::Fill;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawCommand {
    Caption(String),
    Region {
        entity: EntityId,
        fill: Fill,
        highlighted: bool,
    },
    Dot {
        entity: EntityId,
        x: f64,
        y: f64,
        year: Year,
        color: [f32; 4],
    },
    LegendEntry {
        entity: EntityId,
        color: [f32; 4],
    },
}

/// Retained list of drawn elements, replaced wholesale on every paint.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn regions(&self) -> impl Iterator<Item = (&EntityId, &Fill, bool)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Region {
                entity,
                fill,
                highlighted,
            } => Some((entity, fill, *highlighted)),
            _ => None,
        })
    }

    pub fn dots(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Dot { .. }))
    }
}
