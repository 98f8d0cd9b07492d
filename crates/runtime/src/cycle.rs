use serde::{Deserialize, Serialize};

/// Index of one validate-mutate-derive-render pass.
///
/// Cycle 0 is the initial paint. Like the rest of the runtime this carries no
/// wall-clock time, so a session can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cycle {
    pub index: u64,
}

impl Cycle {
    pub fn initial() -> Self {
        Self { index: 0 }
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
        }
    }
}
