use std::fmt;

/// Lifecycle of a generation run. `Completed` and `Failed` are at-rest
/// states: like `Idle`, they accept the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Completed,
    Failed,
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "IDLE",
            GenerationState::Generating => "GENERATING",
            GenerationState::Completed => "COMPLETED",
            GenerationState::Failed => "FAILED",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationState::Generating)
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
