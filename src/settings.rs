/// How far arc consistency propagates before search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Standard AC-3: whenever a domain shrinks, requeue every arc pointing at it.
    #[default]
    Full,

    /// Revise each initial arc once and stop. This is incomplete and only exists for
    /// benchmarking against full propagation.
    SinglePass,
}

/// Knobs for a single fill attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillSettings {
    pub propagation: Propagation,

    /// Give up after trying this many candidate words, reporting `FillFailure::SearchExhausted`
    /// rather than `FillFailure::Unsatisfiable`. `None` searches exhaustively.
    pub max_states: Option<u64>,
}

impl FillSettings {
    pub fn with_propagation(mut self, propagation: Propagation) -> FillSettings {
        self.propagation = propagation;
        self
    }

    pub fn with_max_states(mut self, max_states: u64) -> FillSettings {
        self.max_states = Some(max_states);
        self
    }
}
