/// Lifecycle of a crawl engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Created, no crawl started
    #[default]
    Idle,

    /// Working through the pending queue
    Traversing,

    /// Queue drained (or crawl aborted); terminal
    Done,
}

impl EngineState {
    /// Returns true if the engine can move from this state to `next`
    ///
    /// The only legal path is `Idle -> Traversing -> Done`; `Traversing`
    /// repeats once per dequeued item.
    pub fn can_transition_to(&self, next: EngineState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Traversing)
                | (Self::Traversing, Self::Traversing)
                | (Self::Traversing, Self::Done)
        )
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
