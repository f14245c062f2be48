/// Counters for a single engine run
///
/// The search only ever increments these; nothing it decides reads them.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Telemetry {
    terminal_evaluations: u64,
    prune_events: u64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_terminal(&mut self) {
        self.terminal_evaluations += 1;
    }

    pub(crate) fn record_prune(&mut self) {
        self.prune_events += 1;
    }

    /// Base-case returns seen so far
    pub fn terminal_evaluations(&self) -> u64 {
        self.terminal_evaluations
    }

    /// Cutoffs that skipped at least one sibling
    pub fn prune_events(&self) -> u64 {
        self.prune_events
    }
}
