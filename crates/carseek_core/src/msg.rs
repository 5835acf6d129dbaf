use crate::{DebounceGeneration, RequestToken};

/// One input to the coordinator state machine.
///
/// `C` is the criteria snapshot type, `R` the fetch result type.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg<C, R> {
    /// The host observed a new criteria snapshot (reactive trigger).
    CriteriaChanged(C),
    /// The user explicitly asked for a search (e.g. pressed a Search button).
    SearchRequested {
        /// Show the loading state synchronously instead of after the delay.
        immediate: bool,
    },
    /// A debounce timer fired.
    DebounceElapsed { generation: DebounceGeneration },
    /// A loading-visibility delay timer fired.
    LoadingDelayElapsed { request: RequestToken },
    /// The fetch for `request` resolved.
    FetchSucceeded { request: RequestToken, result: R },
    /// The fetch for `request` rejected.
    FetchFailed { request: RequestToken, message: String },
    /// Drop all pending work and return to the initial state.
    Reset,
}
