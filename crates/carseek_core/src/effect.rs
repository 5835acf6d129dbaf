use std::time::Duration;

use crate::{DebounceGeneration, RequestToken};

/// Work the runtime must perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<C> {
    /// Start (or restart) the debounce timer. A firing whose generation is
    /// no longer current must be delivered as a stale `DebounceElapsed` and
    /// will be ignored.
    ScheduleDebounce {
        generation: DebounceGeneration,
        after: Duration,
    },
    /// Drop the pending debounce timer, if any.
    CancelDebounce,
    /// Start the loading-visibility delay for `request`.
    ScheduleLoadingDelay {
        request: RequestToken,
        after: Duration,
    },
    /// Invoke the fetch function for `request` with `criteria`.
    StartFetch { request: RequestToken, criteria: C },
    /// Abort the superseded in-flight fetch `request`.
    AbortFetch { request: RequestToken },
}
