use crate::{CoordinatorState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// The runtime feeds timer firings and fetch settlements back in as
/// messages; stale ones (superseded token, outdated debounce generation)
/// are ignored here, so correctness never depends on the runtime actually
/// cancelling anything.
pub fn update<C: PartialEq + Clone, R>(
    mut state: CoordinatorState<C, R>,
    msg: Msg<C, R>,
) -> (CoordinatorState<C, R>, Vec<Effect<C>>) {
    let effects = match msg {
        Msg::CriteriaChanged(criteria) => {
            let unchanged = !state.is_first_load() && !state.has_criteria_changed(&criteria);
            state.record_latest(criteria);
            if unchanged {
                // Identical to what was last applied; nothing to schedule.
                Vec::new()
            } else if state.is_first_load() || state.config().immediate {
                start_fetch(&mut state, false, false)
            } else {
                let generation = state.arm_debounce();
                let after = state.config().debounce;
                vec![Effect::ScheduleDebounce { generation, after }]
            }
        }
        Msg::DebounceElapsed { generation } => {
            if state.debounce_matches(generation) {
                state.disarm_debounce();
                start_fetch(&mut state, false, false)
            } else {
                Vec::new()
            }
        }
        Msg::SearchRequested { immediate } => {
            if !state.is_first_load() && !state.latest_differs_from_applied() {
                // Duplicate manual search for already-applied criteria.
                Vec::new()
            } else {
                let mut effects = Vec::new();
                if state.debounce_armed() {
                    state.disarm_debounce();
                    effects.push(Effect::CancelDebounce);
                }
                effects.extend(start_fetch(&mut state, true, immediate));
                effects
            }
        }
        Msg::LoadingDelayElapsed { request } => {
            if state.is_active(request) {
                state.show_loading();
            }
            Vec::new()
        }
        Msg::FetchSucceeded { request, result } => {
            state.settle_success(request, result);
            Vec::new()
        }
        Msg::FetchFailed { request, message } => {
            state.settle_failure(request, message);
            Vec::new()
        }
        Msg::Reset => {
            let mut effects = Vec::new();
            if state.debounce_armed() {
                state.disarm_debounce();
                effects.push(Effect::CancelDebounce);
            }
            if let Some(request) = state.active_token() {
                effects.push(Effect::AbortFetch { request });
            }
            state.clear();
            effects
        }
    };

    (state, effects)
}

/// Shared fetch-execution step for every trigger path. Supersedes any
/// in-flight request, then decides loading visibility: manual triggers,
/// the first load and explicit immediate requests show loading
/// synchronously; background fetches only after the configured delay.
fn start_fetch<C: PartialEq + Clone, R>(
    state: &mut CoordinatorState<C, R>,
    manual: bool,
    immediate_loading: bool,
) -> Vec<Effect<C>> {
    let Some(criteria) = state.latest_criteria().cloned() else {
        // No criteria snapshot has been seen yet; nothing to fetch.
        return Vec::new();
    };

    let mut effects = Vec::new();
    let (request, superseded) = state.begin_request(criteria.clone(), manual);
    if let Some(previous) = superseded {
        effects.push(Effect::AbortFetch { request: previous });
    }
    if immediate_loading || manual || state.is_first_load() {
        state.show_loading();
    } else {
        effects.push(Effect::ScheduleLoadingDelay {
            request,
            after: state.config().min_loading_delay,
        });
    }
    effects.push(Effect::StartFetch { request, criteria });
    effects
}
