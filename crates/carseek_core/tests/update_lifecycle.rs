use std::sync::Once;
use std::time::Duration;

use carseek_core::{update, CoordinatorConfig, CoordinatorState, Effect, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(search_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filters {
    price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Page(Vec<u32>);

type State = CoordinatorState<Filters, Page>;

fn filters(price: u32) -> Filters {
    Filters { price }
}

fn page(items: &[u32]) -> Page {
    Page(items.to_vec())
}

fn new_state() -> State {
    CoordinatorState::new(CoordinatorConfig::default())
}

fn settled(price: u32, items: &[u32]) -> State {
    let (state, _) = update(new_state(), Msg::CriteriaChanged(filters(price)));
    let (state, _) = update(
        state,
        Msg::FetchSucceeded {
            request: 1,
            result: page(items),
        },
    );
    state
}

#[test]
fn success_settles_state() {
    init_logging();
    let (state, _) = update(new_state(), Msg::CriteriaChanged(filters(100)));

    let (state, effects) = update(
        state,
        Msg::FetchSucceeded {
            request: 1,
            result: page(&[1, 2]),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.data, Some(page(&[1, 2])));
    assert_eq!(view.error, None);
    assert!(!view.is_loading);
    assert!(!view.is_manual);
    assert!(!view.is_first_load);
    assert!(!state.has_criteria_changed(&filters(100)));
    assert!(state.has_criteria_changed(&filters(101)));
}

#[test]
fn failure_keeps_data_and_allows_retry() {
    init_logging();
    let state = settled(100, &[1]);
    let (state, _) = update(state, Msg::CriteriaChanged(filters(200)));
    let (state, _) = update(state, Msg::DebounceElapsed { generation: 1 });

    let (state, effects) = update(
        state,
        Msg::FetchFailed {
            request: 2,
            message: "http status 500: Internal Server Error".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(
        view.error.as_deref(),
        Some("http status 500: Internal Server Error")
    );
    // Stale results remain visible alongside the error.
    assert_eq!(view.data, Some(page(&[1])));
    assert!(!view.is_loading);

    // The failed criteria were never applied, so a manual retry runs.
    let (state, effects) = update(state, Msg::SearchRequested { immediate: true });
    assert_eq!(
        effects,
        vec![Effect::StartFetch {
            request: 3,
            criteria: filters(200),
        }]
    );
    let view = state.view();
    assert!(view.is_loading);
    assert_eq!(view.error, None);
}

#[test]
fn superseded_settlement_is_ignored() {
    init_logging();
    let (state, _) = update(new_state(), Msg::CriteriaChanged(filters(100)));
    let (state, _) = update(state, Msg::CriteriaChanged(filters(200)));

    // Request 1 settles after request 2 superseded it; whichever way it
    // settles, state must not move.
    let (state, effects) = update(
        state.clone(),
        Msg::FetchSucceeded {
            request: 1,
            result: page(&[9]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().data, None);
    assert!(state.view().is_loading);

    let (state, effects) = update(
        state,
        Msg::FetchFailed {
            request: 1,
            message: "timeout".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().error, None);

    // Request 2 is still the active one.
    let (state, _) = update(
        state,
        Msg::FetchSucceeded {
            request: 2,
            result: page(&[2]),
        },
    );
    assert_eq!(state.view().data, Some(page(&[2])));
    assert!(!state.view().is_loading);
}

#[test]
fn loading_delay_flips_loading_while_request_is_active() {
    init_logging();
    let state = settled(100, &[1]);
    let (state, _) = update(state, Msg::CriteriaChanged(filters(200)));
    let (state, _) = update(state, Msg::DebounceElapsed { generation: 1 });
    assert!(!state.view().is_loading);

    let (state, effects) = update(state, Msg::LoadingDelayElapsed { request: 2 });

    assert!(effects.is_empty());
    assert!(state.view().is_loading);
}

#[test]
fn loading_delay_after_settlement_is_ignored() {
    init_logging();
    let state = settled(100, &[1]);
    let (state, _) = update(state, Msg::CriteriaChanged(filters(200)));
    let (state, _) = update(state, Msg::DebounceElapsed { generation: 1 });
    let (state, _) = update(
        state,
        Msg::FetchSucceeded {
            request: 2,
            result: page(&[2]),
        },
    );

    // The fetch resolved before the delay; its late firing must not
    // produce a loading flash.
    let (next, effects) = update(state.clone(), Msg::LoadingDelayElapsed { request: 2 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.view().is_loading);
}

#[test]
fn reset_clears_state_and_pending_work() {
    init_logging();
    let state = settled(100, &[1]);
    let (state, _) = update(state, Msg::CriteriaChanged(filters(200)));
    let (state, _) = update(state, Msg::DebounceElapsed { generation: 1 });
    let (state, _) = update(state, Msg::CriteriaChanged(filters(300)));

    // Request 2 is in flight and a debounce for the 300 snapshot is armed.
    let (state, effects) = update(state, Msg::Reset);

    assert_eq!(
        effects,
        vec![Effect::CancelDebounce, Effect::AbortFetch { request: 2 }]
    );
    let view = state.view();
    assert_eq!(view.data, None);
    assert_eq!(view.error, None);
    assert!(!view.is_loading);
    assert!(view.is_first_load);

    // Settlements of discarded work stay stale after the reset.
    let (state, effects) = update(
        state,
        Msg::FetchSucceeded {
            request: 2,
            result: page(&[2]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().data, None);

    // The next criteria change is a first load again.
    let (_, effects) = update(state, Msg::CriteriaChanged(filters(400)));
    assert_eq!(
        effects,
        vec![Effect::StartFetch {
            request: 3,
            criteria: filters(400),
        }]
    );
}
