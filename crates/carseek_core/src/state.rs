use std::time::Duration;

use crate::view_model::SearchView;

/// Identifies one fetch attempt. At most one token is active at a time;
/// settlement of a superseded token must never mutate state.
pub type RequestToken = u64;

/// Identifies one scheduling of the debounce timer. Only the most recent
/// generation may trigger a fetch when its timer fires.
pub type DebounceGeneration = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Quiet period required after a criteria change before fetching.
    pub debounce: Duration,
    /// How long a background fetch may run before the loading state
    /// becomes visible.
    pub min_loading_delay: Duration,
    /// Skip the debounce and fetch on every criteria change.
    pub immediate: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_loading_delay: Duration::from_millis(150),
            immediate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveRequest<C> {
    token: RequestToken,
    criteria: C,
}

/// The coordinator's complete state. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorState<C, R> {
    config: CoordinatorConfig,
    data: Option<R>,
    error: Option<String>,
    loading: bool,
    manual_trigger: bool,
    first_load: bool,
    latest: Option<C>,
    last_applied: Option<C>,
    active: Option<ActiveRequest<C>>,
    next_token: RequestToken,
    debounce_generation: DebounceGeneration,
    debounce_armed: bool,
}

impl<C, R> CoordinatorState<C, R> {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            data: None,
            error: None,
            loading: false,
            manual_trigger: false,
            first_load: true,
            latest: None,
            last_applied: None,
            active: None,
            next_token: 0,
            debounce_generation: 0,
            debounce_armed: false,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn is_first_load(&self) -> bool {
        self.first_load
    }

    pub(crate) fn record_latest(&mut self, criteria: C) {
        self.latest = Some(criteria);
    }

    pub(crate) fn latest_criteria(&self) -> Option<&C> {
        self.latest.as_ref()
    }

    pub(crate) fn arm_debounce(&mut self) -> DebounceGeneration {
        self.debounce_generation += 1;
        self.debounce_armed = true;
        self.debounce_generation
    }

    pub(crate) fn disarm_debounce(&mut self) {
        self.debounce_armed = false;
    }

    pub(crate) fn debounce_armed(&self) -> bool {
        self.debounce_armed
    }

    pub(crate) fn debounce_matches(&self, generation: DebounceGeneration) -> bool {
        self.debounce_armed && generation == self.debounce_generation
    }

    /// Invalidates any in-flight request and makes `criteria` the active
    /// fetch. Returns the new token and the superseded one, if any.
    pub(crate) fn begin_request(
        &mut self,
        criteria: C,
        manual: bool,
    ) -> (RequestToken, Option<RequestToken>) {
        let superseded = self.active.take().map(|active| active.token);
        self.next_token += 1;
        let token = self.next_token;
        self.active = Some(ActiveRequest { token, criteria });
        self.error = None;
        self.manual_trigger = manual;
        (token, superseded)
    }

    pub(crate) fn show_loading(&mut self) {
        self.loading = true;
    }

    pub(crate) fn is_active(&self, token: RequestToken) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.token == token)
    }

    pub(crate) fn active_token(&self) -> Option<RequestToken> {
        self.active.as_ref().map(|active| active.token)
    }

    /// Applies a successful settlement for `token`. Returns `false` without
    /// touching state when the token has been superseded.
    pub(crate) fn settle_success(&mut self, token: RequestToken, result: R) -> bool {
        match self.active.take() {
            Some(active) if active.token == token => {
                self.data = Some(result);
                self.last_applied = Some(active.criteria);
                self.error = None;
                self.loading = false;
                self.manual_trigger = false;
                self.first_load = false;
                true
            }
            stale => {
                self.active = stale;
                false
            }
        }
    }

    /// Applies a failed settlement for `token`. The previous `data` is kept
    /// and `last_applied` is not advanced, so a manual retry still counts as
    /// a criteria change. Returns `false` for superseded tokens.
    pub(crate) fn settle_failure(&mut self, token: RequestToken, message: String) -> bool {
        match self.active.take() {
            Some(active) if active.token == token => {
                self.error = Some(message);
                self.loading = false;
                self.manual_trigger = false;
                self.first_load = false;
                true
            }
            stale => {
                self.active = stale;
                false
            }
        }
    }

    /// Restores the initial state. Token and generation counters keep
    /// counting so settlements of work discarded by the reset stay stale.
    pub(crate) fn clear(&mut self) {
        self.data = None;
        self.error = None;
        self.loading = false;
        self.manual_trigger = false;
        self.first_load = true;
        self.latest = None;
        self.last_applied = None;
        self.active = None;
        self.debounce_armed = false;
    }
}

impl<C: PartialEq, R> CoordinatorState<C, R> {
    /// The same comparison against the last applied criteria the
    /// coordinator uses internally.
    pub fn has_criteria_changed(&self, candidate: &C) -> bool {
        self.last_applied.as_ref() != Some(candidate)
    }

    pub(crate) fn latest_differs_from_applied(&self) -> bool {
        match (&self.latest, &self.last_applied) {
            (Some(latest), Some(applied)) => latest != applied,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl<C, R: Clone> CoordinatorState<C, R> {
    pub fn view(&self) -> SearchView<R> {
        SearchView {
            data: self.data.clone(),
            is_loading: self.loading,
            is_manual: self.manual_trigger,
            error: self.error.clone(),
            is_first_load: self.first_load,
        }
    }
}

impl<C, R> Default for CoordinatorState<C, R> {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}
