use std::sync::Arc;

use carseek_core::{
    update, CoordinatorConfig, CoordinatorState, Effect, Msg, RequestToken, SearchView,
};
use search_logging::{search_debug, search_warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::fetch::SearchFetcher;

/// Handle to one running search coordinator.
///
/// The state machine itself lives on a dedicated tokio task; the handle
/// sends it commands and observes its view through a watch channel.
/// Dropping the last handle tears the task down, releasing all timers and
/// the in-flight fetch.
pub struct SearchCoordinator<C, R> {
    cmd_tx: mpsc::UnboundedSender<Command<C>>,
    view_rx: watch::Receiver<SearchView<R>>,
}

enum Command<C> {
    CriteriaChanged { criteria: C, done: oneshot::Sender<()> },
    Search { immediate: bool, done: oneshot::Sender<bool> },
    HasChanged { candidate: C, done: oneshot::Sender<bool> },
    Reset { done: oneshot::Sender<()> },
}

impl<C, R> SearchCoordinator<C, R>
where
    C: PartialEq + Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Spawns the coordinator actor on the current tokio runtime.
    pub fn spawn(fetcher: Arc<dyn SearchFetcher<C, R>>, config: CoordinatorConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let state = CoordinatorState::new(config);
        let (view_tx, view_rx) = watch::channel(state.view());
        let driver = Driver {
            state,
            fetcher,
            event_tx,
            view_tx,
            debounce: None,
            loading_delay: None,
            in_flight: None,
        };
        tokio::spawn(driver.run(cmd_rx, event_rx));
        Self { cmd_tx, view_rx }
    }

    /// Reactive trigger: the host observed a new criteria snapshot.
    /// Resolves once the coordinator has processed the change, not once
    /// any resulting fetch settles.
    pub async fn criteria_changed(&self, criteria: C) {
        let (done, ack) = oneshot::channel();
        if self
            .cmd_tx
            .send(Command::CriteriaChanged { criteria, done })
            .is_ok()
        {
            let _ = ack.await;
        }
    }

    /// Explicit user-initiated search. Returns whether a fetch was
    /// actually performed; `false` means the criteria were already
    /// applied. `immediate` forces the loading state to show
    /// synchronously.
    pub async fn search(&self, immediate: bool) -> bool {
        let (done, ack) = oneshot::channel();
        if self
            .cmd_tx
            .send(Command::Search { immediate, done })
            .is_err()
        {
            return false;
        }
        ack.await.unwrap_or(false)
    }

    /// The same comparison against the last applied criteria the
    /// coordinator uses internally.
    pub async fn has_filters_changed(&self, candidate: C) -> bool {
        let (done, ack) = oneshot::channel();
        if self
            .cmd_tx
            .send(Command::HasChanged { candidate, done })
            .is_err()
        {
            return false;
        }
        ack.await.unwrap_or(false)
    }

    /// Drops all pending work, aborts the in-flight fetch and restores the
    /// initial state, re-arming the first load.
    pub async fn reset(&self) {
        let (done, ack) = oneshot::channel();
        if self.cmd_tx.send(Command::Reset { done }).is_ok() {
            let _ = ack.await;
        }
    }

    /// The current view snapshot.
    pub fn snapshot(&self) -> SearchView<R> {
        self.view_rx.borrow().clone()
    }

    /// A receiver that observes published view transitions.
    pub fn subscribe(&self) -> watch::Receiver<SearchView<R>> {
        self.view_rx.clone()
    }
}

struct InFlight {
    request: RequestToken,
    cancel: CancellationToken,
}

struct Driver<C, R> {
    state: CoordinatorState<C, R>,
    fetcher: Arc<dyn SearchFetcher<C, R>>,
    event_tx: mpsc::UnboundedSender<Msg<C, R>>,
    view_tx: watch::Sender<SearchView<R>>,
    debounce: Option<JoinHandle<()>>,
    loading_delay: Option<JoinHandle<()>>,
    in_flight: Option<InFlight>,
}

impl<C, R> Driver<C, R>
where
    C: PartialEq + Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command<C>>,
        mut event_rx: mpsc::UnboundedReceiver<Msg<C, R>>,
    ) {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    // Every handle dropped: the owning context went away.
                    None => break,
                },
                Some(msg) = event_rx.recv() => {
                    self.apply(msg);
                }
            }
        }
        self.release();
    }

    fn handle_command(&mut self, cmd: Command<C>) {
        match cmd {
            Command::CriteriaChanged { criteria, done } => {
                self.apply(Msg::CriteriaChanged(criteria));
                let _ = done.send(());
            }
            Command::Search { immediate, done } => {
                let performed = self.apply(Msg::SearchRequested { immediate });
                let _ = done.send(performed);
            }
            Command::HasChanged { candidate, done } => {
                let _ = done.send(self.state.has_criteria_changed(&candidate));
            }
            Command::Reset { done } => {
                self.apply(Msg::Reset);
                let _ = done.send(());
            }
        }
    }

    /// Folds one message through the pure update function, executes the
    /// returned effects and publishes the new view. Returns whether a
    /// fetch was started.
    fn apply(&mut self, msg: Msg<C, R>) -> bool {
        if let Msg::FetchFailed { request, message } = &msg {
            search_warn!("fetch {} failed: {}", request, message);
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut fetch_started = false;
        for effect in effects {
            if matches!(effect, Effect::StartFetch { .. }) {
                fetch_started = true;
            }
            self.run_effect(effect);
        }
        self.view_tx.send_replace(self.state.view());
        fetch_started
    }

    fn run_effect(&mut self, effect: Effect<C>) {
        match effect {
            Effect::ScheduleDebounce { generation, after } => {
                if let Some(timer) = self.debounce.take() {
                    timer.abort();
                }
                let events = self.event_tx.clone();
                self.debounce = Some(tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(Msg::DebounceElapsed { generation });
                }));
            }
            Effect::CancelDebounce => {
                if let Some(timer) = self.debounce.take() {
                    timer.abort();
                }
            }
            Effect::ScheduleLoadingDelay { request, after } => {
                if let Some(timer) = self.loading_delay.take() {
                    timer.abort();
                }
                let events = self.event_tx.clone();
                self.loading_delay = Some(tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(Msg::LoadingDelayElapsed { request });
                }));
            }
            Effect::StartFetch { request, criteria } => {
                search_debug!("fetch {} started", request);
                let cancel = CancellationToken::new();
                let guard = cancel.clone();
                let events = self.event_tx.clone();
                let fetcher = Arc::clone(&self.fetcher);
                tokio::spawn(async move {
                    tokio::select! {
                        _ = guard.cancelled() => {}
                        outcome = fetcher.fetch(&criteria) => {
                            let msg = match outcome {
                                Ok(result) => Msg::FetchSucceeded { request, result },
                                Err(err) => Msg::FetchFailed {
                                    request,
                                    message: err.to_string(),
                                },
                            };
                            let _ = events.send(msg);
                        }
                    }
                });
                self.in_flight = Some(InFlight { request, cancel });
            }
            Effect::AbortFetch { request } => match self.in_flight.take() {
                Some(in_flight) if in_flight.request == request => {
                    search_debug!("fetch {} superseded", request);
                    in_flight.cancel.cancel();
                }
                other => self.in_flight = other,
            },
        }
    }

    /// Unconditional teardown on every exit path: no timer or fetch may
    /// outlive the owning context.
    fn release(&mut self) {
        if let Some(timer) = self.debounce.take() {
            timer.abort();
        }
        if let Some(timer) = self.loading_delay.take() {
            timer.abort();
        }
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}
