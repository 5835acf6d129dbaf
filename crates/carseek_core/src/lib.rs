//! Carseek core: pure search-coordination state machine and view helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{CoordinatorConfig, CoordinatorState, DebounceGeneration, RequestToken};
pub use update::update;
pub use view_model::SearchView;
