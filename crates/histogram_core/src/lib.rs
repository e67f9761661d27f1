//! Histogram core: word-frequency pipeline and the pure application state machine.
pub mod csv;
mod effect;
pub mod frequency;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use frequency::{
    tokenize, word_histogram, FrequencyMap, RankedEntry, RankedList, WordCount, DEFAULT_TOP_K,
};
pub use msg::Msg;
pub use state::{AppState, RequestId, Status, DEFAULT_SOURCE_URL};
pub use update::update;
pub use view_model::HistogramViewModel;
