pub mod pipeline;
pub mod task;

pub use pipeline::{Extraction, NovelEngine};
pub use task::ChapterTask;
