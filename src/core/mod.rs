pub mod etl;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{LoadSummary, RankedScorer, TopScorersResponse, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ScorerSink, Storage};
pub use crate::utils::error::Result;
