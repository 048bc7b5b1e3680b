pub mod aggregate;
pub mod etl;
pub mod normalize;
pub mod rank;
pub mod transform;

pub use crate::domain::model::{RawRecord, ReportResult};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
