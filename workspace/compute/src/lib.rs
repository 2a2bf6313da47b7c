pub mod charts;
pub mod context;
pub mod dataset;
pub mod error;
pub mod features;
pub mod predict;
pub mod regressor;
pub mod schema;
pub mod sites;
pub mod stats;

pub use context::{AppContext, ArtifactPaths};
pub use dataset::{Dataset, DatasetOptions};
pub use error::{ComputeError, Result};
pub use features::{build_feature_row, FeatureRow};
pub use predict::Prediction;
pub use regressor::{Regressor, RegressorModel};
pub use schema::ModelSchema;
pub use sites::{Site, SiteId, SiteIndex};
pub use stats::SummaryStatistics;
