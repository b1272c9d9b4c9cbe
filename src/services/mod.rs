// Service exports
pub mod artifacts;
pub mod model;
pub mod reference;

pub use artifacts::{ArtifactError, ModelContext};
pub use model::{ForestModel, LinearModel, ModelError, PriceModel, RegressionTree, Regressor, TreeNode};
pub use reference::{ReferenceDataset, ReferenceError};
