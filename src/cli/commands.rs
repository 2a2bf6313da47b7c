pub mod predict;
pub mod serve;
pub mod sites;
pub mod stats;

pub use predict::predict;
pub use serve::serve;
pub use sites::list_sites;
pub use stats::describe;
