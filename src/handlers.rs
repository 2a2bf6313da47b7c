pub mod charts;
pub mod health;
pub mod predictions;
pub mod sites;
pub mod statistics;
