mod chart;
mod plot;
mod prediction;
mod site_picker;
mod stats;
mod view;

pub use view::Dashboard;
