pub mod assistant;
pub mod cors;
pub mod logging;
