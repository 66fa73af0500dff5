pub mod analysis;
pub mod atmosphere;
pub mod configuration;
pub mod connection;
pub mod forecast;
pub mod location;
pub mod model;
pub mod prediction;
pub mod utilities;

pub use analysis::analyze_live_flight;
pub use model::calculate_balloon_performance;
pub use prediction::simulate::run_simulation;

lazy_static::lazy_static! {
    pub static ref DATETIME_FORMAT: String = "%Y-%m-%d %H:%M:%S".to_string();
}
