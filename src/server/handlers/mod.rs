mod analyze;
mod health;

pub use analyze::analyze_handler;
pub use health::health_handler;
