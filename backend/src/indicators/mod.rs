// Technical indicators module
// Moving averages and daily returns over a daily close series

pub mod engine;
pub mod moving_averages;
pub mod returns;

pub use engine::{IndicatorEngine, Indicators};
pub use moving_averages::SMA;
pub use returns::DailyReturn;
