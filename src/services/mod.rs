pub mod aggregator;
pub mod providers;

pub use aggregator::ListAggregator;
