//! Place handlers - folding weather results into stored place state.

mod place_aggregator;

pub use place_aggregator::PlaceAggregator;
