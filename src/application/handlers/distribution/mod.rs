//! Distribution handlers - per-user sensor views.

mod update_distributor;

pub use update_distributor::{DistributionStores, UpdateDistributor};
