//! Builder patterns for hint types

pub mod hints;
pub mod networks;

pub use hints::{nicr_of, ordered_address, RedemptionHintsBuilder};
pub use networks::{NetworkConfigBuilder, NetworkConfigBuilderError};
