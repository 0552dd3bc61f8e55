//! Mortality reports for one province: load the death records and municipal
//! boundaries once, then compute grouped counts, the map join and the
//! missing-value audit behind each dashboard tab.
pub mod aggregate;
pub mod cli;
pub mod error;
pub mod geography;
pub mod geojoin;
pub mod loader;
pub mod logging;
pub mod output;
pub mod quality;
pub mod registry;
pub mod reports;
pub mod table;
pub mod types;
pub mod util;
