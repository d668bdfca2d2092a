pub mod aggregate;
pub mod diff;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod settings;
pub mod stats;
