pub use svschem_app as app;
pub use svschem_domain as domain;

pub mod adapters;
pub mod config;
