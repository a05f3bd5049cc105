pub use svschem_domain as domain;

pub mod action;
pub mod args;
pub mod controller;
pub mod debounce;
pub mod effect;
pub mod message;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;
pub mod precondition;
pub mod scratch;
pub mod session;
