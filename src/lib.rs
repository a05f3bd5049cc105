pub use svschem_app as app;
pub use svschem_domain as domain;
pub use svschem_infra as infra;
pub use svschem_ui as ui;

pub mod error;
