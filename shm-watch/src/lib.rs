pub mod inspect;
pub mod models;

pub use inspect::{flag_names, frame_report, header_report, inspect, registry_report};
pub use models::*;
