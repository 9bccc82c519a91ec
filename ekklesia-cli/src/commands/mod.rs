//! CLI command implementations.

pub mod lid;
pub mod settings;

pub use lid::{decode_lid, encode_lid, new_lids};
pub use settings::show_settings;
