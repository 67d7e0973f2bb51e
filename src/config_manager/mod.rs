pub mod credentials;
pub mod settings;
pub mod utils;

pub use settings::*;
