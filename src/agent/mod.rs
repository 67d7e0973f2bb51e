pub mod agent_factory;
pub mod definition;
pub mod model;
pub mod tools;

pub use agent_factory::*;
pub use definition::*;
pub use model::*;
