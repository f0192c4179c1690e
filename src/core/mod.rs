pub mod automap;
pub mod classify;
pub mod ctor;
pub mod defaults;
pub mod error;
pub mod expression;
pub mod registry;
pub mod tree;
pub mod types;
pub mod walker;
