pub mod controller;
pub mod entities;
pub mod pricing;
pub mod summary;
pub mod validators;
pub mod worker;

pub use crate::controller::Calculator;
