pub mod requests;
pub mod settings;
