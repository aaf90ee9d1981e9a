#![no_std]

mod errors;
mod registry;
mod types;

pub use crate::errors::RegistryError;
pub use crate::registry::{TokenRegistry, TokenRegistryClient};
