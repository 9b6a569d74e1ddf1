pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;

pub use errors::CoreError;
