pub mod config;
pub mod effects;
pub mod error;
pub mod logging;
pub mod page;
pub mod throttle;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;
