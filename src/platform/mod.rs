//! Platform bindings. Browser implementations of the monitor's seams live
//! behind the `wasm` feature; the core stays platform-agnostic.

#[cfg(feature = "wasm")]
pub mod web;
