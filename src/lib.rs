//! RemoSquash firmware library.
//!
//! IR remote-control emulator with a proximity trigger.  The library holds
//! everything the binary runs, so the same code is exercised by the host
//! tests against the simulated board in [`sim`].  ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod ir;
pub mod pins;
pub mod transport;

pub mod adapters;
pub mod drivers;
pub mod sensors;

#[cfg(not(target_os = "espidf"))]
pub mod sim;
