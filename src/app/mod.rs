//! Application core: command vocabulary, events, ports and the controller.
//!
//! Everything here talks to hardware only through `embedded-hal` traits and
//! the port traits in [`ports`], so the whole layer runs unchanged against
//! the simulated board in [`crate::sim`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
