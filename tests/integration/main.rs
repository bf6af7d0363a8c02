//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below exercises the controller end to end against the
//! simulated board from `remosquash::sim`.  All tests run on the host with
//! no real hardware required.

#![cfg(not(target_os = "espidf"))]

mod fault_tests;
mod scenario_tests;
mod sized_protocol_tests;
mod support;
