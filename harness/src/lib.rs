//! PDR Harness: toy collaborators for exercising `pdr-engine` end to end.
//!
//! The harness does not implement PDR logic — it delegates entirely to
//! `pdr-engine`. It supplies the two collaborators the engine is generic
//! over: [`toy_sat::ToySatSolver`] (a [`SatSolver`](pdr_kernel::oracle::SatSolver))
//! and [`toy_network::ToyNetwork`] (a [`NetworkOracle`](pdr_kernel::oracle::NetworkOracle)),
//! in the spirit of the `worlds/` fixtures in
//! `examples/darianrosebrook-sterling-native/harness/src/worlds/`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod toy_network;
pub mod toy_sat;
