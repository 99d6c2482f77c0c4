//! PDR Kernel: the deterministic data model shared by the encoder and the
//! PDR engine.
//!
//! # API surface
//!
//! - [`ternary`] — the three-valued logic domain ({0, 1, X}).
//! - [`cube`] — `Cube` and `TCube`, partial assignments over latch variables.
//! - [`oracle`] — the two traits this crate does *not* implement: the AIG
//!   network oracle and the SAT solver oracle. Everything above this line
//!   is pure data; everything below it is a contract an outer layer fills in.
//!
//! # Module dependency direction
//!
//! `ternary` ← `cube` ← `oracle`
//!
//! One-way only, no cycles. `oracle`'s traits are expressed in terms of
//! `cube` and `ternary` types but neither of those modules knows about
//! `oracle`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cube;
pub mod oracle;
pub mod ternary;
