//! Conquest engine library.
//!
//! Exposes the board model, combat and phase rules, the match engine, move
//! generation, and the line protocol for the binaries and integration tests.

pub mod board;
pub mod config;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod selection;
pub mod selfplay;
pub mod session;
