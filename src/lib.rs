//! Decompression - nitrogen saturation, safe depth and the bends
//!
//! A tick-driven survival mechanic: diving deep fills a nitrogen buffer,
//! a full buffer pushes the safe depth down, and ascending above it (or
//! ascending too fast) hurts.

pub mod core;
pub mod dive;
pub mod simulation;
