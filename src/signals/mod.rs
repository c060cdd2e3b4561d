//! Core node abstractions.
//!
//! This module provides the pieces every other module builds on:
//! - `Synthesize` trait for the per-kind synthesis behaviour
//! - `UnitGenerator` for cursor, duration and per-tick caching
//! - `Node` handles that let one generator feed several parents
//! - `Operand` for inputs that are fixed or node-driven
//! - `Tick` identifiers and arithmetic operators over nodes

mod generator;
mod operand;
mod ops;
mod tick;

pub use generator::{Block, Context, IntoNode, Node, Synthesize, UnitGenerator};
pub use operand::{Operand, Resolved};
pub use tick::Tick;
