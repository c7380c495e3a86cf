//! Nim against an optimal computer opponent.
//!
//! The [board](crate::board::Board) holds heaps of tokens, the [strategy](crate::strategy)
//! picks the computer's reply using the nim-sum, and the
//! [turn controller](crate::controller::TurnController) alternates turns, keeps the score
//! and drives an external [renderer](crate::renderer::Renderer).

#![warn(missing_docs)]

pub mod board;
pub mod config;
pub mod controller;
pub mod drawing;
pub mod error;
pub mod impartial_game;
pub mod numeric;
pub mod random;
pub mod renderer;
pub mod schedule;
pub mod strategy;

mod display;
mod parsing;
