//! Satellite and ship positions over time, and which pairs are in range.
//!
//! `predict` turns TLE histories into geodetic positions and orbit traces,
//! `range` classifies pairs by geodesic surface distance, and `fleet` holds
//! the entities and the selection-driven simulation the CLI and web API use.

pub mod config;
pub mod fleet;
pub mod geo;
pub mod predict;
pub mod range;
pub mod web;

#[cfg(test)]
mod fixtures;
