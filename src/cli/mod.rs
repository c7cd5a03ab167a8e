//! CLI infrastructure for pursuit experiments
//!
//! This module provides the command-line interface for training, evaluating,
//! inspecting and exporting hunter experiments.

pub mod commands;
pub mod output;
