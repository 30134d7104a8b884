//! CLI module for the Jacobi solver

pub mod commands;
pub mod format;
