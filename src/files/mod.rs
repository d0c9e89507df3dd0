//! File operations module for MicroSnap
//!
//! This module provides the native save dialog used when exporting a deck.

pub mod dialogs;
