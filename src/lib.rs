//! Core library for minimizerd, a background daemon that minimizes or
//! restores the windows of selected processes via global hotkeys.
//!
//! The two load-bearing pieces are [`hotkey::keys`], the pure
//! translation from abstract key combinations to Win32 hotkey codes,
//! and [`resolver`], the snapshot-based mapping from process names to
//! visible top-level window handles. Everything else is thin plumbing
//! around them: settings, window actions, startup registration, and
//! the hotkey registry's message pump.

pub mod actions;
pub mod config;
pub mod hotkey;
pub mod lifecycle;
pub mod resolver;
pub mod startup;
