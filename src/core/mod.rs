//! # Core Application Logic
//!
//! This module contains the dashboard's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (view models)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • classify() (display) │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │      TUI adapter        │
//!                    │ (ratatui, runs effects  │
//!                    │  against ManagerApi)    │
//!                    └─────────────────────────┘
//! ```
//!
//! `config` and `export` are the exceptions: they touch the file system and
//! are called from the binary and the effect runner, never from `update()`.
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all view state in one place
//! - [`action`]: The `Action` and `Effect` enums and `update()`
//! - [`classify`]: Message → display model
//! - [`browser`], [`commands`], [`todos`], [`overview`], [`files`],
//!   [`settings_editor`]: per-tab view state

pub mod action;
pub mod browser;
pub mod classify;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod export;
pub mod files;
pub mod overview;
pub mod path;
pub mod settings_editor;
pub mod state;
pub mod stats;
pub mod todos;
