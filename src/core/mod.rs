//! This module constitutes the core, headless, and host-agnostic multi-cursor
//! editing engine of erax. It manages the cursor collection, the command
//! executor that turns per-cursor commands into one atomic buffer edit, the
//! cursors controller that wraps every user intent in a transaction, and the
//! rope-backed reference buffer with its tracked ranges and undo history.

pub mod auto_closed;
pub mod buffer;
pub mod command;
pub mod commands;
pub mod controller;
pub mod coordinates;
pub mod cursor_collection;
pub mod cursor_state;
pub mod edit_operation;
pub mod error;
pub mod events;
pub mod executor;
pub mod id;
pub mod marker;
pub mod model;
pub mod position;
pub mod selection;
pub mod type_operations;
pub mod undo_group;
pub mod utf8;
