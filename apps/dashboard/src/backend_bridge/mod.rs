//! Backend bridge: command definitions and the worker thread that owns the session.

pub mod commands;
pub mod runtime;
