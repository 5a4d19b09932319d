//! Analista is a terminal guide for a Fourth Way self-observation diagnostic
//! run by an LLM.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the idle/loading/error state machine,
//!   the backend chat session, and configuration.
//! - [`ui`] segments and formats model replies into bubbles with clickable
//!   options, renders the screen, and runs the interactive event loop.
//! - [`api`] defines the chat-completions payloads sent to the backend.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
