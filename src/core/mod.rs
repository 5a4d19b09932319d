//! Domain state for the diagnostic conversation.
//!
//! [`app`] holds the action reducer the UI loop drives. The remaining modules
//! are the pieces it coordinates: the visible [`conversation`], the backend
//! [`session`] and its [`backend`] transport, and the [`loading`] state
//! machine.

pub mod app;
pub mod backend;
pub mod chat_stream;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod loading;
pub mod message;
pub mod session;
