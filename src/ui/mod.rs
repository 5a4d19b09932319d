//! Terminal UI layer for the diagnostic dialogue.
//!
//! Key submodules include:
//! - [`segment`] and [`inline`]: turn model text into line tokens and emphasis
//!   segments.
//! - [`bubble`], [`wrap`] and [`layout`]: message bubbles with clickable
//!   options, flattened into transcript rows.
//! - [`renderer`] and [`theme`]: frame composition and color policy.
//! - [`chat_loop`]: the interaction loop feeding input into
//!   [`crate::core::app`].

pub mod bubble;
pub mod chat_loop;
pub mod inline;
pub mod layout;
pub mod renderer;
pub mod segment;
pub mod theme;
pub mod wrap;
