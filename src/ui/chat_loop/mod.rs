//! Interactive terminal session.
//!
//! The loop owns the terminal and funnels key presses, mouse events and
//! backend completions into [`AppAction`](crate::core::app::AppAction)s that
//! are applied one at a time to the shared [`App`].

mod event_loop;
pub mod keybindings;
pub mod lifecycle;
mod modes;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

pub use event_loop::run_chat;

/// Shared, lockable handle to the application state.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
