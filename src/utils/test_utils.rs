use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::app::App;
use crate::core::backend::{BackendError, ChatBackend, Reply};
use crate::core::session::ChatSession;
use crate::ui::theme::Theme;

pub fn create_test_app() -> App {
    let session = ChatSession::new("Eres un analista.", "test-model", 0.7);
    App::new(session, Theme::dark(), "test-model · api.test")
}

/// Backend answering from a script: `Ok` replies in order, `Err` fails.
/// Running out of script is a failure too.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, String>>>,
    /// `(committed turns, text)` for every call.
    calls: Mutex<Vec<(usize, String)>>,
}

impl ScriptedBackend {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<&'static str, &'static str>>,
    {
        let script = script
            .into_iter()
            .map(|step| step.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, session: &ChatSession, text: &str) -> Result<Reply, BackendError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((session.turns().len(), text.to_string()));
        let step = self.script.lock().expect("script lock").pop_front();
        match step {
            Some(Ok(text)) => Ok(Reply { text }),
            Some(Err(message)) => Err(BackendError::Stream(message)),
            None => Err(BackendError::Stream("script exhausted".to_string())),
        }
    }
}
