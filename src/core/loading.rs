//! Submission gate for the conversation.
//!
//! One enumerated state with an explicit transition table. The state machine
//! only knows about events; it is up to [`crate::core::app`] to feed it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingEvent {
    /// A non-empty outgoing text was accepted for sending.
    Submit,
    ReplyReceived,
    RequestFailed,
}

/// Returned when an event is not allowed from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedTransition {
    pub from: LoadingState,
    pub event: LoadingEvent,
}

impl fmt::Display for RejectedTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not allowed while {:?}", self.event, self.from)
    }
}

impl std::error::Error for RejectedTransition {}

impl LoadingState {
    /// Next state for `event`, or `None` when the table has no entry.
    pub fn next(self, event: LoadingEvent) -> Option<LoadingState> {
        use LoadingEvent::*;
        use LoadingState::*;
        match (self, event) {
            (Idle | Error, Submit) => Some(Loading),
            (Loading, ReplyReceived) => Some(Idle),
            (Loading, RequestFailed) => Some(Error),
            _ => None,
        }
    }

    /// Apply `event` in place. On rejection the state is left untouched.
    pub fn apply(&mut self, event: LoadingEvent) -> Result<LoadingState, RejectedTransition> {
        match self.next(event) {
            Some(next) => {
                *self = next;
                Ok(next)
            }
            None => Err(RejectedTransition { from: *self, event }),
        }
    }

    pub fn is_loading(self) -> bool {
        self == LoadingState::Loading
    }

    /// Whether `text` may be sent right now.
    pub fn accepts(self, text: &str) -> bool {
        !self.is_loading() && !text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::LoadingEvent::*;
    use super::LoadingState::*;
    use super::*;

    #[test]
    fn transition_table_is_complete() {
        let table = [
            (Idle, Submit, Some(Loading)),
            (Idle, ReplyReceived, None),
            (Idle, RequestFailed, None),
            (Loading, Submit, None),
            (Loading, ReplyReceived, Some(Idle)),
            (Loading, RequestFailed, Some(Error)),
            (Error, Submit, Some(Loading)),
            (Error, ReplyReceived, None),
            (Error, RequestFailed, None),
        ];
        for (from, event, expected) in table {
            assert_eq!(from.next(event), expected, "{from:?} + {event:?}");
        }
    }

    #[test]
    fn rejected_events_leave_state_unchanged() {
        let mut state = Loading;
        let err = state.apply(Submit).expect_err("double submit");
        assert_eq!(err.from, Loading);
        assert_eq!(state, Loading);
    }

    #[test]
    fn error_recovers_through_a_new_submit() {
        let mut state = Idle;
        state.apply(Submit).unwrap();
        state.apply(RequestFailed).unwrap();
        assert_eq!(state, Error);
        state.apply(Submit).unwrap();
        state.apply(ReplyReceived).unwrap();
        assert_eq!(state, Idle);
    }

    #[test]
    fn gate_rejects_blank_text_and_busy_state() {
        assert!(Idle.accepts("Ana"));
        assert!(Error.accepts("Ana"));
        assert!(!Idle.accepts("   "));
        assert!(!Loading.accepts("Ana"));
    }
}
