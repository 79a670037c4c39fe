use sign_assist_core::{Recognizer, SessionStore, SpeechNotifier};
use std::sync::Arc;

/// Shared handles passed to every handler. Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub recognizer: Arc<dyn Recognizer>,
    pub notifier: SpeechNotifier,
    /// Speak each detected sign on the server as well as returning it.
    pub speak_detections: bool,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn Recognizer>, notifier: SpeechNotifier) -> Self {
        Self {
            sessions: SessionStore::new(),
            recognizer,
            notifier,
            speak_detections: false,
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_speak_detections(mut self, enabled: bool) -> Self {
        self.speak_detections = enabled;
        self
    }
}
