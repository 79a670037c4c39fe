pub mod labels;
pub mod notifier;
pub mod recognizer;
pub mod session_state;
pub mod speech;

pub use labels::SignLabel;
pub use notifier::SpeechNotifier;
pub use recognizer::{Detection, RandomRecognizer, Recognizer, RecognizerError};
pub use session_state::{Age, Session, SessionStore, SessionToken};
pub use speech::{CommandSpeaker, LogSpeaker, Speaker, SpeechError};

/// Work items accepted by the speech worker pool.
///
/// Each job is owned by exactly one worker. There is no reply channel: the
/// caller never learns whether the job ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Speak the given text aloud.
    SpeakText(String),
}
