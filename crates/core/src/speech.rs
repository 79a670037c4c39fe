use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to launch TTS program '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TTS program '{program}' exited with {status}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
    },
}

// The `Speaker` trait hides the text-to-speech engine. Handlers never talk to
// it directly; they go through `SpeechNotifier`, which owns the speaker and
// runs it off the request path.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Speaker: Send + Sync {
    /// Speaks `text` and returns once the utterance has finished.
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Speaks by running an external TTS program (`espeak`, `say`, ...) with the
/// text as its final argument.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parses a command line such as `"espeak -s 150"` into program and
    /// leading arguments. Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| SpeechError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SpeechError::Exit {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Fallback used when no TTS program is configured: the utterance only shows
/// up in the logs.
#[derive(Debug, Clone, Default)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        tracing::info!(text, "Speaking");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_parsing() {
        let speaker = CommandSpeaker::from_command_line("  espeak -s 150 ").unwrap();
        assert_eq!(speaker.program(), "espeak");
        assert_eq!(speaker.args, vec!["-s".to_string(), "150".to_string()]);

        assert!(CommandSpeaker::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn test_missing_program_reports_launch_error() {
        let speaker = CommandSpeaker::new("definitely-not-a-tts-program-on-this-host");

        let result = speaker.speak("Hello").await;

        assert!(matches!(result, Err(SpeechError::Launch { .. })));
    }

    #[tokio::test]
    async fn test_log_speaker_always_succeeds() {
        assert!(LogSpeaker.speak("Thank You").await.is_ok());
    }
}
