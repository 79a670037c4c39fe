use crate::Command;
use crate::speech::Speaker;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Fire-and-forget front end for a [`Speaker`].
///
/// `speak` only enqueues a job and returns immediately. A fixed pool of worker
/// tasks drains the queue; each job runs on whichever worker picks it up, so
/// overlapping calls have no ordering guarantee. The queue is unbounded and
/// nothing reports back: speaker failures are logged and dropped, and jobs
/// still queued at shutdown are lost.
#[derive(Clone)]
pub struct SpeechNotifier {
    tx: mpsc::UnboundedSender<Command>,
}

impl SpeechNotifier {
    /// Starts `workers` tasks (at least one) on the current tokio runtime.
    pub fn spawn(speaker: Arc<dyn Speaker>, workers: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Command>();
        let rx = Arc::new(Mutex::new(rx));

        for id in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let speaker = Arc::clone(&speaker);
            tokio::spawn(async move {
                loop {
                    // Only the receive is under the lock, so other workers keep
                    // pulling jobs while this one speaks.
                    let job = rx.lock().await.recv().await;
                    match job {
                        Some(Command::SpeakText(text)) => {
                            if let Err(e) = speaker.speak(&text).await {
                                tracing::warn!(worker = id, "Speech failed: {}", e);
                            }
                        }
                        None => break,
                    }
                }
                tracing::debug!(worker = id, "Speech worker stopped");
            });
        }

        Self { tx }
    }

    /// Queues `text` to be spoken and returns without waiting.
    pub fn speak(&self, text: impl Into<String>) {
        if self.tx.send(Command::SpeakText(text.into())).is_err() {
            tracing::debug!("Speech workers are gone, dropping utterance");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{MockSpeaker, SpeechError};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_speak_delivers_text_to_speaker() {
        // --- 1. Arrange ---
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<String>();
        let mut mock_speaker = MockSpeaker::new();
        mock_speaker
            .expect_speak()
            .returning(move |text| {
                seen_tx.send(text.to_string()).unwrap();
                Box::pin(async move { Ok(()) })
            })
            .once();

        let notifier = SpeechNotifier::spawn(Arc::new(mock_speaker), 2);

        // --- 2. Act ---
        notifier.speak("Hello");

        // --- 3. Assert ---
        let spoken = timeout(Duration::from_secs(2), seen_rx.recv())
            .await
            .expect("speaker was not called in time");
        assert_eq!(spoken.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_speaker_failure_is_swallowed_and_pool_keeps_running() {
        // --- 1. Arrange ---
        // The first utterance fails, the second succeeds.
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<String>();
        let mut mock_speaker = MockSpeaker::new();
        let mut calls = 0;
        mock_speaker
            .expect_speak()
            .returning(move |text| {
                calls += 1;
                seen_tx.send(text.to_string()).unwrap();
                let fail = calls == 1;
                Box::pin(async move {
                    if fail {
                        Err(SpeechError::Launch {
                            program: "tts".to_string(),
                            source: std::io::Error::other("boom"),
                        })
                    } else {
                        Ok(())
                    }
                })
            })
            .times(2);

        // A single worker makes the two jobs run in order.
        let notifier = SpeechNotifier::spawn(Arc::new(mock_speaker), 1);

        // --- 2. Act ---
        notifier.speak("Water");
        notifier.speak("Food");

        // --- 3. Assert ---
        for expected in ["Water", "Food"] {
            let spoken = timeout(Duration::from_secs(2), seen_rx.recv())
                .await
                .expect("speaker was not called in time");
            assert_eq!(spoken.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_speak_returns_before_speaker_finishes() {
        // --- 1. Arrange ---
        // The speaker blocks until released, so a blocking `speak` would hang here.
        let release = Arc::new(tokio::sync::Notify::new());
        let waiter = Arc::clone(&release);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<()>();

        let mut mock_speaker = MockSpeaker::new();
        mock_speaker.expect_speak().returning(move |_text| {
            let waiter = Arc::clone(&waiter);
            let done_tx = done_tx.clone();
            Box::pin(async move {
                waiter.notified().await;
                done_tx.send(()).unwrap();
                Ok(())
            })
        });

        let notifier = SpeechNotifier::spawn(Arc::new(mock_speaker), 1);

        // --- 2. Act ---
        notifier.speak("Please");

        // --- 3. Assert ---
        assert!(
            done_rx.try_recv().is_err(),
            "speech should still be pending"
        );
        release.notify_one();
        timeout(Duration::from_secs(2), done_rx.recv())
            .await
            .expect("speaker did not finish after release");
    }
}
