// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-tool session state.
//
// Each tool owns one `ToolSession`. Runs are tagged with the generation that
// was current when they started; a result that arrives after the user has
// moved on (new file, new request, reset) is dropped instead of displayed.

use quickconv_core::error::Result;
use quickconv_core::human_errors::{HumanError, humanize_error};
use quickconv_core::types::SourceFile;
use quickconv_core::QuickconvError;
use quickconv_image::{ArtifactStore, DisplayUrl, EncodedArtifact};
use tracing::{debug, info, warn};

/// Where a tool is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    Idle,
    FileSelected,
    Processing,
    Ready,
    Failed(HumanError),
}

impl ToolState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FileSelected => "file-selected",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Monotonic run counter. Only results carrying the current value are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum ToolEvent {
    FileChosen(SourceFile),
    TransformRequested,
    ResultReady {
        generation: Generation,
        artifact: EncodedArtifact,
    },
    ErrorRaised {
        generation: Generation,
        error: QuickconvError,
    },
    Reset,
}

/// A run that has been started but not finished.
#[derive(Debug, Clone)]
pub struct PendingRun {
    pub generation: Generation,
    pub source: SourceFile,
}

/// State for one tool: the chosen file, the displayed result, and the run
/// generation.
#[derive(Debug)]
pub struct ToolSession {
    tool: &'static str,
    state: ToolState,
    generation: Generation,
    source: Option<SourceFile>,
    display: Option<DisplayUrl>,
    store: ArtifactStore,
}

impl ToolSession {
    pub fn new(tool: &'static str, store: ArtifactStore) -> Self {
        Self {
            tool,
            state: ToolState::Idle,
            generation: Generation::default(),
            source: None,
            display: None,
            store,
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// The published result, while in `Ready`.
    pub fn display(&self) -> Option<&DisplayUrl> {
        self.display.as_ref()
    }

    /// Feed one event through the state machine. Returns `false` when the
    /// event was ignored (stale result, or a request with no file chosen).
    pub fn apply(&mut self, event: ToolEvent) -> bool {
        match event {
            ToolEvent::FileChosen(file) => {
                info!(tool = self.tool, name = %file.name, "file chosen");
                self.generation = self.generation.next();
                self.source = Some(file);
                self.display = None;
                self.transition(ToolState::FileSelected);
                true
            }
            ToolEvent::TransformRequested => {
                if self.source.is_none() {
                    warn!(tool = self.tool, "transform requested with no file chosen");
                    return false;
                }
                self.generation = self.generation.next();
                self.transition(ToolState::Processing);
                true
            }
            ToolEvent::ResultReady {
                generation,
                artifact,
            } => {
                if !self.is_current(generation) {
                    return false;
                }
                // Replacing the handle revokes the previous one.
                self.display = Some(self.store.publish(artifact));
                self.transition(ToolState::Ready);
                true
            }
            ToolEvent::ErrorRaised { generation, error } => {
                if !self.is_current(generation) {
                    return false;
                }
                warn!(tool = self.tool, error = %error, "tool failed");
                self.display = None;
                self.transition(ToolState::Failed(humanize_error(&error)));
                true
            }
            ToolEvent::Reset => {
                self.generation = self.generation.next();
                self.source = None;
                self.display = None;
                self.transition(ToolState::Idle);
                true
            }
        }
    }

    /// Start a run over the chosen file. `None` if there is no file.
    pub fn begin(&mut self) -> Option<PendingRun> {
        if !self.apply(ToolEvent::TransformRequested) {
            return None;
        }
        let source = self.source.clone()?;
        Some(PendingRun {
            generation: self.generation,
            source,
        })
    }

    /// Deliver the outcome of a run started with [`begin`](Self::begin).
    pub fn finish(&mut self, generation: Generation, outcome: Result<EncodedArtifact>) -> bool {
        match outcome {
            Ok(artifact) => self.apply(ToolEvent::ResultReady {
                generation,
                artifact,
            }),
            Err(error) => self.apply(ToolEvent::ErrorRaised { generation, error }),
        }
    }

    /// Run `job` over the chosen file on the blocking pool and deliver its
    /// outcome. Returns the session state after delivery.
    pub async fn run<F>(&mut self, job: F) -> &ToolState
    where
        F: FnOnce(SourceFile) -> Result<EncodedArtifact> + Send + 'static,
    {
        let Some(pending) = self.begin() else {
            return &self.state;
        };
        let outcome = execute(pending.source, job).await;
        self.finish(pending.generation, outcome);
        &self.state
    }

    fn is_current(&self, generation: Generation) -> bool {
        if generation == self.generation {
            return true;
        }
        warn!(
            tool = self.tool,
            stale = generation.0,
            current = self.generation.0,
            "discarding stale result"
        );
        false
    }

    fn transition(&mut self, next: ToolState) {
        debug!(tool = self.tool, from = self.state.name(), to = next.name(), "state change");
        self.state = next;
    }
}

/// Run a pipeline job on tokio's blocking pool.
pub async fn execute<F>(source: SourceFile, job: F) -> Result<EncodedArtifact>
where
    F: FnOnce(SourceFile) -> Result<EncodedArtifact> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || job(source)).await {
        Ok(outcome) => outcome,
        Err(err) => Err(QuickconvError::EncodeFailed(format!("worker stopped: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickconv_core::types::MimeType;

    fn file(name: &str) -> SourceFile {
        SourceFile::new(name, vec![1, 2, 3])
    }

    fn artifact(tag: u8) -> EncodedArtifact {
        EncodedArtifact::new(vec![tag], MimeType::Png)
    }

    #[test]
    fn happy_path() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        assert_eq!(session.state(), &ToolState::Idle);

        session.apply(ToolEvent::FileChosen(file("a.png")));
        assert_eq!(session.state(), &ToolState::FileSelected);

        let run = session.begin().unwrap();
        assert_eq!(session.state(), &ToolState::Processing);

        assert!(session.finish(run.generation, Ok(artifact(1))));
        assert_eq!(session.state(), &ToolState::Ready);
        assert_eq!(session.display().unwrap().artifact().bytes, vec![1]);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn request_without_file_is_ignored() {
        let mut session = ToolSession::new("test", ArtifactStore::new());
        assert!(session.begin().is_none());
        assert_eq!(session.state(), &ToolState::Idle);
    }

    #[test]
    fn stale_result_after_new_file_is_dropped() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));
        let first = session.begin().unwrap();

        session.apply(ToolEvent::FileChosen(file("b.png")));
        assert!(!session.finish(first.generation, Ok(artifact(1))));

        assert_eq!(session.state(), &ToolState::FileSelected);
        assert!(session.display().is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn only_the_latest_request_wins() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));
        let first = session.begin().unwrap();
        let second = session.begin().unwrap();

        assert!(session.finish(second.generation, Ok(artifact(2))));
        assert!(!session.finish(first.generation, Ok(artifact(1))));
        assert_eq!(session.display().unwrap().artifact().bytes, vec![2]);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn new_result_revokes_previous_display() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));

        let run = session.begin().unwrap();
        session.finish(run.generation, Ok(artifact(1)));
        let old_url = session.display().unwrap().url().to_owned();

        let run = session.begin().unwrap();
        session.finish(run.generation, Ok(artifact(2)));

        assert!(store.resolve(&old_url).is_none());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn errors_carry_a_specific_message() {
        let mut session = ToolSession::new("test", ArtifactStore::new());
        session.apply(ToolEvent::FileChosen(file("a.png")));
        let run = session.begin().unwrap();
        session.finish(run.generation, Err(QuickconvError::InvalidQuality(2.0)));

        match session.state() {
            ToolState::Failed(human) => {
                assert_eq!(human, &humanize_error(&QuickconvError::InvalidQuality(2.0)));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn reset_releases_everything() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));
        let run = session.begin().unwrap();
        session.finish(run.generation, Ok(artifact(1)));

        session.apply(ToolEvent::Reset);
        assert_eq!(session.state(), &ToolState::Idle);
        assert!(session.begin().is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn dropping_the_session_releases_its_display() {
        let store = ArtifactStore::new();
        {
            let mut session = ToolSession::new("test", store.clone());
            session.apply(ToolEvent::FileChosen(file("a.png")));
            let run = session.begin().unwrap();
            session.finish(run.generation, Ok(artifact(1)));
            assert_eq!(store.live_count(), 1);
        }
        assert_eq!(store.live_count(), 0);
    }

    #[tokio::test]
    async fn run_offloads_and_publishes() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));

        let state = session
            .run(|source| Ok(EncodedArtifact::new(source.bytes, MimeType::Png)))
            .await;
        assert_eq!(state, &ToolState::Ready);
        assert_eq!(session.display().unwrap().artifact().bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn concurrent_runs_keep_only_the_latest() {
        let store = ArtifactStore::new();
        let mut session = ToolSession::new("test", store.clone());
        session.apply(ToolEvent::FileChosen(file("a.png")));

        let first = session.begin().unwrap();
        let slow = tokio::spawn(execute(first.source, |_| Ok(artifact(1))));

        session.apply(ToolEvent::FileChosen(file("b.png")));
        let second = session.begin().unwrap();
        let fast = execute(second.source, |_| Ok(artifact(2))).await;
        assert!(session.finish(second.generation, fast));

        let late = slow.await.unwrap();
        assert!(!session.finish(first.generation, late));
        assert_eq!(session.display().unwrap().artifact().bytes, vec![2]);
        assert_eq!(store.live_count(), 1);
    }

    #[tokio::test]
    async fn failing_job_ends_in_failed() {
        let mut session = ToolSession::new("test", ArtifactStore::new());
        session.apply(ToolEvent::FileChosen(file("a.png")));
        let state = session
            .run(|_| Err(QuickconvError::DecodeFailed("truncated".into())))
            .await;
        assert!(matches!(state, ToolState::Failed(_)));
    }
}
