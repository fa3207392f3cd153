use av_client::ClientError;

/// Request lifecycle for one job kind.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPhase<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> JobPhase<T> {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            JobPhase::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Per-job-kind result store.
///
/// `begin` hands out a monotonically increasing sequence number for each
/// submission; only the completion carrying the latest in-flight number may
/// settle the store. When two submissions race, the older response is
/// ignored no matter the arrival order.
///
/// Submitting clears the previous result immediately, so a stale batch
/// never renders next to the busy indicator.
#[derive(Debug)]
pub struct ResultStore<T> {
    phase: JobPhase<T>,
    next_seq: u64,
    inflight: Option<u64>,
}

impl<T> Default for ResultStore<T> {
    fn default() -> Self {
        Self {
            phase: JobPhase::Idle,
            next_seq: 0,
            inflight: None,
        }
    }
}

impl<T> ResultStore<T> {
    pub fn phase(&self) -> &JobPhase<T> {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, JobPhase::Pending)
    }

    pub fn result(&self) -> Option<&T> {
        match &self.phase {
            JobPhase::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            JobPhase::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Transition to `Pending` and return the submission's sequence number.
    pub fn begin(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.inflight = Some(seq);
        self.phase = JobPhase::Pending;
        seq
    }

    /// Apply a completion. Returns `true` when it was the latest in-flight
    /// submission and the store settled; `false` when it was superseded.
    pub fn complete(&mut self, seq: u64, outcome: Result<T, ClientError>) -> bool {
        if self.inflight != Some(seq) {
            return false;
        }
        self.inflight = None;
        self.phase = match outcome {
            Ok(value) => JobPhase::Succeeded(value),
            Err(e) => JobPhase::Failed(e.to_string()),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let store: ResultStore<String> = ResultStore::default();
        assert_eq!(*store.phase(), JobPhase::Idle);
    }

    #[test]
    fn test_success_path() {
        let mut store = ResultStore::default();
        let seq = store.begin();
        assert!(store.is_pending());
        assert!(store.complete(seq, Ok("batch-1".to_string())));
        assert_eq!(store.result(), Some(&"batch-1".to_string()));
    }

    #[test]
    fn test_backend_detail_round_trip() {
        let mut store: ResultStore<String> = ResultStore::default();
        let seq = store.begin();
        store.complete(seq, Err(ClientError::Backend("out of memory".into())));
        assert_eq!(store.error(), Some("out of memory"));
    }

    #[test]
    fn test_racing_submissions_last_wins() {
        let mut store = ResultStore::default();

        let a = store.begin();
        let b = store.begin();

        // B's (newer) response arrives first and settles the store
        assert!(store.complete(b, Ok("from-b".to_string())));
        // A's slow response straggles in afterwards and is ignored
        assert!(!store.complete(a, Ok("from-a".to_string())));

        assert_eq!(store.result(), Some(&"from-b".to_string()));
    }

    #[test]
    fn test_stale_completion_never_clobbers_pending() {
        let mut store: ResultStore<String> = ResultStore::default();
        let a = store.begin();
        let _b = store.begin();

        assert!(!store.complete(a, Err(ClientError::Transport("timeout".into()))));
        assert!(store.is_pending());
    }

    #[test]
    fn test_resubmit_clears_previous_result() {
        let mut store = ResultStore::default();
        let seq = store.begin();
        store.complete(seq, Ok("first".to_string()));

        store.begin();
        assert!(store.is_pending());
        assert_eq!(store.result(), None);
    }

    #[test]
    fn test_resubmit_after_failure() {
        let mut store: ResultStore<String> = ResultStore::default();
        let seq = store.begin();
        store.complete(seq, Err(ClientError::Transport("unreachable".into())));
        assert!(store.error().is_some());

        store.begin();
        assert!(store.is_pending());
        assert_eq!(store.error(), None);
    }
}
