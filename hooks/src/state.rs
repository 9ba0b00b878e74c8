use payloads::ErrorKind;

/// Which transition a [`RequestState`] went through last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing has run yet.
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// The `{loading, error, data}` triple a screen renders from.
///
/// A completed call writes exactly one of `error` or `data` and leaves the
/// other alone: a success does not clear an earlier error, and a failure
/// keeps the last good payload around.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub loading: bool,
    /// Message for the last failure.
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// Payload of the last success.
    pub data: Option<T>,
    pub phase: Phase,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            error_kind: None,
            data: None,
            phase: Phase::Idle,
        }
    }
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub(crate) fn start(&mut self) {
        self.loading = true;
        self.phase = Phase::Pending;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.loading = false;
        self.data = Some(data);
        self.phase = Phase::Succeeded;
    }

    pub(crate) fn fail(&mut self, kind: ErrorKind) {
        self.loading = false;
        self.error = Some(kind.message().to_string());
        self.error_kind = Some(kind);
        self.phase = Phase::Failed;
    }
}
