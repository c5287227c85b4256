// Single-use approval gate: Pending -> {Approved, Rejected}, both terminal.
// No timeout; a gate may wait on the user indefinitely. Repeated resolution
// signals must not release the payload a second time, regardless of what
// the UI layer does.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome<T> {
    // First approval releases the payload, exactly once.
    Approved(T),
    Rejected,
    // Any resolution signal after the first.
    AlreadyResolved,
}

pub struct ConfirmationGate<T> {
    prompt: String,
    payload: Option<T>,
    state: GateState,
}

impl<T> ConfirmationGate<T> {
    pub fn new(prompt: impl Into<String>, payload: T) -> Self {
        Self {
            prompt: prompt.into(),
            payload: Some(payload),
            state: GateState::Pending,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state != GateState::Pending
    }

    pub fn resolve(&mut self, approved: bool) -> GateOutcome<T> {
        if self.is_resolved() {
            return GateOutcome::AlreadyResolved;
        }

        if approved {
            self.state = GateState::Approved;
            match self.payload.take() {
                Some(payload) => GateOutcome::Approved(payload),
                // payload is always present while Pending
                None => GateOutcome::AlreadyResolved,
            }
        } else {
            self.state = GateState::Rejected;
            self.payload = None;
            GateOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_releases_payload_once() {
        let mut gate = ConfirmationGate::new("Proceed?", vec!["cmd-a", "cmd-b"]);
        assert_eq!(gate.state(), GateState::Pending);

        match gate.resolve(true) {
            GateOutcome::Approved(commands) => assert_eq!(commands.len(), 2),
            other => panic!("expected approval, got {:?}", other),
        }
        assert_eq!(gate.state(), GateState::Approved);

        // Simulated rapid double-click: the second signal releases nothing.
        assert_eq!(gate.resolve(true), GateOutcome::AlreadyResolved);
        assert_eq!(gate.resolve(false), GateOutcome::AlreadyResolved);
    }

    #[test]
    fn rejection_is_terminal() {
        let mut gate = ConfirmationGate::new("Proceed?", vec!["cmd-a"]);
        assert_eq!(gate.resolve(false), GateOutcome::Rejected);
        assert_eq!(gate.state(), GateState::Rejected);

        // A later approval must not resurrect the batch.
        assert_eq!(gate.resolve(true), GateOutcome::AlreadyResolved);
    }

    #[test]
    fn prompt_is_preserved() {
        let gate = ConfirmationGate::new("Delete everything?", ());
        assert_eq!(gate.prompt(), "Delete everything?");
        assert!(!gate.is_resolved());
    }
}
