//! Capability interface over a vendor's global tracking function.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tagstack_types::Params;

/// One invocation of a vendor's global function.
///
/// `gtag('event', 'purchase', {...})` is
/// `VendorCall { command: "event", target: Some("purchase"), params: Some({...}) }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCall {
    pub command: String,
    pub target: Option<String>,
    pub params: Option<Params>,
}

impl VendorCall {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            target: None,
            params: None,
        }
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }
}

/// Access to a vendor's global tracking function (`window.gtag`,
/// `window.fbq`, ...).
pub trait VendorClient: Send + Sync {
    /// Ensures a queueing stub exists so calls made before the vendor script
    /// loads are not lost.
    fn install(&self) -> Result<(), ClientError> {
        Ok(())
    }

    /// Invokes the vendor function.
    fn call(&self, call: VendorCall) -> Result<(), ClientError>;

    /// Drops the vendor function from the host.
    fn reset(&self) {}
}

/// Discards every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClient;

impl VendorClient for NoopClient {
    fn call(&self, _call: VendorCall) -> Result<(), ClientError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<VendorCall>,
    installs: usize,
    resets: usize,
    failing: bool,
}

/// Records every call in memory. Can be switched into a failing mode to
/// exercise error paths.
#[derive(Debug, Default)]
pub struct RecordingClient {
    state: Mutex<RecordingState>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// When set, `install` and `call` fail with [`ClientError::Rejected`].
    pub fn set_failing(&self, failing: bool) {
        self.state().failing = failing;
    }

    /// Every successful call, in order.
    pub fn calls(&self) -> Vec<VendorCall> {
        self.state().calls.clone()
    }

    /// Calls whose command equals `command`.
    pub fn calls_with_command(&self, command: &str) -> Vec<VendorCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.command == command)
            .cloned()
            .collect()
    }

    /// Targets of every call, in order (`None` targets are skipped).
    pub fn targets(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| c.target.clone())
            .collect()
    }

    pub fn install_count(&self) -> usize {
        self.state().installs
    }

    pub fn reset_count(&self) -> usize {
        self.state().resets
    }

    pub fn clear(&self) {
        self.state().calls.clear();
    }
}

impl VendorClient for RecordingClient {
    fn install(&self) -> Result<(), ClientError> {
        let mut state = self.state();
        if state.failing {
            return Err(ClientError::Rejected("install refused".into()));
        }
        state.installs += 1;
        Ok(())
    }

    fn call(&self, call: VendorCall) -> Result<(), ClientError> {
        let mut state = self.state();
        if state.failing {
            return Err(ClientError::Rejected(format!("{} refused", call.command)));
        }
        state.calls.push(call);
        Ok(())
    }

    fn reset(&self) {
        self.state().resets += 1;
    }
}
