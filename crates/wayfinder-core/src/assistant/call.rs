//! Model calls detached from the session that asked for them.

use std::sync::Arc;

use log::debug;

use crate::{client::ModelClient, error::Result, state::Effect};

/// A model request the state machine asked for, ready to send.
///
/// Sending needs no access to the [`Assistant`](super::Assistant), so a
/// caller sharing the session behind a lock can release it while the
/// request is in flight and hand the [`Completion`] back afterwards.
pub struct PendingCall {
    client: Arc<dyn ModelClient>,
    effect: Effect,
}

impl PendingCall {
    pub(crate) fn new(client: Arc<dyn ModelClient>, effect: Effect) -> Self {
        Self { client, effect }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Send the request and wait for the raw answer.
    pub async fn send(self) -> Completion {
        debug!(
            "send: {} for generation {}",
            self.effect.request.kind.as_str(),
            self.effect.generation
        );
        let result = self.client.generate(&self.effect.request).await;
        Completion {
            effect: self.effect,
            result,
        }
    }
}

/// The raw outcome of a [`PendingCall`], not yet applied to any state.
pub struct Completion {
    pub(crate) effect: Effect,
    pub(crate) result: Result<String>,
}

impl Completion {
    pub fn effect(&self) -> &Effect {
        &self.effect
    }
}
