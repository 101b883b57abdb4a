//! State behind the generation form and its "Generate" action.
//!
//! Requests may overlap. Each one takes a ticket when it is issued, and the
//! [`DisplayPolicy`] decides whether its result may overwrite what is shown.

use crate::{
    Result,
    client::{
        GenerationClient, GenerationOptions, GenerationRequest, GenerationResponse, Length, Tone,
    },
};
use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::watch,
    task::JoinSet,
};
use tracing::{debug, info, warn};

pub const DEFAULT_QUERY: &str = "Write a short blog about intermittent fasting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPolicy {
    /// Only the most recently issued request may update the display.
    #[default]
    LatestIssued,
    /// Whichever response resolves last wins, regardless of issue order.
    LastResolved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub query: String,
    pub tone: Tone,
    pub length: Length,
    pub output: String,
    pub error: Option<String>,
    in_flight: usize,
    issued: u64,
}

impl PanelState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Ticket of the most recently issued request, 0 before the first one.
    pub fn latest_ticket(&self) -> u64 {
        self.issued
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            tone: Tone::default(),
            length: Length::Short,
            output: String::new(),
            error: None,
            in_flight: 0,
            issued: 0,
        }
    }
}

/// A finished generation and whether it made it onto the display.
#[derive(Debug, Clone)]
pub struct Generation {
    pub ticket: u64,
    pub response: GenerationResponse,
    pub displayed: bool,
}

pub struct GenerationPanel {
    client: Arc<dyn GenerationClient>,
    policy: DisplayPolicy,
    state: watch::Sender<PanelState>,
}

impl GenerationPanel {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self::with_policy(client, DisplayPolicy::default())
    }

    pub fn with_policy(client: Arc<dyn GenerationClient>, policy: DisplayPolicy) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        Self {
            client,
            policy,
            state,
        }
    }

    pub fn policy(&self) -> DisplayPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Receives a fresh copy of the state on every change.
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.subscribe()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|state| state.query = query);
    }

    pub fn set_tone(&self, tone: Tone) {
        self.state.send_modify(|state| state.tone = tone);
    }

    pub fn set_length(&self, length: Length) {
        self.state.send_modify(|state| state.length = length);
    }

    /// Sends the current query with the current tone and length.
    ///
    /// A failure never touches `output`; it is recorded in `error` under the
    /// same display policy as a success and returned to the caller. The
    /// loading flag is released either way.
    pub async fn generate(&self) -> Result<Generation> {
        self.run(None).await
    }

    /// Replaces the query and generates from it in one step, so overlapping
    /// submissions cannot pick up each other's text.
    pub async fn submit(&self, query: impl Into<String>) -> Result<Generation> {
        self.run(Some(query.into())).await
    }

    /// Submits every non-blank line from `reader` without waiting for earlier
    /// generations. Finished tasks are reaped as input arrives; results show
    /// up through the panel state. Returns the number of prompts submitted.
    pub async fn submit_lines<R>(self: &Arc<Self>, reader: R) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut pending = JoinSet::new();
        let mut submitted = 0;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let query = line.trim().to_string();
                    if query.is_empty() {
                        continue;
                    }
                    let panel = Arc::clone(self);
                    // Failures are already recorded in the panel's error field
                    pending.spawn(async move {
                        let _ = panel.submit(query).await;
                    });
                    submitted += 1;
                }
                Some(_) = pending.join_next(), if !pending.is_empty() => {}
            }
        }

        while pending.join_next().await.is_some() {}
        Ok(submitted)
    }

    async fn run(&self, query: Option<String>) -> Result<Generation> {
        let mut ticket = 0;
        let mut request = GenerationRequest::new(String::new(), GenerationOptions::default());
        self.state.send_modify(|state| {
            if let Some(query) = query {
                state.query = query;
            }
            state.issued += 1;
            state.in_flight += 1;
            ticket = state.issued;
            request = GenerationRequest::new(
                state.query.clone(),
                GenerationOptions::new(state.tone, state.length),
            );
        });

        debug!("Issued generation ticket {}", ticket);
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };
        let result = self.client.generate(request).await;

        let mut displayed = false;
        guard.release_with(|state| {
            displayed = match self.policy {
                DisplayPolicy::LatestIssued => ticket == state.issued,
                DisplayPolicy::LastResolved => true,
            };
            if !displayed {
                return;
            }
            match &result {
                Ok(response) => {
                    state.output = response.display_text();
                    state.error = None;
                }
                Err(e) => state.error = Some(e.to_string()),
            }
        });

        match result {
            Ok(response) => {
                if displayed {
                    info!("Generation {} displayed", ticket);
                } else {
                    debug!("Generation {} superseded, response discarded", ticket);
                }
                Ok(Generation {
                    ticket,
                    response,
                    displayed,
                })
            }
            Err(e) => {
                warn!("Generation {} failed: {}", ticket, e);
                Err(e)
            }
        }
    }
}

/// Holds one unit of `in_flight` until released, or until dropped if the
/// generation future is cancelled mid-request.
struct InFlight<'a> {
    state: &'a watch::Sender<PanelState>,
    armed: bool,
}

impl InFlight<'_> {
    fn release_with(mut self, update: impl FnOnce(&mut PanelState)) {
        self.armed = false;
        self.state.send_modify(|state| {
            state.in_flight -= 1;
            update(state);
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|state| state.in_flight -= 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedClient {
        result: Mutex<Option<Result<GenerationResponse>>>,
    }

    impl FixedClient {
        fn ok(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Ok(GenerationResponse::new(body)))),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Err(Error::internal(msg)))),
            })
        }
    }

    #[async_trait]
    impl GenerationClient for FixedClient {
        async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse> {
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::internal("called twice")))
        }
    }

    #[test]
    fn test_initial_state() {
        let panel = GenerationPanel::new(FixedClient::ok(json!({})));
        let state = panel.snapshot();

        assert_eq!(state.query, DEFAULT_QUERY);
        assert_eq!(state.tone, Tone::Friendly);
        assert_eq!(state.length, Length::Short);
        assert_eq!(state.output, "");
        assert!(!state.loading());
        assert_eq!(state.latest_ticket(), 0);
    }

    #[tokio::test]
    async fn test_success_sets_output_and_clears_loading() {
        let panel = GenerationPanel::new(FixedClient::ok(json!({"output": "hello"})));

        let generation = panel.generate().await.unwrap();
        let state = panel.snapshot();

        assert_eq!(generation.ticket, 1);
        assert!(generation.displayed);
        assert_eq!(state.output, "hello");
        assert_eq!(state.error, None);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_failure_leaves_output_and_records_error() {
        let panel = GenerationPanel::new(FixedClient::failing("connection refused"));

        let err = panel.generate().await.unwrap_err();
        let state = panel.snapshot();

        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(state.output, "");
        assert_eq!(
            state.error.as_deref(),
            Some("Internal error: connection refused")
        );
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_subscriber_sees_output_change() {
        let panel = GenerationPanel::new(FixedClient::ok(json!({"status": "ok"})));
        let mut rx = panel.subscribe();

        panel.generate().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().output, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_submit_replaces_query() {
        let panel = GenerationPanel::new(FixedClient::ok(json!({"output": "done"})));

        panel.submit("List three fruits").await.unwrap();

        assert_eq!(panel.snapshot().query, "List three fruits");
    }
}
