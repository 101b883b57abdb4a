use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use textgen_demo::{
    Error, Result,
    client::{GenerationClient, GenerationRequest, GenerationResponse},
};
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<GenerationResponse>>;

/// Generation client whose calls stay pending until the test resolves them,
/// in any order.
#[derive(Debug, Default)]
pub struct ControlledClient {
    requests: Mutex<Vec<GenerationRequest>>,
    pending: Mutex<Vec<Option<Reply>>>,
}

impl ControlledClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Yields until at least `count` calls have been received.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    pub fn respond(&self, index: usize, body: Value) {
        self.reply(index, Ok(GenerationResponse::new(body)));
    }

    pub fn fail(&self, index: usize, msg: &str) {
        self.reply(index, Err(Error::internal(msg)));
    }

    fn reply(&self, index: usize, result: Result<GenerationResponse>) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("call already resolved");
        if sender.send(result).is_err() {
            panic!("caller went away");
        }
    }
}

#[async_trait]
impl GenerationClient for ControlledClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let (tx, rx) = oneshot::channel();
        self.requests.lock().unwrap().push(request);
        self.pending.lock().unwrap().push(Some(tx));

        rx.await
            .unwrap_or_else(|_| Err(Error::internal("reply dropped")))
    }
}

/// Generation client that answers at once, echoing the query as `output`.
#[derive(Debug, Default)]
pub struct EchoClient {
    requests: Mutex<Vec<GenerationRequest>>,
}

impl EchoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for EchoClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let output = request.query.clone();
        self.requests.lock().unwrap().push(request);
        Ok(GenerationResponse::new(serde_json::json!({ "output": output })))
    }
}
