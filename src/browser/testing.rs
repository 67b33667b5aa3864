//! In-process stand-in for the companion extension.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// A tab with a linear history.
#[derive(Debug, Clone)]
pub(crate) struct FakeTab {
    pub(crate) id: u32,
    pub(crate) current_window: bool,
    pub(crate) history: Vec<String>,
    pub(crate) index: usize,
}

impl FakeTab {
    pub(crate) fn new(id: u32, history: &[&str], index: usize) -> Self {
        Self {
            id,
            current_window: true,
            history: history.iter().map(|u| (*u).to_string()).collect(),
            index,
        }
    }

    pub(crate) fn in_other_window(mut self) -> Self {
        self.current_window = false;
        self
    }

    fn info(&self) -> Value {
        json!({
            "tabId": self.id,
            "url": self.history[self.index],
            "title": format!("Tab {}", self.id),
            "status": "complete",
        })
    }
}

#[derive(Default)]
struct FakeState {
    tabs: Vec<FakeTab>,
    notifications: Vec<(String, String, String)>,
}

/// WebSocket client that answers commands like the extension would.
pub(crate) struct FakeExtension {
    state: Arc<Mutex<FakeState>>,
    handle: JoinHandle<()>,
}

impl FakeExtension {
    /// Connects to `url`, sends READY and serves commands until closed.
    pub(crate) fn spawn(url: String, tab_id: u32, session_id: u32, tabs: Vec<FakeTab>) -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            tabs,
            ..FakeState::default()
        }));
        let handle = tokio::spawn(serve(url, tab_id, session_id, Arc::clone(&state)));
        Self { state, handle }
    }

    pub(crate) fn index(&self, id: u32) -> usize {
        self.state
            .lock()
            .tabs
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.index)
            .expect("fake tab")
    }

    pub(crate) fn notifications(&self) -> Vec<(String, String, String)> {
        self.state.lock().notifications.clone()
    }

    pub(crate) fn abort(&self) {
        self.handle.abort();
    }
}

async fn serve(url: String, tab_id: u32, session_id: u32, state: Arc<Mutex<FakeState>>) {
    let (mut ws, _) = connect_async(url.as_str()).await.expect("connect");

    let ready = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "type": "success",
        "result": { "tabId": tab_id, "sessionId": session_id },
    });
    ws.send(Message::Text(ready.to_string().into()))
        .await
        .expect("send READY");

    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let request: Value = serde_json::from_str(text.as_str()).expect("request JSON");
        let reply = answer(&request, session_id, &state);
        if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
            break;
        }
    }
}

fn answer(request: &Value, session_id: u32, state: &Mutex<FakeState>) -> Value {
    let id = request["id"].clone();
    let target = request["tabId"].as_u64().unwrap_or_default() as u32;
    let params = &request["params"];
    let mut state = state.lock();

    let result = match request["method"].as_str().unwrap_or_default() {
        "tabs.query" => {
            let current_only = params["currentWindow"].as_bool().unwrap_or(false);
            let tabs: Vec<Value> = state
                .tabs
                .iter()
                .filter(|t| !current_only || t.current_window)
                .map(FakeTab::info)
                .collect();
            Ok(json!({ "tabs": tabs }))
        }
        "tabs.activate" | "tabs.get" => find(&mut state, target).map(|t| t.info()),
        "browsingContext.goBack" => find(&mut state, target).map(|t| {
            t.index = t.index.saturating_sub(1);
            Value::Null
        }),
        "browsingContext.goForward" => find(&mut state, target).map(|t| {
            if t.index + 1 < t.history.len() {
                t.index += 1;
            }
            Value::Null
        }),
        "notifications.create" => {
            state.notifications.push((
                params["id"].as_str().unwrap_or_default().to_string(),
                params["title"].as_str().unwrap_or_default().to_string(),
                params["message"].as_str().unwrap_or_default().to_string(),
            ));
            Ok(Value::Null)
        }
        "session.status" => Ok(json!({ "sessionId": session_id })),
        other => Err(format!("unknown method {other}")),
    };

    match result {
        Ok(result) => json!({ "id": id, "type": "success", "result": result }),
        Err(message) => json!({
            "id": id,
            "type": "error",
            "error": "no such tab",
            "message": message,
        }),
    }
}

fn find(state: &mut FakeState, id: u32) -> std::result::Result<&mut FakeTab, String> {
    state
        .tabs
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| format!("Invalid tab ID: {id}"))
}
