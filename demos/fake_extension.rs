//! Full export against a simulated extension.
//!
//! Demonstrates:
//! - Binding a Driver and accepting an extension connection
//! - Running an Exporter with an in-memory store
//! - Reading back the export and the run log
//!
//! The "extension" is a WebSocket client in this process that keeps a few
//! tabs with linear histories and answers the same commands Firefox would.
//!
//! Usage:
//!   cargo run --example fake_extension
//!   cargo run --example fake_extension -- --debug
//!   cargo run --example fake_extension -- --dry-run --pretty

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::Args;
use tabs_hist_export::storage::{self, HAS_VISITED_OPTIONS_KEY, LOGS_KEY, OPTIONS_KEY};
use tabs_hist_export::{
    DirectorySink, Driver, Exporter, MemoryStore, Result, RunOptions, RunOutcome,
};

// ============================================================================
// Simulated Tabs
// ============================================================================

struct SimTab {
    id: u32,
    history: Vec<&'static str>,
    index: usize,
}

fn sim_tabs() -> Vec<SimTab> {
    vec![
        SimTab {
            id: 11,
            history: vec![
                "https://www.rust-lang.org/",
                "https://doc.rust-lang.org/book/",
                "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
            ],
            index: 1,
        },
        SimTab {
            id: 12,
            history: vec!["https://crates.io/", "https://crates.io/crates/tokio"],
            index: 1,
        },
        SimTab {
            id: 13,
            history: vec!["about:blank"],
            index: 0,
        },
    ]
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Fake extension export ===\n");

    // ========================================================================
    // Driver
    // ========================================================================

    println!("[1] Binding driver...");
    let driver = Driver::builder().port(0).build().await?;
    let url = driver.ws_url();
    println!("    ✓ Listening on {url}\n");

    let tabs = Arc::new(Mutex::new(sim_tabs()));
    let extension = tokio::spawn(simulate_extension(url, Arc::clone(&tabs)));

    let browser = driver.connect().await?;
    println!("[2] Extension connected (session {})\n", browser.session_id());

    // ========================================================================
    // Export
    // ========================================================================

    let store = MemoryStore::new();
    storage::save(&store, HAS_VISITED_OPTIONS_KEY, &true).await?;
    let options = RunOptions {
        debug: true,
        dry_run: args.dry_run,
        pretty_json: args.pretty,
        page_load_wait_ms: 50,
        ..RunOptions::default()
    };
    storage::save(&store, OPTIONS_KEY, &options).await?;

    let download_dir = std::env::temp_dir().join("tabs-hist-export-demo");
    let exporter = Exporter::new(
        browser.clone(),
        store,
        tabs_hist_export::TracingNotifier,
        DirectorySink::new(&download_dir),
    );

    println!("[3] Running export...");
    let outcome = exporter.run().await?;

    if let RunOutcome::Exported(report) = outcome {
        println!("    ✓ {} tabs, delivered to {:?}\n", report.dataset.len(), report.delivery);
        for (i, record) in report.dataset.records().iter().enumerate() {
            println!("    tab #{i}");
            for url in record.urls() {
                println!("        {url}");
            }
        }
    }

    // ========================================================================
    // Log
    // ========================================================================

    println!("\n[4] Run log:");
    let log: Vec<String> = storage::load(exporter.store(), LOGS_KEY, Vec::new())
        .await?
        .value;
    for line in log {
        println!("    {line}");
    }

    println!("\n[5] Tabs after the run:");
    for tab in tabs.lock().iter() {
        println!("    {} -> {}", tab.id, tab.history[tab.index]);
    }

    browser.close();
    extension.abort();
    Ok(())
}

// ============================================================================
// Extension Simulation
// ============================================================================

async fn simulate_extension(url: String, tabs: Arc<Mutex<Vec<SimTab>>>) {
    let Ok((mut ws, _)) = connect_async(url.as_str()).await else {
        eprintln!("[sim] cannot connect to {url}");
        return;
    };

    let ready = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "type": "success",
        "result": { "tabId": 11, "sessionId": 1 },
    });
    if ws.send(Message::Text(ready.to_string().into())).await.is_err() {
        return;
    }

    while let Some(Ok(Message::Text(text))) = ws.next().await {
        let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
            continue;
        };
        let reply = answer(&request, &tabs);
        if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
            break;
        }
    }
}

fn answer(request: &Value, tabs: &Mutex<Vec<SimTab>>) -> Value {
    let target = request["tabId"].as_u64().unwrap_or_default() as u32;
    let mut tabs = tabs.lock();

    let info = |tab: &SimTab| {
        json!({
            "tabId": tab.id,
            "url": tab.history[tab.index],
            "title": format!("Tab {}", tab.id),
            "status": "complete",
        })
    };

    let result = match request["method"].as_str().unwrap_or_default() {
        "tabs.query" => Some(json!({ "tabs": tabs.iter().map(info).collect::<Vec<_>>() })),
        "notifications.create" | "session.status" => Some(Value::Null),
        method => tabs.iter_mut().find(|t| t.id == target).map(|tab| {
            match method {
                "browsingContext.goBack" => tab.index = tab.index.saturating_sub(1),
                "browsingContext.goForward" if tab.index + 1 < tab.history.len() => tab.index += 1,
                _ => {}
            }
            info(&*tab)
        }),
    };

    match result {
        Some(result) => json!({ "id": request["id"], "type": "success", "result": result }),
        None => json!({
            "id": request["id"],
            "type": "error",
            "error": "no such tab",
            "message": format!("Invalid tab ID: {target}"),
        }),
    }
}
