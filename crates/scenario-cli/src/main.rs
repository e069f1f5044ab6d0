// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot scenario runner: seeds a fixture file into an in-memory
//! repository, reads a single event from stdin, and prints the matched
//! scenario's terminal action plus its accumulated cache as JSON.

mod fixture;

use anyhow::{Context, Result};
use clap::Parser;
use scenario_core::{ActionError, Envelope, ErrorCode, Value};
use scenario_engine::{
    extract_tenant_id, find_scenarios_by_event, ActionBus, PendingActions, ScenarioExecutor,
    ScenarioLoader, StepExecutor,
};
use scenario_placeholder::PlaceholderProcessor;
use scenario_store::InMemoryRepository;
use std::io::Read;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scenario-cli", about = "Run one event through a fixture's scenarios")]
struct Args {
    /// Path to a fixture JSON file (see fixture.rs for the shape).
    #[arg(long)]
    fixture: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let fixture_text = std::fs::read_to_string(&args.fixture)
        .with_context(|| format!("reading fixture file {}", args.fixture.display()))?;
    let fixture_data: fixture::FixtureFile =
        serde_json::from_str(&fixture_text).context("parsing fixture JSON")?;

    let repository = Arc::new(InMemoryRepository::new());
    fixture::load_into(&repository, fixture_data);

    let mut event_text = String::new();
    std::io::stdin().read_to_string(&mut event_text).context("reading event JSON from stdin")?;
    let event: Value = serde_json::from_str(&event_text).context("parsing event JSON")?;

    let Some(tenant_id) = extract_tenant_id(&event) else {
        anyhow::bail!("event carries no resolvable system.tenant_id");
    };

    let loader = ScenarioLoader::new(repository);
    let snapshot = loader.load_tenant_scenarios(tenant_id).await;
    let scenario_ids = find_scenarios_by_event(&event, &snapshot);

    let Some(scenario_id) = scenario_ids.first() else {
        println!(r#"{{"result": "no_match", "cache": {{}}}}"#);
        return Ok(());
    };
    let entry = &snapshot.scenario_index[scenario_id];

    let actions = Arc::new(echo_action_bus());
    let placeholders = Arc::new(PlaceholderProcessor::new(10));
    let step_executor = Arc::new(StepExecutor::new(actions, placeholders));
    let executor = ScenarioExecutor::new(step_executor);
    let pending = PendingActions::new();

    let (result, cache) = executor.execute_scenario(entry, event, &snapshot, &pending, &[]).await;

    let output = serde_json::json!({
        "scenario_id": scenario_id.0,
        "result": result,
        "cache": cache,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Every action name resolves to the same demo handler: echo the resolved
/// params back as `response_data` so a fixture's steps have something
/// observable to chain transitions off without a real backend to call.
fn echo_action_bus() -> ActionBus {
    let mut bus = ActionBus::new();
    bus.register(
        "echo",
        Arc::new(|data: Value| Envelope::success_with({
            let mut out = indexmap::IndexMap::new();
            out.insert("echoed".to_string(), data);
            out
        })),
    );
    bus.register(
        "fail",
        Arc::new(|_: Value| Envelope::error(ActionError::new(ErrorCode::InternalError, "fixture action 'fail'"))),
    );
    bus
}
