// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use analytics_pipeline::backends::{SimulatedEngine, SimulatedUnit};
use analytics_pipeline::config::load_and_validate_config;
use analytics_pipeline::engine::EngineRuntime;
use analytics_pipeline::pipeline::PipelineInstance;
use anyhow::Context;
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_FRAMES: u64 = 30;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const LABELS: [&str; 3] = ["person", "vehicle", "bicycle"];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <config.yaml|config.toml> <request.json> [frames]", args[0]);
        eprintln!("Example: {} configs/pipelines.yaml configs/request.json 60", args[0]);
        std::process::exit(1);
    }

    let frames = match args.get(3).map(|arg| arg.parse::<u64>()).transpose() {
        Ok(frames) => frames.unwrap_or(DEFAULT_FRAMES),
        Err(e) => {
            eprintln!("❌ Invalid frame count '{}': {}", args[3], e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args[1], &args[2], frames).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// Run one pipeline end to end against the simulated engine.
async fn run(config_path: &str, request_path: &str, frames: u64) -> anyhow::Result<()> {
    let config = load_and_validate_config(config_path)?;

    let raw = std::fs::read_to_string(request_path)
        .with_context(|| format!("reading request {}", request_path))?;
    let request: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing request {}", request_path))?;
    let pipeline_type = request
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("request has no 'type'")?;
    let template = config
        .template(&pipeline_type)
        .cloned()
        .with_context(|| format!("no template registered for type '{}'", pipeline_type))?;

    let simulated = Arc::new(SimulatedEngine::new());
    let engine = EngineRuntime::global().initialize(simulated.clone())?;

    let pipeline = PipelineInstance::builder(Uuid::new_v4().to_string(), Arc::new(template), engine)
        .from_config(&config)
        .build();

    println!("🚀 Analytics Pipeline Demo");
    println!("═══════════════════════════");
    println!("📋 Configuration: {}", config_path);
    println!("🔧 Pipeline: {} ({})", pipeline.id(), pipeline_type);

    let worker = pipeline.start(request)?;
    let dispatch = worker.map(|worker| tokio::spawn(worker.run()));
    if let Some(reason) = pipeline.destination_error() {
        println!("⚠️  Destination unavailable: {}", reason);
    }

    let graph = simulated.last_graph().context("engine built no graph")?;
    for frame in 0..frames {
        let label = LABELS[(frame % LABELS.len() as u64) as usize];
        let objects = if frame % 4 == 3 {
            json!([])
        } else {
            json!([{"label": label, "confidence": 0.9, "frame": frame}])
        };
        graph.deliver(&SimulatedUnit::with_metadata(&json!({
            "timestamp": frame * FRAME_INTERVAL.as_millis() as u64,
            "objects": objects,
        })));
        tokio::time::sleep(FRAME_INTERVAL).await;
    }
    graph.end_of_stream();

    if let Some(handle) = dispatch {
        let stats = handle.await.context("dispatch worker panicked")?;
        println!(
            "📨 Dispatch: {} delivered, {} failed, {} dropped",
            stats.delivered, stats.failed, stats.dropped
        );
    }

    println!("\n📊 Status:");
    println!("{}", serde_json::to_string_pretty(&pipeline.status()?)?);
    println!("\n📝 Params:");
    println!("{}", serde_json::to_string_pretty(&pipeline.params()?)?);
    println!("\n🎞️  Frames processed: {}", pipeline.frame_count());

    EngineRuntime::global().shutdown();
    Ok(())
}
