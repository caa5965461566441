// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One pipeline instance: setup, lifecycle and reporting.
//!
//! # Locking
//! `lifecycle` guards state, launch data, stop time, the graph handle and the
//! dispatch queue. Every check-then-act on those runs under it. Engine calls
//! that may report events synchronously (`set_state`) run after the lock is
//! released, on a handle taken from it.
//!
//! `throughput` is a separate lock shared with the [`FrameProcessor`]. When
//! both are held, `lifecycle` is taken first.
//!
//! # Teardown
//! End-of-stream, `stop()` and a refused `PLAYING` all funnel into
//! one teardown routine, which takes the graph handle out of the lifecycle.
//! Whichever path takes it first sets the graph to `NULL` and records the stop
//! time. The others find nothing to release.

use crate::config::consts::TAGS_PROPERTY;
use crate::config::{DispatchOptions, PipelineTemplate, ServiceConfig};
use crate::destinations::DefaultDestinationFactory;
use crate::dispatch::{DispatchQueue, DispatchStats, DispatchWorker};
use crate::errors::PipelineError;
use crate::observability::messages::dispatch::DestinationUnavailable;
use crate::observability::messages::lifecycle::{
    DescriptionRendered, ElementNotFound, EngineErrorReported, GraphReleased,
    GraphTeardownFailed, PipelineStarting, StartFailed, StateTransition,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::frame::Throughput;
use crate::pipeline::{
    element_bindings, render, resolve_request, FrameProcessor, PipelineParams, PipelineRequest,
    PipelineState, PipelineStatus, Trigger,
};
use crate::traits::{
    DestinationFactory, Engine, EventOrigin, FlowReturn, Graph, GraphEvent, GraphState,
    ProcessedUnit,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::{Arc, Weak};
use std::time::Instant;

/// Wall-clock time for reporting, monotonic time for durations.
#[derive(Debug, Clone, Copy)]
struct Timestamp {
    wall: DateTime<Utc>,
    mono: Instant,
}

impl Timestamp {
    fn now() -> Self {
        Self {
            wall: Utc::now(),
            mono: Instant::now(),
        }
    }
}

/// Immutable once `start` succeeds.
#[derive(Debug)]
struct Launch {
    request: PipelineRequest,
    description: String,
    started: Timestamp,
}

#[derive(Default)]
struct Lifecycle {
    state: PipelineState,
    /// A `start` call is between its claim and its outcome.
    starting: bool,
    launch: Option<Arc<Launch>>,
    stopped: Option<Timestamp>,
    graph: Option<Arc<dyn Graph>>,
    dispatch: Option<DispatchQueue>,
    destination_error: Option<String>,
}

impl Lifecycle {
    fn apply(&mut self, trigger: Trigger) -> Option<(PipelineState, PipelineState)> {
        // A released graph can no longer start running.
        if trigger == Trigger::Playing && self.stopped.is_some() {
            return None;
        }
        let from = self.state;
        let to = from.on(trigger)?;
        self.state = to;
        Some((from, to))
    }
}

struct Shared {
    id: String,
    template: Arc<PipelineTemplate>,
    engine: Arc<dyn Engine>,
    destinations: Arc<dyn DestinationFactory>,
    models: Value,
    dispatch: DispatchOptions,
    lifecycle: Mutex<Lifecycle>,
    throughput: Arc<Mutex<Throughput>>,
}

/// Everything `start` assembles before the graph is handed to the engine.
struct Prepared {
    request: PipelineRequest,
    description: String,
    graph: Arc<dyn Graph>,
    dispatch: Option<DispatchQueue>,
    worker: Option<DispatchWorker>,
    destination_error: Option<String>,
}

/// A single analytics pipeline.
///
/// Cheap to clone; clones share the same instance. Engine callbacks only hold
/// weak references, so dropping every clone lets the instance go.
///
/// # Example
/// ```rust
/// use analytics_pipeline::backends::SimulatedEngine;
/// use analytics_pipeline::config::PipelineTemplate;
/// use analytics_pipeline::pipeline::{PipelineInstance, PipelineState};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let template = PipelineTemplate::new("passthrough", "src uri={source[uri]} ! appsink name=appsink");
/// let engine = Arc::new(SimulatedEngine::new());
/// let pipeline = PipelineInstance::builder("1", Arc::new(template), engine.clone()).build();
///
/// pipeline.start(json!({"source": {"uri": "file:///clip.mp4"}})).unwrap();
/// assert_eq!(pipeline.state(), PipelineState::Running);
///
/// engine.last_graph().unwrap().end_of_stream();
/// assert_eq!(pipeline.state(), PipelineState::Completed);
/// ```
#[derive(Clone)]
pub struct PipelineInstance {
    shared: Arc<Shared>,
}

/// Configures a [`PipelineInstance`].
pub struct PipelineBuilder {
    id: String,
    template: Arc<PipelineTemplate>,
    engine: Arc<dyn Engine>,
    destinations: Arc<dyn DestinationFactory>,
    models: Value,
    dispatch: DispatchOptions,
}

impl PipelineBuilder {
    /// Model registry exposed to the template as `{models[...]}`.
    pub fn models(mut self, models: Value) -> Self {
        self.models = models;
        self
    }

    pub fn destinations(mut self, destinations: Arc<dyn DestinationFactory>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn dispatch(mut self, dispatch: DispatchOptions) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Take models and dispatch options from the service configuration.
    pub fn from_config(self, config: &ServiceConfig) -> Self {
        let builder = self.dispatch(config.dispatch.clone());
        if config.models.is_null() {
            builder
        } else {
            builder.models(config.models.clone())
        }
    }

    pub fn build(self) -> PipelineInstance {
        PipelineInstance {
            shared: Arc::new(Shared {
                id: self.id,
                template: self.template,
                engine: self.engine,
                destinations: self.destinations,
                models: self.models,
                dispatch: self.dispatch,
                lifecycle: Mutex::new(Lifecycle::default()),
                throughput: Arc::new(Mutex::new(Throughput::default())),
            }),
        }
    }
}

impl PipelineInstance {
    pub fn builder(
        id: impl Into<String>,
        template: Arc<PipelineTemplate>,
        engine: Arc<dyn Engine>,
    ) -> PipelineBuilder {
        PipelineBuilder {
            id: id.into(),
            template,
            engine,
            destinations: Arc::new(DefaultDestinationFactory),
            models: Value::Object(Map::new()),
            dispatch: DispatchOptions::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    /// Resolve, render and build the pipeline, then set it playing.
    ///
    /// Returns the dispatch worker when the request names a destination that
    /// could be created. The caller must run it (e.g. `tokio::spawn`) for
    /// records to be delivered.
    ///
    /// Failures before the graph is handed to the engine leave the instance
    /// unstarted. A graph that refuses to play moves the instance to `ERROR`.
    pub fn start(&self, request: Value) -> Result<Option<DispatchWorker>, PipelineError> {
        PipelineStarting {
            pipeline_id: &self.shared.id,
            pipeline_type: &self.shared.template.pipeline_type,
        }
        .log();

        let result = self.launch(request);
        if let Err(error) = &result {
            StartFailed {
                pipeline_id: &self.shared.id,
                error,
            }
            .log();
        }
        result
    }

    fn launch(&self, request: Value) -> Result<Option<DispatchWorker>, PipelineError> {
        self.claim()?;

        let prepared = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.shared.lifecycle.lock().starting = false;
                return Err(error);
            }
        };

        let graph = prepared.graph.clone();
        {
            let mut lifecycle = self.shared.lifecycle.lock();
            let started = Timestamp::now();
            lifecycle.starting = false;
            lifecycle.launch = Some(Arc::new(Launch {
                request: prepared.request,
                description: prepared.description,
                started,
            }));
            lifecycle.graph = Some(prepared.graph);
            lifecycle.dispatch = prepared.dispatch;
            lifecycle.destination_error = prepared.destination_error;
            self.shared.throughput.lock().start(started.mono);
        }

        if let Err(error) = graph.set_state(GraphState::Playing) {
            self.shared.teardown(Trigger::Failure);
            return Err(error.into());
        }

        // A teardown that ran while the graph was being set playing has already
        // taken the handle; put the graph back to NULL behind it.
        let released = self.shared.lifecycle.lock().graph.is_none();
        if released {
            if let Err(error) = graph.set_state(GraphState::Null) {
                GraphTeardownFailed {
                    pipeline_id: &self.shared.id,
                    error: &error,
                }
                .log();
            }
        }
        Ok(prepared.worker)
    }

    fn claim(&self) -> Result<(), PipelineError> {
        let mut lifecycle = self.shared.lifecycle.lock();
        if lifecycle.starting || lifecycle.launch.is_some() {
            return Err(PipelineError::AlreadyStarted(self.shared.id.clone()));
        }
        lifecycle.starting = true;
        Ok(())
    }

    fn prepare(&self, raw: Value) -> Result<Prepared, PipelineError> {
        let shared = &self.shared;
        let template = &shared.template;

        let request = resolve_request(raw, template)?;
        let description = render(&template.template, &request.render_context(&shared.models))?;
        DescriptionRendered {
            pipeline_id: &shared.id,
            description: &description,
        }
        .log();

        let (destination, destination_error) = match shared.destinations.create(&request) {
            Ok(destination) => (destination, None),
            Err(error) => {
                DestinationUnavailable {
                    pipeline_id: &shared.id,
                    error: &error,
                }
                .log();
                (None, Some(error.to_string()))
            }
        };

        let graph = shared.engine.build(&description)?;
        self.inject_tags(graph.as_ref(), &request)?;
        self.apply_element_parameters(graph.as_ref(), &request)?;

        let (dispatch, worker) = match destination {
            Some(destination) => {
                let queue = DispatchQueue::new(
                    shared.id.clone(),
                    shared.dispatch.queue_capacity,
                    shared.dispatch.overflow,
                );
                let worker =
                    DispatchWorker::new(queue.clone(), destination, shared.dispatch.send_timeout());
                (Some(queue), Some(worker))
            }
            None => (None, None),
        };

        let events = Arc::downgrade(shared);
        graph.subscribe_events(Box::new(move |event| {
            if let Some(shared) = events.upgrade() {
                shared.on_event(event);
            }
        }))?;

        let processor =
            FrameProcessor::new(shared.id.clone(), shared.throughput.clone(), dispatch.clone());
        let owner: Weak<Shared> = Arc::downgrade(shared);
        graph.subscribe_units(
            &template.sink,
            Box::new(move |unit: &dyn ProcessedUnit| {
                if owner.strong_count() == 0 {
                    return FlowReturn::Flushing;
                }
                processor.process(unit)
            }),
        )?;

        Ok(Prepared {
            request,
            description,
            graph,
            dispatch,
            worker,
            destination_error,
        })
    }

    fn inject_tags(&self, graph: &dyn Graph, request: &PipelineRequest) -> Result<(), PipelineError> {
        let Some(tags) = &request.tags else {
            return Ok(());
        };

        let element_name = &self.shared.template.tagging_element;
        match graph.find_element(element_name) {
            Some(element) => {
                let serialized = Value::Object(tags.clone()).to_string();
                element.set_property(TAGS_PROPERTY, &Value::String(serialized))?;
            }
            None => ElementNotFound {
                pipeline_id: &self.shared.id,
                element: element_name,
                purpose: "tags",
            }
            .log(),
        }
        Ok(())
    }

    fn apply_element_parameters(
        &self,
        graph: &dyn Graph,
        request: &PipelineRequest,
    ) -> Result<(), PipelineError> {
        for binding in element_bindings(&request.parameters, &self.shared.template.parameters) {
            match graph.find_element(&binding.element) {
                Some(element) => element.set_property(&binding.property, &binding.value)?,
                None => ElementNotFound {
                    pipeline_id: &self.shared.id,
                    element: &binding.element,
                    purpose: &binding.property,
                }
                .log(),
            }
        }
        Ok(())
    }

    /// Release the graph and report the final status. A running pipeline
    /// moves to `ABORTED`; one still waiting for `PLAYING` stays unstarted.
    ///
    /// Safe to call repeatedly and concurrently with engine events. On an
    /// instance that already ended this only releases a graph still held
    /// after an error.
    pub fn stop(&self) -> Result<PipelineStatus, PipelineError> {
        if self.shared.lifecycle.lock().launch.is_none() {
            return Err(PipelineError::NotStarted(self.shared.id.clone()));
        }
        self.shared.teardown(Trigger::Stop);
        self.status()
    }

    pub fn status(&self) -> Result<PipelineStatus, PipelineError> {
        let lifecycle = self.shared.lifecycle.lock();
        let launch = lifecycle
            .launch
            .as_ref()
            .ok_or_else(|| PipelineError::NotStarted(self.shared.id.clone()))?;

        let end = lifecycle.stopped.map_or_else(Instant::now, |stopped| stopped.mono);
        let elapsed_time = end
            .saturating_duration_since(launch.started.mono)
            .as_secs_f64();

        Ok(PipelineStatus {
            id: self.shared.id.clone(),
            state: lifecycle.state,
            avg_fps: self.shared.throughput.lock().snapshot().avg_fps,
            start_time: launch.started.wall,
            elapsed_time,
        })
    }

    pub fn params(&self) -> Result<PipelineParams, PipelineError> {
        let launch = self
            .shared
            .lifecycle
            .lock()
            .launch
            .clone()
            .ok_or_else(|| PipelineError::NotStarted(self.shared.id.clone()))?;

        Ok(PipelineParams {
            id: self.shared.id.clone(),
            request: launch.request.clone(),
            pipeline_type: self.shared.template.pipeline_type.clone(),
            launch_command: launch.description.clone(),
        })
    }

    /// Average frames per second since start. `0.0` before the first frame.
    pub fn avg_fps(&self) -> f64 {
        self.shared.throughput.lock().snapshot().avg_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.shared.throughput.lock().snapshot().frame_count
    }

    pub fn state(&self) -> PipelineState {
        self.shared.lifecycle.lock().state
    }

    pub fn stop_time(&self) -> Option<DateTime<Utc>> {
        self.shared.lifecycle.lock().stopped.map(|stopped| stopped.wall)
    }

    /// Whether the instance still holds its graph.
    pub fn graph_allocated(&self) -> bool {
        self.shared.lifecycle.lock().graph.is_some()
    }

    /// Delivery counters, when a destination is attached.
    pub fn dispatch_stats(&self) -> Option<DispatchStats> {
        self.shared
            .lifecycle
            .lock()
            .dispatch
            .as_ref()
            .map(DispatchQueue::stats)
    }

    /// Why the requested destination could not be created, if it could not.
    pub fn destination_error(&self) -> Option<String> {
        self.shared.lifecycle.lock().destination_error.clone()
    }
}

impl Shared {
    fn on_event(&self, event: GraphEvent) {
        match event {
            GraphEvent::StateChanged {
                origin: EventOrigin::Graph,
                old: GraphState::Paused,
                new: GraphState::Playing,
                ..
            } => self.transition(Trigger::Playing),
            GraphEvent::EndOfStream => self.teardown(Trigger::EndOfStream),
            GraphEvent::Error { message, debug, .. } => {
                EngineErrorReported {
                    pipeline_id: &self.id,
                    message: &message,
                    debug: debug.as_deref(),
                }
                .log();
                self.transition(Trigger::Failure);
            }
            GraphEvent::StateChanged { .. } | GraphEvent::Other(_) => {}
        }
    }

    fn transition(&self, trigger: Trigger) {
        let change = self.lifecycle.lock().apply(trigger);
        self.log_transition(change, trigger);
    }

    fn teardown(&self, trigger: Trigger) {
        let (change, graph, dispatch) = {
            let mut lifecycle = self.lifecycle.lock();
            let change = lifecycle.apply(trigger);
            let graph = lifecycle.graph.take();
            if graph.is_some() && lifecycle.stopped.is_none() {
                lifecycle.stopped = Some(Timestamp::now());
            }
            (change, graph, lifecycle.dispatch.clone())
        };

        self.log_transition(change, trigger);

        if let Some(graph) = graph {
            if let Err(error) = graph.set_state(GraphState::Null) {
                GraphTeardownFailed {
                    pipeline_id: &self.id,
                    error: &error,
                }
                .log();
            }
            GraphReleased {
                pipeline_id: &self.id,
                reason: trigger.as_str(),
            }
            .log();
        }

        if let Some(dispatch) = dispatch {
            dispatch.close();
        }
    }

    fn log_transition(&self, change: Option<(PipelineState, PipelineState)>, trigger: Trigger) {
        if let Some((from, to)) = change {
            StateTransition {
                pipeline_id: &self.id,
                from,
                to,
                trigger: trigger.as_str(),
            }
            .log();
        }
    }
}
