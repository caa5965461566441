// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::EngineError;
use crate::traits::{
    Element, Engine, EventCallback, EventOrigin, FlowReturn, Graph, GraphEvent, GraphState,
    ProcessedUnit, UnitCallback,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type SharedEventCallback = Arc<dyn Fn(GraphEvent) + Send + Sync + 'static>;
type SharedUnitCallback = Arc<dyn Fn(&dyn ProcessedUnit) -> FlowReturn + Send + Sync + 'static>;

/// In-process engine.
///
/// By default every graph reports `PAUSED -> PLAYING` as soon as it is set
/// to `PLAYING`. A [`manual`](Self::manual) engine leaves that to
/// [`SimulatedGraph::report_playing`].
pub struct SimulatedEngine {
    auto_play: bool,
    init_failure: Option<String>,
    build_failure: Option<String>,
    playing_failure: Option<String>,
    rejected_properties: HashSet<String>,
    init_count: AtomicUsize,
    deinit_count: AtomicUsize,
    graphs: Mutex<Vec<Arc<SimulatedGraph>>>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            auto_play: true,
            init_failure: None,
            build_failure: None,
            playing_failure: None,
            rejected_properties: HashSet::new(),
            init_count: AtomicUsize::new(0),
            deinit_count: AtomicUsize::new(0),
            graphs: Mutex::new(Vec::new()),
        }
    }

    /// Graphs wait for [`SimulatedGraph::report_playing`].
    pub fn manual() -> Self {
        Self {
            auto_play: false,
            ..Self::new()
        }
    }

    pub fn fail_init(mut self, reason: impl Into<String>) -> Self {
        self.init_failure = Some(reason.into());
        self
    }

    pub fn fail_builds(mut self, reason: impl Into<String>) -> Self {
        self.build_failure = Some(reason.into());
        self
    }

    /// Graphs refuse the change to `PLAYING`.
    pub fn fail_playing(mut self, reason: impl Into<String>) -> Self {
        self.playing_failure = Some(reason.into());
        self
    }

    /// Every element rejects assignments to `key`.
    pub fn reject_property(mut self, key: impl Into<String>) -> Self {
        self.rejected_properties.insert(key.into());
        self
    }

    /// The most recently built graph.
    pub fn last_graph(&self) -> Option<Arc<SimulatedGraph>> {
        self.graphs.lock().last().cloned()
    }

    pub fn build_count(&self) -> usize {
        self.graphs.lock().len()
    }

    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    pub fn deinit_count(&self) -> usize {
        self.deinit_count.load(Ordering::SeqCst)
    }

    fn parse(&self, description: &str) -> Result<Vec<Arc<SimulatedElement>>, EngineError> {
        let mut elements = Vec::new();
        let mut names = HashSet::new();
        let mut factory_counts: HashMap<String, usize> = HashMap::new();

        for segment in description.split('!') {
            let mut tokens = segment.split_whitespace();
            let Some(factory) = tokens.next() else {
                return Err(EngineError::Build(format!(
                    "empty element in '{}'",
                    description.trim()
                )));
            };

            let mut name = None;
            let mut properties = Map::new();
            for token in tokens {
                let Some((key, value)) = token.split_once('=') else {
                    return Err(EngineError::Build(format!(
                        "expected key=value after '{}', got '{}'",
                        factory, token
                    )));
                };
                let value = value.trim_matches(|c: char| c == '"' || c == '\'');
                if key == "name" {
                    name = Some(value.to_string());
                } else {
                    properties.insert(key.to_string(), Value::String(value.to_string()));
                }
            }

            let name = name.unwrap_or_else(|| {
                let count = factory_counts.entry(factory.to_string()).or_insert(0);
                let generated = format!("{}{}", factory, count);
                *count += 1;
                generated
            });
            if !names.insert(name.clone()) {
                return Err(EngineError::Build(format!("duplicate element name '{}'", name)));
            }

            elements.push(Arc::new(SimulatedElement {
                name,
                factory: factory.to_string(),
                properties: Mutex::new(properties),
                rejected: self.rejected_properties.clone(),
            }));
        }

        Ok(elements)
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for SimulatedEngine {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn initialize(&self) -> Result<(), EngineError> {
        if let Some(reason) = &self.init_failure {
            return Err(EngineError::Init(reason.clone()));
        }
        self.init_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn deinitialize(&self) {
        self.deinit_count.fetch_add(1, Ordering::SeqCst);
    }

    fn build(&self, description: &str) -> Result<Arc<dyn Graph>, EngineError> {
        if let Some(reason) = &self.build_failure {
            return Err(EngineError::Build(reason.clone()));
        }

        let graph = Arc::new(SimulatedGraph {
            description: description.to_string(),
            elements: self.parse(description)?,
            auto_play: self.auto_play,
            playing_failure: self.playing_failure.clone(),
            state: Mutex::new(GraphState::Null),
            null_transitions: AtomicUsize::new(0),
            event_callback: Mutex::new(None),
            unit_callback: Mutex::new(None),
        });
        self.graphs.lock().push(graph.clone());
        Ok(graph)
    }
}

/// A graph built by [`SimulatedEngine`].
///
/// Callbacks are always invoked with no internal lock held, so they may call
/// back into the graph.
pub struct SimulatedGraph {
    description: String,
    elements: Vec<Arc<SimulatedElement>>,
    auto_play: bool,
    playing_failure: Option<String>,
    state: Mutex<GraphState>,
    null_transitions: AtomicUsize,
    event_callback: Mutex<Option<SharedEventCallback>>,
    unit_callback: Mutex<Option<SharedUnitCallback>>,
}

impl SimulatedGraph {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> GraphState {
        *self.state.lock()
    }

    pub fn element(&self, name: &str) -> Option<Arc<SimulatedElement>> {
        self.elements.iter().find(|e| e.name == name).cloned()
    }

    /// How many times the graph was set to `NULL`.
    pub fn null_transitions(&self) -> usize {
        self.null_transitions.load(Ordering::SeqCst)
    }

    /// Post `event` to the bus subscriber, if any.
    pub fn emit(&self, event: GraphEvent) {
        let callback = self.event_callback.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    /// Report the graph itself reaching `PLAYING`.
    pub fn report_playing(&self) {
        self.emit(GraphEvent::StateChanged {
            origin: EventOrigin::Graph,
            old: GraphState::Paused,
            new: GraphState::Playing,
            pending: GraphState::VoidPending,
        });
    }

    pub fn end_of_stream(&self) {
        self.emit(GraphEvent::EndOfStream);
    }

    pub fn post_error(&self, message: impl Into<String>) {
        self.emit(GraphEvent::Error {
            origin: EventOrigin::Graph,
            message: message.into(),
            debug: Some(format!("simulated error in '{}'", self.description)),
        });
    }

    /// Hand a processed unit to the sink callback.
    ///
    /// Returns `None` unless the graph is `PLAYING` and a sink is subscribed.
    pub fn deliver(&self, unit: &dyn ProcessedUnit) -> Option<FlowReturn> {
        if self.state() != GraphState::Playing {
            return None;
        }
        let callback = self.unit_callback.lock().clone()?;
        Some(callback(unit))
    }

    pub fn push_unit(&self, payload: Option<Vec<u8>>) -> Option<FlowReturn> {
        self.deliver(&SimulatedUnit::new(payload))
    }

    fn report_ramp_up(&self) {
        if let Some(first) = self.elements.first() {
            self.emit(GraphEvent::StateChanged {
                origin: EventOrigin::Element(first.name.clone()),
                old: GraphState::Paused,
                new: GraphState::Playing,
                pending: GraphState::VoidPending,
            });
        }
        self.report_playing();
    }
}

impl Graph for SimulatedGraph {
    fn find_element(&self, name: &str) -> Option<Arc<dyn Element>> {
        self.element(name).map(|e| e as Arc<dyn Element>)
    }

    fn set_state(&self, target: GraphState) -> Result<(), EngineError> {
        if target == GraphState::Playing {
            if let Some(reason) = &self.playing_failure {
                return Err(EngineError::StateChange {
                    target: target.to_string(),
                    reason: reason.clone(),
                });
            }
        }

        let previous = std::mem::replace(&mut *self.state.lock(), target);
        if target == GraphState::Null {
            self.null_transitions.fetch_add(1, Ordering::SeqCst);
        }
        if target == GraphState::Playing && previous != GraphState::Playing && self.auto_play {
            self.report_ramp_up();
        }
        Ok(())
    }

    fn subscribe_events(&self, callback: EventCallback) -> Result<(), EngineError> {
        let mut slot = self.event_callback.lock();
        if slot.is_some() {
            return Err(EngineError::Subscribe(
                "bus already has a subscriber".to_string(),
            ));
        }
        *slot = Some(Arc::from(callback));
        Ok(())
    }

    fn subscribe_units(&self, sink: &str, callback: UnitCallback) -> Result<(), EngineError> {
        let element = self
            .element(sink)
            .ok_or_else(|| EngineError::MissingElement(sink.to_string()))?;
        element.set_property("emit-signals", &Value::Bool(true))?;
        element.set_property("sync", &Value::Bool(false))?;

        *self.unit_callback.lock() = Some(Arc::from(callback));
        Ok(())
    }
}

/// A named element of a [`SimulatedGraph`], recording its properties.
pub struct SimulatedElement {
    name: String,
    factory: String,
    properties: Mutex<Map<String, Value>>,
    rejected: HashSet<String>,
}

impl SimulatedElement {
    pub fn factory(&self) -> &str {
        &self.factory
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.lock().get(key).cloned()
    }
}

impl Element for SimulatedElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_property(&self, key: &str, value: &Value) -> Result<(), EngineError> {
        if self.rejected.contains(key) {
            return Err(EngineError::Property {
                element: self.name.clone(),
                key: key.to_string(),
                reason: "property is read-only".to_string(),
            });
        }
        self.properties.lock().insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// A processed unit carrying an optional metadata payload.
#[derive(Debug, Clone, Default)]
pub struct SimulatedUnit {
    payload: Option<Vec<u8>>,
}

impl SimulatedUnit {
    pub fn new(payload: Option<Vec<u8>>) -> Self {
        Self { payload }
    }

    pub fn with_metadata(metadata: &Value) -> Self {
        Self::new(Some(metadata.to_string().into_bytes()))
    }
}

impl ProcessedUnit for SimulatedUnit {
    fn payload(&self) -> Option<Vec<u8>> {
        self.payload.clone()
    }
}
