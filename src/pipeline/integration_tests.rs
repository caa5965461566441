// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::backends::{SimulatedEngine, SimulatedGraph};
use crate::config::{ParameterSpec, PipelineTemplate};
use crate::errors::{DestinationError, EngineError, PipelineError, RenderError};
use crate::pipeline::{PipelineInstance, PipelineRequest, PipelineState};
use crate::traits::{
    Destination, DestinationFactory, Element, Engine, EventCallback, Graph, GraphState,
    UnitCallback,
};

/// End-to-end lifecycle tests against the simulated engine
#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{EventOrigin, FlowReturn, GraphEvent};
    use std::thread;
    use std::time::Duration;

    const DETECTION: &str = "urisourcebin uri={source[uri]} ! detect name=detection device={parameters[device]} ! jsonmetaconvert name=jsonmetaconvert ! appsink name=appsink";

    fn detection_template() -> Arc<PipelineTemplate> {
        Arc::new(
            PipelineTemplate::new("object_detection", DETECTION)
                .with_parameter("device", ParameterSpec::with_default(json!("CPU")))
                .with_parameter(
                    "threshold",
                    ParameterSpec::with_default(json!(0.5)).bound_to("detection"),
                ),
        )
    }

    fn request() -> Value {
        json!({"source": {"uri": "file:///clip.mp4"}})
    }

    fn detections() -> Option<Vec<u8>> {
        Some(
            json!({"objects": [{"label": "person", "confidence": 0.92}]})
                .to_string()
                .into_bytes(),
        )
    }

    fn pipeline(engine: &Arc<SimulatedEngine>, template: Arc<PipelineTemplate>) -> PipelineInstance {
        PipelineInstance::builder("test", template, engine.clone()).build()
    }

    fn pipeline_with(
        engine: &Arc<SimulatedEngine>,
        destination: Arc<dyn Destination>,
    ) -> PipelineInstance {
        PipelineInstance::builder("test", detection_template(), engine.clone())
            .destinations(Arc::new(FixedFactory(destination)))
            .build()
    }

    fn graph(engine: &SimulatedEngine) -> Arc<SimulatedGraph> {
        engine.last_graph().expect("graph was built")
    }

    #[tokio::test]
    async fn test_normal_run_delivers_and_completes() {
        let engine = Arc::new(SimulatedEngine::new());
        let destination = Arc::new(RecordingDestination::default());
        let pipeline = pipeline_with(&engine, destination.clone());

        let worker = pipeline.start(request()).unwrap().expect("destination attached");
        let dispatch = tokio::spawn(worker.run());
        assert_eq!(pipeline.state(), PipelineState::Running);

        let graph = graph(&engine);
        for _ in 0..10 {
            assert_eq!(graph.push_unit(detections()), Some(FlowReturn::Ok));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        graph.end_of_stream();

        let stats = dispatch.await.unwrap();
        assert_eq!(stats.delivered, 10);
        assert_eq!(destination.records.lock().len(), 10);

        let status = pipeline.status().unwrap();
        assert_eq!(status.state, PipelineState::Completed);
        assert!(pipeline.stop_time().is_some());
        assert!(!pipeline.graph_allocated());
        assert_eq!(graph.null_transitions(), 1);
        assert_eq!(graph.state(), GraphState::Null);
        assert_eq!(pipeline.frame_count(), 10);
        assert!(status.avg_fps > 0.0);
        // The average is taken at the last frame, the elapsed time at EOS.
        assert!(status.avg_fps + 1e-9 >= 10.0 / status.elapsed_time);
    }

    #[test]
    fn test_started_pipeline_reports_status() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let before = chrono::Utc::now();

        assert!(pipeline.start(request()).unwrap().is_none());

        let status = pipeline.status().unwrap();
        assert_ne!(status.state, PipelineState::Unstarted);
        assert_eq!(status.id, "test");
        assert!(status.elapsed_time >= 0.0);
        assert!(status.start_time >= before);
        assert_eq!(status.avg_fps, 0.0);
        assert!(pipeline.stop_time().is_none());
    }

    #[test]
    fn test_not_started() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());

        assert!(matches!(pipeline.status(), Err(PipelineError::NotStarted(id)) if id == "test"));
        assert!(matches!(pipeline.params(), Err(PipelineError::NotStarted(_))));
        assert!(matches!(pipeline.stop(), Err(PipelineError::NotStarted(_))));
        assert_eq!(pipeline.avg_fps(), 0.0);
        assert_eq!(pipeline.state(), PipelineState::Unstarted);
    }

    #[test]
    fn test_stop_aborts_and_is_idempotent() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);
        graph.push_unit(detections());

        let first = pipeline.stop().unwrap();
        let stop_time = pipeline.stop_time();
        let second = pipeline.stop().unwrap();

        assert_eq!(first.state, PipelineState::Aborted);
        assert_eq!(second.state, PipelineState::Aborted);
        assert_eq!(first.elapsed_time, second.elapsed_time);
        assert!(stop_time.is_some());
        assert_eq!(pipeline.stop_time(), stop_time);
        assert_eq!(graph.null_transitions(), 1);
        assert_eq!(graph.push_unit(detections()), None);
    }

    #[test]
    fn test_terminal_state_never_changes() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        graph.end_of_stream();
        let stop_time = pipeline.stop_time();

        graph.post_error("late failure");
        graph.report_playing();
        graph.end_of_stream();
        let status = pipeline.stop().unwrap();

        assert_eq!(status.state, PipelineState::Completed);
        assert_eq!(pipeline.stop_time(), stop_time);
        assert_eq!(graph.null_transitions(), 1);
    }

    #[test]
    fn test_error_event_keeps_graph_until_stop() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);
        graph.push_unit(detections());

        graph.post_error("Internal data stream error");

        assert_eq!(pipeline.state(), PipelineState::Error);
        assert!(pipeline.graph_allocated());
        assert!(pipeline.stop_time().is_none());
        assert_eq!(graph.null_transitions(), 0);
        let running = pipeline.status().unwrap().elapsed_time;
        thread::sleep(Duration::from_millis(5));
        assert!(pipeline.status().unwrap().elapsed_time > running);

        let status = pipeline.stop().unwrap();

        assert_eq!(status.state, PipelineState::Error);
        assert!(!pipeline.graph_allocated());
        assert!(pipeline.stop_time().is_some());
        assert_eq!(graph.null_transitions(), 1);
        assert_eq!(pipeline.stop().unwrap().elapsed_time, status.elapsed_time);
    }

    #[test]
    fn test_state_is_monotonic() {
        let engine = Arc::new(SimulatedEngine::manual());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        let mut observed = vec![pipeline.state()];
        graph.report_playing();
        observed.push(pipeline.state());
        graph.report_playing();
        observed.push(pipeline.state());
        graph.post_error("decoder failure");
        observed.push(pipeline.state());
        graph.end_of_stream();
        observed.push(pipeline.state());
        pipeline.stop().unwrap();
        observed.push(pipeline.state());

        assert_eq!(
            observed,
            vec![
                PipelineState::Unstarted,
                PipelineState::Running,
                PipelineState::Running,
                PipelineState::Error,
                PipelineState::Error,
                PipelineState::Error,
            ]
        );
    }

    #[test]
    fn test_throughput_follows_wall_clock() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        for _ in 0..5 {
            thread::sleep(Duration::from_millis(20));
            graph.push_unit(None);
        }
        graph.end_of_stream();

        let status = pipeline.status().unwrap();
        assert_eq!(pipeline.frame_count(), 5);
        assert!(status.avg_fps > 0.0);
        assert!(status.avg_fps <= 5.0 / 0.1 + 1e-9);
        assert!(status.avg_fps + 1e-9 >= 5.0 / status.elapsed_time);
    }

    #[tokio::test]
    async fn test_failing_destination_is_best_effort() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline_with(&engine, Arc::new(FailingDestination));

        let worker = pipeline.start(request()).unwrap().unwrap();
        let dispatch = tokio::spawn(worker.run());
        let graph = graph(&engine);
        for _ in 0..4 {
            assert_eq!(graph.push_unit(detections()), Some(FlowReturn::Ok));
        }
        graph.end_of_stream();

        let stats = dispatch.await.unwrap();
        assert_eq!(stats.failed, 4);
        assert_eq!(stats.delivered, 0);
        assert_eq!(pipeline.frame_count(), 4);
        assert_eq!(pipeline.state(), PipelineState::Completed);
        assert_eq!(pipeline.dispatch_stats(), Some(stats));
    }

    #[test]
    fn test_destination_create_failure_is_recorded() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let mut raw = request();
        raw["destination"] = json!({"type": "mqtt", "host": "localhost"});

        let worker = pipeline.start(raw).unwrap();

        assert!(worker.is_none());
        assert!(pipeline.destination_error().unwrap().contains("mqtt"));
        assert!(pipeline.dispatch_stats().is_none());
        graph(&engine).push_unit(detections());
        assert_eq!(pipeline.frame_count(), 1);
        assert_eq!(pipeline.state(), PipelineState::Running);
    }

    #[tokio::test]
    async fn test_file_destination_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.jsonl");
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let mut raw = request();
        raw["destination"] = json!({"type": "file", "path": path});

        let worker = pipeline.start(raw).unwrap().unwrap();
        let dispatch = tokio::spawn(worker.run());
        let graph = graph(&engine);
        graph.push_unit(detections());
        graph.push_unit(detections());
        graph.end_of_stream();
        dispatch.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_only_detections_are_dispatched() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline_with(&engine, Arc::new(RecordingDestination::default()));
        let _worker = pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        graph.push_unit(detections());
        graph.push_unit(Some(json!({"objects": []}).to_string().into_bytes()));
        graph.push_unit(Some(b"not json".to_vec()));
        graph.push_unit(None);

        assert_eq!(pipeline.frame_count(), 4);
        assert_eq!(pipeline.dispatch_stats().unwrap().queued, 1);
    }

    #[test]
    fn test_caller_parameters_win_over_defaults() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let mut raw = request();
        raw["parameters"] = json!({"device": "GPU", "batch": 4});

        pipeline.start(raw).unwrap();

        let params = pipeline.params().unwrap();
        assert!(params.launch_command.contains("device=GPU"));
        assert_eq!(params.request.parameters["device"], json!("GPU"));
        assert_eq!(params.request.parameters["threshold"], json!(0.5));
        assert_eq!(params.request.parameters["batch"], json!(4));
        let detection = graph(&engine).element("detection").unwrap();
        assert_eq!(detection.property("threshold"), Some(json!(0.5)));
        assert_eq!(detection.property("device"), Some(json!("GPU")));
    }

    #[test]
    fn test_bound_parameter_from_caller() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let mut raw = request();
        raw["parameters"] = json!({"threshold": 0.9});

        pipeline.start(raw).unwrap();

        let detection = graph(&engine).element("detection").unwrap();
        assert_eq!(detection.property("threshold"), Some(json!(0.9)));
    }

    #[test]
    fn test_render_failure_builds_nothing() {
        let engine = Arc::new(SimulatedEngine::new());
        let template = Arc::new(PipelineTemplate::new(
            "broken",
            "src model={parameters[model]} ! appsink name=appsink",
        ));
        let pipeline = pipeline(&engine, template);

        let result = pipeline.start(request());

        assert!(matches!(
            result,
            Err(PipelineError::TemplateRender(RenderError::MissingValue { .. }))
        ));
        assert_eq!(engine.build_count(), 0);
        assert_eq!(pipeline.state(), PipelineState::Unstarted);
        assert!(matches!(pipeline.status(), Err(PipelineError::NotStarted(_))));
    }

    #[test]
    fn test_invalid_request_leaves_instance_startable() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());

        assert!(matches!(
            pipeline.start(json!([1, 2])),
            Err(PipelineError::InvalidRequest(_))
        ));
        assert!(matches!(
            pipeline.start(json!({"parameters": 5})),
            Err(PipelineError::InvalidRequest(_))
        ));
        assert_eq!(engine.build_count(), 0);

        pipeline.start(request()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Running);
    }

    #[test]
    fn test_build_failure() {
        let engine = Arc::new(SimulatedEngine::new().fail_builds("no element 'detect'"));
        let pipeline = pipeline(&engine, detection_template());

        let result = pipeline.start(request());

        assert!(matches!(result, Err(PipelineError::Engine(EngineError::Build(_)))));
        assert!(matches!(pipeline.status(), Err(PipelineError::NotStarted(_))));
    }

    #[test]
    fn test_tags_are_injected() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        let mut raw = request();
        raw["tags"] = json!({"camera": "lobby"});

        pipeline.start(raw).unwrap();

        let converter = graph(&engine).element("jsonmetaconvert").unwrap();
        assert_eq!(
            converter.property("tags"),
            Some(json!("{\"camera\":\"lobby\"}"))
        );
    }

    #[test]
    fn test_missing_elements_are_not_fatal() {
        let engine = Arc::new(SimulatedEngine::new());
        let template = Arc::new(
            PipelineTemplate::new("plain", "src ! appsink name=appsink").with_parameter(
                "threshold",
                ParameterSpec::with_default(json!(0.3)).bound_to("detection"),
            ),
        );
        let pipeline = pipeline(&engine, template);

        pipeline
            .start(json!({"tags": {"camera": "dock"}}))
            .unwrap();

        assert_eq!(pipeline.state(), PipelineState::Running);
    }

    #[test]
    fn test_rejected_property_fails_start() {
        let engine = Arc::new(SimulatedEngine::new().reject_property("threshold"));
        let pipeline = pipeline(&engine, detection_template());

        let result = pipeline.start(request());

        assert!(matches!(
            result,
            Err(PipelineError::Engine(EngineError::Property { .. }))
        ));
        assert_eq!(pipeline.state(), PipelineState::Unstarted);
        assert!(!pipeline.graph_allocated());
    }

    #[test]
    fn test_missing_sink_fails_start() {
        let engine = Arc::new(SimulatedEngine::new());
        let template = Arc::new(PipelineTemplate::new("nosink", "src ! fakesink"));
        let pipeline = pipeline(&engine, template);

        let result = pipeline.start(json!({}));

        assert!(matches!(
            result,
            Err(PipelineError::Engine(EngineError::MissingElement(sink))) if sink == "appsink"
        ));
    }

    #[test]
    fn test_params_hide_models_and_are_copies() {
        let engine = Arc::new(SimulatedEngine::new());
        let template = Arc::new(PipelineTemplate::new(
            "with_model",
            "src ! detect model={models[person][1][network]} ! appsink name=appsink",
        ));
        let pipeline = PipelineInstance::builder("test", template, engine.clone())
            .models(json!({"person": {"1": {"network": "/models/person.xml"}}}))
            .build();
        let mut raw = request();
        raw["models"] = json!({"person": {"1": {"network": "/tmp/evil.xml"}}});

        pipeline.start(raw).unwrap();

        let mut params = pipeline.params().unwrap();
        assert_eq!(params.pipeline_type, "with_model");
        assert!(params.launch_command.contains("model=/models/person.xml"));
        assert!(!params.request.extra.contains_key("models"));
        let serialized = serde_json::to_value(&params).unwrap();
        assert!(serialized["request"].get("models").is_none());
        assert_eq!(serialized["type"], json!("with_model"));

        params.request.parameters.insert("device".to_string(), json!("GPU"));
        params.launch_command.clear();
        let fresh = pipeline.params().unwrap();
        assert!(!fresh.request.parameters.contains_key("device"));
        assert!(!fresh.launch_command.is_empty());
    }

    #[test]
    fn test_eos_before_playing_completes() {
        let engine = Arc::new(SimulatedEngine::manual());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Unstarted);

        graph(&engine).end_of_stream();

        assert_eq!(pipeline.state(), PipelineState::Completed);
        assert!(pipeline.stop_time().is_some());
    }

    #[test]
    fn test_stop_before_playing_stays_unstarted() {
        let engine = Arc::new(SimulatedEngine::manual());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        let status = pipeline.stop().unwrap();

        assert_eq!(status.state, PipelineState::Unstarted);
        assert!(pipeline.stop_time().is_some());
        assert!(!pipeline.graph_allocated());
        assert_eq!(graph.null_transitions(), 1);

        graph.report_playing();
        assert_eq!(pipeline.state(), PipelineState::Unstarted);
        assert_eq!(pipeline.stop().unwrap().elapsed_time, status.elapsed_time);
    }

    #[test]
    fn test_stop_while_going_playing_leaves_graph_null() {
        let inner = Arc::new(SimulatedEngine::new());
        let engine = Arc::new(StopOnPlayingEngine {
            inner: inner.clone(),
            hook: Arc::new(Mutex::new(None)),
        });
        let pipeline =
            PipelineInstance::builder("test", detection_template(), engine.clone()).build();
        let stopper = pipeline.clone();
        *engine.hook.lock() = Some(Box::new(move || {
            stopper.stop().unwrap();
        }));

        pipeline.start(request()).unwrap();

        let graph = graph(&inner);
        assert_eq!(graph.state(), GraphState::Null);
        assert_eq!(graph.null_transitions(), 2);
        assert!(!pipeline.graph_allocated());
        assert!(pipeline.stop_time().is_some());
        assert_eq!(pipeline.state(), PipelineState::Unstarted);
        assert_eq!(graph.push_unit(detections()), None);
    }

    #[test]
    fn test_element_state_changes_are_ignored() {
        let engine = Arc::new(SimulatedEngine::manual());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        graph.emit(GraphEvent::StateChanged {
            origin: EventOrigin::Element("detection".to_string()),
            old: GraphState::Paused,
            new: GraphState::Playing,
            pending: GraphState::VoidPending,
        });
        graph.emit(GraphEvent::StateChanged {
            origin: EventOrigin::Graph,
            old: GraphState::Ready,
            new: GraphState::Paused,
            pending: GraphState::Playing,
        });
        graph.emit(GraphEvent::Other("qos".to_string()));
        assert_eq!(pipeline.state(), PipelineState::Unstarted);

        graph.report_playing();
        assert_eq!(pipeline.state(), PipelineState::Running);
    }

    #[test]
    fn test_refused_playing_moves_to_error() {
        let engine = Arc::new(SimulatedEngine::new().fail_playing("device busy"));
        let pipeline = pipeline(&engine, detection_template());

        let result = pipeline.start(request());

        assert!(matches!(
            result,
            Err(PipelineError::Engine(EngineError::StateChange { .. }))
        ));
        assert_eq!(pipeline.state(), PipelineState::Error);
        assert!(!pipeline.graph_allocated());
        assert!(pipeline.stop_time().is_some());
        assert_eq!(graph(&engine).null_transitions(), 1);
        assert_eq!(pipeline.status().unwrap().state, PipelineState::Error);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();

        let result = pipeline.start(request());

        assert!(matches!(result, Err(PipelineError::AlreadyStarted(_))));
        assert_eq!(engine.build_count(), 1);
    }

    #[test]
    fn test_concurrent_stop_and_eos_release_once() {
        for _ in 0..25 {
            let engine = Arc::new(SimulatedEngine::new());
            let pipeline = pipeline(&engine, detection_template());
            pipeline.start(request()).unwrap();
            let graph = graph(&engine);

            let eos = {
                let graph = graph.clone();
                thread::spawn(move || graph.end_of_stream())
            };
            let stopper = {
                let pipeline = pipeline.clone();
                thread::spawn(move || pipeline.stop().unwrap())
            };
            eos.join().unwrap();
            let status = stopper.join().unwrap();

            assert!(matches!(
                status.state,
                PipelineState::Completed | PipelineState::Aborted
            ));
            assert_eq!(pipeline.state(), status.state);
            assert_eq!(graph.null_transitions(), 1);
            assert!(pipeline.stop_time().is_some());
        }
    }

    #[test]
    fn test_frames_from_many_threads_are_all_counted() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline_with(&engine, Arc::new(RecordingDestination::default()));
        let _worker = pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let graph = graph.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        graph.push_unit(detections());
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(pipeline.frame_count(), 100);
        // Default capacity is 64 and the oldest records give way.
        let stats = pipeline.dispatch_stats().unwrap();
        assert_eq!(stats.queued, 100);
        assert_eq!(stats.dropped, 36);
    }

    #[test]
    fn test_dropped_instance_stops_the_flow() {
        let engine = Arc::new(SimulatedEngine::new());
        let pipeline = pipeline(&engine, detection_template());
        pipeline.start(request()).unwrap();
        let graph = graph(&engine);

        drop(pipeline);

        assert_eq!(graph.push_unit(detections()), Some(FlowReturn::Flushing));
        graph.end_of_stream();
    }
}

#[derive(Default)]
struct RecordingDestination {
    records: Mutex<Vec<Value>>,
}

#[async_trait]
impl Destination for RecordingDestination {
    async fn send(&self, record: &Value) -> Result<(), DestinationError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct FailingDestination;

#[async_trait]
impl Destination for FailingDestination {
    async fn send(&self, _record: &Value) -> Result<(), DestinationError> {
        Err(DestinationError::Rejected("broker unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

type Hook = Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>;

/// Runs a one-shot hook just before the graph is set playing.
struct StopOnPlayingEngine {
    inner: Arc<SimulatedEngine>,
    hook: Hook,
}

impl Engine for StopOnPlayingEngine {
    fn name(&self) -> &'static str {
        "stop-on-playing"
    }

    fn build(&self, description: &str) -> Result<Arc<dyn Graph>, EngineError> {
        Ok(Arc::new(StopOnPlayingGraph {
            inner: self.inner.build(description)?,
            hook: self.hook.clone(),
        }))
    }
}

struct StopOnPlayingGraph {
    inner: Arc<dyn Graph>,
    hook: Hook,
}

impl Graph for StopOnPlayingGraph {
    fn find_element(&self, name: &str) -> Option<Arc<dyn Element>> {
        self.inner.find_element(name)
    }

    fn set_state(&self, state: GraphState) -> Result<(), EngineError> {
        if state == GraphState::Playing {
            let hook = self.hook.lock().take();
            if let Some(hook) = hook {
                hook();
            }
        }
        self.inner.set_state(state)
    }

    fn subscribe_events(&self, callback: EventCallback) -> Result<(), EngineError> {
        self.inner.subscribe_events(callback)
    }

    fn subscribe_units(&self, sink: &str, callback: UnitCallback) -> Result<(), EngineError> {
        self.inner.subscribe_units(sink, callback)
    }
}

/// Hands out the same destination for every request.
struct FixedFactory(Arc<dyn Destination>);

impl DestinationFactory for FixedFactory {
    fn create(
        &self,
        _request: &PipelineRequest,
    ) -> Result<Option<Arc<dyn Destination>>, DestinationError> {
        Ok(Some(self.0.clone()))
    }
}
