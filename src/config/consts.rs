// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Element the per-unit callback is attached to when a template does not name one
pub const DEFAULT_SINK_ELEMENT: &str = "appsink";
/// Element whose `tags` property receives the request's tag metadata
pub const DEFAULT_TAGGING_ELEMENT: &str = "jsonmetaconvert";
/// Property set on the tagging element
pub const TAGS_PROPERTY: &str = "tags";
/// Key the model registry is injected under when rendering a template
pub const MODELS_KEY: &str = "models";
/// Key of the analytics collection inside per-unit metadata
pub const OBJECTS_KEY: &str = "objects";
/// Default number of analytics records buffered between the unit callback and the destination
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
/// Default bound on a single destination send (2 seconds)
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 2_000;
