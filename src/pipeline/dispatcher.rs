//! Event dispatcher: admission, configuration, validation, skip check and
//! staged handler execution for one inbound event.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{Error, PayloadError};
use crate::event::{EventContext, Payload};
use crate::pipeline::skip::SkipPolicy;
use crate::pipeline::types::{ActionKind, ProcessorRegistry};
use crate::schema::definitions::PAYLOAD_VALIDATOR;
use crate::schema::validate_with;

/// Actions admitted by default: label changes and new comments.
pub const DEFAULT_ALLOWED_ACTIONS: &[ActionKind] = &[
    ActionKind::Labeled,
    ActionKind::Unlabeled,
    ActionKind::Created,
];

/// How a dispatch ended when no error was raised.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The action is not in the allowed set. Nothing was loaded or run.
    NotAllowed { action: String },
    /// The payload failed validation or decoding.
    PayloadRejected { error: PayloadError },
    /// The skip policy declined the event for `reason`.
    Skipped { reason: String },
    /// No processor is registered for the action.
    NoProcessor { action: ActionKind },
    /// Every handler of the processor ran and returned `Ok`.
    Completed { handlers_run: usize },
}

impl DispatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::NotAllowed { .. } => "not_allowed",
            DispatchOutcome::PayloadRejected { .. } => "payload_rejected",
            DispatchOutcome::Skipped { .. } => "skipped",
            DispatchOutcome::NoProcessor { .. } => "no_processor",
            DispatchOutcome::Completed { .. } => "completed",
        }
    }
}

/// Routes inbound events through their registered processor.
///
/// Holds no per-event state, so one dispatcher can serve concurrent events.
pub struct EventDispatcher {
    loader: ConfigLoader,
    processors: ProcessorRegistry,
    skip: Arc<dyn SkipPolicy>,
    allowed: Vec<ActionKind>,
}

impl EventDispatcher {
    pub fn new(
        loader: ConfigLoader,
        processors: ProcessorRegistry,
        skip: Arc<dyn SkipPolicy>,
    ) -> Self {
        Self {
            loader,
            processors,
            skip,
            allowed: DEFAULT_ALLOWED_ACTIONS.to_vec(),
        }
    }

    /// Replace the set of admitted actions.
    pub fn with_allowed_actions(mut self, actions: &[ActionKind]) -> Self {
        self.allowed = actions.to_vec();
        self
    }

    pub fn is_allowed(&self, action: ActionKind) -> bool {
        self.allowed.contains(&action)
    }

    /// Process one raw event.
    ///
    /// Configuration and handler errors are returned as `Err`. Every other
    /// way of not running handlers is reported through [`DispatchOutcome`].
    pub async fn dispatch(
        &self,
        event_name: &str,
        raw: serde_json::Value,
    ) -> Result<DispatchOutcome, Error> {
        let delivery_id = Uuid::new_v4();
        let action = raw
            .get("action")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let span = info_span!(
            "event",
            delivery_id = %delivery_id,
            event = %event_name,
            action = %action
        );

        self.run(delivery_id, event_name, action, raw)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        delivery_id: Uuid,
        event_name: &str,
        action: String,
        raw: serde_json::Value,
    ) -> Result<DispatchOutcome, Error> {
        info!("Received event");

        let kind = match action.parse::<ActionKind>() {
            Ok(kind) if self.is_allowed(kind) => kind,
            _ => {
                info!("Skipping the event, action not configured");
                return Ok(DispatchOutcome::NotAllowed { action });
            }
        };

        let config = self.loader.load(&raw).await?;
        debug!(level = %config.log.level, "Configuration loaded");

        let report = validate_with(&PAYLOAD_VALIDATOR, &raw);
        if !report.is_valid() {
            warn!(errors = %report.summary(), "Payload failed schema validation");
            return Ok(DispatchOutcome::PayloadRejected {
                error: PayloadError::Schema(report),
            });
        }
        let payload: Payload = match serde_json::from_value(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Payload could not be decoded");
                return Ok(DispatchOutcome::PayloadRejected {
                    error: PayloadError::Decode(e),
                });
            }
        };

        let ctx = EventContext::new(event_name, payload, config).with_delivery_id(delivery_id);

        let decision = self.skip.evaluate(&ctx);
        if decision.skip {
            info!(reason = %decision.reason, "Skipping the event");
            return Ok(DispatchOutcome::Skipped {
                reason: decision.reason,
            });
        }

        let Some(entry) = self.processors.get(kind) else {
            warn!("No processor registered for action");
            return Ok(DispatchOutcome::NoProcessor { action: kind });
        };

        let mut handlers_run = 0;
        for (stage, handlers) in entry.stages() {
            if handlers.is_empty() {
                continue;
            }
            let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
            info!(stage = stage.label(), handlers = ?names, "Running handlers");

            for handler in handlers {
                if let Err(e) = handler.handle(&ctx).await {
                    warn!(
                        stage = stage.label(),
                        handler = handler.name(),
                        error = %e,
                        "Handler failed, aborting event"
                    );
                    return Err(Error::Handler(e));
                }
                handlers_run += 1;
            }
        }

        info!(handlers_run, "Event processed");
        Ok(DispatchOutcome::Completed { handlers_run })
    }
}
