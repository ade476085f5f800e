//! Fire-and-forget analytics events.
//!
//! The calculator reports what the user does through an [`AnalyticsSink`].
//! Sinks must never fail the caller; anything that goes wrong inside a sink
//! stays inside it.
use serde_json::{Map, Value, json};
use tracing::info;

use crate::core::converter::{ConversionInput, ConversionResult};

pub const SELECT_CURRENCY_EVENT: &str = "select_currency";
pub const SHARE_ACTION: &str = "share";
pub const SHARE_CONTEXT: &str = "currency_calculation";
pub const EXCHANGE_RATE_API_LINK: &str = "exchange_rate_api";

pub type EventProps = Map<String, Value>;

pub trait AnalyticsSink: Send + Sync {
    fn track_event(&self, name: &str, props: EventProps);
    fn track_share(&self, action: &str, context: &str);
    fn track_calculation(&self, kind: &str, props: EventProps);
    fn track_external_link_click(&self, name: &str, url: &str);
}

/// Emits every event as a structured log line under `divisa::analytics`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track_event(&self, name: &str, props: EventProps) {
        let props = Value::Object(props);
        info!(target: "divisa::analytics", event = name, %props, "event");
    }

    fn track_share(&self, action: &str, context: &str) {
        info!(target: "divisa::analytics", action, context, "share");
    }

    fn track_calculation(&self, kind: &str, props: EventProps) {
        let props = Value::Object(props);
        info!(target: "divisa::analytics", kind, %props, "calculation");
    }

    fn track_external_link_click(&self, name: &str, url: &str) {
        info!(target: "divisa::analytics", link = name, url, "external_link_click");
    }
}

fn into_props(value: Value) -> EventProps {
    match value {
        Value::Object(map) => map,
        _ => EventProps::new(),
    }
}

/// Properties of the `select_currency` event.
pub fn currency_selection_props(input: &ConversionInput) -> EventProps {
    into_props(json!({
        "from_currency": input.from_currency,
        "to_currency": input.to_currency,
        "currency_pair": input.currency_pair(),
    }))
}

/// Properties of the `currency` calculation event sent when sharing.
pub fn calculation_props(
    amount: f64,
    input: &ConversionInput,
    result: &ConversionResult,
) -> EventProps {
    into_props(json!({
        "amount": amount,
        "from_currency": input.from_currency,
        "to_currency": input.to_currency,
        "exchange_rate": result.effective_rate,
        "converted_amount": result.converted_amount,
    }))
}
