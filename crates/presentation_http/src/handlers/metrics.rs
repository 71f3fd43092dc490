//! Prometheus exposition handler
//!
//! Runs one collection cycle per request and renders the samples in the
//! Prometheus text format, version 0.0.4.

use std::{collections::HashMap, fmt::Write};

use application::{Descriptor, Sample};
use axum::{extract::State, http::header, response::IntoResponse};

use crate::state::AppState;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape help text (quotes are left alone)
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else {
        value.to_string()
    }
}

fn write_sample(output: &mut String, sample: &Sample) {
    output.push_str(sample.descriptor.name);
    let mut labels = sample.labels().peekable();
    if labels.peek().is_some() {
        output.push('{');
        for (index, (name, value)) in labels.enumerate() {
            if index > 0 {
                output.push(',');
            }
            let _ = write!(output, "{name}=\"{}\"", escape_label_value(value));
        }
        output.push('}');
    }
    let _ = writeln!(output, " {}", format_value(sample.value));
}

/// Render samples grouped into metric families
///
/// Families appear in `descriptors` order; a family without samples is
/// omitted entirely.
pub fn encode(descriptors: &[Descriptor], samples: &[Sample]) -> String {
    let mut families: HashMap<&str, Vec<&Sample>> = HashMap::new();
    for sample in samples {
        families
            .entry(sample.descriptor.name)
            .or_default()
            .push(sample);
    }

    let mut output = String::new();
    for descriptor in descriptors {
        let Some(family) = families.remove(descriptor.name) else {
            continue;
        };
        let _ = writeln!(
            output,
            "# HELP {} {}",
            descriptor.name,
            escape_help(descriptor.help)
        );
        let _ = writeln!(
            output,
            "# TYPE {} {}",
            descriptor.name,
            descriptor.kind.as_str()
        );
        for sample in family {
            write_sample(&mut output, sample);
        }
    }

    output
}

/// `GET /metrics`
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let samples = state.collector.collect().await;
    let body = encode(&state.collector.describe(), &samples);
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}
