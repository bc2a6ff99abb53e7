//! Prometheus text exposition format.
//!
//! Renders the samples of one scrape into the text exposition format
//! (version 0.0.4) for scraping by a Prometheus server or compatible agent.

use std::collections::BTreeMap;

use crate::family::{MetricFamily, Sample};

/// `Content-Type` of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples into Prometheus text format.
///
/// Samples are grouped per family with one `# HELP` / `# TYPE` header each.
/// Families are ordered by name and samples by label values, so the output
/// does not depend on the key order of the snapshot file. Families without
/// samples are omitted.
pub fn render_prometheus(samples: &[Sample]) -> String {
    let mut families: BTreeMap<&str, (&MetricFamily, Vec<&Sample>)> = BTreeMap::new();
    for sample in samples {
        families
            .entry(sample.family.name)
            .or_insert_with(|| (sample.family, Vec::new()))
            .1
            .push(sample);
    }

    let mut out = String::new();
    for (name, (family, mut group)) in families {
        group.sort_by(|a, b| a.labels.cmp(&b.labels));

        out.push_str(&format!("# HELP {name} {}\n", escape_help(family.help)));
        out.push_str(&format!("# TYPE {name} {}\n", family.kind.as_str()));
        for sample in group {
            out.push_str(name);
            if !family.labels.is_empty() {
                let pairs: Vec<String> = family
                    .labels
                    .iter()
                    .zip(&sample.labels)
                    .map(|(label, value)| format!("{label}=\"{}\"", escape_label_value(value)))
                    .collect();
                out.push('{');
                out.push_str(&pairs.join(","));
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(sample.value));
            out.push('\n');
        }
    }

    out
}

/// Label values escape backslash, double quote and line feed.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// HELP text escapes backslash and line feed only.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
