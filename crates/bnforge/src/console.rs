//! Colorful console output for search events.
//!
//! Provides a custom `tracing` layer that formats the hill-climbing events
//! of `bnforge_solver` with colors.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "bnforge_solver=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SearchConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats search events with colors.
pub struct SearchConsoleLayer;

impl<S: Subscriber> Layer<S> for SearchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("bnforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_search_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    nodes: Option<u64>,
    score_type: Option<String>,
    operators: Option<String>,
    max_indegree: Option<u64>,
    max_iters: Option<u64>,
    patience: Option<u64>,
    epsilon: Option<f64>,
    iteration: Option<u64>,
    iterations: Option<u64>,
    evaluations: Option<u64>,
    operator: Option<String>,
    delta: Option<f64>,
    score: Option<f64>,
    validation: Option<String>,
    reason: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_string(field, s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_string(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "nodes" => self.nodes = Some(value),
            "max_indegree" => self.max_indegree = Some(value),
            "max_iters" => self.max_iters = Some(value),
            "patience" => self.patience = Some(value),
            "iteration" => self.iteration = Some(value),
            "iterations" => self.iterations = Some(value),
            "evaluations" => self.evaluations = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "epsilon" => self.epsilon = Some(value),
            "delta" => self.delta = Some(value),
            "score" => self.score = Some(value),
            _ => {}
        }
    }
}

impl EventVisitor {
    fn record_string(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "score_type" => self.score_type = Some(value),
            "operators" => self.operators = Some(value),
            "operator" => self.operator = Some(value),
            "validation" => self.validation = Some(value),
            "reason" => self.reason = Some(value),
            _ => {}
        }
    }
}

fn format_search_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("search_start") => format_search_start(v),
        Some("step") => format_step(v),
        Some("search_end") => format_search_end(v),
        _ => String::new(),
    }
}

fn format_search_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} search started: nodes ({}), score ({}), operators ({}), max indegree ({}), max iters ({}), epsilon ({}), patience ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[HillClimbing]".bright_cyan(),
        v.nodes.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        v.score_type.as_deref().unwrap_or("N/A").white().bold(),
        v.operators.as_deref().unwrap_or("N/A").white(),
        format_limit(v.max_indegree.unwrap_or(0)).yellow(),
        format_limit(v.max_iters.unwrap_or(0)).yellow(),
        v.epsilon.unwrap_or(0.0).yellow(),
        v.patience.unwrap_or(0).yellow(),
    )
}

fn format_step(v: &EventVisitor) -> String {
    let mut output = format!(
        "    {} Step {:>7} | {} delta ({}) score ({})",
        "->".bright_blue(),
        v.iteration.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.operator.as_deref().unwrap_or("?"),
        format_delta(v.delta.unwrap_or(0.0)),
        format_score(v.score),
    );
    if let Some(validation) = v.validation.as_deref().and_then(parse_optional) {
        output.push_str(&format!(" validation ({})", format_score(Some(validation))));
    }
    output
}

fn format_search_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} search ended ({}): steps ({}), score evaluations ({}), best score ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[HillClimbing]".bright_cyan(),
        v.reason.as_deref().unwrap_or("unknown").white().bold(),
        v.iterations.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.evaluations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        format_score(v.score),
    );
    if let Some(validation) = v.validation.as_deref().and_then(parse_optional) {
        output.push_str(&format!(
            ", best validation score ({})",
            format_score(Some(validation))
        ));
    }
    output
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_limit(limit: u64) -> String {
    if limit == 0 {
        "unbounded".to_string()
    } else {
        limit.to_formatted_string(&Locale::en)
    }
}

fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{delta:.4}").bright_green().to_string()
    } else {
        format!("{delta:.4}").yellow().to_string()
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.is_finite() => format!("{s:.4}").white().bold().to_string(),
        Some(s) => format!("{s}").bright_red().to_string(),
        None => "N/A".white().to_string(),
    }
}

/// Parses the debug rendering of an `Option<f64>`.
fn parse_optional(s: &str) -> Option<f64> {
    s.strip_prefix("Some(")
        .and_then(|rest| rest.strip_suffix(')'))
        .and_then(|inner| inner.parse().ok())
}
