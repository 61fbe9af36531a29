//! Component-graph resolution
//!
//! Turns a parsed [`Config`] into a runnable [`Graph`] in two passes:
//!
//! 1. Instantiate everything. Senders and receivers receive shared,
//!    unresolved name references for their downstreams.
//! 2. Back-fill every reference with its concrete instance.
//!
//! Anything still unresolved after pass 2 is a fatal configuration error.
//! Reference cycles between senders are allowed (back-fill makes them
//! well-defined) but almost always an operator mistake, so they are
//! logged as feedback-loop warnings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use sluice_core::{JsonParser, Parser, RefTable, Sender};
use sluice_pipeline::{Handler, HandlerTable};
use sluice_transform::{Chain, Transformer};

use crate::{Config, ConfigError, Graph, RawOptions, Registries, Result};

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;

pub(crate) fn build(config: &Config, registries: &Registries) -> Result<Graph> {
    let sender_refs = RefTable::new();
    let handler_refs = HandlerTable::new();

    let mut transformers: HashMap<String, Arc<dyn Transformer>> = HashMap::new();
    for (name, entry) in &config.transformers {
        let transformer = registries
            .transformers
            .create(&entry.kind, &entry.options)
            .map_err(|source| ConfigError::Transformer {
                name: name.clone(),
                source,
            })?;
        transformers.insert(name.clone(), transformer);
    }

    let mut senders: HashMap<String, Arc<dyn Sender>> = HashMap::new();
    for (name, entry) in &config.senders {
        let sender = registries
            .senders
            .create(&entry.kind, &entry.options, &sender_refs)
            .map_err(|source| ConfigError::Sender {
                name: name.clone(),
                source,
            })?;
        senders.insert(name.clone(), sender);
    }

    let mut handlers: HashMap<String, Arc<Handler>> = HashMap::new();
    for (name, entry) in &config.handlers {
        let parser: Arc<dyn Parser> = match entry.parser.as_str() {
            "json" => Arc::new(JsonParser),
            other => {
                return Err(ConfigError::UnknownParser {
                    handler: name.clone(),
                    parser: other.to_string(),
                });
            }
        };

        let mut chain = Vec::with_capacity(entry.transformers.len());
        for transformer_name in &entry.transformers {
            // The templater has no settings and may be referenced without
            // being defined.
            if transformer_name == "templater" && !transformers.contains_key(transformer_name) {
                let templater = registries
                    .transformers
                    .create("templater", &RawOptions::new())
                    .map_err(|source| ConfigError::Transformer {
                        name: transformer_name.clone(),
                        source,
                    })?;
                transformers.insert(transformer_name.clone(), templater);
            }
            let Some(transformer) = transformers.get(transformer_name) else {
                return Err(ConfigError::UnknownTransformer {
                    handler: name.clone(),
                    transformer: transformer_name.clone(),
                });
            };
            chain.push(Arc::clone(transformer));
        }

        let sender = sender_refs.get(&entry.sender);
        handlers.insert(
            name.clone(),
            Arc::new(Handler::new(parser, Chain::new(chain), sender)),
        );
    }

    let mut receivers = HashMap::new();
    for (name, entry) in &config.receivers {
        let receiver = registries
            .receivers
            .create(&entry.kind, &entry.options, &handler_refs)
            .map_err(|source| ConfigError::Receiver {
                name: name.clone(),
                source,
            })?;
        receivers.insert(name.clone(), receiver);
    }

    // Pass 2: back-fill the name references handed out above.
    for (name, sender) in &senders {
        sender_refs.resolve(name, Arc::clone(sender));
    }
    for (name, handler) in &handlers {
        handler_refs.resolve(name, Arc::clone(handler));
    }

    let unresolved = sender_refs.unresolved();
    if !unresolved.is_empty() {
        return Err(ConfigError::UnresolvedSenders {
            names: unresolved.join(", "),
        });
    }
    let unresolved = handler_refs.unresolved();
    if !unresolved.is_empty() {
        return Err(ConfigError::UnresolvedHandlers {
            names: unresolved.join(", "),
        });
    }

    warn_on_feedback_loops(config);

    Ok(Graph {
        receivers,
        handlers,
        senders,
    })
}

/// Names referenced by a sender entry's `next` option.
fn next_references(options: &RawOptions) -> Vec<&str> {
    match options.get("next") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Warn about sender reference cycles.
///
/// Cycles are valid at the reference level; it is up to the operator to
/// avoid actual feedback loops.
fn warn_on_feedback_loops(config: &Config) {
    let edges: HashMap<&str, Vec<&str>> = config
        .senders
        .iter()
        .map(|(name, entry)| (name.as_str(), next_references(&entry.options)))
        .collect();

    let mut done: HashSet<&str> = HashSet::new();
    for start in edges.keys().copied() {
        if done.contains(start) {
            continue;
        }
        let mut trail: Vec<&str> = Vec::new();
        let mut on_trail: HashSet<&str> = HashSet::new();
        visit(start, &edges, &mut trail, &mut on_trail, &mut done);
    }
}

fn visit<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    trail: &mut Vec<&'a str>,
    on_trail: &mut HashSet<&'a str>,
    done: &mut HashSet<&'a str>,
) {
    if on_trail.contains(node) {
        let start = trail.iter().position(|n| *n == node).unwrap_or(0);
        tracing::warn!(
            cycle = %trail[start..].join(" -> "),
            sender = node,
            "sender references form a feedback loop"
        );
        return;
    }
    if done.contains(node) {
        return;
    }
    done.insert(node);
    trail.push(node);
    on_trail.insert(node);
    if let Some(targets) = edges.get(node) {
        for target in targets {
            visit(target, edges, trail, on_trail, done);
        }
    }
    on_trail.remove(node);
    trail.pop();
}
