use std::env;

use crate::model::{Command, NodeCore};
use crate::resolver::ParseError;

/// The validation & defaults pass.
///
/// Runs once over every node reachable along the matched scope chain, after
/// consumption. For each untouched node: the environment fallback is consulted
/// first (through the same conversion contract), then the declared default is
/// applied, and finally still-unset required nodes are collected into one
/// batched error. Defaults never participate in matching itself.
pub(crate) fn finalize(scopes: &[&Command]) -> Result<(), ParseError> {
    let mut missing: Vec<String> = Vec::default();

    for scope in scopes {
        for core in scope
            .flags
            .iter()
            .map(|flag| &flag.core)
            .chain(scope.positionals.iter().map(|positional| &positional.core))
        {
            finalize_node(core, &mut missing)?;
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MissingRequired { names: missing })
    }
}

fn finalize_node(core: &NodeCore, missing: &mut Vec<String>) -> Result<(), ParseError> {
    if !core.touched() {
        if let Some(variable) = &core.env {
            if let Ok(value) = env::var(variable) {
                core.set(&value).map_err(|source| ParseError::Conversion {
                    name: core.name.clone(),
                    source,
                })?;
            }
        }
    }

    // Applying a default counts as an occurrence, so a second pass (or an
    // accumulating destination) sees the node as touched.
    if !core.touched() {
        if let Some(default) = &core.default {
            core.set(default).map_err(|source| ParseError::Conversion {
                name: core.name.clone(),
                source,
            })?;
        } else if core.required {
            missing.push(core.name.clone());
        }
    }

    Ok(())
}
