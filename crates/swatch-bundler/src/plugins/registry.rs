//! Phase-ordered plugin registry.

use std::time::Instant;

use super::{BuildContext, Plugin, PluginDescriptor, PluginPhase, PluginReport};
use crate::error::Result;

/// Result of running one plugin's `write_bundle` step.
#[derive(Debug)]
pub struct PluginOutcome {
    pub name: &'static str,
    pub phase: PluginPhase,
    pub result: Result<PluginReport>,
}

/// Plugins kept in registration order and run in phase order.
pub struct PluginRegistry {
    plugins: Vec<(PluginPhase, Box<dyn Plugin>)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn add<P: Plugin + 'static>(&mut self, plugin: P) {
        let phase = plugin.phase();
        self.plugins.push((phase, Box::new(plugin)));
    }

    /// Drop every plugin called `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.plugins.retain(|(_, plugin)| plugin.name() != name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|(_, plugin)| plugin.name() == name)
    }

    /// Plugins sorted by phase. The sort is stable, so registration order
    /// decides within a phase.
    pub fn ordered(&self) -> Vec<&dyn Plugin> {
        let mut plugins: Vec<_> = self.plugins.iter().collect();
        plugins.sort_by_key(|(phase, _)| *phase);
        plugins.into_iter().map(|(_, plugin)| plugin.as_ref()).collect()
    }

    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        self.ordered()
            .into_iter()
            .map(|plugin| PluginDescriptor {
                name: plugin.name(),
                phase: plugin.phase(),
            })
            .collect()
    }

    /// Run every plugin's post-write step.
    ///
    /// A failing plugin is reported and does not stop the ones after it.
    pub fn write_bundle(&self, ctx: &BuildContext<'_>) -> Vec<PluginOutcome> {
        self.ordered()
            .into_iter()
            .map(|plugin| {
                let start = Instant::now();
                let result = plugin.write_bundle(ctx);
                match &result {
                    Ok(report) => tracing::debug!(
                        plugin = plugin.name(),
                        written = report.written,
                        removed = report.removed,
                        failed = report.failed,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "plugin finished"
                    ),
                    Err(err) => tracing::warn!("plugin '{}' failed: {}", plugin.name(), err),
                }
                PluginOutcome {
                    name: plugin.name(),
                    phase: plugin.phase(),
                    result,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
