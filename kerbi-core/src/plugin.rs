//! Registry for all council plugins and their ports.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{CouncilId, CouncilMeta};
use crate::ports::{AddressPort, PortError, SchedulePort};

/// Collection of ports implementing a provider for a single council.
pub struct CouncilPlugin {
    /// Static metadata describing the council.
    pub meta: CouncilMeta,
    /// Implementation for searching addresses.
    pub address_port: Arc<dyn AddressPort>,
    /// Implementation for fetching collection schedules.
    pub schedule_port: Arc<dyn SchedulePort>,
}

/// Registry that resolves plugins by council identifier.
pub struct PluginRegistry {
    plugins: HashMap<CouncilId, CouncilPlugin>,
}

impl PluginRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<CouncilPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered councils.
    #[must_use]
    pub fn councils(&self) -> Vec<CouncilMeta> {
        self.plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect()
    }

    /// Iterator over council metadata.
    pub fn councils_iter(&self) -> impl Iterator<Item = &CouncilMeta> {
        self.plugins.values().map(|plugin| &plugin.meta)
    }

    /// Look up a plugin for the given council.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedCouncil`] when no plugin is registered.
    pub fn plugin(&self, council: &CouncilId) -> Result<&CouncilPlugin, PortError> {
        self.plugins
            .get(council)
            .ok_or(PortError::UnsupportedCouncil)
    }
}
