pub mod explain;
pub mod select;

use std::path::Path;

use berth_core::SchedulerConfig;
use tracing::debug;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<SchedulerConfig> {
    match path {
        Some(path) => {
            let config = SchedulerConfig::from_file(path)?;
            debug!(path = %path.display(), "loaded scheduler config");
            Ok(config)
        }
        None => Ok(SchedulerConfig::default()),
    }
}
