use std::path::Path;

use berth_core::{SchedulerConfig, WorkloadRequest};
use berth_scheduler::Scheduler;

pub fn explain(config: &SchedulerConfig, request: &Path) -> anyhow::Result<String> {
    let request = WorkloadRequest::from_file(request)?;
    let scheduler = Scheduler::from_config(config)?;

    let mut out = format!(
        "strategy: {}\nfilters:  {}",
        scheduler.strategy(),
        scheduler.filters()
    );
    for (filter, exprs) in scheduler.describe_filters(&request)? {
        out.push_str(&format!("\n  {filter}: {}", exprs.join(", ")));
    }
    Ok(out)
}
