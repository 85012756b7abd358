use std::path::Path;

use berth_core::{ClusterSnapshot, Node, SchedulerConfig, WorkloadRequest};
use berth_scheduler::Scheduler;
use tracing::info;

pub fn select(
    config: &SchedulerConfig,
    cluster: &Path,
    request: &Path,
    format: &str,
) -> anyhow::Result<String> {
    let snapshot = ClusterSnapshot::from_file(cluster)?;
    let request = WorkloadRequest::from_file(request)?;
    let scheduler = Scheduler::from_config(config)?;

    let ranked = scheduler.select_nodes_for_container(&snapshot.nodes, &request)?;
    info!(
        workload = request.id(),
        candidates = snapshot.nodes.len(),
        eligible = ranked.len(),
        "selection complete"
    );

    match format {
        "json" => format_json(&ranked),
        _ => Ok(format_text(&ranked)),
    }
}

fn format_json(ranked: &[&Node]) -> anyhow::Result<String> {
    let rows: Vec<_> = ranked
        .iter()
        .enumerate()
        .map(|(i, node)| {
            serde_json::json!({
                "rank": i + 1,
                "id": node.id,
                "name": node.name,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn format_text(ranked: &[&Node]) -> String {
    let mut out = format!(
        "{:<5} {:<20} {:<20} {:>13} {:>21} {:>7} {:>9}",
        "RANK", "ID", "NAME", "CPU", "MEMORY", "HEALTH", "WORKLOADS"
    );
    for (i, node) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "\n{:<5} {:<20} {:<20} {:>13} {:>21} {:>7} {:>9}",
            i + 1,
            node.id,
            node.name,
            format!("{}/{}", node.used_cpus, node.total_cpus),
            format!("{}/{}", node.used_memory, node.total_memory),
            node.health_indicator,
            node.container_count(),
        ));
    }
    out
}
