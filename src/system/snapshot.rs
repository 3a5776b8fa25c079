use super::process::ProcessInfo;

/// Everything one refresh tick derives from /proc. Ratios are fractions in
/// [0,1]; the UI turns them into percentages.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    pub os_name: String,
    pub kernel: String,
    pub uptime_secs: u64,
    pub memory_utilization: f64,
    pub cpu_utilization: f64,
    pub total_processes: u64,
    pub running_processes: u64,
    pub processes: Vec<ProcessInfo>,
}
