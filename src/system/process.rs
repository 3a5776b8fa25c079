/// One row of the process table, fully derived at collection time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Resolved user name, or the raw uid when passwd has no entry.
    pub user: String,
    pub command: String,
    /// Display label like `204MB`; empty for kernel threads.
    pub ram_label: String,
    /// Numeric VmSize for sorting; 0 for kernel threads.
    pub ram_kb: u64,
    /// Lifetime share of CPU for this process, 0..100 (and beyond on
    /// multi-core hogs).
    pub cpu_percent: f64,
    /// Age in seconds: system uptime minus process start time.
    pub uptime_secs: u64,
}

impl ProcessInfo {
    /// Case-insensitive substring match against command and user.
    /// `needle_lower` must already be lowercased.
    pub fn matches_filter(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.command.to_lowercase().contains(needle_lower)
            || self.user.to_lowercase().contains(needle_lower)
    }
}
