use tracing::{debug, warn};

use super::process::ProcessInfo;
use super::procfs::{ProcReader, Result};
use super::snapshot::SystemSnapshot;

/// Builds a fresh [`SystemSnapshot`] per refresh tick. Nothing is cached
/// between ticks; a failed read degrades that one value (or skips that one
/// process) and never aborts the pass.
pub struct Collector {
    reader: ProcReader,
    show_kernel_threads: bool,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(ProcReader::new(), false)
    }
}

impl Collector {
    pub fn new(reader: ProcReader, show_kernel_threads: bool) -> Self {
        Collector {
            reader,
            show_kernel_threads,
        }
    }

    pub fn reader(&self) -> &ProcReader {
        &self.reader
    }

    pub fn refresh(&mut self) -> SystemSnapshot {
        let _span = tracing::debug_span!("collector.refresh").entered();

        let uptime_secs = self.field("uptime", self.reader.uptime());
        let mut snapshot = SystemSnapshot {
            os_name: self.field("os_name", self.reader.operating_system()),
            kernel: self.field("kernel", self.reader.kernel()),
            uptime_secs,
            memory_utilization: self.field("memory", self.reader.memory_utilization()),
            cpu_utilization: self.field("cpu", self.reader.cpu_utilization()),
            total_processes: self.field("processes", self.reader.total_processes()),
            running_processes: self.field("procs_running", self.reader.running_processes()),
            processes: Vec::new(),
        };

        let pids = match self.reader.pids() {
            Ok(pids) => pids,
            Err(err) => {
                warn!(%err, "process enumeration failed");
                Vec::new()
            }
        };

        for pid in pids {
            match self.collect_process(pid, uptime_secs) {
                Ok(Some(info)) => snapshot.processes.push(info),
                // Kernel thread, hidden by config.
                Ok(None) => {}
                Err(err) if err.is_vanished() => debug!(pid, "process exited mid-scan"),
                Err(err) => debug!(pid, %err, "skipping unreadable process"),
            }
        }

        snapshot
    }

    fn field<T: Default>(&self, name: &'static str, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                debug!(field = name, %err, "metric unavailable, using default");
                T::default()
            }
        }
    }

    fn collect_process(&self, pid: u32, uptime_secs: u64) -> Result<Option<ProcessInfo>> {
        let vm_size_kb = self.reader.vm_size_kb(pid)?;
        if vm_size_kb.is_none() && !self.show_kernel_threads {
            return Ok(None);
        }

        let uid = self.reader.uid(pid)?;
        let user = self.reader.resolve_user(&uid)?.unwrap_or(uid);
        let command = self.reader.command(pid)?;
        let start = self.reader.start_time_secs(pid)?;
        let cpu_percent = self.reader.process_cpu_percent(pid)?;

        let ram_kb = vm_size_kb.unwrap_or(0);
        let ram_label = vm_size_kb
            .map(|kb| format!("{}MB", kb / 1000))
            .unwrap_or_default();

        Ok(Some(ProcessInfo {
            pid,
            user,
            command,
            ram_label,
            ram_kb,
            cpu_percent,
            uptime_secs: uptime_secs.saturating_sub(start),
        }))
    }
}
