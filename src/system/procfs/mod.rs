//! Readers for the Linux /proc pseudo-filesystem and /etc lookup tables.
//!
//! [`ProcReader`] is the data-acquisition seam of the crate: every query
//! opens the backing file, decodes it, and returns, with no state carried
//! between calls. The filesystem roots and the clock-tick rate are
//! injectable so the whole surface can be exercised against fixture trees.

pub mod parser;

pub use parser::{CpuTimes, MemInfo, ParseError, PidStat};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_ETC_ROOT: &str = "/etc";

const FALLBACK_CLOCK_TICKS: u64 = 100;

#[derive(Debug, Error)]
pub enum ProcError {
    #[error("{}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl ProcError {
    /// True when the backing file disappeared, which for per-process files
    /// means the process exited between enumeration and the read. Callers
    /// skip the process for the current refresh instead of failing the pass.
    pub fn is_vanished(&self) -> bool {
        matches!(
            self,
            ProcError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcError>;

/// Clock ticks per second from the running kernel, used for every
/// jiffy-to-second conversion so uptime and start times share a time base.
fn system_clock_ticks() -> u64 {
    // SAFETY: sysconf takes a constant and touches no caller memory.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as u64
    } else {
        FALLBACK_CLOCK_TICKS
    }
}

#[derive(Debug, Clone)]
pub struct ProcReader {
    proc_root: PathBuf,
    etc_root: PathBuf,
    ticks_per_second: u64,
}

impl Default for ProcReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcReader {
    pub fn new() -> Self {
        Self::with_roots(DEFAULT_PROC_ROOT, DEFAULT_ETC_ROOT)
    }

    /// Reader over alternate roots, e.g. a fixture tree in tests or a
    /// mounted guest image.
    pub fn with_roots(proc_root: impl Into<PathBuf>, etc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            etc_root: etc_root.into(),
            ticks_per_second: system_clock_ticks(),
        }
    }

    pub fn with_clock_ticks(mut self, ticks_per_second: u64) -> Self {
        self.ticks_per_second = ticks_per_second.max(1);
        self
    }

    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    fn read(&self, path: PathBuf) -> Result<String> {
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(source) => Err(ProcError::Read { path, source }),
        }
    }

    fn pid_path(&self, pid: u32, file: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(file)
    }

    fn parsed<T>(path: PathBuf, result: std::result::Result<T, ParseError>) -> Result<T> {
        result.map_err(|source| ProcError::Parse { path, source })
    }

    /// `PRETTY_NAME` of os-release, quotes stripped.
    pub fn operating_system(&self) -> Result<String> {
        let path = self.etc_root.join("os-release");
        let content = self.read(path.clone())?;
        Self::parsed(path, parser::pretty_name(&content))
    }

    /// Kernel release string from /proc/version.
    pub fn kernel(&self) -> Result<String> {
        let path = self.proc_root.join("version");
        let content = self.read(path.clone())?;
        Self::parsed(path, parser::kernel_version(&content))
    }

    /// Seconds since boot, truncated to whole seconds.
    pub fn uptime(&self) -> Result<u64> {
        let path = self.proc_root.join("uptime");
        let content = self.read(path.clone())?;
        Ok(Self::parsed(path, parser::uptime_seconds(&content))? as u64)
    }

    /// Fraction of memory in use, in [0,1].
    pub fn memory_utilization(&self) -> Result<f64> {
        let path = self.proc_root.join("meminfo");
        let content = self.read(path.clone())?;
        Ok(Self::parsed(path, parser::meminfo(&content))?.utilization())
    }

    /// System-wide CPU busy fraction in [0,1], computed over the cumulative
    /// tick counters since boot rather than a sampling-window delta.
    pub fn cpu_utilization(&self) -> Result<f64> {
        let path = self.proc_root.join("stat");
        let content = self.read(path.clone())?;
        Ok(Self::parsed(path, parser::cpu_times(&content))?.utilization())
    }

    pub fn total_processes(&self) -> Result<u64> {
        self.stat_counter("processes")
    }

    pub fn running_processes(&self) -> Result<u64> {
        self.stat_counter("procs_running")
    }

    fn stat_counter(&self, key: &'static str) -> Result<u64> {
        let path = self.proc_root.join("stat");
        let content = self.read(path.clone())?;
        Self::parsed(path, parser::stat_counter(&content, key))
    }

    /// Currently-active process ids: the purely-numeric entries under the
    /// proc root, in directory order. A pid may already be gone by the time
    /// it is queried; per-process reads report that as a vanished error.
    pub fn pids(&self) -> Result<Vec<u32>> {
        let entries = fs::read_dir(&self.proc_root).map_err(|source| ProcError::Read {
            path: self.proc_root.clone(),
            source,
        })?;
        let mut pids = Vec::new();
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str()
                && !name.is_empty()
                && name.bytes().all(|b| b.is_ascii_digit())
                && let Ok(pid) = name.parse::<u32>()
            {
                pids.push(pid);
            }
        }
        Ok(pids)
    }

    /// Full command line. Argv entries in cmdline are NUL-separated; they
    /// come back joined with single spaces. Kernel threads have an empty
    /// cmdline and yield an empty string.
    pub fn command(&self, pid: u32) -> Result<String> {
        let path = self.pid_path(pid, "cmdline");
        let bytes = fs::read(&path).map_err(|source| ProcError::Read { path, source })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text
            .split('\0')
            .filter(|arg| !arg.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// `VmSize` in kilobytes, `None` for kernel threads (no VmSize line).
    pub fn vm_size_kb(&self, pid: u32) -> Result<Option<u64>> {
        let path = self.pid_path(pid, "status");
        let content = self.read(path.clone())?;
        match parser::status_value(&content, "VmSize") {
            None => Ok(None),
            Some(value) => match value.parse() {
                Ok(kb) => Ok(Some(kb)),
                Err(_) => Err(ProcError::Parse {
                    path,
                    source: ParseError::InvalidField {
                        field: "VmSize",
                        value: value.to_string(),
                    },
                }),
            },
        }
    }

    /// Resident size label in the monitor's display unit: kilobytes divided
    /// by 1000 and suffixed `MB`, e.g. `VmSize: 204800 kB` -> `204MB`.
    pub fn ram(&self, pid: u32) -> Result<Option<String>> {
        Ok(self
            .vm_size_kb(pid)?
            .map(|kb| format!("{}MB", kb / 1000)))
    }

    /// Real uid as the raw numeric token from the status record.
    pub fn uid(&self, pid: u32) -> Result<String> {
        let path = self.pid_path(pid, "status");
        let content = self.read(path.clone())?;
        match parser::status_value(&content, "Uid") {
            Some(uid) => Ok(uid.to_string()),
            None => Err(ProcError::Parse {
                path,
                source: ParseError::MissingKey("Uid"),
            }),
        }
    }

    /// Owning user name resolved against the passwd table; `None` when the
    /// uid has no entry there.
    pub fn user(&self, pid: u32) -> Result<Option<String>> {
        let uid = self.uid(pid)?;
        self.resolve_user(&uid)
    }

    pub fn resolve_user(&self, uid: &str) -> Result<Option<String>> {
        let path = self.etc_root.join("passwd");
        let content = self.read(path)?;
        Ok(parser::passwd_user(&content, uid))
    }

    /// Process start time in seconds since boot (stat field 21 over the
    /// clock-tick rate). Same time base as [`Self::uptime`], so
    /// `uptime() - start_time_secs(pid)` is the process age.
    pub fn start_time_secs(&self, pid: u32) -> Result<u64> {
        Ok(self.pid_stat(pid)?.starttime / self.ticks_per_second)
    }

    /// Share of its lifetime this process has spent on CPU, as a percentage.
    /// Computed in floating point; a process started this very second reads
    /// as 0.0 rather than dividing by a zero age.
    pub fn process_cpu_percent(&self, pid: u32) -> Result<f64> {
        let stat = self.pid_stat(pid)?;
        let uptime = self.uptime()?;
        let start = stat.starttime / self.ticks_per_second;
        let seconds = uptime.saturating_sub(start);
        if seconds == 0 {
            return Ok(0.0);
        }
        let busy_seconds = stat.total_ticks() as f64 / self.ticks_per_second as f64;
        Ok(100.0 * busy_seconds / seconds as f64)
    }

    pub fn pid_stat(&self, pid: u32) -> Result<PidStat> {
        let path = self.pid_path(pid, "stat");
        let content = self.read(path.clone())?;
        Self::parsed(path, parser::pid_stat(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_classification() {
        let reader = ProcReader::with_roots("/nonexistent-proc", "/nonexistent-etc");
        let err = reader.command(1).unwrap_err();
        assert!(err.is_vanished());
    }

    #[test]
    fn parse_errors_are_not_vanished() {
        let err = ProcError::Parse {
            path: PathBuf::from("/proc/1/stat"),
            source: ParseError::MissingKey("Uid"),
        };
        assert!(!err.is_vanished());
    }

    #[test]
    fn clock_ticks_never_zero() {
        let reader = ProcReader::new().with_clock_ticks(0);
        assert_eq!(reader.ticks_per_second(), 1);
        assert!(ProcReader::new().ticks_per_second() > 0);
    }
}
