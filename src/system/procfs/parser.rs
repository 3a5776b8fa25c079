//! Pure parsers for the /proc record formats.
//!
//! Everything here takes a string and returns typed data, so each format can
//! be unit-tested without touching a real filesystem. File access and path
//! context live in [`super::ProcReader`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("insufficient fields: expected at least {expected}, got {got}")]
    InsufficientFields { expected: usize, got: usize },
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("missing key {0:?}")]
    MissingKey(&'static str),
}

fn numeric<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Extracts `PRETTY_NAME` from os-release style `KEY="value"` lines.
/// Quoting is stripped; embedded spaces survive.
pub fn pretty_name(content: &str) -> Result<String, ParseError> {
    for line in content.lines() {
        if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
            return Ok(value.trim().trim_matches('"').to_string());
        }
    }
    Err(ParseError::MissingKey("PRETTY_NAME"))
}

/// Third whitespace token of /proc/version (`<os> <version> <kernel> ...`).
pub fn kernel_version(content: &str) -> Result<String, ParseError> {
    let mut tokens = content.split_whitespace();
    let got = [tokens.next(), tokens.next(), tokens.next()];
    match got[2] {
        Some(kernel) => Ok(kernel.to_string()),
        None => Err(ParseError::InsufficientFields {
            expected: 3,
            got: got.iter().flatten().count(),
        }),
    }
}

/// First field of /proc/uptime (`<uptime> <idletime>`, floating-point seconds).
pub fn uptime_seconds(content: &str) -> Result<f64, ParseError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or(ParseError::InsufficientFields {
            expected: 1,
            got: 0,
        })?;
    numeric("uptime", first)
}

/// The two /proc/meminfo keys the utilization formula needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MemInfo {
    /// Fraction of memory in use, `(total - free) / total` in [0,1].
    /// A zero total reads as zero utilization rather than dividing by it.
    pub fn utilization(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        self.total_kb.saturating_sub(self.free_kb) as f64 / self.total_kb as f64
    }
}

/// First value token of a single `Key:    <value> ...` line, if the key matches.
fn keyed_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)?
        .strip_prefix(':')?
        .split_whitespace()
        .next()
}

/// Scans `Key:    <value> kB` lines for `MemTotal` and `MemFree`.
pub fn meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut total_kb = None;
    let mut free_kb = None;
    for line in content.lines() {
        if let Some(value) = keyed_value(line, "MemTotal") {
            total_kb = Some(numeric::<u64>("MemTotal", value)?);
        } else if let Some(value) = keyed_value(line, "MemFree") {
            free_kb = Some(numeric::<u64>("MemFree", value)?);
        }
        if total_kb.is_some() && free_kb.is_some() {
            break;
        }
    }
    Ok(MemInfo {
        total_kb: total_kb.ok_or(ParseError::MissingKey("MemTotal"))?,
        free_kb: free_kb.ok_or(ParseError::MissingKey("MemFree"))?,
    })
}

/// Aggregate CPU tick counters from the first `cpu` line of /proc/stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Ticks counted as busy: user + nice + system.
    /// irq/softirq/steal sit in neither the busy nor the idle total.
    pub fn busy(&self) -> u64 {
        self.user + self.nice + self.system
    }

    /// Ticks counted as idle: idle + iowait.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    /// `busy / (busy + idle)` over the cumulative counters since boot.
    /// This is a lifetime ratio, not a sampling-window delta.
    pub fn utilization(&self) -> f64 {
        let busy = self.busy();
        let denom = busy + self.idle_total();
        if denom == 0 {
            return 0.0;
        }
        busy as f64 / denom as f64
    }
}

/// Parses the aggregate `cpu  <counters...>` line of /proc/stat.
pub fn cpu_times(content: &str) -> Result<CpuTimes, ParseError> {
    let line = content
        .lines()
        .find(|line| line.strip_prefix("cpu").is_some_and(|rest| rest.starts_with(' ')))
        .ok_or(ParseError::MissingKey("cpu"))?;

    let fields: Vec<&str> = line.split_whitespace().skip(1).collect();
    if fields.len() < 5 {
        return Err(ParseError::InsufficientFields {
            expected: 5,
            got: fields.len(),
        });
    }

    let field = |idx: usize, name: &'static str| -> Result<u64, ParseError> {
        match fields.get(idx) {
            Some(value) => numeric(name, value),
            None => Ok(0),
        }
    };

    Ok(CpuTimes {
        user: field(0, "user")?,
        nice: field(1, "nice")?,
        system: field(2, "system")?,
        idle: field(3, "idle")?,
        iowait: field(4, "iowait")?,
        irq: field(5, "irq")?,
        softirq: field(6, "softirq")?,
        steal: field(7, "steal")?,
    })
}

/// Looks up a single-value counter line of /proc/stat, e.g. `processes 4242`.
pub fn stat_counter(content: &str, key: &'static str) -> Result<u64, ParseError> {
    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(key) {
            let value = tokens.next().ok_or(ParseError::InsufficientFields {
                expected: 2,
                got: 1,
            })?;
            return numeric(key, value);
        }
    }
    Err(ParseError::MissingKey(key))
}

/// The /proc/[pid]/stat fields the per-process derivations need, all in
/// clock ticks. Field numbers below are whole-line positions (pid = 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PidStat {
    /// Field 13: time in user mode.
    pub utime: u64,
    /// Field 14: time in kernel mode.
    pub stime: u64,
    /// Field 15: waited-for children's user time (signed per proc(5)).
    pub cutime: i64,
    /// Field 16: waited-for children's kernel time.
    pub cstime: i64,
    /// Field 21: start time since boot.
    pub starttime: u64,
}

impl PidStat {
    pub fn total_ticks(&self) -> u64 {
        self.utime + self.stime + self.cutime.max(0) as u64 + self.cstime.max(0) as u64
    }
}

// Positions relative to the token after the comm field, where state = 0.
const AFTER_COMM_UTIME: usize = 11;
const AFTER_COMM_STIME: usize = 12;
const AFTER_COMM_CUTIME: usize = 13;
const AFTER_COMM_CSTIME: usize = 14;
const AFTER_COMM_STARTTIME: usize = 19;
const AFTER_COMM_MIN_FIELDS: usize = 20;

/// Parses /proc/[pid]/stat. The comm field may contain spaces and
/// parentheses, so positional splitting starts after the last `)`.
/// Short records are an error, never an out-of-bounds access.
pub fn pid_stat(content: &str) -> Result<PidStat, ParseError> {
    let after_comm = content
        .rfind(')')
        .ok_or(ParseError::InvalidField {
            field: "comm",
            value: content.chars().take(32).collect(),
        })?
        + 1;
    let fields: Vec<&str> = content[after_comm..].split_whitespace().collect();
    if fields.len() < AFTER_COMM_MIN_FIELDS {
        return Err(ParseError::InsufficientFields {
            expected: AFTER_COMM_MIN_FIELDS,
            got: fields.len(),
        });
    }

    Ok(PidStat {
        utime: numeric("utime", fields[AFTER_COMM_UTIME])?,
        stime: numeric("stime", fields[AFTER_COMM_STIME])?,
        cutime: numeric("cutime", fields[AFTER_COMM_CUTIME])?,
        cstime: numeric("cstime", fields[AFTER_COMM_CSTIME])?,
        starttime: numeric("starttime", fields[AFTER_COMM_STARTTIME])?,
    })
}

/// First value token of a `Key:\tvalue ...` line in /proc/[pid]/status.
pub fn status_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix(key)
            && let Some(values) = rest.strip_prefix(':')
        {
            return values.split_whitespace().next();
        }
    }
    None
}

/// Resolves a numeric uid against passwd-format lines (`name:x:id:...`).
pub fn passwd_user(content: &str, uid: &str) -> Option<String> {
    for line in content.lines() {
        let mut fields = line.split(':');
        let name = fields.next()?;
        let _password = fields.next();
        if fields.next() == Some(uid) {
            return Some(name.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OS_RELEASE: &str = r#"NAME="Ubuntu"
VERSION="22.04.3 LTS (Jammy Jellyfish)"
ID=ubuntu
PRETTY_NAME="Ubuntu 22.04.3 LTS"
HOME_URL="https://www.ubuntu.com/"
"#;

    #[test]
    fn pretty_name_keeps_embedded_spaces() {
        assert_eq!(pretty_name(OS_RELEASE).unwrap(), "Ubuntu 22.04.3 LTS");
    }

    #[test]
    fn pretty_name_missing_key() {
        assert_eq!(
            pretty_name("ID=alpine\n"),
            Err(ParseError::MissingKey("PRETTY_NAME"))
        );
    }

    #[test]
    fn kernel_is_third_token() {
        let line = "Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) ...";
        assert_eq!(kernel_version(line).unwrap(), "6.1.0-18-amd64");
    }

    #[test]
    fn kernel_short_record() {
        assert_eq!(
            kernel_version("Linux version"),
            Err(ParseError::InsufficientFields {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn uptime_first_field() {
        let parsed = uptime_seconds("12345.67 98765.43\n").unwrap();
        assert!((parsed - 12345.67).abs() < f64::EPSILON);
    }

    #[test]
    fn uptime_rejects_garbage() {
        assert!(matches!(
            uptime_seconds("bogus 1.0"),
            Err(ParseError::InvalidField { field: "uptime", .. })
        ));
    }

    #[test]
    fn meminfo_strips_unit_suffix() {
        let content = "MemTotal:       16384000 kB\nMemFree:         4096000 kB\nBuffers: 1 kB\n";
        let info = meminfo(content).unwrap();
        assert_eq!(info.total_kb, 16_384_000);
        assert_eq!(info.free_kb, 4_096_000);
        assert!((info.utilization() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn meminfo_missing_key_is_explicit() {
        assert_eq!(
            meminfo("MemTotal: 100 kB\n"),
            Err(ParseError::MissingKey("MemFree"))
        );
    }

    #[test]
    fn meminfo_zero_total_guarded() {
        let info = MemInfo {
            total_kb: 0,
            free_kb: 0,
        };
        assert_eq!(info.utilization(), 0.0);
    }

    #[test]
    fn cpu_line_selects_aggregate_row() {
        let content = "cpu  4705 356 584 3699176 23060 0 277 0 0 0\n\
                       cpu0 1000 1 1 1 1 0 0 0 0 0\n\
                       processes 12345\n";
        let times = cpu_times(content).unwrap();
        assert_eq!(times.user, 4705);
        assert_eq!(times.nice, 356);
        assert_eq!(times.system, 584);
        assert_eq!(times.idle, 3_699_176);
        assert_eq!(times.iowait, 23060);
        assert_eq!(times.busy(), 4705 + 356 + 584);
        assert_eq!(times.idle_total(), 3_699_176 + 23060);
    }

    #[test]
    fn cpu_line_short_record() {
        assert_eq!(
            cpu_times("cpu  1 2 3\n"),
            Err(ParseError::InsufficientFields {
                expected: 5,
                got: 3
            })
        );
    }

    #[test]
    fn stat_counters() {
        let content = "cpu  1 2 3 4 5 6 7 8 9 10\nprocesses 4242\nprocs_running 3\n";
        assert_eq!(stat_counter(content, "processes").unwrap(), 4242);
        assert_eq!(stat_counter(content, "procs_running").unwrap(), 3);
        assert_eq!(
            stat_counter(content, "procs_blocked"),
            Err(ParseError::MissingKey("procs_blocked"))
        );
    }

    fn stat_line(comm: &str, utime: u64, stime: u64, starttime: u64) -> String {
        format!(
            "42 ({comm}) S 1 42 42 0 -1 4194560 1000 0 0 0 {utime} {stime} 0 0 20 0 1 0 {starttime} 10000000 500 18446744073709551615"
        )
    }

    #[test]
    fn pid_stat_positional_fields() {
        let stat = pid_stat(&stat_line("bash", 100, 50, 5000)).unwrap();
        assert_eq!(stat.utime, 100);
        assert_eq!(stat.stime, 50);
        assert_eq!(stat.cutime, 0);
        assert_eq!(stat.cstime, 0);
        assert_eq!(stat.starttime, 5000);
        assert_eq!(stat.total_ticks(), 150);
    }

    #[test]
    fn pid_stat_comm_with_spaces_and_parens() {
        let stat = pid_stat(&stat_line("tmux: server (1)", 7, 3, 99)).unwrap();
        assert_eq!(stat.utime, 7);
        assert_eq!(stat.starttime, 99);
    }

    #[test]
    fn pid_stat_short_record_is_defined_error() {
        assert!(matches!(
            pid_stat("42 (bash) S 1 42"),
            Err(ParseError::InsufficientFields { .. })
        ));
    }

    const STATUS: &str = "Name:\tbash\nUmask:\t0022\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\nVmSize:\t  204800 kB\n";

    #[test]
    fn status_value_first_token() {
        assert_eq!(status_value(STATUS, "VmSize"), Some("204800"));
        assert_eq!(status_value(STATUS, "Uid"), Some("1000"));
        assert_eq!(status_value(STATUS, "VmRSS"), None);
    }

    const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
                          daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n\
                          alice:x:1000:1000:Alice:/home/alice:/bin/zsh\n";

    #[test]
    fn passwd_lookup_round_trip() {
        assert_eq!(passwd_user(PASSWD, "0").as_deref(), Some("root"));
        assert_eq!(passwd_user(PASSWD, "1000").as_deref(), Some("alice"));
        assert_eq!(passwd_user(PASSWD, "4444"), None);
    }

    proptest! {
        #[test]
        fn memory_utilization_bounded_and_monotone(
            total in 1u64..=1u64 << 40,
            free_a in 0u64..=1u64 << 40,
            free_b in 0u64..=1u64 << 40,
        ) {
            let free_a = free_a.min(total);
            let free_b = free_b.min(total);
            let a = MemInfo { total_kb: total, free_kb: free_a }.utilization();
            let b = MemInfo { total_kb: total, free_kb: free_b }.utilization();
            prop_assert!((0.0..=1.0).contains(&a));
            // More memory in use never reads as lower utilization.
            if free_a <= free_b {
                prop_assert!(a >= b);
            }
        }

        #[test]
        fn cpu_utilization_bounded(
            user in 0u64..=1u64 << 30,
            nice in 0u64..=1u64 << 30,
            system in 0u64..=1u64 << 30,
            idle in 0u64..=1u64 << 30,
            iowait in 0u64..=1u64 << 30,
        ) {
            let times = CpuTimes { user, nice, system, idle, iowait, ..CpuTimes::default() };
            let ratio = times.utilization();
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
    }
}
