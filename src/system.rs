//! Host-wide constants needed to convert per-process tick counters.
//!
//! Both values are resolved once at startup and passed explicitly into the
//! parser and the monitor loop.

use std::fs;
use std::path::Path;

/// Fallback tick rate when `sysconf(_SC_CLK_TCK)` is unavailable.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Read-once host constants used by the record parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemContext {
    pub clock_ticks_per_second: u64,
    pub boot_epoch: i64,
}

impl SystemContext {
    pub fn new(clock_ticks_per_second: u64, boot_epoch: i64) -> Self {
        Self {
            clock_ticks_per_second: clock_ticks_per_second.max(1),
            boot_epoch,
        }
    }

    /// Queries the running host. The boot time comes from `<proc_root>/stat`.
    pub fn detect(proc_root: &Path) -> Result<Self, String> {
        let boot_epoch = read_boot_epoch(proc_root)?;
        Ok(Self::new(clock_ticks_per_second(), boot_epoch))
    }

    /// `boot_epoch + start_ticks / clock_ticks`, rounded to the nearest second.
    pub fn start_epoch(&self, start_ticks: u64) -> i64 {
        let offset = start_ticks as f64 / self.clock_ticks_per_second as f64;
        self.boot_epoch.saturating_add(offset.round() as i64)
    }
}

/// Get system clock ticks per second (usually 100, but can vary).
pub fn clock_ticks_per_second() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        let tck = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if tck > 0 {
            return tck as u64;
        }
    }
    DEFAULT_CLOCK_TICKS
}

/// Reads the system boot time (`btime`) from `<proc_root>/stat`.
pub fn read_boot_epoch(proc_root: &Path) -> Result<i64, String> {
    let path = proc_root.join("stat");
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_boot_epoch(&content)
        .ok_or_else(|| format!("No btime entry found in {}", path.display()))
}

fn parse_boot_epoch(content: &str) -> Option<i64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("btime "))
        .and_then(|v| v.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_boot_epoch() {
        let content = "cpu  10 0 5 100 0 0 0 0 0 0\nctxt 12345\nbtime 1700000000\nprocesses 42\n";
        assert_eq!(parse_boot_epoch(content), Some(1_700_000_000));
    }

    #[test]
    fn test_parse_boot_epoch_missing() {
        assert_eq!(parse_boot_epoch("cpu 1 2 3\nctxt 5\n"), None);
        assert_eq!(parse_boot_epoch("btime abc\n"), None);
    }

    #[test]
    fn test_read_boot_epoch_from_fake_root() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("stat"), "btime 1600000000\n")
            .expect("Failed to write stat file");
        assert_eq!(read_boot_epoch(dir.path()), Ok(1_600_000_000));
    }

    #[test]
    fn test_start_epoch_rounds_to_nearest_second() {
        let ctx = SystemContext::new(100, 1_000);
        assert_eq!(ctx.start_epoch(0), 1_000);
        assert_eq!(ctx.start_epoch(149), 1_001);
        assert_eq!(ctx.start_epoch(150), 1_002);
        assert_eq!(ctx.start_epoch(12_345), 1_123);
    }

    #[test]
    fn test_start_epoch_saturates_on_huge_tick_count() {
        let ctx = SystemContext::new(1, 1_700_000_000);
        assert_eq!(ctx.start_epoch(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let ctx = SystemContext::new(0, 0);
        assert_eq!(ctx.clock_ticks_per_second, 1);
    }
}
