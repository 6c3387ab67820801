use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_usage_mb: Option<u64>,
}

/// Tracks wall time per engine phase and, when built with the `cli` feature,
/// resident memory of the current process.
pub struct RunMonitor {
    enabled: bool,
    start_time: Instant,
    phase_start: Instant,
    phases: Vec<PhaseStats>,
    peak_memory_mb: u64,
    #[cfg(feature = "cli")]
    system: System,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            phase_start: now,
            phases: Vec::new(),
            peak_memory_mb: 0,
            #[cfg(feature = "cli")]
            system: System::new(),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phases(&self) -> &[PhaseStats] {
        &self.phases
    }

    #[cfg(feature = "cli")]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system
            .process(pid)
            .map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        None
    }

    /// Closes the current phase and starts timing the next one.
    pub fn end_phase(&mut self, phase: &str) {
        let elapsed = self.phase_start.elapsed();
        self.phase_start = Instant::now();

        if !self.enabled {
            return;
        }

        let memory_usage_mb = self.sample_memory_mb();
        if let Some(mb) = memory_usage_mb {
            self.peak_memory_mb = self.peak_memory_mb.max(mb);
        }

        match memory_usage_mb {
            Some(mb) => tracing::info!("📊 {} - Time: {:?}, Memory: {}MB", phase, elapsed, mb),
            None => tracing::info!("📊 {} - Time: {:?}", phase, elapsed),
        }

        self.phases.push(PhaseStats {
            phase: phase.to_string(),
            elapsed,
            memory_usage_mb,
        });
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            self.start_time.elapsed(),
            self.peak_memory_mb
        );
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let mut monitor = RunMonitor::default();
        monitor.end_phase("extract");
        assert!(!monitor.is_enabled());
        assert!(monitor.phases().is_empty());
    }

    #[test]
    fn test_enabled_monitor_records_phases_in_order() {
        let mut monitor = RunMonitor::new(true);
        monitor.end_phase("extract");
        monitor.end_phase("transform");
        let names: Vec<&str> = monitor.phases().iter().map(|p| p.phase.as_str()).collect();
        assert_eq!(names, vec!["extract", "transform"]);
    }
}
