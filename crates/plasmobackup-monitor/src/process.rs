//! `sysinfo`-backed process table

use plasmobackup_types::{Error, ProcessEntry, ProcessHandle, ProcessTable, Result};
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

/// Process table that queries the operating system
pub struct SysinfoProcessTable {
    system: System,
}

impl SysinfoProcessTable {
    /// Create a process table with an empty cache
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn ensure_supported() -> Result<()> {
        if sysinfo::IS_SUPPORTED_SYSTEM {
            Ok(())
        } else {
            Err(Error::process_query(
                "process enumeration is not supported on this platform",
            ))
        }
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SysinfoProcessTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoProcessTable")
            .field("cached_processes", &self.system.processes().len())
            .finish()
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn list_processes(&mut self) -> Result<Vec<ProcessEntry>> {
        Self::ensure_supported()?;
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        Ok(self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| {
                ProcessEntry::new(
                    process.name().to_string_lossy(),
                    ProcessHandle::new(pid.as_u32(), process.start_time()),
                )
            })
            .collect())
    }

    fn is_alive(&mut self, handle: &ProcessHandle) -> Result<bool> {
        Self::ensure_supported()?;
        let pid = Pid::from_u32(handle.pid);
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        Ok(self.system.process(pid).is_some_and(|process| {
            process.status() != ProcessStatus::Zombie
                && (handle.started_at == 0 || process.start_time() == handle.started_at)
        }))
    }

    /// Drop the cached process list so enumeration memory is released between ticks
    fn reclaim(&mut self) {
        self.system = System::new();
    }
}
