//! Process-window resolution
//!
//! Maps a set of target executable names to the visible top-level
//! windows of matching processes. Resolution is snapshot based: every
//! call re-reads live OS state, nothing is cached, and nothing is
//! mutated. The filtering core is pure over plain process/window
//! records; the Win32 backend supplies the records.

use std::collections::HashSet;

#[cfg(windows)]
mod win32;

/// Opaque OS window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// One running process from a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    /// Executable base name, extension included
    pub name: String,
}

/// One entry from a system-wide window enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRecord {
    pub handle: WindowHandle,
    /// Owning process id
    pub pid: u32,
    /// Window is currently visible
    pub visible: bool,
    /// Window has an owner window (tooltip, menu, owned popup)
    pub owned: bool,
}

/// Case-insensitive set of target executable names
#[derive(Debug, Clone, Default)]
pub struct ProcessNameSet {
    names: HashSet<String>,
}

impl ProcessNameSet {
    /// Build the set, lowercasing names once so membership tests are
    /// case-insensitive hash lookups
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }
}

/// Phase 1: collect the pids of processes whose executable name is in
/// the target set
pub fn matching_pids<I>(processes: I, targets: &ProcessNameSet) -> HashSet<u32>
where
    I: IntoIterator<Item = ProcessRecord>,
{
    processes
        .into_iter()
        .filter(|process| targets.contains(&process.name))
        .map(|process| process.pid)
        .collect()
}

/// Phase 2: keep visible, unowned windows belonging to the pid set.
///
/// Pid membership is a hash-set lookup; window counts can run into the
/// hundreds, so this must not rescan the process list per window.
pub fn visible_top_level<I>(windows: I, pids: &HashSet<u32>) -> Vec<WindowHandle>
where
    I: IntoIterator<Item = WindowRecord>,
{
    windows
        .into_iter()
        .filter(|window| window.visible && !window.owned && pids.contains(&window.pid))
        .map(|window| window.handle)
        .collect()
}

/// Resolve target process names to their visible top-level windows.
///
/// Re-snapshots live process and window state on every call. An empty
/// input set, a failed snapshot, and no matching process all degrade
/// to an empty result; window enumeration is skipped entirely when
/// phase 1 matched nothing. No ordering is guaranteed.
pub fn resolve(targets: &ProcessNameSet) -> Vec<WindowHandle> {
    resolve_with(targets, snapshot_processes, snapshot_windows)
}

/// Two-phase composition over snapshot providers, split out so the
/// skipping behavior is testable without live OS state
fn resolve_with<P, W>(targets: &ProcessNameSet, processes: P, windows: W) -> Vec<WindowHandle>
where
    P: FnOnce() -> Vec<ProcessRecord>,
    W: FnOnce() -> Vec<WindowRecord>,
{
    if targets.is_empty() {
        return Vec::new();
    }

    let pids = matching_pids(processes(), targets);
    if pids.is_empty() {
        return Vec::new();
    }

    visible_top_level(windows(), &pids)
}

/// Names of currently running processes, deduplicated and sorted
/// case-insensitively, for process-picker front ends
pub fn running_process_names() -> Vec<String> {
    dedup_sorted(snapshot_processes().into_iter().map(|process| process.name))
}

fn dedup_sorted<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut names: Vec<String> = names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    names
}

#[cfg(windows)]
use win32::{snapshot_processes, snapshot_windows};

/// Without the Win32 backend there is nothing to enumerate
#[cfg(not(windows))]
fn snapshot_processes() -> Vec<ProcessRecord> {
    Vec::new()
}

#[cfg(not(windows))]
fn snapshot_windows() -> Vec<WindowRecord> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn process(pid: u32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
        }
    }

    fn window(handle: isize, pid: u32, visible: bool, owned: bool) -> WindowRecord {
        WindowRecord {
            handle: WindowHandle(handle),
            pid,
            visible,
            owned,
        }
    }

    fn fixture() -> (Vec<ProcessRecord>, Vec<WindowRecord>) {
        // Two notepad instances, one explorer; each notepad owns one
        // visible top-level window plus one excluded window
        let processes = vec![
            process(100, "notepad.exe"),
            process(200, "notepad.exe"),
            process(300, "explorer.exe"),
        ];
        let windows = vec![
            window(1, 100, true, false),
            window(2, 100, false, false), // invisible
            window(3, 200, true, false),
            window(4, 200, true, true), // owned popup
            window(5, 300, true, false),
            window(6, 999, true, false), // unrelated process
        ];
        (processes, windows)
    }

    #[test]
    fn test_empty_name_set_skips_window_enumeration() {
        let windows_called = Cell::new(false);
        let result = resolve_with(
            &ProcessNameSet::default(),
            || fixture().0,
            || {
                windows_called.set(true);
                fixture().1
            },
        );
        assert!(result.is_empty());
        assert!(!windows_called.get());
    }

    #[test]
    fn test_no_matching_process_skips_window_enumeration() {
        let windows_called = Cell::new(false);
        let targets = ProcessNameSet::new(["NoSuchProcess.exe"]);
        let result = resolve_with(
            &targets,
            || fixture().0,
            || {
                windows_called.set(true);
                fixture().1
            },
        );
        assert!(result.is_empty());
        assert!(!windows_called.get());
    }

    #[test]
    fn test_resolves_visible_top_level_windows_only() {
        let (processes, windows) = fixture();
        let targets = ProcessNameSet::new(["notepad.exe"]);
        let result = resolve_with(&targets, || processes, || windows);

        // Both notepad instances contribute exactly their visible
        // top-level window; the invisible and owned ones are excluded
        let result: HashSet<WindowHandle> = result.into_iter().collect();
        assert_eq!(
            result,
            HashSet::from([WindowHandle(1), WindowHandle(3)])
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let (processes, windows) = fixture();
        let upper = resolve_with(
            &ProcessNameSet::new(["NOTEPAD.EXE"]),
            || processes.clone(),
            || windows.clone(),
        );
        let lower = resolve_with(
            &ProcessNameSet::new(["notepad.exe"]),
            || processes,
            || windows,
        );
        let upper: HashSet<WindowHandle> = upper.into_iter().collect();
        let lower: HashSet<WindowHandle> = lower.into_iter().collect();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let (processes, windows) = fixture();
        let targets = ProcessNameSet::new(["notepad.exe", "explorer.exe"]);
        let first: HashSet<WindowHandle> =
            resolve_with(&targets, || processes.clone(), || windows.clone())
                .into_iter()
                .collect();
        let second: HashSet<WindowHandle> = resolve_with(&targets, || processes, || windows)
            .into_iter()
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_snapshot_failure_degrades_to_empty() {
        // A failed process snapshot surfaces as an empty record list
        let targets = ProcessNameSet::new(["notepad.exe"]);
        let result = resolve_with(&targets, Vec::new, || fixture().1);
        assert!(result.is_empty());
    }

    #[test]
    fn test_dedup_sorted_names() {
        let names = vec![
            "notepad.exe".to_string(),
            "Explorer.exe".to_string(),
            "NOTEPAD.EXE".to_string(),
            "chrome.exe".to_string(),
        ];
        assert_eq!(
            dedup_sorted(names),
            vec!["chrome.exe", "Explorer.exe", "notepad.exe"]
        );
    }
}
