//! Process subtree enumeration and forced termination.
//!
//! On Linux, descendants of a pid are discovered through
//! `/proc/<pid>/task/<tid>/children` and killed deepest-first, then the
//! root itself. A process that exits between the snapshot and the kill
//! attempt is expected; `ESRCH` is treated as success on every node.

#[cfg(target_os = "linux")]
use std::fs;

/// Kill a process and every descendant it has at the moment of the call.
///
/// Descendants are killed before the root so nothing gets a chance to be
/// reparented and linger. The caller still owns the root's process handle
/// and must reap it afterwards.
#[cfg(target_os = "linux")]
pub fn kill_tree(root: u32, debug: bool) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let mut targets = descendants(root);
    // Preorder reversed: every child comes before its parent.
    targets.reverse();
    targets.push(root);

    for pid in targets {
        match kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) => {
                if debug {
                    eprintln!("killed: {}", pid);
                }
            }
            Err(Errno::ESRCH) => {
                // Already gone.
            }
            Err(e) => {
                if debug {
                    eprintln!("kill {} failed: {}", pid, e);
                }
            }
        }
    }
}

/// Snapshot of every descendant of `root`, in preorder.
#[cfg(target_os = "linux")]
pub fn descendants(root: u32) -> Vec<u32> {
    let mut all = Vec::new();
    let mut frontier = vec![root];
    while let Some(pid) = frontier.pop() {
        for child in child_pids(pid) {
            all.push(child);
            frontier.push(child);
        }
    }
    all
}

/// Direct children of a pid, summed over all of its threads.
#[cfg(target_os = "linux")]
fn child_pids(pid: u32) -> Vec<u32> {
    let mut children = Vec::new();
    let Ok(entries) = fs::read_dir(format!("/proc/{}/task", pid)) else {
        return children;
    };
    for entry in entries.flatten() {
        let Ok(contents) = fs::read_to_string(entry.path().join("children")) else {
            continue;
        };
        children.extend(
            contents
                .split_whitespace()
                .filter_map(|token| token.parse::<u32>().ok()),
        );
    }
    children
}

/// Descendant enumeration is Linux-only; the runner still kills the direct
/// child through its process handle.
#[cfg(not(target_os = "linux"))]
pub fn kill_tree(_root: u32, _debug: bool) {}
