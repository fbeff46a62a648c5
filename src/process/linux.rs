//! Linux process access via procfs and `process_vm_readv`

use super::info::ProcessInfo;
use crate::core::types::{Address, MemoryError, MemoryResult, ModuleBounds, ProcessId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum length of `/proc/<pid>/comm`, longer names are truncated
const COMM_LEN: usize = 15;

/// Reads from a live process by PID; holds no kernel resource
pub struct PlatformHandle {
    pid: libc::pid_t,
}

impl PlatformHandle {
    /// Checks that `pid` exists
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let raw = libc::pid_t::try_from(pid)
            .map_err(|_| MemoryError::ProcessNotFound(format!("PID: {}", pid)))?;
        if raw <= 0 || !proc_path(pid, "").exists() {
            return Err(MemoryError::ProcessNotFound(format!("PID: {}", pid)));
        }
        Ok(PlatformHandle { pid: raw })
    }

    pub fn is_valid(&self) -> bool {
        self.pid > 0
    }

    pub fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        if buffer.is_empty() || !self.is_valid() {
            return 0;
        }

        let local = libc::iovec {
            iov_base: buffer.as_mut_ptr() as *mut libc::c_void,
            iov_len: buffer.len(),
        };
        let remote = libc::iovec {
            iov_base: address.as_usize() as *mut libc::c_void,
            iov_len: buffer.len(),
        };

        // Stops at the first unreadable page and reports the partial count
        let copied = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if copied <= 0 {
            0
        } else {
            (copied as usize).min(buffer.len())
        }
    }

    /// Span of every mapping backed by the process's executable
    pub fn main_module(&self, pid: ProcessId) -> MemoryResult<ModuleBounds> {
        let exe = fs::read_link(proc_path(pid, "exe")).map_err(|e| procfs_error(pid, e))?;
        let maps = fs::read_to_string(proc_path(pid, "maps")).map_err(|e| procfs_error(pid, e))?;

        let name = exe
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| exe.display().to_string());

        let (base, end) = image_span(&maps, &exe).ok_or_else(|| {
            MemoryError::ModuleNotFound(format!("{} is not mapped in PID {}", exe.display(), pid))
        })?;

        debug!(pid, module = %name, %base, %end, "main module resolved");
        Ok(ModuleBounds::new(name, base, end))
    }
}

/// Every numeric `/proc` entry whose `comm` is still readable
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessInfo>> {
    let processes = fs::read_dir("/proc")?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str()?.parse::<ProcessId>().ok())
        .filter_map(|pid| {
            // Gone between the directory listing and this read
            let comm = fs::read_to_string(proc_path(pid, "comm")).ok()?;
            Some(ProcessInfo {
                pid,
                name: comm.trim_end_matches('\n').to_string(),
                path: fs::read_link(proc_path(pid, "exe")).ok(),
            })
        })
        .collect();
    Ok(processes)
}

pub fn name_matches(process: &ProcessInfo, name: &str) -> bool {
    comm_matches(&process.name, name)
        || process
            .path
            .as_deref()
            .and_then(Path::file_name)
            .is_some_and(|exe| exe.to_string_lossy().eq_ignore_ascii_case(name))
}

fn comm_matches(comm: &str, name: &str) -> bool {
    if comm.eq_ignore_ascii_case(name) {
        return true;
    }
    // The kernel truncates comm, so compare the prefix for long names
    name.len() > COMM_LEN
        && comm.len() == COMM_LEN
        && name.is_char_boundary(COMM_LEN)
        && name[..COMM_LEN].eq_ignore_ascii_case(comm)
}

fn proc_path(pid: ProcessId, leaf: &str) -> PathBuf {
    let mut path = PathBuf::from(format!("/proc/{}", pid));
    if !leaf.is_empty() {
        path.push(leaf);
    }
    path
}

fn procfs_error(pid: ProcessId, err: io::Error) -> MemoryError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => MemoryError::access_denied(pid, err.to_string()),
        io::ErrorKind::NotFound => MemoryError::ProcessNotFound(format!("PID: {}", pid)),
        _ => MemoryError::Io(err),
    }
}

/// One parsed line of `/proc/<pid>/maps`
#[derive(Debug, Clone, PartialEq, Eq)]
struct MapsEntry<'a> {
    start: usize,
    end: usize,
    path: &'a str,
}

fn parse_maps_line(line: &str) -> Option<MapsEntry<'_>> {
    // start-end perms offset dev inode [path]
    let mut fields = line.splitn(6, ' ');
    let span = fields.next()?;
    for _ in 0..4 {
        fields.next()?;
    }
    let path = fields.next().map(str::trim).unwrap_or("");

    let (start, end) = span.split_once('-')?;
    Some(MapsEntry {
        start: usize::from_str_radix(start, 16).ok()?,
        end: usize::from_str_radix(end, 16).ok()?,
        path,
    })
}

/// Lowest start and highest end of the mappings whose path is `exe`
fn image_span(maps: &str, exe: &Path) -> Option<(Address, Address)> {
    let exe = exe.to_str()?;
    maps.lines()
        .filter_map(parse_maps_line)
        .filter(|entry| entry.path == exe)
        .fold(None, |span, entry| match span {
            None => Some((entry.start, entry.end)),
            Some((lo, hi)) => Some((lo.min(entry.start), hi.max(entry.end))),
        })
        .map(|(lo, hi)| (Address::new(lo), Address::new(hi)))
}
