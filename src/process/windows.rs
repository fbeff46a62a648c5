//! Windows process access via kernel32, ToolHelp32 and PSAPI

use super::info::ProcessInfo;
use crate::core::types::{Address, MemoryError, MemoryResult, ModuleBounds, ProcessId};
use std::ffi::OsString;
use std::mem;
use std::os::windows::ffi::OsStringExt;
use std::ptr;
use tracing::{debug, warn};
use winapi::shared::minwindef::{DWORD, FALSE, HMODULE, LPVOID, MAX_PATH};
use winapi::shared::winerror::{ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::psapi::{EnumProcessModules, GetModuleBaseNameW, GetModuleInformation, MODULEINFO};
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32, TH32CS_SNAPPROCESS,
};
use winapi::um::winnt::{HANDLE, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

/// Owned process handle, closed on drop
pub struct PlatformHandle {
    handle: HANDLE,
}

// HANDLEs are plain kernel object references usable from any thread
unsafe impl Send for PlatformHandle {}
unsafe impl Sync for PlatformHandle {}

impl PlatformHandle {
    /// Opens `pid` with query and read rights
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, FALSE, pid) };
        if handle.is_null() {
            let code = unsafe { GetLastError() };
            return Err(match code {
                ERROR_ACCESS_DENIED => MemoryError::access_denied(pid, "OpenProcess denied"),
                ERROR_INVALID_PARAMETER => MemoryError::ProcessNotFound(format!("PID: {}", pid)),
                other => MemoryError::access_denied(pid, format!("OpenProcess failed ({})", other)),
            });
        }
        Ok(PlatformHandle { handle })
    }

    pub fn is_valid(&self) -> bool {
        !self.handle.is_null() && self.handle != INVALID_HANDLE_VALUE
    }

    pub fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        if buffer.is_empty() || !self.is_valid() {
            return 0;
        }
        let mut bytes_read = 0;
        // A partial copy reports failure but still fills `bytes_read`
        unsafe {
            ReadProcessMemory(
                self.handle,
                address.as_usize() as LPVOID,
                buffer.as_mut_ptr() as LPVOID,
                buffer.len(),
                &mut bytes_read,
            );
        }
        bytes_read.min(buffer.len())
    }

    /// Bounds of the process's executable image (the first module)
    pub fn main_module(&self, pid: ProcessId) -> MemoryResult<ModuleBounds> {
        let mut module: HMODULE = ptr::null_mut();
        let mut needed: DWORD = 0;

        let ok = unsafe {
            EnumProcessModules(
                self.handle,
                &mut module,
                mem::size_of::<HMODULE>() as DWORD,
                &mut needed,
            )
        };
        if ok == FALSE || module.is_null() {
            return Err(MemoryError::ModuleNotFound(format!(
                "no modules listed for PID {}",
                pid
            )));
        }

        let mut info: MODULEINFO = unsafe { mem::zeroed() };
        let ok = unsafe {
            GetModuleInformation(
                self.handle,
                module,
                &mut info,
                mem::size_of::<MODULEINFO>() as DWORD,
            )
        };
        if ok == FALSE {
            return Err(MemoryError::ModuleNotFound(format!(
                "module information unavailable for PID {}",
                pid
            )));
        }

        let mut name_buf = [0u16; MAX_PATH];
        let name_len = unsafe {
            GetModuleBaseNameW(self.handle, module, name_buf.as_mut_ptr(), MAX_PATH as DWORD)
        };
        let name = wide_to_string(&name_buf[..name_len as usize]);

        let base = Address::new(info.lpBaseOfDll as usize);
        let end = base.saturating_add(info.SizeOfImage as usize);
        debug!(pid, module = %name, %base, %end, "main module resolved");
        Ok(ModuleBounds::new(name, base, end))
    }
}

impl Drop for PlatformHandle {
    fn drop(&mut self) {
        if self.is_valid() && unsafe { CloseHandle(self.handle) } == FALSE {
            warn!("failed to close process handle");
        }
    }
}

/// Walks a ToolHelp32 process snapshot
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessInfo>> {
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
    if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
        return Err(MemoryError::ProcessNotFound(
            "failed to create process snapshot".to_string(),
        ));
    }

    let mut processes = Vec::new();
    unsafe {
        let mut entry: PROCESSENTRY32 = mem::zeroed();
        entry.dwSize = mem::size_of::<PROCESSENTRY32>() as u32;

        let mut more = Process32First(snapshot, &mut entry);
        while more != FALSE {
            processes.push(ProcessInfo {
                pid: entry.th32ProcessID,
                name: entry_name(&entry),
                path: None,
            });
            more = Process32Next(snapshot, &mut entry);
        }

        CloseHandle(snapshot);
    }

    debug!(count = processes.len(), "processes enumerated");
    Ok(processes)
}

pub fn name_matches(process: &ProcessInfo, name: &str) -> bool {
    strip_exe(&process.name).eq_ignore_ascii_case(strip_exe(name))
}

fn entry_name(entry: &PROCESSENTRY32) -> String {
    let raw = &entry.szExeFile;
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    let bytes: Vec<u8> = raw[..len].iter().map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn strip_exe(name: &str) -> &str {
    let len = name.len();
    if len > 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}

fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    OsString::from_wide(&wide[..len]).to_string_lossy().into_owned()
}
