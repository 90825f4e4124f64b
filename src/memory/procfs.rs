// Thu Oct 15 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryProtector, MemoryReader, MemoryRegion, MemoryWriter, Protection,
    RegionQuery, TargetProcess,
};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;

const FALLBACK_PAGE_SIZE: u64 = 0x1000;

/// A live Linux process accessed through `/proc/<pid>`.
///
/// Reads and writes go through `/proc/<pid>/mem`, regions come from
/// `/proc/<pid>/maps`. Protection can only be changed for the calling process.
pub struct ProcfsProcess {
    pid: u32,
    name: Option<String>,
    mem: File,
    writable: bool,
}

impl ProcfsProcess {
    pub fn attach(pid: u32) -> Result<Self, MemoryError> {
        let path = format!("/proc/{}/mem", pid);
        let (mem, writable) = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => (file, true),
            Err(_) => {
                let file = File::open(&path).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => MemoryError::ProcessNotFound(format!("pid {}", pid)),
                    _ => MemoryError::Io(e),
                })?;
                (file, false)
            }
        };

        let name = fs::read_to_string(format!("/proc/{}/comm", pid))
            .ok()
            .map(|comm| comm.trim_end().to_string());

        log::debug!("Attached to pid {} ({:?}), writable: {}", pid, name, writable);
        Ok(Self {
            pid,
            name,
            mem,
            writable,
        })
    }

    pub fn current() -> Result<Self, MemoryError> {
        Self::attach(std::process::id())
    }

    pub fn attach_by_name(name: &str) -> Result<Self, MemoryError> {
        let pids = Self::find_processes_by_name(name)?;
        match pids.first() {
            Some(&pid) => Self::attach(pid),
            None => Err(MemoryError::ProcessNotFound(format!("Process '{}' not found", name))),
        }
    }

    /// Pids whose command name equals `name`, ascending. A trailing `.exe` is ignored.
    pub fn find_processes_by_name(name: &str) -> Result<Vec<u32>, MemoryError> {
        let wanted = name.trim_end_matches(".exe");
        let mut pids = Vec::new();

        for entry in fs::read_dir("/proc")? {
            let entry = entry?;
            let pid = match entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) {
                Some(pid) => pid,
                None => continue,
            };
            if let Ok(comm) = fs::read_to_string(entry.path().join("comm")) {
                if comm.trim_end() == wanted {
                    pids.push(pid);
                }
            }
        }

        pids.sort_unstable();
        Ok(pids)
    }

    fn maps(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        let maps = fs::read_to_string(format!("/proc/{}/maps", self.pid))?;
        Ok(maps.lines().filter_map(parse_maps_line).collect())
    }
}

pub(crate) fn parse_maps_line(line: &str) -> Option<MemoryRegion> {
    let mut fields = line.split_whitespace();
    let (start, end) = fields.next()?.split_once('-')?;
    let perms = fields.next()?.as_bytes();

    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end <= start {
        return None;
    }

    let mut protection = Protection::empty();
    if perms.first() == Some(&b'r') {
        protection |= Protection::READ;
    }
    if perms.get(1) == Some(&b'w') {
        protection |= Protection::WRITE;
    }
    if perms.get(2) == Some(&b'x') {
        protection |= Protection::EXECUTE;
    }

    Some(MemoryRegion::new(Address::new(start), end - start, protection))
}

fn page_size() -> u64 {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        FALLBACK_PAGE_SIZE
    }
}

impl MemoryReader for ProcfsProcess {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; len];
        self.mem
            .read_exact_at(&mut buffer, addr.as_u64())
            .map_err(|_| MemoryError::ReadFailed { addr, len })?;
        Ok(buffer)
    }
}

impl MemoryWriter for ProcfsProcess {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let failed = MemoryError::WriteFailed {
            addr,
            len: data.len(),
        };
        if !self.writable {
            return Err(failed);
        }
        self.mem.write_all_at(data, addr.as_u64()).map_err(|_| failed)
    }
}

impl RegionQuery for ProcfsProcess {
    fn query_region(&self, addr: Address) -> Result<Option<MemoryRegion>, MemoryError> {
        let maps = self.maps()?;
        let next = maps
            .into_iter()
            .find(|region| region.end().map_or(true, |end| end > addr));

        Ok(next.map(|region| {
            if region.base() <= addr {
                region
            } else {
                MemoryRegion::free(addr, region.base().as_u64() - addr.as_u64())
            }
        }))
    }
}

impl MemoryProtector for ProcfsProcess {
    fn protect(&self, addr: Address, len: usize, protection: Protection) -> Result<Protection, MemoryError> {
        if self.pid != std::process::id() {
            return Err(MemoryError::NotSupported(format!(
                "changing protection in pid {} from pid {}",
                self.pid,
                std::process::id()
            )));
        }

        let mapping = self
            .query_region(addr)?
            .filter(|region| region.is_committed())
            .ok_or(MemoryError::Unmapped(addr))?;
        let requested_end = addr.checked_add(len as u64).ok_or(MemoryError::ProtectFailed(addr))?;

        // The range must stay inside the mapping that reported the old protection.
        if mapping.end().map_or(false, |end| requested_end > end) {
            return Err(MemoryError::NotSupported(format!(
                "protection change of {} bytes at {} crosses the mapping {}",
                len, addr, mapping
            )));
        }

        let page = page_size();
        let start = addr.align_down(page);
        let end = requested_end.align_up(page).ok_or(MemoryError::ProtectFailed(addr))?;

        let rc = unsafe {
            libc::mprotect(
                start.as_u64() as usize as *mut libc::c_void,
                (end.as_u64() - start.as_u64()) as usize,
                protection.to_posix() as libc::c_int,
            )
        };
        if rc != 0 {
            return Err(MemoryError::ProtectFailed(addr));
        }
        Ok(mapping.protection())
    }
}

impl TargetProcess for ProcfsProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
