//! Logical process and thread registry.
//!
//! OS pids and tids are not stable identities: the OS recycles them, and one
//! capture can see the same tid belong to two different logical threads. The
//! registry therefore hands out its own [`ProcessHandle`]/[`ThreadHandle`]
//! identities and keeps a most-recent index from raw OS id to handle. Starting
//! a new entity for an already-indexed OS id rebinds the index; the older
//! entity keeps existing under its old handle.

use rustc_hash::FxHashMap;
use tracedb_core::{ProcessHandle, ThreadHandle};

/// One logical process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRecord {
    /// The OS pid this process was observed under.
    pub pid: u32,
}

/// One logical thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRecord {
    /// The OS tid this thread was observed under.
    pub tid: u32,
    /// The owning logical process, once known.
    pub process: Option<ProcessHandle>,
}

/// Registry of logical processes and threads for one ingestion session.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    processes: Vec<ProcessRecord>,
    threads: Vec<ThreadRecord>,
    by_pid: FxHashMap<u32, ProcessHandle>,
    by_tid: FxHashMap<u32, ThreadHandle>,
}

impl ProcessRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent logical process for a pid, creating one if the pid has
    /// never been seen.
    pub fn get_or_create_process(&mut self, pid: u32) -> ProcessHandle {
        if let Some(&handle) = self.by_pid.get(&pid) {
            return handle;
        }
        self.push_process(pid)
    }

    /// Start a fresh logical process for a pid, regardless of whether one
    /// already exists. The pid index now points at the new process; nothing
    /// else is known about it.
    pub fn start_new_process(&mut self, pid: u32) -> ProcessHandle {
        self.push_process(pid)
    }

    /// The most recent logical thread for a tid, created if missing, then
    /// (re-)associated with the most recent logical process for `pid`.
    pub fn update_thread(&mut self, tid: u32, pid: u32) -> ThreadHandle {
        let process = self.get_or_create_process(pid);
        let handle = match self.by_tid.get(&tid) {
            Some(&handle) => handle,
            None => self.push_thread(tid),
        };
        self.threads[handle.raw() as usize].process = Some(process);
        handle
    }

    /// Start a fresh logical thread for a tid with an unknown originating
    /// process. The tid index now points at the new thread.
    pub fn start_new_thread(&mut self, tid: u32) -> ThreadHandle {
        self.push_thread(tid)
    }

    fn push_process(&mut self, pid: u32) -> ProcessHandle {
        let handle = ProcessHandle::new(self.processes.len() as u32);
        self.processes.push(ProcessRecord { pid });
        self.by_pid.insert(pid, handle);
        handle
    }

    fn push_thread(&mut self, tid: u32) -> ThreadHandle {
        let handle = ThreadHandle::new(self.threads.len() as u32);
        self.threads.push(ThreadRecord { tid, process: None });
        self.by_tid.insert(tid, handle);
        handle
    }

    /// The record behind a process handle.
    pub fn process(&self, handle: ProcessHandle) -> Option<&ProcessRecord> {
        self.processes.get(handle.raw() as usize)
    }

    /// The record behind a thread handle.
    pub fn thread(&self, handle: ThreadHandle) -> Option<&ThreadRecord> {
        self.threads.get(handle.raw() as usize)
    }

    /// Number of logical processes ever created.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of logical threads ever created.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }
}
