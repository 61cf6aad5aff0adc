use std::{fs::File, fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

enum Sink {
    Disabled,
    File(Mutex<File>),
    /// Keeps serialized lines in memory; used by tests and dry runs.
    Memory(Mutex<Vec<String>>),
}

/// Append-only JSONL sink for orchestrator events.
///
/// Tracing never fails the caller: I/O and serialization problems are
/// reported on stderr and the event is dropped.
pub struct TraceLogger {
    sink: Sink,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Self {
                sink: Sink::File(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: Sink::Disabled }
    }

    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(Mutex::new(Vec::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.sink, Sink::Disabled)
    }

    pub fn log(&self, event: &TraceEvent) {
        if let Sink::Disabled = self.sink {
            return;
        }

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        match &self.sink {
            Sink::Disabled => {}
            Sink::File(file) => match file.lock() {
                Ok(mut f) => {
                    if let Err(e) = writeln!(f, "{}", json) {
                        eprintln!("Warning: failed to write trace event: {}", e);
                    }
                }
                Err(e) => eprintln!("Warning: trace logger lock poisoned: {}", e),
            },
            Sink::Memory(lines) => match lines.lock() {
                Ok(mut l) => l.push(json),
                Err(e) => eprintln!("Warning: trace logger lock poisoned: {}", e),
            },
        }
    }

    /// Lines captured by an in-memory logger; empty for other sinks.
    pub fn captured(&self) -> Vec<String> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
