//! Background reload of file-backed definitions
//!
//! The parent directory is watched rather than the file itself so that
//! editors replacing the file through a rename are still noticed. Events for
//! other files in the directory are ignored.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Quiet period after a change before reloading
pub(crate) const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Upper bound on a settle wait, as a multiple of the debounce
const MAX_SETTLE_FACTOR: u32 = 10;

#[derive(Debug, Error)]
pub(crate) enum WatchError {
    #[error("{path} has no file name to watch")]
    NoFileName { path: String },

    #[error("failed to watch {path}: {source}")]
    Notify {
        path: String,
        #[source]
        source: notify::Error,
    },

    #[error("failed to start watcher thread: {0}")]
    Thread(#[from] std::io::Error),
}

enum WatchMessage {
    Event(notify::Result<Event>),
    Shutdown,
}

/// Watches one file and runs a callback after it changes.
pub(crate) struct DefinitionWatcher {
    path: PathBuf,
    watcher: Option<RecommendedWatcher>,
    sender: Sender<WatchMessage>,
    handle: Option<JoinHandle<()>>,
}

impl DefinitionWatcher {
    pub fn start<F>(path: &Path, debounce: Duration, on_change: F) -> Result<Self, WatchError>
    where
        F: Fn() + Send + 'static,
    {
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| WatchError::NoFileName {
                path: path.display().to_string(),
            })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (sender, receiver) = mpsc::channel();
        let event_sender = sender.clone();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = event_sender.send(WatchMessage::Event(event));
        })
        .map_err(|source| WatchError::Notify {
            path: path.display().to_string(),
            source,
        })?;
        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Notify {
                path: directory.display().to_string(),
                source,
            })?;

        let handle = std::thread::Builder::new()
            .name("attrdef-watcher".to_string())
            .spawn(move || run(receiver, file_name, debounce, on_change))?;

        tracing::info!("Watching {} for attribute definition changes", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            watcher: Some(watcher),
            sender,
            handle: Some(handle),
        })
    }

    /// Stop watching and wait for the reload thread to exit.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Dropping the OS watcher first means no new events are queued.
        drop(self.watcher.take());
        let _ = self.sender.send(WatchMessage::Shutdown);
        if handle.join().is_err() {
            tracing::warn!("Watcher thread for {} panicked", self.path.display());
        }
        tracing::info!("Stopped watching {}", self.path.display());
    }
}

impl Drop for DefinitionWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<F: Fn()>(
    receiver: Receiver<WatchMessage>,
    file_name: OsString,
    debounce: Duration,
    on_change: F,
) {
    while let Ok(message) = receiver.recv() {
        match message {
            WatchMessage::Shutdown => return,
            WatchMessage::Event(Err(e)) => {
                tracing::warn!("File watch error: {}", e);
            }
            WatchMessage::Event(Ok(event)) => {
                if !is_change_to(&event, &file_name) {
                    continue;
                }
                if !settle(&receiver, &file_name, debounce) {
                    return;
                }
                on_change();
            }
        }
    }
}

/// Drain follow-up events until the file has been quiet for `debounce`.
///
/// Only changes to the watched file restart the quiet period, and the whole
/// wait is capped at [`MAX_SETTLE_FACTOR`] times `debounce`. Returns false
/// when a shutdown arrived meanwhile.
fn settle(receiver: &Receiver<WatchMessage>, file_name: &OsString, debounce: Duration) -> bool {
    let deadline = Instant::now() + debounce * MAX_SETTLE_FACTOR;
    let mut quiet_until = Instant::now() + debounce;
    loop {
        let now = Instant::now();
        let wake = quiet_until.min(deadline);
        if now >= wake {
            return true;
        }
        match receiver.recv_timeout(wake - now) {
            Ok(WatchMessage::Shutdown) => return false,
            Ok(WatchMessage::Event(Ok(event))) if is_change_to(&event, file_name) => {
                quiet_until = Instant::now() + debounce;
            }
            Ok(WatchMessage::Event(_)) => {}
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

fn is_change_to(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}
