//! Dev-server process supervision.
//!
//! `start` and `stop` are serialized through an async mutex, so a `start`
//! immediately followed by `stop` always observes a fully started (or fully
//! failed) process. The current [`LifecycleState`] can be read at any time
//! without waiting on that mutex.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use fob_bridge_config::DevServerConfig;
use parking_lot::RwLock;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::hot_file::{self, ProbeOutcome};

/// How often readiness and exit are polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Identity of one successfully started dev-server process.
///
/// Handles from different starts never compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerHandle {
    pub generation: u64,
    pub pid: Option<u32>,
    /// Origin the process advertised once ready
    pub origin: String,
    pub started_at: DateTime<Utc>,
}

struct RunningServer {
    handle: DevServerHandle,
    child: Child,
}

/// Owns the dev-server child process.
pub struct DevServerLifecycle {
    config: DevServerConfig,
    cwd: PathBuf,
    hot_file: PathBuf,
    state: RwLock<LifecycleState>,
    running: Mutex<Option<RunningServer>>,
    generation: AtomicU64,
}

impl DevServerLifecycle {
    pub fn new(config: DevServerConfig, cwd: impl Into<PathBuf>, hot_file: impl Into<PathBuf>) -> Self {
        Self {
            config,
            cwd: cwd.into(),
            hot_file: hot_file.into(),
            state: RwLock::new(LifecycleState::Stopped),
            running: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    pub fn hot_file(&self) -> &Path {
        &self.hot_file
    }

    /// Start the dev server and wait until it advertises itself.
    ///
    /// Returns the existing handle when already running. If a previously
    /// started process has exited on its own, a new one is spawned.
    ///
    /// # Errors
    ///
    /// `DevServerStartFailure` when the process cannot be spawned, exits
    /// before writing the hot file, or does not become ready within the
    /// startup timeout. The state is `Stopped` afterwards.
    pub async fn start(&self) -> Result<DevServerHandle> {
        let mut running = self.running.lock().await;

        if let Some(server) = running.as_mut() {
            match server.child.try_wait() {
                Ok(None) => return Ok(server.handle.clone()),
                Ok(Some(status)) => {
                    tracing::warn!(
                        pid = ?server.handle.pid,
                        %status,
                        "dev server exited on its own, restarting"
                    );
                }
                Err(e) => {
                    tracing::warn!(pid = ?server.handle.pid, "failed to poll dev server: {}", e);
                }
            }
            if let Some(mut stale) = running.take() {
                terminate(&mut stale.child, self.config.shutdown_timeout()).await;
            }
            remove_hot_file(&self.hot_file);
        }

        self.set_state(LifecycleState::Starting);
        match self.spawn_until_ready().await {
            Ok(server) => {
                let handle = server.handle.clone();
                *running = Some(server);
                self.set_state(LifecycleState::Running);
                tracing::info!(
                    pid = ?handle.pid,
                    origin = %handle.origin,
                    "dev server ready"
                );
                Ok(handle)
            }
            Err(err) => {
                self.set_state(LifecycleState::Stopped);
                Err(err)
            }
        }
    }

    /// Stop the dev server.
    ///
    /// Sends SIGTERM to the process group, waits up to the shutdown timeout,
    /// then force-kills. Never fails; a no-op when nothing is running.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        let Some(mut server) = running.take() else {
            self.set_state(LifecycleState::Stopped);
            return;
        };

        self.set_state(LifecycleState::Stopping);
        tracing::info!(pid = ?server.handle.pid, "stopping dev server");
        terminate(&mut server.child, self.config.shutdown_timeout()).await;
        remove_hot_file(&self.hot_file);
        self.set_state(LifecycleState::Stopped);
        tracing::info!("dev server stopped");
    }

    /// Handle of the running process, if any.
    pub async fn handle(&self) -> Option<DevServerHandle> {
        self.running
            .lock()
            .await
            .as_ref()
            .map(|server| server.handle.clone())
    }

    async fn spawn_until_ready(&self) -> Result<RunningServer> {
        // A marker left by a crashed run would make us report ready immediately
        remove_hot_file(&self.hot_file);

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .envs(&self.config.env)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        tracing::info!(
            command = %self.config.command,
            args = ?self.config.args,
            cwd = %self.cwd.display(),
            "starting dev server"
        );

        let mut child = command.spawn().map_err(|e| {
            Error::start_failure(format!(
                "failed to spawn '{}': {}",
                self.config.command, e
            ))
        })?;
        let pid = child.id();
        let deadline = Instant::now() + self.config.startup_timeout();

        loop {
            match hot_file::inspect(&self.hot_file) {
                ProbeOutcome::Detected(info) => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    return Ok(RunningServer {
                        handle: DevServerHandle {
                            generation,
                            pid,
                            origin: info.origin,
                            started_at: Utc::now(),
                        },
                        child,
                    });
                }
                ProbeOutcome::Malformed(reason) => {
                    // The bundler may still be writing the file
                    tracing::debug!("hot file not ready yet: {}", reason);
                }
                ProbeOutcome::Absent => {}
            }

            match child.try_wait() {
                Ok(Some(status)) => {
                    // Background children of the launcher outlive it
                    reap_group(pid, self.config.shutdown_timeout()).await;
                    remove_hot_file(&self.hot_file);
                    return Err(Error::start_failure(format!(
                        "process exited with {} before becoming ready",
                        status
                    )));
                }
                Ok(None) => {}
                Err(e) => {
                    terminate(&mut child, self.config.shutdown_timeout()).await;
                    return Err(Error::start_failure(format!(
                        "failed to poll process: {}",
                        e
                    )));
                }
            }

            if Instant::now() >= deadline {
                terminate(&mut child, self.config.shutdown_timeout()).await;
                remove_hot_file(&self.hot_file);
                return Err(Error::start_failure(format!(
                    "hot file {} did not appear within {}ms",
                    self.hot_file.display(),
                    self.config.startup_timeout_ms
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn set_state(&self, state: LifecycleState) {
        let mut current = self.state.write();
        if *current != state {
            tracing::debug!(from = ?*current, to = ?state, "dev server state change");
            *current = state;
        }
    }
}

impl std::fmt::Debug for DevServerLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevServerLifecycle")
            .field("command", &self.config.command)
            .field("cwd", &self.cwd)
            .field("hot_file", &self.hot_file)
            .field("state", &self.state())
            .finish()
    }
}

fn remove_hot_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed hot file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to remove hot file: {}", e),
    }
}

/// Terminate a child gracefully, force-killing after `timeout`.
async fn terminate(child: &mut Child, timeout: Duration) {
    if let Ok(Some(_)) = child.try_wait() {
        return;
    }

    send_terminate(child);

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(None) if Instant::now() < deadline => tokio::time::sleep(POLL_INTERVAL).await,
            Ok(None) => {
                tracing::warn!(pid = ?child.id(), "dev server did not exit, sending SIGKILL");
                force_kill(child);
                if let Err(e) = child.wait().await {
                    tracing::warn!("failed to reap dev server: {}", e);
                }
                return;
            }
            _ => return,
        }
    }
}

/// Terminate what is left of a process group whose leader already exited,
/// force-killing after `timeout`.
#[cfg(unix)]
async fn reap_group(pid: Option<u32>, timeout: Duration) {
    use nix::sys::signal::Signal;

    let Some(pid) = pid else {
        return;
    };
    if !signal_group(pid, Some(Signal::SIGTERM)) {
        return;
    }

    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        tokio::time::sleep(POLL_INTERVAL).await;
        if !signal_group(pid, None) {
            return;
        }
    }
    tracing::warn!(pid, "dev server children did not exit, sending SIGKILL");
    signal_group(pid, Some(Signal::SIGKILL));
}

#[cfg(not(unix))]
async fn reap_group(_pid: Option<u32>, _timeout: Duration) {}

/// Signal every process in the group led by `pid`. `None` only checks
/// that the group exists. Returns false once the group is gone.
#[cfg(unix)]
fn signal_group(pid: u32, signal: Option<nix::sys::signal::Signal>) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let pgid = i32::try_from(pid).unwrap_or(i32::MAX);
    // Negative pid addresses the whole process group
    match kill(Pid::from_raw(-pgid), signal) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(e) => {
            tracing::warn!(pid, signal = ?signal, "failed to signal dev server: {}", e);
            false
        }
    }
}

#[cfg(unix)]
fn send_terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        signal_group(pid, Some(nix::sys::signal::Signal::SIGTERM));
    }
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!("failed to terminate dev server: {}", e);
    }
}

#[cfg(unix)]
fn force_kill(child: &mut Child) {
    if let Some(pid) = child.id() {
        signal_group(pid, Some(nix::sys::signal::Signal::SIGKILL));
    }
    // Covers the leader in case it left the group
    let _ = child.start_kill();
}

#[cfg(not(unix))]
fn force_kill(child: &mut Child) {
    let _ = child.start_kill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lifecycle(dir: &TempDir, command: &str, args: &[&str]) -> DevServerLifecycle {
        let config = DevServerConfig {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            startup_timeout_ms: 2_000,
            shutdown_timeout_ms: 500,
            ..DevServerConfig::default()
        };
        DevServerLifecycle::new(config, dir.path(), dir.path().join("hot.json"))
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() {
        let dir = TempDir::new().unwrap();
        let lifecycle = lifecycle(&dir, "does-not-matter", &[]);
        lifecycle.stop().await;
        lifecycle.stop().await;
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(lifecycle.handle().await.is_none());
    }

    #[tokio::test]
    async fn spawn_failure_reports_start_failure() {
        let dir = TempDir::new().unwrap();
        let lifecycle = lifecycle(&dir, "fob-bridge-no-such-binary", &[]);
        let err = lifecycle.start().await.unwrap_err();
        assert!(matches!(err, Error::DevServerStartFailure { .. }));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }
}
