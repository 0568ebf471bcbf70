//! Inhibitor backed by a long-running child process.
//!
//! `caffeinate` and `systemd-inhibit` hold their inhibition for as long as
//! they run, so acquiring spawns the process and releasing kills it.

use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::config::InhibitConfig;
use super::error::InhibitError;
use super::Inhibitor;

/// Holds the inhibitor process while a session runs.
#[derive(Debug)]
pub struct CommandInhibitor {
    command: Vec<String>,
    child: Mutex<Option<Child>>,
}

impl CommandInhibitor {
    #[must_use]
    pub fn new(config: &InhibitConfig) -> Self {
        Self {
            command: config.command.clone(),
            child: Mutex::new(None),
        }
    }

    fn child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn program(&self) -> String {
        self.command.first().cloned().unwrap_or_default()
    }
}

impl Inhibitor for CommandInhibitor {
    fn acquire(&self) -> Result<(), InhibitError> {
        let mut child = self.child();
        if child.is_some() {
            return Ok(());
        }

        let (program, args) = self.command.split_first().ok_or(InhibitError::EmptyCommand)?;
        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => InhibitError::CommandNotFound(program.clone()),
                _ => InhibitError::SpawnFailed(program.clone(), e.to_string()),
            })?;

        info!(program = %program, pid = spawned.id(), "Screen blanking inhibited");
        *child = Some(spawned);
        Ok(())
    }

    fn release(&self) -> Result<(), InhibitError> {
        let Some(mut child) = self.child().take() else {
            return Ok(());
        };

        // The process may already have exited on its own.
        if let Ok(Some(status)) = child.try_wait() {
            debug!(%status, "Inhibitor already exited");
            return Ok(());
        }

        child
            .kill()
            .and_then(|()| child.wait())
            .map_err(|e| InhibitError::ReleaseFailed(self.program(), e.to_string()))?;
        info!("Screen blanking inhibition released");
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.child().is_some()
    }
}

impl Drop for CommandInhibitor {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command() {
        let inhibitor = CommandInhibitor::new(&InhibitConfig::with_command(Vec::<String>::new()));

        assert_eq!(inhibitor.acquire(), Err(InhibitError::EmptyCommand));
        assert!(!inhibitor.is_held());
    }

    #[test]
    fn test_missing_program() {
        let inhibitor = CommandInhibitor::new(&InhibitConfig::with_command([
            "pomodorik-no-such-inhibitor-12345",
        ]));

        let err = inhibitor.acquire().unwrap_err();
        assert!(err.is_command_not_found());
        assert!(!inhibitor.is_held());
    }

    #[test]
    fn test_release_when_idle_is_noop() {
        let inhibitor = CommandInhibitor::new(&InhibitConfig::with_command(["sleep", "60"]));
        assert!(inhibitor.release().is_ok());
        assert!(inhibitor.release().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_acquire_and_release_process() {
        let inhibitor = CommandInhibitor::new(&InhibitConfig::with_command(["sleep", "60"]));

        inhibitor.acquire().unwrap();
        assert!(inhibitor.is_held());

        // Second acquire keeps the same process.
        inhibitor.acquire().unwrap();
        assert!(inhibitor.is_held());

        inhibitor.release().unwrap();
        assert!(!inhibitor.is_held());
    }
}
