#![forbid(unsafe_code)]

use crate::Error;
use std::process::{Command, Stdio};
use tracing::debug;

pub trait ActionRunner {
    /// Start `command` without waiting for it to finish.
    fn launch(&self, command: &str) -> Result<(), Error>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ActionRunner for ShellRunner {
    fn launch(&self, command: &str) -> Result<(), Error> {
        let child = shell(command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| Error::Launch {
                command: command.to_owned(),
                source,
            })?;
        debug!(pid = child.id(), command, "command launched");
        Ok(())
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}
