use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;

use crate::config::AudioConfig;

/// Accepts an audio url, prepares it and starts playing.
pub trait Player {
    fn play(&self, url: &str) -> anyhow::Result<()>;
}

/// Hands the url to an external program such as `mpv` or `ffplay`.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            program: config.player.clone(),
            args: config.args.clone(),
        }
    }

    fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl Player for CommandPlayer {
    fn play(&self, url: &str) -> anyhow::Result<()> {
        // the child is not awaited, playback runs alongside the prompt
        let child = self
            .command(url)
            .spawn()
            .with_context(|| format!("failed to start audio player {:?}", self.program))?;
        tracing::debug!(program = %self.program, pid = ?child.id(), %url, "playing audio");
        Ok(())
    }
}
