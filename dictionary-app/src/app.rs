use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use dictionary::{Dictionary, Lookup, LookupStateMachine, LookupStatus};
use tracing::info;

use crate::config::{self, ApiConfig, AppConfig};
use crate::player::{CommandPlayer, Player};
use crate::utilities::{confirm, input};
use crate::view;

/// The interactive front-end: one state machine, rendered as it changes.
pub struct App {
    config: AppConfig,
    config_path: Option<PathBuf>,
    /// `--base-url` for this session only, never written to the config file.
    base_url_override: Option<String>,
    machine: LookupStateMachine,
    player: Box<dyn Player>,
}

fn build_lookup(api: &ApiConfig) -> anyhow::Result<Arc<dyn Lookup>> {
    if api.is_default() {
        return Ok(Dictionary::shared());
    }
    let dictionary = match api.timeout() {
        Some(timeout) => Dictionary::with_timeout(&api.base_url, timeout)?,
        None => Dictionary::with_base_url(&api.base_url)?,
    };
    Ok(Arc::new(dictionary))
}

/// The api settings in effect, with the command line override applied.
fn session_api(api: &ApiConfig, base_url_override: Option<&str>) -> ApiConfig {
    let mut api = api.clone();
    if let Some(base_url) = base_url_override {
        api.base_url = base_url.to_owned();
    }
    api
}

impl App {
    pub fn new(
        config: AppConfig,
        config_path: Option<PathBuf>,
        base_url_override: Option<String>,
    ) -> anyhow::Result<Self> {
        let lookup = build_lookup(&session_api(&config.api, base_url_override.as_deref()))?;
        let player = Box::new(CommandPlayer::new(&config.audio));
        Ok(Self::with_parts(
            config,
            config_path,
            base_url_override,
            lookup,
            player,
        ))
    }

    fn with_parts(
        config: AppConfig,
        config_path: Option<PathBuf>,
        base_url_override: Option<String>,
        lookup: Arc<dyn Lookup>,
        player: Box<dyn Player>,
    ) -> Self {
        Self {
            config,
            config_path,
            base_url_override,
            machine: LookupStateMachine::new(lookup),
            player,
        }
    }

    /// Looks `word` up and prints every status change until it settles.
    pub async fn define(&self, word: &str) -> anyhow::Result<LookupStatus> {
        self.define_with(word, |status| println!("{}", view::render_status(status)))
            .await
    }

    async fn define_with(
        &self,
        word: &str,
        mut show: impl FnMut(&LookupStatus),
    ) -> anyhow::Result<LookupStatus> {
        let mut changes = self.machine.subscribe();
        let request = self.machine.fetch(word);
        loop {
            let snapshot = changes.borrow_and_update().clone();
            if snapshot.request == Some(request) {
                show(&snapshot.status);
                if snapshot.status.is_settled() {
                    return Ok(snapshot.status);
                }
            }
            changes.changed().await?;
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", view::render_status(&self.machine.status()));
        loop {
            let Some(line) = input(">> ")? else {
                break;
            };
            let line = line.trim();
            let mut command_parts = line.split_ascii_whitespace();
            let Some(command) = command_parts.next() else {
                continue;
            };
            let rest = command_parts.collect::<Vec<&str>>().join(" ");
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "define" | "find" | "search" => {
                    self.define(&rest).await?;
                }
                "play" => {
                    if let Err(error) = self.play(&rest) {
                        println!("{error}");
                    }
                }
                "back" => {
                    println!("{}", view::render_status(&self.machine.status()));
                }
                "settings" => {
                    println!(
                        "{}",
                        view::render_settings(&self.config, self.config_path.as_deref())
                    );
                }
                "set" => {
                    let (key, value) = rest.split_once(' ').unwrap_or((rest.as_str(), ""));
                    if let Err(error) = self.apply_setting(key, value) {
                        println!("Couldn't change the setting: {error:#}");
                    } else if let Err(error) = self.offer_save() {
                        println!("Changed the setting, but couldn't save it: {error:#}");
                    }
                }
                "help" => {
                    println!("{}", view::render_help());
                }
                _ => {
                    println!("Unknown command {command}. Type help for a list of commands.");
                }
            }
        }
        Ok(())
    }

    fn play(&self, index: &str) -> anyhow::Result<()> {
        let LookupStatus::Success(words) = self.machine.status() else {
            bail!("Nothing to play, look a word up first.");
        };
        let urls = view::audio_urls(&words);
        if urls.is_empty() {
            bail!("This word has no pronunciation audio.");
        }
        let url = index
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| urls.get(index.wrapping_sub(1)))
            .ok_or_else(|| anyhow::anyhow!("Pick an audio between 1 and {}.", urls.len()))?;
        self.player.play(url)
    }

    /// Changes one setting for this session.
    fn apply_setting(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut config = self.config.clone();
        config.set(key, value)?;
        // an explicit setting replaces the command line override
        let base_url_override = match key {
            "api.base_url" => None,
            _ => self.base_url_override.clone(),
        };

        let api = session_api(&config.api, base_url_override.as_deref());
        if api != session_api(&self.config.api, self.base_url_override.as_deref()) {
            // a new endpoint starts over from Idle
            self.machine = LookupStateMachine::new(build_lookup(&api)?);
        }
        if config.audio != self.config.audio {
            self.player = Box::new(CommandPlayer::new(&config.audio));
        }
        if config.log != self.config.log {
            println!("The log filter applies from the next start.");
        }
        self.config = config;
        self.base_url_override = base_url_override;
        info!(key, value, "setting changed");
        Ok(())
    }

    fn offer_save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        let prompt = format!("Save settings to {}? (Y/n): ", path.display());
        if confirm(&prompt, true)? {
            config::save_to(path, &self.config)?;
            println!("Saved the settings successfully.");
        }
        Ok(())
    }
}
