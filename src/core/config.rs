use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::model::Category;
use crate::services::llm::LlmConfig;

const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_profile_folder")]
    pub profile_folder: String,

    /// Scope used for the profile and library when running from the terminal.
    #[serde(default = "default_visitor")]
    pub visitor: String,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Per-category sampling settings. Any field left out of `config.yml`
/// keeps that category's default.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(from = "GenerationOverrides")]
pub struct GenerationConfig {
    pub story_idea: GenerationSettings,
    pub plot: GenerationSettings,
    pub dialogue: GenerationSettings,
    pub prompt: GenerationSettings,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsOverride {
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl SettingsOverride {
    fn apply(self, base: GenerationSettings) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerationOverrides {
    story_idea: SettingsOverride,
    plot: SettingsOverride,
    dialogue: SettingsOverride,
    prompt: SettingsOverride,
}

impl From<GenerationOverrides> for GenerationConfig {
    fn from(o: GenerationOverrides) -> Self {
        Self {
            story_idea: o.story_idea.apply(default_story_idea_settings()),
            plot: o.plot.apply(default_plot_settings()),
            dialogue: o.dialogue.apply(default_dialogue_settings()),
            prompt: o.prompt.apply(default_prompt_settings()),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            story_idea: default_story_idea_settings(),
            plot: default_plot_settings(),
            dialogue: default_dialogue_settings(),
            prompt: default_prompt_settings(),
        }
    }
}

impl GenerationConfig {
    pub fn settings_for(&self, category: Category) -> GenerationSettings {
        match category {
            Category::StoryIdea => self.story_idea,
            Category::Plot => self.plot,
            Category::Dialogue => self.dialogue,
            Category::WritingPrompt => self.prompt,
        }
    }
}

fn default_profile_folder() -> String {
    "profiles".to_string()
}
fn default_visitor() -> String {
    "local".to_string()
}
fn default_story_idea_settings() -> GenerationSettings {
    GenerationSettings { max_tokens: 400, temperature: 0.9 }
}
fn default_plot_settings() -> GenerationSettings {
    GenerationSettings { max_tokens: 800, temperature: 0.7 }
}
fn default_dialogue_settings() -> GenerationSettings {
    GenerationSettings { max_tokens: 600, temperature: 0.8 }
}
fn default_prompt_settings() -> GenerationSettings {
    GenerationSettings { max_tokens: 200, temperature: 0.9 }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_folder: default_profile_folder(),
            visitor: default_visitor(),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Reads `config.yml` from the working directory and applies
    /// environment overrides. A missing file is not an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Environment keys win over the file so the key never has to be
    /// written to disk.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(self.llm.api_key_env()).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup("STORYLAB_MODEL").filter(|m| !m.trim().is_empty()) {
            self.llm.model = Some(model);
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.profile_folder)
            .with_context(|| format!("Failed to create {}", self.profile_folder))?;
        Ok(())
    }
}
