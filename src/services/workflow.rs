use anyhow::{Context, Result};
use inquire::{Confirm, InquireError, Select, Text};
use log::info;
use std::fmt;

use crate::core::catalog::DEFAULT_STRUCTURE;
use crate::core::config::Config;
use crate::core::model::{
    Category, DialogueRequest, GenerationRequest, GenerationResponse, PlotRequest,
    StoryIdeaRequest, WritingPromptRequest,
};
use crate::services::setup::run_setup;
use crate::services::studio::Studio;

const RANDOM: &str = "(random)";
const PROMPT_TYPES: &[&str] = &["general", "character", "setting", "conflict", "dialogue"];
const KEEP: &str = "Back to menu";
const REMOVE_ONE: &str = "Remove a piece";
const CLEAR_ALL: &str = "Clear this category";
const LIBRARY_ACTIONS: &[&str] = &[KEEP, REMOVE_ONE, CLEAR_ALL];

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Generate(Category),
    Profile,
    Library,
    Structures,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Generate(category) => write!(f, "Generate: {}", category.label()),
            MenuItem::Profile => write!(f, "Edit creative profile"),
            MenuItem::Library => write!(f, "Browse saved pieces"),
            MenuItem::Structures => write!(f, "Show plot structures"),
            MenuItem::Quit => write!(f, "Quit"),
        }
    }
}

fn menu() -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = Category::ALL.iter().copied().map(MenuItem::Generate).collect();
    items.extend([MenuItem::Profile, MenuItem::Library, MenuItem::Structures, MenuItem::Quit]);
    items
}

/// Interactive terminal session for a single visitor.
pub struct WorkflowManager {
    visitor: String,
    studio: Studio,
    last_idea: Option<String>,
}

impl WorkflowManager {
    pub fn new(config: &Config, studio: Studio) -> Self {
        Self {
            visitor: config.visitor.clone(),
            studio,
            last_idea: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if !self.studio.is_online() {
            println!("Running in demo mode: responses are pre-written samples.");
        }
        info!("Session started for {}", self.visitor);

        loop {
            let choice = match Select::new("What would you like to do?", menu()).prompt() {
                Ok(choice) => choice,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e.into()),
            };

            match choice {
                MenuItem::Generate(category) => self.generate(category).await?,
                MenuItem::Profile => {
                    run_setup(&self.studio, &self.visitor).await?;
                }
                MenuItem::Library => self.browse_library().await?,
                MenuItem::Structures => self.show_structures(),
                MenuItem::Quit => break,
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    async fn generate(&mut self, category: Category) -> Result<()> {
        let request = self.ask_request(category)?;
        println!("Generating {}...", category.label().to_lowercase());
        let response = self.studio.generate(&self.visitor, &request).await;
        print_response(&response);
        remember_idea(&mut self.last_idea, &response);

        if Confirm::new("Save to your library?").with_default(false).prompt()? {
            let piece = self.studio.save_piece(&self.visitor, &response).await?;
            println!("Saved (id {}).", piece.id);
        }
        Ok(())
    }

    fn ask_request(&self, category: Category) -> Result<GenerationRequest> {
        let request = match category {
            Category::StoryIdea => GenerationRequest::StoryIdea(StoryIdeaRequest {
                genre: pick_or_random("Genre:", self.studio.genres())?,
                style: pick_or_random("Writing style:", self.studio.writing_styles())?,
                theme: Some(Text::new("Theme (optional):").prompt()?),
            }),
            Category::Plot => {
                let mut input = Text::new("Story idea:")
                    .with_help_message("Paste a premise or a generated idea");
                if let Some(idea) = &self.last_idea {
                    input = input.with_initial_value(idea);
                }
                let story_idea = input.prompt()?;
                let names: Vec<&str> =
                    self.studio.plot_structures().iter().map(|s| s.name).collect();
                let structure = Select::new("Plot structure:", names).prompt()?;
                GenerationRequest::Plot(PlotRequest {
                    story_idea: Some(story_idea),
                    structure: Some(structure.to_string()),
                })
            }
            Category::Dialogue => GenerationRequest::Dialogue(DialogueRequest {
                characters: Some(Text::new("Characters:").prompt()?),
                scene_context: Some(Text::new("Scene context:").prompt()?),
                mood: Some(Text::new("Mood/tone:").with_placeholder("neutral").prompt()?),
            }),
            Category::WritingPrompt => {
                let prompt_type = Select::new("Prompt type:", PROMPT_TYPES.to_vec()).prompt()?;
                GenerationRequest::WritingPrompt(WritingPromptRequest {
                    prompt_type: Some(prompt_type.to_string()),
                })
            }
        };
        Ok(request)
    }

    async fn browse_library(&self) -> Result<()> {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        let label = Select::new("Which pieces?", labels).prompt()?;
        let Some(category) = Category::ALL.into_iter().find(|c| c.label() == label) else {
            return Ok(());
        };

        let pieces = self.studio.saved_pieces(&self.visitor, category).await?;
        if pieces.is_empty() {
            println!("Nothing saved yet.");
            return Ok(());
        }
        for piece in &pieces {
            println!("\n[{}] {}\n{}", piece.id, piece.timestamp, piece.content);
        }

        match Select::new("Next:", LIBRARY_ACTIONS.to_vec()).prompt()? {
            REMOVE_ONE => {
                let ids: Vec<i64> = pieces.iter().map(|p| p.id).collect();
                let id = Select::new("Piece id:", ids).prompt()?;
                if self.studio.remove_piece(&self.visitor, category, id).await? {
                    println!("Removed {}.", id);
                }
            }
            CLEAR_ALL => {
                let prompt = format!("Delete all {} saved pieces?", pieces.len());
                if Confirm::new(&prompt).with_default(false).prompt()? {
                    self.studio.clear_library(&self.visitor, category).await?;
                    println!("Cleared.");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn show_structures(&self) {
        for structure in self.studio.plot_structures() {
            let marker = if structure.name == DEFAULT_STRUCTURE { " (default)" } else { "" };
            println!("\n{}{}: {}", structure.name, marker, structure.description);
            for (i, act) in structure.acts.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, act);
            }
        }
        println!();
    }
}

/// The latest story idea becomes the starting text of the next plot request.
fn remember_idea(last_idea: &mut Option<String>, response: &GenerationResponse) {
    if let GenerationResponse::StoryIdea { idea, .. } = response {
        *last_idea = Some(idea.clone());
    }
}

fn pick_or_random(prompt: &str, options: &[&str]) -> Result<Option<String>> {
    let mut choices = vec![RANDOM];
    choices.extend_from_slice(options);
    let choice = Select::new(prompt, choices).prompt()?;
    Ok((choice != RANDOM).then(|| choice.to_string()))
}

fn print_response(response: &GenerationResponse) {
    println!("\n{}\n", response.text());
    match response {
        GenerationResponse::StoryIdea { genre, style, .. } => {
            println!("Genre: {} | Style: {}", genre, style)
        }
        GenerationResponse::Plot { structure, .. } => println!("Structure: {}", structure),
        GenerationResponse::Dialogue { mood, .. } => println!("Mood: {}", mood),
        GenerationResponse::WritingPrompt { prompt_type, .. } => println!("Type: {}", prompt_type),
    }
    println!("Generated at {}\n", response.timestamp());
}

/// One-shot mode: reads a JSON request from `path` and prints the JSON
/// response.
pub async fn run_request_file(studio: &Studio, visitor: &str, path: &str) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let request: GenerationRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request in {}", path))?;

    let response = studio.generate(visitor, &request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
