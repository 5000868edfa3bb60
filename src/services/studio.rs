use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::core::catalog::{PlotStructure, PLOT_STRUCTURES, STORY_GENRES, WRITING_STYLES};
use crate::core::config::{Config, GenerationConfig};
use crate::core::io::Storage;
use crate::core::model::{
    Category, DialogueRequest, GenerationRequest, GenerationResponse, PlotRequest,
    StoryIdeaRequest, WritingPromptRequest,
};
use crate::core::state::{SavedPiece, UserProfile};
use crate::services::fallback::FallbackContext;
use crate::services::gateway::{GenerationGateway, GenerationOptions};
use crate::services::library::Library;
use crate::services::profile::ProfileStore;
use crate::services::prompts;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Request handlers: profile lookup, prompt building, generation and
/// response shaping for each category.
pub struct Studio {
    generation: GenerationConfig,
    gateway: GenerationGateway,
    profiles: ProfileStore,
    library: Library,
}

impl Studio {
    pub fn new(config: &Config, gateway: GenerationGateway, storage: Arc<dyn Storage>) -> Self {
        Self {
            generation: config.generation.clone(),
            gateway,
            profiles: ProfileStore::new(&config.profile_folder, storage.clone()),
            library: Library::new(&config.profile_folder, storage),
        }
    }

    pub fn is_online(&self) -> bool {
        self.gateway.is_online()
    }

    pub fn genres(&self) -> &'static [&'static str] {
        STORY_GENRES
    }

    pub fn writing_styles(&self) -> &'static [&'static str] {
        WRITING_STYLES
    }

    pub fn plot_structures(&self) -> &'static [PlotStructure] {
        PLOT_STRUCTURES
    }

    /// Never fails: an unreadable profile is logged and treated as empty.
    pub async fn profile(&self, visitor: &str) -> UserProfile {
        match self.profiles.load(visitor).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Could not load profile for {}: {:#}", visitor, e);
                UserProfile::default()
            }
        }
    }

    pub async fn save_profile(&self, visitor: &str, profile: UserProfile) -> Result<UserProfile> {
        let profile = profile.normalized();
        self.profiles.save(visitor, &profile).await?;
        info!("Profile saved for {}", visitor);
        Ok(profile)
    }

    pub async fn generate(&self, visitor: &str, request: &GenerationRequest) -> GenerationResponse {
        let profile = self.profile(visitor).await;
        self.generate_for(&profile, request).await
    }

    pub async fn generate_for(
        &self,
        profile: &UserProfile,
        request: &GenerationRequest,
    ) -> GenerationResponse {
        match request {
            GenerationRequest::StoryIdea(r) => self.story_idea(profile, r).await,
            GenerationRequest::Plot(r) => self.plot(profile, r).await,
            GenerationRequest::Dialogue(r) => self.dialogue(profile, r).await,
            GenerationRequest::WritingPrompt(r) => self.writing_prompt(profile, r).await,
        }
    }

    fn options(&self, category: Category, context: &[(&str, &str)]) -> GenerationOptions {
        let settings = self.generation.settings_for(category);
        GenerationOptions {
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            response_type: category.response_type().to_string(),
            extra_context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<FallbackContext>(),
        }
    }

    pub async fn story_idea(
        &self,
        profile: &UserProfile,
        request: &StoryIdeaRequest,
    ) -> GenerationResponse {
        let built = prompts::story_idea_prompt(request, profile, &mut rand::rng());
        let options = self.options(
            Category::StoryIdea,
            &[("genre", built.genre.as_str()), ("style", built.style.as_str())],
        );
        let idea = self.gateway.generate(&built.text, &options).await;

        GenerationResponse::StoryIdea {
            idea,
            genre: built.genre,
            style: built.style,
            timestamp: timestamp(),
        }
    }

    pub async fn plot(&self, profile: &UserProfile, request: &PlotRequest) -> GenerationResponse {
        let built = prompts::plot_prompt(request, profile);
        let options = self.options(Category::Plot, &[("structure", built.structure.as_str())]);
        let plot = self.gateway.generate(&built.text, &options).await;

        GenerationResponse::Plot {
            plot,
            structure: built.structure,
            timestamp: timestamp(),
        }
    }

    pub async fn dialogue(
        &self,
        profile: &UserProfile,
        request: &DialogueRequest,
    ) -> GenerationResponse {
        let built = prompts::dialogue_prompt(request, profile);
        let options = self.options(
            Category::Dialogue,
            &[("characters", built.characters.as_str())],
        );
        let dialogue = self.gateway.generate(&built.text, &options).await;

        GenerationResponse::Dialogue {
            dialogue,
            characters: built.characters,
            scene_context: built.scene_context,
            mood: built.mood,
            timestamp: timestamp(),
        }
    }

    pub async fn writing_prompt(
        &self,
        profile: &UserProfile,
        request: &WritingPromptRequest,
    ) -> GenerationResponse {
        let built = prompts::writing_prompt_prompt(request, profile, &mut rand::rng());
        let options = self.options(
            Category::WritingPrompt,
            &[("type", built.prompt_type.as_str())],
        );
        let prompt = self.gateway.generate(&built.text, &options).await;

        GenerationResponse::WritingPrompt {
            prompt,
            prompt_type: built.prompt_type,
            timestamp: timestamp(),
        }
    }

    pub async fn save_piece(
        &self,
        visitor: &str,
        response: &GenerationResponse,
    ) -> Result<SavedPiece> {
        self.library
            .save(visitor, response.category(), response.text(), Local::now())
            .await
    }

    pub async fn saved_pieces(&self, visitor: &str, category: Category) -> Result<Vec<SavedPiece>> {
        self.library.list(visitor, category).await
    }

    pub async fn remove_piece(&self, visitor: &str, category: Category, id: i64) -> Result<bool> {
        self.library.remove(visitor, category, id).await
    }

    pub async fn clear_library(&self, visitor: &str, category: Category) -> Result<()> {
        self.library.clear(visitor, category).await?;
        info!("Cleared {} library for {}", category.response_type(), visitor);
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::MemoryStorage;
    use crate::services::fallback::get_fallback;
    use crate::services::llm::{BackendError, CompletionParams, LlmClient};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    /// Echoes the prompt back and records the parameters it was given.
    #[derive(Debug, Default)]
    struct EchoLlm {
        calls: Arc<Mutex<Vec<CompletionParams>>>,
    }

    #[async_trait]
    impl LlmClient for EchoLlm {
        async fn complete(
            &self,
            prompt: &str,
            params: &CompletionParams,
        ) -> Result<String, BackendError> {
            self.calls.lock().unwrap().push(*params);
            Ok(format!(" {} ", prompt))
        }
    }

    fn offline_studio() -> Studio {
        Studio::new(
            &Config::default(),
            GenerationGateway::offline(),
            Arc::new(MemoryStorage::new()),
        )
    }

    fn online_studio() -> (Studio, Arc<Mutex<Vec<CompletionParams>>>) {
        let llm = EchoLlm::default();
        let calls = llm.calls.clone();
        let studio = Studio::new(
            &Config::default(),
            GenerationGateway::with_client(Box::new(llm)),
            Arc::new(MemoryStorage::new()),
        );
        (studio, calls)
    }

    fn context(pairs: &[(&str, &str)]) -> FallbackContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_offline_story_idea_echoes_inputs() {
        let studio = offline_studio();
        let request = GenerationRequest::StoryIdea(StoryIdeaRequest {
            genre: Some("Cyberpunk".to_string()),
            style: Some("Gritty".to_string()),
            theme: None,
        });
        let response = studio.generate("ada", &request).await;

        match &response {
            GenerationResponse::StoryIdea { idea, genre, style, timestamp } => {
                assert_eq!(idea, &get_fallback("story_idea", &FallbackContext::new()));
                assert_eq!(genre, "Cyberpunk");
                assert_eq!(style, "Gritty");
                assert!(NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_plot_and_prompt_use_context() {
        let studio = offline_studio();

        let plot = studio
            .generate(
                "ada",
                &GenerationRequest::Plot(PlotRequest {
                    story_idea: Some("A thief of memories".to_string()),
                    structure: Some("Save the Cat".to_string()),
                }),
            )
            .await;
        assert_eq!(plot.text(), get_fallback("plot", &context(&[("structure", "Save the Cat")])));

        let prompt = studio
            .generate(
                "ada",
                &GenerationRequest::WritingPrompt(WritingPromptRequest {
                    prompt_type: Some("setting".to_string()),
                }),
            )
            .await;
        assert!(prompt.text().contains("a library that exists between dimensions"));
    }

    #[tokio::test]
    async fn test_dialogue_defaults() {
        let studio = offline_studio();
        let response = studio
            .generate("ada", &GenerationRequest::Dialogue(DialogueRequest::default()))
            .await;
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["mood"], "neutral");
        assert_eq!(value["characters"], "");
        assert_eq!(value["scene_context"], "");
        assert_eq!(value["dialogue"], get_fallback("dialogue", &FallbackContext::new()));
    }

    #[tokio::test]
    async fn test_category_settings_reach_backend() {
        let (studio, calls) = online_studio();
        let profile = UserProfile::default();

        let requests = [
            GenerationRequest::StoryIdea(StoryIdeaRequest::default()),
            GenerationRequest::Plot(PlotRequest::default()),
            GenerationRequest::Dialogue(DialogueRequest::default()),
            GenerationRequest::WritingPrompt(WritingPromptRequest::default()),
        ];
        for request in &requests {
            studio.generate_for(&profile, request).await;
        }

        let calls = calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                CompletionParams { max_tokens: 400, temperature: 0.9 },
                CompletionParams { max_tokens: 800, temperature: 0.7 },
                CompletionParams { max_tokens: 600, temperature: 0.8 },
                CompletionParams { max_tokens: 200, temperature: 0.9 },
            ]
        );
    }

    #[tokio::test]
    async fn test_saved_profile_personalises_prompt() {
        let (studio, _) = online_studio();
        studio
            .save_profile(
                "ada",
                UserProfile {
                    preferred_genres: vec!["Gothic".to_string(), "Gothic".to_string()],
                    voice_description: "Brooding".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let saved = studio.profile("ada").await;
        assert_eq!(saved.preferred_genres, vec!["Gothic"]);

        // The echo backend returns the prompt, trimmed by the gateway.
        let prompt = studio
            .generate(
                "ada",
                &GenerationRequest::WritingPrompt(WritingPromptRequest {
                    prompt_type: Some("character".to_string()),
                }),
            )
            .await;
        assert!(prompt
            .text()
            .starts_with("Create a compelling character prompt for Gothic fiction."));

        let dialogue = studio
            .generate("ada", &GenerationRequest::Dialogue(DialogueRequest::default()))
            .await;
        assert!(dialogue.text().contains("Dialogue style: Brooding."));

        let other = studio
            .generate("grace", &GenerationRequest::Dialogue(DialogueRequest::default()))
            .await;
        assert!(!other.text().contains("Dialogue style"));
    }

    #[tokio::test]
    async fn test_unreadable_profile_is_treated_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write("profiles/ada/user_profile.json", b"{broken")
            .await
            .unwrap();
        let studio = Studio::new(&Config::default(), GenerationGateway::offline(), storage);

        assert_eq!(studio.profile("ada").await, UserProfile::default());
        let response = studio
            .generate("ada", &GenerationRequest::Plot(PlotRequest::default()))
            .await;
        assert!(response.text().starts_with("**Plot Outline - Three-Act Structure**"));
    }

    #[tokio::test]
    async fn test_save_generated_piece() {
        let studio = offline_studio();
        let response = studio
            .generate("ada", &GenerationRequest::StoryIdea(StoryIdeaRequest::default()))
            .await;

        let piece = studio.save_piece("ada", &response).await.unwrap();
        assert_eq!(piece.content, response.text());

        let saved = studio.saved_pieces("ada", Category::StoryIdea).await.unwrap();
        assert_eq!(saved, vec![piece.clone()]);
        assert!(studio.remove_piece("ada", Category::StoryIdea, piece.id).await.unwrap());

        studio.save_piece("ada", &response).await.unwrap();
        studio.clear_library("ada", Category::StoryIdea).await.unwrap();
        assert!(studio.saved_pieces("ada", Category::StoryIdea).await.unwrap().is_empty());
    }

    #[test]
    fn test_catalog_listing() {
        let studio = offline_studio();
        assert_eq!(studio.plot_structures().len(), 3);
        assert_eq!(studio.genres().len(), 15);
        assert_eq!(studio.writing_styles().len(), 13);
    }
}
