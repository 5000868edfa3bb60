use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StoryIdea,
    Plot,
    Dialogue,
    WritingPrompt,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::StoryIdea,
        Category::Plot,
        Category::Dialogue,
        Category::WritingPrompt,
    ];

    /// Identifier the fallback catalog matches on.
    pub fn response_type(self) -> &'static str {
        match self {
            Category::StoryIdea => "story_idea",
            Category::Plot => "plot",
            Category::Dialogue => "dialogue",
            Category::WritingPrompt => "prompt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::StoryIdea => "Story idea",
            Category::Plot => "Plot outline",
            Category::Dialogue => "Dialogue scene",
            Category::WritingPrompt => "Writing prompt",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryIdeaRequest {
    pub genre: Option<String>,
    pub style: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotRequest {
    pub story_idea: Option<String>,
    pub structure: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueRequest {
    pub characters: Option<String>,
    pub scene_context: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingPromptRequest {
    #[serde(rename = "type")]
    pub prompt_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum GenerationRequest {
    StoryIdea(StoryIdeaRequest),
    Plot(PlotRequest),
    Dialogue(DialogueRequest),
    WritingPrompt(WritingPromptRequest),
}

impl GenerationRequest {
    pub fn category(&self) -> Category {
        match self {
            GenerationRequest::StoryIdea(_) => Category::StoryIdea,
            GenerationRequest::Plot(_) => Category::Plot,
            GenerationRequest::Dialogue(_) => Category::Dialogue,
            GenerationRequest::WritingPrompt(_) => Category::WritingPrompt,
        }
    }
}

/// Payload returned for every generation call. Field names follow the
/// JSON the front end reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    StoryIdea {
        idea: String,
        genre: String,
        style: String,
        timestamp: String,
    },
    Plot {
        plot: String,
        structure: String,
        timestamp: String,
    },
    Dialogue {
        dialogue: String,
        characters: String,
        scene_context: String,
        mood: String,
        timestamp: String,
    },
    WritingPrompt {
        prompt: String,
        #[serde(rename = "type")]
        prompt_type: String,
        timestamp: String,
    },
}

impl GenerationResponse {
    pub fn category(&self) -> Category {
        match self {
            GenerationResponse::StoryIdea { .. } => Category::StoryIdea,
            GenerationResponse::Plot { .. } => Category::Plot,
            GenerationResponse::Dialogue { .. } => Category::Dialogue,
            GenerationResponse::WritingPrompt { .. } => Category::WritingPrompt,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            GenerationResponse::StoryIdea { idea, .. } => idea,
            GenerationResponse::Plot { plot, .. } => plot,
            GenerationResponse::Dialogue { dialogue, .. } => dialogue,
            GenerationResponse::WritingPrompt { prompt, .. } => prompt,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            GenerationResponse::StoryIdea { timestamp, .. }
            | GenerationResponse::Plot { timestamp, .. }
            | GenerationResponse::Dialogue { timestamp, .. }
            | GenerationResponse::WritingPrompt { timestamp, .. } => timestamp,
        }
    }
}

/// Treats a missing or blank field as absent.
pub fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tagging() {
        let json = r#"{"category": "plot", "story_idea": "A heist on the moon", "structure": "Save the Cat"}"#;
        let request: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.category(), Category::Plot);
        assert_eq!(
            request,
            GenerationRequest::Plot(PlotRequest {
                story_idea: Some("A heist on the moon".to_string()),
                structure: Some("Save the Cat".to_string()),
            })
        );
    }

    #[test]
    fn test_request_fields_are_optional() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"category": "writing_prompt"}"#).unwrap();
        assert_eq!(
            request,
            GenerationRequest::WritingPrompt(WritingPromptRequest::default())
        );

        let request: GenerationRequest =
            serde_json::from_str(r#"{"category": "writing_prompt", "type": "setting"}"#).unwrap();
        assert_eq!(
            request,
            GenerationRequest::WritingPrompt(WritingPromptRequest {
                prompt_type: Some("setting".to_string())
            })
        );
    }

    #[test]
    fn test_response_shape() {
        let response = GenerationResponse::WritingPrompt {
            prompt: "Write about rain.".to_string(),
            prompt_type: "general".to_string(),
            timestamp: "2024-01-01 10:00:00".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["prompt"], "Write about rain.");
        assert_eq!(value["type"], "general");
        assert_eq!(value["timestamp"], "2024-01-01 10:00:00");
    }

    #[test]
    fn test_provided_ignores_blank() {
        assert_eq!(provided(&None), None);
        assert_eq!(provided(&Some("  ".to_string())), None);
        assert_eq!(provided(&Some(" Noir ".to_string())), Some("Noir"));
    }
}
