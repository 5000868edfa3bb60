use rand::seq::IndexedRandom;
use rand::Rng;

use crate::core::catalog::{plot_structure, DEFAULT_STRUCTURE, STORY_GENRES, WRITING_STYLES};
use crate::core::model::{
    provided, DialogueRequest, PlotRequest, StoryIdeaRequest, WritingPromptRequest,
};
use crate::core::state::UserProfile;

pub const DEFAULT_MOOD: &str = "neutral";
pub const DEFAULT_PROMPT_TYPE: &str = "general";
const DEFAULT_PROFILE_GENRE: &str = "General";

/// A prompt together with the input values it was built from, after
/// defaults were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryIdeaPrompt {
    pub genre: String,
    pub style: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotPrompt {
    pub structure: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialoguePrompt {
    pub characters: String,
    pub scene_context: String,
    pub mood: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritingPromptPrompt {
    pub prompt_type: String,
    pub genre: String,
    pub text: String,
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

pub fn story_idea_prompt<R: Rng + ?Sized>(
    request: &StoryIdeaRequest,
    profile: &UserProfile,
    rng: &mut R,
) -> StoryIdeaPrompt {
    let genre = match provided(&request.genre) {
        Some(genre) => genre.to_string(),
        None => pick(STORY_GENRES, rng).to_string(),
    };
    let style = match provided(&request.style) {
        Some(style) => style.to_string(),
        None => pick(WRITING_STYLES, rng).to_string(),
    };

    let mut voice_context = String::new();
    if let Some(voice) = non_empty(&profile.voice_description) {
        voice_context.push_str(&format!("Writing style preference: {}. ", voice));
    }
    if let Some(authors) = non_empty(&profile.favorite_authors) {
        voice_context.push_str(&format!("Influenced by authors like: {}. ", authors));
    }

    let mut text = format!(
        "Generate a unique and compelling story idea for a {} story.\n",
        genre
    );
    if !voice_context.is_empty() {
        text.push_str(voice_context.trim_end());
        text.push('\n');
    }
    text.push_str(&format!("The story should have a {} writing style.\n", style));
    if let Some(theme) = provided(&request.theme) {
        text.push_str(&format!("Theme to incorporate: {}\n", theme));
    }
    text.push_str(
        "\nPlease provide:\n\
         1. A captivating title\n\
         2. A brief premise (2-3 sentences)\n\
         3. Main character description\n\
         4. Central conflict\n\
         5. Unique twist or hook\n\
         \n\
         Make it original and engaging:",
    );

    StoryIdeaPrompt { genre, style, text }
}

pub fn plot_prompt(request: &PlotRequest, profile: &UserProfile) -> PlotPrompt {
    let structure = provided(&request.structure)
        .unwrap_or(DEFAULT_STRUCTURE)
        .to_string();
    let info = plot_structure(&structure);
    let story_idea = provided(&request.story_idea).unwrap_or_default();

    let mut text = format!(
        "Create a detailed plot outline using the {} structure for this story idea:\n{}\n\n",
        structure, story_idea
    );
    if let Some(voice) = non_empty(&profile.voice_description) {
        text.push_str(&format!("Maintain this writing voice: {}.\n\n", voice));
    }
    text.push_str(&format!(
        "Structure: {}\n\n\
         Please break down the plot into these sections:\n{}\n\n\
         For each section, provide:\n\
         - What happens in this part\n\
         - Key scenes or beats\n\
         - Character development\n\
         - How it connects to the overall story\n\
         \n\
         Make it detailed enough to guide writing but flexible enough for creative freedom:",
        info.description,
        info.acts.join(", ")
    ));

    PlotPrompt { structure, text }
}

pub fn dialogue_prompt(request: &DialogueRequest, profile: &UserProfile) -> DialoguePrompt {
    let characters = provided(&request.characters).unwrap_or_default().to_string();
    let scene_context = provided(&request.scene_context).unwrap_or_default().to_string();
    let mood = provided(&request.mood).unwrap_or(DEFAULT_MOOD).to_string();

    let mut text = format!(
        "Write a dialogue scene with the following parameters:\n\n\
         Characters: {}\n\
         Scene context: {}\n\
         Mood/Tone: {}\n",
        characters, scene_context, mood
    );
    if let Some(voice) = non_empty(&profile.voice_description) {
        text.push_str(&format!("Dialogue style: {}.\n", voice));
    }
    text.push_str(
        "\nRequirements:\n\
         - Each character should have a distinct voice and speaking pattern\n\
         - Include appropriate action lines and scene description\n\
         - The dialogue should feel natural and advance the story\n\
         - Show character personality through speech patterns\n\
         - Include subtext and emotional depth\n\
         \n\
         Write the dialogue scene:",
    );

    DialoguePrompt {
        characters,
        scene_context,
        mood,
        text,
    }
}

pub fn writing_prompt_prompt<R: Rng + ?Sized>(
    request: &WritingPromptRequest,
    profile: &UserProfile,
    rng: &mut R,
) -> WritingPromptPrompt {
    let prompt_type = provided(&request.prompt_type)
        .unwrap_or(DEFAULT_PROMPT_TYPE)
        .to_string();

    let genres: Vec<&str> = profile
        .preferred_genres
        .iter()
        .filter_map(|g| non_empty(g))
        .collect();
    let genre = if genres.is_empty() {
        DEFAULT_PROFILE_GENRE.to_string()
    } else {
        pick(&genres, rng).to_string()
    };

    let lead = match prompt_type.as_str() {
        "character" => format!("Create a compelling character prompt for {} fiction", genre),
        "setting" => format!("Generate an intriguing setting prompt for {} stories", genre),
        "conflict" => format!("Develop a central conflict prompt for {} narratives", genre),
        "dialogue" => format!("Write a dialogue exercise prompt for {} characters", genre),
        _ => format!("Create an inspiring writing prompt for {} fiction", genre),
    };

    let text = format!(
        "{}.\n\n\
         Make it:\n\
         - Specific enough to spark creativity\n\
         - Open-ended enough for interpretation\n\
         - Engaging and thought-provoking\n\
         - Suitable for a 500-1000 word response\n\
         \n\
         Provide the writing prompt:",
        lead
    );

    WritingPromptPrompt {
        prompt_type,
        genre,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn idea(genre: &str, style: &str, theme: &str) -> StoryIdeaRequest {
        StoryIdeaRequest {
            genre: Some(genre.to_string()),
            style: Some(style.to_string()),
            theme: Some(theme.to_string()),
        }
    }

    #[test]
    fn test_story_idea_without_theme() {
        let request = idea("Cyberpunk", "Gritty", "");
        let built = story_idea_prompt(&request, &UserProfile::default(), &mut rng());
        assert!(built.text.contains("Cyberpunk"));
        assert!(built.text.contains("Gritty"));
        assert!(!built.text.contains("Theme to incorporate"));
        assert!(built.text.ends_with("Make it original and engaging:"));
        assert_eq!(built.genre, "Cyberpunk");
        assert_eq!(built.style, "Gritty");
    }

    #[test]
    fn test_story_idea_is_pure_when_inputs_given() {
        let request = idea("Mystery", "Poetic", "grief");
        let profile = UserProfile {
            voice_description: "Lyrical and sparse".to_string(),
            ..Default::default()
        };
        let a = story_idea_prompt(&request, &profile, &mut StdRng::seed_from_u64(1));
        let b = story_idea_prompt(&request, &profile, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
        assert!(a.text.contains("Theme to incorporate: grief"));
    }

    #[test]
    fn test_story_idea_voice_context() {
        let profile = UserProfile {
            voice_description: "Wry".to_string(),
            favorite_authors: "Le Guin, Pratchett".to_string(),
            ..Default::default()
        };
        let built = story_idea_prompt(&idea("Fantasy", "Humorous", ""), &profile, &mut rng());
        assert!(built.text.contains(
            "Writing style preference: Wry. Influenced by authors like: Le Guin, Pratchett."
        ));

        let request = idea("Fantasy", "Humorous", "");
        let bare = story_idea_prompt(&request, &UserProfile::default(), &mut rng());
        assert!(!bare.text.contains("Writing style preference"));
        assert!(!bare.text.contains("Influenced by"));
    }

    #[test]
    fn test_story_idea_defaults_come_from_catalog() {
        for seed in 0..20 {
            let built = story_idea_prompt(
                &StoryIdeaRequest::default(),
                &UserProfile::default(),
                &mut StdRng::seed_from_u64(seed),
            );
            assert!(STORY_GENRES.contains(&built.genre.as_str()));
            assert!(WRITING_STYLES.contains(&built.style.as_str()));
        }

        // Blank counts as missing.
        let built = story_idea_prompt(&idea(" ", "", ""), &UserProfile::default(), &mut rng());
        assert!(STORY_GENRES.contains(&built.genre.as_str()));
    }

    #[test]
    fn test_plot_unknown_structure_uses_three_act() {
        let request = PlotRequest {
            story_idea: Some("A lighthouse keeper".to_string()),
            structure: Some("Freytag's Pyramid".to_string()),
        };
        let built = plot_prompt(&request, &UserProfile::default());
        assert_eq!(built.structure, "Freytag's Pyramid");
        assert!(built.text.contains(
            "Structure: Classic Hollywood structure with clear beginning, middle, and end"
        ));
        assert!(built.text.contains("sections:\nSetup, Confrontation, Resolution\n"));
    }

    #[test]
    fn test_plot_keeps_act_order() {
        let request = PlotRequest {
            story_idea: None,
            structure: Some("Hero's Journey".to_string()),
        };
        let built = plot_prompt(&request, &UserProfile::default());
        let expected = plot_structure("Hero's Journey").acts.join(", ");
        assert!(built.text.contains(&expected));
        assert!(built
            .text
            .starts_with("Create a detailed plot outline using the Hero's Journey structure"));
        assert!(!built.text.contains("Maintain this writing voice"));
    }

    #[test]
    fn test_plot_defaults() {
        let profile = UserProfile {
            voice_description: "Terse".to_string(),
            ..Default::default()
        };
        let built = plot_prompt(&PlotRequest::default(), &profile);
        assert_eq!(built.structure, DEFAULT_STRUCTURE);
        assert!(built.text.contains("Maintain this writing voice: Terse."));
    }

    #[test]
    fn test_dialogue_mood_defaults_to_neutral() {
        let request = DialogueRequest {
            characters: Some("A knight, a dragon".to_string()),
            scene_context: Some("Tea time".to_string()),
            mood: None,
        };
        let built = dialogue_prompt(&request, &UserProfile::default());
        assert_eq!(built.mood, "neutral");
        assert!(built.text.contains("Characters: A knight, a dragon\n"));
        assert!(built.text.contains("Mood/Tone: neutral\n"));
        assert!(!built.text.contains("Dialogue style"));
    }

    #[test]
    fn test_writing_prompt_empty_genres() {
        let request = WritingPromptRequest {
            prompt_type: Some("setting".to_string()),
        };
        let built = writing_prompt_prompt(&request, &UserProfile::default(), &mut rng());
        assert_eq!(built.genre, "General");
        assert!(built
            .text
            .starts_with("Generate an intriguing setting prompt for General stories."));
        assert!(built.text.contains("- Suitable for a 500-1000 word response"));
    }

    #[test]
    fn test_writing_prompt_picks_from_profile() {
        let profile = UserProfile {
            preferred_genres: vec!["Horror".to_string(), "Solarpunk".to_string()],
            ..Default::default()
        };
        for seed in 0..20 {
            let built = writing_prompt_prompt(
                &WritingPromptRequest::default(),
                &profile,
                &mut StdRng::seed_from_u64(seed),
            );
            assert!(profile.preferred_genres.contains(&built.genre));
            assert_eq!(built.prompt_type, "general");
        }
    }

    #[test]
    fn test_writing_prompt_unknown_type_uses_general_lead() {
        let request = WritingPromptRequest {
            prompt_type: Some("haiku".to_string()),
        };
        let built = writing_prompt_prompt(&request, &UserProfile::default(), &mut rng());
        assert_eq!(built.prompt_type, "haiku");
        assert!(built
            .text
            .starts_with("Create an inspiring writing prompt for General fiction."));
    }
}
