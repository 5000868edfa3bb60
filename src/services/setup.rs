use anyhow::Result;
use inquire::{MultiSelect, Select, Text};

use crate::core::state::UserProfile;
use crate::services::studio::Studio;

const NO_STYLE: &str = "(no preference)";

/// Walks the visitor through their creative profile and saves it.
pub async fn run_setup(studio: &Studio, visitor: &str) -> Result<UserProfile> {
    let current = studio.profile(visitor).await;

    let name = Text::new("Name:")
        .with_initial_value(&current.name)
        .prompt()?;

    let catalog = studio.genres();
    let selected: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(_, g)| current.preferred_genres.iter().any(|p| p == *g))
        .map(|(i, _)| i)
        .collect();
    let mut preferred_genres: Vec<String> = MultiSelect::new("Preferred genres:", catalog.to_vec())
        .with_default(&selected)
        .prompt()?
        .into_iter()
        .map(str::to_string)
        .collect();

    // Genres outside the catalog are allowed.
    let custom_current = current
        .preferred_genres
        .iter()
        .filter(|g| !catalog.contains(&g.as_str()))
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let custom = Text::new("Other genres (comma separated):")
        .with_initial_value(&custom_current)
        .prompt()?;
    preferred_genres.extend(custom.split(',').map(|g| g.trim().to_string()));

    let mut styles = vec![NO_STYLE];
    styles.extend_from_slice(studio.writing_styles());
    let cursor = styles
        .iter()
        .position(|s| *s == current.writing_style)
        .unwrap_or(0);
    let writing_style = match Select::new("Writing style:", styles)
        .with_starting_cursor(cursor)
        .prompt()?
    {
        NO_STYLE => String::new(),
        style => style.to_string(),
    };

    let voice_description = Text::new("Describe your writing voice:")
        .with_initial_value(&current.voice_description)
        .with_help_message("Used to steer the tone of generated text")
        .prompt()?;
    let favorite_authors = Text::new("Favorite authors:")
        .with_initial_value(&current.favorite_authors)
        .prompt()?;
    let themes = Text::new("Themes you like to explore:")
        .with_initial_value(&current.themes)
        .prompt()?;

    let profile = studio
        .save_profile(
            visitor,
            UserProfile {
                name,
                preferred_genres,
                writing_style,
                voice_description,
                favorite_authors,
                themes,
            },
        )
        .await?;
    println!("Profile saved.");
    Ok(profile)
}
