use serde::Serialize;

pub const STORY_GENRES: &[&str] = &[
    "Fantasy",
    "Science Fiction",
    "Mystery",
    "Romance",
    "Thriller",
    "Horror",
    "Adventure",
    "Drama",
    "Comedy",
    "Historical Fiction",
    "Western",
    "Dystopian",
    "Utopian",
    "Cyberpunk",
    "Steampunk",
];

pub const WRITING_STYLES: &[&str] = &[
    "Descriptive",
    "Minimalist",
    "Stream of consciousness",
    "Dialogue-heavy",
    "Action-packed",
    "Contemplative",
    "Humorous",
    "Dark",
    "Whimsical",
    "Gritty",
    "Poetic",
    "Straightforward",
    "Experimental",
];

pub const DEFAULT_STRUCTURE: &str = "Three-Act Structure";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PlotStructure {
    pub name: &'static str,
    pub acts: &'static [&'static str],
    pub description: &'static str,
}

pub const PLOT_STRUCTURES: &[PlotStructure] = &[
    PlotStructure {
        name: "Three-Act Structure",
        acts: &["Setup", "Confrontation", "Resolution"],
        description: "Classic Hollywood structure with clear beginning, middle, and end",
    },
    PlotStructure {
        name: "Hero's Journey",
        acts: &[
            "Ordinary World",
            "Call to Adventure",
            "Refusal of the Call",
            "Meeting the Mentor",
            "Crossing the Threshold",
            "Tests and Allies",
            "Approach to the Inmost Cave",
            "The Ordeal",
            "Reward",
            "The Road Back",
            "Resurrection",
            "Return with Elixir",
        ],
        description: "Joseph Campbell's monomyth structure",
    },
    PlotStructure {
        name: "Save the Cat",
        acts: &[
            "Opening Image",
            "Theme Stated",
            "Setup",
            "Catalyst",
            "Debate",
            "Break into Two",
            "B Story",
            "Fun and Games",
            "Midpoint",
            "Bad Guys Close In",
            "All Is Lost",
            "Dark Night of the Soul",
            "Break into Three",
            "Finale",
            "Final Image",
        ],
        description: "Blake Snyder's detailed beat sheet structure",
    },
];

/// Looks up a plot structure by exact name. Unknown names resolve to the
/// Three-Act Structure.
pub fn plot_structure(name: &str) -> &'static PlotStructure {
    PLOT_STRUCTURES
        .iter()
        .find(|s| s.name == name)
        .unwrap_or(&PLOT_STRUCTURES[0])
}
