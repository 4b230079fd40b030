//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fabula::LogFormat;
use std::path::PathBuf;

/// Fabula - creature story generation by prompt chaining
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(about = "Plan, write and refine short creature adventures with an LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest how to make a story request more detailed
    Suggest(DraftArgs),

    /// Draft and review a story plan
    Plan(StoryArgs),

    /// Write and review a full story from a plan
    Story {
        #[command(flatten)]
        story: StoryArgs,

        /// File holding the reviewed plan to write from
        #[arg(long)]
        plan_file: PathBuf,
    },

    /// Plan, review, write and review in one go
    Complete(StoryArgs),

    /// Propose ways to elaborate a synopsis
    Elaborate(DraftArgs),

    /// Profile every creature of a story
    Profiles {
        #[command(flatten)]
        story: StoryArgs,

        /// Plan to give the profiles context
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Describe the story's setting
    Setting {
        /// Story theme
        #[arg(long)]
        theme: String,

        /// Story genre (preset label or free text)
        #[arg(long)]
        genre: String,

        /// Synopsis or idea
        #[arg(long)]
        synopsis: Option<String>,

        /// Plan to give the description context
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Suggest plot twists for a plan
    Twists {
        /// File holding the plan
        #[arg(long)]
        plan_file: PathBuf,

        /// Plan excerpt to focus on
        #[arg(long)]
        section: Option<String>,
    },

    /// Rewrite a story in another style or tone
    Restyle {
        /// File holding the story text
        #[arg(long)]
        story_file: PathBuf,

        /// Target style, e.g. "更幽默詼諧"
        #[arg(long)]
        style: String,

        /// Theme of the story
        #[arg(long)]
        theme: Option<String>,

        /// Genre of the story
        #[arg(long)]
        genre: Option<String>,
    },

    /// Suggest ways a story fragment could continue
    Branch {
        /// File holding the story fragment
        #[arg(long)]
        story_file: PathBuf,

        /// Theme of the story
        #[arg(long)]
        theme: Option<String>,

        /// Genre of the story
        #[arg(long)]
        genre: Option<String>,

        /// Plan guiding the story
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Ask one question that helps develop the story
    Clarify {
        #[command(flatten)]
        story: StoryArgs,

        /// File holding the story so far
        #[arg(long)]
        story_file: PathBuf,

        /// Creature the question should be about
        #[arg(long)]
        focus: Option<String>,
    },

    /// List stages with their template fields and sampling
    Stages,
}

/// A complete story request.
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Central theme, e.g. "友情"
    #[arg(long)]
    pub theme: String,

    /// Genre: a preset (冒險, adventure, 懸疑, mystery...) or free text
    #[arg(long)]
    pub genre: String,

    /// Creature to include; repeat or separate with commas
    #[arg(short = 'c', long = "creature", value_delimiter = ',', required = true)]
    pub creatures: Vec<String>,

    /// Synopsis or story idea
    #[arg(long)]
    pub synopsis: Option<String>,

    /// Feature the creatures' traits and abilities
    #[arg(long)]
    pub include_traits: bool,
}

/// A possibly incomplete story request.
#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    /// Central theme
    #[arg(long)]
    pub theme: Option<String>,

    /// Genre
    #[arg(long)]
    pub genre: Option<String>,

    /// Creature to include; repeat or separate with commas
    #[arg(short = 'c', long = "creature", value_delimiter = ',')]
    pub creatures: Vec<String>,

    /// Synopsis or story idea
    #[arg(long)]
    pub synopsis: Option<String>,

    /// Feature the creatures' traits and abilities
    #[arg(long)]
    pub include_traits: bool,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn creatures_accept_commas_and_repeats() {
        let cli = Cli::parse_from([
            "fabula", "plan", "--theme", "友情", "--genre", "冒險", "-c", "皮卡丘,伊布", "-c",
            "超夢",
        ]);
        match cli.command {
            Commands::Plan(story) => {
                assert_eq!(story.creatures, vec!["皮卡丘", "伊布", "超夢"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from([
            "fabula",
            "twists",
            "--plan-file",
            "plan.txt",
            "--format",
            "json",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn plan_always_includes_the_review() {
        let result = Cli::try_parse_from([
            "fabula", "plan", "--theme", "友情", "--genre", "冒險", "-c", "皮卡丘", "--draft-only",
        ]);
        assert!(result.is_err());
    }
}
