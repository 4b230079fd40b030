//! Command handlers.

use super::commands::{Cli, Commands, DraftArgs, OutputFormat, StoryArgs};
use fabula::{
    BranchRequest, CharacterProfile, ClarifyRequest, CompleteStory, ConfigError, CotEngine,
    DraftRequest, ElaborationRequest, EngineConfig, FabulaDriver, FabulaResult, FullStory, Genre,
    OpenAiClient, ProfileRequest, Reviewed, SettingDescription, SettingRequest, Stage,
    StoryPlan, StoryRequest, StyleRequest, SuggestionList, TwistRequest, ValidationError,
    ValidationErrorKind, client_config,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info};

/// Run the parsed command.
pub async fn run(cli: Cli) -> FabulaResult<()> {
    let config = EngineConfig::load_with(cli.config.as_deref())?;
    let format = cli.format;

    if let Commands::Stages = cli.command {
        return print_stages(&config, format);
    }

    let client = OpenAiClient::new(client_config(&config))?;
    info!(provider = client.provider_name(), model = client.model_name(), "Using backend");
    let engine = CotEngine::with_config(client, config)?;

    match cli.command {
        Commands::Suggest(args) => {
            let text = engine.suggest_refinements(&draft_request(args)).await?;
            emit(format, &text, |t| t.to_string())
        }
        Commands::Plan(story) => {
            let request = story_request(story)?;
            let reviewed = engine.generate_plan(&request).await?;
            emit(format, &reviewed, |r| render_reviewed("Plan", r))
        }
        Commands::Story { story, plan_file } => {
            let request = story_request(story)?;
            let plan = StoryPlan::new(read_text(&plan_file)?);
            let reviewed = engine.generate_story(&request, &plan).await?;
            emit(format, &reviewed, |r| render_reviewed("Story", r))
        }
        Commands::Complete(story) => {
            let request = story_request(story)?;
            let complete = engine.generate_complete_story(&request).await?;
            emit(format, &complete, render_complete)
        }
        Commands::Elaborate(args) => {
            let request = ElaborationRequest::builder()
                .theme(args.theme.unwrap_or_default())
                .genre(args.genre.as_deref().map(Genre::parse_label))
                .creatures(args.creatures)
                .synopsis(args.synopsis)
                .build()
                .map_err(incomplete)?;
            let list = engine.elaborate_synopsis(&request).await?;
            emit(format, &list, render_list)
        }
        Commands::Profiles { story, plan_file } => {
            let request = story_request(story)?;
            let plan = read_plan(plan_file.as_deref())?;
            let profiles = engine
                .develop_characters(&ProfileRequest::for_story(&request, plan))
                .await?;
            emit(format, &profiles, |p| render_profiles(p))
        }
        Commands::Setting {
            theme,
            genre,
            synopsis,
            plan_file,
        } => {
            let request = SettingRequest::builder()
                .theme(theme)
                .genre(Genre::parse_label(&genre))
                .synopsis(synopsis)
                .plan(read_plan(plan_file.as_deref())?)
                .build()
                .map_err(incomplete)?;
            let setting = engine.detail_setting(&request).await?;
            emit(format, &setting, render_setting)
        }
        Commands::Twists { plan_file, section } => {
            let request = TwistRequest::builder()
                .plan(StoryPlan::new(read_text(&plan_file)?))
                .section(section)
                .build()
                .map_err(incomplete)?;
            let list = engine.suggest_plot_twists(&request).await?;
            emit(format, &list, render_list)
        }
        Commands::Restyle {
            story_file,
            style,
            theme,
            genre,
        } => {
            let request = StyleRequest::builder()
                .text(read_text(&story_file)?)
                .style(style)
                .theme(theme)
                .genre(genre.as_deref().map(Genre::parse_label))
                .build()
                .map_err(incomplete)?;
            let text = engine.tune_style(&request).await?;
            emit(format, &text, |t| t.to_string())
        }
        Commands::Branch {
            story_file,
            theme,
            genre,
            plan_file,
        } => {
            let request = BranchRequest::builder()
                .segment(read_text(&story_file)?)
                .theme(theme)
                .genre(genre.as_deref().map(Genre::parse_label))
                .plan(read_plan(plan_file.as_deref())?)
                .build()
                .map_err(incomplete)?;
            let list = engine.suggest_branches(&request).await?;
            emit(format, &list, render_list)
        }
        Commands::Clarify {
            story,
            story_file,
            focus,
        } => {
            let request = ClarifyRequest::builder()
                .story(story_request(story)?)
                .context(read_text(&story_file)?)
                .focus_creature(focus)
                .build()
                .map_err(incomplete)?;
            let question = engine.ask_clarifying_question(&request).await?;
            emit(format, &question, |q| q.to_string())
        }
        Commands::Stages => Ok(()),
    }
}

fn story_request(args: StoryArgs) -> FabulaResult<StoryRequest> {
    let request = StoryRequest::builder()
        .theme(args.theme)
        .genre(Genre::parse_label(&args.genre))
        .creatures(args.creatures)
        .synopsis(args.synopsis)
        .include_traits(args.include_traits)
        .build()
        .map_err(incomplete)?;
    request.validate()?;
    Ok(request)
}

fn draft_request(args: DraftArgs) -> DraftRequest {
    DraftRequest {
        theme: args.theme,
        genre: args.genre.as_deref().map(Genre::parse_label),
        creatures: args.creatures,
        synopsis: args.synopsis,
        include_traits: args.include_traits,
    }
}

#[track_caller]
fn incomplete(e: impl Display) -> ValidationError {
    ValidationError::new(ValidationErrorKind::Incomplete(e.to_string()))
}

fn read_text(path: &Path) -> FabulaResult<String> {
    debug!(path = %path.display(), "Reading input file");
    let text = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::new(ValidationErrorKind::UnreadableInput {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;
    Ok(text)
}

fn read_plan(path: Option<&Path>) -> FabulaResult<Option<StoryPlan>> {
    path.map(|p| read_text(p).map(StoryPlan::new)).transpose()
}

/// Print `value` as pretty JSON or through `human`.
fn emit<T, F>(format: OutputFormat, value: &T, human: F) -> FabulaResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| ConfigError::new(format!("Failed to serialize output: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Human => println!("{}", human(value)),
    }
    Ok(())
}

fn render_reviewed<T: Display>(label: &str, reviewed: &Reviewed<T>) -> String {
    format!(
        "== Reviewer feedback ==\n{}\n\n== {} ==\n{}",
        reviewed.feedback(),
        label,
        reviewed.final_artifact()
    )
}

fn render_complete(complete: &CompleteStory) -> String {
    let story: &Reviewed<FullStory> = complete.story();
    format!(
        "{}\n\n{}\n\n({} words)",
        render_reviewed("Plan", complete.plan()),
        render_reviewed("Story", story),
        story.final_artifact().word_count()
    )
}

fn render_list(list: &SuggestionList) -> String {
    list.items()
        .iter()
        .map(|item| match item.title() {
            Some(title) => format!("{}. {}\n   {}", item.number(), title, item.body()),
            None => format!("{}. {}", item.number(), item.body()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_profiles(profiles: &[CharacterProfile]) -> String {
    let field = |label: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|v| format!("  {}: {}\n", label, v))
            .unwrap_or_default()
    };
    profiles
        .iter()
        .map(|p| {
            format!(
                "{}\n{}{}{}{}{}",
                p.creature(),
                field("Personality", p.personality()),
                field("Motivation", p.motivation()),
                field("Inner conflict", p.inner_conflict()),
                field("Relationships", p.relationships()),
                field("Monologue", p.monologue()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_setting(setting: &SettingDescription) -> String {
    match setting.name() {
        Some(name) => format!("== {} ==\n{}", name, setting.description()),
        None => setting.description().clone(),
    }
}

#[derive(Serialize)]
struct StageInfo {
    stage: Stage,
    fields: Vec<String>,
    max_tokens: u32,
    temperature: f32,
}

fn print_stages(config: &EngineConfig, format: OutputFormat) -> FabulaResult<()> {
    let rows: Vec<StageInfo> = Stage::all()
        .map(|stage| {
            let sampling = config.sampling(stage);
            StageInfo {
                stage,
                fields: stage.fields().iter().map(ToString::to_string).collect(),
                max_tokens: sampling.max_tokens,
                temperature: sampling.temperature,
            }
        })
        .collect();

    emit(format, rows.as_slice(), |rows| {
        rows.iter()
            .map(|r| {
                format!(
                    "{:<13} max_tokens={:<5} temperature={:<4} fields: {}",
                    r.stage.to_string(),
                    r.max_tokens,
                    r.temperature,
                    r.fields.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
