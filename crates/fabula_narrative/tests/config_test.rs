//! Configuration files and override files.

mod test_utils;

use fabula_error::FabulaErrorKind;
use fabula_narrative::{ClarifyRequest, CotEngine, EngineConfig, Stage};
use std::io::Write;
use tempfile::TempDir;
use test_utils::*;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
    path
}

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "model = \"gpt-4.1-mini\"\ntimeout_secs = 30\n\n[stages.story]\nmax_tokens = 6000"
    )
    .expect("write config");

    let config = EngineConfig::from_file(file.path()).expect("config loads");
    assert_eq!(config.model(), "gpt-4.1-mini");
    assert_eq!(config.timeout().as_secs(), 30);
    assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
    assert_eq!(config.sampling(Stage::Story).max_tokens, 6000);
    assert_eq!(config.sampling(Stage::Story).temperature, 0.75);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let result = EngineConfig::load_with(Some(dir.path().join("absent.toml").as_path()));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_override_files_reach_the_prompt() {
    let dir = TempDir::new().expect("temp dir");
    let templates = write_file(
        &dir,
        "prompts.toml",
        "clarify = '''\n關於{{focus_creature}}，請問一個問題。\n'''\n",
    );
    let roster = write_file(
        &dir,
        "creatures.toml",
        "[[creature]]\nzh_name = \"皮卡丘\"\nen_name = \"Pikachu (custom)\"\n",
    );
    let config_path = write_file(
        &dir,
        "fabula.toml",
        &format!(
            "templates = {:?}\nroster = {:?}\n",
            templates.display().to_string(),
            roster.display().to_string()
        ),
    );

    let config = EngineConfig::from_file(&config_path).expect("config loads");
    let driver = ScriptedDriver::answering(["皮卡丘害怕什麼？"]);
    let engine = CotEngine::with_config(driver.clone(), config).expect("overrides load");

    let request = ClarifyRequest::builder()
        .story(friendship_request())
        .context(STORY_DRAFT)
        .build()
        .expect("builder fields set");
    engine
        .ask_clarifying_question(&request)
        .await
        .expect("question succeeds");

    assert_eq!(driver.prompt(0), "關於皮卡丘 (Pikachu (custom))，請問一個問題。");
    assert!(engine.templates().get(Stage::Plan).is_some());
}

#[test]
fn test_template_override_with_foreign_field_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let templates = write_file(&dir, "prompts.toml", "twists = \"{{theme}}\"\n");
    let config_path = write_file(
        &dir,
        "fabula.toml",
        &format!("templates = {:?}\n", templates.display().to_string()),
    );

    let config = EngineConfig::from_file(&config_path).expect("config loads");
    let err = CotEngine::with_config(ScriptedDriver::new_sequence(Vec::new()), config).unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Template(_)));
}
