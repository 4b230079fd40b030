//! Auxiliary stages against a scripted driver.

mod test_utils;

use fabula_core::{DraftRequest, Genre, StoryPlan, estimate_word_count};
use fabula_error::{FabulaErrorKind, ParseErrorKind};
use fabula_narrative::{
    BranchRequest, ClarifyRequest, CotEngine, ElaborationRequest, EngineConfig, NO_SUGGESTIONS,
    ProfileRequest, SettingRequest, Stage, StageSettings, StyleRequest, TwistRequest,
};
use test_utils::*;

#[tokio::test]
async fn test_profiles_follow_creature_order() {
    let driver = ScriptedDriver::answering([PROFILES_ANSWER]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let request = ProfileRequest::for_story(&friendship_request(), None);
    let profiles = engine
        .develop_characters(&request)
        .await
        .expect("profiles parse");

    assert_eq!(profiles.len(), request.creatures().len());
    assert_eq!(profiles[0].creature(), "皮卡丘");
    assert_eq!(profiles[1].creature(), "伊布");
    assert_eq!(profiles[0].monologue().as_deref(), Some("「有我在，別怕！」"));
    assert!(driver.prompt(0).contains("N/A"), "missing plan renders as N/A");
    assert_eq!(*driver.requests()[0].temperature(), Some(0.6));
}

#[tokio::test]
async fn test_missing_profile_is_parse_error() {
    let driver = ScriptedDriver::answering([PROFILES_ANSWER]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let request = ProfileRequest::builder()
        .creatures(vec![
            "皮卡丘".to_string(),
            "伊布".to_string(),
            "超夢".to_string(),
        ])
        .theme("友情")
        .genre(Genre::Adventure)
        .build()
        .expect("builder fields set");

    let err = engine.develop_characters(&request).await.unwrap_err();
    match err.kind() {
        FabulaErrorKind::Parse(e) => {
            assert_eq!(e.kind, ParseErrorKind::MissingProfile("超夢".to_string()))
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_twists_default_to_whole_plan() {
    let driver = ScriptedDriver::answering([TWO_ITEMS]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let request = TwistRequest::builder()
        .plan(StoryPlan::new(PLAN_REVISED))
        .build()
        .expect("builder fields set");
    let twists = engine
        .suggest_plot_twists(&request)
        .await
        .expect("twists parse");

    assert_eq!(twists.len(), 2);
    assert_eq!(twists.items()[0].title().as_deref(), Some("背叛的盟友"));
    assert!(driver.prompt(0).contains("(Overall Plan or Climax)"));
    assert_eq!(*driver.requests()[0].max_tokens(), Some(768));
}

#[tokio::test]
async fn test_out_of_bounds_list_is_returned_when_lenient() {
    let driver = ScriptedDriver::answering([FIVE_ITEMS]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let request = BranchRequest::builder()
        .segment(STORY_DRAFT)
        .build()
        .expect("builder fields set");
    let branches = engine
        .suggest_branches(&request)
        .await
        .expect("lenient mode keeps the list");
    assert_eq!(branches.len(), 5);
    assert!(branches.check_bounds("branching", fabula_narrative::BRANCH_BOUNDS).is_err());
}

#[tokio::test]
async fn test_out_of_bounds_list_fails_when_strict() {
    let driver = ScriptedDriver::answering([TWO_ITEMS]);
    let config = EngineConfig::default().with_strict_item_counts(true);
    let engine = CotEngine::with_config(driver, config).expect("bundled data loads");

    let request = ElaborationRequest::builder()
        .theme("友情")
        .build()
        .expect("builder fields set");
    let err = engine.elaborate_synopsis(&request).await.unwrap_err();

    match err.kind() {
        FabulaErrorKind::Parse(e) => assert_eq!(
            e.kind,
            ParseErrorKind::ItemCount {
                stage: "elaboration".to_string(),
                min: 3,
                max: 4,
                found: 2,
            }
        ),
        other => panic!("expected item count error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_elaboration_within_bounds() {
    let driver = ScriptedDriver::answering([THREE_ITEMS]);
    let config = EngineConfig::default().with_strict_item_counts(true);
    let engine = CotEngine::with_config(driver.clone(), config).expect("bundled data loads");

    let request = ElaborationRequest::from(&friendship_request());
    let list = engine
        .elaborate_synopsis(&request)
        .await
        .expect("three items are within bounds");
    assert_eq!(list.len(), 3);
    assert!(driver.prompt(0).contains("皮卡丘 (Pikachu)"));
}

#[tokio::test]
async fn test_style_keeps_creature_names() {
    let humorous = "常青森林的午後，皮卡丘的肚子咕嚕咕嚕叫個不停。\
                    「你也迷路了嗎？」伊布一臉無辜地問，尾巴還勾著一顆樹果。";
    let driver = ScriptedDriver::answering([humorous]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let request = StyleRequest::builder()
        .text(STORY_REVISED)
        .style("更幽默詼諧")
        .theme(Some("友情".to_string()))
        .genre(Some(Genre::Comedy))
        .build()
        .expect("builder fields set");
    let restyled = engine.tune_style(&request).await.expect("style succeeds");

    assert_ne!(restyled, STORY_REVISED);
    assert!(restyled.contains("皮卡丘"));
    assert!(restyled.contains("伊布"));

    let expected_budget = estimate_word_count(STORY_REVISED) as u32 * 2 + 512;
    assert_eq!(*driver.requests()[0].max_tokens(), Some(expected_budget));
    assert!(driver.prompt(0).contains("更幽默詼諧"));
}

#[tokio::test]
async fn test_style_budget_is_capped() {
    let driver = ScriptedDriver::answering(["改寫後的故事。"]);
    let config = EngineConfig::from_toml_str("max_style_tokens = 600\n").expect("valid config");
    let engine = CotEngine::with_config(driver.clone(), config).expect("bundled data loads");

    let request = StyleRequest::builder()
        .text(STORY_REVISED.repeat(20))
        .style("正式")
        .build()
        .expect("builder fields set");
    engine.tune_style(&request).await.expect("style succeeds");
    assert_eq!(*driver.requests()[0].max_tokens(), Some(600));
}

#[tokio::test]
async fn test_empty_suggestion_answer_falls_back() {
    let driver = ScriptedDriver::answering([""]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let suggestions = engine
        .suggest_refinements(&DraftRequest::default())
        .await
        .expect("empty answer is not an error");
    assert_eq!(suggestions, NO_SUGGESTIONS);

    let prompt = driver.prompt(0);
    assert!(prompt.contains("None specified"));
    assert!(prompt.contains("the creature"));
    assert!(prompt.contains("Any"));
    assert_eq!(*driver.requests()[0].max_tokens(), Some(200));
    assert_eq!(*driver.requests()[0].temperature(), Some(0.5));
}

#[tokio::test]
async fn test_suggestions_name_the_first_creature() {
    let driver = ScriptedDriver::answering(["可以多描述皮卡丘的個性嗎？"]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let draft = DraftRequest {
        theme: Some("友情".to_string()),
        creatures: vec!["皮卡丘".to_string(), "伊布".to_string()],
        ..DraftRequest::default()
    };
    let suggestions = engine.suggest_refinements(&draft).await.expect("succeeds");
    assert_eq!(suggestions, "可以多描述皮卡丘的個性嗎？");
    assert!(driver.prompt(0).contains("(皮卡丘)"));
}

#[tokio::test]
async fn test_setting_name_is_extracted() {
    let driver = ScriptedDriver::answering([
        "設定名稱: 【常青森林深處】\n高聳的古木遮住了天空，只有零星的陽光灑落。",
    ]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let request = SettingRequest::for_story(&friendship_request(), Some(StoryPlan::new(PLAN_REVISED)));
    let setting = engine.detail_setting(&request).await.expect("setting succeeds");
    assert_eq!(setting.name().as_deref(), Some("常青森林深處"));
    assert!(setting.description().contains("古木"));
}

#[tokio::test]
async fn test_clarifying_question_defaults_to_first_creature() {
    let driver = ScriptedDriver::answering(["皮卡丘為什麼決定獨自進入森林？"]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let request = ClarifyRequest::builder()
        .story(friendship_request())
        .context(STORY_DRAFT)
        .build()
        .expect("builder fields set");
    let question = engine
        .ask_clarifying_question(&request)
        .await
        .expect("question succeeds");

    assert!(question.ends_with('？'));
    assert!(driver.prompt(0).contains("皮卡丘 (Pikachu)"));
    assert_eq!(*driver.requests()[0].max_tokens(), Some(256));
}

#[tokio::test]
async fn test_stage_override_applies() {
    let driver = ScriptedDriver::answering([THREE_ITEMS]);
    let config = EngineConfig::default().with_stage(
        Stage::Branching,
        StageSettings {
            max_tokens: Some(300),
            temperature: Some(1.1),
        },
    );
    let engine = CotEngine::with_config(driver.clone(), config).expect("bundled data loads");

    let request = BranchRequest::builder()
        .segment(STORY_DRAFT)
        .plan(Some(StoryPlan::new(PLAN_REVISED)))
        .build()
        .expect("builder fields set");
    engine.suggest_branches(&request).await.expect("branches parse");

    let sent = &driver.requests()[0];
    assert_eq!(*sent.max_tokens(), Some(300));
    assert_eq!(*sent.temperature(), Some(1.1));
}
