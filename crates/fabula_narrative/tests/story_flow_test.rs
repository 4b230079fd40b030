//! Plan and story flows against a scripted driver.

mod test_utils;

use fabula_core::{ArtifactState, Genre, StoryPlan, StoryRequest};
use fabula_error::{FabulaErrorKind, ParseErrorKind, ValidationErrorKind};
use fabula_narrative::{APPROVAL_FEEDBACK, CotEngine, Stage};
use test_utils::*;

#[tokio::test]
async fn test_plan_review_runs_after_draft() {
    let driver = ScriptedDriver::answering([PLAN_DRAFT.to_string(), plan_review_answer()]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let reviewed = engine
        .generate_plan(&friendship_request())
        .await
        .expect("plan flow succeeds");

    assert_eq!(driver.call_count(), 2);
    assert!(driver.prompt(1).contains(PLAN_DRAFT), "review must see the draft");
    assert_eq!(reviewed.state(), ArtifactState::Reviewed);
    assert_eq!(reviewed.original().text(), PLAN_DRAFT);
    assert_eq!(reviewed.final_artifact().text(), PLAN_REVISED);
    assert_eq!(reviewed.feedback(), "結構完整，但伊布的動機可以更鮮明。");
    assert!(reviewed.was_revised());
}

#[tokio::test]
async fn test_stage_sampling_reaches_the_driver() {
    let driver = ScriptedDriver::answering([PLAN_DRAFT.to_string(), plan_review_answer()]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");
    engine
        .generate_plan(&friendship_request())
        .await
        .expect("plan flow succeeds");

    let requests = driver.requests();
    assert_eq!(*requests[0].max_tokens(), Some(1536));
    assert_eq!(*requests[0].temperature(), Some(0.7));
    assert_eq!(*requests[1].max_tokens(), Some(2048));
    assert_eq!(*requests[0].model(), None);
}

#[tokio::test]
async fn test_friendship_scenario_produces_story_from_plan() {
    let driver = ScriptedDriver::answering([
        PLAN_DRAFT.to_string(),
        plan_review_answer(),
        STORY_DRAFT.to_string(),
        story_review_answer(),
    ]);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let complete = engine
        .generate_complete_story(&friendship_request())
        .await
        .expect("complete flow succeeds");

    let plan = complete.plan().final_artifact();
    assert!(plan.mentions("皮卡丘"));
    assert!(plan.mentions("伊布"));

    assert_eq!(driver.call_count(), 4);
    let story_prompt = driver.prompt(2);
    assert!(story_prompt.contains(PLAN_REVISED), "story is written from the reviewed plan");
    assert!(story_prompt.contains("皮卡丘 (Pikachu), 伊布 (Eevee)"));
    assert!(story_prompt.contains("Not specified"), "blank synopsis renders as unspecified");
    assert!(driver.prompt(3).contains(STORY_DRAFT));

    let story = complete.story();
    assert_eq!(story.final_artifact().text(), STORY_REVISED);
    assert_eq!(story.original().text(), STORY_DRAFT);
    assert!(!story.feedback().is_empty());
}

#[tokio::test]
async fn test_approved_plan_echoes_the_draft() {
    let driver = ScriptedDriver::answering([
        PLAN_DRAFT,
        "評估回饋:\n修訂後故事大綱: 原故事大綱已達標，無需修訂。",
    ]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let reviewed = engine
        .generate_plan(&friendship_request())
        .await
        .expect("plan flow succeeds");

    assert_eq!(reviewed.final_artifact().text(), PLAN_DRAFT);
    assert_eq!(reviewed.feedback(), APPROVAL_FEEDBACK);
    assert!(!reviewed.was_revised());
}

#[tokio::test]
async fn test_review_without_markers_is_parse_error() {
    let driver = ScriptedDriver::answering([PLAN_DRAFT, "這份大綱看起來很棒！"]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let err = engine
        .generate_plan(&friendship_request())
        .await
        .unwrap_err();

    match err.kind() {
        FabulaErrorKind::Parse(e) => assert!(matches!(
            &e.kind,
            ParseErrorKind::MalformedReview { artifact, .. } if artifact == "plan"
        )),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_story_review_uses_story_markers() {
    let driver = ScriptedDriver::answering([STORY_DRAFT, "評估回饋: 好。\n修訂後故事大綱:\n1. 開端"]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let err = engine
        .generate_story(&friendship_request(), &StoryPlan::new(PLAN_REVISED))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Parse(_)));
}

#[tokio::test]
async fn test_invalid_request_makes_no_call() {
    let driver = ScriptedDriver::new_success(PLAN_DRAFT);
    let engine = CotEngine::new(driver.clone()).expect("bundled data loads");

    let request = StoryRequest::builder()
        .theme("友情")
        .genre(Genre::Adventure)
        .creatures(vec!["皮卡丘".to_string(), "  ".to_string()])
        .build()
        .expect("builder fields set");

    let err = engine.draft_plan(&request).await.unwrap_err();
    match err.kind() {
        FabulaErrorKind::Validation(e) => {
            assert_eq!(e.kind, ValidationErrorKind::BlankCreature(2))
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let err = engine
        .draft_story(&friendship_request(), &StoryPlan::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Validation(_)));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_empty_plan_answer_is_malformed() {
    let driver = ScriptedDriver::answering(["   "]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let err = engine.draft_plan(&friendship_request()).await.unwrap_err();
    assert_eq!(
        err.llm_kind().map(|k| k.label()),
        Some("malformed_response")
    );
}

#[tokio::test]
async fn test_drafted_plan_preview_is_the_raw_answer() {
    let driver = ScriptedDriver::answering([format!("\n{}\n\n", PLAN_DRAFT)]);
    let engine = CotEngine::new(driver).expect("bundled data loads");

    let draft = engine
        .draft_plan(&friendship_request())
        .await
        .expect("draft succeeds");
    assert_eq!(draft.state(), ArtifactState::Drafted);
    assert_eq!(draft.preview().text(), PLAN_DRAFT);
    assert_eq!(draft.preview().sections().len(), 4);
    assert_eq!(Stage::Plan.default_sampling().max_tokens, 1536);
}

#[tokio::test]
async fn test_reviewed_plan_serializes_all_three_parts() {
    let driver = ScriptedDriver::answering([PLAN_DRAFT.to_string(), plan_review_answer()]);
    let engine = CotEngine::new(driver).expect("bundled data loads");
    let reviewed = engine
        .generate_plan(&friendship_request())
        .await
        .expect("plan flow succeeds");

    let json = serde_json::to_value(&reviewed).expect("serializable");
    assert_eq!(json["original"], PLAN_DRAFT);
    assert_eq!(json["revised"], PLAN_REVISED);
    assert!(json["feedback"].as_str().is_some_and(|f| !f.is_empty()));
}
