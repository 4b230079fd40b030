use fabula_core::{DraftRequest, FullStory, Genre, StoryPlan, StoryRequest};
use fabula_error::ValidationErrorKind;

fn request(theme: &str, genre: Genre, creatures: &[&str]) -> StoryRequest {
    StoryRequest::builder()
        .theme(theme)
        .genre(genre)
        .creatures(creatures.iter().map(|c| c.to_string()).collect::<Vec<_>>())
        .build()
        .expect("all required builder fields set")
}

#[test]
fn valid_request_passes() {
    let req = request("友情", Genre::Adventure, &["皮卡丘", "伊布"]);
    assert!(req.validate().is_ok());
    assert!(!req.include_traits());
    assert_eq!(req.creature_names(), vec!["皮卡丘", "伊布"]);
}

#[test]
fn blank_theme_is_rejected() {
    let err = request("   ", Genre::Adventure, &["皮卡丘"])
        .validate()
        .unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::EmptyTheme);
}

#[test]
fn blank_genre_is_rejected() {
    let err = request("友情", Genre::parse_label(""), &["皮卡丘"])
        .validate()
        .unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::EmptyGenre);
}

#[test]
fn empty_creature_list_is_rejected() {
    let err = request("友情", Genre::Comedy, &[]).validate().unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::NoCreatures);
}

#[test]
fn blank_creature_reports_its_position() {
    let err = request("友情", Genre::Comedy, &["皮卡丘", " "])
        .validate()
        .unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::BlankCreature(2));
}

#[test]
fn builder_requires_theme() {
    let result = StoryRequest::builder()
        .genre(Genre::Mystery)
        .creatures(vec!["路卡利歐".to_string()])
        .build();
    assert!(result.is_err());
}

#[test]
fn synopsis_fallback_ignores_whitespace() {
    let req = StoryRequest::builder()
        .theme("勇氣")
        .genre(Genre::Fantasy)
        .creatures(vec!["皮丘".to_string()])
        .synopsis("  ".to_string())
        .build()
        .expect("valid builder");
    assert_eq!(req.synopsis_or("Not specified"), "Not specified");
}

#[test]
fn request_round_trips_through_json_with_genre_label() {
    let req = request("友情", Genre::Adventure, &["皮卡丘"]);
    let json = serde_json::to_value(&req).expect("serializable");
    assert_eq!(json["genre"], "冒險");

    let back: StoryRequest = serde_json::from_value(json).expect("deserializable");
    assert_eq!(back, req);
}

#[test]
fn draft_request_copies_story_request() {
    let req = request("友情", Genre::Drama, &["伊布"]);
    let draft = DraftRequest::from(&req);
    assert_eq!(draft.theme.as_deref(), Some("友情"));
    assert_eq!(draft.genre, Some(Genre::Drama));
    assert_eq!(draft.creatures, vec!["伊布".to_string()]);
}

#[test]
fn plan_sections_follow_numbered_headings() {
    let plan = StoryPlan::new(
        "故事大綱：\n1. 開端：暴風雨中走散\n   兩隻寶可夢躲進樹洞\n2. 衝突：大針蜂來襲\n3. 高潮：渡河\n4. 結局：回到訓練家身邊",
    );
    let sections = plan.sections();
    assert_eq!(sections.len(), 4);
    assert!(sections[0].contains("樹洞"));
    assert!(sections[3].starts_with("4."));
}

#[test]
fn plan_without_markers_is_one_section() {
    let plan = StoryPlan::new("皮卡丘與伊布的冒險。");
    assert_eq!(plan.sections(), vec!["皮卡丘與伊布的冒險。".to_string()]);
}

#[test]
fn story_word_count_mixes_scripts() {
    let story = FullStory::new("Pikachu 與 Eevee 出發");
    assert_eq!(story.word_count(), 5);
}
