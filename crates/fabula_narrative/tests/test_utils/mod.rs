//! Shared test utilities: a scripted driver and canned stage answers.

#![allow(dead_code)]

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse, Genre, StoryRequest};
use fabula_error::{FabulaError, FabulaResult, LlmError, LlmErrorKind};
use fabula_interface::FabulaDriver;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A single scripted answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Answer with this text
    Success(String),
    /// Fail with this error
    Error(LlmErrorKind),
}

/// Driver that replays scripted answers and records every request.
///
/// Answers are consumed in order; once the script is exhausted the
/// `fallback` answer (if any) repeats forever.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: Option<MockResponse>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedDriver {
    /// Replay `responses` once each, in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into())),
            fallback: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Some(MockResponse::Success(text.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request with `kind`.
    pub fn new_error(kind: LlmErrorKind) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Some(MockResponse::Error(kind)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request as rate limited.
    pub fn rate_limited() -> Self {
        Self::new_error(LlmErrorKind::RateLimit {
            message: "Rate limit reached for requests".to_string(),
            retry_after_secs: Some(20),
        })
    }

    /// Replay the given texts once each, in order.
    pub fn answering<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new_sequence(
            texts
                .into_iter()
                .map(|t| MockResponse::Success(t.into()))
                .collect(),
        )
    }

    /// Number of generate() calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The rendered prompt of the `index`th request.
    pub fn prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].messages()[0]
            .content()
            .clone()
    }
}

#[async_trait]
impl FabulaDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone());

        match next {
            Some(MockResponse::Success(text)) => Ok(GenerateResponse::new(text)),
            Some(MockResponse::Error(kind)) => Err(FabulaError::from(LlmError::new(kind))),
            None => Err(FabulaError::from(LlmError::new(LlmErrorKind::Transport(
                "script exhausted".to_string(),
            )))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// 友情 / 冒險 / [皮卡丘, 伊布] with no synopsis.
pub fn friendship_request() -> StoryRequest {
    StoryRequest::builder()
        .theme("友情")
        .genre(Genre::Adventure)
        .creatures(vec!["皮卡丘".to_string(), "伊布".to_string()])
        .synopsis(Some(String::new()))
        .build()
        .expect("valid story request")
}

pub const PLAN_DRAFT: &str = "\
*   **開端：** 皮卡丘在森林裡迷路。
*   **發展：** 皮卡丘遇見害羞的伊布。
*   **高潮：** 暴風雨中兩者互相扶持。
*   **結局：** 皮卡丘和伊布成為好友。";

pub const PLAN_REVISED: &str = "\
*   **開端：** 皮卡丘在常青森林裡迷路，焦急地尋找訓練家。
*   **發展：** 伊布帶路，卻隱瞞自己也迷路了。
*   **高潮：** 暴風雨來臨，皮卡丘用十萬伏特擊退野生寶可夢，伊布鼓起勇氣坦白。
*   **結局：** 兩者一起找到出口，成為摯友。";

pub fn plan_review_answer() -> String {
    format!(
        "1.  **評估回饋:** 結構完整，但伊布的動機可以更鮮明。\n2.  **修訂後故事大綱:**\n{}",
        PLAN_REVISED
    )
}

pub const STORY_DRAFT: &str = "皮卡丘在常青森林裡迷路了。伊布從樹叢後探出頭來。";

pub const STORY_REVISED: &str = "\
常青森林的午後，皮卡丘焦急地四處張望。

「你也迷路了嗎？」伊布小聲地問。

暴風雨過後，皮卡丘和伊布並肩走出森林，成為了最好的朋友。";

pub fn story_review_answer() -> String {
    format!(
        "評估回饋: 情節緊湊，對話可以更生動。\n修訂後完整故事:\n{}",
        STORY_REVISED
    )
}

pub const PROFILES_ANSWER: &str = "\
-   **名稱:** 伊布 (Eevee)
-   **性格特點:** 害羞但細心。
-   **核心動機:** 想證明自己能獨當一面。
-   **潛在內心衝突:** 害怕被看穿自己也迷路了。
-   **與其他角色可能的關係:** 皮卡丘的新朋友。

-   **名稱:** 皮卡丘 (Pikachu)
-   **性格特點:** 勇敢、衝動。
-   **核心動機:** 回到訓練家身邊。
-   **潛在內心衝突:** 想獨自解決一切，卻需要伊布幫忙。
-   **與其他角色可能的關係:** 伊布的守護者。
-   **一句代表性的內心獨白 (可選):** 「有我在，別怕！」";

pub const TWO_ITEMS: &str = "\
1. **背叛的盟友：** 伊布其實是被派來引開皮卡丘的。
2. **意外的援手：** 野生的超夢在暴風雨中現身。";

pub const THREE_ITEMS: &str = "\
1. **森林的秘密：** 森林深處藏著古老的遺跡。
2. **失散的家人：** 伊布一直在尋找失散的兄弟。
3. **訓練家的考驗：** 迷路其實是訓練家安排的試煉。";

pub const FIVE_ITEMS: &str = "\
1. 一
2. 二
3. 三
4. 四
5. 五";
