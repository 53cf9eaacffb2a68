//! Pipeline tests against a scripted generator.
//!
//! Time is paused so part delays and retry backoff complete instantly.

mod test_utils;

use castscript_error::GeminiErrorKind;
use castscript_narrative::{PipelineStage, ScriptProfile, SectionSplit, SectionSplitter};
use std::sync::{Arc, Mutex};
use test_utils::{MockGenerator, MockResponse, pipeline_for, pipeline_with_profile};

const TRANSCRIPT: &str = "Transcript of a documentary about a 1972 film.";

/// Replies for an actor_brief run that counts three parts.
fn actor_brief_replies() -> Vec<&'static str> {
    vec![
        "Draft outline",
        "I have learned the brief",
        "1. Introduction\n2. Actor One\n3. Conclusion",
        "3",
        "Part one",
        "Part two",
        "Part three",
    ]
}

#[tokio::test(start_paused = true)]
async fn test_actor_brief_produces_three_sections() {
    let mock = Arc::new(MockGenerator::new_replies(&actor_brief_replies()));
    let (pipeline, history) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(result.success(), "unexpected failure: {:?}", result.error());
    assert_eq!(
        result.outline(),
        Some("1. Introduction\n2. Actor One\n3. Conclusion")
    );
    assert_eq!(result.first_sections(), Some("Part one"));
    assert_eq!(result.last_sections(), Some("Part two\n\nPart three"));
    assert!(result.error().is_none());
    assert_eq!(mock.call_count(), 7);

    // The run's conversation is dropped once it finishes
    assert!(history.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stages_are_reported_in_order() {
    let mock = Arc::new(MockGenerator::new_replies(&actor_brief_replies()));
    let (pipeline, _) = pipeline_for(mock, "actor_brief");

    let stages = Mutex::new(Vec::new());
    let observer = |stage: &PipelineStage| stages.lock().unwrap().push(stage.clone());
    pipeline.process_with(TRANSCRIPT, &observer).await;

    assert_eq!(
        stages.into_inner().unwrap(),
        vec![
            PipelineStage::OutlineDraft,
            PipelineStage::BriefApplied,
            PipelineStage::CharacterOutline,
            PipelineStage::PartCount,
            PipelineStage::Part { number: 1, total: 3 },
            PipelineStage::Part { number: 2, total: 3 },
            PipelineStage::Part { number: 3, total: 3 },
            PipelineStage::Split,
            PipelineStage::Done,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_prompts_replay_history() {
    let mock = Arc::new(MockGenerator::new_replies(&actor_brief_replies()));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    pipeline.process(TRANSCRIPT).await;
    let prompts = mock.prompts();

    // First prompt has no history
    assert!(prompts[0].starts_with(TRANSCRIPT));
    assert!(prompts[0].ends_with("Read carefully and give me the outline of the script."));

    // Second prompt replays the first exchange
    assert!(prompts[1].starts_with(&format!("Lịch sử trò chuyện:\nUser: {}", TRANSCRIPT)));
    assert!(prompts[1].contains("\n\nAI: Draft outline\n\nPrompt hiện tại: "));

    // Character outline embeds both earlier replies
    assert!(prompts[2].contains("I have learned the brief\n\nAnd this outline:\n\nDraft outline"));

    // First part names the total
    assert!(prompts[4].contains("There are 3 parts to write."));
}

#[tokio::test(start_paused = true)]
async fn test_later_parts_skip_history() {
    let mock = Arc::new(MockGenerator::new_replies(&actor_brief_replies()));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    pipeline.process(TRANSCRIPT).await;
    let prompts = mock.prompts();

    let part_three = &prompts[6];
    assert!(part_three.contains("Prompt hiện tại: I need you to write part 3 of 3"));
    // Part one was persisted, part two was not
    assert!(part_three.contains("AI: Part one"));
    assert!(!part_three.contains("Part two"));
}

#[tokio::test(start_paused = true)]
async fn test_non_numeric_part_count_fails_explicitly() {
    let mut replies = actor_brief_replies();
    replies[3] = "several";
    let mock = Arc::new(MockGenerator::new_replies(&replies));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(!result.success());
    assert!(result.outline().is_none());
    assert!(result.first_sections().is_none());
    assert!(result.error().unwrap().contains("'several' is not a usable number"));
    // No parts were requested
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_zero_part_count_fails() {
    let mut replies = actor_brief_replies();
    replies[3] = "0";
    let mock = Arc::new(MockGenerator::new_replies(&replies));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;
    assert!(!result.success());
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_part_count_with_trailing_text_is_accepted() {
    let mut replies = actor_brief_replies();
    replies[3] = " 3 parts.\n";
    let mock = Arc::new(MockGenerator::new_replies(&replies));
    let (pipeline, _) = pipeline_for(mock, "actor_brief");

    assert!(pipeline.process(TRANSCRIPT).await.success());
}

#[tokio::test(start_paused = true)]
async fn test_permanent_upstream_error_aborts_run() {
    let mock = Arc::new(MockGenerator::new_error(GeminiErrorKind::HttpError {
        status_code: 400,
        message: "bad request".to_string(),
    }));
    let (pipeline, history) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(!result.success());
    assert!(result.error().unwrap().contains("HTTP 400"));
    assert_eq!(mock.call_count(), 1);
    assert!(history.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_error_is_retried() {
    let mut responses = vec![MockResponse::Error(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "overloaded".to_string(),
    })];
    responses.extend(
        actor_brief_replies()
            .into_iter()
            .map(|r| MockResponse::Success(r.to_string())),
    );
    let mock = Arc::new(MockGenerator::new_sequence(responses));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(result.success());
    assert_eq!(mock.call_count(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let mock = Arc::new(MockGenerator::new_error(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "overloaded".to_string(),
    }));
    let (pipeline, _) = pipeline_for(mock.clone(), "actor_brief");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(!result.success());
    // One attempt plus two retries
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_national_subject_writes_eight_parts() {
    let mut replies = vec!["Đề cương tám phần"];
    let parts = [
        "Phần 1", "Phần 2", "Phần 3", "Phần 4", "Phần 5", "Phần 6", "Phần 7", "Phần 8",
    ];
    replies.extend(parts);
    let mock = Arc::new(MockGenerator::new_replies(&replies));
    let (pipeline, _) = pipeline_for(mock.clone(), "national_subject");

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(result.success());
    assert_eq!(mock.call_count(), 9);
    assert_eq!(result.outline(), Some("Đề cương tám phần"));
    assert_eq!(
        result.first_sections(),
        Some("Phần 1\n\nPhần 2\n\nPhần 3\n\nPhần 4")
    );
    assert_eq!(
        result.last_sections(),
        Some("Phần 5\n\nPhần 6\n\nPhần 7\n\nPhần 8")
    );

    // The last part sees every earlier part in its own prompt text
    let last_prompt = &mock.prompts()[8];
    let current = last_prompt.split("Prompt hiện tại: ").last().unwrap();
    assert!(current.contains("Phần 1\n\nPhần 2\n\nPhần 3\n\nPhần 4\n\nPhần 5\n\nPhần 6\n\nPhần 7"));
    assert!(current.contains("Hãy viết chi tiết phần 8 của kịch bản."));
}

const ONE_PART_PROFILE: &str = r#"
name = "one_part"
conversation_tag = "one"
outline_key = "outline"

[[steps]]
stage = "outline_draft"
key = "outline"
template = "{{transcript}}"

[parts]
template = "Write part {{part_number}} of {{total_parts}}"

[parts.count]
mode = "fixed"
count = 1
"#;

#[tokio::test(start_paused = true)]
async fn test_single_chunk_is_insufficient_content() {
    let mock = Arc::new(MockGenerator::new_replies(&["outline", "one block of text"]));
    let profile = ScriptProfile::from_toml_str(ONE_PART_PROFILE).unwrap();
    let (pipeline, _) = pipeline_with_profile(mock, profile);

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(!result.success());
    assert!(result.error().unwrap().contains("1 chunk(s)"));
}

struct EverythingFirst;

impl SectionSplitter for EverythingFirst {
    fn split(&self, text: &str) -> SectionSplit {
        SectionSplit {
            first: text.to_string(),
            last: "(end)".to_string(),
            chunks: 1,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_splitter_can_be_replaced() {
    let mock = Arc::new(MockGenerator::new_replies(&["outline", "one block of text"]));
    let profile = ScriptProfile::from_toml_str(ONE_PART_PROFILE).unwrap();
    let (pipeline, _) = pipeline_with_profile(mock, profile);
    let pipeline = pipeline.with_splitter(Arc::new(EverythingFirst));

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(result.success());
    assert_eq!(result.first_sections(), Some("one block of text"));
    assert_eq!(result.last_sections(), Some("(end)"));
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_reported_to_observer() {
    let mock = Arc::new(MockGenerator::new_replies(&["only one reply"]));
    let (pipeline, _) = pipeline_for(mock, "actor_brief");

    let stages = Mutex::new(Vec::new());
    let observer = |stage: &PipelineStage| stages.lock().unwrap().push(stage.clone());
    pipeline.process_with(TRANSCRIPT, &observer).await;

    let stages = stages.into_inner().unwrap();
    assert!(matches!(stages.last(), Some(PipelineStage::Failed(_))));
    assert!(!stages.contains(&PipelineStage::Done));
}
