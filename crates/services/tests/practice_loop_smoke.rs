use std::sync::Arc;

use interview_core::time::fixed_clock;
use interview_core::{Difficulty, RoundType, SessionPhase, SessionSetup, TimingMode, QUESTION_COUNT};
use services::{AnswerEvent, PracticeLoopService, TemplateProvider};

fn coding_setup() -> SessionSetup {
    SessionSetup::new(
        "Software Engineer",
        Some("Acme".to_string()),
        RoundType::Coding,
        Difficulty::Professional,
    )
    .unwrap()
}

#[tokio::test]
async fn local_strategy_runs_a_full_interview() {
    let service = PracticeLoopService::new(fixed_clock(), Arc::new(TemplateProvider::new()));
    let mut session = service.start(coding_setup(), TimingMode::PerQuestion);

    service.populate(&mut session).await.unwrap();

    // Five non-empty questions, each ending in `?`, no duplicates while the
    // six-entry bank has spares.
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.questions().len(), QUESTION_COUNT);
    for question in session.questions() {
        assert!(!question.is_empty());
        assert!(question.ends_with('?'));
    }
    let mut deduped = session.questions().to_vec();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), QUESTION_COUNT);

    // Answer a couple of questions, navigating as a user would.
    service
        .apply_answer(
            &mut session,
            AnswerEvent {
                index: 0,
                text: "I would scan with a frequency map first.".to_string(),
            },
        )
        .unwrap();
    let now = fixed_clock().now();
    session.go_next(now);
    service
        .apply_answer(
            &mut session,
            AnswerEvent {
                index: 1,
                text: "Two pointers, fast and slow.".to_string(),
            },
        )
        .unwrap();

    let report = service.finish(&mut session).unwrap();
    assert_eq!(report.entries.len(), QUESTION_COUNT);
    assert_eq!(
        report
            .entries
            .iter()
            .filter(|entry| entry.answer.is_some())
            .count(),
        2
    );

    let export = report.to_export_text();
    assert!(export.starts_with("Question 1: "));
    assert_eq!(export.matches("\n\n").count(), QUESTION_COUNT - 1);
}

#[tokio::test]
async fn regeneration_mid_interview_keeps_the_session_consistent() {
    let service = PracticeLoopService::new(fixed_clock(), Arc::new(TemplateProvider::new()));
    let mut session = service.start(coding_setup(), TimingMode::PerQuestion);
    service.populate(&mut session).await.unwrap();

    let before = session.questions().to_vec();
    let replacement = service.regenerate(&mut session).await.unwrap();

    assert_eq!(session.questions().len(), QUESTION_COUNT);
    assert_eq!(session.questions()[0], replacement);
    assert_eq!(&session.questions()[1..], &before[1..]);
    assert!(replacement.ends_with('?'));
}
