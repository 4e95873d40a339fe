mod common;

use std::time::Duration;

use common::{alice, signed_in, ScriptedService};
use wellkeep::{
    CheckInDraft, DailyCheckIn, Form, JournalDraft, NoticeLevel, Presence, RatingField,
    RatingsDraft, SubmissionOutcome, SubmissionState, UserProfile, WellError, WellnessService,
};

fn draft_with_focus(focus: i64) -> CheckInDraft {
    CheckInDraft {
        ratings: RatingsDraft {
            focus,
            ..RatingsDraft::default()
        },
        notes: "Slept badly".to_string(),
    }
}

#[tokio::test]
async fn out_of_range_ratings_never_reach_the_service() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    for focus in [0, 11] {
        let error = client
            .submit_check_in(&draft_with_focus(focus).ratings, "")
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            WellError::RatingOutOfRange {
                field: RatingField::Focus,
                value,
            } if value == focus
        ));
    }
    assert_eq!(service.calls("addDailyCheckIn"), 0);

    for focus in [1, 10] {
        client
            .submit_check_in(&draft_with_focus(focus).ratings, "")
            .await
            .unwrap();
    }
    assert_eq!(service.calls("addDailyCheckIn"), 2);
}

#[tokio::test]
async fn successful_check_in_clears_the_form_and_is_visible_on_reload() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    assert!(client.check_ins().await.unwrap().is_empty());

    let form = Form::new(draft_with_focus(9));
    let outcome = form.submit(&client).await.unwrap();

    match outcome {
        SubmissionOutcome::Saved(notice) => {
            assert_eq!(notice.level, NoticeLevel::Success);
            assert_eq!(notice.message, "Check-in saved successfully!");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(form.draft().unwrap(), CheckInDraft::default());
    assert_eq!(form.state().unwrap(), SubmissionState::Idle);

    let check_ins = client.check_ins().await.unwrap();
    assert_eq!(check_ins.len(), 1);
    assert_eq!(check_ins[0].ratings.focus.value(), 9);
    assert_eq!(
        check_ins[0].notes,
        Presence::Present("Slept badly".to_string())
    );
}

fn check_in_dated(date: i64, mood: i64) -> DailyCheckIn {
    let ratings = RatingsDraft {
        mood,
        ..RatingsDraft::default()
    }
    .validate()
    .unwrap();
    DailyCheckIn {
        date,
        ..DailyCheckIn::new(ratings, Presence::Absent)
    }
}

#[tokio::test]
async fn check_ins_are_listed_newest_first() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    for (date, mood) in [(2_000, 2), (3_000, 3), (1_000, 1)] {
        service
            .add_daily_check_in(&alice(), check_in_dated(date, mood))
            .await
            .unwrap();
    }

    let check_ins = client.check_ins().await.unwrap();
    let dates: Vec<i64> = check_ins.iter().map(|c| c.date).collect();
    assert_eq!(dates, vec![3_000, 2_000, 1_000]);
    assert_eq!(check_ins[0].ratings.mood.value(), 3);
}

#[tokio::test]
async fn single_check_in_is_found_by_id() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    service
        .add_daily_check_in(&alice(), check_in_dated(1_000, 4))
        .await
        .unwrap();
    service
        .add_daily_check_in(&alice(), check_in_dated(2_000, 8))
        .await
        .unwrap();

    let older_id = client
        .check_ins()
        .await
        .unwrap()
        .iter()
        .find(|c| c.date == 1_000)
        .map(|c| c.id)
        .unwrap();

    let found = client.check_in(older_id).await.unwrap();
    assert_eq!(found.ratings.mood.value(), 4);

    assert!(matches!(
        client.check_in(9_999).await,
        Err(WellError::NotFound {
            kind: "Check-in",
            id: 9_999
        })
    ));
}

#[tokio::test]
async fn failed_check_in_keeps_the_input() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    service.fail_writes(true);

    let form = Form::new(draft_with_focus(4));
    match form.submit(&client).await.unwrap() {
        SubmissionOutcome::Failed { notice, error } => {
            assert!(matches!(error, WellError::Remote { .. }));
            assert_eq!(notice.message, "Failed to save check-in");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(form.draft().unwrap(), draft_with_focus(4));
    assert_eq!(form.state().unwrap(), SubmissionState::Idle);
}

#[tokio::test]
async fn result_after_unmount_is_discarded() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    service.hold_check_ins();

    let form = Form::new(draft_with_focus(6));
    let task = {
        let form = form.clone();
        let client = client.clone();
        tokio::spawn(async move { form.submit(&client).await })
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        while form.state().unwrap() != SubmissionState::Submitting {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    assert!(matches!(
        form.submit(&client).await,
        Err(WellError::SubmissionInProgress)
    ));

    form.unmount();
    service.release();

    let outcome = task.await.unwrap().unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Discarded));
    // The unmounted form is left exactly as it was.
    assert_eq!(form.draft().unwrap(), draft_with_focus(6));
    assert_eq!(form.state().unwrap(), SubmissionState::Submitting);
}

#[tokio::test]
async fn journal_entries_round_trip_with_and_without_prompt() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    let prompt = client.prompts().await.unwrap()[0].clone();

    let form = Form::new(JournalDraft {
        prompt: Presence::Present(prompt.clone()),
        entry: "  Walked in the park.  ".to_string(),
    });
    assert!(matches!(
        form.submit(&client).await.unwrap(),
        SubmissionOutcome::Saved(_)
    ));

    client
        .submit_journal_entry("Quiet day", Presence::Absent)
        .await
        .unwrap();

    let entries = client.journal_entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    let prompted = entries
        .iter()
        .find(|entry| entry.prompt.is_present())
        .unwrap();
    assert_eq!(prompted.entry, "Walked in the park.");
    assert_eq!(prompted.prompt, Presence::Present(prompt));
    assert!(entries.windows(2).all(|pair| pair[0].date >= pair[1].date));
}

#[tokio::test]
async fn blank_journal_entry_is_rejected_locally() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    let form = Form::new(JournalDraft {
        prompt: Presence::Absent,
        entry: "   ".to_string(),
    });
    match form.submit(&client).await.unwrap() {
        SubmissionOutcome::Failed { error, .. } => {
            assert!(matches!(error, WellError::EmptyJournalEntry))
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(service.calls("addJournalEntry"), 0);
}

#[tokio::test]
async fn profile_distinguishes_absent_from_not_loaded() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    assert_eq!(client.cached_profile().unwrap(), None);
    assert_eq!(client.caller_profile().await.unwrap(), Presence::Absent);
    assert_eq!(client.cached_profile().unwrap(), Some(Presence::Absent));

    assert!(matches!(
        client.save_profile("   ").await,
        Err(WellError::EmptyProfileName)
    ));
    assert_eq!(service.calls("saveCallerUserProfile"), 0);

    client.save_profile("Dana").await.unwrap();
    assert_eq!(
        client.caller_profile().await.unwrap(),
        Presence::Present(UserProfile {
            name: "Dana".to_string()
        })
    );
}

#[tokio::test]
async fn category_filter_is_applied_by_the_service() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    let all = client.coping_mechanisms(None).await.unwrap();

    let sleep = client
        .coping_mechanisms(Some("sleep".parse().unwrap()))
        .await
        .unwrap();
    assert!(!sleep.is_empty());
    assert!(sleep.len() < all.len());
    assert!(sleep
        .iter()
        .all(|m| m.category == wellkeep::CopingCategory::Sleep));
    assert_eq!(service.calls("getCopingMechanismsByCategory"), 1);
}
