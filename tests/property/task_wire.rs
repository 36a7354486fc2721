//! Property-based tests for task API payloads.
//!
//! Uses proptest to verify:
//! 1. Any task list survives encode → decode through the list envelope.
//! 2. Arbitrary input never panics the list decoder.
//! 3. Draft name validation depends only on the trimmed character count.

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use projectflow_proto::codec;
use projectflow_proto::task::{
    DraftError, MAX_TASK_NAME_LENGTH, MIN_TASK_NAME_LENGTH, Priority, Task, TaskDraft, TaskId,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High)
    ]
}

fn arb_due_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0i64..3650).prop_map(|days| {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(days)
    }))
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-f0-9]{8,24}",
        "[^\x00]{1,100}",
        "[^\x00]{0,60}",
        arb_priority(),
        arb_due_date(),
        any::<bool>(),
        0i64..4_000_000_000,
    )
        .prop_map(|(id, name, description, priority, due_date, done, secs)| Task {
            id: TaskId::new(id),
            name,
            description,
            priority,
            due_date,
            done,
            created_at: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
        })
}

proptest! {
    /// Any task list survives the list envelope.
    #[test]
    fn task_list_survives_envelope(tasks in prop::collection::vec(arb_task(), 0..8)) {
        let json = codec::encode_task_list(&tasks).expect("encode should succeed");
        let decoded = codec::decode_task_list(&json).expect("decode should succeed");
        prop_assert_eq!(tasks, decoded);
    }

    /// Arbitrary text never panics the decoder.
    #[test]
    fn arbitrary_text_decode_no_panic(input in ".{0,256}") {
        let _ = codec::decode_task_list(&input);
    }

    /// Names are accepted exactly when their trimmed length is within bounds.
    #[test]
    fn name_validation_tracks_trimmed_length(
        core in "[a-zA-Z0-9]{0,120}",
        pad in " {0,4}",
        priority in arb_priority(),
    ) {
        let draft = TaskDraft::new(format!("{pad}{core}{pad}")).with_priority(priority);
        let len = core.chars().count();
        let result = draft.validate(today());
        if len == 0 {
            prop_assert_eq!(result, Err(vec![DraftError::NameRequired]));
        } else if len < MIN_TASK_NAME_LENGTH {
            prop_assert_eq!(result, Err(vec![DraftError::NameTooShort]));
        } else if len > MAX_TASK_NAME_LENGTH {
            prop_assert_eq!(result, Err(vec![DraftError::NameTooLong]));
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
