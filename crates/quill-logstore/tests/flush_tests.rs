// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use chrono::NaiveDate;
use quill_core::{PartitionKey, Record};
use quill_logstore::LogStore;

fn rec(id: i64) -> Record {
    Record {
        message_id: id,
        date: "2026-03-01T12:00:00.000Z".into(),
        text: Some(format!("message {id}")),
        sender_id: Some("1".into()),
        sender_username: None,
        sender_first_name: Some("Ann".into()),
        sender_last_name: None,
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

#[tokio::test]
async fn repeated_flushes_are_lossless_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());
    let key = PartitionKey::new("group", day());

    for batch in 0..4 {
        for i in 0..5 {
            store.append(key.clone(), rec(batch * 5 + i));
        }
        store.flush().await;
    }
    store.append(key.clone(), rec(20));

    let ids: Vec<i64> = store
        .read_all(&key)
        .await
        .unwrap()
        .iter()
        .map(|r| r.message_id)
        .collect();
    assert_eq!(ids, (0..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn durable_file_uses_log_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());
    let key = PartitionKey::new("group", day());
    store.append(key.clone(), rec(1));
    store.flush().await;

    let text = std::fs::read_to_string(dir.path().join("group-2026-03-01.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["messageId"], 1);
    assert_eq!(value[0]["senderFirstName"], "Ann");
    assert!(value[0].get("senderUsername").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_during_flush_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LogStore::new(dir.path()));
    let key = PartitionKey::new("busy", day());

    let writer = {
        let store = store.clone();
        let key = key.clone();
        tokio::spawn(async move {
            for i in 0..200 {
                store.append(key.clone(), rec(i));
                if i % 20 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };
    for _ in 0..10 {
        store.flush().await;
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();
    store.flush().await;

    let records = store.read_all(&key).await.unwrap();
    assert_eq!(records.len(), 200);
    assert_eq!(store.pending_count(), 0);
    let ids: Vec<i64> = records.iter().map(|r| r.message_id).collect();
    assert_eq!(ids, (0..200).collect::<Vec<_>>());
}

#[tokio::test]
async fn existing_durable_records_come_first() {
    let dir = tempfile::tempdir().unwrap();
    let key = PartitionKey::new("group", day());
    std::fs::write(
        dir.path().join(key.file_name()),
        serde_json::to_string(&vec![rec(100)]).unwrap(),
    )
    .unwrap();

    let store = LogStore::new(dir.path());
    store.append(key.clone(), rec(101));
    let ids: Vec<i64> = store
        .read_all(&key)
        .await
        .unwrap()
        .iter()
        .map(|r| r.message_id)
        .collect();
    assert_eq!(ids, vec![100, 101]);
}
