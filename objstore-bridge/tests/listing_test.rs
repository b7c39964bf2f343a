/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use chrono::Utc;
use objstore_bridge::operation::list_directory::{render_listing, EntryKind};
use objstore_bridge::store::InMemoryStore;
use objstore_bridge::{Client, Config};

// 2024-03-05 14:07:00 UTC
fn march_5() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_709_647_620)
}

async fn client_with(objects: &[(&str, usize)]) -> (Client, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    for (key, size) in objects {
        store
            .insert_object(*key, Bytes::from(vec![b'x'; *size]), march_5())
            .await;
    }
    let client = Client::new(Config::builder().store(store.clone()).build().unwrap());
    (client, store)
}

#[tokio::test]
async fn test_nested_keys_render_as_directory() {
    let (client, _) = client_with(&[("a/b.txt", 10), ("a/c.txt", 20), ("d.txt", 5)]).await;

    let output = client.list_directory().path("/").send().await.unwrap();
    let rows = output.rows(&Utc);
    assert_eq!(2, rows.len());
    assert_eq!(("a", EntryKind::Directory, 4096), (rows[0].name(), rows[0].kind(), rows[0].size()));
    assert_eq!(("d.txt", EntryKind::File, 5), (rows[1].name(), rows[1].kind(), rows[1].size()));

    assert_eq!(
        "drwx------ 2 objstore objstore 4096 Mar 5 14:07 a    \n\
         -rwx------ 1 objstore objstore    5 Mar 5 14:07 d.txt\n",
        render_listing(&rows)
    );
}

#[tokio::test]
async fn test_subdirectory_listing() {
    let (client, _) = client_with(&[
        ("weekly/2024-03-01/home.tar", 300),
        ("weekly/2024-03-08/home.tar", 300),
        ("weekly/index.json", 12),
        ("daily/home.tar", 40),
    ])
    .await;

    let output = client.list_directory().path("/weekly").send().await.unwrap();
    let rows = output.rows(&Utc);
    let names = rows.iter().map(|r| r.name()).collect::<Vec<_>>();
    assert_eq!(vec!["2024-03-01", "2024-03-08", "index.json"], names);
}

#[tokio::test]
async fn test_rmdir_then_list_is_empty() {
    let (client, store) = client_with(&[("old/a", 1), ("old/b/c", 1), ("new/d", 1)]).await;

    let removed = client.remove_directory().path("/old").send().await.unwrap();
    assert_eq!(2, removed);

    let output = client.list_directory().path("/old").send().await.unwrap();
    assert!(output.entries().is_empty());
    assert!(store.object("new/d").await.is_some());
}
