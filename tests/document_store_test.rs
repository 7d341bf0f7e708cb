use outreach::store::{DocumentStore, Filter, Patch, Pipeline, Projection, Sort};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

async fn store() -> anyhow::Result<DocumentStore> {
    // One connection so the in-memory database is shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(DocumentStore::new(pool))
}

#[tokio::test]
async fn insert_then_read_back() -> anyhow::Result<()> {
    let store = store().await?;

    let id = store
        .insert("contacts", &json!({ "name": "A", "email": "a@x.com" }))
        .await?;

    let docs = store.find("contacts", &Filter::new(), None).await?;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, id);
    assert_eq!(docs[0].body["name"], json!("A"));
    assert_eq!(docs[0].body["email"], json!("a@x.com"));

    let as_json = docs.into_iter().next().unwrap().into_json();
    assert_eq!(as_json["id"], json!(id.to_string()));

    Ok(())
}

#[tokio::test]
async fn filter_narrows_and_sort_orders() -> anyhow::Result<()> {
    let store = store().await?;

    store
        .insert("team", &json!({ "email": "a@x.com", "status": "pending", "createdAt": "2025-01-01T00:00:00Z" }))
        .await?;
    store
        .insert("team", &json!({ "email": "b@x.com", "status": "accepted", "createdAt": "2025-02-01T00:00:00Z" }))
        .await?;
    store
        .insert("team", &json!({ "email": "c@x.com", "status": "pending", "createdAt": "2025-03-01T00:00:00Z" }))
        .await?;

    let pending = store
        .find("team", &Filter::new().eq("status", "pending"), None)
        .await?;
    assert_eq!(pending.len(), 2);

    let both = store
        .find(
            "team",
            &Filter::new().eq("status", "pending").eq("email", "c@x.com"),
            None,
        )
        .await?;
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].body["email"], json!("c@x.com"));

    let newest_first = store
        .find("team", &Filter::new(), Some(&Sort::desc("createdAt")))
        .await?;
    assert_eq!(newest_first[0].body["email"], json!("c@x.com"));
    assert_eq!(newest_first[2].body["email"], json!("a@x.com"));

    Ok(())
}

#[tokio::test]
async fn find_one_returns_latest_match_or_none() -> anyhow::Result<()> {
    let store = store().await?;

    store
        .insert("admin_messages", &json!({ "user_email": "a@x.com", "admin_message": "first", "created_at": "2025-01-01T00:00:00Z" }))
        .await?;
    store
        .insert("admin_messages", &json!({ "user_email": "a@x.com", "admin_message": "second", "created_at": "2025-02-01T00:00:00Z" }))
        .await?;
    store
        .insert("admin_messages", &json!({ "user_email": "b@x.com", "admin_message": "other", "created_at": "2025-03-01T00:00:00Z" }))
        .await?;

    let latest = store
        .find_one(
            "admin_messages",
            &Filter::new().eq("user_email", "a@x.com"),
            &Sort::desc("created_at"),
        )
        .await?
        .expect("reply should exist");
    assert_eq!(latest.body["admin_message"], json!("second"));

    let none = store
        .find_one(
            "admin_messages",
            &Filter::new().eq("user_email", "missing@x.com"),
            &Sort::desc("created_at"),
        )
        .await?;
    assert!(none.is_none());

    Ok(())
}

#[tokio::test]
async fn update_patches_only_supplied_fields() -> anyhow::Result<()> {
    let store = store().await?;

    let id = store
        .insert("events", &json!({ "title": "before", "location": "hall", "imageUrl": null }))
        .await?;

    let matched = store
        .update_by_id("events", id, &Patch::new().set("title", "after"))
        .await?;
    assert_eq!(matched, 1);

    let docs = store.find("events", &Filter::new(), None).await?;
    assert_eq!(docs[0].body["title"], json!("after"));
    assert_eq!(docs[0].body["location"], json!("hall"));

    // Unknown identifier matches nothing and is not an error.
    let matched = store
        .update_by_id("events", Uuid::new_v4(), &Patch::new().set("title", "x"))
        .await?;
    assert_eq!(matched, 0);

    Ok(())
}

#[tokio::test]
async fn delete_respects_extra_filter_and_reports_counts() -> anyhow::Result<()> {
    let store = store().await?;

    let id = store
        .insert("team", &json!({ "email": "a@x.com", "status": "accepted" }))
        .await?;

    // The status filter does not match, so the record survives.
    let deleted = store
        .delete_by_id("team", id, Some(&Filter::new().eq("status", "pending")))
        .await?;
    assert_eq!(deleted, 0);
    assert_eq!(store.find("team", &Filter::new(), None).await?.len(), 1);

    let deleted = store.delete_by_id("team", id, None).await?;
    assert_eq!(deleted, 1);

    // Second delete of the same identifier reports zero.
    let deleted = store.delete_by_id("team", id, None).await?;
    assert_eq!(deleted, 0);

    Ok(())
}

#[tokio::test]
async fn aggregate_joins_newest_reply_per_message() -> anyhow::Result<()> {
    let store = store().await?;

    let older = store
        .insert("contacts", &json!({ "name": "A", "email": "a@x.com", "message": "hi", "created_at": "2025-01-01T00:00:00Z" }))
        .await?;
    let newer = store
        .insert("contacts", &json!({ "name": "B", "email": "b@x.com", "message": "yo", "created_at": "2025-02-01T00:00:00Z" }))
        .await?;

    store
        .insert("admin_messages", &json!({ "user_message_id": older.to_string(), "admin_message": "first answer", "created_at": "2025-01-02T00:00:00Z" }))
        .await?;
    store
        .insert("admin_messages", &json!({ "user_message_id": older.to_string(), "admin_message": "final answer", "created_at": "2025-01-05T00:00:00Z" }))
        .await?;
    // Orphaned reply: its message identifier matches nothing.
    store
        .insert("admin_messages", &json!({ "user_message_id": Uuid::new_v4().to_string(), "admin_message": "orphan", "created_at": "2025-01-03T00:00:00Z" }))
        .await?;

    let pipeline = Pipeline::new()
        .lookup("admin_messages", "id", "user_message_id", "admin_responses")
        .project(
            Projection::keep(["id", "name", "email", "message", "created_at"])
                .newest_of("admin_responses", "created_at", "admin_message", "admin_message"),
        )
        .sort_desc("created_at");

    let results = store.aggregate("contacts", &pipeline).await?;
    assert_eq!(results.len(), 2);

    // Newest message first; it has no reply, so the field is absent.
    assert_eq!(results[0]["id"], json!(newer.to_string()));
    assert!(results[0].get("admin_message").is_none());

    // The older message carries the newest of its two replies.
    assert_eq!(results[1]["id"], json!(older.to_string()));
    assert_eq!(results[1]["admin_message"], json!("final answer"));

    Ok(())
}
