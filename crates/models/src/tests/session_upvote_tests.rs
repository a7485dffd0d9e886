use anyhow::Result;

use super::setup_test_db;
use crate::{entry, session_upvote};

#[tokio::test]
async fn test_record_is_insert_if_absent() -> Result<()> {
    let db = setup_test_db().await?;
    let e = entry::create(&db, "why", None).await?;

    assert!(!session_upvote::contains(&db, "s1", e.id).await?);
    assert!(session_upvote::record(&db, "s1", e.id).await?);
    assert!(!session_upvote::record(&db, "s1", e.id).await?);
    assert!(session_upvote::contains(&db, "s1", e.id).await?);

    // Other sessions are independent
    assert!(!session_upvote::contains(&db, "s2", e.id).await?);
    assert!(session_upvote::record(&db, "s2", e.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_entry_ids_for_session() -> Result<()> {
    let db = setup_test_db().await?;
    let a = entry::create(&db, "a", None).await?;
    let b = entry::create(&db, "b", None).await?;

    session_upvote::record(&db, "s1", a.id).await?;
    session_upvote::record(&db, "s1", b.id).await?;
    session_upvote::record(&db, "s2", b.id).await?;

    let mut ids = session_upvote::entry_ids_for(&db, "s1").await?;
    ids.sort();
    assert_eq!(ids, vec![a.id, b.id]);
    assert_eq!(session_upvote::entry_ids_for(&db, "s2").await?, vec![b.id]);
    assert!(session_upvote::entry_ids_for(&db, "nobody").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_session_id_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    let e = entry::create(&db, "why", None).await?;
    assert!(session_upvote::record(&db, "", e.id).await.is_err());
    Ok(())
}
