//! Tests for tag replacement semantics and the tag-count aggregate.

use arkiv_core::{ArticleRepository, TagRepository};
use arkiv_db::test_fixtures::{unique_marker, TestDatabase};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_replace_tags_is_full_replacement() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("tags-replace");

    let id = test_db
        .db
        .articles
        .insert_shell(&format!("{} article", marker), None, None)
        .await
        .unwrap();

    let tag_a = format!("{}-a", marker);
    let tag_b = format!("{}-b", marker);
    let tag_c = format!("{}-c", marker);

    test_db
        .db
        .articles
        .replace_tags(id, &[tag_a.clone(), tag_b.clone()])
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(id, &[tag_b.clone(), tag_c.clone()])
        .await
        .unwrap();

    let article = test_db.db.articles.get_by_id(id).await.unwrap().unwrap();
    let mut names: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec![tag_b.as_str(), tag_c.as_str()]);

    // Tag "a" still exists globally, just with no join row to this article.
    let all_tags = test_db.db.tags.list_with_counts().await.unwrap();
    let orphaned = all_tags
        .iter()
        .find(|t| t.name == tag_a)
        .expect("replaced-away tag should not be purged");
    assert_eq!(orphaned.article_count, 0);

    test_db.purge_article(id).await;
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_tag_upsert_is_case_sensitive() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("tags-case");

    let first = test_db
        .db
        .articles
        .insert_shell(&format!("{} first", marker), None, None)
        .await
        .unwrap();
    let second = test_db
        .db
        .articles
        .insert_shell(&format!("{} second", marker), None, None)
        .await
        .unwrap();

    test_db
        .db
        .articles
        .replace_tags(first, &[format!("{}-Rust", marker)])
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(second, &[format!("{}-rust", marker)])
        .await
        .unwrap();

    // Exact-match upsert: differing case creates a second tag row.
    let all_tags = test_db.db.tags.list_with_counts().await.unwrap();
    let matching: Vec<&str> = all_tags
        .iter()
        .filter(|t| t.name.to_lowercase() == format!("{}-rust", marker).to_lowercase())
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(matching.len(), 2);

    test_db.purge_article(first).await;
    test_db.purge_article(second).await;
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_shared_tag_reuses_existing_row() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("tags-shared");
    let shared = format!("{}-shared", marker);

    let first = test_db
        .db
        .articles
        .insert_shell(&format!("{} first", marker), None, None)
        .await
        .unwrap();
    let second = test_db
        .db
        .articles
        .insert_shell(&format!("{} second", marker), None, None)
        .await
        .unwrap();

    test_db
        .db
        .articles
        .replace_tags(first, &[shared.clone()])
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(second, &[shared.clone()])
        .await
        .unwrap();

    let first_tags = test_db.db.articles.get_by_id(first).await.unwrap().unwrap().tags;
    let second_tags = test_db.db.articles.get_by_id(second).await.unwrap().unwrap().tags;
    assert_eq!(first_tags.len(), 1);
    assert_eq!(second_tags.len(), 1);
    assert_eq!(first_tags[0].id, second_tags[0].id);

    test_db.purge_article(first).await;
    test_db.purge_article(second).await;
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_counts_exclude_trashed_articles() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("tags-counts");
    let tag = format!("{}-counted", marker);

    let active = test_db
        .db
        .articles
        .insert_shell(&format!("{} active", marker), None, None)
        .await
        .unwrap();
    let trashed = test_db
        .db
        .articles
        .insert_shell(&format!("{} trashed", marker), None, None)
        .await
        .unwrap();

    test_db.db.articles.replace_tags(active, &[tag.clone()]).await.unwrap();
    test_db.db.articles.replace_tags(trashed, &[tag.clone()]).await.unwrap();
    test_db.db.articles.soft_delete(trashed).await.unwrap();

    let all_tags = test_db.db.tags.list_with_counts().await.unwrap();
    let counted = all_tags.iter().find(|t| t.name == tag).unwrap();
    assert_eq!(counted.article_count, 1);

    test_db.purge_article(active).await;
    test_db.purge_article(trashed).await;
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_replace_with_empty_list_clears_tags() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("tags-clear");

    let id = test_db
        .db
        .articles
        .insert_shell(&format!("{} article", marker), None, None)
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(id, &[format!("{}-x", marker)])
        .await
        .unwrap();
    test_db.db.articles.replace_tags(id, &[]).await.unwrap();

    let article = test_db.db.articles.get_by_id(id).await.unwrap().unwrap();
    assert!(article.tags.is_empty());

    test_db.purge_article(id).await;
    test_db.purge_tags_with_prefix(&marker).await;
}
