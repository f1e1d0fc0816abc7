//! Tests that listing paths attach tags through the batched id-set query
//! and that every listing shape carries the right tag sets.

use arkiv_core::ArticleRepository;
use arkiv_db::test_fixtures::{unique_marker, TestDatabase};

/// Create articles with 3 / 1 / 0 / 8 tags under a shared marker prefix.
async fn create_tagged_articles(test_db: &TestDatabase, marker: &str) -> Vec<i64> {
    let specs: Vec<(&str, usize)> = vec![
        ("several", 3),
        ("single", 1),
        ("untagged", 0),
        ("many", 8),
    ];

    let mut ids = Vec::new();
    for (label, tag_count) in specs {
        let id = test_db
            .db
            .articles
            .insert_shell(&format!("{} {}", marker, label), None, None)
            .await
            .expect("insert_shell failed");

        let tags: Vec<String> = (0..tag_count)
            .map(|i| format!("{}-{}-t{}", marker, label, i))
            .collect();
        if !tags.is_empty() {
            test_db
                .db
                .articles
                .replace_tags(id, &tags)
                .await
                .expect("replace_tags failed");
        }
        ids.push(id);
    }
    ids
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_list_active_attaches_correct_tag_sets() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("batch-list");
    let ids = create_tagged_articles(&test_db, &marker).await;

    let articles = test_db.db.articles.list_active().await.unwrap();

    let counts: Vec<usize> = ids
        .iter()
        .map(|id| {
            articles
                .iter()
                .find(|a| a.id == *id)
                .expect("created article missing from listing")
                .tags
                .len()
        })
        .collect();
    assert_eq!(counts, vec![3, 1, 0, 8]);

    // Tags belong to the right article, not just the right cardinality.
    let several = articles.iter().find(|a| a.id == ids[0]).unwrap();
    assert!(several
        .tags
        .iter()
        .all(|t| t.name.starts_with(&format!("{}-several", marker))));

    // Newest first.
    let positions: Vec<usize> = ids
        .iter()
        .map(|id| articles.iter().position(|a| a.id == *id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] > w[1]));

    for id in &ids {
        test_db.purge_article(*id).await;
    }
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_search_matches_title_or_memo_and_attaches_tags() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("batch-search");

    let by_title = test_db
        .db
        .articles
        .insert_shell(&format!("{} Needle in title", marker), None, None)
        .await
        .unwrap();
    let by_memo = test_db
        .db
        .articles
        .insert_shell(
            &format!("{} plain", marker),
            Some(&format!("{} NEEDLE in memo", marker)),
            None,
        )
        .await
        .unwrap();
    let unrelated = test_db
        .db
        .articles
        .insert_shell(&format!("{} haystack only", marker), None, None)
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(by_title, &[format!("{}-tagged", marker)])
        .await
        .unwrap();

    // Case-insensitive substring over title OR memo.
    let results = test_db
        .db
        .articles
        .search(&format!("{} needle", marker))
        .await
        .unwrap();
    let found: Vec<i64> = results.iter().map(|a| a.id).collect();
    assert!(found.contains(&by_title));
    assert!(found.contains(&by_memo));
    assert!(!found.contains(&unrelated));

    let hit = results.iter().find(|a| a.id == by_title).unwrap();
    assert_eq!(hit.tags.len(), 1);

    for id in [by_title, by_memo, unrelated] {
        test_db.purge_article(id).await;
    }
    test_db.purge_tags_with_prefix(&marker).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_search_escapes_like_wildcards() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("batch-escape");

    let literal = test_db
        .db
        .articles
        .insert_shell(&format!("{} 100% done", marker), None, None)
        .await
        .unwrap();
    let decoy = test_db
        .db
        .articles
        .insert_shell(&format!("{} 100x done", marker), None, None)
        .await
        .unwrap();

    // "%" in the query is a literal character, not a wildcard.
    let results = test_db.db.articles.search("100% done").await.unwrap();
    let found: Vec<i64> = results.iter().map(|a| a.id).collect();
    assert!(found.contains(&literal));
    assert!(!found.contains(&decoy));

    for id in [literal, decoy] {
        test_db.purge_article(id).await;
    }
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_trashed_listing_attaches_tags() {
    let test_db = TestDatabase::new().await;
    let marker = unique_marker("batch-trash");

    let id = test_db
        .db
        .articles
        .insert_shell(&format!("{} doomed", marker), None, None)
        .await
        .unwrap();
    test_db
        .db
        .articles
        .replace_tags(id, &[format!("{}-a", marker), format!("{}-b", marker)])
        .await
        .unwrap();
    test_db.db.articles.soft_delete(id).await.unwrap();

    let trashed = test_db.db.articles.list_trashed().await.unwrap();
    let entry = trashed.iter().find(|a| a.id == id).unwrap();
    assert_eq!(entry.tags.len(), 2);

    test_db.purge_article(id).await;
    test_db.purge_tags_with_prefix(&marker).await;
}
