//! Bug repository for storage operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::connection::Database;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{bug::dedup_labels, Bug, CreatorRef};
use crate::query::{self, BugQuery, FilterSpec, QueryResult, SortSpec};

/// Fields supplied when filing a bug
#[derive(Debug, Clone, Default)]
pub struct NewBug {
    pub title: String,
    pub description: Option<String>,
    pub severity: u8,
    pub labels: Vec<String>,
    pub creator: Option<CreatorRef>,
}

/// Partial update; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct BugChanges {
    pub title: Option<String>,
    /// An empty string clears the description
    pub description: Option<String>,
    pub severity: Option<u8>,
    pub labels: Option<Vec<String>>,
}

/// Aggregate counts over the whole collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugStats {
    pub total: usize,
    pub by_severity: BTreeMap<u8, usize>,
    pub unlabeled: usize,
}

/// Bug repository for managing bug storage operations
pub struct BugRepository;

impl BugRepository {
    /// Create a new bug. New bugs go to the front of the collection.
    pub async fn create(db: &Database, new: NewBug) -> DbResult<Bug> {
        let mut bug = Bug::new(new.title, new.severity).with_labels(new.labels);
        bug.description = new.description.filter(|d| !d.is_empty());
        bug.creator = new.creator;

        let stored = bug.clone();
        db.bugs()
            .mutate(move |bugs| {
                bugs.insert(0, stored);
                Ok(())
            })
            .await?;

        Ok(bug)
    }

    /// Get a bug by ID
    pub async fn get_by_id(db: &Database, id: &str) -> DbResult<Option<Bug>> {
        Ok(db
            .bugs()
            .read(|bugs| bugs.iter().find(|b| b.id == id).cloned())
            .await)
    }

    /// List all bugs in storage order
    pub async fn list(db: &Database) -> Vec<Bug> {
        db.bugs().snapshot().await
    }

    /// Run a filtered, sorted, paged listing
    pub async fn query(db: &Database, query: &BugQuery) -> QueryResult {
        db.bugs().read(|bugs| query.run(bugs)).await
    }

    /// Every bug matching `filter`, ordered by `sort`, unpaged
    pub async fn export(db: &Database, filter: &FilterSpec, sort: Option<&SortSpec>) -> Vec<Bug> {
        db.bugs()
            .read(|bugs| {
                query::filter_and_sort(bugs, filter, sort)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Apply `changes` to the bug with `id`
    pub async fn update(db: &Database, id: &str, changes: BugChanges) -> DbResult<Bug> {
        db.bugs()
            .mutate(|bugs| {
                let bug = bugs
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| DatabaseError::not_found(format!("bug {id}")))?;

                if let Some(title) = changes.title {
                    bug.title = title;
                }
                if let Some(description) = changes.description {
                    bug.description = Some(description).filter(|d| !d.is_empty());
                }
                if let Some(severity) = changes.severity {
                    bug.severity = severity;
                }
                if let Some(labels) = changes.labels {
                    bug.labels = dedup_labels(labels);
                }

                Ok(bug.clone())
            })
            .await
    }

    /// Delete a bug, returning the removed record
    pub async fn delete(db: &Database, id: &str) -> DbResult<Bug> {
        db.bugs()
            .mutate(|bugs| {
                let idx = bugs
                    .iter()
                    .position(|b| b.id == id)
                    .ok_or_else(|| DatabaseError::not_found(format!("bug {id}")))?;
                Ok(bugs.remove(idx))
            })
            .await
    }

    /// Count total bugs
    pub async fn count(db: &Database) -> usize {
        db.bugs().len().await
    }

    /// Totals per severity and for unlabeled bugs
    pub async fn stats(db: &Database) -> BugStats {
        db.bugs()
            .read(|bugs| {
                let mut by_severity = BTreeMap::new();
                for bug in bugs {
                    *by_severity.entry(bug.severity).or_insert(0) += 1;
                }
                BugStats {
                    total: bugs.len(),
                    by_severity,
                    unlabeled: bugs.iter().filter(|b| b.labels.is_empty()).count(),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::query::{PageSpec, SortField};
    use tempfile::TempDir;

    async fn setup_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            bugs_path: dir.path().join("bug.json"),
            users_path: dir.path().join("user.json"),
            seed_demo_data: false,
        };
        let db = Database::open(&config).await.unwrap();
        (dir, db)
    }

    fn new_bug(title: &str, severity: u8) -> NewBug {
        NewBug {
            title: title.to_string(),
            severity,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_bug() {
        let (_dir, db) = setup_db().await;

        let created = BugRepository::create(
            &db,
            NewBug {
                labels: vec!["ui".to_string(), "ui".to_string()],
                description: Some(String::new()),
                ..new_bug("Keyboard Not Found", 3)
            },
        )
        .await
        .unwrap();

        assert_eq!(created.labels, vec!["ui".to_string()]);
        assert!(created.description.is_none());

        let fetched = BugRepository::get_by_id(&db, &created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_new_bugs_go_first() {
        let (_dir, db) = setup_db().await;

        BugRepository::create(&db, new_bug("first", 1)).await.unwrap();
        BugRepository::create(&db, new_bug("second", 1)).await.unwrap();

        let titles: Vec<String> = BugRepository::list(&db)
            .await
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_get_missing_bug() {
        let (_dir, db) = setup_db().await;
        assert!(BugRepository::get_by_id(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_bug() {
        let (_dir, db) = setup_db().await;
        let bug = BugRepository::create(&db, new_bug("Typo", 1)).await.unwrap();

        let updated = BugRepository::update(
            &db,
            &bug.id,
            BugChanges {
                severity: Some(4),
                labels: Some(vec!["docs".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Typo");
        assert_eq!(updated.severity, 4);
        assert_eq!(updated.labels, vec!["docs".to_string()]);
        assert_eq!(updated.created_at, bug.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_bug() {
        let (_dir, db) = setup_db().await;
        let err = BugRepository::update(&db, "missing", BugChanges::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_bug() {
        let (_dir, db) = setup_db().await;
        let keep = BugRepository::create(&db, new_bug("keep", 1)).await.unwrap();
        let gone = BugRepository::create(&db, new_bug("gone", 1)).await.unwrap();

        let removed = BugRepository::delete(&db, &gone.id).await.unwrap();
        assert_eq!(removed.id, gone.id);
        assert_eq!(BugRepository::count(&db).await, 1);

        // Deleting an unknown id must not remove anything else.
        assert!(BugRepository::delete(&db, "missing").await.unwrap_err().is_not_found());
        assert!(BugRepository::get_by_id(&db, &keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_query_and_export() {
        let (_dir, db) = setup_db().await;
        for (title, severity) in [("a", 2), ("b", 5), ("c", 3), ("d", 1)] {
            BugRepository::create(&db, new_bug(title, severity)).await.unwrap();
        }

        let filter = FilterSpec::new().with_min_severity(2);
        let sort = SortSpec::desc(SortField::Severity);
        let query = BugQuery::new()
            .with_filter(filter.clone())
            .with_sort(sort)
            .with_page(PageSpec::new(0, 2));

        let page = BugRepository::query(&db, &query).await;
        assert_eq!(page.total_count, 3);
        assert_eq!(page.bugs.len(), 2);
        assert_eq!(page.bugs[0].title, "b");

        let all = BugRepository::export(&db, &filter, Some(&sort)).await;
        let titles: Vec<&str> = all.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_stats() {
        let (_dir, db) = setup_db().await;
        BugRepository::create(&db, new_bug("a", 3)).await.unwrap();
        BugRepository::create(&db, new_bug("b", 3)).await.unwrap();
        BugRepository::create(
            &db,
            NewBug {
                labels: vec!["ui".to_string()],
                ..new_bug("c", 5)
            },
        )
        .await
        .unwrap();

        let stats = BugRepository::stats(&db).await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_severity.get(&3), Some(&2));
        assert_eq!(stats.by_severity.get(&5), Some(&1));
        assert_eq!(stats.unlabeled, 2);
    }
}
