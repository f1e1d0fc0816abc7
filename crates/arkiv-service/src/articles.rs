//! Article service: the single orchestrator of the metadata repository and
//! the blob store.
//!
//! Callers see "an article" as one entity with content; this layer owns the
//! storage split. Multi-step workflows here are explicit sagas, not
//! transactions: a failure between the metadata shell insert and the
//! content-metadata attach leaves an orphaned shell, which stays visible to
//! [`ArticleService::sweep_orphaned_shells`] rather than being rolled back.

use chrono::Duration;
use tracing::{info, warn};

use arkiv_core::{
    Article, ArticleMetadata, ArticleRepository, Category, CategoryRepository,
    CreateArticleRequest, CreateCategoryRequest, Error, Result, Tag, TagRepository,
    UpdateArticleFields, UpdateArticleRequest,
};
use arkiv_db::{Database, PoolConfig, DEFAULT_CATEGORY_COLOR};
use arkiv_storage::{ArticleStore, FilesystemBackend};

use crate::config::ServiceConfig;

/// Coordinates the metadata repository and the blob store.
///
/// Dependencies are injected through the constructor; the service keeps no
/// ambient state and no cross-request locks. Consistency of the multi-step
/// workflows relies on the low write concurrency of a single-user tool:
/// concurrent writers to one article are last-write-wins on both stores.
pub struct ArticleService {
    db: Database,
    store: ArticleStore,
}

impl ArticleService {
    /// Create a new service over the given database context and blob store.
    pub fn new(db: Database, store: ArticleStore) -> Self {
        Self { db, store }
    }

    /// Connect both stores from configuration. The blob backend is
    /// health-checked up front so filesystem problems surface at startup
    /// rather than on the first write.
    pub async fn connect(config: &ServiceConfig) -> Result<Self> {
        let db = Database::connect_with_config(
            &config.database_url,
            PoolConfig::default().max_connections(config.pool_max_connections),
        )
        .await?;

        let backend = FilesystemBackend::new(config.blob_storage_path.as_str());
        backend.validate().await.map_err(Error::Config)?;

        Ok(Self::new(db, ArticleStore::new(backend)))
    }

    /// Create an article: insert the metadata shell to obtain an id, save
    /// the content blob under `articles/<id>.md`, attach the resulting
    /// key/size/hash to the row, then set tags.
    ///
    /// Validation happens before any store I/O. If a step after the shell
    /// insert fails, the shell row remains with NULL content columns; the
    /// orphan sweep reports such rows instead of this method cleaning up.
    pub async fn create(&self, req: CreateArticleRequest) -> Result<i64> {
        if req.title.is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }
        if req.content.is_empty() {
            return Err(Error::InvalidInput("content must not be empty".to_string()));
        }

        let id = self
            .db
            .articles
            .insert_shell(&req.title, req.memo.as_deref(), req.category_id)
            .await?;

        let blob = self.store.save(id, &req.content).await?;
        self.db
            .articles
            .attach_content_metadata(id, &blob.key, blob.size, &blob.hash)
            .await?;

        if let Some(tags) = &req.tags {
            self.db.articles.replace_tags(id, tags).await?;
        }

        info!(
            subsystem = "service",
            component = "articles",
            op = "create",
            article_id = id,
            content_bytes = blob.size,
            tag_count = req.tags.as_ref().map(|t| t.len()).unwrap_or(0),
            "Created article"
        );

        Ok(id)
    }

    /// Fetch an article with its content. Missing and trashed ids yield
    /// `None`.
    ///
    /// A row whose `content_key` points at a missing blob degrades to
    /// `content: None` instead of failing the read; every other storage
    /// error propagates.
    pub async fn get(&self, id: i64) -> Result<Option<Article>> {
        let Some(meta) = self.db.articles.get_by_id(id).await? else {
            return Ok(None);
        };

        let content = match meta.content_key.as_deref() {
            Some(key) => {
                let fetched = self.store.get(key).await?;
                if fetched.is_none() {
                    warn!(
                        subsystem = "service",
                        component = "articles",
                        op = "get",
                        article_id = id,
                        blob_key = key,
                        "Content blob missing, serving metadata only"
                    );
                }
                fetched
            }
            None => None,
        };

        Ok(Some(Article { meta, content }))
    }

    /// Partially update an article. Returns the freshly reloaded article,
    /// or `None` when the id is unknown or trashed.
    ///
    /// New content overwrites the blob under the same deterministic key and
    /// refreshes size and hash together; they never move independently.
    pub async fn update(&self, id: i64, req: UpdateArticleRequest) -> Result<Option<Article>> {
        if self.db.articles.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        if let Some(content) = &req.content {
            let blob = self.store.save(id, content).await?;
            self.db
                .articles
                .attach_content_metadata(id, &blob.key, blob.size, &blob.hash)
                .await?;
        }

        if req.has_metadata_changes() {
            self.db
                .articles
                .update_fields(
                    id,
                    UpdateArticleFields {
                        title: req.title.clone(),
                        memo: req.memo.clone(),
                        category_id: req.category_id,
                    },
                )
                .await?;
        }

        if let Some(tags) = &req.tags {
            self.db.articles.replace_tags(id, tags).await?;
        }

        self.get(id).await
    }

    /// Move an article to the trash. The content blob is deliberately kept
    /// so restore brings the article back whole.
    pub async fn remove(&self, id: i64) -> Result<bool> {
        let changed = self.db.articles.soft_delete(id).await?;
        if changed {
            info!(
                subsystem = "service",
                component = "articles",
                op = "remove",
                article_id = id,
                "Moved article to trash"
            );
        }
        Ok(changed)
    }

    /// Bring an article back from the trash. Blob existence is not
    /// re-verified; if the blob vanished externally, reads degrade.
    pub async fn restore(&self, id: i64) -> Result<bool> {
        self.db.articles.restore(id).await
    }

    /// List active articles, metadata only.
    pub async fn list(&self) -> Result<Vec<ArticleMetadata>> {
        self.db.articles.list_active().await
    }

    /// List trashed articles, metadata only.
    pub async fn list_trash(&self) -> Result<Vec<ArticleMetadata>> {
        self.db.articles.list_trashed().await
    }

    /// Case-insensitive substring search over title and memo.
    pub async fn search(&self, query: &str) -> Result<Vec<ArticleMetadata>> {
        self.db.articles.search(query).await
    }

    /// List all tags with active-article counts.
    pub async fn tags_with_counts(&self) -> Result<Vec<Tag>> {
        self.db.tags.list_with_counts().await
    }

    /// List all categories in display order.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.db.categories.list().await
    }

    /// Create a category at the end of the ordering.
    pub async fn create_category(&self, req: CreateCategoryRequest) -> Result<i64> {
        if req.name.is_empty() {
            return Err(Error::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }
        self.db.categories.create(req).await
    }

    /// Rename/recolor a category; a missing color falls back to the
    /// default.
    pub async fn update_category(&self, id: i64, name: &str, color: Option<&str>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }
        self.db
            .categories
            .update(id, name, color.unwrap_or(DEFAULT_CATEGORY_COLOR))
            .await
    }

    /// Delete a category. Descendants cascade away and referencing articles
    /// are uncategorized by the store's constraints.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.db.categories.delete(id).await
    }

    /// Persist a new category ordering (1..N over the given sequence).
    pub async fn reorder_categories(&self, ordered_ids: &[i64]) -> Result<()> {
        self.db.categories.reorder(ordered_ids).await
    }

    /// Report articles whose create saga never completed: active rows with
    /// NULL content columns older than the threshold. The sweep only
    /// observes; retrying or deleting a shell stays a human decision.
    pub async fn sweep_orphaned_shells(&self, older_than: Duration) -> Result<Vec<ArticleMetadata>> {
        let orphans = self.db.articles.find_orphaned_shells(older_than).await?;

        for shell in &orphans {
            warn!(
                subsystem = "service",
                component = "articles",
                op = "sweep_orphans",
                article_id = shell.id,
                created_at = %shell.created_at,
                "Orphaned shell: metadata row without content"
            );
        }
        info!(
            subsystem = "service",
            component = "articles",
            op = "sweep_orphans",
            result_count = orphans.len(),
            "Orphan sweep complete"
        );

        Ok(orphans)
    }
}
