use tracing::info;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::listing::PostQuery;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The author is always the acting user.
    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            author_id,
        };
        let post = self.repo.create_post(new_post).await?;
        info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    /// Non-owners get the same `NotFound` as for a missing post.
    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        let patch = PostPatch {
            title: req.title,
            content: req.content,
        };
        self.repo
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let deleted = self.repo.delete_post_owned(post_id, actor_user_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        info!(post_id, actor_user_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        query: &PostQuery,
        pagination: Pagination,
    ) -> Result<Page<Post>, DomainError> {
        self.repo.list_posts(query, pagination).await
    }
}

#[cfg(test)]
mod tests {
    use super::PostService;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::listing::{PostQuery, parse_ordering, parse_search_terms};
    use crate::domain::pagination::{PageLimits, Pagination};
    use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

    fn first_page() -> Pagination {
        PageLimits::default()
            .resolve(None, None)
            .expect("default pagination")
    }

    async fn create(service: &PostService<InMemoryStore>, author: i64, title: &str, body: &str) -> Post {
        service
            .create_post(
                author,
                CreatePostRequest {
                    title: title.to_string(),
                    content: body.to_string(),
                },
            )
            .await
            .expect("create_post must succeed")
    }

    #[tokio::test]
    async fn create_post_normalizes_request_and_binds_author() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let service = PostService::new(store);

        let created = create(&service, bob.id, "  title  ", "  content  ").await;

        assert_eq!(created.title, "title");
        assert_eq!(created.content, "content");
        assert_eq!(created.author_id, bob.id);
        assert_eq!(created.author_username, "bob");
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let service = PostService::new(InMemoryStore::new());

        let err = service
            .get_post(42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn owner_can_patch_single_field() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let service = PostService::new(store);
        let post = create(&service, bob.id, "title", "body").await;

        let updated = service
            .update_post(
                bob.id,
                post.id,
                UpdatePostRequest {
                    title: Some("  new  ".to_string()),
                    content: None,
                },
            )
            .await
            .expect("owner update must succeed");

        assert_eq!(updated.title, "new");
        assert_eq!(updated.content, "body");
        assert!(updated.updated_at > post.updated_at);
    }

    #[tokio::test]
    async fn non_owner_mutations_look_like_missing_posts() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let alice = store.add_user("alice");
        let service = PostService::new(store);
        let post = create(&service, bob.id, "title", "body").await;

        let patch = || UpdatePostRequest {
            title: Some("hijacked".to_string()),
            content: None,
        };

        let foreign = service
            .update_post(alice.id, post.id, patch())
            .await
            .expect_err("non-owner update must fail");
        let missing = service
            .update_post(alice.id, 9_999, patch())
            .await
            .expect_err("missing post update must fail");
        assert!(matches!(foreign, DomainError::NotFound(_)));
        assert!(matches!(missing, DomainError::NotFound(_)));

        let err = service
            .delete_post(alice.id, post.id)
            .await
            .expect_err("non-owner delete must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let kept = service.get_post(post.id).await.expect("post must survive");
        assert_eq!(kept.title, "title");

        service
            .delete_post(bob.id, post.id)
            .await
            .expect("owner delete must succeed");
        assert!(matches!(
            service.get_post(post.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_posts_combines_search_filter_and_ordering() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let carol = store.add_user("carol");
        let service = PostService::new(store);

        let rust_intro = create(&service, bob.id, "beta Rust intro", "ownership basics").await;
        create(&service, bob.id, "gardening", "tomatoes").await;
        let rust_async = create(&service, bob.id, "alpha", "async RUST in practice").await;
        create(&service, carol.id, "rust for carol", "also rust").await;

        let query = PostQuery {
            search: parse_search_terms(Some("rust")),
            author_id: Some(bob.id),
            ordering: parse_ordering(Some("title")),
        };
        let page = service
            .list_posts(&query, first_page())
            .await
            .expect("list must succeed");

        assert_eq!(page.total, 2);
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![rust_async.id, rust_intro.id]);
    }

    #[tokio::test]
    async fn list_posts_defaults_to_creation_order_and_paginates() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let service = PostService::new(store);
        for n in 0..3 {
            create(&service, bob.id, &format!("post {n}"), "body").await;
        }

        let pagination = PageLimits::default()
            .resolve(Some(2), Some(2))
            .expect("pagination must resolve");
        let page = service
            .list_posts(&PostQuery::default(), pagination)
            .await
            .expect("list must succeed");

        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "post 2");
    }
}
