use crate::error::ServiceError;
use crate::model::post::{Comment, Post, PostType};
use crate::model::user::User;
use crate::store::{Store, collections, now_ms};
use uuid::Uuid;

/// Bulletin board: posts with append-only comment lists. Notices double as
/// the poller's notification source.
#[derive(Clone)]
pub struct BoardService {
    store: Store,
}

impl BoardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Notices pinned first, then newest first.
    pub fn list_posts(&self) -> Result<Vec<Post>, ServiceError> {
        let mut posts: Vec<Post> = self.store.load(collections::POSTS)?;
        posts.sort_by(|a, b| {
            let a_notice = a.post_type == PostType::Notice;
            let b_notice = b.post_type == PostType::Notice;
            b_notice
                .cmp(&a_notice)
                .then(b.timestamp.cmp(&a.timestamp))
        });
        Ok(posts)
    }

    pub fn create_post(
        &self,
        author: &User,
        title: String,
        content: String,
        post_type: PostType,
    ) -> Result<Post, ServiceError> {
        let _guard = self.store.guard();
        let post = Post {
            id: format!("post_{}", Uuid::new_v4()),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            title,
            content,
            timestamp: now_ms(),
            likes: 0,
            post_type,
            comments: Vec::new(),
        };
        let mut posts: Vec<Post> = self.store.load(collections::POSTS)?;
        posts.insert(0, post.clone());
        self.store.save(collections::POSTS, &posts)?;
        Ok(post)
    }

    pub fn add_comment(
        &self,
        post_id: &str,
        author: &User,
        content: String,
    ) -> Result<Comment, ServiceError> {
        let _guard = self.store.guard();
        let mut posts: Vec<Post> = self.store.load(collections::POSTS)?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| ServiceError::not_found(format!("post {post_id}")))?;

        let comment = Comment {
            id: format!("cmt_{}", Uuid::new_v4()),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            content,
            timestamp: now_ms(),
        };
        post.comments.push(comment.clone());
        self.store.save(collections::POSTS, &posts)?;
        Ok(comment)
    }

    pub fn like_post(&self, post_id: &str) -> Result<Post, ServiceError> {
        let _guard = self.store.guard();
        let mut posts: Vec<Post> = self.store.load(collections::POSTS)?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| ServiceError::not_found(format!("post {post_id}")))?;
        post.likes += 1;
        let updated = post.clone();
        self.store.save(collections::POSTS, &posts)?;
        Ok(updated)
    }

    /// Notices newer than the given watermark, newest first.
    pub fn notices_since(&self, watermark: i64) -> Result<Vec<Post>, ServiceError> {
        let mut notices: Vec<Post> = self
            .store
            .load::<Post>(collections::POSTS)?
            .into_iter()
            .filter(|p| p.post_type == PostType::Notice && p.timestamp > watermark)
            .collect();
        notices.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{test_store, user};

    #[test]
    fn notices_sort_before_normal_posts() {
        let (_dir, store) = test_store();
        let board = BoardService::new(store);
        let author = user("1", "Alice", 15.0);

        board
            .create_post(&author, "hello".into(), "".into(), PostType::Normal)
            .unwrap();
        board
            .create_post(&author, "rules".into(), "".into(), PostType::Notice)
            .unwrap();
        board
            .create_post(&author, "lunch".into(), "".into(), PostType::Normal)
            .unwrap();

        let posts = board.list_posts().unwrap();
        assert_eq!(posts[0].title, "rules");
        assert_eq!(posts[1].title, "lunch");
        assert_eq!(posts[2].title, "hello");
    }

    #[test]
    fn comments_append_and_missing_post_errors() {
        let (_dir, store) = test_store();
        let board = BoardService::new(store);
        let author = user("1", "Alice", 15.0);

        let post = board
            .create_post(&author, "hello".into(), "".into(), PostType::Normal)
            .unwrap();
        board.add_comment(&post.id, &author, "first".into()).unwrap();
        board.add_comment(&post.id, &author, "second".into()).unwrap();

        let posts = board.list_posts().unwrap();
        let contents: Vec<_> = posts[0].comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);

        assert!(matches!(
            board.add_comment("ghost", &author, "x".into()),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn notices_since_filters_by_watermark() {
        let (_dir, store) = test_store();
        let board = BoardService::new(store);
        let author = user("1", "Alice", 15.0);

        let notice = board
            .create_post(&author, "rules".into(), "".into(), PostType::Notice)
            .unwrap();

        assert_eq!(board.notices_since(0).unwrap().len(), 1);
        assert!(board.notices_since(notice.timestamp).unwrap().is_empty());
    }
}
