//! Feed composition: the ordered union of a user's own posts and the
//! posts of users they follow
//!
//! The query is a pure value; repositories evaluate it against their
//! storage. Re-evaluating is always safe, it is a read.

use std::collections::HashSet;

use crate::domain::micropost::Micropost;
use crate::domain::user::UserId;

/// Selection predicate for a user's feed: a post belongs iff its owner is
/// the user or one of their followees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    owner_ids: HashSet<UserId>,
}

impl FeedQuery {
    pub fn for_user(user_id: UserId, followee_ids: impl IntoIterator<Item = UserId>) -> Self {
        let mut owner_ids: HashSet<UserId> = followee_ids.into_iter().collect();
        owner_ids.insert(user_id);

        Self { owner_ids }
    }

    pub fn matches(&self, post: &Micropost) -> bool {
        self.owner_ids.contains(&post.user_id())
    }

    /// Owner ids as a sorted list, for SQL `= ANY($1)` binding.
    pub fn owner_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.owner_ids.iter().map(|id| id.value()).collect();
        ids.sort_unstable();
        ids
    }
}

/// Filter and order a candidate set into feed order: newest first, with
/// id descending as the tiebreak for posts created in the same instant.
pub fn compose(query: &FeedQuery, posts: impl IntoIterator<Item = Micropost>) -> Vec<Micropost> {
    let mut feed: Vec<Micropost> = posts.into_iter().filter(|p| query.matches(p)).collect();
    feed.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then(b.id().cmp(&a.id()))
    });
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::micropost::{MicropostId, NewMicropost};
    use chrono::{Duration, Utc};

    fn post(id: i64, owner: i64, age_minutes: i64) -> Micropost {
        Micropost::from_parts(
            MicropostId::new(id),
            UserId::new(owner),
            format!("post {id}"),
            None,
            Utc::now() - Duration::minutes(age_minutes),
        )
    }

    #[test]
    fn test_feed_selects_self_and_followees_only() {
        let query = FeedQuery::for_user(UserId::new(1), [UserId::new(2), UserId::new(3)]);
        let posts = vec![
            post(1, 1, 40),
            post(2, 2, 30),
            post(3, 3, 20),
            post(4, 4, 10),
        ];

        let feed = compose(&query, posts);

        let owners: Vec<i64> = feed.iter().map(|p| p.user_id().value()).collect();
        assert_eq!(feed.len(), 3);
        assert!(!owners.contains(&4));
    }

    #[test]
    fn test_feed_ordered_newest_first() {
        let query = FeedQuery::for_user(UserId::new(1), [UserId::new(2)]);
        let posts = vec![post(1, 1, 30), post(2, 2, 10), post(3, 1, 20)];

        let feed = compose(&query, posts);

        let ids: Vec<i64> = feed.iter().map(|p| p.id().value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_feed_tiebreak_on_id() {
        let now = Utc::now();
        let query = FeedQuery::for_user(UserId::new(1), []);
        let a = Micropost::from_parts(MicropostId::new(1), UserId::new(1), "a".into(), None, now);
        let b = Micropost::from_parts(MicropostId::new(2), UserId::new(1), "b".into(), None, now);

        let feed = compose(&query, vec![a, b]);

        let ids: Vec<i64> = feed.iter().map(|p| p.id().value()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_feed_with_no_followees_is_own_posts() {
        let query = FeedQuery::for_user(UserId::new(1), []);
        let posts = vec![post(1, 1, 10), post(2, 2, 5)];

        let feed = compose(&query, posts);

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].user_id().value(), 1);
    }

    #[test]
    fn test_feed_is_restartable() {
        let query = FeedQuery::for_user(UserId::new(1), [UserId::new(2)]);
        let posts = vec![post(1, 1, 10), post(2, 2, 5)];

        let first = compose(&query, posts.clone());
        let second = compose(&query, posts);

        assert_eq!(first, second);
    }
}
