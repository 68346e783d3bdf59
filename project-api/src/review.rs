use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{ContentId, Extra, RecordId, ReviewerId, UserId, WorkgroupId};
use crate::urls::{PEER_REVIEW_API, WORKGROUP_API, WORKGROUP_REVIEW_API, api_url, resource_url, with_query};

/// One answer to one review question, as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    id: RecordId,
    question: String,
    /// `None` when the server holds `null` or omits the field.
    #[serde(default)]
    answer: Option<String>,
    workgroup: WorkgroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserId>,
    reviewer: ReviewerId,
    content_id: ContentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
    #[serde(flatten)]
    extra: Extra,
}

impl ReviewItem {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn workgroup(&self) -> WorkgroupId {
        self.workgroup
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn reviewer(&self) -> &ReviewerId {
        &self.reviewer
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }

    /// The record to PUT back: new answer, server-assigned timestamps dropped.
    pub fn with_answer(mut self, answer: String) -> Self {
        self.answer = Some(answer);
        self.created = None;
        self.modified = None;
        self
    }
}

/// Body for creating a review record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReviewItem {
    pub question: String,
    pub answer: String,
    pub workgroup: WorkgroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    pub reviewer: ReviewerId,
    pub content_id: ContentId,
}

/// Which review collection a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewKind {
    /// A student reviewing one of their teammates.
    Peer,
    /// A student reviewing another workgroup as a whole.
    Workgroup,
}

impl ReviewKind {
    fn api(self) -> &'static str {
        match self {
            Self::Peer => PEER_REVIEW_API,
            Self::Workgroup => WORKGROUP_REVIEW_API,
        }
    }

    fn group_listing(self) -> &'static str {
        match self {
            Self::Peer => "peer_reviews/",
            Self::Workgroup => "workgroup_reviews/",
        }
    }
}

/// The records one reviewer has written about one subject for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewScope {
    reviewer: ReviewerId,
    workgroup: WorkgroupId,
    content: ContentId,
    peer: Option<UserId>,
}

impl ReviewScope {
    pub fn peer(
        reviewer: ReviewerId,
        peer: UserId,
        workgroup: WorkgroupId,
        content: ContentId,
    ) -> Self {
        Self {
            reviewer,
            workgroup,
            content,
            peer: Some(peer),
        }
    }

    pub fn workgroup(reviewer: ReviewerId, workgroup: WorkgroupId, content: ContentId) -> Self {
        Self {
            reviewer,
            workgroup,
            content,
            peer: None,
        }
    }

    pub fn kind(&self) -> ReviewKind {
        match self.peer {
            Some(_) => ReviewKind::Peer,
            None => ReviewKind::Workgroup,
        }
    }

    pub fn reviewer(&self) -> &ReviewerId {
        &self.reviewer
    }

    pub fn workgroup_id(&self) -> WorkgroupId {
        self.workgroup
    }

    pub fn content(&self) -> &ContentId {
        &self.content
    }

    pub fn peer_id(&self) -> Option<UserId> {
        self.peer
    }

    /// Whether a record fetched for this scope's workgroup and content belongs to it. Peer
    /// reviews are matched on reviewer and reviewed user; workgroup reviews on reviewer and
    /// content.
    pub fn contains(&self, item: &ReviewItem) -> bool {
        item.reviewer == self.reviewer
            && match self.peer {
                Some(peer) => item.user == Some(peer),
                None => item.content_id == self.content,
            }
    }

    pub fn new_item(&self, question: String, answer: String) -> NewReviewItem {
        NewReviewItem {
            question,
            answer,
            workgroup: self.workgroup,
            user: self.peer,
            reviewer: self.reviewer.clone(),
            content_id: self.content.clone(),
        }
    }
}

impl<T: Transport> ProjectApi<T> {
    pub fn review_items_for_group(
        &self,
        kind: ReviewKind,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        let url = resource_url(self.address(), WORKGROUP_API, group_id, kind.group_listing())?;
        let url = with_query(url, &[("content_id", content_id.as_str())]);
        self.get(url)
    }

    pub fn create_review_item(&self, kind: ReviewKind, item: &NewReviewItem) -> Result<ReviewItem> {
        let url = api_url(self.address(), &format!("{}/", kind.api()))?;
        self.post(url, item)
    }

    pub fn update_review_item(&self, kind: ReviewKind, item: &ReviewItem) -> Result<ReviewItem> {
        let url = resource_url(self.address(), kind.api(), item.id(), "")?;
        self.put(url, item)
    }

    pub fn delete_review_item(&self, kind: ReviewKind, id: RecordId) -> Result<()> {
        let url = resource_url(self.address(), kind.api(), id, "")?;
        self.delete(url)
    }

    /// Records in the scope, in server order.
    pub fn review_items(&self, scope: &ReviewScope) -> Result<Vec<ReviewItem>> {
        let items = self
            .review_items_for_group(scope.kind(), scope.workgroup_id(), scope.content())?
            .into_iter()
            .filter(|item| scope.contains(item))
            .collect::<Vec<_>>();
        debug!(?scope, count = items.len(), "fetched review items");
        Ok(items)
    }

    pub fn get_peer_review_items_for_group(
        &self,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        self.review_items_for_group(ReviewKind::Peer, group_id, content_id)
    }

    pub fn update_peer_review_assessment(&self, item: &ReviewItem) -> Result<ReviewItem> {
        self.update_review_item(ReviewKind::Peer, item)
    }

    pub fn create_peer_review_assessment(&self, item: &NewReviewItem) -> Result<ReviewItem> {
        self.create_review_item(ReviewKind::Peer, item)
    }

    pub fn delete_peer_review_assessment(&self, id: RecordId) -> Result<()> {
        self.delete_review_item(ReviewKind::Peer, id)
    }

    pub fn get_workgroup_review_items_for_group(
        &self,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        self.review_items_for_group(ReviewKind::Workgroup, group_id, content_id)
    }

    pub fn update_workgroup_review_assessment(&self, item: &ReviewItem) -> Result<ReviewItem> {
        self.update_review_item(ReviewKind::Workgroup, item)
    }

    pub fn create_workgroup_review_assessment(&self, item: &NewReviewItem) -> Result<ReviewItem> {
        self.create_review_item(ReviewKind::Workgroup, item)
    }

    pub fn delete_workgroup_review_assessment(&self, id: RecordId) -> Result<()> {
        self.delete_review_item(ReviewKind::Workgroup, id)
    }

    /// What `reviewer` wrote about `peer`.
    pub fn get_peer_review_items(
        &self,
        reviewer_id: &ReviewerId,
        peer_id: UserId,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        let scope = ReviewScope::peer(reviewer_id.clone(), peer_id, group_id, content_id.clone());
        self.review_items(&scope)
    }

    /// What every reviewer wrote about `user`.
    pub fn get_user_peer_review_items(
        &self,
        user_id: UserId,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        let items = self
            .get_peer_review_items_for_group(group_id, content_id)?
            .into_iter()
            .filter(|item| item.user() == Some(user_id))
            .collect();
        Ok(items)
    }

    pub fn get_workgroup_review_items(
        &self,
        reviewer_id: &ReviewerId,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<ReviewItem>> {
        let scope = ReviewScope::workgroup(reviewer_id.clone(), group_id, content_id.clone());
        self.review_items(&scope)
    }
}
