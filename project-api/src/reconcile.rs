//! Bringing the stored answers for one review scope in line with what the reviewer submitted.
//!
//! For every submitted question the stored record is created, updated or deleted so that
//! afterwards a non-empty answer is stored verbatim and an empty answer has no record at all.
//! Questions the reviewer did not submit are left alone. Each action is its own request, so a
//! failure part way through leaves earlier actions applied; submitting the same answers again
//! converges.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::client::ProjectApi;
use crate::error::Result;
use crate::review::{NewReviewItem, ReviewItem, ReviewKind, ReviewScope};
use crate::transport::Transport;
use crate::types::{ContentId, RecordId, ReviewerId, UserId, WorkgroupId};

/// Question to answer, as submitted by the reviewer.
pub type DesiredAnswers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    Create(NewReviewItem),
    Update(ReviewItem),
    Delete(RecordId),
}

/// What one reconciliation did, counted per submitted question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Questions that needed no request: the stored answer already matched, or the answer
    /// was empty and no record existed.
    pub unchanged: usize,
}

impl SyncReport {
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Indexes records by question. Later records replace earlier ones with the same question.
pub fn index_by_question(current: Vec<ReviewItem>) -> HashMap<String, ReviewItem> {
    current.into_iter().fold(HashMap::new(), |mut index, item| {
        index.insert(item.question().to_owned(), item);
        index
    })
}

/// Decides the actions that take `current` to `desired`. Questions needing no change produce
/// no action.
pub fn plan(
    scope: &ReviewScope,
    current: Vec<ReviewItem>,
    desired: &DesiredAnswers,
) -> Vec<SyncAction> {
    let mut current = index_by_question(current);

    desired
        .iter()
        .filter_map(|(question, answer)| match current.remove(question) {
            Some(stored) if stored.answer() == Some(answer.as_str()) => None,
            Some(stored) if answer.is_empty() => Some(SyncAction::Delete(stored.id())),
            Some(stored) => Some(SyncAction::Update(stored.with_answer(answer.clone()))),
            None if answer.is_empty() => None,
            None => Some(SyncAction::Create(
                scope.new_item(question.clone(), answer.clone()),
            )),
        })
        .collect()
}

impl<T: Transport> ProjectApi<T> {
    /// Makes the stored answers in `scope` match `desired`, stopping at the first failed
    /// request.
    #[tracing::instrument(skip(self, desired), fields(questions = desired.len()), err)]
    pub fn reconcile(&self, scope: &ReviewScope, desired: &DesiredAnswers) -> Result<SyncReport> {
        let kind = scope.kind();
        let current = self.review_items(scope)?;
        let actions = plan(scope, current, desired);

        let mut report = SyncReport {
            unchanged: desired.len() - actions.len(),
            ..SyncReport::default()
        };

        for action in actions {
            self.apply(kind, action, &mut report)?;
        }

        info!(?report, "review items submitted");
        Ok(report)
    }

    fn apply(&self, kind: ReviewKind, action: SyncAction, report: &mut SyncReport) -> Result<()> {
        match action {
            SyncAction::Create(item) => {
                debug!(question = %item.question, "creating review item");
                self.create_review_item(kind, &item)?;
                report.created += 1;
            }
            SyncAction::Update(item) => {
                debug!(id = %item.id(), question = item.question(), "updating review item");
                self.update_review_item(kind, &item)?;
                report.updated += 1;
            }
            SyncAction::Delete(id) => {
                debug!(%id, "deleting review item");
                self.delete_review_item(kind, id)?;
                report.deleted += 1;
            }
        }
        Ok(())
    }

    pub fn submit_peer_review_items(
        &self,
        reviewer_id: &ReviewerId,
        peer_id: UserId,
        group_id: WorkgroupId,
        content_id: &ContentId,
        data: &DesiredAnswers,
    ) -> Result<SyncReport> {
        let scope = ReviewScope::peer(reviewer_id.clone(), peer_id, group_id, content_id.clone());
        self.reconcile(&scope, data)
    }

    pub fn submit_workgroup_review_items(
        &self,
        reviewer_id: &ReviewerId,
        group_id: WorkgroupId,
        content_id: &ContentId,
        data: &DesiredAnswers,
    ) -> Result<SyncReport> {
        let scope = ReviewScope::workgroup(reviewer_id.clone(), group_id, content_id.clone());
        self.reconcile(&scope, data)
    }
}
