use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{ContentId, CourseId, Extra, GroupId, ListEnvelope, UserId};
use crate::urls::{GROUP_API, USERS_API, resource_url, with_query};
use crate::workgroup::Workgroup;

pub const REVIEW_ASSIGNMENT_TYPE: &str = "reviewassignment";

/// A platform group. Review assignments are groups whose `data.xblock_id` names the activity
/// being reviewed and whose workgroups are the ones to review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAssignmentGroup {
    id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default)]
    data: GroupData,
    #[serde(flatten)]
    extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xblock_id: Option<ContentId>,
    #[serde(flatten)]
    extra: Extra,
}

impl ReviewAssignmentGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn xblock_id(&self) -> Option<&ContentId> {
        self.data.xblock_id.as_ref()
    }

    pub fn data(&self) -> &GroupData {
        &self.data
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }
}

impl GroupData {
    pub fn extra(&self) -> &Extra {
        &self.extra
    }
}

#[derive(Debug, Deserialize)]
struct GroupList {
    groups: Vec<ReviewAssignmentGroup>,
}

impl<T: Transport> ProjectApi<T> {
    pub fn get_review_assignment_groups(
        &self,
        user_id: UserId,
        course_id: &CourseId,
        xblock_id: &ContentId,
    ) -> Result<Vec<ReviewAssignmentGroup>> {
        let url = resource_url(self.address(), USERS_API, user_id, "groups/")?;
        let url = with_query(
            url,
            &[
                ("course", course_id.as_str()),
                ("type", REVIEW_ASSIGNMENT_TYPE),
                ("data__xblock_id", xblock_id.as_str()),
            ],
        );
        let list: GroupList = self.get(url)?;
        Ok(list.groups)
    }

    pub fn get_workgroups_for_assignment(&self, assignment_id: GroupId) -> Result<Vec<Workgroup>> {
        let url = resource_url(self.address(), GROUP_API, assignment_id, "workgroups")?;
        let workgroups: ListEnvelope<Workgroup> = self.get(url)?;
        Ok(workgroups.results)
    }

    pub fn get_group_detail(&self, group_id: GroupId) -> Result<ReviewAssignmentGroup> {
        self.get(resource_url(self.address(), GROUP_API, group_id, "")?)
    }

    /// Every workgroup the user was assigned to review for the activity, across all of their
    /// review assignments, in assignment order.
    #[tracing::instrument(skip(self), err)]
    pub fn get_workgroups_to_review(
        &self,
        user_id: UserId,
        course_id: &CourseId,
        xblock_id: &ContentId,
    ) -> Result<Vec<Workgroup>> {
        let assignments = self.get_review_assignment_groups(user_id, course_id, xblock_id)?;
        debug!(count = assignments.len(), "found review assignments");

        let mut workgroups = Vec::new();
        for assignment in &assignments {
            workgroups.extend(self.get_workgroups_for_assignment(assignment.id())?);
        }
        Ok(workgroups)
    }
}
