use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::group::ReviewAssignmentGroup;
use crate::transport::Transport;
use crate::types::{ContentId, CourseId, Extra, ListEnvelope, UserId, WorkgroupId};
use crate::urls::{USERS_API, WORKGROUP_API, parse_url, resource_url, with_query};

/// A project team. Only the id is interpreted; everything else is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workgroup {
    id: WorkgroupId,
    #[serde(flatten)]
    extra: Extra,
}

impl Workgroup {
    pub fn id(&self) -> WorkgroupId {
        self.id
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WorkgroupRef {
    id: WorkgroupId,
}

#[derive(Debug, Serialize)]
struct GradeData<'a> {
    course_id: &'a CourseId,
    content_id: &'a ContentId,
    grade: f64,
    max_grade: f64,
}

#[derive(Debug, Deserialize)]
struct ReviewerList {
    users: Vec<Value>,
}

impl<T: Transport> ProjectApi<T> {
    pub fn get_workgroup_by_id(&self, group_id: WorkgroupId) -> Result<Workgroup> {
        self.get(resource_url(self.address(), WORKGROUP_API, group_id, "")?)
    }

    /// The user's workgroup in the course, if they have one.
    #[tracing::instrument(skip(self), err)]
    pub fn get_user_workgroup_for_course(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<Option<Workgroup>> {
        let url = resource_url(self.address(), USERS_API, user_id, "workgroups/")?;
        let url = with_query(url, &[("course_id", course_id.as_str())]);
        let workgroups: ListEnvelope<WorkgroupRef> = self.get(url)?;

        match workgroups.results.first() {
            Some(workgroup) if workgroups.count >= 1 => {
                self.get_workgroup_by_id(workgroup.id).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn set_group_grade(
        &self,
        group_id: WorkgroupId,
        course_id: &CourseId,
        activity_id: &ContentId,
        grade_value: f64,
        max_grade: f64,
    ) -> Result<Value> {
        let grade_data = GradeData {
            course_id,
            content_id: activity_id,
            grade: grade_value,
            max_grade,
        };
        let url = resource_url(self.address(), WORKGROUP_API, group_id, "grades/")?;
        self.post(url, &grade_data)
    }

    /// Users assigned to review the workgroup for the given content.
    #[tracing::instrument(skip(self), err)]
    pub fn get_workgroup_reviewers(
        &self,
        group_id: WorkgroupId,
        content_id: &ContentId,
    ) -> Result<Vec<Value>> {
        let url = resource_url(self.address(), WORKGROUP_API, group_id, "groups")?;
        let assignments: Vec<ReviewAssignmentGroup> = self.get(url)?;

        let mut reviewers = Vec::new();
        for assignment in assignments
            .iter()
            .filter(|assignment| assignment.xblock_id() == Some(content_id))
        {
            let Some(group_url) = assignment.url() else {
                debug!(id = %assignment.id(), "review assignment has no url");
                continue;
            };
            let users_url = parse_url(&format!("{group_url}users/"))?;
            let list: ReviewerList = self.get(users_url)?;
            reviewers.extend(list.users);
        }

        Ok(reviewers)
    }
}
