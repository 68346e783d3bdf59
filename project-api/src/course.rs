use serde::Serialize;
use serde_json::Value;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{ContentId, CourseId, UserId};
use crate::urls::{COURSES_API, resource_url, with_query};

#[derive(Debug, Serialize)]
struct CompletionData<'a> {
    content_id: &'a ContentId,
    user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'a str>,
}

impl<T: Transport> ProjectApi<T> {
    /// Records that the user completed the content, or one stage of it.
    pub fn mark_as_complete(
        &self,
        course_id: &CourseId,
        content_id: &ContentId,
        user_id: UserId,
        stage: Option<&str>,
    ) -> Result<Value> {
        let completion_data = CompletionData {
            content_id,
            user_id,
            stage,
        };
        let url = resource_url(self.address(), COURSES_API, course_id, "completions/")?;
        self.post(url, &completion_data)
    }

    pub fn get_user_roles_for_course(&self, user_id: UserId, course_id: &CourseId) -> Result<Value> {
        let url = resource_url(self.address(), COURSES_API, course_id, "roles/")?;
        let user_id = user_id.to_string();
        self.get(with_query(url, &[("user_id", user_id.as_str())]))
    }
}
