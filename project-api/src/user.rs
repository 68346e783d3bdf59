use serde_json::Value;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{CourseId, UserId};
use crate::urls::{USERS_API, api_url, resource_url};

// User payloads are interpreted by the host, so they are handed back as JSON.
impl<T: Transport> ProjectApi<T> {
    pub fn get_user_details(&self, user_id: UserId) -> Result<Value> {
        self.get(api_url(self.address(), &format!("{USERS_API}/{user_id}"))?)
    }

    pub fn get_user_preferences(&self, user_id: UserId) -> Result<Value> {
        self.get(resource_url(self.address(), USERS_API, user_id, "preferences")?)
    }

    pub fn get_user_grades(&self, user_id: UserId, course_id: &CourseId) -> Result<Value> {
        let rest = format!("courses/{course_id}/grades");
        self.get(resource_url(self.address(), USERS_API, user_id, &rest)?)
    }
}
