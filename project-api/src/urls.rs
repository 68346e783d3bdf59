use std::fmt::Display;

use itertools::Itertools;
use url::Url;

use crate::error::{ApiError, Result};

pub const WORKGROUP_API: &str = "api/server/workgroups";
pub const PEER_REVIEW_API: &str = "api/server/peer_reviews";
pub const WORKGROUP_REVIEW_API: &str = "api/server/workgroup_reviews";
pub const USERS_API: &str = "api/server/users";
pub const SUBMISSION_API: &str = "api/server/submissions";
pub const GROUP_API: &str = "api/server/groups";
pub const COURSES_API: &str = "api/server/courses";

/// `{address}/{path}`, with the path taken literally (including any trailing slash).
pub fn api_url(address: &Url, path: &str) -> Result<Url> {
    let url = format!("{}/{path}", address.as_str().trim_end_matches('/'));
    parse_url(&url)
}

/// `{address}/{api}/{id}/{rest}`
pub fn resource_url(address: &Url, api: &str, id: impl Display, rest: &str) -> Result<Url> {
    api_url(address, &format!("{api}/{id}/{rest}"))
}

/// Appends a query string with keys in sorted order.
pub fn with_query(mut url: Url, params: &[(&str, &str)]) -> Url {
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().sorted_by_key(|(key, _)| *key));
    }
    url
}

pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| ApiError::InvalidAddress {
        address: url.to_owned(),
        source,
    })
}
