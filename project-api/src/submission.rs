use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::client::ProjectApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{DocumentId, Extra, WorkgroupId};
use crate::urls::{SUBMISSION_API, WORKGROUP_API, api_url, resource_url};

pub const MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An uploaded project document. Re-uploads share a `document_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
    #[serde(flatten)]
    extra: Extra,
}

impl Submission {
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    /// When the submission was last modified. Missing or unparsable timestamps sort before
    /// every real one.
    pub fn modified_at(&self) -> NaiveDateTime {
        self.modified
            .as_deref()
            .map(parse_modified)
            .unwrap_or(NaiveDateTime::MIN)
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }
}

pub fn parse_modified(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, MODIFIED_FORMAT).unwrap_or_else(|err| {
        warn!(value, %err, "unparsable submission timestamp");
        NaiveDateTime::MIN
    })
}

/// Keeps the most recently modified submission for each document. On equal timestamps the
/// submission seen first wins.
pub fn latest_by_document_id(
    submissions: impl IntoIterator<Item = Submission>,
) -> HashMap<DocumentId, Submission> {
    let mut latest = HashMap::new();
    for submission in submissions {
        match latest.entry(submission.document_id.clone()) {
            Entry::Occupied(mut entry) => {
                let kept: &Submission = entry.get();
                if submission.modified_at() > kept.modified_at() {
                    entry.insert(submission);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(submission);
            }
        }
    }
    latest
}

impl<T: Transport> ProjectApi<T> {
    pub fn create_submission(&self, submission: &impl Serialize) -> Result<Value> {
        let url = api_url(self.address(), &format!("{SUBMISSION_API}/"))?;
        self.post(url, submission)
    }

    pub fn get_workgroup_submissions(&self, group_id: WorkgroupId) -> Result<Vec<Submission>> {
        self.get(resource_url(self.address(), WORKGROUP_API, group_id, "submissions/")?)
    }

    pub fn get_latest_workgroup_submissions_by_id(
        &self,
        group_id: WorkgroupId,
    ) -> Result<HashMap<DocumentId, Submission>> {
        let submissions = self.get_workgroup_submissions(group_id)?;
        Ok(latest_by_document_id(submissions))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn submission(document_id: &str, modified: &str, location: &str) -> Submission {
        serde_json::from_value(json!({
            "document_id": document_id,
            "modified": modified,
            "document_url": location,
        }))
        .unwrap()
    }

    fn location(submission: &Submission) -> &Value {
        &submission.extra()["document_url"]
    }

    #[test]
    fn later_modification_wins_in_either_order() {
        let older = submission("doc", "2015-03-01T10:00:00Z", "old");
        let newer = submission("doc", "2015-03-02T09:00:00Z", "new");

        let latest = latest_by_document_id([older.clone(), newer.clone()]);
        assert_eq!(location(&latest[&DocumentId::new("doc")]), "new");

        let latest = latest_by_document_id([newer, older]);
        assert_eq!(location(&latest[&DocumentId::new("doc")]), "new");
    }

    #[test]
    fn unparsable_timestamp_never_wins() {
        let good = submission("doc", "2015-03-01T10:00:00Z", "good");
        let bad = submission("doc", "yesterday-ish", "bad");

        let latest = latest_by_document_id([good.clone(), bad.clone()]);
        assert_eq!(location(&latest[&DocumentId::new("doc")]), "good");

        let latest = latest_by_document_id([bad, good]);
        assert_eq!(location(&latest[&DocumentId::new("doc")]), "good");
    }

    #[test]
    fn ties_keep_the_first_seen() {
        let first = submission("doc", "bad", "first");
        let second = submission("doc", "also bad", "second");
        let latest = latest_by_document_id([first, second]);
        assert_eq!(location(&latest[&DocumentId::new("doc")]), "first");
    }

    #[test]
    fn documents_are_kept_separately() {
        let latest = latest_by_document_id([
            submission("a", "2015-03-01T10:00:00Z", "a"),
            submission("b", "2015-03-01T10:00:00Z", "b"),
        ]);
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn timestamp_format_is_strict() {
        assert_eq!(parse_modified("2015-03-01T10:00:00.123Z"), NaiveDateTime::MIN);
        assert!(parse_modified("2015-03-01T10:00:00Z") > NaiveDateTime::MIN);
    }
}
