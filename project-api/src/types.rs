//! Identifier newtypes shared across resources. The server is not consistent about sending
//! numeric ids as numbers or as strings, so the numeric ones accept both.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// Fields the client does not interpret, kept so they survive a round trip to the server.
pub type Extra = Map<String, Value>;

macro_rules! int_ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[serde_as]
            #[derive(
                Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name {
                #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
                id: u64,
            }

            impl $name {
                pub const fn new(id: u64) -> Self {
                    Self { id }
                }

                pub const fn get(self) -> u64 {
                    self.id
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self::new(id)
                }
            }

            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self::new)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    self.id.fmt(f)
                }
            }
        )+
    };
}

macro_rules! string_ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name {
                id: String,
            }

            impl $name {
                pub fn new(id: impl Into<String>) -> Self {
                    Self { id: id.into() }
                }

                pub fn as_str(&self) -> &str {
                    &self.id
                }
            }

            impl From<&str> for $name {
                fn from(id: &str) -> Self {
                    Self::new(id)
                }
            }

            impl From<String> for $name {
                fn from(id: String) -> Self {
                    Self::new(id)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    self.id.fmt(f)
                }
            }
        )+
    };
}

int_ids! {
    UserId,
    WorkgroupId,
    /// Id of a single review record (peer or workgroup review).
    RecordId,
    /// Id of a platform group, e.g. a review assignment.
    GroupId,
}

string_ids! {
    /// The reviewer as the review service knows them (an anonymous student id).
    ReviewerId,
    CourseId,
    /// Usage id of the content (activity) a review or completion is about.
    ContentId,
    DocumentId,
}

/// `{count, results}` wrapper used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
