//! Identifier newtypes
//!
//! Every persisted entity is keyed by a 64-bit integer. Wrapping each key in
//! its own type keeps a project id from being passed where a user id is
//! expected. All of them serialize as bare integers and map to `BIGINT`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Identity of a user account (the JWT `sub` claim)
    UserId
);
id_newtype!(
    /// Project identifier
    ProjectId
);
id_newtype!(
    /// Task identifier
    TaskId
);
id_newtype!(
    /// Notification identifier
    NotificationId
);
