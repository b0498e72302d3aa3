//! Access Policy Module
//!
//! Every project-scoped action asks `AccessPolicy` whether the caller holds at
//! least a given role in the project. Roles are ordered `Member < Admin`;
//! owner-only actions pass `ProjectRole::Admin` explicitly.
//!
//! - **`policy`** - `ProjectRole`, `ProjectMembership`, `AccessPolicy`
//! - **`db`** - membership queries for `PgStore`
//! - **`handlers`** - `GET /api/v1/projects/{project_id}/membership`

pub mod db;
pub mod handlers;
pub mod policy;

pub use policy::{AccessPolicy, ProjectMembership, ProjectRole};
