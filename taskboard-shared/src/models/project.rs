/// Project model
///
/// A project is owned by exactly one user (the creator) and is never
/// hard-deleted. Its status toggles freely between `active` and `archived`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'archived');
///
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL CHECK (length(name) > 0),
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users(id),
///     status project_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, UserId};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,

    pub name: String,

    pub description: Option<String>,

    /// The single user who created the project
    ///
    /// Ownership is never mirrored into `project_members`.
    pub owner_id: UserId,

    pub status: ProjectStatus,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub status: ProjectStatus,
}

/// Input for updating an existing project
///
/// All fields are optional. Only `Some` fields are written; for
/// `description`, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies the update to an in-memory project
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: 1,
            name: "P1".to_string(),
            description: Some("first".to_string()),
            owner_id: 10,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_status_default_is_active() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(ProjectStatus::Archived.as_str(), "archived");
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let json = serde_json::to_value(project()).unwrap();
        assert_eq!(json["ownerId"], 10);
        assert_eq!(json["status"], "active");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut p = project();
        UpdateProject {
            status: Some(ProjectStatus::Archived),
            ..Default::default()
        }
        .apply_to(&mut p);

        assert_eq!(p.name, "P1");
        assert_eq!(p.description.as_deref(), Some("first"));
        assert_eq!(p.status, ProjectStatus::Archived);

        UpdateProject {
            description: Some(None),
            ..Default::default()
        }
        .apply_to(&mut p);
        assert!(p.description.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateProject::default().is_empty());
        assert!(!UpdateProject {
            name: Some("x".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
