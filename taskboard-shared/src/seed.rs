/// Demo data for fresh installations
///
/// Creates user `demo` (password `demo123`), a "Demo Project" and one task
/// in each kanban column. Seeding is skipped when the `demo` user exists, so
/// it is safe to run on every startup.

use tracing::{debug, info};

use crate::models::TaskStatus;
use crate::services::{NewTask, ServiceResult, Services};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_PROJECT_NAME: &str = "Demo Project";

const DEMO_TASKS: [(&str, &str, TaskStatus); 3] = [
    (
        "Welcome to your new task manager",
        "This is a sample task. Move it to another column to change its status.",
        TaskStatus::Todo,
    ),
    (
        "In Progress Task",
        "This task is currently being worked on.",
        TaskStatus::InProgress,
    ),
    ("Completed Task", "This task is done.", TaskStatus::Done),
];

/// Seeds demo data; returns `false` when it was already present
pub async fn seed_demo_data(services: &Services) -> ServiceResult<bool> {
    if services
        .store()
        .find_user_by_username(DEMO_USERNAME)
        .await?
        .is_some()
    {
        debug!("Demo data already present, skipping seed");
        return Ok(false);
    }

    info!("Seeding demo data");

    let demo = services.users.register(DEMO_USERNAME, DEMO_PASSWORD).await?;
    let project = services
        .projects
        .create(
            demo.id,
            DEMO_PROJECT_NAME,
            Some("A sample project to get you started".to_string()),
        )
        .await?;

    for (title, description, status) in DEMO_TASKS {
        services
            .tasks
            .create(
                demo.id,
                project.id,
                NewTask {
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    status: Some(status),
                    assignee_id: Some(demo.id),
                },
            )
            .await?;
    }

    info!(user_id = demo.id, project_id = project.id, "Demo data seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory::MemoryStore, Store};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_once() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let services = Services::new(store);

        assert!(seed_demo_data(&services).await.unwrap());
        assert!(!seed_demo_data(&services).await.unwrap());

        let demo = services.users.authenticate(DEMO_USERNAME, DEMO_PASSWORD).await.unwrap();
        let projects = services.projects.list_for_user(demo.id).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, DEMO_PROJECT_NAME);

        let tasks = services.tasks.list(demo.id, projects[0].id).await.unwrap();
        let statuses: Vec<_> = tasks.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
        );
        assert!(tasks.iter().all(|t| t.assignee_id == Some(demo.id)));
    }
}
