//! Shared fixtures for mart-db unit tests.

pub(crate) mod helpers {
    use chrono::{Duration, Utc};
    use mart_core::entities::{NewProject, NewUser, Payment};
    use mart_core::enums::ProjectType;

    use crate::service::MartService;

    /// Create an in-memory `MartService`.
    pub async fn test_service() -> MartService {
        MartService::new_local(":memory:").await.unwrap()
    }

    pub fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: email.into(),
            password: "password123".into(),
            institution: "University of Toronto".into(),
            projects: vec!["Project 1".into(), "Project 2".into()],
            participated_projects: vec!["Project 3".into()],
            balance: 100.0,
            payment: Payment {
                method: "bitcoin".into(),
                amount: 50.0,
            },
            is_active: true,
        }
    }

    pub fn new_project(title: &str, owner: &str) -> NewProject {
        let start = Utc::now();
        NewProject {
            title: title.into(),
            description: "This is a fake project".into(),
            owner: owner.into(),
            members: vec!["Member 1".into(), "Member 2".into()],
            participants: vec!["Participant 1".into()],
            is_active: true,
            start_date: start,
            end_date: start + Duration::days(30),
            budget: 0.0,
            salary: 10.0,
            project_type: ProjectType::Public,
        }
    }
}
