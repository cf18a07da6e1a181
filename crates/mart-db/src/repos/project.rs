//! Project repository: CRUD keyed by `(title, owner)`, funds, participants.

use chrono::Utc;

use mart_core::entities::{NewProject, Project};
use mart_core::enums::{Collection, ProjectType};
use mart_core::ids::PREFIX_PROJECT;
use mart_core::responses::WriteStatus;
use mart_core::validation::check_amount;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_datetime, parse_enum, parse_json, to_json};
use crate::repos::rejected;
use crate::service::MartService;

const PROJECT_COLUMNS: &str = "id, title, owner, description, members, participants, is_active, \
     start_date, end_date, budget, salary, project_type, created_at, updated_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        owner: row.get::<String>(2)?,
        description: row.get::<String>(3)?,
        members: parse_json(&row.get::<String>(4)?)?,
        participants: parse_json(&row.get::<String>(5)?)?,
        is_active: get_flag(row, 6)?,
        start_date: parse_datetime(&row.get::<String>(7)?)?,
        end_date: parse_datetime(&row.get::<String>(8)?)?,
        budget: row.get::<f64>(9)?,
        salary: row.get::<f64>(10)?,
        project_type: parse_enum(&row.get::<String>(11)?)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

impl MartService {
    pub async fn insert_project(&self, project: &NewProject) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = project.validate() {
            return Ok(rejected(Collection::Projects, e.to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO projects (id, title, owner, description, members, participants,
                    is_active, start_date, end_date, budget, salary, project_type, created_at,
                    updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 ON CONFLICT(title, owner) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    project.title.as_str(),
                    project.owner.as_str(),
                    project.description.as_str(),
                    to_json(&project.members)?,
                    to_json(&project.participants)?,
                    project.is_active,
                    project.start_date.to_rfc3339(),
                    project.end_date.to_rfc3339(),
                    project.budget,
                    project.salary,
                    project.project_type.as_str(),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;

        if inserted == 0 {
            return Ok(rejected(
                Collection::Projects,
                format!(
                    "project '{}' already exists for owner '{}'",
                    project.title, project.owner
                ),
            ));
        }

        tracing::debug!(%id, title = %project.title, owner = %project.owner, "project inserted");
        Ok(WriteStatus::Success)
    }

    pub async fn get_project(
        &self,
        title: &str,
        owner: &str,
    ) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE title = ?1 AND owner = ?2"),
                libsql::params![title, owner],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_project_by_id(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_project_id(
        &self,
        title: &str,
        owner: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id FROM projects WHERE title = ?1 AND owner = ?2",
                libsql::params![title, owner],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    pub async fn list_projects_by_owner(
        &self,
        owner: &str,
        limit: u32,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner = ?1
                     ORDER BY created_at, title LIMIT {limit}"
                ),
                [owner],
            )
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    /// Returns whether a project was removed.
    pub async fn delete_project(&self, title: &str, owner: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM projects WHERE title = ?1 AND owner = ?2",
                libsql::params![title, owner],
            )
            .await?;
        tracing::debug!(title, owner, deleted, "delete project");
        Ok(deleted > 0)
    }

    pub async fn add_fund_to_project(
        &self,
        title: &str,
        owner: &str,
        amount: f64,
    ) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = check_amount("amount", amount) {
            return Ok(rejected(Collection::Projects, e.to_string()));
        }

        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE projects SET budget = budget + ?1, updated_at = ?2
                 WHERE title = ?3 AND owner = ?4",
                libsql::params![amount, Utc::now().to_rfc3339(), title, owner],
            )
            .await?;

        if updated == 0 {
            return Ok(rejected(Collection::Projects, no_project(title, owner)));
        }
        tracing::debug!(title, owner, amount, "project funded");
        Ok(WriteStatus::Success)
    }

    /// Take funds out of the budget. Never takes the budget below zero.
    pub async fn withdraw_fund_from_project(
        &self,
        title: &str,
        owner: &str,
        amount: f64,
    ) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = check_amount("amount", amount) {
            return Ok(rejected(Collection::Projects, e.to_string()));
        }

        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE projects SET budget = budget - ?1, updated_at = ?2
                 WHERE title = ?3 AND owner = ?4 AND budget >= ?1",
                libsql::params![amount, Utc::now().to_rfc3339(), title, owner],
            )
            .await?;

        if updated == 0 {
            let reason = match self.get_project(title, owner).await? {
                Some(project) => format!(
                    "insufficient budget for '{title}': {} < {amount}",
                    project.budget
                ),
                None => no_project(title, owner),
            };
            return Ok(rejected(Collection::Projects, reason));
        }
        tracing::debug!(title, owner, amount, "project budget withdrawn");
        Ok(WriteStatus::Success)
    }

    /// Add a participant to an active project. Joining twice is a no-op.
    ///
    /// Private projects only admit users already listed as members.
    pub async fn join_project(
        &self,
        title: &str,
        owner: &str,
        participant: &str,
    ) -> Result<WriteStatus, DatabaseError> {
        let Some(project) = self.get_project(title, owner).await? else {
            return Ok(rejected(Collection::Projects, no_project(title, owner)));
        };
        if !project.is_active {
            return Ok(rejected(
                Collection::Projects,
                format!("project '{title}' is not active"),
            ));
        }
        if project.project_type == ProjectType::Private
            && !project.members.iter().any(|m| m == participant)
        {
            return Ok(rejected(
                Collection::Projects,
                format!("project '{title}' is private and '{participant}' is not a member"),
            ));
        }
        if project.participants.iter().any(|p| p == participant) {
            return Ok(WriteStatus::Success);
        }

        self.db()
            .conn()
            .execute(
                "UPDATE projects
                 SET participants = json_insert(participants, '$[#]', ?1), updated_at = ?2
                 WHERE id = ?3
                   AND NOT EXISTS (
                       SELECT 1 FROM json_each(projects.participants) WHERE value = ?1
                   )",
                libsql::params![participant, Utc::now().to_rfc3339(), project.id.as_str()],
            )
            .await?;

        tracing::debug!(title, owner, participant, "participant joined");
        Ok(WriteStatus::Success)
    }

    pub async fn set_project_active(
        &self,
        title: &str,
        owner: &str,
        active: bool,
    ) -> Result<WriteStatus, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE projects SET is_active = ?1, updated_at = ?2
                 WHERE title = ?3 AND owner = ?4",
                libsql::params![active, Utc::now().to_rfc3339(), title, owner],
            )
            .await?;

        if updated == 0 {
            return Ok(rejected(Collection::Projects, no_project(title, owner)));
        }
        Ok(WriteStatus::Success)
    }
}

fn no_project(title: &str, owner: &str) -> String {
    format!("no project '{title}' owned by '{owner}'")
}
