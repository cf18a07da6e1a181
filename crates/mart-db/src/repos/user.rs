//! User repository: registration, credentials, balance, project lists.

use chrono::Utc;

use mart_core::entities::{NewUser, User};
use mart_core::enums::Collection;
use mart_core::ids::PREFIX_USER;
use mart_core::responses::WriteStatus;
use mart_core::validation::check_amount;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_datetime, parse_json, to_json};
use crate::repos::rejected;
use crate::service::MartService;

const USER_COLUMNS: &str = "id, email, first_name, last_name, institution, balance, payment, \
     projects, participated_projects, is_active, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        email: row.get::<String>(1)?,
        first_name: row.get::<String>(2)?,
        last_name: row.get::<String>(3)?,
        institution: row.get::<String>(4)?,
        balance: row.get::<f64>(5)?,
        payment: parse_json(&row.get::<String>(6)?)?,
        projects: parse_json(&row.get::<String>(7)?)?,
        participated_projects: parse_json(&row.get::<String>(8)?)?,
        is_active: get_flag(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// Which per-user project list to append to.
#[derive(Debug, Clone, Copy)]
enum ProjectList {
    Owned,
    Participated,
}

impl ProjectList {
    const fn column(self) -> &'static str {
        match self {
            Self::Owned => "projects",
            Self::Participated => "participated_projects",
        }
    }
}

impl MartService {
    pub async fn insert_user(&self, user: &NewUser) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = user.validate() {
            return Ok(rejected(Collection::Users, e.to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_USER).await?;

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO users (id, email, password, first_name, last_name, institution,
                    balance, payment, projects, participated_projects, is_active, created_at,
                    updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                 ON CONFLICT(email) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    user.email.as_str(),
                    user.password.as_str(),
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    user.institution.as_str(),
                    user.balance,
                    to_json(&user.payment)?,
                    to_json(&user.projects)?,
                    to_json(&user.participated_projects)?,
                    user.is_active,
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;

        if inserted == 0 {
            return Ok(rejected(
                Collection::Users,
                format!("email '{}' is already registered", user.email),
            ));
        }

        tracing::debug!(%id, email = %user.email, "user inserted");
        Ok(WriteStatus::Success)
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Resolve a user ID from credentials. `None` for an unknown email or a
    /// wrong password.
    pub async fn get_user_id(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id FROM users WHERE email = ?1 AND password = ?2",
                libsql::params![email, password],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// Returns whether a user was removed.
    pub async fn delete_user_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM users WHERE email = ?1", [email])
            .await?;
        tracing::debug!(email, deleted, "delete user");
        Ok(deleted > 0)
    }

    pub async fn increase_balance(
        &self,
        email: &str,
        amount: f64,
    ) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = check_amount("amount", amount) {
            return Ok(rejected(Collection::Users, e.to_string()));
        }

        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET balance = balance + ?1, updated_at = ?2 WHERE email = ?3",
                libsql::params![amount, Utc::now().to_rfc3339(), email],
            )
            .await?;

        if updated == 0 {
            return Ok(rejected(Collection::Users, format!("no user '{email}'")));
        }
        tracing::debug!(email, amount, "balance increased");
        Ok(WriteStatus::Success)
    }

    /// Debit a user. Never takes the balance below zero.
    pub async fn decrease_balance(
        &self,
        email: &str,
        amount: f64,
    ) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = check_amount("amount", amount) {
            return Ok(rejected(Collection::Users, e.to_string()));
        }

        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE users SET balance = balance - ?1, updated_at = ?2
                 WHERE email = ?3 AND balance >= ?1",
                libsql::params![amount, Utc::now().to_rfc3339(), email],
            )
            .await?;

        if updated == 0 {
            let reason = match self.get_user(email).await? {
                Some(user) => format!(
                    "insufficient balance for '{email}': {} < {amount}",
                    user.balance
                ),
                None => format!("no user '{email}'"),
            };
            return Ok(rejected(Collection::Users, reason));
        }
        tracing::debug!(email, amount, "balance decreased");
        Ok(WriteStatus::Success)
    }

    /// Record a project title in the user's owned list. Idempotent.
    pub async fn add_owned_project(
        &self,
        email: &str,
        title: &str,
    ) -> Result<WriteStatus, DatabaseError> {
        self.append_project(ProjectList::Owned, email, title).await
    }

    /// Record a project title in the user's participated list. Idempotent.
    pub async fn add_participated_project(
        &self,
        email: &str,
        title: &str,
    ) -> Result<WriteStatus, DatabaseError> {
        self.append_project(ProjectList::Participated, email, title)
            .await
    }

    async fn append_project(
        &self,
        list: ProjectList,
        email: &str,
        title: &str,
    ) -> Result<WriteStatus, DatabaseError> {
        let column = list.column();
        let updated = self
            .db()
            .conn()
            .execute(
                &format!(
                    "UPDATE users SET {column} = json_insert({column}, '$[#]', ?1), updated_at = ?2
                     WHERE email = ?3
                       AND NOT EXISTS (SELECT 1 FROM json_each(users.{column}) WHERE value = ?1)"
                ),
                libsql::params![title, Utc::now().to_rfc3339(), email],
            )
            .await?;

        if updated == 0 && self.get_user(email).await?.is_none() {
            return Ok(rejected(Collection::Users, format!("no user '{email}'")));
        }
        Ok(WriteStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{new_user, test_service};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[tokio::test]
    async fn insert_then_get_returns_record() {
        let svc = test_service().await;
        let input = new_user("john_doe@gmail.com");

        let status = svc.insert_user(&input).await.unwrap();
        assert_eq!(status, WriteStatus::Success);

        let user = svc.get_user("john_doe@gmail.com").await.unwrap().unwrap();
        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.email, input.email);
        assert_eq!(user.full_name(), "John Doe");
        assert_eq!(user.institution, input.institution);
        assert_eq!(user.balance, 100.0);
        assert_eq!(user.payment, input.payment);
        assert_eq!(user.projects, input.projects);
        assert_eq!(user.participated_projects, input.participated_projects);
        assert!(user.is_active);

        let by_id = svc.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);
    }

    #[tokio::test]
    async fn duplicate_email_is_failure() {
        let svc = test_service().await;
        let input = new_user("dup@example.com");

        assert!(svc.insert_user(&input).await.unwrap().is_success());
        let second = svc.insert_user(&input).await.unwrap();
        assert!(!second.is_success());
        assert!(second.reason().unwrap().contains("already registered"));
        assert_eq!(svc.list_users(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_failure() {
        let svc = test_service().await;
        let input = NewUser {
            balance: f64::NAN,
            ..new_user("nan@example.com")
        };
        assert!(!svc.insert_user(&input).await.unwrap().is_success());
        assert!(svc.get_user("nan@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_user_id_checks_password() {
        let svc = test_service().await;
        svc.insert_user(&new_user("cred@example.com")).await.unwrap();

        let id = svc
            .get_user_id("cred@example.com", "password123")
            .await
            .unwrap();
        assert!(id.is_some_and(|id| id.starts_with("usr-")));

        let wrong = svc.get_user_id("cred@example.com", "nope").await.unwrap();
        assert!(wrong.is_none());
        let unknown = svc.get_user_id("ghost@example.com", "password123").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn delete_then_get_is_absent() {
        let svc = test_service().await;
        svc.insert_user(&new_user("gone@example.com")).await.unwrap();

        assert!(svc.delete_user_by_email("gone@example.com").await.unwrap());
        assert!(svc.get_user("gone@example.com").await.unwrap().is_none());
        assert!(!svc.delete_user_by_email("gone@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn increase_balance_is_visible() {
        let svc = test_service().await;
        svc.insert_user(&new_user("rich@example.com")).await.unwrap();

        let status = svc.increase_balance("rich@example.com", 1000.0).await.unwrap();
        assert!(status.is_success());

        let user = svc.get_user("rich@example.com").await.unwrap().unwrap();
        assert_eq!(user.balance, 1100.0);
    }

    #[tokio::test]
    async fn decrease_balance_stops_at_zero() {
        let svc = test_service().await;
        svc.insert_user(&new_user("poor@example.com")).await.unwrap();

        let status = svc.decrease_balance("poor@example.com", 40.0).await.unwrap();
        assert!(status.is_success());
        let status = svc.decrease_balance("poor@example.com", 60.01).await.unwrap();
        assert!(status.reason().unwrap().contains("insufficient"));

        let user = svc.get_user("poor@example.com").await.unwrap().unwrap();
        assert_eq!(user.balance, 60.0);

        let status = svc.decrease_balance("poor@example.com", 60.0).await.unwrap();
        assert!(status.is_success());
        let user = svc.get_user("poor@example.com").await.unwrap().unwrap();
        assert_eq!(user.balance, 0.0);
    }

    #[tokio::test]
    async fn balance_change_for_unknown_user_fails() {
        let svc = test_service().await;
        let up = svc.increase_balance("ghost@example.com", 1.0).await.unwrap();
        let down = svc.decrease_balance("ghost@example.com", 1.0).await.unwrap();
        assert!(up.reason().unwrap().contains("no user"));
        assert!(down.reason().unwrap().contains("no user"));
    }

    #[rstest]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[tokio::test]
    async fn rejects_bad_amounts(#[case] amount: f64) {
        let svc = test_service().await;
        svc.insert_user(&new_user("amt@example.com")).await.unwrap();

        let status = svc.increase_balance("amt@example.com", amount).await.unwrap();
        assert!(!status.is_success());
        let status = svc.decrease_balance("amt@example.com", amount).await.unwrap();
        assert!(!status.is_success());

        let user = svc.get_user("amt@example.com").await.unwrap().unwrap();
        assert_eq!(user.balance, 100.0);
    }

    #[tokio::test]
    async fn add_participated_project_is_idempotent() {
        let svc = test_service().await;
        svc.insert_user(&new_user("joiner@example.com")).await.unwrap();

        for _ in 0..2 {
            let status = svc
                .add_participated_project("joiner@example.com", "Project 9")
                .await
                .unwrap();
            assert!(status.is_success());
        }

        let user = svc.get_user("joiner@example.com").await.unwrap().unwrap();
        assert_eq!(user.participated_projects, vec!["Project 3", "Project 9"]);
    }

    #[tokio::test]
    async fn add_owned_project_for_unknown_user_fails() {
        let svc = test_service().await;
        let status = svc
            .add_owned_project("ghost@example.com", "Project 1")
            .await
            .unwrap();
        assert!(!status.is_success());
    }

    #[tokio::test]
    async fn list_users_respects_limit() {
        let svc = test_service().await;
        for i in 0..3 {
            svc.insert_user(&new_user(&format!("u{i}@example.com")))
                .await
                .unwrap();
        }
        assert_eq!(svc.list_users(2).await.unwrap().len(), 2);
        assert_eq!(svc.list_users(10).await.unwrap().len(), 3);
    }
}
