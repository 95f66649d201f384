//! Project persistence.
//!
//! One flat `projects` table in SQLite, one record per hackathon project.
//! Fields are plain strings, integers and JSON blobs supplied by the caller;
//! there is no validation beyond presence and no versioning. Last writer
//! wins on concurrent updates.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Error from project store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("stored JSON is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// One persisted project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub idea: String,
    pub duration: String,
    pub num_people: i64,
    pub specification: String,
    pub selected_framework: String,
    pub directory_info: String,
    /// Freeform member list, stored as JSON.
    pub member_info: serde_json::Value,
    /// Freeform task list, stored as JSON.
    pub task_info: serde_json::Value,
    pub env_handson: String,
}

/// Fields of a project creation request (id is assigned by the store).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub idea: String,
    pub duration: String,
    pub num_people: i64,
    pub specification: String,
    pub selected_framework: String,
    pub directory_info: String,
    #[serde(default)]
    pub member_info: serde_json::Value,
    #[serde(default)]
    pub task_info: serde_json::Value,
    #[serde(default)]
    pub env_handson: String,
}

/// Partial update: only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub idea: Option<String>,
    pub duration: Option<String>,
    pub num_people: Option<i64>,
    pub specification: Option<String>,
    pub selected_framework: Option<String>,
    pub directory_info: Option<String>,
    pub member_info: Option<serde_json::Value>,
    pub task_info: Option<serde_json::Value>,
    pub env_handson: Option<String>,
}

/// Summary row for project listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub idea: String,
}

/// SQLite-backed project store.
///
/// The connection lives behind an async mutex: every request is one short
/// unit of work, no multi-statement transactions span services.
pub struct ProjectStore {
    conn: Mutex<Connection>,
}

impl ProjectStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS projects (
                project_id TEXT PRIMARY KEY,
                idea TEXT NOT NULL,
                duration TEXT NOT NULL,
                num_people INTEGER NOT NULL,
                specification TEXT NOT NULL,
                selected_framework TEXT NOT NULL,
                directory_info TEXT NOT NULL,
                member_info TEXT NOT NULL DEFAULT 'null',
                task_info TEXT NOT NULL DEFAULT 'null',
                env_handson TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a new project and return its generated id.
    pub async fn create(&self, new: NewProject) -> Result<String, StoreError> {
        let project_id = Uuid::new_v4().to_string();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO projects (
                project_id, idea, duration, num_people, specification,
                selected_framework, directory_info, member_info, task_info,
                env_handson, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                project_id,
                new.idea,
                new.duration,
                new.num_people,
                new.specification,
                new.selected_framework,
                new.directory_info,
                serde_json::to_string(&new.member_info)?,
                serde_json::to_string(&new.task_info)?,
                new.env_handson,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(project_id)
    }

    /// Fetch one project by id.
    pub async fn get(&self, project_id: &str) -> Result<Project, StoreError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT project_id, idea, duration, num_people, specification,
                        selected_framework, directory_info, member_info,
                        task_info, env_handson
                 FROM projects WHERE project_id = ?1",
                params![project_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                        row.get::<_, String>(9)?,
                    ))
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Err(StoreError::NotFound);
        };
        Ok(Project {
            project_id: row.0,
            idea: row.1,
            duration: row.2,
            num_people: row.3,
            specification: row.4,
            selected_framework: row.5,
            directory_info: row.6,
            member_info: serde_json::from_str(&row.7)?,
            task_info: serde_json::from_str(&row.8)?,
            env_handson: row.9,
        })
    }

    /// List all projects, newest first.
    pub async fn list(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT project_id, idea FROM projects ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProjectSummary {
                project_id: row.get(0)?,
                idea: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Apply a partial update. Only provided fields are written.
    pub async fn update(&self, project_id: &str, update: ProjectUpdate) -> Result<(), StoreError> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql + Send>> = Vec::new();

        let mut push = |column: &str, value: Box<dyn rusqlite::types::ToSql + Send>| {
            sets.push(format!("{} = ?{}", column, values.len() + 1));
            values.push(value);
        };

        if let Some(v) = update.idea {
            push("idea", Box::new(v));
        }
        if let Some(v) = update.duration {
            push("duration", Box::new(v));
        }
        if let Some(v) = update.num_people {
            push("num_people", Box::new(v));
        }
        if let Some(v) = update.specification {
            push("specification", Box::new(v));
        }
        if let Some(v) = update.selected_framework {
            push("selected_framework", Box::new(v));
        }
        if let Some(v) = update.directory_info {
            push("directory_info", Box::new(v));
        }
        if let Some(v) = update.member_info {
            push("member_info", Box::new(serde_json::to_string(&v)?));
        }
        if let Some(v) = update.task_info {
            push("task_info", Box::new(serde_json::to_string(&v)?));
        }
        if let Some(v) = update.env_handson {
            push("env_handson", Box::new(v));
        }

        if sets.is_empty() {
            // Nothing to write; still report missing ids.
            return self.get(project_id).await.map(|_| ());
        }

        let sql = format!(
            "UPDATE projects SET {} WHERE project_id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(project_id.to_string()));

        let conn = self.conn.lock().await;
        let changed = conn.execute(
            &sql,
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete a project.
    pub async fn delete(&self, project_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM projects WHERE project_id = ?1",
            params![project_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> NewProject {
        NewProject {
            idea: "recipe sharing app".to_string(),
            duration: "3 days".to_string(),
            num_people: 4,
            specification: "# Spec".to_string(),
            selected_framework: "Next / FastAPI".to_string(),
            directory_info: "project/".to_string(),
            member_info: serde_json::json!([{"name": "ami"}]),
            task_info: serde_json::json!([]),
            env_handson: String::new(),
        }
    }

    #[tokio::test]
    async fn create_get_roundtrip() {
        let store = ProjectStore::open_in_memory().unwrap();
        let id = store.create(sample_project()).await.unwrap();

        let project = store.get(&id).await.unwrap();
        assert_eq!(project.project_id, id);
        assert_eq!(project.idea, "recipe sharing app");
        assert_eq!(project.num_people, 4);
        assert_eq!(project.member_info[0]["name"], "ami");
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let store = ProjectStore::open_in_memory().unwrap();
        assert!(matches!(
            store.get("nope").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete("nope").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let store = ProjectStore::open_in_memory().unwrap();
        let id = store.create(sample_project()).await.unwrap();

        store
            .update(
                &id,
                ProjectUpdate {
                    specification: Some("# Revised".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let project = store.get(&id).await.unwrap();
        assert_eq!(project.specification, "# Revised");
        assert_eq!(project.idea, "recipe sharing app");
    }

    #[tokio::test]
    async fn empty_update_still_reports_missing_id() {
        let store = ProjectStore::open_in_memory().unwrap();
        assert!(matches!(
            store.update("nope", ProjectUpdate::default()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.db");

        let id = {
            let store = ProjectStore::open(&path).unwrap();
            store.create(sample_project()).await.unwrap()
        };

        let store = ProjectStore::open(&path).unwrap();
        let project = store.get(&id).await.unwrap();
        assert_eq!(project.idea, "recipe sharing app");
    }

    #[tokio::test]
    async fn list_and_delete() {
        let store = ProjectStore::open_in_memory().unwrap();
        let id = store.create(sample_project()).await.unwrap();
        let mut second = sample_project();
        second.idea = "plant watering bot".to_string();
        store.create(second).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);

        store.delete(&id).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].idea, "plant watering bot");
    }
}
