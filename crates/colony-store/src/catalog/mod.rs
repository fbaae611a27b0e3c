//! Catalog - Agent definitions and role bindings
//!
//! All listings apply the same visibility rule as [`crate::model::is_visible_to`]:
//! global, owned, public or bound to the user's role.

mod defaults;

#[cfg(test)]
mod tests;

pub use defaults::{DefaultAgent, DEFAULT_AGENTS};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::helpers::{format_timestamp, row_to_agent};
use crate::model::{AgentDefinition, AgentPatch, AgentWithRoles, NewAgent, User};
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const MAX_NAME_CHARS: usize = 255;
const MAX_DESCRIPTION_CHARS: usize = 500;

const AGENT_COLUMNS: &str = "a.id, a.owner_id, a.name, a.description, a.icon, a.instruction, \
     a.category, a.is_system, a.is_public, a.is_global, a.created_at, a.updated_at";

/// Agent catalog backed by SQLite
#[derive(Clone)]
pub struct AgentCatalog {
    db: Database,
}

impl AgentCatalog {
    /// Create a catalog over an open database
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Agents visible to `user`, oldest first
    #[instrument(skip(self, user), fields(user_id = %user.id, role = %user.role))]
    pub async fn list_visible(&self, user: &User) -> Result<Vec<AgentDefinition>> {
        let sql = format!(
            r#"
            SELECT {AGENT_COLUMNS}
            FROM agents a
            WHERE a.is_global = 1
               OR a.owner_id = ?
               OR a.is_public = 1
               OR EXISTS (
                   SELECT 1 FROM agent_role_bindings b
                   WHERE b.agent_id = a.id AND b.role_name = ?
               )
            ORDER BY a.created_at ASC, a.rowid ASC
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&user.id)
            .bind(&user.role)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let agents = rows
            .into_iter()
            .map(row_to_agent)
            .collect::<Result<Vec<_>>>()?;
        debug!("{} agents visible", agents.len());
        Ok(agents)
    }

    /// Every agent with its role bindings (admins only)
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn list_all(&self, actor: &User) -> Result<Vec<AgentWithRoles>> {
        if !actor.is_admin {
            return Err(Error::Unauthorized(
                "only administrators can list every agent".to_string(),
            ));
        }

        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents a ORDER BY a.created_at ASC, a.rowid ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let agent = row_to_agent(row)?;
            let roles = self.roles_for(agent.id).await?;
            out.push(AgentWithRoles { agent, roles });
        }
        Ok(out)
    }

    /// Look up an agent, `None` when absent
    #[instrument(skip(self))]
    pub async fn find(&self, id: Uuid) -> Result<Option<AgentDefinition>> {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents a WHERE a.id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(row_to_agent).transpose()
    }

    /// Get an agent by ID
    pub async fn get(&self, id: Uuid) -> Result<AgentDefinition> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("agent {id}")))
    }

    /// Role labels bound to an agent, sorted
    pub async fn roles_for(&self, agent_id: Uuid) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT role_name FROM agent_role_bindings WHERE agent_id = ? ORDER BY role_name",
        )
        .bind(agent_id.to_string())
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Create an agent owned by `actor`.
    ///
    /// The system/global flags and role bindings are honoured for admins only;
    /// for everyone else they are forced off.
    #[instrument(skip(self, input, actor), fields(name = %input.name, actor = %actor.id))]
    pub async fn create(&self, mut input: NewAgent, actor: &User) -> Result<AgentWithRoles> {
        validate_fields(
            &input.name,
            &input.description,
            &input.instruction,
            &input.category,
        )?;

        let roles = if actor.is_admin {
            clean_roles(std::mem::take(&mut input.assigned_roles))
        } else {
            Vec::new()
        };
        let is_system = actor.is_admin && input.is_system;
        let is_global = actor.is_admin && input.is_global;
        let is_public = input.is_public;
        let mut agent = owned_definition(input, actor);
        agent.is_system = is_system;
        agent.is_public = is_public;
        agent.is_global = is_global;

        let mut tx = self.begin().await?;
        insert_agent(&mut tx, &agent).await?;
        replace_roles(&mut tx, agent.id, &roles).await?;
        commit(tx).await?;

        info!(agent_id = %agent.id, "Created agent {}", agent.name);
        Ok(AgentWithRoles { agent, roles })
    }

    /// Create a private agent owned by `owner` from model output.
    ///
    /// Only a non-blank name is required; the form limits of [`Self::create`]
    /// do not apply. Visibility flags and role bindings in `input` are ignored.
    #[instrument(skip(self, input, owner), fields(name = %input.name, owner = %owner.id))]
    pub async fn create_private(&self, input: NewAgent, owner: &User) -> Result<AgentDefinition> {
        if input.name.trim().is_empty() {
            return Err(Error::Validation("name is required".to_string()));
        }

        let agent = owned_definition(input, owner);
        let mut tx = self.begin().await?;
        insert_agent(&mut tx, &agent).await?;
        commit(tx).await?;

        debug!(agent_id = %agent.id, "Created private agent {}", agent.name);
        Ok(agent)
    }

    /// Apply a patch as `actor` (owner or admin).
    ///
    /// Admin-only fields in a non-admin patch are ignored. A role update
    /// replaces the whole binding set.
    #[instrument(skip(self, patch, actor), fields(actor = %actor.id))]
    pub async fn update(&self, id: Uuid, patch: AgentPatch, actor: &User) -> Result<AgentWithRoles> {
        let admin_fields = patch.has_admin_fields();
        let mut agent = self.get(id).await?;
        if !actor.can_manage(agent.owner_id.as_deref()) {
            return Err(Error::Unauthorized(format!(
                "user {} cannot modify agent {id}",
                actor.id
            )));
        }

        if let Some(name) = patch.name {
            agent.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            agent.description = description;
        }
        if let Some(icon) = patch.icon {
            agent.icon = icon;
        }
        if let Some(instruction) = patch.instruction {
            agent.instruction = instruction;
        }
        if let Some(category) = patch.category {
            agent.category = category;
        }
        if let Some(is_public) = patch.is_public {
            agent.is_public = is_public;
        }

        let mut new_roles = None;
        if actor.is_admin {
            if let Some(is_system) = patch.is_system {
                agent.is_system = is_system;
            }
            if let Some(is_global) = patch.is_global {
                agent.is_global = is_global;
            }
            new_roles = patch.assigned_roles.map(clean_roles);
        } else if admin_fields {
            debug!("Ignoring admin-only fields in patch from {}", actor.id);
        }

        validate_fields(
            &agent.name,
            &agent.description,
            &agent.instruction,
            &agent.category,
        )?;
        agent.updated_at = Utc::now();

        let mut tx = self.begin().await?;
        sqlx::query(
            r#"
            UPDATE agents
            SET name = ?, description = ?, icon = ?, instruction = ?, category = ?,
                is_system = ?, is_public = ?, is_global = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.icon)
        .bind(&agent.instruction)
        .bind(&agent.category)
        .bind(agent.is_system)
        .bind(agent.is_public)
        .bind(agent.is_global)
        .bind(format_timestamp(agent.updated_at))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        if let Some(roles) = &new_roles {
            replace_roles(&mut tx, id, roles).await?;
        }
        commit(tx).await?;

        debug!("Updated agent {}", id);
        let roles = match new_roles {
            Some(roles) => roles,
            None => self.roles_for(id).await?,
        };
        Ok(AgentWithRoles { agent, roles })
    }

    /// Delete an agent as `actor` (owner or admin).
    ///
    /// Threads that reference the agent are left alone.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, id: Uuid, actor: &User) -> Result<()> {
        let agent = self.get(id).await?;
        if !actor.can_manage(agent.owner_id.as_deref()) {
            return Err(Error::Unauthorized(format!(
                "user {} cannot delete agent {id}",
                actor.id
            )));
        }

        let mut tx = self.begin().await?;
        sqlx::query("DELETE FROM agent_role_bindings WHERE agent_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        commit(tx).await?;

        info!(agent_id = %id, "Deleted agent {}", agent.name);
        Ok(())
    }

    /// Insert the platform's default agents if they are missing.
    ///
    /// Returns how many were inserted.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut inserted = 0;
        for default in DEFAULT_AGENTS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM agents WHERE owner_id IS NULL AND is_system = 1 AND name = ?",
            )
            .bind(default.name)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
            if exists > 0 {
                continue;
            }

            let now = Utc::now();
            let agent = AgentDefinition {
                id: Uuid::new_v4(),
                owner_id: None,
                name: default.name.to_string(),
                description: default.description.to_string(),
                icon: default.icon.to_string(),
                instruction: default.instruction.to_string(),
                category: default.category.to_string(),
                is_system: true,
                is_public: false,
                is_global: true,
                created_at: now,
                updated_at: now,
            };
            let mut tx = self.begin().await?;
            insert_agent(&mut tx, &agent).await?;
            commit(tx).await?;
            inserted += 1;
        }

        if inserted > 0 {
            info!("Seeded {} default agents", inserted);
        }
        Ok(inserted)
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.db
            .pool()
            .begin()
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> Result<()> {
    tx.commit()
        .await
        .map_err(|e| Error::Database(e.to_string()))
}

async fn insert_agent(tx: &mut Transaction<'static, Sqlite>, agent: &AgentDefinition) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO agents (
            id, owner_id, name, description, icon, instruction, category,
            is_system, is_public, is_global, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(agent.id.to_string())
    .bind(&agent.owner_id)
    .bind(&agent.name)
    .bind(&agent.description)
    .bind(&agent.icon)
    .bind(&agent.instruction)
    .bind(&agent.category)
    .bind(agent.is_system)
    .bind(agent.is_public)
    .bind(agent.is_global)
    .bind(format_timestamp(agent.created_at))
    .bind(format_timestamp(agent.updated_at))
    .execute(&mut **tx)
    .await
    .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

async fn replace_roles(
    tx: &mut Transaction<'static, Sqlite>,
    agent_id: Uuid,
    roles: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM agent_role_bindings WHERE agent_id = ?")
        .bind(agent_id.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    for role in roles {
        sqlx::query("INSERT OR IGNORE INTO agent_role_bindings (agent_id, role_name) VALUES (?, ?)")
            .bind(agent_id.to_string())
            .bind(role)
            .execute(&mut **tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
    }
    Ok(())
}

/// A fresh private definition owned by `owner`
fn owned_definition(input: NewAgent, owner: &User) -> AgentDefinition {
    let now = Utc::now();
    AgentDefinition {
        id: Uuid::new_v4(),
        owner_id: Some(owner.id.clone()),
        name: input.name.trim().to_string(),
        description: input.description,
        icon: input.icon,
        instruction: input.instruction,
        category: input.category,
        is_system: false,
        is_public: false,
        is_global: false,
        created_at: now,
        updated_at: now,
    }
}

fn clean_roles(roles: Vec<String>) -> Vec<String> {
    let mut roles: Vec<String> = roles
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    roles.sort();
    roles.dedup();
    roles
}

fn validate_fields(name: &str, description: &str, instruction: &str, category: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(Error::Validation(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(Error::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    if instruction.trim().is_empty() {
        return Err(Error::Validation("instruction is required".to_string()));
    }
    if category.trim().is_empty() {
        return Err(Error::Validation("category is required".to_string()));
    }
    Ok(())
}
