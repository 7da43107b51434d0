use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::member::value_objects::Email;
use crate::domain::member::Member;
use crate::domain::repositories::{
    MemberDirectory, MembershipRepository, StoreError, TeamRepository, TeamStore, UnitOfWork,
};
use crate::domain::team::{FeedbackType, Membership, Team};

/// SQLSTATEs that mean "another transaction got there first"
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

const TEAM_COLUMNS: &str = r#"
    id, name, leader_id, start_date, end_date,
    feedback_type, version, created_at
"#;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) | Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    leader_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    feedback_type: FeedbackType,
    version: i64,
    created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team::from_persistence(
            r.id,
            r.name,
            r.leader_id,
            r.start_date,
            r.end_date,
            r.feedback_type,
            r.version,
            r.created_at,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    email: String,
}

impl From<MemberRow> for Member {
    fn from(r: MemberRow) -> Self {
        Member::new(r.id, r.name, Email::from_persistence(r.email))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    team_id: Uuid,
    member_id: Uuid,
    joined_at: DateTime<Utc>,
}

/// PostgreSQL implementation of `TeamStore`
///
/// Units of work are REPEATABLE READ transactions, so the membership count a
/// leave checks and the delete it performs see the same snapshot. Structural
/// reads bump `teams.version` in the statement that reads the row; a racing
/// transaction doing the same blocks on the row lock and then fails with a
/// serialization error, surfaced as `StoreError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgresStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TeamStore for PostgresStore {
    type Tx = PostgresTransaction;

    async fn begin(&self) -> Result<PostgresTransaction, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        Ok(PostgresTransaction { tx })
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {} FROM teams WHERE id = $1",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn list_teams_for_member(&self, member_id: Uuid) -> Result<Vec<Team>, StoreError> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT
                t.id, t.name, t.leader_id, t.start_date, t.end_date,
                t.feedback_type, t.version, t.created_at
            FROM teams t
            JOIN team_members tm ON tm.team_id = t.id
            WHERE tm.member_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn list_members_of_team(&self, team_id: Uuid) -> Result<Vec<Member>, StoreError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id, m.name, m.email
            FROM members m
            JOIN team_members tm ON tm.member_id = m.id
            WHERE tm.team_id = $1
            ORDER BY tm.joined_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }
}

/// Unit of work over a `PostgresStore`; rolls back when dropped
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MemberDirectory for PostgresTransaction {
    async fn find_member(&mut self, id: Uuid) -> Result<Option<Member>, StoreError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Member::from))
    }
}

#[async_trait]
impl TeamRepository for PostgresTransaction {
    async fn find_team(&mut self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {} FROM teams WHERE id = $1",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn find_team_for_structural_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Team>, StoreError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "UPDATE teams SET version = version + 1 WHERE id = $1 RETURNING {}",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn save_team(&mut self, team: &mut Team) -> Result<(), StoreError> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO teams (
                id, name, leader_id, start_date, end_date,
                feedback_type, version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                leader_id = EXCLUDED.leader_id,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                feedback_type = EXCLUDED.feedback_type,
                version = teams.version + 1
            WHERE teams.version = EXCLUDED.version
            RETURNING version
            "#,
        )
        .bind(team.id())
        .bind(team.name())
        .bind(team.leader_id())
        .bind(team.start_date())
        .bind(team.end_date())
        .bind(team.feedback_type())
        .bind(team.version())
        .bind(team.created_at())
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| {
            StoreError::Conflict(format!(
                "stale write to team {} at version {}",
                team.id(),
                team.version()
            ))
        })?;

        team.set_version(version);
        Ok(())
    }

    async fn delete_team(&mut self, id: Uuid) -> Result<(), StoreError> {
        // team_members rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("team {} is already gone", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for PostgresTransaction {
    async fn find_membership(
        &mut self,
        member_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT team_id, member_id, joined_at
            FROM team_members
            WHERE member_id = $1 AND team_id = $2
            "#,
        )
        .bind(member_id)
        .bind(team_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(|r| Membership::from_persistence(r.team_id, r.member_id, r.joined_at)))
    }

    async fn save_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, member_id, joined_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(membership.team_id())
        .bind(membership.member_id())
        .bind(membership.joined_at())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn delete_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM team_members
            WHERE team_id = $1 AND member_id = $2
            "#,
        )
        .bind(membership.team_id())
        .bind(membership.member_id())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "membership of {} in team {} is already gone",
                membership.member_id(),
                membership.team_id()
            )));
        }

        Ok(())
    }

    async fn count_active_members(&mut self, team_id: Uuid) -> Result<u64, StoreError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&mut *self.tx)
                .await?;

        u64::try_from(count)
            .map_err(|_| StoreError::Corrupt(format!("negative member count {}", count)))
    }
}

#[async_trait]
impl UnitOfWork for PostgresTransaction {
    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
