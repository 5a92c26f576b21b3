use std::collections::HashMap;

use anyhow::{Context, Result};
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_types::{Bool, Nullable, Text};
use diesel_migrations::{FileBasedMigrations, MigrationHarness};

pub mod annotations;
pub mod models;
pub mod schema;
pub mod settings;

pub use annotations::KeywordSaveOutcome;

use crate::error::StoreError;

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

pub struct PostgresRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
    migrations: FileBasedMigrations,
}

impl PostgresRepository {
    pub fn new(database_url: &str, migrations_dir: &str) -> Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::new(manager).context("failed creating connection pool")?;
        let migrations = FileBasedMigrations::from_path(migrations_dir)
            .map_err(|e| anyhow::anyhow!("invalid migrations directory: {e}"))?;
        Ok(Self { pool, migrations })
    }

    pub fn any_pending_migrations(&self) -> Result<bool> {
        let mut conn = self.pool.get()?;
        conn.has_pending_migration(self.migrations.clone())
            .map_err(|e| anyhow::anyhow!("failed checking pending migrations: {e}"))
    }

    pub fn run_pending_migrations(&self) -> Result<()> {
        let mut conn = self.pool.get()?;
        conn.run_pending_migrations(self.migrations.clone())
            .map_err(|e| anyhow::anyhow!("failed running pending migrations: {e}"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> Result<PgPooled, StoreError> {
        Ok(self.pool.get()?)
    }
}

/// Predicates of one list query, already resolved against the master
/// tables. `None` fields are inactive conditions.
#[derive(Debug, Default)]
pub(crate) struct CveIdConditions {
    pub v3_codes: Option<Vec<String>>,
    pub v2_codes: Option<Vec<String>>,
    pub year: Option<i32>,
    pub text_query: Option<String>,
    pub label_filter: Option<(i32, Vec<i32>)>,
}

type BoxedCveCondition<'a> =
    Box<dyn BoxableExpression<schema::cve::table, Pg, SqlType = Nullable<Bool>> + 'a>;

/// Build the WHERE clause shared by the count and the page query, as one
/// condition tree. The label predicate in particular must stay a single
/// expression over (user, label set): chaining two independent filters
/// against the one-to-many label relation lets each filter match a
/// different row.
fn cve_id_condition(c: &CveIdConditions) -> BoxedCveCondition<'_> {
    use schema::{cve, cve_full_text_search, user_cve_label};

    let mut cond: BoxedCveCondition = Box::new(sql::<Nullable<Bool>>("TRUE"));

    // A record qualifies through whichever severity scale classifies it,
    // so the two scales are OR'd when the floor resolves in both.
    cond = match (&c.v3_codes, &c.v2_codes) {
        (Some(v3), Some(v2)) => Box::new(cond.and(
            cve::cvss3_severity
                .eq_any(v3)
                .or(cve::cvss2_severity.eq_any(v2)),
        )),
        (Some(v3), None) => Box::new(cond.and(cve::cvss3_severity.eq_any(v3))),
        (None, Some(v2)) => Box::new(cond.and(cve::cvss2_severity.eq_any(v2))),
        (None, None) => cond,
    };

    if let Some(year) = c.year {
        cond = Box::new(cond.and(cve::cve_year.ge(year).nullable()));
    }

    if let Some(query) = &c.text_query {
        let matching = cve_full_text_search::table
            .filter(
                sql::<Bool>("to_tsvector('english', cve_text_for_search) @@ to_tsquery('english', ")
                    .bind::<Text, _>(query)
                    .sql(")"),
            )
            .select(cve_full_text_search::cve_id);
        cond = Box::new(cond.and(cve::cve_id.eq_any(matching).nullable()));
    }

    if let Some((user_id, labels)) = &c.label_filter {
        let labelled = user_cve_label::table
            .filter(
                user_cve_label::user_id
                    .eq(*user_id)
                    .and(user_cve_label::cve_label_id.eq_any(labels)),
            )
            .select(user_cve_label::cve_id);
        cond = Box::new(cond.and(cve::cve_id.eq_any(labelled).nullable()));
    }

    cond
}

impl PostgresRepository {
    /// Severity codes of the v3 scale whose level is at or above the level
    /// of `code`, or `None` when the scale does not know `code` at all.
    pub(crate) fn cvss3_codes_at_or_above(
        &self,
        code: &str,
    ) -> Result<Option<Vec<String>>, StoreError> {
        use schema::cvss3;

        let mut conn = self.conn()?;

        let floor = cvss3::table
            .filter(cvss3::cvss3_severity_code.eq(code))
            .select(cvss3::cvss3_severity_level)
            .first::<i32>(&mut conn)
            .optional()?;

        let Some(floor) = floor else {
            return Ok(None);
        };

        let codes = cvss3::table
            .filter(cvss3::cvss3_severity_level.ge(floor))
            .select(cvss3::cvss3_severity_code)
            .load::<String>(&mut conn)?;

        Ok(Some(codes))
    }

    pub(crate) fn cvss2_codes_at_or_above(
        &self,
        code: &str,
    ) -> Result<Option<Vec<String>>, StoreError> {
        use schema::cvss2;

        let mut conn = self.conn()?;

        let floor = cvss2::table
            .filter(cvss2::cvss2_severity_code.eq(code))
            .select(cvss2::cvss2_severity_level)
            .first::<i32>(&mut conn)
            .optional()?;

        let Some(floor) = floor else {
            return Ok(None);
        };

        let codes = cvss2::table
            .filter(cvss2::cvss2_severity_level.ge(floor))
            .select(cvss2::cvss2_severity_code)
            .load::<String>(&mut conn)?;

        Ok(Some(codes))
    }

    /// Size of the filtered identifier set, before pagination.
    pub(crate) fn count_filtered_cve_ids(&self, c: &CveIdConditions) -> Result<i64, StoreError> {
        use schema::cve;

        let mut conn = self.conn()?;
        let total = cve::table
            .filter(cve_id_condition(c))
            .count()
            .get_result::<i64>(&mut conn)?;
        Ok(total)
    }

    /// One page of filtered identifiers, newest CVE numbers first. The
    /// identifier format zero-pads the sequence, so descending string
    /// order is descending (year, number) order.
    pub(crate) fn page_of_filtered_cve_ids(
        &self,
        c: &CveIdConditions,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<String>, StoreError> {
        use schema::cve;

        let mut conn = self.conn()?;
        let ids = cve::table
            .filter(cve_id_condition(c))
            .select(cve::cve_id)
            .order(cve::cve_id.desc())
            .offset(offset)
            .limit(limit)
            .load::<String>(&mut conn)?;
        Ok(ids)
    }

    pub(crate) fn cve_page_records(
        &self,
        ids: &[String],
    ) -> Result<Vec<models::CvePageRow>, StoreError> {
        use schema::cve;

        let mut conn = self.conn()?;
        let rows = cve::table
            .filter(cve::cve_id.eq_any(ids))
            .select((
                cve::cve_id,
                cve::cve_url,
                cve::nvd_url,
                cve::nvd_content_exists,
                cve::cve_description,
                cve::cvss3_score,
                cve::cvss3_severity,
                cve::cvss2_score,
                cve::cvss2_severity,
                cve::published_date,
            ))
            .order(cve::cve_id.desc())
            .load::<models::CvePageRow>(&mut conn)?;
        Ok(rows)
    }

    pub fn find_cve(&self, cve_id: &str) -> Result<Option<models::Cve>, StoreError> {
        use schema::cve;

        let mut conn = self.conn()?;
        let found = cve::table
            .filter(cve::cve_id.eq(cve_id))
            .first::<models::Cve>(&mut conn)
            .optional()?;
        Ok(found)
    }

    pub(crate) fn user_labels_for(
        &self,
        user_id: i32,
        cve_ids: &[String],
    ) -> Result<HashMap<String, i32>, StoreError> {
        use schema::user_cve_label;

        let mut conn = self.conn()?;
        let rows = user_cve_label::table
            .filter(
                user_cve_label::user_id
                    .eq(user_id)
                    .and(user_cve_label::cve_id.eq_any(cve_ids)),
            )
            .select((user_cve_label::cve_id, user_cve_label::cve_label_id))
            .load::<(String, i32)>(&mut conn)?;
        Ok(rows.into_iter().collect())
    }

    pub(crate) fn user_comments_for(
        &self,
        user_id: i32,
        cve_ids: &[String],
    ) -> Result<HashMap<String, String>, StoreError> {
        use schema::user_cve_comment;

        let mut conn = self.conn()?;
        let rows = user_cve_comment::table
            .filter(
                user_cve_comment::user_id
                    .eq(user_id)
                    .and(user_cve_comment::cve_id.eq_any(cve_ids)),
            )
            .select((user_cve_comment::cve_id, user_cve_comment::cve_comment))
            .load::<(String, String)>(&mut conn)?;
        Ok(rows.into_iter().collect())
    }

    /// The user's saved keywords, alphabetically.
    pub fn user_keywords(&self, user_id: i32) -> Result<Vec<String>, StoreError> {
        use schema::user_keyword;

        let mut conn = self.conn()?;
        let keywords = user_keyword::table
            .filter(user_keyword::user_id.eq(user_id))
            .select(user_keyword::keyword)
            .order(user_keyword::keyword.asc())
            .load::<String>(&mut conn)?;
        Ok(keywords)
    }
}
