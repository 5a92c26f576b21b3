//! Per-user annotation write paths: labels, comments, keywords.

use diesel::dsl::exists;
use diesel::prelude::*;

use super::{models, schema, PostgresRepository};
use crate::error::StoreError;

pub const MAX_KEYWORDS_PER_USER: i64 = 50;

/// Saving a keyword the user already has is a success, but a different
/// one from creating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSaveOutcome {
    Created,
    AlreadyExists,
}

impl PostgresRepository {
    /// Assign `label_id` to (`user_id`, `cve_id`), replacing any previous
    /// assignment. Delete and insert run in one transaction so no reader
    /// ever observes zero or two assignments for the pair.
    pub fn save_user_cve_label(
        &self,
        user_id: i32,
        cve_id: &str,
        label_id: i32,
    ) -> Result<(), StoreError> {
        use schema::{cve, cve_label, user_cve_label};

        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let cve_exists: bool =
                diesel::select(exists(cve::table.filter(cve::cve_id.eq(cve_id))))
                    .get_result(conn)?;
            if !cve_exists {
                return Err(StoreError::NotFound(format!("cve.cve_id={cve_id}")));
            }

            let label_exists: bool = diesel::select(exists(
                cve_label::table.filter(cve_label::cve_label_id.eq(label_id)),
            ))
            .get_result(conn)?;
            if !label_exists {
                return Err(StoreError::NotFound(format!(
                    "cve_label.cve_label_id={label_id}"
                )));
            }

            diesel::delete(
                user_cve_label::table.filter(
                    user_cve_label::user_id
                        .eq(user_id)
                        .and(user_cve_label::cve_id.eq(cve_id)),
                ),
            )
            .execute(conn)?;

            diesel::insert_into(user_cve_label::table)
                .values(models::NewUserCveLabel::with(user_id, cve_id, label_id))
                .execute(conn)?;

            Ok(())
        })
    }

    pub fn delete_user_cve_label(&self, user_id: i32, cve_id: &str) -> Result<(), StoreError> {
        use schema::user_cve_label;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            user_cve_label::table.filter(
                user_cve_label::user_id
                    .eq(user_id)
                    .and(user_cve_label::cve_id.eq(cve_id)),
            ),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!("cve.cve_id={cve_id}")));
        }
        Ok(())
    }

    /// Upsert the comment for (`user_id`, `cve_id`): update in place when
    /// one exists, otherwise insert after checking the record is real.
    pub fn save_user_cve_comment(
        &self,
        user_id: i32,
        cve_id: &str,
        comment: &str,
    ) -> Result<(), StoreError> {
        use schema::{cve, user_cve_comment};

        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let updated = diesel::update(
                user_cve_comment::table.filter(
                    user_cve_comment::user_id
                        .eq(user_id)
                        .and(user_cve_comment::cve_id.eq(cve_id)),
                ),
            )
            .set((
                user_cve_comment::cve_comment.eq(comment),
                user_cve_comment::updated_at.eq(models::now()),
            ))
            .execute(conn)?;

            if updated > 0 {
                return Ok(());
            }

            let cve_exists: bool =
                diesel::select(exists(cve::table.filter(cve::cve_id.eq(cve_id))))
                    .get_result(conn)?;
            if !cve_exists {
                return Err(StoreError::NotFound(format!("cve.cve_id={cve_id}")));
            }

            diesel::insert_into(user_cve_comment::table)
                .values(models::NewUserCveComment::with(user_id, cve_id, comment))
                .execute(conn)?;

            Ok(())
        })
    }

    pub fn delete_user_cve_comment(&self, user_id: i32, cve_id: &str) -> Result<(), StoreError> {
        use schema::user_cve_comment;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            user_cve_comment::table.filter(
                user_cve_comment::user_id
                    .eq(user_id)
                    .and(user_cve_comment::cve_id.eq(cve_id)),
            ),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!("cve.cve_id={cve_id}")));
        }
        Ok(())
    }

    pub fn save_user_keyword(
        &self,
        user_id: i32,
        keyword: &str,
    ) -> Result<KeywordSaveOutcome, StoreError> {
        use schema::user_keyword;

        let mut conn = self.conn()?;

        let already: bool = diesel::select(exists(
            user_keyword::table.filter(
                user_keyword::user_id
                    .eq(user_id)
                    .and(user_keyword::keyword.eq(keyword)),
            ),
        ))
        .get_result(&mut conn)?;
        if already {
            return Ok(KeywordSaveOutcome::AlreadyExists);
        }

        let count: i64 = user_keyword::table
            .filter(user_keyword::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)?;
        if count >= MAX_KEYWORDS_PER_USER {
            return Err(StoreError::KeywordLimit {
                max: MAX_KEYWORDS_PER_USER,
            });
        }

        diesel::insert_into(user_keyword::table)
            .values(models::NewUserKeyword::with(user_id, keyword))
            .execute(&mut conn)?;

        Ok(KeywordSaveOutcome::Created)
    }

    pub fn delete_user_keyword(&self, user_id: i32, keyword: &str) -> Result<(), StoreError> {
        use schema::user_keyword;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            user_keyword::table.filter(
                user_keyword::user_id
                    .eq(user_id)
                    .and(user_keyword::keyword.eq(keyword)),
            ),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!(
                "user_keyword.keyword={keyword}"
            )));
        }
        Ok(())
    }
}
