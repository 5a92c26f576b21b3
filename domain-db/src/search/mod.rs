//! The CVE list query: composes severity, year, keyword, per-user-label
//! and per-user-keyword conditions into one paginated, annotated result
//! page with deterministic ordering.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{CveIdConditions, PostgresRepository};
use crate::error::StoreError;

/// Validated filter set for one list query. `labels` and
/// `enable_user_keyword` only have meaning when `user_id` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CveListFilter {
    pub severity: Option<String>,
    pub year: Option<i32>,
    pub keyword: Option<String>,
    pub page: i64,
    pub per_page: i64,
    pub user_id: Option<i32>,
    pub labels: Option<Vec<i32>>,
    pub enable_user_keyword: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CveRecord {
    pub cve_id: String,
    pub cve_url: String,
    pub nvd_url: Option<String>,
    pub nvd_content_exists: bool,
    pub cve_description: String,
    pub cvss3_score: Option<f64>,
    pub cvss3_severity: Option<String>,
    pub cvss2_score: Option<f64>,
    pub cvss2_severity: Option<String>,
    pub published_date: Option<NaiveDateTime>,
    pub label_id: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CveListResult {
    pub total_count: i64,
    pub display_count_from: i64,
    pub display_count_to: i64,
    pub current_page: i64,
    pub max_page: i64,
    pub cve_list: Vec<CveRecord>,
}

pub fn find_cve_list(
    db: &PostgresRepository,
    filter: &CveListFilter,
) -> Result<CveListResult, StoreError> {
    log::info!("searching cve list: {:?} ...", filter);

    let mut conditions = CveIdConditions::default();

    // The floor is resolved against both scales independently; a scale
    // that does not know the code contributes no condition.
    if let Some(code) = &filter.severity {
        conditions.v3_codes = db.cvss3_codes_at_or_above(code)?;
        conditions.v2_codes = db.cvss2_codes_at_or_above(code)?;
    }

    conditions.year = filter.year;

    let user_keyword_search = filter.user_id.is_some() && filter.enable_user_keyword;
    if !user_keyword_search {
        if let Some(keyword) = &filter.keyword {
            conditions.text_query = Some(ts_query(std::slice::from_ref(keyword)));
        }
    }

    if let Some(user_id) = filter.user_id {
        match &filter.labels {
            Some(labels) if !labels.is_empty() => {
                conditions.label_filter = Some((user_id, labels.clone()));
            }
            _ => {}
        }

        if filter.enable_user_keyword {
            let mut terms = db.user_keywords(user_id)?;
            if let Some(keyword) = &filter.keyword {
                terms.push(keyword.clone());
            }
            if terms.is_empty() {
                // "Search my keywords" with none saved matches nothing,
                // not everything.
                return Ok(empty_result(filter.page, filter.per_page));
            }
            conditions.text_query = Some(ts_query(&terms));
        }
    }

    let total_count = db.count_filtered_cve_ids(&conditions)?;

    let offset = filter.per_page * (filter.page - 1);
    let page_ids = db.page_of_filtered_cve_ids(&conditions, offset, filter.per_page)?;

    let mut label_by_id: HashMap<String, i32> = HashMap::new();
    let mut comment_by_id: HashMap<String, String> = HashMap::new();
    if let Some(user_id) = filter.user_id {
        label_by_id = db.user_labels_for(user_id, &page_ids)?;
        comment_by_id = db.user_comments_for(user_id, &page_ids)?;
    }

    let cve_list: Vec<CveRecord> = db
        .cve_page_records(&page_ids)?
        .into_iter()
        .map(|row| CveRecord {
            label_id: label_by_id.get(&row.cve_id).copied(),
            comment: comment_by_id.get(&row.cve_id).cloned(),
            cve_id: row.cve_id,
            cve_url: row.cve_url,
            nvd_url: row.nvd_url,
            nvd_content_exists: row.nvd_content_exists,
            cve_description: row.cve_description,
            cvss3_score: row.cvss3_score,
            cvss3_severity: row.cvss3_severity,
            cvss2_score: row.cvss2_score,
            cvss2_severity: row.cvss2_severity,
            published_date: row.published_date,
        })
        .collect();

    log::info!(
        "found {} matches, returning {} for page {}",
        total_count,
        cve_list.len(),
        filter.page
    );

    let paging = Paging::compute(
        total_count,
        filter.page,
        filter.per_page,
        cve_list.len() as i64,
    );

    Ok(CveListResult {
        total_count,
        display_count_from: paging.display_count_from,
        display_count_to: paging.display_count_to,
        current_page: filter.page,
        max_page: paging.max_page,
        cve_list,
    })
}

fn empty_result(page: i64, per_page: i64) -> CveListResult {
    let paging = Paging::compute(0, page, per_page, 0);
    CveListResult {
        total_count: 0,
        display_count_from: paging.display_count_from,
        display_count_to: paging.display_count_to,
        current_page: page,
        max_page: paging.max_page,
        cve_list: Vec::new(),
    }
}

/// One boolean-mode tsquery over all terms: a record containing any one
/// of them matches.
fn ts_query(terms: &[String]) -> String {
    terms.join(" | ")
}

#[derive(Debug, PartialEq, Eq)]
struct Paging {
    display_count_from: i64,
    display_count_to: i64,
    max_page: i64,
}

impl Paging {
    fn compute(total_count: i64, page: i64, per_page: i64, on_page: i64) -> Self {
        let offset = per_page * (page - 1);
        // Truncating division keeps the historical "page 1 of 1" display
        // for an empty result set.
        Self {
            display_count_from: if on_page > 0 { offset + 1 } else { 0 },
            display_count_to: offset + on_page,
            max_page: (total_count - 1) / per_page + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(10, 1, 10, 1, 10, 1 ; "ten records fill one page")]
    #[test_case(11, 1, 10, 1, 10, 2 ; "eleven records page one")]
    #[test_case(11, 2, 1, 11, 11, 2 ; "eleven records page two")]
    #[test_case(12, 2, 2, 11, 12, 2 ; "twelve records page two")]
    #[test_case(20, 1, 10, 1, 10, 2 ; "twenty records page one")]
    #[test_case(20, 2, 10, 11, 20, 2 ; "twenty records page two")]
    #[test_case(21, 3, 1, 21, 21, 3 ; "twenty one records page three")]
    fn paging_scenarios(
        total: i64,
        page: i64,
        on_page: i64,
        from: i64,
        to: i64,
        max_page: i64,
    ) {
        let paging = Paging::compute(total, page, 10, on_page);
        assert_eq!(paging.display_count_from, from);
        assert_eq!(paging.display_count_to, to);
        assert_eq!(paging.max_page, max_page);
    }

    #[test]
    fn paging_empty_set_reports_page_one_of_one() {
        let paging = Paging::compute(0, 1, 10, 0);
        assert_eq!(paging.display_count_from, 0);
        assert_eq!(paging.display_count_to, 0);
        assert_eq!(paging.max_page, 1);
    }

    #[test]
    fn paging_page_past_the_end_is_empty() {
        let paging = Paging::compute(11, 3, 10, 0);
        assert_eq!(paging.display_count_from, 0);
        assert_eq!(paging.display_count_to, 20);
        assert_eq!(paging.max_page, 2);
    }

    #[test]
    fn ts_query_joins_terms_with_or() {
        let terms = vec!["ruby".to_string(), "Python".to_string()];
        assert_eq!(ts_query(&terms), "ruby | Python");
    }

    #[test]
    fn ts_query_single_term_is_bare() {
        assert_eq!(ts_query(&["openssl".to_string()]), "openssl");
    }

    #[test]
    fn empty_result_shape() {
        let result = empty_result(1, 10);
        assert_eq!(result.total_count, 0);
        assert_eq!(result.display_count_from, 0);
        assert_eq!(result.display_count_to, 0);
        assert_eq!(result.current_page, 1);
        assert_eq!(result.max_page, 1);
        assert!(result.cve_list.is_empty());
    }
}
