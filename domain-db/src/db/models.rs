use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use super::schema::{
    user_cve_comment, user_cve_label, user_filter_setting, user_filter_setting_cve_label,
    user_keyword, user_mail_address, user_slack_webhook_url,
};

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// A full vulnerability record, column-for-column.
#[derive(Queryable, Debug, Clone)]
pub struct Cve {
    pub cve_id: String,
    pub cve_year: i32,
    pub cve_number: i32,
    pub cve_url: String,
    pub nvd_url: Option<String>,
    pub nvd_content_exists: bool,
    pub cve_description: String,
    pub cvss3_score: Option<f64>,
    pub cvss3_severity: Option<String>,
    pub cvss3_vector: Option<String>,
    pub cvss2_score: Option<f64>,
    pub cvss2_severity: Option<String>,
    pub cvss2_vector: Option<String>,
    pub published_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// The slice of a record the list page renders. Severity codes are stored
/// denormalized on the record itself, so no join is needed here.
#[derive(Queryable, Debug, Clone)]
pub struct CvePageRow {
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
}

#[derive(Debug, Clone, Serialize)]
pub struct SeverityOption {
    pub cve_severity_code: String,
    pub cve_severity_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelOption {
    pub cve_label_id: i32,
    pub cve_label_code: String,
    pub cve_label_name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_cve_label)]
pub struct NewUserCveLabel {
    pub user_id: i32,
    pub cve_id: String,
    pub cve_label_id: i32,
    pub created_at: NaiveDateTime,
}

impl NewUserCveLabel {
    pub fn with(user_id: i32, cve_id: &str, cve_label_id: i32) -> Self {
        Self {
            user_id,
            cve_id: cve_id.to_string(),
            cve_label_id,
            created_at: now(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_cve_comment)]
pub struct NewUserCveComment {
    pub user_id: i32,
    pub cve_id: String,
    pub cve_comment: String,
    pub created_at: NaiveDateTime,
}

impl NewUserCveComment {
    pub fn with(user_id: i32, cve_id: &str, cve_comment: &str) -> Self {
        Self {
            user_id,
            cve_id: cve_id.to_string(),
            cve_comment: cve_comment.to_string(),
            created_at: now(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_keyword)]
pub struct NewUserKeyword {
    pub user_id: i32,
    pub keyword: String,
    pub created_at: NaiveDateTime,
}

impl NewUserKeyword {
    pub fn with(user_id: i32, keyword: &str) -> Self {
        Self {
            user_id,
            keyword: keyword.to_string(),
            created_at: now(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_filter_setting)]
pub struct NewUserFilterSetting {
    pub user_id: i32,
    pub severity: Option<String>,
    pub year: Option<i32>,
    pub enable_user_keyword: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_filter_setting_cve_label)]
pub struct NewUserFilterSettingCveLabel {
    pub user_id: i32,
    pub cve_label_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_mail_address)]
pub struct NewUserMailAddress {
    pub user_id: i32,
    pub mail_address: String,
    pub notify_mail: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_slack_webhook_url)]
pub struct NewUserSlackWebhookUrl {
    pub user_id: i32,
    pub slack_webhook_url: String,
    pub notify_slack: bool,
    pub created_at: NaiveDateTime,
}
