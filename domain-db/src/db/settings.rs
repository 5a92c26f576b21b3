//! Saved per-user filter and notification preferences, plus the option
//! lists the filter form is built from.

use diesel::dsl::{max, min};
use diesel::prelude::*;
use serde::Serialize;

use super::models::{self, LabelOption, SeverityOption};
use super::{schema, PostgresRepository};
use crate::error::StoreError;

/// Saved defaults applied to the list view filters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterSettings {
    pub severity: Option<String>,
    pub year: Option<i32>,
    pub label_id_list: Vec<i32>,
    pub enable_user_keyword: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            severity: None,
            year: None,
            label_id_list: Vec::new(),
            enable_user_keyword: true,
        }
    }
}

/// Everything the settings page shows: filter defaults plus notification
/// targets.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSettings {
    pub severity: Option<String>,
    pub year: Option<i32>,
    pub label_id_list: Vec<i32>,
    pub enable_user_keyword: bool,
    pub mail_address: Option<String>,
    pub notify_mail: Option<bool>,
    pub slack_webhook_url: Option<String>,
    pub notify_slack: Option<bool>,
}

/// Validated replacement settings. Every save replaces the stored state
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserSettings {
    pub severity: Option<String>,
    pub year: Option<i32>,
    pub label_id_list: Vec<i32>,
    pub enable_user_keyword: bool,
    pub mail_address: Option<String>,
    pub notify_mail: bool,
    pub slack_webhook_url: Option<String>,
    pub notify_slack: bool,
}

impl PostgresRepository {
    pub fn load_filter_settings(&self, user_id: i32) -> Result<FilterSettings, StoreError> {
        use schema::{user_filter_setting, user_filter_setting_cve_label};

        let mut conn = self.conn()?;

        let saved = user_filter_setting::table
            .filter(user_filter_setting::user_id.eq(user_id))
            .select((
                user_filter_setting::severity,
                user_filter_setting::year,
                user_filter_setting::enable_user_keyword,
            ))
            .first::<(Option<String>, Option<i32>, bool)>(&mut conn)
            .optional()?;

        let Some((severity, year, enable_user_keyword)) = saved else {
            return Ok(FilterSettings::default());
        };

        let label_id_list = user_filter_setting_cve_label::table
            .filter(user_filter_setting_cve_label::user_id.eq(user_id))
            .select(user_filter_setting_cve_label::cve_label_id)
            .order(user_filter_setting_cve_label::cve_label_id.asc())
            .load::<i32>(&mut conn)?;

        Ok(FilterSettings {
            severity,
            year,
            label_id_list,
            enable_user_keyword,
        })
    }

    pub fn load_user_settings(&self, user_id: i32) -> Result<UserSettings, StoreError> {
        use schema::{user_mail_address, user_slack_webhook_url};

        let filter = self.load_filter_settings(user_id)?;

        let mut conn = self.conn()?;

        let mail = user_mail_address::table
            .filter(user_mail_address::user_id.eq(user_id))
            .select((
                user_mail_address::mail_address,
                user_mail_address::notify_mail,
            ))
            .first::<(String, bool)>(&mut conn)
            .optional()?;

        let slack = user_slack_webhook_url::table
            .filter(user_slack_webhook_url::user_id.eq(user_id))
            .select((
                user_slack_webhook_url::slack_webhook_url,
                user_slack_webhook_url::notify_slack,
            ))
            .first::<(String, bool)>(&mut conn)
            .optional()?;

        let (mail_address, notify_mail) = match mail {
            Some((address, notify)) => (Some(address), Some(notify)),
            None => (None, None),
        };
        let (slack_webhook_url, notify_slack) = match slack {
            Some((url, notify)) => (Some(url), Some(notify)),
            None => (None, None),
        };

        Ok(UserSettings {
            severity: filter.severity,
            year: filter.year,
            label_id_list: filter.label_id_list,
            enable_user_keyword: filter.enable_user_keyword,
            mail_address,
            notify_mail,
            slack_webhook_url,
            notify_slack,
        })
    }

    /// Replace the user's stored settings wholesale, in one transaction.
    pub fn save_user_settings(
        &self,
        user_id: i32,
        settings: &NewUserSettings,
    ) -> Result<(), StoreError> {
        use schema::{
            user_filter_setting, user_filter_setting_cve_label, user_mail_address,
            user_slack_webhook_url,
        };

        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            diesel::delete(
                user_filter_setting::table.filter(user_filter_setting::user_id.eq(user_id)),
            )
            .execute(conn)?;
            diesel::insert_into(user_filter_setting::table)
                .values(models::NewUserFilterSetting {
                    user_id,
                    severity: settings.severity.clone(),
                    year: settings.year,
                    enable_user_keyword: settings.enable_user_keyword,
                    created_at: models::now(),
                })
                .execute(conn)?;

            diesel::delete(
                user_filter_setting_cve_label::table
                    .filter(user_filter_setting_cve_label::user_id.eq(user_id)),
            )
            .execute(conn)?;
            for &cve_label_id in &settings.label_id_list {
                diesel::insert_into(user_filter_setting_cve_label::table)
                    .values(models::NewUserFilterSettingCveLabel {
                        user_id,
                        cve_label_id,
                        created_at: models::now(),
                    })
                    .execute(conn)?;
            }

            diesel::delete(user_mail_address::table.filter(user_mail_address::user_id.eq(user_id)))
                .execute(conn)?;
            if let Some(mail_address) = &settings.mail_address {
                diesel::insert_into(user_mail_address::table)
                    .values(models::NewUserMailAddress {
                        user_id,
                        mail_address: mail_address.clone(),
                        notify_mail: settings.notify_mail,
                        created_at: models::now(),
                    })
                    .execute(conn)?;
            }

            diesel::delete(
                user_slack_webhook_url::table.filter(user_slack_webhook_url::user_id.eq(user_id)),
            )
            .execute(conn)?;
            if let Some(slack_webhook_url) = &settings.slack_webhook_url {
                diesel::insert_into(user_slack_webhook_url::table)
                    .values(models::NewUserSlackWebhookUrl {
                        user_id,
                        slack_webhook_url: slack_webhook_url.clone(),
                        notify_slack: settings.notify_slack,
                        created_at: models::now(),
                    })
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    pub fn severity_options(&self) -> Result<Vec<SeverityOption>, StoreError> {
        use schema::cve_severity;

        let mut conn = self.conn()?;
        let rows = cve_severity::table
            .select((
                cve_severity::cve_severity_code,
                cve_severity::cve_severity_name,
            ))
            .order(cve_severity::display_order.asc())
            .load::<(String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(code, name)| SeverityOption {
                cve_severity_code: code,
                cve_severity_name: name,
            })
            .collect())
    }

    pub fn label_options(&self) -> Result<Vec<LabelOption>, StoreError> {
        use schema::cve_label;

        let mut conn = self.conn()?;
        let rows = cve_label::table
            .select((
                cve_label::cve_label_id,
                cve_label::cve_label_code,
                cve_label::cve_label_name,
            ))
            .order(cve_label::display_order.asc())
            .load::<(i32, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, code, name)| LabelOption {
                cve_label_id: id,
                cve_label_code: code,
                cve_label_name: name,
            })
            .collect())
    }

    /// Selectable years, newest first, spanning the records actually
    /// present.
    pub fn year_options(&self) -> Result<Vec<i32>, StoreError> {
        use schema::cve;

        let mut conn = self.conn()?;
        let (min_year, max_year) = cve::table
            .select((min(cve::cve_year), max(cve::cve_year)))
            .first::<(Option<i32>, Option<i32>)>(&mut conn)?;

        Ok(match (min_year, max_year) {
            (Some(lo), Some(hi)) => (lo..=hi).rev().collect(),
            _ => Vec::new(),
        })
    }
}
