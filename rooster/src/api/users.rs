//! Authenticated account endpoints: saved keywords and the stored
//! filter/notification settings.

use actix_web::web::{self, Json};
use serde::{Deserialize, Serialize};

use domain_db::db::settings::{NewUserSettings, UserSettings};

use super::annotations::MutationResult;
use super::error::{handle_blocking_error, handle_store_error, ApplicationError};
use super::identity::UserId;
use super::response::Envelope;
use super::validation;
use super::ApplicationContext;

#[derive(Debug, Serialize)]
pub struct KeywordList {
    pub keywords: Vec<String>,
}

pub async fn keywords(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
) -> Result<Json<Envelope<KeywordList>>, ApplicationError> {
    let keywords = web::block(move || {
        ctx.get_repository()
            .user_keywords(user.0)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(KeywordList { keywords })))
}

pub async fn settings(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
) -> Result<Json<Envelope<UserSettings>>, ApplicationError> {
    let settings = web::block(move || {
        ctx.get_repository()
            .load_user_settings(user.0)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(settings)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPayload {
    severity: Option<String>,
    year: Option<i32>,
    #[serde(default)]
    label_id_list: Vec<i32>,
    #[serde(default)]
    enable_user_keyword: bool,
    mail_address: Option<String>,
    #[serde(default)]
    notify_mail: bool,
    slack_webhook_url: Option<String>,
    #[serde(default)]
    notify_slack: bool,
}

pub async fn save_settings(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<SettingsPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let settings = validate_settings(&payload)?;

    web::block(move || {
        ctx.get_repository()
            .save_user_settings(user.0, &settings)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(MutationResult {
        status: "completed",
    })))
}

fn validate_settings(payload: &SettingsPayload) -> Result<NewUserSettings, ApplicationError> {
    let mut errors = Vec::new();

    let severity = match &payload.severity {
        Some(code) => validation::severity(code).map_err(|m| errors.push(m)).ok(),
        None => None,
    };
    let year = match payload.year {
        Some(year) => validation::year_value(year).map_err(|m| errors.push(m)).ok(),
        None => None,
    };

    let mut label_id_list = Vec::with_capacity(payload.label_id_list.len());
    for &id in &payload.label_id_list {
        match validation::label_id(id) {
            Ok(id) => label_id_list.push(id),
            Err(message) => errors.push(message),
        }
    }

    let mail_address = match &payload.mail_address {
        Some(address) => validation::mail_address(address)
            .map_err(|m| errors.push(m))
            .ok(),
        None => None,
    };
    if payload.notify_mail && payload.mail_address.is_none() {
        errors.push("notify_mail requires mail_address".to_string());
    }

    let slack_webhook_url = match &payload.slack_webhook_url {
        Some(url) => validation::slack_webhook_url(url)
            .map_err(|m| errors.push(m))
            .ok(),
        None => None,
    };
    if payload.notify_slack && payload.slack_webhook_url.is_none() {
        errors.push("notify_slack requires slack_webhook_url".to_string());
    }

    if !errors.is_empty() {
        return Err(ApplicationError::Validation(errors));
    }

    Ok(NewUserSettings {
        severity,
        year,
        label_id_list,
        enable_user_keyword: payload.enable_user_keyword,
        mail_address,
        notify_mail: payload.notify_mail,
        slack_webhook_url,
        notify_slack: payload.notify_slack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_the_minimal_settings() {
        let settings = validate_settings(&SettingsPayload::default()).unwrap();
        assert_eq!(settings.severity, None);
        assert_eq!(settings.year, None);
        assert!(settings.label_id_list.is_empty());
        assert!(!settings.enable_user_keyword);
        assert!(!settings.notify_mail);
        assert!(!settings.notify_slack);
    }

    #[test]
    fn notification_flags_require_their_targets() {
        let err = validate_settings(&SettingsPayload {
            notify_mail: true,
            notify_slack: true,
            ..SettingsPayload::default()
        })
        .unwrap_err();
        match err {
            ApplicationError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec![
                        "notify_mail requires mail_address",
                        "notify_slack requires slack_webhook_url"
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn full_payload_is_carried_through() {
        let settings = validate_settings(&SettingsPayload {
            severity: Some("HIGH".into()),
            year: Some(2020),
            label_id_list: vec![1, 2],
            enable_user_keyword: true,
            mail_address: Some("user@example.com".into()),
            notify_mail: true,
            slack_webhook_url: Some("https://hooks.slack.com/services/T0/B0/x".into()),
            notify_slack: true,
        })
        .unwrap();
        assert_eq!(settings.severity.as_deref(), Some("HIGH"));
        assert_eq!(settings.year, Some(2020));
        assert_eq!(settings.label_id_list, vec![1, 2]);
        assert!(settings.enable_user_keyword);
        assert_eq!(settings.mail_address.as_deref(), Some("user@example.com"));
        assert!(settings.notify_mail);
        assert!(settings.notify_slack);
    }

    #[test]
    fn broken_fields_are_all_reported() {
        let err = validate_settings(&SettingsPayload {
            severity: Some("SEVERE".into()),
            year: Some(1990),
            label_id_list: vec![9],
            mail_address: Some("nonsense".into()),
            slack_webhook_url: Some("https://example.com".into()),
            ..SettingsPayload::default()
        })
        .unwrap_err();
        match err {
            ApplicationError::Validation(messages) => assert_eq!(messages.len(), 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
