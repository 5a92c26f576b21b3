use actix_web::web::{self, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use domain_db::db::models::{Cve, LabelOption, SeverityOption};
use domain_db::db::settings::FilterSettings;
use domain_db::search::{self, CveListFilter, CveListResult};

use super::error::{handle_blocking_error, handle_store_error, ApplicationError};
use super::identity::MaybeUserId;
use super::response::Envelope;
use super::validation;
use super::ApplicationContext;

/// Page size fixed by the presentation layer.
pub const DISPLAY_COUNT_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    severity: Option<String>,
    year: Option<String>,
    keyword: Option<String>,
    page: Option<String>,
    label: Option<String>,
    enable_user_keyword: Option<String>,
}

pub async fn list(
    ctx: web::Data<ApplicationContext>,
    user: MaybeUserId,
    params: web::Query<ListParams>,
) -> Result<Json<Envelope<CveListResult>>, ApplicationError> {
    let filter = build_filter(&params, user.0)?;

    let result = web::block(move || {
        search::find_cve_list(ctx.get_repository(), &filter).map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(result)))
}

/// Validate every supplied parameter, reporting all failures at once.
fn build_filter(
    params: &ListParams,
    user_id: Option<i32>,
) -> Result<CveListFilter, ApplicationError> {
    let mut errors = Vec::new();

    let severity = collect(&mut errors, params.severity.as_deref().map(validation::severity));
    let year = collect(&mut errors, params.year.as_deref().map(validation::year));
    let keyword = collect(&mut errors, params.keyword.as_deref().map(validation::keyword));
    let page = collect(&mut errors, params.page.as_deref().map(validation::page)).unwrap_or(1);
    let labels = collect(&mut errors, params.label.as_deref().map(validation::labels));
    let enable_user_keyword = collect(
        &mut errors,
        params
            .enable_user_keyword
            .as_deref()
            .map(|value| validation::boolean("enable_user_keyword", value)),
    )
    .unwrap_or(false);

    if !errors.is_empty() {
        return Err(ApplicationError::Validation(errors));
    }

    Ok(CveListFilter {
        severity,
        year,
        keyword,
        page,
        per_page: DISPLAY_COUNT_PER_PAGE,
        user_id,
        labels,
        enable_user_keyword,
    })
}

fn collect<T>(errors: &mut Vec<String>, checked: Option<Result<T, String>>) -> Option<T> {
    match checked {
        Some(Ok(value)) => Some(value),
        Some(Err(message)) => {
            errors.push(message);
            None
        }
        None => None,
    }
}

#[derive(Debug, Serialize)]
pub struct RiskItem {
    pub title: &'static str,
    pub percentage: u8,
    pub label: &'static str,
    pub bar_color: &'static str,
}

impl From<cvss::MetricRisk> for RiskItem {
    fn from(item: cvss::MetricRisk) -> Self {
        Self {
            title: item.metric,
            percentage: item.risk.percentage(),
            label: item.risk.label(),
            bar_color: item.risk.bar_color(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScaleDetail {
    pub score: Option<f64>,
    pub severity: Option<String>,
    pub vector: Option<String>,
    pub risk_breakdown: Vec<RiskItem>,
}

#[derive(Debug, Serialize)]
pub struct CveDetail {
    pub cve_id: String,
    pub cve_description: String,
    pub cve_url: String,
    pub nvd_url: Option<String>,
    pub nvd_content_exists: bool,
    pub published_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub cvss3: Option<ScaleDetail>,
    pub cvss2: Option<ScaleDetail>,
}

impl From<Cve> for CveDetail {
    fn from(cve: Cve) -> Self {
        let cvss3 = scale_detail(
            cve.cvss3_score,
            cve.cvss3_severity,
            cve.cvss3_vector,
            cvss::v3::risk_breakdown,
        );
        let cvss2 = scale_detail(
            cve.cvss2_score,
            cve.cvss2_severity,
            cve.cvss2_vector,
            cvss::v2::risk_breakdown,
        );

        // The NVD page exists for every record it ever covered, even when
        // the feed stopped carrying an explicit link.
        let nvd_url = cve.nvd_url.or_else(|| {
            cve.nvd_content_exists
                .then(|| format!("https://nvd.nist.gov/vuln/detail/{}", cve.cve_id))
        });

        Self {
            cve_id: cve.cve_id,
            cve_description: cve.cve_description,
            cve_url: cve.cve_url,
            nvd_url,
            nvd_content_exists: cve.nvd_content_exists,
            published_date: cve.published_date,
            last_modified_date: cve.last_modified_date,
            cvss3,
            cvss2,
        }
    }
}

fn scale_detail(
    score: Option<f64>,
    severity: Option<String>,
    vector: Option<String>,
    breakdown: fn(&str) -> Vec<cvss::MetricRisk>,
) -> Option<ScaleDetail> {
    if score.is_none() && severity.is_none() && vector.is_none() {
        return None;
    }

    let risk_breakdown = vector
        .as_deref()
        .map(breakdown)
        .unwrap_or_default()
        .into_iter()
        .map(RiskItem::from)
        .collect();

    Some(ScaleDetail {
        score,
        severity,
        vector,
        risk_breakdown,
    })
}

pub async fn detail(
    ctx: web::Data<ApplicationContext>,
    path: web::Path<String>,
) -> Result<Json<Envelope<CveDetail>>, ApplicationError> {
    let cve_id = validation::cve_id(&path.into_inner())
        .map_err(|message| ApplicationError::Validation(vec![message]))?;

    let found = {
        let cve_id = cve_id.clone();
        web::block(move || ctx.get_repository().find_cve(&cve_id).map_err(handle_store_error))
            .await
            .map_err(handle_blocking_error)??
    };

    match found {
        Some(cve) => Ok(Json(Envelope::ok(CveDetail::from(cve)))),
        None => Err(ApplicationError::NotFound(format!("cve.cve_id={cve_id}"))),
    }
}

#[derive(Debug, Serialize)]
pub struct FilterContext {
    pub severity_options: Vec<SeverityOption>,
    pub year_options: Vec<i32>,
    pub label_options: Vec<LabelOption>,
    pub filter_settings: FilterSettings,
}

pub async fn filter_context(
    ctx: web::Data<ApplicationContext>,
    user: MaybeUserId,
) -> Result<Json<Envelope<FilterContext>>, ApplicationError> {
    let context = web::block(move || -> Result<FilterContext, ApplicationError> {
        let repository = ctx.get_repository();

        let severity_options = repository.severity_options().map_err(handle_store_error)?;
        let year_options = repository.year_options().map_err(handle_store_error)?;
        let label_options = repository.label_options().map_err(handle_store_error)?;
        let filter_settings = match user.0 {
            Some(user_id) => repository
                .load_filter_settings(user_id)
                .map_err(handle_store_error)?,
            None => FilterSettings::default(),
        };

        Ok(FilterContext {
            severity_options,
            year_options,
            label_options,
            filter_settings,
        })
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(context)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams::default()
    }

    #[test]
    fn empty_params_build_the_anonymous_default_filter() {
        let filter = build_filter(&params(), None).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, DISPLAY_COUNT_PER_PAGE);
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.labels, None);
        assert!(!filter.enable_user_keyword);
    }

    #[test]
    fn full_params_are_carried_through() {
        let filter = build_filter(
            &ListParams {
                severity: Some("HIGH".into()),
                year: Some("2020".into()),
                keyword: Some("openssl".into()),
                page: Some("3".into()),
                label: Some("1,3".into()),
                enable_user_keyword: Some("true".into()),
            },
            Some(7),
        )
        .unwrap();
        assert_eq!(filter.severity.as_deref(), Some("HIGH"));
        assert_eq!(filter.year, Some(2020));
        assert_eq!(filter.keyword.as_deref(), Some("openssl"));
        assert_eq!(filter.page, 3);
        assert_eq!(filter.user_id, Some(7));
        assert_eq!(filter.labels, Some(vec![1, 3]));
        assert!(filter.enable_user_keyword);
    }

    #[test]
    fn every_broken_field_is_reported_at_once() {
        let err = build_filter(
            &ListParams {
                severity: Some("SEVERE".into()),
                year: Some("1990".into()),
                keyword: Some("has space".into()),
                page: Some("0".into()),
                label: Some("9".into()),
                enable_user_keyword: Some("maybe".into()),
            },
            None,
        )
        .unwrap_err();
        match err {
            ApplicationError::Validation(messages) => assert_eq!(messages.len(), 6),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn detail_scales_are_omitted_when_unclassified() {
        assert!(scale_detail(None, None, None, cvss::v3::risk_breakdown).is_none());

        let scale = scale_detail(
            Some(9.8),
            Some("CRITICAL".into()),
            Some("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".into()),
            cvss::v3::risk_breakdown,
        )
        .unwrap();
        assert_eq!(scale.score, Some(9.8));
        assert_eq!(scale.risk_breakdown.len(), 7);
        assert_eq!(scale.risk_breakdown[0].title, "Attack Vector");
        assert_eq!(scale.risk_breakdown[0].percentage, 75);
        assert_eq!(scale.risk_breakdown[0].bar_color, "bg-danger");
    }
}
