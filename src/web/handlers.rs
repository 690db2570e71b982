use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    Form,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::links::{LinkService, StatsReport, StatsReporter};
use crate::models::{Click, CreateLinkForm, UNKNOWN_CLIENT};

pub struct WebState {
    pub links: LinkService,
    pub stats: StatsReporter,
}

/// `templates/form.html`: URL and optional timestamp
#[derive(Template, WebTemplate)]
#[template(path = "form.html")]
pub struct FormTemplate;

/// `templates/created.html`: fragment linking to the new short link
#[derive(Template, WebTemplate)]
#[template(path = "created.html")]
pub struct CreatedTemplate {
    pub slug: String,
}

/// `templates/stats.html`
#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub slug: String,
    pub destination_url: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub total_clicks: i64,
    pub clicks: Vec<ClickRow>,
}

pub struct ClickRow {
    pub time: String,
    pub address: String,
    pub identity: String,
}

impl From<&Click> for ClickRow {
    fn from(click: &Click) -> Self {
        Self {
            time: format_timestamp(click.timestamp),
            address: click
                .client_address
                .clone()
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            identity: click
                .client_identity
                .clone()
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
        }
    }
}

impl From<StatsReport> for StatsTemplate {
    fn from(report: StatsReport) -> Self {
        Self {
            clicks: report.recent_clicks.iter().map(ClickRow::from).collect(),
            created_at: format_timestamp(report.link.created_at),
            expires_at: report.link.expires_at.map(format_timestamp),
            slug: report.link.slug,
            destination_url: report.link.destination_url,
            total_clicks: report.total_clicks,
        }
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Render the intake form
pub async fn show_form() -> FormTemplate {
    FormTemplate
}

/// Create a short link from the submitted form
pub async fn create_link(
    State(state): State<Arc<WebState>>,
    Form(form): Form<CreateLinkForm>,
) -> Result<CreatedTemplate, AppError> {
    let url = form.url.unwrap_or_default();
    let now = chrono::Utc::now().timestamp();

    let link = state
        .links
        .create(&url, form.timestamp.as_deref(), now)
        .await?;

    Ok(CreatedTemplate { slug: link.slug })
}

/// Render the stats page for a link
pub async fn show_stats(
    State(state): State<Arc<WebState>>,
    Path(slug): Path<String>,
) -> Result<StatsTemplate, AppError> {
    let report = state
        .stats
        .report(&slug)
        .await?
        .ok_or(AppError::NotFound("Link not found"))?;

    Ok(report.into())
}
