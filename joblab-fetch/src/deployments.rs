//! Deployment enumeration.
//!
//! One GET against the deployments collection, service-side filtering
//! only. The service returns records sorted descending by creation time
//! and that order is preserved; results past the first page are out of
//! scope by design.

use crate::client::ApiClient;
use crate::error::{FetchError, ParseError};
use joblab_core::encode::encode_path_segment;
use joblab_core::models::{Deployment, RawDeployment};
use joblab_core::Config;
use tracing::debug;

/// Page size cap; there is no follow-up pagination.
const PER_PAGE: u32 = 100;

/// Optional service-side filters for the deployments request.
#[derive(Debug, Clone, Default)]
pub struct DeploymentFilter {
    /// Restrict to one environment; sent as an empty value when unset.
    pub environment: Option<String>,
    /// Restrict to one status; omitted entirely when unset.
    pub status: Option<String>,
}

/// Fetches one page of deployments, newest first.
///
/// The returned records are exactly what the service sent, in the order it
/// sent them; no client-side re-filtering happens.
///
/// # Errors
///
/// Propagates [`NetworkError`](crate::NetworkError) from the request, or
/// [`ParseError`] if the body is not the expected JSON array.
pub async fn fetch_deployments(
    client: &ApiClient,
    filter: &DeploymentFilter,
) -> Result<Vec<Deployment>, FetchError> {
    let url = deployments_url(client.config(), filter);
    let body = client.get_text(&url).await?;
    let deployments = parse_deployments(&body)?;
    debug!(count = deployments.len(), "fetched deployments page");
    Ok(deployments)
}

/// Builds the deployments collection URL for a configuration and filter.
pub fn deployments_url(config: &Config, filter: &DeploymentFilter) -> String {
    let mut url = format!(
        "{}/projects/{}/deployments?sort=desc&environment={}",
        config.server,
        encode_path_segment(&config.repo),
        encode_path_segment(filter.environment.as_deref().unwrap_or("")),
    );
    if let Some(status) = &filter.status {
        url.push('&');
        url.push_str("status=");
        url.push_str(&encode_path_segment(status));
    }
    url.push_str(&format!("&per_page={PER_PAGE}"));
    url
}

/// Parses the JSON array body into ordered deployment records.
fn parse_deployments(body: &str) -> Result<Vec<Deployment>, ParseError> {
    let raw: Vec<RawDeployment> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(Deployment::from).collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: "https://gitlab.example.com".to_string(),
            repo: "group/proj".to_string(),
            token: "secret".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_url_without_filters() {
        let url = deployments_url(&config(), &DeploymentFilter::default());
        assert_eq!(
            url,
            "https://gitlab.example.com/projects/group%2fproj/deployments\
             ?sort=desc&environment=&per_page=100"
        );
    }

    #[test]
    fn test_url_with_environment_and_status() {
        let filter = DeploymentFilter {
            environment: Some("production".to_string()),
            status: Some("success".to_string()),
        };
        let url = deployments_url(&config(), &filter);
        assert_eq!(
            url,
            "https://gitlab.example.com/projects/group%2fproj/deployments\
             ?sort=desc&environment=production&status=success&per_page=100"
        );
    }

    #[test]
    fn test_parse_preserves_service_order() {
        let body = r#"[
            {"created_at": "2024-05-02T00:00:00Z",
             "deployable": {"id": 43}, "user": {"name": "B"},
             "environment": {"slug": "staging"}},
            {"created_at": "2024-05-01T00:00:00Z",
             "deployable": {"id": 42}, "user": {"name": "A"},
             "environment": {"slug": "production"}}
        ]"#;

        let deployments = parse_deployments(body).unwrap();
        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments[0].job_id, 43);
        assert_eq!(deployments[1].job_id, 42);
        assert_eq!(deployments[1].environment_slug, "production");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_deployments("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_body_is_parse_error() {
        let result = parse_deployments("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }
}
