//! Deployment records as returned by the CI platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One CI deployment event.
///
/// Records arrive from the service sorted descending by [`created_at`]
/// (newest first) and are consumed in that order.
///
/// [`created_at`]: Deployment::created_at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Identifier of the job that performed the deployment.
    pub job_id: u64,
    /// Name of the user who triggered it.
    pub user_name: String,
    /// Slug of the environment deployed to.
    pub environment_slug: String,
    /// When the deployment was created.
    pub created_at: DateTime<Utc>,
}

/// Wire shape of a deployment object in the API response.
///
/// Only the fields the tools consume are declared; everything else in the
/// payload is ignored.
#[derive(Debug, Deserialize)]
pub struct RawDeployment {
    /// The job that ran the deployment.
    pub deployable: RawDeployable,
    /// The triggering user.
    pub user: RawUser,
    /// The target environment.
    pub environment: RawEnvironment,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// `deployable` sub-object: the job behind the deployment.
#[derive(Debug, Deserialize)]
pub struct RawDeployable {
    /// Job identifier.
    pub id: u64,
}

/// `user` sub-object.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    /// Display name.
    pub name: String,
}

/// `environment` sub-object.
#[derive(Debug, Deserialize)]
pub struct RawEnvironment {
    /// Environment slug.
    pub slug: String,
}

impl From<RawDeployment> for Deployment {
    fn from(raw: RawDeployment) -> Self {
        Self {
            job_id: raw.deployable.id,
            user_name: raw.user.name,
            environment_slug: raw.environment.slug,
            created_at: raw.created_at,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
