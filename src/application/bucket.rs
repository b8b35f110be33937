//! Hosting bucket management

use crate::application::apply::StepOutcome;
use crate::domain::entities::{HostingBucket, SiteSpec};
use crate::domain::ports::{HostingProvider, ProviderContext};
use crate::error::{ProvisionError, ProvisionResult};

/// Create the site bucket or bring an owned one to the desired settings.
///
/// Bucket names are global, so a bucket owned by another account or living
/// in another region is a conflict the operator has to resolve.
pub fn ensure_bucket(
    hosting: &dyn HostingProvider,
    ctx: &ProviderContext,
    spec: &SiteSpec,
) -> ProvisionResult<(HostingBucket, StepOutcome)> {
    let desired = HostingBucket::desired(spec.bucket_name(), &spec.region, &spec.account);
    let existing = hosting
        .get_bucket(ctx, &desired.name)
        .map_err(|e| ProvisionError::provider("GetBucket", e.to_string()))?;

    let Some(existing) = existing else {
        hosting
            .create_bucket(ctx, &desired)
            .map_err(|e| ProvisionError::provider("CreateBucket", e.to_string()))?;
        let id = desired.name.clone();
        return Ok((desired, StepOutcome::Created(id)));
    };

    if existing.owner_account != desired.owner_account {
        return Err(ProvisionError::conflict(
            "bucket",
            &desired.name,
            format!("owned by account {}", existing.owner_account),
        ));
    }
    if existing.region != desired.region {
        return Err(ProvisionError::conflict(
            "bucket",
            &desired.name,
            format!("exists in region {}, expected {}", existing.region, desired.region),
        ));
    }

    let id = desired.name.clone();
    if existing.same_settings(&desired) {
        return Ok((existing, StepOutcome::Unchanged(id)));
    }
    hosting
        .update_bucket(ctx, &desired)
        .map_err(|e| ProvisionError::provider("UpdateBucket", e.to_string()))?;
    Ok((desired, StepOutcome::Updated(id)))
}
