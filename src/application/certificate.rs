//! Certificate issuance and DNS validation
//!
//! Certificates are always requested in the validation region, whatever the
//! site's home region. A requested ARN is handed to the caller's checkpoint
//! before polling starts, so a timed out or cancelled run resumes polling the
//! same request instead of asking for a new one.

use std::sync::Arc;

use crate::application::apply::StepOutcome;
use crate::domain::entities::{Certificate, CertificateStatus, HostedZone, SiteSpec};
use crate::domain::ports::{
    CertificateProvider, Clock, DnsProvider, ProviderContext, ProvisionEvent, ProvisionEventSink,
};
use crate::domain::services::Backoff;
use crate::domain::value_objects::{CancelToken, Region};
use crate::error::{ProvisionError, ProvisionResult};

const STAGE: &str = "certificate validation";

/// Finds, requests and validates the site certificate
pub struct CertificateIssuer {
    certificates: Arc<dyn CertificateProvider>,
    dns: Arc<dyn DnsProvider>,
    clock: Arc<dyn Clock>,
    backoff: Backoff,
    events: Arc<dyn ProvisionEventSink>,
    cancel: CancelToken,
}

impl CertificateIssuer {
    pub fn new(
        certificates: Arc<dyn CertificateProvider>,
        dns: Arc<dyn DnsProvider>,
        clock: Arc<dyn Clock>,
        backoff: Backoff,
        events: Arc<dyn ProvisionEventSink>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            certificates,
            dns,
            clock,
            backoff,
            events,
            cancel,
        }
    }

    /// Ensure an issued certificate covers the site domain.
    ///
    /// `known_arn` is the ARN recorded by an earlier run. `checkpoint` is
    /// called with the certificate before any polling happens.
    pub fn ensure(
        &self,
        ctx: &ProviderContext,
        spec: &SiteSpec,
        zone: &HostedZone,
        known_arn: Option<&str>,
        checkpoint: &mut dyn FnMut(&Certificate) -> ProvisionResult<()>,
    ) -> ProvisionResult<(Certificate, StepOutcome)> {
        let vctx = ctx.in_region(Region::validation());
        let (certificate, requested) = self.find_or_request(&vctx, spec, known_arn)?;
        checkpoint(&certificate)?;

        if certificate.status == CertificateStatus::Issued {
            let arn = certificate.arn.clone();
            return Ok((certificate, StepOutcome::Unchanged(arn)));
        }

        self.write_challenges(ctx, &vctx, zone, &certificate.arn)?;
        let issued = self.poll_until_issued(&vctx, spec, certificate)?;
        let arn = issued.arn.clone();
        let outcome = if requested {
            StepOutcome::Created(arn)
        } else {
            StepOutcome::Updated(arn)
        };
        Ok((issued, outcome))
    }

    fn find_or_request(
        &self,
        vctx: &ProviderContext,
        spec: &SiteSpec,
        known_arn: Option<&str>,
    ) -> ProvisionResult<(Certificate, bool)> {
        if let Some(arn) = known_arn {
            let known = self
                .certificates
                .describe_certificate(vctx, arn)
                .map_err(|e| ProvisionError::provider("DescribeCertificate", e.to_string()))?;
            if let Some(cert) = known.filter(|c| c.status != CertificateStatus::Failed) {
                return Ok((cert, false));
            }
        }

        let existing = self
            .certificates
            .find_certificate(vctx, &spec.domain_name)
            .map_err(|e| ProvisionError::provider("ListCertificates", e.to_string()))?;
        if let Some(cert) = existing {
            return Ok((cert, false));
        }

        let cert = self
            .certificates
            .request_certificate(vctx, &spec.domain_name)
            .map_err(|e| ProvisionError::provider("RequestCertificate", e.to_string()))?;
        Ok((cert, true))
    }

    fn write_challenges(
        &self,
        ctx: &ProviderContext,
        vctx: &ProviderContext,
        zone: &HostedZone,
        arn: &str,
    ) -> ProvisionResult<()> {
        let challenges = self
            .certificates
            .challenge_records(vctx, arn)
            .map_err(|e| ProvisionError::provider("DescribeCertificate", e.to_string()))?;
        for challenge in &challenges {
            self.dns
                .upsert_challenge_record(ctx, &zone.zone_id, challenge)
                .map_err(|e| ProvisionError::provider("ChangeResourceRecordSets", e.to_string()))?;
        }
        Ok(())
    }

    fn poll_until_issued(
        &self,
        vctx: &ProviderContext,
        spec: &SiteSpec,
        mut certificate: Certificate,
    ) -> ProvisionResult<Certificate> {
        let started = self.clock.elapsed();
        let mut attempt = 0u32;

        loop {
            match certificate.status {
                CertificateStatus::Issued => return Ok(certificate),
                CertificateStatus::Failed => {
                    return Err(ProvisionError::provider(
                        "DescribeCertificate",
                        format!("certificate {} failed validation", certificate.arn),
                    ))
                }
                CertificateStatus::Pending | CertificateStatus::Validating => {}
            }

            if self.cancel.is_cancelled() {
                return Err(ProvisionError::cancelled(STAGE));
            }

            let waited = self.clock.elapsed().saturating_sub(started);
            let Some(delay) = self.backoff.next_sleep(attempt, waited) else {
                return Err(ProvisionError::ValidationTimeout {
                    arn: certificate.arn,
                    waited_secs: waited.as_secs(),
                });
            };

            self.events.on_event(ProvisionEvent::CertificatePoll {
                domain: spec.domain_name.as_str().to_string(),
                arn: certificate.arn.clone(),
                attempt,
                waited_secs: waited.as_secs(),
            });
            self.clock
                .sleep(delay, &self.cancel)
                .map_err(|_| ProvisionError::cancelled(STAGE))?;
            attempt += 1;

            certificate = self
                .certificates
                .describe_certificate(vctx, &certificate.arn)
                .map_err(|e| ProvisionError::provider("DescribeCertificate", e.to_string()))?
                .ok_or_else(|| {
                    ProvisionError::provider(
                        "DescribeCertificate",
                        format!("certificate {} disappeared while validating", certificate.arn),
                    )
                })?;
        }
    }
}
