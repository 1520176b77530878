mod approval;
mod report;
pub mod rules;

pub use approval::ApprovalBlocker;
pub use report::{Field, ValidationReport, Violation};

use crate::{
    config::Config,
    error::Result,
    logging::PassId,
    model::{
        application::{
            Application, ApplicationCore, ApplicationId, NewApplication, SubmissionContext,
        },
        lookup::{Lookups, VerificationLookup},
    },
};

use rules::{Subject, RULES};

/// Runs every validation rule against an application and collects the
/// violations. Expected bad input never fails; only collaborator faults do.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: Config,
}

impl Validator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate a fresh submission. The phone-verified flag is derived from
    /// the verification service and written to the record first.
    pub fn validate_new(
        &self,
        app: &mut NewApplication,
        context: &SubmissionContext,
        lookups: Lookups<'_>,
    ) -> Result<ValidationReport> {
        self.project_phone_verified(app, context, lookups.verifications)?;
        self.run(app, None, context, lookups)
    }

    /// Validate an application that is already stored.
    pub fn validate(
        &self,
        app: &Application,
        context: &SubmissionContext,
        lookups: Lookups<'_>,
    ) -> Result<ValidationReport> {
        self.run(&app.application, Some(app.id), context, lookups)
    }

    /// Record whether the submission's phone counts as verified.
    pub fn project_phone_verified(
        &self,
        app: &mut ApplicationCore,
        context: &SubmissionContext,
        verifications: &dyn VerificationLookup,
    ) -> Result<bool> {
        let verified = context.skip_phone_verification
            || !self.config.phone_verification()
            || (!app.phone().is_empty() && verifications.is_confirmed(app.phone())?);
        app.set_phone_verified(verified);
        Ok(verified)
    }

    fn run(
        &self,
        app: &ApplicationCore,
        id: Option<ApplicationId>,
        context: &SubmissionContext,
        lookups: Lookups<'_>,
    ) -> Result<ValidationReport> {
        let pass = PassId::next();
        match id {
            Some(id) => debug!("->pass{pass} validating application {id} ({})", app.state()),
            None => debug!("->pass{pass} validating new submission"),
        }

        let subject = Subject {
            app,
            id,
            context,
            config: &self.config,
            lookups,
        };
        let mut violations = vec![];
        for (name, rule) in RULES {
            let found = rule(&subject).map_err(|e| {
                error!("pass{pass} rule {name} failed: {e}");
                e
            })?;
            if !found.is_empty() {
                debug!("pass{pass} rule {name}: {} violation(s)", found.len());
            }
            violations.extend(found);
        }

        let report = ValidationReport::new(violations);
        if report.is_valid() {
            info!("<-pass{pass} valid");
        } else {
            warn!("<-pass{pass} {} violation(s)", report.len());
        }
        Ok(report)
    }
}
