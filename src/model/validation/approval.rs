use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{
        application::{Application, SubmissionContext},
        lookup::{Lookups, ScanField},
        state::ApplicationState,
    },
};

use super::Validator;

/// Why an application cannot be approved right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalBlocker {
    Invalid,
    AlreadyApproved,
    EmailMissing,
    EmailDuplicate,
    PhoneDuplicate,
}

impl ApprovalBlocker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::AlreadyApproved => "already_approved",
            Self::EmailMissing => "email_missing",
            Self::EmailDuplicate => "email_duplicate",
            Self::PhoneDuplicate => "phone_duplicate",
        }
    }
}

impl Display for ApprovalBlocker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Validator {
    /// The first reason the application cannot be approved, or `None` when
    /// approval is currently permitted.
    ///
    /// Unlike the phone-uniqueness rule, duplicates here are counted across
    /// every lifecycle state.
    pub fn approval_blocker(
        &self,
        app: &Application,
        context: &SubmissionContext,
        lookups: Lookups<'_>,
    ) -> Result<Option<ApprovalBlocker>> {
        if !self.validate(app, context, lookups)?.is_valid() {
            return Ok(Some(ApprovalBlocker::Invalid));
        }
        if app.state() == ApplicationState::Approved {
            return Ok(Some(ApprovalBlocker::AlreadyApproved));
        }
        let Some(email) = app.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
            return Ok(Some(ApprovalBlocker::EmailMissing));
        };

        let duplicates = lookups.duplicates;
        if duplicates.count_others(ScanField::Email, email, Some(app.id), None)? > 0 {
            return Ok(Some(ApprovalBlocker::EmailDuplicate));
        }
        if duplicates.count_others(ScanField::Phone, app.phone(), Some(app.id), None)? > 0 {
            return Ok(Some(ApprovalBlocker::PhoneDuplicate));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{application::ApplicationCore, reference::ReferenceData};

    fn blocker(
        app: &Application,
        context: &SubmissionContext,
        data: &ReferenceData,
    ) -> Option<ApprovalBlocker> {
        log4rs_test_utils::test_logging::init_logging_once_for(["observer_apps"], None, None);
        Validator::default()
            .approval_blocker(app, context, Lookups::all(data))
            .unwrap()
    }

    #[test]
    fn clean_record_can_be_approved() {
        let app = Application::example();
        let data = ReferenceData::example().with_application(app.clone());
        assert_eq!(blocker(&app, &SubmissionContext::default(), &data), None);
    }

    #[test]
    fn invalid_comes_first() {
        let mut app = Application::example();
        app.approve().unwrap();
        app.year_born = Some(1850);
        assert_eq!(
            blocker(&app, &SubmissionContext::default(), &ReferenceData::example()),
            Some(ApprovalBlocker::Invalid)
        );
    }

    #[test]
    fn already_approved() {
        let mut app = Application::example();
        app.approve().unwrap();
        assert_eq!(
            blocker(&app, &SubmissionContext::default(), &ReferenceData::example()),
            Some(ApprovalBlocker::AlreadyApproved)
        );
    }

    #[test]
    fn imported_record_without_email() {
        let mut app = Application::example();
        app.email = None;
        app.set_imported().unwrap();
        assert_eq!(
            blocker(&app, &SubmissionContext::imported(), &ReferenceData::example()),
            Some(ApprovalBlocker::EmailMissing)
        );
    }

    #[test]
    fn email_shared_with_spammed_record() {
        let mut spammed = Application::new(9, ApplicationCore::example2());
        spammed.email = Some("ivan.petrov@example.com".into());
        spammed.spam().unwrap();
        let data = ReferenceData::example().with_application(spammed);
        assert_eq!(
            blocker(&Application::example(), &SubmissionContext::default(), &data),
            Some(ApprovalBlocker::EmailDuplicate)
        );
    }

    #[test]
    fn phone_shared_across_states() {
        let mut rejected = Application::new(4, ApplicationCore::example());
        rejected.email = Some("other@example.com".into());
        rejected.reject().unwrap();
        let data = ReferenceData::example().with_application(rejected);

        let app = Application::example();
        assert!(Validator::default()
            .validate(&app, &SubmissionContext::default(), Lookups::all(&data))
            .unwrap()
            .is_valid());
        assert_eq!(
            blocker(&app, &SubmissionContext::default(), &data),
            Some(ApprovalBlocker::PhoneDuplicate)
        );
    }

    #[test]
    fn serialises_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&ApprovalBlocker::PhoneDuplicate).unwrap(),
            "\"phone_duplicate\""
        );
        assert_eq!(ApprovalBlocker::EmailMissing.to_string(), "email_missing");
    }
}
