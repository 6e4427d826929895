//! # wardbook-contracts
//!
//! Shared types for wardbook: patient/visit/note/department records, the
//! action and capability vocabulary, usage-log rows, and the error type.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod action;
pub mod capability;
pub mod error;
pub mod record;
pub mod usage;

#[cfg(test)]
mod tests {
    use super::*;
    use action::Action;
    use capability::{Capability, CapabilitySet};
    use error::WardError;
    use record::{Demographics, Department, Patient, Visit, VisitId};

    fn visit(id: &str, time: &str) -> Visit {
        Visit {
            id: VisitId(id.to_string()),
            time: time.to_string(),
            department: "ER".to_string(),
            demographics: Demographics {
                gender: "F".to_string(),
                race: "Asian".to_string(),
                age: 40,
                ethnicity: "Non-Hispanic".to_string(),
                insurance: "Medicare".to_string(),
                zip_code: "02139".to_string(),
                chief_complaint: "Cough".to_string(),
            },
        }
    }

    // ── CapabilitySet ────────────────────────────────────────────────────────

    #[test]
    fn capability_set_grant_and_has() {
        let mut caps = CapabilitySet::default();
        let view = Capability::new("view_note");
        let count = Capability::new("count_visits");

        assert!(!caps.has(&view));
        assert!(!caps.has(&count));

        caps.grant(view.clone());
        assert!(caps.has(&view));
        assert!(!caps.has(&count));
    }

    #[test]
    fn capability_set_from_actions_permits_exactly_those() {
        let caps: CapabilitySet = [Action::CountVisits, Action::GenerateStatistics]
            .into_iter()
            .collect();

        assert!(caps.permits(Action::CountVisits));
        assert!(caps.permits(Action::GenerateStatistics));
        assert!(!caps.permits(Action::AddPatient));
        assert_eq!(caps.all().count(), 2);
    }

    #[test]
    fn capability_set_duplicate_grant_is_idempotent() {
        let mut caps = CapabilitySet::default();
        caps.grant(Action::ViewNote.into());
        caps.grant(Action::ViewNote.into());
        assert_eq!(caps.all().count(), 1);
    }

    // ── Action ───────────────────────────────────────────────────────────────

    #[test]
    fn action_parses_its_own_name() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn action_rejects_unknown_name() {
        match "delete_everything".parse::<Action>() {
            Err(WardError::InvalidField { field, value }) => {
                assert_eq!(field, "action");
                assert_eq!(value, "delete_everything");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn action_serializes_as_snake_case() {
        let json = serde_json::to_string(&Action::GenerateStatistics).unwrap();
        assert_eq!(json, "\"generate_statistics\"");
    }

    // ── Records ──────────────────────────────────────────────────────────────

    #[test]
    fn most_recent_visit_scans_instead_of_trusting_order() {
        let mut p = Patient::new("P1");
        p.add_visit(visit("v1", "2024-05-18"));
        p.add_visit(visit("v2", "2023-01-02"));
        p.add_visit(visit("v3", "2024-01-01"));

        assert_eq!(p.most_recent_visit().unwrap().id.as_str(), "v1");
    }

    #[test]
    fn most_recent_visit_tie_returns_last_inserted() {
        let mut p = Patient::new("P1");
        p.add_visit(visit("first", "2024-05-18"));
        p.add_visit(visit("second", "2024-05-18"));

        assert_eq!(p.most_recent_visit().unwrap().id.as_str(), "second");
        assert!(Patient::new("P2").most_recent_visit().is_none());
    }

    #[test]
    fn department_membership_has_no_duplicates() {
        let mut d = Department::new("ER");
        d.add_patient("P1");
        d.add_patient("P1");
        d.add_patient("P2");
        assert_eq!(d.patients.len(), 2);
        assert!(d.has_patient("P2"));
    }

    #[test]
    fn visit_date_truncates_time_part() {
        assert_eq!(visit("v", "2024-05-18 09:30").date(), "2024-05-18");
        assert_eq!(visit("v", "soon").date(), "soon");
    }

    #[test]
    fn generated_visit_ids_are_unique() {
        let ids: std::collections::HashSet<VisitId> = (0..100).map(|_| VisitId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── WardError display messages ───────────────────────────────────────────

    #[test]
    fn error_permission_denied_display() {
        let err = WardError::PermissionDenied {
            role: "management".to_string(),
            action: "add_patient".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("management"));
        assert!(msg.contains("add_patient"));
    }

    #[test]
    fn error_write_failed_display() {
        let err = WardError::WriteFailed {
            path: "data/Patient_data.csv".to_string(),
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to write"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn error_authentication_is_generic() {
        assert_eq!(WardError::AuthenticationFailed.to_string(), "invalid username or password");
    }
}
