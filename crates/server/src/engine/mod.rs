//! Status transition engine.
//!
//! Pure validation of every case and case-request state change: given the
//! stored entity, the requested action, and the authenticated actor, either
//! the target status comes back or the call fails with `InvalidTransition`,
//! `Forbidden`, or `MissingField` before any storage is touched. Persistence
//! commits the result with a conditional write (`repo::case`,
//! `repo::case_request`), so a concurrent loser still surfaces as
//! `InvalidTransition`.

pub mod fanout;

use chrono::{DateTime, Utc};
use shared_types::{
    AcceptCaseRequestRequest, Actor, AppError, Case, CaseRequest, CaseStatus, RequestStatus, Role,
};

/// Action on a case request. Both are lawyer-only and one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Reject,
}

/// Action on a case.
#[derive(Debug, Clone)]
pub enum CaseAction {
    Submit,
    Review,
    Approve {
        pnr: Option<String>,
        hearing_date: Option<DateTime<Utc>>,
    },
    Reject,
}

/// Column values for a case constructed from an accepted request.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub case_type: String,
    pub victim_name: String,
    pub victim_phone: String,
    pub victim_email: Option<String>,
    pub accused_name: String,
    pub accused_phone: Option<String>,
    pub accused_address: Option<String>,
    pub client_id: i64,
    pub lawyer_id: Option<i64>,
    pub police_station_id: String,
    pub city: String,
    pub status: CaseStatus,
    pub documents: Vec<String>,
}

/// Validate a case-request transition. Status precondition is checked
/// before ownership so a second attempt on a resolved request always
/// observes `InvalidTransition`, whoever the actor is.
pub fn request_transition(
    request: &CaseRequest,
    action: RequestAction,
    actor: &Actor,
) -> Result<RequestStatus, AppError> {
    if request.status != RequestStatus::Pending {
        return Err(AppError::invalid_transition(format!(
            "Case request is already {}",
            request.status
        )));
    }

    if actor.role != Role::Lawyer || actor.id != request.lawyer_id {
        return Err(AppError::forbidden(
            "Only the lawyer this request is directed at may respond to it",
        ));
    }

    Ok(match action {
        RequestAction::Accept => RequestStatus::Accepted,
        RequestAction::Reject => RequestStatus::Rejected,
    })
}

/// Validate a case transition per the authorization table. Returns the
/// target status; the caller commits it with a conditional write.
pub fn case_transition(
    case: &Case,
    action: &CaseAction,
    actor: &Actor,
) -> Result<CaseStatus, AppError> {
    match action {
        CaseAction::Submit => {
            require_status(case, &[CaseStatus::Draft])?;
            require_owning_client(case, actor)?;
            Ok(CaseStatus::Submitted)
        }
        CaseAction::Review => {
            require_status(case, &[CaseStatus::Submitted])?;
            require_station_reviewer(case, actor)?;
            Ok(CaseStatus::UnderReview)
        }
        CaseAction::Approve { pnr, hearing_date } => {
            require_status(case, &[CaseStatus::UnderReview])?;
            require_station_reviewer(case, actor)?;
            if pnr.as_deref().map_or(true, |p| p.trim().is_empty()) {
                return Err(AppError::missing_field("pnr is required for approval"));
            }
            if hearing_date.is_none() {
                return Err(AppError::missing_field(
                    "hearing_date is required for approval",
                ));
            }
            Ok(CaseStatus::Approved)
        }
        CaseAction::Reject => {
            // Rejecting straight from `submitted` is allowed; review is not
            // a mandatory stop on the way to rejection.
            require_status(case, &[CaseStatus::Submitted, CaseStatus::UnderReview])?;
            require_station_reviewer(case, actor)?;
            Ok(CaseStatus::Rejected)
        }
    }
}

/// Construct the case created by accepting `request`. The station code is
/// mandatory; the remaining detail fields decide whether the case starts
/// in `submitted` or as a `draft` the client completes later.
pub fn case_from_accepted_request(
    request: &CaseRequest,
    details: &AcceptCaseRequestRequest,
) -> Result<NewCase, AppError> {
    let police_station_id = details
        .police_station_id
        .clone()
        .ok_or_else(|| AppError::missing_field("police_station_id is required to accept"))?;

    let status = if details.has_complete_details() {
        CaseStatus::Submitted
    } else {
        CaseStatus::Draft
    };

    Ok(NewCase {
        title: request.title.clone(),
        description: request.description.clone(),
        case_type: details.case_type.clone().unwrap_or_else(|| "general".into()),
        victim_name: request.victim_name.clone(),
        // The reporting client is the victim's contact until a dedicated
        // number is supplied.
        victim_phone: details
            .victim_phone
            .clone()
            .unwrap_or_else(|| request.client_phone.clone()),
        victim_email: request.client_email.clone(),
        accused_name: request.accused_name.clone(),
        accused_phone: details.accused_phone.clone(),
        accused_address: details.accused_address.clone(),
        client_id: request.client_id,
        lawyer_id: Some(request.lawyer_id),
        police_station_id,
        city: details.city.clone().unwrap_or_default(),
        status,
        documents: request.documents.clone(),
    })
}

fn require_status(case: &Case, allowed: &[CaseStatus]) -> Result<(), AppError> {
    if allowed.contains(&case.status) {
        Ok(())
    } else {
        Err(AppError::invalid_transition(format!(
            "Case is {}; this action is not legal from that state",
            case.status
        )))
    }
}

fn require_owning_client(case: &Case, actor: &Actor) -> Result<(), AppError> {
    if actor.role == Role::Client && actor.id == case.client_id {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the client who owns this case may do that",
        ))
    }
}

fn require_station_reviewer(case: &Case, actor: &Actor) -> Result<(), AppError> {
    let at_station = actor.police_station_id.as_deref() == Some(case.police_station_id.as_str());
    if actor.role == Role::Police && at_station {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only a reviewer at the case's police station may do that",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::AppErrorKind;
    use uuid::Uuid;

    fn case(status: CaseStatus) -> Case {
        Case {
            id: Uuid::new_v4(),
            title: "Stolen vehicle".into(),
            description: "Car taken from the parking lot overnight".into(),
            case_type: "theft".into(),
            victim_name: "Asha Verma".into(),
            victim_phone: "+91-9800000001".into(),
            victim_email: None,
            accused_name: "Unknown".into(),
            accused_phone: None,
            accused_address: None,
            client_id: 10,
            lawyer_id: Some(20),
            police_station_id: "PS-014".into(),
            city: "Pune".into(),
            status,
            pnr: None,
            hearing_date: None,
            documents: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_request() -> CaseRequest {
        CaseRequest {
            id: Uuid::new_v4(),
            client_id: 10,
            lawyer_id: 20,
            title: "Property dispute".into(),
            description: "Neighbour encroaching on boundary wall".into(),
            victim_name: "Asha Verma".into(),
            accused_name: "R. Shah".into(),
            client_phone: "+91-9800000001".into(),
            client_email: Some("asha@example.com".into()),
            documents: vec!["doc-1".into()],
            status: RequestStatus::Pending,
            lawyer_response: None,
            case_type: None,
            victim_phone: None,
            accused_phone: None,
            city: None,
            police_station_id: None,
            created_at: Utc::now(),
        }
    }

    fn approve_action() -> CaseAction {
        CaseAction::Approve {
            pnr: Some("PNR-2026-0001".into()),
            hearing_date: Some(Utc::now()),
        }
    }

    // ── Case request transitions ────────────────────────────────────

    #[test]
    fn owning_lawyer_accepts_pending_request() {
        let req = pending_request();
        let status = request_transition(&req, RequestAction::Accept, &Actor::lawyer(20)).unwrap();
        assert_eq!(status, RequestStatus::Accepted);
    }

    #[test]
    fn owning_lawyer_rejects_pending_request() {
        let req = pending_request();
        let status = request_transition(&req, RequestAction::Reject, &Actor::lawyer(20)).unwrap();
        assert_eq!(status, RequestStatus::Rejected);
    }

    #[test]
    fn other_lawyer_cannot_respond() {
        let req = pending_request();
        let err = request_transition(&req, RequestAction::Accept, &Actor::lawyer(99)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn client_cannot_respond_to_own_request() {
        let req = pending_request();
        let err = request_transition(&req, RequestAction::Accept, &Actor::client(10)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn resolved_request_fails_regardless_of_actor() {
        let mut req = pending_request();
        req.status = RequestStatus::Accepted;
        // Even the owning lawyer gets InvalidTransition, not Forbidden
        let err = request_transition(&req, RequestAction::Reject, &Actor::lawyer(20)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidTransition);
        let err = request_transition(&req, RequestAction::Accept, &Actor::client(10)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidTransition);
    }

    // ── Case transitions ────────────────────────────────────────────

    #[test]
    fn client_submits_own_draft() {
        let c = case(CaseStatus::Draft);
        let status = case_transition(&c, &CaseAction::Submit, &Actor::client(10)).unwrap();
        assert_eq!(status, CaseStatus::Submitted);
    }

    #[test]
    fn other_client_cannot_submit() {
        let c = case(CaseStatus::Draft);
        let err = case_transition(&c, &CaseAction::Submit, &Actor::client(11)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn submit_requires_draft() {
        let c = case(CaseStatus::Submitted);
        let err = case_transition(&c, &CaseAction::Submit, &Actor::client(10)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidTransition);
    }

    #[test]
    fn station_reviewer_moves_submitted_to_under_review() {
        let c = case(CaseStatus::Submitted);
        let status =
            case_transition(&c, &CaseAction::Review, &Actor::police(30, "PS-014")).unwrap();
        assert_eq!(status, CaseStatus::UnderReview);
    }

    #[test]
    fn reviewer_at_other_station_is_forbidden() {
        let c = case(CaseStatus::Submitted);
        let err =
            case_transition(&c, &CaseAction::Review, &Actor::police(30, "PS-099")).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn approve_with_pnr_and_hearing_date() {
        let c = case(CaseStatus::UnderReview);
        let status =
            case_transition(&c, &approve_action(), &Actor::police(30, "PS-014")).unwrap();
        assert_eq!(status, CaseStatus::Approved);
    }

    #[test]
    fn approve_without_pnr_is_missing_field() {
        let c = case(CaseStatus::UnderReview);
        let action = CaseAction::Approve {
            pnr: None,
            hearing_date: Some(Utc::now()),
        };
        let err = case_transition(&c, &action, &Actor::police(30, "PS-014")).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::MissingField);
    }

    #[test]
    fn approve_without_hearing_date_is_missing_field() {
        let c = case(CaseStatus::UnderReview);
        let action = CaseAction::Approve {
            pnr: Some("PNR-2026-0001".into()),
            hearing_date: None,
        };
        let err = case_transition(&c, &action, &Actor::police(30, "PS-014")).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::MissingField);
    }

    #[test]
    fn blank_pnr_counts_as_missing() {
        let c = case(CaseStatus::UnderReview);
        let action = CaseAction::Approve {
            pnr: Some("   ".into()),
            hearing_date: Some(Utc::now()),
        };
        let err = case_transition(&c, &action, &Actor::police(30, "PS-014")).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::MissingField);
    }

    #[test]
    fn approve_requires_under_review() {
        let c = case(CaseStatus::Submitted);
        let err =
            case_transition(&c, &approve_action(), &Actor::police(30, "PS-014")).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidTransition);
    }

    #[test]
    fn reject_allowed_from_submitted_and_under_review() {
        for status in [CaseStatus::Submitted, CaseStatus::UnderReview] {
            let c = case(status);
            let next =
                case_transition(&c, &CaseAction::Reject, &Actor::police(30, "PS-014")).unwrap();
            assert_eq!(next, CaseStatus::Rejected);
        }
    }

    #[test]
    fn terminal_states_never_regress() {
        for status in [CaseStatus::Approved, CaseStatus::Rejected] {
            let c = case(status);
            for action in [
                CaseAction::Submit,
                CaseAction::Review,
                approve_action(),
                CaseAction::Reject,
            ] {
                let err =
                    case_transition(&c, &action, &Actor::police(30, "PS-014")).unwrap_err();
                assert_eq!(err.kind, AppErrorKind::InvalidTransition);
            }
        }
    }

    #[test]
    fn client_cannot_review_or_approve() {
        let c = case(CaseStatus::Submitted);
        let err = case_transition(&c, &CaseAction::Review, &Actor::client(10)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);

        let c = case(CaseStatus::UnderReview);
        let err = case_transition(&c, &approve_action(), &Actor::client(10)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    // ── Case construction from an accepted request ──────────────────

    #[test]
    fn complete_details_produce_submitted_case() {
        let req = pending_request();
        let details = AcceptCaseRequestRequest {
            lawyer_response: Some("Taking this on".into()),
            case_type: Some("property".into()),
            victim_phone: Some("+91-9800000002".into()),
            accused_phone: None,
            accused_address: Some("12 Lake Road".into()),
            city: Some("Pune".into()),
            police_station_id: Some("PS-014".into()),
        };
        let new_case = case_from_accepted_request(&req, &details).unwrap();
        assert_eq!(new_case.status, CaseStatus::Submitted);
        assert_eq!(new_case.client_id, req.client_id);
        assert_eq!(new_case.lawyer_id, Some(req.lawyer_id));
        assert_eq!(new_case.title, req.title);
        assert_eq!(new_case.victim_phone, "+91-9800000002");
    }

    #[test]
    fn incomplete_details_produce_draft_case() {
        let req = pending_request();
        let details = AcceptCaseRequestRequest {
            police_station_id: Some("PS-014".into()),
            ..Default::default()
        };
        let new_case = case_from_accepted_request(&req, &details).unwrap();
        assert_eq!(new_case.status, CaseStatus::Draft);
        // Client contact carries over as the victim contact fallback
        assert_eq!(new_case.victim_phone, req.client_phone);
    }

    #[test]
    fn acceptance_without_station_is_missing_field() {
        let req = pending_request();
        let err =
            case_from_accepted_request(&req, &AcceptCaseRequestRequest::default()).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::MissingField);
    }
}
