//! Notification fan-out.
//!
//! Turns one committed transition event into the per-recipient notification
//! rows the event owes, plus a best-effort email for case approval and
//! rejection. `plan` is pure and unit-tested; `dispatch` runs strictly
//! after the state commit and never propagates its failures to the caller.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{Case, CaseRequest, Message, NotificationType};

/// A committed state change the fan-out reacts to.
#[derive(Debug, Clone)]
pub enum TransitionEvent {
    CaseApproved(Case),
    CaseRejected {
        case: Case,
        reason: Option<String>,
    },
    /// A case came into existence from an accepted request.
    CaseCreated(Case),
    CaseRequestCreated(CaseRequest),
    MessageSent(Message),
}

/// An unpersisted notification row.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub case_id: Option<Uuid>,
    pub case_request_id: Option<Uuid>,
}

/// Compute the (recipient, message) set for one event.
pub fn plan(event: &TransitionEvent) -> Vec<NotificationDraft> {
    match event {
        TransitionEvent::CaseApproved(case) => {
            let mut drafts = Vec::new();
            let pnr = case.pnr.as_deref().unwrap_or("(unassigned)");
            for user_id in case_parties(case) {
                drafts.push(NotificationDraft {
                    user_id,
                    title: "Case approved".into(),
                    message: format!("Case '{}' has been approved. PNR: {}.", case.title, pnr),
                    notification_type: NotificationType::CaseApproved,
                    case_id: Some(case.id),
                    case_request_id: None,
                });
            }
            if let Some(hearing) = case.hearing_date {
                for user_id in case_parties(case) {
                    drafts.push(NotificationDraft {
                        user_id,
                        title: "Hearing scheduled".into(),
                        message: format!(
                            "A hearing for case '{}' is scheduled on {}.",
                            case.title,
                            hearing.format("%d %b %Y %H:%M UTC"),
                        ),
                        notification_type: NotificationType::HearingScheduled,
                        case_id: Some(case.id),
                        case_request_id: None,
                    });
                }
            }
            drafts
        }
        TransitionEvent::CaseRejected { case, reason } => {
            let message = match reason {
                Some(reason) => format!(
                    "Case '{}' was rejected by the police station: {}",
                    case.title, reason
                ),
                None => format!("Case '{}' was rejected by the police station.", case.title),
            };
            case_parties(case)
                .into_iter()
                .map(|user_id| NotificationDraft {
                    user_id,
                    title: "Case rejected".into(),
                    message: message.clone(),
                    notification_type: NotificationType::CaseRejected,
                    case_id: Some(case.id),
                    case_request_id: None,
                })
                .collect()
        }
        TransitionEvent::CaseCreated(case) => vec![NotificationDraft {
            user_id: case.client_id,
            title: "Case registered".into(),
            message: format!(
                "Your request was accepted and case '{}' has been registered.",
                case.title
            ),
            notification_type: NotificationType::CaseCreated,
            case_id: Some(case.id),
            case_request_id: None,
        }],
        TransitionEvent::CaseRequestCreated(request) => vec![NotificationDraft {
            user_id: request.lawyer_id,
            title: "New case request".into(),
            message: format!(
                "You have received a new case request: '{}'.",
                request.title
            ),
            notification_type: NotificationType::CaseRequest,
            case_id: None,
            case_request_id: Some(request.id),
        }],
        TransitionEvent::MessageSent(message) => vec![NotificationDraft {
            user_id: message.receiver_id,
            title: "New message".into(),
            message: preview(&message.content),
            notification_type: NotificationType::NewMessage,
            case_id: message.case_id,
            case_request_id: None,
        }],
    }
}

/// Persist the planned notifications and fire best-effort emails.
///
/// Called only after the transition is durably committed. Every failure in
/// here is logged and swallowed: in-app delivery of the remaining rows and
/// the already-committed transition are never rolled back.
#[tracing::instrument(skip_all)]
pub async fn dispatch(pool: &Pool<Postgres>, event: &TransitionEvent) {
    for draft in plan(event) {
        if let Err(e) = crate::repo::notification::create_from_draft(pool, &draft).await {
            tracing::error!(
                error = %e,
                user_id = draft.user_id,
                kind = draft.notification_type.as_str(),
                "Failed to persist notification"
            );
        }
    }

    match event {
        TransitionEvent::CaseApproved(case) => send_status_emails(pool, case, true).await,
        TransitionEvent::CaseRejected { case, .. } => send_status_emails(pool, case, false).await,
        _ => {}
    }
}

/// Email the client and lawyer about an approval/rejection. Gated by the
/// mailgun feature flag; delivery errors are logged inside the mailer.
async fn send_status_emails(pool: &Pool<Postgres>, case: &Case, approved: bool) {
    if !crate::config::feature_flags().mailgun {
        return;
    }

    for user_id in case_parties(case) {
        match crate::repo::user::find_by_id(pool, user_id).await {
            Ok(Some(user)) => {
                crate::mailgun::send_case_status_email(&user.email, case, approved).await;
            }
            Ok(None) => tracing::warn!(user_id, "Email recipient no longer exists"),
            Err(e) => tracing::error!(error = %e, user_id, "Failed to load email recipient"),
        }
    }
}

/// Client plus lawyer (when assigned), in that order.
fn case_parties(case: &Case) -> Vec<i64> {
    let mut parties = vec![case.client_id];
    if let Some(lawyer_id) = case.lawyer_id {
        parties.push(lawyer_id);
    }
    parties
}

const PREVIEW_LEN: usize = 80;

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LEN {
        content.to_string()
    } else {
        let cut: String = content.chars().take(PREVIEW_LEN).collect();
        format!("{cut}…")
    }
}
