use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display-layer rule: a new timestamp header is shown whenever the gap
/// from the previous message exceeds this many milliseconds.
pub const HEADER_GAP_MS: i64 = 300_000;

/// One message in a two-party conversation, optionally scoped to a case.
///
/// Immutable once created except for `read`, settable only by the receiver.
/// `seq` is the insertion-order column used as the stable tiebreak when two
/// messages share a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Message {
    pub id: Uuid,
    pub seq: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub case_id: Option<Uuid>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// API response shape for a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: i64,
    pub receiver_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            case_id: m.case_id,
            content: m.content,
            read: m.read,
            created_at: m.created_at,
        }
    }
}

/// Body for `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Message content is required"))
    )]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
}

/// Whether message `i` of a conversation (ordered oldest first) starts a
/// new timestamp group: true for the first message and whenever the gap
/// from the predecessor exceeds [`HEADER_GAP_MS`].
pub fn needs_header(messages: &[Message], i: usize) -> bool {
    if i >= messages.len() {
        return false;
    }
    if i == 0 {
        return true;
    }
    let gap = messages[i]
        .created_at
        .signed_duration_since(messages[i - 1].created_at);
    gap.num_milliseconds() > HEADER_GAP_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn msg(at: DateTime<Utc>, seq: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            seq,
            sender_id: 1,
            receiver_id: 2,
            case_id: None,
            content: format!("message {seq}"),
            read: false,
            created_at: at,
        }
    }

    #[test]
    fn first_message_always_gets_header() {
        let t0 = Utc::now();
        let messages = vec![msg(t0, 1)];
        assert!(needs_header(&messages, 0));
    }

    #[test]
    fn gap_over_five_minutes_gets_header() {
        let t0 = Utc::now();
        let messages = vec![
            msg(t0, 1),
            msg(t0 + Duration::minutes(2), 2),
            msg(t0 + Duration::minutes(2) + Duration::milliseconds(300_001), 3),
        ];
        assert!(needs_header(&messages, 0));
        assert!(!needs_header(&messages, 1));
        assert!(needs_header(&messages, 2));
    }

    #[test]
    fn gap_of_exactly_five_minutes_does_not_get_header() {
        let t0 = Utc::now();
        let messages = vec![msg(t0, 1), msg(t0 + Duration::milliseconds(HEADER_GAP_MS), 2)];
        assert!(!needs_header(&messages, 1));
    }

    #[test]
    fn out_of_range_index_is_false() {
        let messages: Vec<Message> = vec![];
        assert!(!needs_header(&messages, 0));
        assert!(!needs_header(&messages, 5));
    }
}
