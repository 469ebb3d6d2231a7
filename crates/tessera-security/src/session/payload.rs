use super::error::SessionError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the session itself; never taken from principal attributes
const RESERVED_KEYS: [&str; 2] = ["iat", "expires"];

/// The content of a session token: public principal attributes plus timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Principal attributes, hidden fields already removed
    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    /// When the session was issued
    #[serde(default)]
    pub iat: Option<DateTime<Utc>>,

    /// When the session stops being valid
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl SessionPayload {
    /// Build a payload from `attributes`, dropping every key in `hidden`.
    pub fn issue(
        mut attributes: Map<String, Value>,
        hidden: &[String],
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, SessionError> {
        let expires = issued_at
            .checked_add_signed(lifetime)
            .ok_or(SessionError::LifetimeOverflow)?;

        for key in hidden {
            attributes.remove(key);
        }
        for key in RESERVED_KEYS {
            attributes.remove(key);
        }

        Ok(Self {
            attributes,
            iat: Some(issued_at),
            expires: Some(expires),
        })
    }

    /// Whether the session is still live at `now`.
    ///
    /// A payload without an expiry is never valid, and one expiring exactly
    /// at `now` has already expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires, Some(expires) if expires > now)
    }

    /// The identity attribute, ignoring nulls.
    pub fn identity(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|value| !value.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn payload_expiring_at(expires: DateTime<Utc>) -> SessionPayload {
        SessionPayload {
            attributes: Map::new(),
            iat: None,
            expires: Some(expires),
        }
    }

    #[test]
    fn test_issue_strips_hidden_and_reserved_keys() {
        let now = Utc::now();
        let payload = SessionPayload::issue(
            attributes(json!({
                "id": 7,
                "email": "a@example.com",
                "password": "hunter2",
                "expires": "2099-01-01T00:00:00Z",
            })),
            &["password".to_string()],
            now,
            Duration::minutes(60),
        )
        .unwrap();

        assert_eq!(payload.attributes.get("id"), Some(&json!(7)));
        assert!(!payload.attributes.contains_key("password"));
        assert!(!payload.attributes.contains_key("expires"));
        assert_eq!(payload.iat, Some(now));
        assert_eq!(payload.expires, Some(now + Duration::minutes(60)));
    }

    #[test]
    fn test_issue_reports_expiry_overflow() {
        let err = SessionPayload::issue(
            attributes(json!({"id": 1})),
            &[],
            DateTime::<Utc>::MAX_UTC,
            Duration::minutes(1),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::LifetimeOverflow));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let micro = Duration::microseconds(1);

        assert!(!payload_expiring_at(now).is_valid_at(now));
        assert!(!payload_expiring_at(now - micro).is_valid_at(now));
        assert!(payload_expiring_at(now + micro).is_valid_at(now));
    }

    #[test]
    fn test_missing_expiry_is_invalid() {
        let payload: SessionPayload = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(payload.expires.is_none());
        assert!(!payload.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_json_shape_is_flat() {
        let now = Utc::now();
        let payload = SessionPayload::issue(
            attributes(json!({"id": 1, "name": "Ada"})),
            &[],
            now,
            Duration::minutes(1),
        )
        .unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Ada");
        assert!(value["iat"].is_string());
        assert!(value["expires"].is_string());

        let decoded: SessionPayload = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_identity_ignores_null() {
        let payload: SessionPayload =
            serde_json::from_str(r#"{"id": null, "uuid": "abc"}"#).unwrap();
        assert!(payload.identity("id").is_none());
        assert!(payload.identity("missing").is_none());
        assert_eq!(payload.identity("uuid"), Some(&json!("abc")));
    }
}
