//! Inbound interaction payload.
//!
//! Only `type` is required. The rest of the payload is kept as parsed JSON
//! and handed to command handlers untouched; the accessors below read the
//! documented fields without validating them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PayloadError;

/// Interaction type for Discord's liveness probe.
pub const PING: u64 = 1;

/// Interaction type for slash commands.
pub const APPLICATION_COMMAND: u64 = 2;

/// A parsed Discord interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Interaction {
    /// Interaction type (1 = ping, 2 = application command)
    pub kind: u64,

    payload: Value,
}

impl TryFrom<Value> for Interaction {
    type Error = PayloadError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let object = payload.as_object().ok_or(PayloadError::NotAnObject)?;
        let kind = object
            .get("type")
            .and_then(Value::as_u64)
            .ok_or(PayloadError::MissingType)?;

        Ok(Interaction { kind, payload })
    }
}

impl From<Interaction> for Value {
    fn from(interaction: Interaction) -> Self {
        interaction.payload
    }
}

impl Interaction {
    /// Parse an interaction from the raw (already verified) request body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    pub fn is_ping(&self) -> bool {
        self.kind == PING
    }

    pub fn is_command(&self) -> bool {
        self.kind == APPLICATION_COMMAND
    }

    /// The full payload as received.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Top-level field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// `data` of the interaction, if present and not null.
    pub fn data(&self) -> Option<&Value> {
        self.get("data").filter(|d| !d.is_null())
    }

    /// Name of the invoked command, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.data()?.get("name")?.as_str()
    }

    /// Command options in the order the user supplied them.
    pub fn options(&self) -> &[Value] {
        self.data()
            .and_then(|d| d.get("options"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Value of the named option.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options()
            .iter()
            .find(|o| o.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|o| o.get("value"))
    }

    /// ID of the invoking user.
    ///
    /// Guild interactions carry `member.user`, DM interactions carry `user`.
    pub fn user_id(&self) -> Option<&str> {
        let member_user = self.get("member").and_then(|m| m.get("user"));
        member_user
            .and_then(|u| u.get("id"))
            .or_else(|| self.get("user").and_then(|u| u.get("id")))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ping() {
        let interaction = Interaction::from_slice(br#"{"type": 1}"#).unwrap();
        assert!(interaction.is_ping());
        assert!(!interaction.is_command());
        assert_eq!(interaction.command_name(), None);
        assert!(interaction.options().is_empty());
    }

    #[test]
    fn test_parse_command() {
        let body = br#"{
            "type": 2,
            "id": "1122",
            "token": "abc",
            "data": {
                "id": "99",
                "name": "greet",
                "options": [
                    {"name": "who", "type": 3, "value": "world"},
                    {"name": "times", "type": 4, "value": 3}
                ]
            },
            "member": {"nick": "bob", "user": {"id": "42", "username": "bob"}}
        }"#;

        let interaction = Interaction::from_slice(body).unwrap();

        assert!(interaction.is_command());
        assert_eq!(interaction.command_name(), Some("greet"));
        assert_eq!(interaction.user_id(), Some("42"));
        assert_eq!(interaction.options().len(), 2);
        assert_eq!(interaction.options()[0]["name"], "who");
        assert_eq!(interaction.option("times"), Some(&Value::from(3)));
        assert_eq!(interaction.option("missing"), None);
        assert_eq!(interaction.get("token"), Some(&Value::from("abc")));
        assert_eq!(interaction.data().unwrap()["id"], "99");
    }

    #[test]
    fn test_user_id_falls_back_to_dm_user() {
        let body = br#"{"type": 2, "data": {"name": "x"}, "user": {"id": "7"}}"#;
        let interaction = Interaction::from_slice(body).unwrap();
        assert_eq!(interaction.user_id(), Some("7"));
    }

    #[test]
    fn test_parse_missing_type() {
        assert!(Interaction::from_slice(br#"{"data": {"name": "greet"}}"#).is_err());
        assert!(Interaction::from_slice(br#"{"type": "one"}"#).is_err());
        assert!(Interaction::from_slice(br#"[{"type": 1}]"#).is_err());
        assert!(Interaction::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_documented_fields_are_not_validated() {
        let bodies: [&[u8]; 5] = [
            br#"{"type":2,"data":{"id":"1"}}"#,
            br#"{"type":2,"data":{"name":"greet"},"member":{"user":{"username":"x"}}}"#,
            br#"{"type":2,"data":{"name":"greet","options":[{"value":1}]}}"#,
            br#"{"type":2,"data":null,"member":{"user":{"id":42}}}"#,
            br#"{"type":3,"data":{"custom_id":"btn","component_type":2}}"#,
        ];

        for body in bodies {
            assert!(Interaction::from_slice(body).is_ok());
        }

        let numeric_id =
            Interaction::from_slice(br#"{"type":2,"data":null,"member":{"user":{"id":42}}}"#)
                .unwrap();
        assert_eq!(numeric_id.user_id(), None);
        assert_eq!(numeric_id.command_name(), None);

        let unnamed_option =
            Interaction::from_slice(br#"{"type":2,"data":{"name":"g","options":[{"value":1}]}}"#)
                .unwrap();
        assert_eq!(unnamed_option.options().len(), 1);
        assert_eq!(unnamed_option.option("value"), None);
    }

    #[test]
    fn test_serialization_preserves_payload() {
        let original = json!({
            "type": 2,
            "guild_id": "555",
            "locale": "en-US",
            "data": {"name": "sub", "type": 1, "options": []}
        });
        let interaction = Interaction::from_slice(original.to_string().as_bytes()).unwrap();

        assert_eq!(serde_json::to_value(&interaction).unwrap(), original);
    }
}
