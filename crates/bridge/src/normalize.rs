//! Request normalization.
//!
//! Selector strings are trimmed and lowercased before lookup. The two kinds
//! of unknown selector are handled differently:
//!
//! - an unknown **language** falls back to the catalog default and is logged
//! - an unknown **condition** or **role** is rejected with
//!   [`SelectorError::InvalidSelector`] and never substituted

use carebridge_core::error::{SelectorError, SelectorField};
use carebridge_core::message::{Message, Role};
use carebridge_core::persona::{Audience, ConditionId, LanguageCode, PersonaKey};
use carebridge_persona::PersonaCatalog;
use tracing::warn;

use crate::request::RawMessage;

/// Resolve a raw language string, substituting the default when unknown.
pub fn normalize_language(catalog: &PersonaCatalog, raw: &str) -> LanguageCode {
    let language = LanguageCode::new(raw);
    if catalog.has_language(&language) {
        return language;
    }
    fall_back_to_default_language(catalog, raw)
}

fn fall_back_to_default_language(catalog: &PersonaCatalog, requested: &str) -> LanguageCode {
    let fallback = catalog.default_language().clone();
    warn!(
        requested = %requested,
        fallback = %fallback,
        "Unknown language, using default"
    );
    fallback
}

/// Resolve a raw condition string. Unknown conditions are an error.
pub fn normalize_condition(
    catalog: &PersonaCatalog,
    raw: &str,
) -> Result<ConditionId, SelectorError> {
    let condition = ConditionId::new(raw);
    if catalog.has_condition(&condition) {
        return Ok(condition);
    }
    Err(SelectorError::InvalidSelector {
        field: SelectorField::Condition,
        value: raw.to_string(),
        accepted: catalog.conditions().map(|c| c.to_string()).collect(),
    })
}

/// Resolve a raw audience role string. Unknown roles are an error.
pub fn normalize_audience(raw: &str) -> Result<Audience, SelectorError> {
    Audience::parse(raw).ok_or_else(|| SelectorError::InvalidSelector {
        field: SelectorField::Role,
        value: raw.to_string(),
        accepted: Audience::ALL.iter().map(|a| a.to_string()).collect(),
    })
}

/// Resolve the full selector triple into a catalog key.
pub fn normalize_selector(
    catalog: &PersonaCatalog,
    language: &str,
    condition: &str,
    role: &str,
) -> Result<PersonaKey, SelectorError> {
    let language = normalize_language(catalog, language);
    let condition = normalize_condition(catalog, condition)?;
    let audience = normalize_audience(role)?;
    Ok(PersonaKey::new(language, condition, audience))
}

/// Validate message shape, keeping order and content untouched.
///
/// Roles must be one of the wire tokens exactly; content must be present
/// but may be empty.
pub fn normalize_messages(raw: Vec<RawMessage>) -> Result<Vec<Message>, SelectorError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, msg)| {
            if msg.role.is_empty() {
                return Err(SelectorError::InvalidMessage {
                    index,
                    reason: "role must not be empty".into(),
                });
            }
            let role = Role::parse(&msg.role).ok_or_else(|| SelectorError::InvalidMessage {
                index,
                reason: format!(
                    "unknown role '{}'; accepted: {}",
                    msg.role,
                    Role::ALL.map(|r| r.as_str()).join(", ")
                ),
            })?;
            let content = msg.content.ok_or_else(|| SelectorError::InvalidMessage {
                index,
                reason: "content is required".into(),
            })?;
            Ok(Message::new(role, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PersonaCatalog {
        PersonaCatalog::builtin("en").unwrap()
    }

    #[test]
    fn known_language_is_canonicalized() {
        assert_eq!(normalize_language(&catalog(), " RO ").as_str(), "ro");
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let catalog = catalog();
        for raw in ["fr", "", "english", "  DE  "] {
            assert_eq!(normalize_language(&catalog, raw).as_str(), "en", "input {raw:?}");
        }
    }

    #[test]
    fn fallback_uses_configured_default() {
        let catalog = PersonaCatalog::builtin("ro").unwrap();
        assert_eq!(normalize_language(&catalog, "fr").as_str(), "ro");
    }

    #[test]
    fn selector_is_trimmed_and_lowercased() {
        let key = normalize_selector(&catalog(), "EN", "  Parkinsons ", "Carer").unwrap();
        assert_eq!(key.to_string(), "en/parkinsons/carer");
    }

    #[test]
    fn unknown_condition_is_rejected_with_accepted_values() {
        let err = normalize_selector(&catalog(), "en", "diabetes", "patient").unwrap_err();
        assert_eq!(
            err,
            SelectorError::InvalidSelector {
                field: SelectorField::Condition,
                value: "diabetes".into(),
                accepted: vec!["alzheimers".into(), "ms".into(), "parkinsons".into()],
            }
        );
    }

    #[test]
    fn unknown_role_is_rejected_never_substituted() {
        for raw in ["doctor", "", "patients"] {
            let err = normalize_selector(&catalog(), "en", "ms", raw).unwrap_err();
            match err {
                SelectorError::InvalidSelector { field, accepted, .. } => {
                    assert_eq!(field, SelectorField::Role);
                    assert_eq!(accepted, vec!["patient".to_string(), "carer".to_string()]);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn unknown_language_does_not_mask_bad_condition() {
        let err = normalize_selector(&catalog(), "xx", "", "patient").unwrap_err();
        assert!(matches!(
            err,
            SelectorError::InvalidSelector { field: SelectorField::Condition, .. }
        ));
    }

    #[test]
    fn messages_keep_order_and_empty_content() {
        let raw = vec![
            RawMessage::new("user", "I feel dizzy"),
            RawMessage::new("assistant", ""),
            RawMessage::new("user", "Still dizzy"),
        ];
        let messages = normalize_messages(raw).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::user("I feel dizzy"),
                Message::assistant(""),
                Message::user("Still dizzy"),
            ]
        );
    }

    #[test]
    fn empty_role_is_rejected() {
        let raw = vec![RawMessage::new("user", "hi"), RawMessage::new("", "hello")];
        let err = normalize_messages(raw).unwrap_err();
        assert_eq!(
            err,
            SelectorError::InvalidMessage {
                index: 1,
                reason: "role must not be empty".into()
            }
        );
    }

    #[test]
    fn unknown_message_role_is_rejected() {
        let err = normalize_messages(vec![RawMessage::new("tool", "{}")]).unwrap_err();
        match err {
            SelectorError::InvalidMessage { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("'tool'"));
                assert!(reason.contains("system, user, assistant"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_content_is_rejected() {
        let raw = vec![RawMessage {
            role: "user".into(),
            content: None,
        }];
        assert!(matches!(
            normalize_messages(raw),
            Err(SelectorError::InvalidMessage { index: 0, .. })
        ));
    }
}
