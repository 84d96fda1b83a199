//! Data Transfer Objects - request/response types for the API.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Trim a string field, treating blank input as absent.
fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Like [`trimmed`], but keeps an explicit `null` apart from a missing key.
fn nullable_trimmed<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    trimmed(deserializer).map(Some)
}

/// A JSON scalar as form-style clients send it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// `None` for blank text, `Some(Err)` for anything that is not an integer.
    fn integer(self) -> Option<Result<i64, ()>> {
        match self {
            Scalar::Int(n) => Some(Ok(n)),
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(Ok(f as i64)),
            Scalar::Text(s) if s.trim().is_empty() => None,
            Scalar::Text(s) => Some(s.trim().parse().map_err(|_| ())),
            _ => Some(Err(())),
        }
    }

    /// Accepts `true`/`false`, `1`/`0` and their string forms.
    fn boolean(self) -> Option<Result<bool, ()>> {
        match self {
            Scalar::Bool(b) => Some(Ok(b)),
            Scalar::Int(1) => Some(Ok(true)),
            Scalar::Int(0) => Some(Ok(false)),
            Scalar::Text(s) => match s.trim() {
                "" => None,
                "1" | "true" => Some(Ok(true)),
                "0" | "false" => Some(Ok(false)),
                _ => Some(Err(())),
            },
            _ => Some(Err(())),
        }
    }
}

fn lenient<'de, D, T>(
    deserializer: D,
    convert: fn(Scalar) -> Option<Result<T, ()>>,
    message: &'static str,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Scalar>::deserialize(deserializer)? else {
        return Ok(None);
    };

    convert(value)
        .transpose()
        .map_err(|()| D::Error::custom(message))
}

fn category_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    lenient(deserializer, Scalar::integer, "The category id field must be an integer.")
}

fn parent_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    lenient(deserializer, Scalar::integer, "The parent id field must be an integer.")
}

fn is_published<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    lenient(deserializer, Scalar::boolean, "The is published field must be true or false.")
}

/// Body of category create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The title field is required."))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "parent_id")]
    pub parent_id: Option<i64>,
}

/// Body of post create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The title field is required."),
        length(min = 3, message = "The title field must be at least 3 characters.")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 3, message = "The slug field must be at least 3 characters."))]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 3, message = "The excerpt field must be at least 3 characters."))]
    pub excerpt: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The content raw field is required."),
        length(min = 5, message = "The content raw field must be at least 5 characters.")
    )]
    pub content_raw: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub content_html: Option<String>,

    #[serde(default, deserialize_with = "category_id")]
    #[validate(required(message = "The category id field is required."))]
    pub category_id: Option<i64>,

    #[serde(default, deserialize_with = "is_published")]
    pub is_published: Option<bool>,

    /// Missing leaves the stored date alone, `null` clears it.
    #[serde(
        default,
        deserialize_with = "nullable_trimmed",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<Option<String>>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The name field is required."))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_strings_become_absent() {
        let req: CategoryRequest =
            serde_json::from_value(json!({"title": "  Tech  ", "slug": "   "})).unwrap();
        assert_eq!(req.title.as_deref(), Some("Tech"));
        assert_eq!(req.slug, None);
    }

    #[test]
    fn test_category_title_required() {
        let req: CategoryRequest = serde_json::from_value(json!({"title": ""})).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_post_rules() {
        let req: PostRequest = serde_json::from_value(json!({
            "title": "Hi",
            "slug": "ab",
            "content_raw": "1234",
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("slug"));
        assert!(fields.contains_key("content_raw"));
        assert!(fields.contains_key("category_id"));
        assert!(!fields.contains_key("excerpt"));
    }

    #[test]
    fn test_valid_post_passes() {
        let req: PostRequest = serde_json::from_value(json!({
            "title": "Hello",
            "content_raw": "<p>hello</p>",
            "category_id": 1,
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.published_at, None);
    }

    #[test]
    fn test_published_at_distinguishes_null_from_missing() {
        let cleared: PostRequest =
            serde_json::from_value(json!({"published_at": null})).unwrap();
        assert_eq!(cleared.published_at, Some(None));

        let set: PostRequest =
            serde_json::from_value(json!({"published_at": "2024-05-01"})).unwrap();
        assert_eq!(set.published_at, Some(Some("2024-05-01".to_string())));
    }

    #[test]
    fn test_flags_and_ids_accept_form_values() {
        for (raw, expected) in [
            (json!(true), Some(true)),
            (json!(0), Some(false)),
            (json!("1"), Some(true)),
            (json!("false"), Some(false)),
            (json!(""), None),
            (json!(null), None),
        ] {
            let req: PostRequest = serde_json::from_value(json!({"is_published": raw})).unwrap();
            assert_eq!(req.is_published, expected, "is_published = {raw}");
        }

        let req: PostRequest = serde_json::from_value(json!({"category_id": " 12 "})).unwrap();
        assert_eq!(req.category_id, Some(12));

        let req: PostRequest = serde_json::from_value(json!({"category_id": 4.0})).unwrap();
        assert_eq!(req.category_id, Some(4));

        let req: CategoryRequest = serde_json::from_value(json!({"parent_id": "3"})).unwrap();
        assert_eq!(req.parent_id, Some(3));
    }

    #[test]
    fn test_flags_and_ids_reject_other_values() {
        let err = serde_json::from_value::<PostRequest>(json!({"is_published": "yes"})).unwrap_err();
        assert!(err.to_string().contains("The is published field must be true or false."));

        let err = serde_json::from_value::<PostRequest>(json!({"is_published": 2})).unwrap_err();
        assert!(err.to_string().contains("must be true or false"));

        let err = serde_json::from_value::<PostRequest>(json!({"category_id": "abc"})).unwrap_err();
        assert!(err.to_string().contains("The category id field must be an integer."));

        let err = serde_json::from_value::<PostRequest>(json!({"category_id": 1.5})).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));

        let err = serde_json::from_value::<CategoryRequest>(json!({"parent_id": true})).unwrap_err();
        assert!(err.to_string().contains("The parent id field must be an integer."));
    }

    #[test]
    fn test_register_rules() {
        let req = RegisterUserRequest {
            name: None,
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
