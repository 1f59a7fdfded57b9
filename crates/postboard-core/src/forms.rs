//! Typed input for the write operations, with field-level validation.

use serde::{Deserialize, Serialize};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Longest image reference the `posts.image` column holds.
pub const IMAGE_MAX_LEN: usize = 100;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages recorded for one field.
    pub fn field(&self, name: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == name)
            .map(|e| e.message.as_str())
            .collect()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Strip surrounding whitespace; blank input counts as missing.
fn clean_text(raw: &str, field: &'static str, errors: &mut ValidationErrors) -> String {
    let text = raw.trim();
    if text.is_empty() {
        errors.add(field, REQUIRED);
    }
    text.to_string()
}

/// Submission for creating or editing a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "group")]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A post submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl PostForm {
    /// Validate the submission. `group_exists` reports whether the chosen
    /// group (if any) is a known one.
    pub fn validate(self, group_exists: bool) -> Result<PostInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let text = clean_text(&self.text, "text", &mut errors);
        if self.group_id.is_some() && !group_exists {
            errors.add("group_id", INVALID_CHOICE);
        }
        let image = self
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(image) = &image {
            let len = image.chars().count();
            if len > IMAGE_MAX_LEN {
                errors.add(
                    "image",
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        IMAGE_MAX_LEN, len
                    ),
                );
            }
        }

        errors.into_result(PostInput {
            text,
            group_id: self.group_id,
            image,
        })
    }
}

/// Submission for commenting on a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn validate(self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let text = clean_text(&self.text, "text", &mut errors);
        errors.into_result(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_required() {
        let form = PostForm {
            text: "   \n".to_string(),
            ..Default::default()
        };
        let errors = form.validate(true).unwrap_err();
        assert_eq!(errors.field("text"), vec![REQUIRED]);
    }

    #[test]
    fn test_unknown_group_and_blank_text_reported_together() {
        let form = PostForm {
            text: String::new(),
            group_id: Some(42),
            image: None,
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.field("group_id"), vec![INVALID_CHOICE]);
    }

    #[test]
    fn test_valid_post_is_trimmed_and_blank_image_dropped() {
        let form = PostForm {
            text: "  Ramax Sys, Ramax int ".to_string(),
            group_id: None,
            image: Some(" ".to_string()),
        };
        let input = form.validate(false).unwrap();
        assert_eq!(input.text, "Ramax Sys, Ramax int");
        assert_eq!(input.image, None);
    }

    #[test]
    fn test_image_reference_length_is_bounded() {
        let form = |image: String| PostForm {
            text: "Тестовый пост".to_string(),
            group_id: None,
            image: Some(image),
        };

        let at_limit = format!("posts/{}", "a".repeat(IMAGE_MAX_LEN - 6));
        assert!(form(at_limit).validate(true).is_ok());

        let errors = form(format!("posts/{}.gif", "b".repeat(IMAGE_MAX_LEN)))
            .validate(true)
            .unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.field("image").len(), 1);
        assert!(errors.field("image")[0].starts_with("Ensure this value has at most 100"));
    }

    #[test]
    fn test_post_form_accepts_group_alias() {
        let form: PostForm = serde_json::from_str(r#"{"text": "x", "group": 3}"#).unwrap();
        assert_eq!(form.group_id, Some(3));
        let form: PostForm = serde_json::from_str(r#"{"text": "x", "group_id": 4}"#).unwrap();
        assert_eq!(form.group_id, Some(4));
    }

    #[test]
    fn test_comment_form() {
        assert!(CommentForm::default().validate().is_err());
        let text = CommentForm {
            text: "Текст комментария!".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(text, "Текст комментария!");
    }
}
