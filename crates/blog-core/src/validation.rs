//! Input validation run before anything reaches a repository.

use std::sync::LazyLock;

use regex::Regex;

use blog_shared::FieldViolation;
use blog_shared::dto::{BlogRequest, CreateCategoryRequest, CreateUserRequest};

use crate::error::DomainError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});
static IMAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9]+$").expect("valid image name regex"));

pub const BLOG_TITLE_MIN: usize = 3;
pub const BLOG_TITLE_MAX: usize = 150;
pub const BLOG_CONTENT_MAX: usize = 20_000;

/// Collects violations so a caller sees every bad field at once.
#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    fn length(&mut self, field: &str, value: &str, min: usize, max: usize, message: &str) {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.push(field, message);
        }
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

pub fn validate_blog(input: &BlogRequest) -> Result<(), DomainError> {
    let mut v = Violations::default();
    v.length(
        "title",
        &input.title,
        BLOG_TITLE_MIN,
        BLOG_TITLE_MAX,
        "Title must be between 3 & 150 characters",
    );
    if input.content.trim().is_empty() {
        v.push("content", "Content is required.");
    } else if input.content.chars().count() > BLOG_CONTENT_MAX {
        v.push("content", "Content must be at most 20000 characters");
    }
    v.finish()
}

pub fn validate_new_user(input: &CreateUserRequest) -> Result<(), DomainError> {
    let mut v = Violations::default();
    v.length(
        "name",
        &input.name,
        3,
        100,
        "Name must be between 3 & 100 characters",
    );

    let email = input.email.trim();
    if email.is_empty() {
        v.push("email", "Email is required.");
    } else if !is_valid_email(email) {
        v.push("email", "Email must be a valid email");
    }

    if input.password.is_empty() {
        v.push("password", "Empty password not allowed.");
    } else {
        let len = input.password.chars().count();
        if !(3..=50).contains(&len) {
            v.push("password", "Password should be between 3 & 50 characters");
        }
    }

    v.length(
        "intro",
        &input.intro,
        10,
        300,
        "Introduction must be at least 10 & maximum 300 characters long",
    );
    v.finish()
}

pub fn validate_category(input: &CreateCategoryRequest) -> Result<(), DomainError> {
    let mut v = Violations::default();
    v.length(
        "name",
        &input.name,
        1,
        100,
        "Category name must be between 1 & 100 characters",
    );
    v.finish()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Stored image names are `<stem>.<ext>` with no path separators.
pub fn is_valid_image_name(name: &str) -> bool {
    IMAGE_NAME_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Validation(v) => v.into_iter().map(|v| v.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice Smith".into(),
            email: "alice@x.com".into(),
            password: "secret1".into(),
            intro: "Backend engineer who loves Go".into(),
        }
    }

    #[test]
    fn accepts_valid_user() {
        assert!(validate_new_user(&alice()).is_ok());
    }

    #[test]
    fn reports_every_bad_user_field() {
        let input = CreateUserRequest {
            name: "Al".into(),
            email: "not-an-email".into(),
            password: String::new(),
            intro: "short".into(),
        };
        assert_eq!(
            fields(validate_new_user(&input).unwrap_err()),
            vec!["name", "email", "password", "intro"]
        );
    }

    #[test]
    fn password_bounds() {
        let mut input = alice();
        input.password = "ab".into();
        assert_eq!(fields(validate_new_user(&input).unwrap_err()), vec!["password"]);
        input.password = "x".repeat(51);
        assert!(validate_new_user(&input).is_err());
        input.password = "x".repeat(50);
        assert!(validate_new_user(&input).is_ok());
    }

    #[test]
    fn blog_title_is_trimmed_before_counting() {
        let input = BlogRequest {
            title: "  ab  ".into(),
            content: "body".into(),
        };
        assert_eq!(fields(validate_blog(&input).unwrap_err()), vec!["title"]);
    }

    #[test]
    fn blank_content_is_rejected() {
        let input = BlogRequest {
            title: "A fine title".into(),
            content: "   ".into(),
        };
        assert_eq!(fields(validate_blog(&input).unwrap_err()), vec!["content"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("al ice@x.com"));
    }

    #[test]
    fn image_names_reject_paths() {
        assert!(is_valid_image_name("3f1c.png"));
        assert!(!is_valid_image_name("../etc/passwd"));
        assert!(!is_valid_image_name("dir/file.png"));
        assert!(!is_valid_image_name("noext"));
    }
}
