//! Institutional email classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RuzError;

/// Default student domain.
pub const STUDENT_DOMAIN: &str = "edu.hse.ru";

/// Default staff domain.
pub const STAFF_DOMAIN: &str = "hse.ru";

/// Address pattern for the default domains: local part of at least two
/// characters, optional sub-domain label, institutional root domain.
#[allow(clippy::expect_used)]
static HSE_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._-]{2,}@(?:[a-z0-9-]+\.)?hse\.ru$")
        .expect("failed to compile email regex")
});

/// Classifies institutional email addresses by domain.
///
/// Derived attributes (validity, role) are computed on demand and never
/// stored. Domain comparison is case-insensitive.
#[derive(Debug, Clone)]
pub struct EmailClassifier {
    student_domain: String,
    staff_domain: String,
    format_re: Regex,
}

impl Default for EmailClassifier {
    fn default() -> Self {
        Self {
            student_domain: String::from(STUDENT_DOMAIN),
            staff_domain: String::from(STAFF_DOMAIN),
            format_re: HSE_EMAIL_RE.clone(),
        }
    }
}

impl EmailClassifier {
    /// Creates a classifier for the given domain pair. The staff domain
    /// doubles as the institutional root for the format check.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::Configuration`] if either domain is empty or
    /// the derived address pattern cannot be compiled.
    pub fn new(
        student_domain: impl Into<String>,
        staff_domain: impl Into<String>,
    ) -> Result<Self, RuzError> {
        let student_domain = student_domain.into().to_lowercase();
        let staff_domain = staff_domain.into().to_lowercase();
        if student_domain.is_empty() || staff_domain.is_empty() {
            return Err(RuzError::Configuration(String::from(
                "email domains must be non-empty",
            )));
        }

        let pattern = format!(
            r"^[a-z0-9._-]{{2,}}@(?:[a-z0-9-]+\.)?{}$",
            regex::escape(&staff_domain)
        );
        let format_re = Regex::new(&pattern)
            .map_err(|e| RuzError::Configuration(format!("invalid email pattern: {e}")))?;

        Ok(Self {
            student_domain,
            staff_domain,
            format_re,
        })
    }

    /// Domains accepted by [`is_valid_domain`](Self::is_valid_domain) by
    /// default, student domain first.
    #[must_use]
    pub fn allowed_domains(&self) -> [&str; 2] {
        [&self.student_domain, &self.staff_domain]
    }

    /// Text after the last `@`, lowercased.
    fn domain_of(email: &str) -> String {
        email
            .rsplit('@')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Whether the address belongs to a student.
    ///
    /// The student domain yields `true`, the staff domain `false`.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::UnknownDomain`] for any other domain.
    pub fn is_student(&self, email: &str) -> Result<bool, RuzError> {
        let domain = Self::domain_of(email);
        if domain == self.student_domain {
            Ok(true)
        } else if domain == self.staff_domain {
            Ok(false)
        } else {
            Err(RuzError::UnknownDomain(domain))
        }
    }

    /// Whether the address matches the institutional pattern.
    #[must_use]
    pub fn is_valid_format(&self, email: &str) -> bool {
        self.format_re.is_match(&email.trim().to_lowercase())
    }

    /// Whether the exact domain is a member of the allowed set.
    #[must_use]
    pub fn is_valid_domain(&self, email: &str, allowed_domains: &[&str]) -> bool {
        let domain = Self::domain_of(email);
        allowed_domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&domain))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_is_student_for_student_domain() {
        // Arrange
        let classifier = EmailClassifier::default();

        // Act & Assert
        assert!(classifier.is_student("dapchelkin@edu.hse.ru").unwrap());
        assert!(classifier.is_student("DAPCHELKIN@EDU.HSE.RU").unwrap());
    }

    #[test]
    fn test_is_student_for_staff_domain() {
        // Arrange
        let classifier = EmailClassifier::default();

        // Act & Assert
        assert!(!classifier.is_student("aromanov@hse.ru").unwrap());
    }

    #[test]
    fn test_is_student_rejects_other_domains() {
        // Arrange
        let classifier = EmailClassifier::default();

        // Act
        let result = classifier.is_student("hell03end@outlook.com");

        // Assert
        assert!(matches!(result, Err(RuzError::UnknownDomain(d)) if d == "outlook.com"));
    }

    #[test]
    fn test_is_valid_format_accepts_institutional_addresses() {
        // Arrange
        let classifier = EmailClassifier::default();

        // Act & Assert
        for email in [
            "dapchelkin@edu.hse.ru",
            "aromanov@hse.ru",
            "a.b-c_1@hse.ru",
            "Mixed.Case@HSE.RU",
        ] {
            assert!(classifier.is_valid_format(email), "{email}");
        }
    }

    #[test]
    fn test_is_valid_format_rejects_malformed_addresses() {
        // Arrange
        let classifier = EmailClassifier::default();

        // Act & Assert
        for email in [
            "somemail@hse.com",
            "somem@il@edu.hse.ru",
            "somemail@google.ru",
            "a@hse.ru",
            "nodomain",
            "",
        ] {
            assert!(!classifier.is_valid_format(email), "{email}");
        }
    }

    #[test]
    fn test_is_valid_domain_is_exact_membership() {
        // Arrange
        let classifier = EmailClassifier::default();
        let allowed = classifier.allowed_domains();

        // Act & Assert
        assert!(classifier.is_valid_domain("a.b@edu.hse.ru", &allowed));
        assert!(classifier.is_valid_domain("a.b@hse.ru", &allowed));
        // Sub-domain labels pass the format check but not the domain set
        assert!(!classifier.is_valid_domain("a.b@mail.hse.ru", &allowed));
    }

    #[test]
    fn test_new_rejects_empty_domains() {
        // Arrange & Act
        let result = EmailClassifier::new("", "hse.ru");

        // Assert
        assert!(matches!(result, Err(RuzError::Configuration(_))));
    }

    #[test]
    fn test_custom_domains() {
        // Arrange
        let classifier = EmailClassifier::new("stud.uni.edu", "uni.edu").unwrap();

        // Act & Assert
        assert!(classifier.is_student("who@stud.uni.edu").unwrap());
        assert!(!classifier.is_student("who@uni.edu").unwrap());
        assert!(classifier.is_valid_format("who@uni.edu"));
        assert!(!classifier.is_valid_format("who@hse.ru"));
    }
}
