//! Form Validation
//!
//! Every form declares its rules as a static table of [`FieldRule`]s. [`validate`] walks the
//! whole table on submit and collects one message per failing field, so a rejected form reports
//! everything that needs fixing at once and nothing is committed.

use std::fmt::{self, Display, Formatter};

use jiff::civil::Date;
use rust_decimal::Decimal;
use smallvec::SmallVec;

/// Value of a single form field, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Free text, select values and ISO dates.
    Text(&'a str),

    /// Monetary amount; `None` when left blank.
    Amount(Option<Decimal>),
}

/// Constraint attached to a form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Non-empty text with at least `min_len` characters.
    Required {
        /// Minimum number of characters.
        min_len: usize,
    },

    /// One of the listed labels.
    Choice {
        /// Accepted values.
        options: &'static [&'static str],
    },

    /// Amount with an optional lower bound.
    Amount {
        /// Inclusive lower bound.
        min: Option<Decimal>,

        /// Whether a blank amount is rejected.
        required: bool,
    },

    /// Something shaped like `local@domain.tld`.
    Email,

    /// ISO calendar date (`yyyy-mm-dd`).
    Date,

    /// Empty is fine; otherwise at least `min_len` characters.
    OptionalMinLength {
        /// Minimum number of characters when present.
        min_len: usize,
    },

    /// Must equal `companion` whenever `companion` is non-empty.
    MatchesWhenPresent {
        /// Name of the field this one confirms.
        companion: &'static str,
    },

    /// No constraint.
    Optional,
}

/// A rule bound to a named field, with the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    /// Field name.
    pub field: &'static str,

    /// Constraint.
    pub rule: Rule,

    /// Message shown next to the field when the rule fails.
    pub message: &'static str,
}

impl FieldRule {
    /// Bind `rule` to `field`.
    pub const fn new(field: &'static str, rule: Rule, message: &'static str) -> Self {
        Self {
            field,
            rule,
            message,
        }
    }
}

/// A form with a declarative schema.
pub trait FormSchema {
    /// Rules evaluated on submit, in display order.
    fn rules() -> &'static [FieldRule];

    /// Look up the current value of `field`.
    fn value(&self, field: &str) -> Option<FieldValue<'_>>;
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field: &'static str,

    /// Human-readable message.
    pub message: String,
}

/// Field-keyed validation failures, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 4]>,
}

impl ValidationErrors {
    /// Record a failure for `field`. A field keeps its first message.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Build a single-field failure.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Names of every failing field.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.field)
    }

    /// Iterate the failures in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate `form` against its schema.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate<F: FormSchema>(form: &F) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field_rule in F::rules() {
        let value = form.value(field_rule.field);

        if !passes(form, field_rule.rule, value) {
            errors.add(field_rule.field, field_rule.message);
        }
    }

    errors.into_result()
}

fn passes<F: FormSchema>(form: &F, rule: Rule, value: Option<FieldValue<'_>>) -> bool {
    match (rule, value) {
        (Rule::Optional, _) => true,
        (Rule::Required { min_len }, Some(FieldValue::Text(text))) => {
            !text.trim().is_empty() && text.chars().count() >= min_len
        }
        (Rule::Choice { options }, Some(FieldValue::Text(text))) => options.contains(&text),
        (Rule::Amount { min, required }, Some(FieldValue::Amount(amount))) => match amount {
            Some(amount) => min.is_none_or(|min| amount >= min),
            None => !required,
        },
        (Rule::Email, Some(FieldValue::Text(text))) => is_email(text),
        (Rule::Date, Some(FieldValue::Text(text))) => text.parse::<Date>().is_ok(),
        (Rule::OptionalMinLength { min_len }, Some(FieldValue::Text(text))) => {
            text.is_empty() || text.chars().count() >= min_len
        }
        (Rule::MatchesWhenPresent { companion }, Some(FieldValue::Text(text))) => {
            match form.value(companion) {
                Some(FieldValue::Text(other)) if !other.is_empty() => text == other,
                _ => true,
            }
        }
        _ => false,
    }
}

/// Loose email shape check: one `@`, a non-empty local part and a dotted domain.
pub fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Default)]
    struct SignupForm {
        name: String,
        email: String,
        role: String,
        budget: Option<Decimal>,
        starts_on: String,
        password: String,
        confirm: String,
    }

    const ROLES: &[&str] = &["Gestor", "Analista"];

    const RULES: &[FieldRule] = &[
        FieldRule::new("name", Rule::Required { min_len: 3 }, "Nome é obrigatório"),
        FieldRule::new("email", Rule::Email, "Email inválido"),
        FieldRule::new("role", Rule::Choice { options: ROLES }, "Perfil é obrigatório"),
        FieldRule::new(
            "budget",
            Rule::Amount {
                min: Some(Decimal::ZERO),
                required: true,
            },
            "Orçamento deve ser maior ou igual a zero",
        ),
        FieldRule::new("starts_on", Rule::Date, "Data inválida"),
        FieldRule::new(
            "password",
            Rule::OptionalMinLength { min_len: 6 },
            "Senha deve ter pelo menos 6 caracteres",
        ),
        FieldRule::new(
            "confirm",
            Rule::MatchesWhenPresent {
                companion: "password",
            },
            "As senhas não coincidem",
        ),
    ];

    impl FormSchema for SignupForm {
        fn rules() -> &'static [FieldRule] {
            RULES
        }

        fn value(&self, field: &str) -> Option<FieldValue<'_>> {
            Some(match field {
                "name" => FieldValue::Text(&self.name),
                "email" => FieldValue::Text(&self.email),
                "role" => FieldValue::Text(&self.role),
                "budget" => FieldValue::Amount(self.budget),
                "starts_on" => FieldValue::Text(&self.starts_on),
                "password" => FieldValue::Text(&self.password),
                "confirm" => FieldValue::Text(&self.confirm),
                _ => return None,
            })
        }
    }

    fn valid_form() -> SignupForm {
        SignupForm {
            name: "Ana Pereira".to_string(),
            email: "ana@prefeitura.gov.br".to_string(),
            role: "Gestor".to_string(),
            budget: Some(Decimal::new(1000, 0)),
            starts_on: "2025-05-01".to_string(),
            password: String::new(),
            confirm: String::new(),
        }
    }

    #[test]
    fn valid_form_passes() -> TestResult {
        validate(&valid_form())?;

        Ok(())
    }

    #[test]
    fn empty_form_reports_every_failing_field() {
        let errors = validate(&SignupForm::default()).err().unwrap_or_default();

        let fields: Vec<_> = errors.fields().collect();

        assert_eq!(fields, ["name", "email", "role", "budget", "starts_on"]);
        assert_eq!(errors.get("name"), Some("Nome é obrigatório"));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn amount_below_minimum_is_rejected() {
        let form = SignupForm {
            budget: Some(Decimal::new(-1, 0)),
            ..valid_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(
            errors.get("budget"),
            Some("Orçamento deve ser maior ou igual a zero")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_amount_is_accepted() -> TestResult {
        let form = SignupForm {
            budget: Some(Decimal::ZERO),
            ..valid_form()
        };

        validate(&form)?;

        Ok(())
    }

    #[test]
    fn whitespace_only_text_is_not_present() {
        let form = SignupForm {
            name: "    ".to_string(),
            ..valid_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn confirmation_mismatch_is_attributed_to_confirmation_field() {
        let form = SignupForm {
            password: "segredo1".to_string(),
            confirm: "segredo2".to_string(),
            ..valid_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["confirm"]);
        assert_eq!(errors.get("confirm"), Some("As senhas não coincidem"));
    }

    #[test]
    fn confirmation_is_ignored_without_companion() -> TestResult {
        let form = SignupForm {
            confirm: "qualquer".to_string(),
            ..valid_form()
        };

        validate(&form)?;

        Ok(())
    }

    #[test]
    fn short_optional_password_is_rejected() {
        let form = SignupForm {
            password: "abc".to_string(),
            confirm: "abc".to_string(),
            ..valid_form()
        };

        let errors = validate(&form).err().unwrap_or_default();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["password"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("contato@empresaabc.com.br"));
        assert!(!is_email("contato@empresaabc"));
        assert!(!is_email("@empresaabc.com"));
        assert!(!is_email("contato@@empresa.com"));
        assert!(!is_email("conta to@empresa.com"));
        assert!(!is_email("contato@empresa..com"));
    }

    #[test]
    fn display_joins_field_messages() {
        let mut errors = ValidationErrors::single("name", "Nome é obrigatório");
        errors.add("email", "Email inválido");
        errors.add("name", "ignored");

        assert_eq!(
            errors.to_string(),
            "name: Nome é obrigatório; email: Email inválido"
        );
    }
}
