//! Login form schema.
//!
//! Fields are described once, statically, and rendered by whatever draws the
//! form. Validation rules are data, checked by [`validate`].

use serde::{Deserialize, Serialize};

/// Which variant of the login form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormMode {
    #[default]
    #[serde(alias = "signin")]
    SignIn,
    #[serde(alias = "signup")]
    SignUp,
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::SignIn => "Sign In",
            FormMode::SignUp => "Sign Up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Always,
    SignUpOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Rule {
    Required { message: &'static str },
    Email { message: &'static str },
    MinLength { min: usize, message: &'static str },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    pub auto_complete: &'static str,
    pub rules: &'static [Rule],
    pub visible_when: Visibility,
}

impl FieldDescriptor {
    pub fn is_visible(&self, mode: FormMode) -> bool {
        match self.visible_when {
            Visibility::Always => true,
            Visibility::SignUpOnly => mode == FormMode::SignUp,
        }
    }
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub const PASSWORD_MIN_LENGTH: usize = 6;

pub static LOGIN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "name",
        kind: FieldKind::Text,
        placeholder: "Full name",
        auto_complete: "name",
        rules: &[Rule::Required {
            message: "Name is required",
        }],
        visible_when: Visibility::SignUpOnly,
    },
    FieldDescriptor {
        name: "email",
        kind: FieldKind::Email,
        placeholder: "Email address",
        auto_complete: "email",
        rules: &[
            Rule::Required {
                message: "Email is required",
            },
            Rule::Email {
                message: "Please enter a valid email address",
            },
        ],
        visible_when: Visibility::Always,
    },
    FieldDescriptor {
        name: "password",
        kind: FieldKind::Password,
        placeholder: "Password",
        auto_complete: "current-password",
        rules: &[
            Rule::Required {
                message: "Password is required",
            },
            Rule::MinLength {
                min: PASSWORD_MIN_LENGTH,
                message: "Password must be at least 6 characters",
            },
        ],
        visible_when: Visibility::Always,
    },
];

/// Fields shown in `mode`, in display order.
pub fn fields_for(mode: FormMode) -> Vec<&'static FieldDescriptor> {
    LOGIN_FIELDS.iter().filter(|f| f.is_visible(mode)).collect()
}

/// Check `value_of(field)` against every visible field's rules. Reports the
/// first failed rule per field.
pub fn validate<'a>(mode: FormMode, value_of: impl Fn(&str) -> Option<&'a str>) -> Vec<FieldError> {
    fields_for(mode)
        .into_iter()
        .filter_map(|field| {
            let value = value_of(field.name).map(str::trim).unwrap_or("");
            field
                .rules
                .iter()
                .find(|rule| !rule_holds(rule, value))
                .map(|rule| FieldError {
                    field: field.name.to_string(),
                    message: rule_message(rule).to_string(),
                })
        })
        .collect()
}

fn rule_holds(rule: &Rule, value: &str) -> bool {
    match rule {
        Rule::Required { .. } => !value.is_empty(),
        // Emptiness is Required's job.
        Rule::Email { .. } => value.is_empty() || looks_like_email(value),
        Rule::MinLength { min, .. } => value.is_empty() || value.chars().count() >= *min,
    }
}

fn rule_message(rule: &Rule) -> &'static str {
    match rule {
        Rule::Required { message } | Rule::Email { message } | Rule::MinLength { message, .. } => {
            *message
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
