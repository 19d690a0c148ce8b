//! Derivation of anchored validation patterns from typed values

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use wafgen_model::{Parameter, Property, SemanticType};

pub const INTEGER_REQUIRED: &str = "^[0-9]{1,19}$";
pub const INTEGER_OPTIONAL: &str = "^([0-9]{1,19})?$";
pub const UUID_REQUIRED: &str = "^[0-9a-fA-F]+$";
pub const UUID_OPTIONAL: &str = "^([0-9a-fA-F]+)?$";

pub const DIGIT_INPUT: &str = "[0-9]";
pub const BOOLEAN_INPUT: &str = "(true|false)";
pub const ANY_INPUT: &str = ".";
pub const DATE_INPUT: &str = r"(\d{4}-((01|03|05|07|08|10|12)-(0[1-9]|1\d|2\d|3[0-1])|(04|06|09|11)-(0[1-9]|1\d|2\d|30)|02-(0[1-9]|1\d|2\d)))";
pub const DATE_TIME_INPUT: &str = r"(\d{4}-((01|03|05|07|08|10|12)-(0[1-9]|1\d|2\d|3[0-1])|(04|06|09|11)-(0[1-9]|1\d|2\d|30)|02-(0[1-9]|1\d|2\d))T([01]\d|2[0-3]):([0-5]\d):([0-5]\d)(\.\d+)?([Zz]|[+\-](0\d|1[0-4])(:[0-5]\d)?))";
pub const EMAIL_INPUT: &str = r"([A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,})";

/// Optional decimals accept any single separator character, not only a dot
pub const DECIMAL_OPTIONAL: &str = "^[0-9]*.?[0-9]*$";

const INTEGER_MAX_LENGTH: u32 = 10;
const LONG_MAX_LENGTH: u32 = 19;

const LOOKAROUNDS: [&str; 4] = ["(?!", "(?=", "(?<=", "(?<!"];

static PLAIN_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("plain identifier regex should be valid")
});

/// A typed value a pattern can be derived for
pub trait PatternSubject {
    fn name(&self) -> &str;
    fn semantic_type(&self) -> SemanticType;
    fn is_required(&self) -> bool;
    fn is_enum(&self) -> bool;
    fn enum_values(&self) -> Option<&[String]>;
    fn min_length(&self) -> Option<u32>;
    fn max_length(&self) -> Option<u32>;
    /// Pattern supplied with the value, if any
    fn pattern(&self) -> Option<&str>;
}

impl PatternSubject for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn semantic_type(&self) -> SemanticType {
        self.kind
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn is_enum(&self) -> bool {
        self.is_enum
    }

    fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    fn min_length(&self) -> Option<u32> {
        self.constraints.min_length
    }

    fn max_length(&self) -> Option<u32> {
        self.constraints.max_length
    }

    fn pattern(&self) -> Option<&str> {
        self.constraints.pattern.as_deref()
    }
}

impl PatternSubject for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn semantic_type(&self) -> SemanticType {
        self.kind
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn is_enum(&self) -> bool {
        self.is_enum
    }

    fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    fn min_length(&self) -> Option<u32> {
        self.constraints.min_length
    }

    fn max_length(&self) -> Option<u32> {
        self.constraints.max_length
    }

    fn pattern(&self) -> Option<&str> {
        self.constraints.pattern.as_deref()
    }
}

/// Derive the anchored pattern accepting every legal wire value of `subject`
pub fn derive_pattern<S: PatternSubject + ?Sized>(subject: &S) -> String {
    let kind = subject.semantic_type();
    let required = subject.is_required();

    if kind.is_integral() {
        let pattern = if required { INTEGER_REQUIRED } else { INTEGER_OPTIONAL };
        return pattern.to_string();
    }
    if kind == SemanticType::Uuid {
        let pattern = if required { UUID_REQUIRED } else { UUID_OPTIONAL };
        return pattern.to_string();
    }

    let allowed = allowed_input_pattern(subject);
    let min = min_length_bound(subject);
    let max = max_length_bound(subject);

    if is_decimal(subject) {
        return decimal_pattern(min, max, required);
    }

    if !allows_multiple(subject) {
        let optional = if required { "" } else { "?" };
        return format!("^{allowed}{optional}$");
    }

    length_pattern(min, max, required)
}

/// Character class or alternation the value is built from
pub fn allowed_input_pattern<S: PatternSubject + ?Sized>(subject: &S) -> String {
    let kind = subject.semantic_type();

    if kind.is_decimal() || kind.is_integral() {
        return DIGIT_INPUT.to_string();
    }

    match kind {
        SemanticType::Boolean => BOOLEAN_INPUT.to_string(),
        SemanticType::Date => DATE_INPUT.to_string(),
        SemanticType::DateTime => DATE_TIME_INPUT.to_string(),
        SemanticType::Email => EMAIL_INPUT.to_string(),
        _ if subject.is_enum() => enum_alternation(subject.enum_values()),
        _ => ANY_INPUT.to_string(),
    }
}

fn enum_alternation(values: Option<&[String]>) -> String {
    let values = match values {
        Some(values) if !values.is_empty() => values,
        _ => return ANY_INPUT.to_string(),
    };

    let alternatives: Vec<String> = values
        .iter()
        .map(|value| {
            if PLAIN_IDENTIFIER.is_match(value) {
                value.clone()
            } else {
                regex::escape(value)
            }
        })
        .collect();

    format!("({})", alternatives.join("|"))
}

/// Effective minimum length; required values need at least one character
pub fn min_length_bound<S: PatternSubject + ?Sized>(subject: &S) -> Option<u32> {
    match subject.min_length() {
        None | Some(0) if subject.is_required() => Some(1),
        declared => declared,
    }
}

/// Effective maximum length; integers are capped at 10 digits and longs at 19
pub fn max_length_bound<S: PatternSubject + ?Sized>(subject: &S) -> Option<u32> {
    let declared = subject.max_length();
    let cap = match subject.semantic_type() {
        SemanticType::Integer => Some(INTEGER_MAX_LENGTH),
        SemanticType::Long => Some(LONG_MAX_LENGTH),
        _ => None,
    };

    match (cap, declared) {
        (Some(cap), None) | (Some(cap), Some(0)) => Some(cap),
        (Some(cap), Some(max)) if max > cap => Some(cap),
        _ => declared,
    }
}

/// Minimum length as it appears inside a quantifier, empty when unbounded
pub fn min_length_pattern<S: PatternSubject + ?Sized>(subject: &S) -> String {
    min_length_bound(subject)
        .map(|n| n.to_string())
        .unwrap_or_default()
}

/// Maximum length as it appears inside a quantifier, empty when unbounded
pub fn max_length_pattern<S: PatternSubject + ?Sized>(subject: &S) -> String {
    max_length_bound(subject)
        .map(|n| n.to_string())
        .unwrap_or_default()
}

/// Number, float, double and decimal values
pub fn is_decimal<S: PatternSubject + ?Sized>(subject: &S) -> bool {
    subject.semantic_type().is_decimal()
}

/// Whether the value is matched by a length quantifier rather than a fixed grammar
pub fn allows_multiple<S: PatternSubject + ?Sized>(subject: &S) -> bool {
    let fixed_grammar = matches!(
        subject.semantic_type(),
        SemanticType::Boolean | SemanticType::Date | SemanticType::DateTime | SemanticType::Email
    );
    !(fixed_grammar || is_decimal(subject) || subject.is_enum())
}

fn decimal_pattern(min: Option<u32>, max: Option<u32>, required: bool) -> String {
    if !required {
        return DECIMAL_OPTIONAL.to_string();
    }

    let min = min.unwrap_or(1);
    match max {
        Some(max) => format!("^[0-9]{{{min},{max}}}$"),
        None => format!("^[0-9]{{{min},}}$"),
    }
}

fn length_pattern(min: Option<u32>, max: Option<u32>, required: bool) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => format!("^.{{{min}}}$"),
        (Some(min), Some(max)) => format!("^.{{{min},{max}}}$"),
        (Some(1), None) => "^.+$".to_string(),
        (Some(0), None) => "^.*$".to_string(),
        (Some(min), None) => format!("^.{{{min},}}$"),
        (None, Some(max)) => {
            let min = if required { 1 } else { 0 };
            format!("^.{{{min},{max}}}$")
        }
        (None, None) if required => "^.+$".to_string(),
        (None, None) => "^.*$".to_string(),
    }
}

/// Patterns using lookaround cannot be enforced downstream
pub fn is_invalid_pattern(pattern: &str) -> bool {
    LOOKAROUNDS.iter().any(|construct| pattern.contains(construct))
}

/// The supplied pattern when usable, otherwise a derived one
pub fn resolve_pattern<S: PatternSubject + ?Sized>(subject: &S) -> String {
    if let Some(pattern) = subject.pattern().filter(|p| !p.is_empty()) {
        if !is_invalid_pattern(pattern) {
            debug!("Using supplied pattern for {}: {}", subject.name(), pattern);
            return pattern.to_string();
        }
        warn!(
            "Discarding pattern with lookaround for {}: {}",
            subject.name(),
            pattern
        );
    }

    let derived = derive_pattern(subject);
    debug!("Derived pattern for {}: {}", subject.name(), derived);
    derived
}
