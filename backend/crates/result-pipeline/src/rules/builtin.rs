//! Stateless rules over primitive inputs.
//!
//! Each factory captures owned copies of its inputs so the resulting rule can
//! outlive the borrowed pipeline value it was built from.

use std::fmt::Debug;
use std::sync::OnceLock;

use regex::Regex;

use super::Rule;

/// Non-blank text.
#[derive(Debug, Clone)]
pub struct IsNotEmpty {
    value: String,
}

/// Rule passing when `value` contains a non-whitespace character.
pub fn is_not_empty(value: impl AsRef<str>) -> IsNotEmpty {
    IsNotEmpty {
        value: value.as_ref().to_owned(),
    }
}

impl Rule for IsNotEmpty {
    fn message(&self) -> String {
        "value must not be empty".to_owned()
    }

    fn is_satisfied(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Value differing from a forbidden one.
#[derive(Debug, Clone)]
pub struct NotEqual<T> {
    value: T,
    forbidden: T,
}

/// Rule passing when `value != forbidden`.
pub fn not_equal<T>(value: T, forbidden: T) -> NotEqual<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    NotEqual { value, forbidden }
}

impl<T> Rule for NotEqual<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value must not be {:?}", self.forbidden)
    }

    fn is_satisfied(&self) -> bool {
        self.value != self.forbidden
    }
}

/// Value matching an expected one.
#[derive(Debug, Clone)]
pub struct Equal<T> {
    value: T,
    expected: T,
}

/// Rule passing when `value == expected`.
pub fn equal<T>(value: T, expected: T) -> Equal<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    Equal { value, expected }
}

impl<T> Rule for Equal<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value must be {:?} but was {:?}", self.expected, self.value)
    }

    fn is_satisfied(&self) -> bool {
        self.value == self.expected
    }
}

/// Flag that must be set.
#[derive(Debug, Clone, Copy)]
pub struct IsTrue {
    value: bool,
}

/// Rule passing when `value` is `true`.
pub const fn is_true(value: bool) -> IsTrue {
    IsTrue { value }
}

impl Rule for IsTrue {
    fn message(&self) -> String {
        "condition must be true".to_owned()
    }

    fn is_satisfied(&self) -> bool {
        self.value
    }
}

/// Flag that must be clear.
#[derive(Debug, Clone, Copy)]
pub struct IsFalse {
    value: bool,
}

/// Rule passing when `value` is `false`.
pub const fn is_false(value: bool) -> IsFalse {
    IsFalse { value }
}

impl Rule for IsFalse {
    fn message(&self) -> String {
        "condition must be false".to_owned()
    }

    fn is_satisfied(&self) -> bool {
        !self.value
    }
}

/// Optional value that must be present.
#[derive(Debug, Clone, Copy)]
pub struct IsSome {
    present: bool,
}

/// Rule passing when `value` is `Some`.
pub fn is_some<T>(value: Option<T>) -> IsSome {
    IsSome {
        present: value.is_some(),
    }
}

impl Rule for IsSome {
    fn message(&self) -> String {
        "value must be present".to_owned()
    }

    fn is_satisfied(&self) -> bool {
        self.present
    }
}

/// Text at least `min` characters long.
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    length: usize,
    min: usize,
}

/// Rule passing when `value` has at least `min` characters.
pub fn min_length(value: impl AsRef<str>, min: usize) -> MinLength {
    MinLength {
        length: value.as_ref().chars().count(),
        min,
    }
}

impl Rule for MinLength {
    fn message(&self) -> String {
        format!("value must be at least {} characters long", self.min)
    }

    fn is_satisfied(&self) -> bool {
        self.length >= self.min
    }
}

/// Text at most `max` characters long.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    length: usize,
    max: usize,
}

/// Rule passing when `value` has at most `max` characters.
pub fn max_length(value: impl AsRef<str>, max: usize) -> MaxLength {
    MaxLength {
        length: value.as_ref().chars().count(),
        max,
    }
}

impl Rule for MaxLength {
    fn message(&self) -> String {
        format!("value must be at most {} characters long", self.max)
    }

    fn is_satisfied(&self) -> bool {
        self.length <= self.max
    }
}

/// Value inside an inclusive range.
#[derive(Debug, Clone)]
pub struct Between<T> {
    value: T,
    min: T,
    max: T,
}

/// Rule passing when `min <= value <= max`.
pub fn between<T>(value: T, min: T, max: T) -> Between<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    Between { value, min, max }
}

impl<T> Rule for Between<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value must be between {:?} and {:?}", self.min, self.max)
    }

    fn is_satisfied(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }
}

/// Value strictly above a bound.
#[derive(Debug, Clone)]
pub struct GreaterThan<T> {
    value: T,
    bound: T,
}

/// Rule passing when `value > bound`.
pub fn greater_than<T>(value: T, bound: T) -> GreaterThan<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    GreaterThan { value, bound }
}

impl<T> Rule for GreaterThan<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value must be greater than {:?}", self.bound)
    }

    fn is_satisfied(&self) -> bool {
        self.value > self.bound
    }
}

/// Value strictly below a bound.
#[derive(Debug, Clone)]
pub struct LessThan<T> {
    value: T,
    bound: T,
}

/// Rule passing when `value < bound`.
pub fn less_than<T>(value: T, bound: T) -> LessThan<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    LessThan { value, bound }
}

impl<T> Rule for LessThan<T>
where
    T: PartialOrd + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value must be less than {:?}", self.bound)
    }

    fn is_satisfied(&self) -> bool {
        self.value < self.bound
    }
}

/// Syntactically valid email address.
#[derive(Debug, Clone)]
pub struct IsValidEmail {
    value: String,
}

/// Rule passing when `value` looks like `local@domain.tld`.
pub fn is_valid_email(value: impl AsRef<str>) -> IsValidEmail {
    IsValidEmail {
        value: value.as_ref().trim().to_owned(),
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Rule for IsValidEmail {
    fn message(&self) -> String {
        format!("'{}' is not a valid email address", self.value)
    }

    fn is_satisfied(&self) -> bool {
        email_regex().is_match(&self.value)
    }
}

/// Text containing a fragment.
#[derive(Debug, Clone)]
pub struct TextContains {
    value: String,
    fragment: String,
}

/// Rule passing when `value` contains `fragment` (case-sensitive).
pub fn text_contains(value: impl AsRef<str>, fragment: impl AsRef<str>) -> TextContains {
    TextContains {
        value: value.as_ref().to_owned(),
        fragment: fragment.as_ref().to_owned(),
    }
}

impl Rule for TextContains {
    fn message(&self) -> String {
        format!("value must contain '{}'", self.fragment)
    }

    fn is_satisfied(&self) -> bool {
        self.value.contains(&self.fragment)
    }
}

/// Value drawn from an allowed list.
#[derive(Debug, Clone)]
pub struct IsOneOf<T> {
    value: T,
    allowed: Vec<T>,
}

/// Rule passing when `value` equals one of `allowed`.
pub fn is_one_of<T>(value: T, allowed: impl IntoIterator<Item = T>) -> IsOneOf<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    IsOneOf {
        value,
        allowed: allowed.into_iter().collect(),
    }
}

impl<T> Rule for IsOneOf<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    fn message(&self) -> String {
        format!("value {:?} must be one of {:?}", self.value, self.allowed)
    }

    fn is_satisfied(&self) -> bool {
        self.allowed.contains(&self.value)
    }
}
