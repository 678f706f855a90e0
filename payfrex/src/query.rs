//! Deterministic query serialization of request fields.
//!
//! A [`FieldSet`] is the ordered, already validated field list of one request.
//! [`encode`] turns it into the [`CanonicalQuery`] that is both the AES
//! plaintext and the SHA-256 signature input, so the output must be
//! byte-identical for identical input.
//!
//! # Wire format
//!
//! ```text
//! name=value(&name=value)*
//! ```
//!
//! Values are form-urlencoded, except that `;`, `:` and `,` are always left
//! literal. List values repeat their name once per element. The reserved
//! `merchantParams` field carries a `k:v;k:v` mini-grammar encoded as a single
//! value.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use url::form_urlencoded;

/// Wire name of the merchant parameters field.
pub const MERCHANT_PARAMS: &str = "merchantParams";

/// Value of a single request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single value.
    Scalar(String),
    /// A repeated value, emitted once per element in order.
    List(Vec<String>),
    /// Free-form merchant key/value pairs, collapsed to `k1:v1;k2:v2`.
    MerchantParams(Vec<(String, String)>),
    /// An unset field. Omitted from the output entirely.
    Null,
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the scalar value, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A named request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    /// Returns the field name in its camelCase wire form.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// Ordered field list of one request.
///
/// Order is significant: a request type lists its own fields first, then
/// appends its base type's fields with [`FieldSet::then`]. Within one set a
/// name appears at most once; [`FieldSet::with`] replaces an existing entry in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a field, or replaces the value of an existing field with the same
    /// name without changing its position. Names are compared in their
    /// camelCase wire form, so `merchant_id` and `merchantId` are one field.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// In-place variant of [`FieldSet::with`].
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name: String = name.into();
        let name = camel_case(&name).into_owned();
        let value = value.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.value = value;
        } else {
            self.fields.push(Field { name, value });
        }
    }

    /// Appends the fields of a base level after this one.
    ///
    /// Names are not deduplicated across levels: a derived type that
    /// redeclares a base field emits both.
    #[must_use]
    pub fn then(mut self, base: Self) -> Self {
        self.fields.extend(base.fields);
        self
    }

    /// Looks up a field value by name (first match).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let name = camel_case(name);
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// Returns `true` if `name` is present with a non-null, non-empty value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        match self.get(name) {
            None | Some(FieldValue::Null) => false,
            Some(FieldValue::Scalar(v)) => !v.is_empty(),
            Some(FieldValue::List(items)) => !items.is_empty(),
            Some(FieldValue::MerchantParams(pairs)) => !pairs.is_empty(),
        }
    }

    /// Iterates over fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of fields, null ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the set holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for FieldSet
where
    N: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// The deterministic serialized form of a [`FieldSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalQuery(String);

impl CanonicalQuery {
    /// Returns the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the query as UTF-8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the query and returns the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes a field set into its canonical query string.
///
/// Never fails: field validation happens before a [`FieldSet`] is built.
/// Null fields, empty lists and empty merchant parameter lists produce no
/// segment.
#[must_use]
pub fn encode(fields: &FieldSet) -> CanonicalQuery {
    let mut segments: Vec<String> = Vec::with_capacity(fields.len());

    for field in fields.iter() {
        match &field.value {
            FieldValue::Null => {}
            FieldValue::Scalar(value) => {
                segments.push(segment(&field.name, value));
            }
            FieldValue::List(items) => {
                segments.extend(items.iter().map(|item| segment(&field.name, item)));
            }
            FieldValue::MerchantParams(pairs) if pairs.is_empty() => {}
            FieldValue::MerchantParams(pairs) => {
                segments.push(segment(MERCHANT_PARAMS, &collapse_merchant_params(pairs)));
            }
        }
    }

    CanonicalQuery(restore_delimiters(&segments.join("&")))
}

/// Collapses merchant parameters into `k1:v1;k2:v2`.
#[must_use]
pub fn collapse_merchant_params(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect::<Vec<_>>()
        .join(";")
}

fn segment(name: &str, value: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{name}={encoded}")
}

/// The gateway expects `;`, `:` and `,` literally inside otherwise encoded values.
fn restore_delimiters(query: &str) -> String {
    query
        .replace("%3B", ";")
        .replace("%3b", ";")
        .replace("%3A", ":")
        .replace("%3a", ":")
        .replace("%2C", ",")
        .replace("%2c", ",")
}

/// Converts `snake_case` names to `camelCase`. Names without underscores are
/// returned unchanged so declared names such as `statusURL` survive.
fn camel_case(name: &str) -> Cow<'_, str> {
    if !name.contains('_') {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}
