//! Request parameter composition and validation.
//!
//! Each request type declares its own fields as an explicit ordered list and
//! appends the fields of the request it builds upon, so the wire order is
//! "own fields first, then base fields, each in declaration order".
//!
//! Validation composes the same way: a derived type contributes its checks to
//! a [`ValidationChain`] and then appends the base type's chain, so the base
//! check always runs last.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::query::{FieldSet, FieldValue};

type Check = Box<dyn Fn(&FieldSet) -> Result<(), ValidationError> + Send + Sync>;

/// An ordered list of field-set checks. Stops at the first failure.
#[derive(Default)]
pub struct ValidationChain {
    checks: Vec<Check>,
}

impl std::fmt::Debug for ValidationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationChain")
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl ValidationChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check.
    #[must_use]
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldSet) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Appends a check that every name in `names` is set.
    #[must_use]
    pub fn mandatory(self, names: &'static [&'static str]) -> Self {
        self.check(move |fields| require(fields, names))
    }

    /// Appends all checks of another chain after this one.
    #[must_use]
    pub fn then(mut self, base: Self) -> Self {
        self.checks.extend(base.checks);
        self
    }

    /// Runs the checks in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] produced.
    pub fn validate(&self, fields: &FieldSet) -> Result<(), ValidationError> {
        self.checks.iter().try_for_each(|check| check(fields))
    }
}

/// Fails with [`ValidationError::MissingField`] for the first name that is
/// absent, null or empty.
///
/// # Errors
///
/// See above.
pub fn require(fields: &FieldSet, names: &[&'static str]) -> Result<(), ValidationError> {
    match names.iter().find(|name| !fields.is_set(name)) {
        Some(missing) => Err(ValidationError::MissingField(*missing)),
        None => Ok(()),
    }
}

/// A request type that can hand the core a validated, ordered [`FieldSet`].
pub trait RequestParameters {
    /// Returns the fields in wire order.
    fn field_set(&self) -> FieldSet;

    /// Returns the checks that must pass before the fields are encoded.
    fn validation(&self) -> ValidationChain;

    /// Builds the field set and runs the validation chain over it.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's [`ValidationError`].
    fn validated(&self) -> Result<FieldSet, ValidationError> {
        let fields = self.field_set();
        self.validation().validate(&fields)?;
        Ok(fields)
    }
}

/// Parameters of a redirection payment, the base of the other payment
/// requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentParameters {
    /// Merchant identifier assigned by the gateway.
    pub merchant_id: Option<String>,
    /// Product identifier assigned by the gateway.
    pub product_id: Option<String>,
    /// Transaction amount.
    pub amount: Option<Decimal>,
    /// ISO 4217 alphabetic currency code.
    pub currency: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,
    /// Merchant-side customer identifier.
    pub customer_id: Option<String>,
    /// Merchant-side transaction identifier.
    pub merchant_transaction_id: Option<String>,
    /// Payment solution, e.g. `creditcards`.
    pub payment_solution: Option<String>,
    /// Asynchronous notification URL.
    pub status_url: Option<String>,
    /// Redirect target after a successful payment.
    pub success_url: Option<String>,
    /// Redirect target after a failed payment.
    pub error_url: Option<String>,
    /// Redirect target after a cancelled payment.
    pub cancel_url: Option<String>,
    /// Redirect target while a payment is pending.
    pub awaiting_url: Option<String>,
    /// Checkout language.
    pub language: Option<String>,
    /// Free-form merchant key/value pairs echoed back in notifications.
    pub merchant_params: Vec<(String, String)>,
}

impl PaymentParameters {
    /// Field names that must be set for every payment.
    pub const MANDATORY: &'static [&'static str] = &[
        "merchantId",
        "productId",
        "amount",
        "currency",
        "country",
        "customerId",
        "merchantTransactionId",
        "paymentSolution",
        "statusURL",
        "successURL",
        "errorURL",
        "cancelURL",
        "awaitingURL",
    ];
}

impl RequestParameters for PaymentParameters {
    fn field_set(&self) -> FieldSet {
        let merchant_params = if self.merchant_params.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::MerchantParams(self.merchant_params.clone())
        };
        FieldSet::new()
            .with("merchantId", self.merchant_id.as_ref())
            .with("productId", self.product_id.as_ref())
            .with("amount", self.amount)
            .with("currency", self.currency.as_ref())
            .with("country", self.country.as_ref())
            .with("customerId", self.customer_id.as_ref())
            .with("merchantTransactionId", self.merchant_transaction_id.as_ref())
            .with("paymentSolution", self.payment_solution.as_ref())
            .with("statusURL", self.status_url.as_ref())
            .with("successURL", self.success_url.as_ref())
            .with("errorURL", self.error_url.as_ref())
            .with("cancelURL", self.cancel_url.as_ref())
            .with("awaitingURL", self.awaiting_url.as_ref())
            .with("language", self.language.as_ref())
            .with("merchantParams", merchant_params)
    }

    fn validation(&self) -> ValidationChain {
        ValidationChain::new()
            .mandatory(Self::MANDATORY)
            .check(check_amount)
            .check(|fields| check_code(fields, "currency", 3))
            .check(|fields| check_code(fields, "country", 2))
    }
}

/// Parameters of the first payment of a recurring series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringPaymentParameters {
    /// Recurrence type, e.g. `newCof` or `newSubscription`.
    pub payment_recurring_type: Option<String>,
    /// Subscription plan identifier for subscription recurrences.
    pub subscription_plan: Option<String>,
    /// The redirection payment this recurrence starts with.
    pub payment: PaymentParameters,
}

impl RequestParameters for RecurringPaymentParameters {
    fn field_set(&self) -> FieldSet {
        FieldSet::new()
            .with("paymentRecurringType", self.payment_recurring_type.as_ref())
            .with("subscriptionPlan", self.subscription_plan.as_ref())
            .then(self.payment.field_set())
    }

    fn validation(&self) -> ValidationChain {
        ValidationChain::new()
            .mandatory(&["paymentRecurringType"])
            .check(|fields| {
                let subscription = fields
                    .get("paymentRecurringType")
                    .and_then(FieldValue::as_scalar)
                    == Some("newSubscription");
                if subscription {
                    require(fields, &["subscriptionPlan"])
                } else {
                    Ok(())
                }
            })
            .then(self.payment.validation())
    }
}

fn check_amount(fields: &FieldSet) -> Result<(), ValidationError> {
    let Some(raw) = fields.get("amount").and_then(FieldValue::as_scalar) else {
        return Ok(());
    };
    let amount: Decimal = raw
        .parse()
        .map_err(|_| ValidationError::invalid("amount", format!("not a decimal: {raw}")))?;
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::invalid("amount", "must be greater than zero"))
    }
}

fn check_code(fields: &FieldSet, field: &'static str, len: usize) -> Result<(), ValidationError> {
    match fields.get(field).and_then(FieldValue::as_scalar) {
        Some(code) if code.len() != len || !code.chars().all(|c| c.is_ascii_alphabetic()) => Err(
            ValidationError::invalid(field, format!("expected {len} ASCII letters, got {code:?}")),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::encode;

    fn payment() -> PaymentParameters {
        PaymentParameters {
            merchant_id: Some("111222".into()),
            product_id: Some("1112220001".into()),
            amount: Some(Decimal::new(500_000, 4)),
            currency: Some("EUR".into()),
            country: Some("ES".into()),
            customer_id: Some("55".into()),
            merchant_transaction_id: Some("TX-1".into()),
            payment_solution: Some("creditcards".into()),
            status_url: Some("https://shop.test/status".into()),
            success_url: Some("https://shop.test/ok".into()),
            error_url: Some("https://shop.test/ko".into()),
            cancel_url: Some("https://shop.test/cancel".into()),
            awaiting_url: Some("https://shop.test/wait".into()),
            language: None,
            merchant_params: vec![("cart".into(), "42".into())],
        }
    }

    #[test]
    fn test_valid_payment_passes() {
        let fields = payment().validated().unwrap();
        assert!(fields.get("language").unwrap().is_null());
    }

    #[test]
    fn test_missing_mandatory_field_is_reported() {
        let mut params = payment();
        params.customer_id = None;
        assert_eq!(
            params.validated(),
            Err(ValidationError::MissingField("customerId"))
        );
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut params = payment();
        params.currency = Some(String::new());
        assert_eq!(
            params.validated(),
            Err(ValidationError::MissingField("currency"))
        );
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let mut params = payment();
        params.amount = Some(Decimal::ZERO);
        assert!(matches!(
            params.validated(),
            Err(ValidationError::Invalid { field: "amount", .. })
        ));
    }

    #[test]
    fn test_bad_country_code_is_rejected() {
        let mut params = payment();
        params.country = Some("ESP".into());
        assert!(matches!(
            params.validated(),
            Err(ValidationError::Invalid { field: "country", .. })
        ));
    }

    #[test]
    fn test_recurring_fields_precede_base_fields() {
        let params = RecurringPaymentParameters {
            payment_recurring_type: Some("newCof".into()),
            subscription_plan: None,
            payment: payment(),
        };
        let query = encode(&params.validated().unwrap());
        assert!(query.as_str().starts_with("paymentRecurringType=newCof&merchantId=111222&"));
        assert!(query.as_str().ends_with("&merchantParams=cart:42"));
    }

    #[test]
    fn test_recurring_check_runs_before_base_check() {
        let params = RecurringPaymentParameters {
            payment_recurring_type: None,
            subscription_plan: None,
            payment: PaymentParameters::default(),
        };
        assert_eq!(
            params.validated(),
            Err(ValidationError::MissingField("paymentRecurringType"))
        );
    }

    #[test]
    fn test_subscription_requires_plan() {
        let params = RecurringPaymentParameters {
            payment_recurring_type: Some("newSubscription".into()),
            subscription_plan: None,
            payment: payment(),
        };
        assert_eq!(
            params.validated(),
            Err(ValidationError::MissingField("subscriptionPlan"))
        );
    }

    #[test]
    fn test_chain_stops_at_first_failure() {
        let chain = ValidationChain::new()
            .check(|_| Err(ValidationError::MissingField("first")))
            .check(|_| Err(ValidationError::MissingField("second")));
        assert_eq!(
            chain.validate(&FieldSet::new()),
            Err(ValidationError::MissingField("first"))
        );
    }
}
