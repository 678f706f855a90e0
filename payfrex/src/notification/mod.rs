//! Gateway notifications and their normalization.
//!
//! The gateway reports transaction progress through several serialization
//! paths: synchronous host-to-host responses and redirect callbacks as XML,
//! and asynchronous webhooks as JSON that may wrap the same XML document in a
//! `response` string. [`parse`] accepts all of them and produces one canonical
//! [`Notification`], so downstream code never branches on transport shape.
//!
//! # Accepted documents
//!
//! - a JSON object with `message`, `status`, `operationsArray`, `workFlowResponse`
//! - a JSON object whose `response` member holds one of the other documents
//! - XML rooted at `<response>`
//! - XML rooted at `<payfrex-response>`, same schema as `<response>`
//!
//! A notification may describe several steps of one asynchronous flow (risk
//! check, 3-D Secure authentication, settlement). Operations keep the order in
//! which the gateway emitted them; the last one is authoritative.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_with::{DefaultOnNull, DeserializeAs, SerializeAs, serde_as};

use crate::error::NotificationError;

pub mod xml;

pub use xml::XmlDialect;

/// Byte order mark some webhook senders prepend to the body.
const BOM: char = '\u{feff}';

/// Free-form key/value entries attached to operations and payment details.
pub type Extras = BTreeMap<String, String>;

/// A normalized gateway notification.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Notification {
    /// Overall message.
    #[serde_as(as = "Option<LenientString>")]
    pub message: Option<String>,
    /// Overall status as reported by the gateway.
    #[serde_as(as = "Option<LenientString>")]
    pub status: Option<String>,
    /// Operations in emission order.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "operationsArray")]
    pub operations: Vec<Operation>,
    /// Workflow that processed the transaction.
    #[serde(rename = "workFlowResponse")]
    pub workflow_response: Option<WorkflowResponse>,
    /// Extra parameters attached to the notification as a whole.
    #[serde_as(as = "Option<BTreeMap<_, LenientString>>")]
    pub optional_transaction_params: Option<Extras>,
}

/// One step of the flow described by a [`Notification`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    /// Operation amount.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Option<Decimal>,
    /// ISO 4217 currency code.
    #[serde_as(as = "Option<LenientString>")]
    pub currency: Option<String>,
    /// Free-text details.
    #[serde_as(as = "Option<LenientString>")]
    pub details: Option<String>,
    /// Merchant-side transaction identifier.
    #[serde_as(as = "Option<LenientString>")]
    pub merchant_transaction_id: Option<String>,
    /// Operation type, e.g. `DEBIT`, `CREDIT`, `VOID`.
    #[serde_as(as = "Option<LenientString>")]
    pub operation_type: Option<String>,
    /// Transaction identifier at the payment solution.
    #[serde_as(as = "Option<LenientString>")]
    pub pay_sol_transaction_id: Option<String>,
    /// Gateway service that produced this step, e.g. `3DSv2`.
    #[serde_as(as = "Option<LenientString>")]
    pub service: Option<String>,
    /// Step status, e.g. `SUCCESS`, `PENDING`, `ERROR`.
    #[serde_as(as = "Option<LenientString>")]
    pub status: Option<String>,
    /// Gateway transaction identifier.
    #[serde_as(as = "Option<LenientString>")]
    pub transaction_id: Option<String>,
    /// Gateway response code.
    pub resp_code: Option<RespCode>,
    /// Step message.
    #[serde_as(as = "Option<LenientString>")]
    pub message: Option<String>,
    /// Transaction this step refers back to (refunds, captures).
    #[serde_as(as = "Option<LenientString>")]
    pub original_transaction_id: Option<String>,
    /// Card or account metadata.
    pub payment_details: Option<PaymentDetails>,
    /// Redirect target, optionally prefixed with `redirect:`.
    #[serde_as(as = "Option<LenientString>")]
    pub redirection_response: Option<String>,
    /// Payment method.
    #[serde_as(as = "Option<LenientString>")]
    pub payment_method: Option<String>,
    /// Payment solution.
    #[serde_as(as = "Option<LenientString>")]
    pub payment_solution: Option<String>,
    /// Issuer authorization code.
    #[serde_as(as = "Option<LenientString>")]
    pub auth_code: Option<String>,
    /// Acquirer response code.
    #[serde_as(as = "Option<LenientString>")]
    pub rad: Option<String>,
    /// Acquirer response message.
    #[serde_as(as = "Option<LenientString>")]
    pub rad_message: Option<String>,
    /// Subscription plan for recurring payments.
    #[serde_as(as = "Option<LenientString>")]
    pub subscription_plan: Option<String>,
    /// 3-D Secure authentication data.
    pub mpi: Option<Mpi>,
    /// Payment-solution response code.
    #[serde_as(as = "Option<LenientString>")]
    pub payment_code: Option<String>,
    /// Payment-solution response message.
    #[serde_as(as = "Option<LenientString>")]
    pub payment_message: Option<String>,
    /// Extra parameters attached to this step.
    #[serde_as(as = "Option<BTreeMap<_, LenientString>>")]
    pub optional_transaction_params: Option<Extras>,
}

/// Gateway response code of an operation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespCode {
    /// Numeric code, as text.
    #[serde_as(as = "Option<LenientString>")]
    pub code: Option<String>,
    /// Code description.
    #[serde_as(as = "Option<LenientString>")]
    pub message: Option<String>,
    /// Correlation identifier.
    #[serde_as(as = "Option<LenientString>")]
    pub uuid: Option<String>,
}

/// Card or account metadata of an operation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentDetails {
    /// Token that stands in for the card number in later requests.
    #[serde_as(as = "Option<LenientString>")]
    pub card_number_token: Option<String>,
    /// Account identifier for non-card solutions.
    #[serde_as(as = "Option<LenientString>")]
    pub account: Option<String>,
    /// Card holder name.
    #[serde_as(as = "Option<LenientString>")]
    pub card_holder_name: Option<String>,
    /// Masked card number.
    #[serde_as(as = "Option<LenientString>")]
    pub card_number: Option<String>,
    /// Card brand.
    #[serde_as(as = "Option<LenientString>")]
    pub card_type: Option<String>,
    /// Expiry date, `MMYY`.
    #[serde_as(as = "Option<LenientString>")]
    pub exp_date: Option<String>,
    /// Issuing bank.
    #[serde_as(as = "Option<LenientString>")]
    pub issuer_bank: Option<String>,
    /// Issuing country.
    #[serde_as(as = "Option<LenientString>")]
    pub issuer_country: Option<String>,
    /// Solution-specific extra entries.
    #[serde_as(as = "Option<BTreeMap<_, LenientString>>")]
    pub extra_details: Option<Extras>,
}

/// 3-D Secure merchant plugin data of an operation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mpi {
    /// ACS transaction identifier.
    #[serde(rename = "acsTransID")]
    #[serde_as(as = "Option<LenientString>")]
    pub acs_trans_id: Option<String>,
    /// Authentication method.
    #[serde_as(as = "Option<LenientString>")]
    pub auth_method: Option<String>,
    /// Authentication timestamp.
    #[serde_as(as = "Option<LenientString>")]
    pub auth_timestamp: Option<String>,
    /// Authentication status.
    #[serde_as(as = "Option<LenientString>")]
    pub authentication_status: Option<String>,
    /// Cardholder authentication verification value.
    #[serde_as(as = "Option<LenientString>")]
    pub cavv: Option<String>,
    /// Electronic commerce indicator.
    #[serde_as(as = "Option<LenientString>")]
    pub eci: Option<String>,
    /// 3-D Secure protocol version.
    #[serde_as(as = "Option<LenientString>")]
    pub message_version: Option<String>,
    /// Opaque session data echoed to the ACS.
    #[serde(rename = "threeDSSessionData")]
    #[serde_as(as = "Option<LenientString>")]
    pub three_ds_session_data: Option<String>,
    /// 3-D Secure v2 token.
    #[serde(rename = "threeDSv2Token")]
    #[serde_as(as = "Option<LenientString>")]
    pub three_ds_v2_token: Option<String>,
}

/// Workflow metadata of a notification.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowResponse {
    /// Workflow identifier.
    #[serde_as(as = "Option<LenientString>")]
    pub id: Option<String>,
    /// Workflow name.
    #[serde_as(as = "Option<LenientString>")]
    pub name: Option<String>,
    /// Workflow version.
    #[serde_as(as = "Option<LenientString>")]
    pub version: Option<String>,
}

impl Notification {
    /// Returns the authoritative (last) operation.
    #[must_use]
    pub fn last_operation(&self) -> Option<&Operation> {
        self.operations.last()
    }

    /// Builds a notification from an already parsed JSON value.
    ///
    /// A `response` member is unwrapped the same way [`parse`] does it.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the value has the wrong shape.
    pub fn from_json_value(value: Value) -> Result<Self, NotificationError> {
        match value {
            Value::Object(mut envelope) => match envelope.remove("response") {
                Some(inner) => unwrap_response(inner),
                None => Ok(serde_json::from_value(Value::Object(envelope))?),
            },
            other => Err(NotificationError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl FromStr for Notification {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}

/// Normalizes a raw notification document.
///
/// # Errors
///
/// Returns [`NotificationError::Empty`] for blank input,
/// [`NotificationError::UnknownFormat`] for XML with an unrecognized root
/// element, and [`NotificationError::Malformed`] for anything else that cannot
/// be decoded.
pub fn parse(raw: &[u8]) -> Result<Notification, NotificationError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| NotificationError::Malformed(format!("not UTF-8: {e}")))?;
    parse_str(text)
}

/// Normalizes a raw notification document held as text. See [`parse`].
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(raw: &str) -> Result<Notification, NotificationError> {
    let document = raw.trim_matches(|c: char| c.is_whitespace() || c == BOM);
    if document.is_empty() {
        return Err(NotificationError::Empty);
    }
    let notification = if looks_like_json(document) {
        let value: Value = serde_json::from_str(document)?;
        Notification::from_json_value(value)?
    } else {
        xml::parse(document)?
    };

    #[cfg(feature = "telemetry")]
    tracing::debug!(
        status = ?notification.status,
        operations = notification.operations.len(),
        "Normalized gateway notification"
    );

    Ok(notification)
}

fn unwrap_response(inner: Value) -> Result<Notification, NotificationError> {
    match inner {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                Err(NotificationError::Empty)
            } else if looks_like_json(text) {
                Ok(serde_json::from_str(text)?)
            } else {
                #[cfg(feature = "telemetry")]
                tracing::trace!("Unwrapping XML notification from JSON envelope");
                xml::parse(text)
            }
        }
        Value::Object(_) | Value::Array(_) => Ok(serde_json::from_value(inner)?),
        other => xml::parse(&other.to_string()),
    }
}

fn looks_like_json(document: &str) -> bool {
    document.starts_with('{') || document.starts_with('[')
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses an amount written either as `50.0000` or in scientific notation.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, NotificationError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| NotificationError::Malformed(format!("invalid amount {raw:?}")))
}

/// Text field that also accepts JSON numbers and booleans.
///
/// XML carries every scalar as text, while JSON webhooks send identifiers,
/// codes and flags as numbers or booleans. Both read into the same `String`.
struct LenientString;

impl<'de> DeserializeAs<'de, String> for LenientString {
    fn deserialize_as<D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string, number or boolean, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl SerializeAs<String> for LenientString {
    fn serialize_as<S>(source: &String, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(source)
    }
}

/// JSON amounts arrive as strings or numbers.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "invalid amount: expected a string or number, got {}",
                json_kind(&other)
            )));
        }
    };
    parse_amount(&raw).map(Some).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const XML_NOTIFICATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <message>Denied by issuer</message>
  <status>ERROR</status>
  <operations>
    <operation>
      <amount>50.0000</amount>
      <currency>EUR</currency>
      <merchantTransactionId>TX-1</merchantTransactionId>
      <operationType>DEBIT</operationType>
      <service>RISK</service>
      <status>SUCCESS</status>
      <transactionId>7001</transactionId>
      <message>Risk check passed</message>
    </operation>
    <operation>
      <amount>50.0000</amount>
      <currency>EUR</currency>
      <merchantTransactionId>TX-1</merchantTransactionId>
      <operationType>DEBIT</operationType>
      <service>3DSv2</service>
      <status>SUCCESS3DS</status>
      <transactionId>7001</transactionId>
      <mpi>
        <acsTransID>6f1a6b1e-9f1e-4b39-9d4f-0d8d4f1a2b3c</acsTransID>
        <authMethod>01</authMethod>
        <authenticationStatus>Y</authenticationStatus>
        <cavv>AAABBBCCCDDD</cavv>
        <eci>05</eci>
        <messageVersion>2.1.0</messageVersion>
        <threeDSv2Token>tok-3ds</threeDSv2Token>
      </mpi>
    </operation>
    <operation>
      <amount>50.0000</amount>
      <currency>EUR</currency>
      <merchantTransactionId>TX-1</merchantTransactionId>
      <operationType>DEBIT</operationType>
      <paySolTransactionId/>
      <service>DIRECT</service>
      <status>ERROR</status>
      <transactionId>7001</transactionId>
      <respCode>
        <code>190</code>
        <message>Denied</message>
        <uuid>c0ffee</uuid>
      </respCode>
      <message>Denied by issuer</message>
      <paymentDetails>
        <cardNumberToken>4900000000001234</cardNumberToken>
        <cardHolderName>Jane Doe</cardHolderName>
        <cardNumber>411111****1111</cardNumber>
        <cardType>VISA</cardType>
        <expDate>1230</expDate>
        <issuerBank>Test Bank</issuerBank>
        <issuerCountry>ES</issuerCountry>
        <extraDetails>
          <entry><key>rememberMe</key><value>true</value></entry>
          <entry><key>cardCategory</key><value>Credit</value></entry>
        </extraDetails>
      </paymentDetails>
      <paymentSolution>creditcards</paymentSolution>
      <paymentCode>190</paymentCode>
      <paymentMessage>Denied by issuer</paymentMessage>
      <optionalTransactionParams>
        <entry><key>channel</key><value>web</value></entry>
      </optionalTransactionParams>
    </operation>
  </operations>
  <workFlowResponse>
    <id>11</id>
    <name>default</name>
    <version>3</version>
  </workFlowResponse>
</response>"#;

    fn payfrex_dialect() -> String {
        XML_NOTIFICATION
            .replace("<response>", "<payfrex-response>")
            .replace("</response>", "</payfrex-response>")
    }

    #[test]
    fn test_xml_response_keeps_operation_order() {
        let notification = parse_str(XML_NOTIFICATION).unwrap();
        assert_eq!(notification.status.as_deref(), Some("ERROR"));
        assert_eq!(notification.message.as_deref(), Some("Denied by issuer"));

        let services: Vec<_> = notification
            .operations
            .iter()
            .map(|op| op.service.as_deref().unwrap())
            .collect();
        assert_eq!(services, ["RISK", "3DSv2", "DIRECT"]);
    }

    #[test]
    fn test_xml_fields_are_mapped() {
        let notification = parse_str(XML_NOTIFICATION).unwrap();
        let last = notification.last_operation().unwrap();

        assert_eq!(last.amount, Some(Decimal::new(500_000, 4)));
        assert_eq!(last.pay_sol_transaction_id, None);
        assert_eq!(last.redirection_response, None);

        let resp_code = last.resp_code.as_ref().unwrap();
        assert_eq!(resp_code.code.as_deref(), Some("190"));
        assert_eq!(resp_code.uuid.as_deref(), Some("c0ffee"));

        let details = last.payment_details.as_ref().unwrap();
        assert_eq!(details.card_type.as_deref(), Some("VISA"));
        assert_eq!(details.account, None);
        let extras = details.extra_details.as_ref().unwrap();
        assert_eq!(extras.get("rememberMe").map(String::as_str), Some("true"));
        assert_eq!(extras.len(), 2);

        let params = last.optional_transaction_params.as_ref().unwrap();
        assert_eq!(params.get("channel").map(String::as_str), Some("web"));

        let mpi = notification.operations[1].mpi.as_ref().unwrap();
        assert_eq!(mpi.eci.as_deref(), Some("05"));
        assert_eq!(mpi.three_ds_v2_token.as_deref(), Some("tok-3ds"));
        assert_eq!(mpi.three_ds_session_data, None);

        let workflow = notification.workflow_response.as_ref().unwrap();
        assert_eq!(workflow.name.as_deref(), Some("default"));
    }

    #[test]
    fn test_all_xml_transports_are_equivalent() {
        let plain = parse_str(XML_NOTIFICATION).unwrap();
        let dialect = parse_str(&payfrex_dialect()).unwrap();
        let wrapped = parse_str(&json!({ "response": XML_NOTIFICATION }).to_string()).unwrap();

        assert_eq!(plain, dialect);
        assert_eq!(plain, wrapped);
        assert_eq!(plain.operations.len(), 3);
    }

    #[test]
    fn test_raw_json_notification() {
        let body = json!({
            "message": "Success",
            "status": "SUCCESS",
            "operationsArray": [
                {
                    "amount": 12.5,
                    "currency": "EUR",
                    "status": "SUCCESS",
                    "service": "DIRECT",
                    "merchantTransactionId": "TX-9",
                    "paymentDetails": {
                        "cardType": "MASTERCARD",
                        "extraDetails": { "rememberMe": "false" }
                    },
                    "mpi": { "acsTransID": "abc", "threeDSSessionData": "sess" }
                }
            ],
            "workFlowResponse": { "id": "1", "name": "wf", "version": "2" }
        });
        let notification = parse(body.to_string().as_bytes()).unwrap();
        let op = notification.last_operation().unwrap();

        assert_eq!(op.amount, Some(Decimal::new(125, 1)));
        assert_eq!(op.merchant_transaction_id.as_deref(), Some("TX-9"));
        let mpi = op.mpi.as_ref().unwrap();
        assert_eq!(mpi.acs_trans_id.as_deref(), Some("abc"));
        assert_eq!(mpi.three_ds_session_data.as_deref(), Some("sess"));
        assert_eq!(
            op.payment_details
                .as_ref()
                .and_then(|d| d.extra_details.as_ref())
                .and_then(|e| e.get("rememberMe"))
                .map(String::as_str),
            Some("false")
        );
    }

    #[test]
    fn test_json_scalars_may_be_numbers_or_booleans() {
        let body = json!({
            "status": "SUCCESS",
            "operationsArray": [{
                "status": "SUCCESS",
                "transactionId": 7001,
                "respCode": { "code": 0, "message": "OK" },
                "paymentDetails": { "extraDetails": { "rememberMe": true, "tries": 2 } },
                "optionalTransactionParams": { "channel": "web", "retry": false }
            }],
            "workFlowResponse": { "id": 11, "version": 3 }
        });
        let notification = parse_str(&body.to_string()).unwrap();
        let op = notification.last_operation().unwrap();

        assert_eq!(op.status.as_deref(), Some("SUCCESS"));
        assert_eq!(op.transaction_id.as_deref(), Some("7001"));
        assert_eq!(op.resp_code.as_ref().unwrap().code.as_deref(), Some("0"));

        let extras = op
            .payment_details
            .as_ref()
            .and_then(|d| d.extra_details.as_ref())
            .unwrap();
        assert_eq!(extras.get("rememberMe").map(String::as_str), Some("true"));
        assert_eq!(extras.get("tries").map(String::as_str), Some("2"));

        let params = op.optional_transaction_params.as_ref().unwrap();
        assert_eq!(params.get("retry").map(String::as_str), Some("false"));

        let workflow = notification.workflow_response.as_ref().unwrap();
        assert_eq!(workflow.id.as_deref(), Some("11"));
        assert_eq!(workflow.version.as_deref(), Some("3"));
    }

    #[test]
    fn test_json_scalar_rejects_nested_values() {
        let body = r#"{"operationsArray":[{"status":{"code":"SUCCESS"}}]}"#;
        assert!(matches!(
            parse_str(body),
            Err(NotificationError::Malformed(_))
        ));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let json = "\u{feff}{\"status\":\"SUCCESS\",\"operationsArray\":[{\"status\":\"SUCCESS\"}]}";
        let notification = parse_str(json).unwrap();
        assert_eq!(notification.status.as_deref(), Some("SUCCESS"));

        let xml = format!("\u{feff}{XML_NOTIFICATION}");
        assert_eq!(parse_str(&xml).unwrap(), parse_str(XML_NOTIFICATION).unwrap());

        let bytes = "\u{feff}  \n".as_bytes();
        assert!(matches!(parse(bytes), Err(NotificationError::Empty)));
    }

    #[test]
    fn test_json_envelope_with_nested_json() {
        let inner = json!({ "status": "PENDING", "operationsArray": [{ "status": "PENDING" }] });
        let as_string = json!({ "response": inner.to_string() }).to_string();
        let as_object = json!({ "response": inner }).to_string();

        let a = parse_str(&as_string).unwrap();
        let b = parse_str(&as_object).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.status.as_deref(), Some("PENDING"));
    }

    #[test]
    fn test_null_operations_array_is_empty() {
        let notification = parse_str(r#"{"status":"ERROR","operationsArray":null}"#).unwrap();
        assert!(notification.operations.is_empty());
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(matches!(parse_str(" \n\t "), Err(NotificationError::Empty)));
        assert!(matches!(parse(b""), Err(NotificationError::Empty)));
        assert!(matches!(
            parse_str(r#"{"response": "   "}"#),
            Err(NotificationError::Empty)
        ));
    }

    #[test]
    fn test_unknown_xml_root_is_rejected() {
        let err = parse_str("<notification><status>OK</status></notification>").unwrap_err();
        assert!(matches!(err, NotificationError::UnknownFormat(ref root) if root == "notification"));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            parse_str("{not json"),
            Err(NotificationError::Malformed(_))
        ));
        assert!(matches!(
            parse_str("status=OK"),
            Err(NotificationError::Malformed(_))
        ));
        assert!(matches!(
            parse_str("[1, 2, 3]"),
            Err(NotificationError::Malformed(_))
        ));
        assert!(matches!(
            parse(&[0xff, 0xfe, 0x00]),
            Err(NotificationError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_amount_is_malformed() {
        let xml = "<response><operations><operation><amount>fifty</amount></operation></operations></response>";
        assert!(matches!(parse_str(xml), Err(NotificationError::Malformed(_))));

        let json = r#"{"operationsArray":[{"amount":"fifty"}]}"#;
        assert!(matches!(parse_str(json), Err(NotificationError::Malformed(_))));
    }

    #[test]
    fn test_from_str() {
        let notification: Notification = XML_NOTIFICATION.parse().unwrap();
        assert_eq!(notification.operations.len(), 3);
    }
}
