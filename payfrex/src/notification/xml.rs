//! XML notification schema.
//!
//! Both XML dialects share one element layout; only the root tag differs.
//! The root is sniffed with a streaming reader before the document is
//! deserialized, and every vendor element is then mapped field by field into
//! the canonical model. Empty elements such as `<paySolTransactionId/>` map to
//! `None`.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use super::{Extras, Mpi, Notification, Operation, PaymentDetails, RespCode, WorkflowResponse};
use crate::error::NotificationError;

/// Root element dialects accepted for XML notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlDialect {
    /// `<response>`, used by host-to-host responses and webhooks.
    Response,
    /// `<payfrex-response>`, used by redirect callbacks.
    PayfrexResponse,
}

impl XmlDialect {
    /// Returns the root element name of this dialect.
    #[must_use]
    pub const fn root(self) -> &'static str {
        match self {
            Self::Response => "response",
            Self::PayfrexResponse => "payfrex-response",
        }
    }

    /// Peeks the root element of `document` without parsing the rest.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::UnknownFormat`] for any other root name and
    /// [`NotificationError::Malformed`] if no root element can be read.
    pub fn sniff(document: &str) -> Result<Self, NotificationError> {
        let root = root_name(document)?;
        match root.as_str() {
            "response" => Ok(Self::Response),
            "payfrex-response" => Ok(Self::PayfrexResponse),
            _ => Err(NotificationError::UnknownFormat(root)),
        }
    }
}

/// Sniffs the dialect and normalizes an XML notification.
pub(super) fn parse(document: &str) -> Result<Notification, NotificationError> {
    let dialect = XmlDialect::sniff(document)?;

    #[cfg(feature = "telemetry")]
    tracing::debug!(root = dialect.root(), "Detected XML notification");
    #[cfg(not(feature = "telemetry"))]
    let _ = dialect;

    let wire: XmlNotification = quick_xml::de::from_str(document)?;
    wire.into_notification()
}

fn root_name(document: &str) -> Result<String, NotificationError> {
    let mut reader = Reader::from_str(document);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let name = element.local_name();
                return Ok(String::from_utf8_lossy(name.as_ref()).into_owned());
            }
            Event::Eof => {
                return Err(NotificationError::Malformed("no root element".to_owned()));
            }
            Event::Text(text) if !text.iter().all(u8::is_ascii_whitespace) => {
                return Err(NotificationError::Malformed(
                    "unexpected text before root element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct XmlNotification {
    message: Option<String>,
    status: Option<String>,
    operations: Option<XmlOperations>,
    #[serde(rename = "workFlowResponse")]
    workflow_response: Option<XmlWorkflowResponse>,
    optional_transaction_params: Option<XmlEntries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlOperations {
    operation: Vec<XmlOperation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct XmlOperation {
    amount: Option<String>,
    currency: Option<String>,
    details: Option<String>,
    merchant_transaction_id: Option<String>,
    operation_type: Option<String>,
    pay_sol_transaction_id: Option<String>,
    service: Option<String>,
    status: Option<String>,
    transaction_id: Option<String>,
    resp_code: Option<XmlRespCode>,
    message: Option<String>,
    original_transaction_id: Option<String>,
    payment_details: Option<XmlPaymentDetails>,
    redirection_response: Option<String>,
    payment_method: Option<String>,
    payment_solution: Option<String>,
    auth_code: Option<String>,
    rad: Option<String>,
    rad_message: Option<String>,
    subscription_plan: Option<String>,
    mpi: Option<XmlMpi>,
    payment_code: Option<String>,
    payment_message: Option<String>,
    optional_transaction_params: Option<XmlEntries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlRespCode {
    code: Option<String>,
    message: Option<String>,
    uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct XmlPaymentDetails {
    card_number_token: Option<String>,
    account: Option<String>,
    card_holder_name: Option<String>,
    card_number: Option<String>,
    card_type: Option<String>,
    exp_date: Option<String>,
    issuer_bank: Option<String>,
    issuer_country: Option<String>,
    extra_details: Option<XmlEntries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct XmlMpi {
    #[serde(rename = "acsTransID")]
    acs_trans_id: Option<String>,
    auth_method: Option<String>,
    auth_timestamp: Option<String>,
    authentication_status: Option<String>,
    cavv: Option<String>,
    eci: Option<String>,
    message_version: Option<String>,
    #[serde(rename = "threeDSSessionData")]
    three_ds_session_data: Option<String>,
    #[serde(rename = "threeDSv2Token")]
    three_ds_v2_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlWorkflowResponse {
    id: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

/// A JAXB-style map: `<entry><key/><value/></entry>*`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlEntries {
    entry: Vec<XmlEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlEntry {
    key: Option<String>,
    value: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_owned())
        }
    })
}

impl XmlNotification {
    fn into_notification(self) -> Result<Notification, NotificationError> {
        let operations = self
            .operations
            .map(|ops| ops.operation)
            .unwrap_or_default()
            .into_iter()
            .map(XmlOperation::into_operation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Notification {
            message: text(self.message),
            status: text(self.status),
            operations,
            workflow_response: self.workflow_response.map(|wf| WorkflowResponse {
                id: text(wf.id),
                name: text(wf.name),
                version: text(wf.version),
            }),
            optional_transaction_params: self
                .optional_transaction_params
                .map(XmlEntries::into_extras),
        })
    }
}

impl XmlOperation {
    fn into_operation(self) -> Result<Operation, NotificationError> {
        let amount = text(self.amount)
            .map(|raw| super::parse_amount(&raw))
            .transpose()?;

        Ok(Operation {
            amount,
            currency: text(self.currency),
            details: text(self.details),
            merchant_transaction_id: text(self.merchant_transaction_id),
            operation_type: text(self.operation_type),
            pay_sol_transaction_id: text(self.pay_sol_transaction_id),
            service: text(self.service),
            status: text(self.status),
            transaction_id: text(self.transaction_id),
            resp_code: self.resp_code.map(|rc| RespCode {
                code: text(rc.code),
                message: text(rc.message),
                uuid: text(rc.uuid),
            }),
            message: text(self.message),
            original_transaction_id: text(self.original_transaction_id),
            payment_details: self.payment_details.map(XmlPaymentDetails::into_details),
            redirection_response: text(self.redirection_response),
            payment_method: text(self.payment_method),
            payment_solution: text(self.payment_solution),
            auth_code: text(self.auth_code),
            rad: text(self.rad),
            rad_message: text(self.rad_message),
            subscription_plan: text(self.subscription_plan),
            mpi: self.mpi.map(XmlMpi::into_mpi),
            payment_code: text(self.payment_code),
            payment_message: text(self.payment_message),
            optional_transaction_params: self
                .optional_transaction_params
                .map(XmlEntries::into_extras),
        })
    }
}

impl XmlPaymentDetails {
    fn into_details(self) -> PaymentDetails {
        PaymentDetails {
            card_number_token: text(self.card_number_token),
            account: text(self.account),
            card_holder_name: text(self.card_holder_name),
            card_number: text(self.card_number),
            card_type: text(self.card_type),
            exp_date: text(self.exp_date),
            issuer_bank: text(self.issuer_bank),
            issuer_country: text(self.issuer_country),
            extra_details: self.extra_details.map(XmlEntries::into_extras),
        }
    }
}

impl XmlMpi {
    fn into_mpi(self) -> Mpi {
        Mpi {
            acs_trans_id: text(self.acs_trans_id),
            auth_method: text(self.auth_method),
            auth_timestamp: text(self.auth_timestamp),
            authentication_status: text(self.authentication_status),
            cavv: text(self.cavv),
            eci: text(self.eci),
            message_version: text(self.message_version),
            three_ds_session_data: text(self.three_ds_session_data),
            three_ds_v2_token: text(self.three_ds_v2_token),
        }
    }
}

impl XmlEntries {
    /// Entries without a key or value are dropped.
    fn into_extras(self) -> Extras {
        self.entry
            .into_iter()
            .filter_map(|e| Some((text(e.key)?, text(e.value)?)))
            .collect()
    }
}
