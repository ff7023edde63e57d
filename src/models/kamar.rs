use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::access::{AccessLevel, Capability};
use crate::error::ParseError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Billing cycle length, "1 bulan" through "12 bulan".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentPattern(u32);

impl PaymentPattern {
    pub const MAX_MONTHS: u32 = 12;

    pub fn new(months: u32) -> Option<Self> {
        (1..=Self::MAX_MONTHS).contains(&months).then_some(Self(months))
    }

    pub fn months(self) -> u32 {
        self.0
    }

    /// All twelve labels in the order the frontend lists them.
    pub fn all() -> impl Iterator<Item = PaymentPattern> {
        (1..=Self::MAX_MONTHS).map(PaymentPattern)
    }
}

impl Default for PaymentPattern {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for PaymentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bulan", self.0)
    }
}

impl FromStr for PaymentPattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPattern(s.to_string());

        let mut parts = s.split_whitespace();
        let months = parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if parts.next() != Some("bulan") || parts.next().is_some() {
            return Err(invalid());
        }

        Self::new(months).ok_or_else(invalid)
    }
}

impl TryFrom<String> for PaymentPattern {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentPattern> for String {
    fn from(pattern: PaymentPattern) -> Self {
        pattern.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub period: u32,
    pub payment_pattern: PaymentPattern,
    pub payment_proof_date: Option<NaiveDate>,
    pub payment_proof_link: String,
    pub next_payment_date: Option<NaiveDate>,
}

impl Payment {
    pub fn initial(period: u32) -> Self {
        Self {
            period,
            payment_pattern: PaymentPattern::default(),
            payment_proof_date: None,
            payment_proof_link: String::new(),
            next_payment_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub prodi: String,
    pub phone_number: String,
    pub dp_date: Option<NaiveDate>,
    pub entry_date: Option<NaiveDate>,
    pub payments: Vec<Payment>,
}

impl Tenant {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            prodi: String::new(),
            phone_number: String::new(),
            dp_date: None,
            entry_date: None,
            payments: vec![Payment::initial(1)],
        }
    }

    pub fn is_occupied(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A room always carries exactly two tenant slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub number: String,
    pub tenants: [Tenant; 2],
}

impl Room {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            tenants: [Tenant::empty(), Tenant::empty()],
        }
    }
}

/// A single tenant field edit, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantEdit {
    Name(String),
    Prodi(String),
    PhoneNumber(String),
    DpDate(Option<NaiveDate>),
    EntryDate(Option<NaiveDate>),
}

/// A single payment field edit, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEdit {
    Pattern(PaymentPattern),
    ProofDate(Option<NaiveDate>),
    ProofLink(String),
}

// Body: {"field": "entry_date", "value": "2024-08-01"}
#[derive(Debug, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum UpdateTenantRequest {
    Name(String),
    Prodi(String),
    PhoneNumber(String),
    DpDate(Option<String>),
    EntryDate(Option<String>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum UpdatePaymentRequest {
    PaymentPattern(String),
    PaymentProofDate(Option<String>),
    PaymentProofLink(String),
}

impl TryFrom<UpdateTenantRequest> for TenantEdit {
    type Error = ParseError;

    fn try_from(request: UpdateTenantRequest) -> Result<Self, Self::Error> {
        Ok(match request {
            UpdateTenantRequest::Name(v) => TenantEdit::Name(v),
            UpdateTenantRequest::Prodi(v) => TenantEdit::Prodi(v),
            UpdateTenantRequest::PhoneNumber(v) => TenantEdit::PhoneNumber(v),
            UpdateTenantRequest::DpDate(v) => TenantEdit::DpDate(parse_date(v.as_deref())?),
            UpdateTenantRequest::EntryDate(v) => TenantEdit::EntryDate(parse_date(v.as_deref())?),
        })
    }
}

impl TryFrom<UpdatePaymentRequest> for PaymentEdit {
    type Error = ParseError;

    fn try_from(request: UpdatePaymentRequest) -> Result<Self, Self::Error> {
        Ok(match request {
            UpdatePaymentRequest::PaymentPattern(v) => PaymentEdit::Pattern(v.parse()?),
            UpdatePaymentRequest::PaymentProofDate(v) => {
                PaymentEdit::ProofDate(parse_date(v.as_deref())?)
            }
            UpdatePaymentRequest::PaymentProofLink(v) => PaymentEdit::ProofLink(v),
        })
    }
}

/// Parse an optional "YYYY-MM-DD" date. A blank value clears the date, the
/// same as an emptied date input.
pub fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, ParseError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| ParseError::InvalidDate(raw.to_string())),
    }
}

/// A room as a given access level is allowed to see it.
#[derive(Debug, Serialize)]
pub struct RoomView<'a> {
    pub index: usize,
    pub number: &'a str,
    pub tenants: Vec<TenantView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TenantView<'a> {
    pub name: &'a str,
    pub prodi: &'a str,
    pub phone_number: &'a str,
    pub dp_date: Option<NaiveDate>,
    pub entry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<&'a [Payment]>,
}

impl<'a> RoomView<'a> {
    pub fn new(index: usize, room: &'a Room, level: AccessLevel) -> Self {
        let show_payments = level.allows(Capability::ViewPayments);
        let tenants = room
            .tenants
            .iter()
            .map(|tenant| TenantView {
                name: &tenant.name,
                prodi: &tenant.prodi,
                phone_number: &tenant.phone_number,
                dp_date: tenant.dp_date,
                entry_date: tenant.entry_date,
                payments: show_payments.then_some(tenant.payments.as_slice()),
            })
            .collect();

        Self {
            index,
            number: &room.number,
            tenants,
        }
    }
}
