use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::validate::{optional_text, required_text};
use stockroom_core::{DomainError, DomainResult, Entity, SupplierId};

pub const NAME_MAX: usize = 250;
pub const EMAIL_MAX: usize = 254;
pub const CONTACT_NUMBER_MAX: usize = 20;
pub const MAIN_CONTACT_MAX: usize = 250;

/// How a supplier expects to be paid.
///
/// The serialized form is the stored code (`"BANK TRANSFER"` keeps its space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "BACS")]
    Bacs,
    #[default]
    #[serde(rename = "BANK TRANSFER")]
    BankTransfer,
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "CHEQUE")]
    Cheque,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Bacs,
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
        PaymentMethod::Cheque,
    ];

    /// Stored code.
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::Bacs => "BACS",
            PaymentMethod::BankTransfer => "BANK TRANSFER",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Cheque => "CHEQUE",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Bacs => "BACS",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Cheque => "Cheque",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    /// Accepts the stored code only (`BACS`, `BANK TRANSFER`, `CASH`, `CHEQUE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.code() == s)
            .ok_or_else(|| DomainError::invalid_format("payment_method", s))
    }
}

/// A supplier that items are bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    email: Option<String>,
    contact_number: Option<String>,
    active: bool,
    main_contact: Option<String>,
    payment_method: PaymentMethod,
}

/// Input for registering a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub active: bool,
    pub main_contact: Option<String>,
    pub payment_method: PaymentMethod,
}

impl NewSupplier {
    /// Active supplier paid by bank transfer, with no contact details.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            contact_number: None,
            active: true,
            main_contact: None,
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_contact_number(mut self, number: impl Into<String>) -> Self {
        self.contact_number = Some(number.into());
        self
    }

    pub fn with_main_contact(mut self, contact: impl Into<String>) -> Self {
        self.main_contact = Some(contact.into());
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }
}

/// Partial update of a supplier.
///
/// `None` keeps the existing value. For optional contact fields,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub contact_number: Option<Option<String>>,
    pub active: Option<bool>,
    pub main_contact: Option<Option<String>>,
    pub payment_method: Option<PaymentMethod>,
}

impl Supplier {
    /// Validate registration input and build the record.
    ///
    /// Uniqueness of name and email is a store-level concern and is not
    /// checked here.
    pub fn register(id: SupplierId, new: &NewSupplier) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: required_text("name", &new.name, NAME_MAX)?,
            email: validate_email(new.email.as_deref())?,
            contact_number: optional_text(
                "contact_number",
                new.contact_number.as_deref(),
                CONTACT_NUMBER_MAX,
            )?,
            active: new.active,
            main_contact: optional_text(
                "main_contact",
                new.main_contact.as_deref(),
                MAIN_CONTACT_MAX,
            )?,
            payment_method: new.payment_method,
        })
    }

    /// Produce the updated record, validating every changed field.
    pub fn with_changes(&self, changes: &SupplierChanges) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(name) = &changes.name {
            next.name = required_text("name", name, NAME_MAX)?;
        }
        if let Some(email) = &changes.email {
            next.email = validate_email(email.as_deref())?;
        }
        if let Some(number) = &changes.contact_number {
            next.contact_number =
                optional_text("contact_number", number.as_deref(), CONTACT_NUMBER_MAX)?;
        }
        if let Some(active) = changes.active {
            next.active = active;
        }
        if let Some(contact) = &changes.main_contact {
            next.main_contact = optional_text("main_contact", contact.as_deref(), MAIN_CONTACT_MAX)?;
        }
        if let Some(method) = changes.payment_method {
            next.payment_method = method;
        }
        Ok(next)
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn contact_number(&self) -> Option<&str> {
        self.contact_number.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn main_contact(&self) -> Option<&str> {
        self.main_contact.as_deref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

impl Entity for Supplier {
    type Id = SupplierId;
    const KIND: &'static str = "supplier";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Supplier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

fn validate_email(email: Option<&str>) -> DomainResult<Option<String>> {
    let email = optional_text("email", email, EMAIL_MAX)?;
    if let Some(address) = &email {
        if !validator::validate_email(address.as_str()) {
            return Err(DomainError::invalid_format("email", address.clone()));
        }
    }
    Ok(email)
}
