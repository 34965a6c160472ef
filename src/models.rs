use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identity of a committed record, assigned when it is first stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered user's contact and address data.
///
/// Every field is free text; nothing here enforces a format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub street_address: String,
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
    pub registration_date: String,
}

impl Record {
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::Email => &self.email,
            RecordField::Phone => &self.phone,
            RecordField::PostalCode => &self.postal_code,
            RecordField::StreetAddress => &self.street_address,
            RecordField::StateCode => &self.state_code,
            RecordField::City => &self.city,
            RecordField::Neighborhood => &self.neighborhood,
            RecordField::RegistrationDate => &self.registration_date,
        }
    }

    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RecordField::Name => self.name = value,
            RecordField::Email => self.email = value,
            RecordField::Phone => self.phone = value,
            RecordField::PostalCode => self.postal_code = value,
            RecordField::StreetAddress => self.street_address = value,
            RecordField::StateCode => self.state_code = value,
            RecordField::City => self.city = value,
            RecordField::Neighborhood => self.neighborhood = value,
            RecordField::RegistrationDate => self.registration_date = value,
        }
    }

    /// Overwrite the address block with a postal-code lookup result
    pub fn apply_address(&mut self, address: &AddressLookup) {
        self.street_address = address.street_address.clone();
        self.state_code = address.state_code.clone();
        self.city = address.city.clone();
        self.neighborhood = address.neighborhood.clone();
    }

    /// Fields that are still empty
    pub fn missing_fields(&self) -> Vec<RecordField> {
        RecordField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// Addressable fields of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Name,
    Email,
    Phone,
    PostalCode,
    StreetAddress,
    StateCode,
    City,
    Neighborhood,
    RegistrationDate,
}

impl RecordField {
    /// All fields in form order
    pub const ALL: [RecordField; 9] = [
        RecordField::Name,
        RecordField::Email,
        RecordField::Phone,
        RecordField::PostalCode,
        RecordField::StreetAddress,
        RecordField::StateCode,
        RecordField::City,
        RecordField::Neighborhood,
        RecordField::RegistrationDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Name => "name",
            RecordField::Email => "email",
            RecordField::Phone => "phone",
            RecordField::PostalCode => "postal_code",
            RecordField::StreetAddress => "street_address",
            RecordField::StateCode => "state_code",
            RecordField::City => "city",
            RecordField::Neighborhood => "neighborhood",
            RecordField::RegistrationDate => "registration_date",
        }
    }

    /// Human-readable label used by the form and the table header
    pub fn label(&self) -> &'static str {
        match self {
            RecordField::Name => "Name",
            RecordField::Email => "Email",
            RecordField::Phone => "Phone",
            RecordField::PostalCode => "Postal Code (CEP)",
            RecordField::StreetAddress => "Street Address",
            RecordField::StateCode => "State",
            RecordField::City => "Municipality",
            RecordField::Neighborhood => "Neighborhood",
            RecordField::RegistrationDate => "Registration Date",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown record field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for RecordField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(RecordField::Name),
            "email" => Ok(RecordField::Email),
            "phone" => Ok(RecordField::Phone),
            "postal_code" | "postalcode" | "cep" => Ok(RecordField::PostalCode),
            "street_address" | "streetaddress" | "address" => Ok(RecordField::StreetAddress),
            "state_code" | "statecode" | "state" => Ok(RecordField::StateCode),
            "city" => Ok(RecordField::City),
            "neighborhood" => Ok(RecordField::Neighborhood),
            "registration_date" | "registrationdate" => Ok(RecordField::RegistrationDate),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// A Brazilian state as published by IBGE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOption {
    pub id: u32,
    pub abbreviation: String,
    pub name: String,
}

impl StateOption {
    /// Dropdown label, e.g. `SP - São Paulo`
    pub fn label(&self) -> String {
        format!("{} - {}", self.abbreviation, self.name)
    }
}

/// A municipality belonging to one [`StateOption`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOption {
    pub id: u32,
    pub name: String,
}

/// Address block resolved from a postal code. Missing parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLookup {
    pub street_address: String,
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in RecordField::ALL {
            assert_eq!(field.as_str().parse::<RecordField>().unwrap(), field);
        }
        assert_eq!("cep".parse::<RecordField>().unwrap(), RecordField::PostalCode);
        assert_eq!("address".parse::<RecordField>().unwrap(), RecordField::StreetAddress);
        assert_eq!(
            "registrationDate".parse::<RecordField>().unwrap(),
            RecordField::RegistrationDate
        );
        assert!("id".parse::<RecordField>().is_err());
    }

    #[test]
    fn test_set_accepts_any_string() {
        let mut record = Record::default();
        record.set(RecordField::Email, "not-an-email");
        record.set(RecordField::Name, "");
        assert_eq!(record.email, "not-an-email");
        assert_eq!(record.get(RecordField::Name), "");
    }

    #[test]
    fn test_apply_address_overwrites_only_address_block() {
        let mut record = Record {
            name: "Ana".to_string(),
            postal_code: "01001000".to_string(),
            street_address: "old".to_string(),
            ..Default::default()
        };
        record.apply_address(&AddressLookup {
            street_address: "Praça da Sé".to_string(),
            state_code: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighborhood: String::new(),
        });

        assert_eq!(record.name, "Ana");
        assert_eq!(record.postal_code, "01001000");
        assert_eq!(record.street_address, "Praça da Sé");
        assert_eq!(record.state_code, "SP");
        assert_eq!(record.neighborhood, "");
    }

    #[test]
    fn test_missing_fields() {
        let mut record = Record::default();
        assert_eq!(record.missing_fields().len(), 9);
        record.name = "  ".to_string();
        record.email = "a@x.com".to_string();
        let missing = record.missing_fields();
        assert!(missing.contains(&RecordField::Name));
        assert!(!missing.contains(&RecordField::Email));
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }
}
