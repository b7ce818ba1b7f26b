//! Filter criteria
//!
//! Seven independent, optional substring filters. Declaration order of [`FilterField`]
//! is the order conditions appear in the predicate.

/// A filterable field of the license dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    ExpirationDate,
    LicenseNumber,
    LicenseType,
    BusinessCounty,
    LicenseSubtype,
    BusinessName,
    OwnerName,
}

impl FilterField {
    /// All fields, in predicate order
    pub const ALL: [FilterField; 7] = [
        FilterField::ExpirationDate,
        FilterField::LicenseNumber,
        FilterField::LicenseType,
        FilterField::BusinessCounty,
        FilterField::LicenseSubtype,
        FilterField::BusinessName,
        FilterField::OwnerName,
    ];

    /// Column name in the remote dataset
    pub fn column(self) -> &'static str {
        match self {
            FilterField::ExpirationDate => "license_expiration_date_mmddccyy",
            FilterField::LicenseNumber => "license_number",
            FilterField::LicenseType => "license_type",
            FilterField::BusinessCounty => "business_county",
            FilterField::LicenseSubtype => "license_subtype",
            FilterField::BusinessName => "business_name",
            FilterField::OwnerName => "owner_name",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// User-supplied filter values, one optional value per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    values: [Option<String>; 7],
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or clear, with `None`) the value for a field. Empty strings clear it.
    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        self.values[field.index()] = value.filter(|v| !v.is_empty());
    }

    /// Builder-style [`FilterCriteria::set`]
    #[allow(dead_code)]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Value for a field, if one is set
    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Active (field, value) pairs in predicate order
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> + '_ {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}
