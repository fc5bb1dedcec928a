use std::collections::HashMap;

/// Postal code / full name pairs for the 50 states, DC, and the territories.
const STATE_TABLE: [(&str, &str); 56] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("MP", "Northern Mariana Islands"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VI", "Virgin Islands"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Bidirectional postal code <-> full state name lookup.
pub struct StateNames {
    by_code: HashMap<&'static str, &'static str>,
    by_name: HashMap<&'static str, &'static str>,
}

impl StateNames {
    pub fn new() -> Self {
        let mut by_code = HashMap::with_capacity(STATE_TABLE.len());
        let mut by_name = HashMap::with_capacity(STATE_TABLE.len());
        for (code, name) in STATE_TABLE {
            by_code.insert(code, name);
            by_name.insert(name, code);
        }
        Self { by_code, by_name }
    }

    pub fn full_name(&self, code: &str) -> Option<&'static str> {
        self.by_code.get(code).copied()
    }

    pub fn postal_code(&self, full_name: &str) -> Option<&'static str> {
        self.by_name.get(full_name).copied()
    }
}

impl Default for StateNames {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let names = StateNames::new();
        for (code, name) in STATE_TABLE {
            assert_eq!(names.full_name(code), Some(name));
            assert_eq!(names.postal_code(name), Some(code));
        }
    }

    #[test]
    fn test_unknown_code() {
        let names = StateNames::new();
        assert_eq!(names.full_name("ZZ"), None);
        assert_eq!(names.postal_code("Atlantis"), None);
    }
}
