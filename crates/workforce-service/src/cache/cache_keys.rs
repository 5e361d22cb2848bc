//! Cache key generators.

/// Prefix of employee entries keyed by national ID number.
pub const EMPLOYEE_BY_NATIONAL_ID_PREFIX: &str = "NationalIDNumber";

/// Key for an employee looked up by national ID number.
#[must_use]
pub fn employee_by_national_id(national_id_number: &str) -> String {
    format!("{EMPLOYEE_BY_NATIONAL_ID_PREFIX}{national_id_number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_key_is_prefix_plus_value() {
        assert_eq!(employee_by_national_id("14417807"), "NationalIDNumber14417807");
    }

    #[test]
    fn test_employee_key_keeps_case() {
        assert_ne!(employee_by_national_id("ab12"), employee_by_national_id("AB12"));
    }
}
