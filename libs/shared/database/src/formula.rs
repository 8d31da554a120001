use std::fmt;

use chrono::NaiveDate;

/// Date operand for the date comparison functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateArg {
    Today,
    Date(NaiveDate),
}

impl fmt::Display for DateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateArg::Today => f.write_str("TODAY()"),
            DateArg::Date(date) => write!(f, "'{}'", date.format("%Y-%m-%d")),
        }
    }
}

/// A boolean formula understood by the record store's `filterByFormula`.
///
/// Formulas are only ever built through the constructors below, so every
/// string that ends up inside one is quoted and escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula(String);

impl Formula {
    /// `{field}='value'`
    pub fn equals(field: &str, value: &str) -> Self {
        Self(format!("{}={}", field_ref(field), string_literal(value)))
    }

    /// `{field}=FALSE()`; matches unchecked checkboxes.
    pub fn is_false(field: &str) -> Self {
        Self(format!("{}=FALSE()", field_ref(field)))
    }

    pub fn is_after(field: &str, date: DateArg) -> Self {
        Self(format!("IS_AFTER({}, {})", field_ref(field), date))
    }

    pub fn is_before(field: &str, date: DateArg) -> Self {
        Self(format!("IS_BEFORE({}, {})", field_ref(field), date))
    }

    pub fn and<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let rendered: Vec<String> = parts.into_iter().map(|p| p.0).collect();
        Self(format!("AND({})", rendered.join(", ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn field_ref(field: &str) -> String {
    format!("{{{}}}", field)
}

fn string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_slot_match() {
        let formula = Formula::and([
            Formula::equals("Date", "2024-01-05"),
            Formula::equals("Time", "10:00"),
            Formula::is_false("Booked"),
        ]);

        assert_eq!(
            formula.as_str(),
            "AND({Date}='2024-01-05', {Time}='10:00', {Booked}=FALSE())"
        );
    }

    #[test]
    fn test_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let formula = Formula::and([
            Formula::is_after("Date", DateArg::Date(start)),
            Formula::is_before("Date", DateArg::Date(end)),
            Formula::is_false("Booked"),
        ]);

        assert_eq!(
            formula.to_string(),
            "AND(IS_AFTER({Date}, '2024-01-01'), IS_BEFORE({Date}, '2024-01-31'), {Booked}=FALSE())"
        );
    }

    #[test]
    fn test_today() {
        assert_eq!(
            Formula::is_after("Date", DateArg::Today).as_str(),
            "IS_AFTER({Date}, TODAY())"
        );
    }

    #[test]
    fn test_quotes_in_values_are_escaped() {
        let formula = Formula::equals("Patient Name", "O'Brien\\");
        assert_eq!(formula.as_str(), "{Patient Name}='O\\'Brien\\\\'");

        // An injected clause stays inside the literal
        let injected = Formula::equals("Date", "x', TRUE()) OR ('");
        assert_eq!(injected.as_str(), "{Date}='x\\', TRUE()) OR (\\''");
    }
}
