// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::Error;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A framerate token in `numerator/denominator` form.
///
/// The value is kept exactly as entered: `30/1` stays `30/1` and `60/2` is
/// not reduced, because the runtime negotiates on the literal fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// Parse a fraction token.
    ///
    /// Surrounding whitespace is ignored. Exactly one `/` must separate two
    /// integers; the denominator must not be zero. A leading `+` is accepted
    /// and dropped from the canonical form. Signs are kept where they were
    /// typed, so `30/-1` stays `30/-1`.
    ///
    /// ```
    /// use camcast::fraction::Fraction;
    ///
    /// assert_eq!(Fraction::parse(" 30/1 ")?.to_string(), "30/1");
    /// assert_eq!(Fraction::parse("30/-1")?.to_string(), "30/-1");
    /// assert!(Fraction::parse("30/0").is_err());
    /// # Ok::<(), camcast::Error>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidFraction(text.to_string());

        let mut parts = text.trim().split('/');
        let (num, den) = match (parts.next(), parts.next(), parts.next()) {
            (Some(num), Some(den), None) => (num, den),
            _ => return Err(invalid()),
        };

        let numerator = num.parse::<i64>().map_err(|_| invalid())?;
        let denominator = den.parse::<i64>().map_err(|_| invalid())?;
        if denominator == 0 {
            return Err(invalid());
        }

        Ok(Fraction {
            numerator,
            denominator,
        })
    }

    pub fn new(numerator: i64, denominator: i64) -> Result<Self, Error> {
        if denominator == 0 {
            return Err(Error::InvalidFraction(format!(
                "{}/{}",
                numerator, denominator
            )));
        }
        Ok(Fraction {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fraction::parse(s)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validate a framerate token and return its canonical text.
pub fn canonical(text: &str) -> Result<String, Error> {
    Fraction::parse(text).map(|f| f.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(canonical("30/1").unwrap(), "30/1");
        assert_eq!(canonical("60/2").unwrap(), "60/2");
        assert_eq!(canonical("30000/1001").unwrap(), "30000/1001");
        assert_eq!(canonical("  15/1\n").unwrap(), "15/1");
        assert_eq!(canonical("-5/1").unwrap(), "-5/1");
        assert_eq!(canonical("+25/1").unwrap(), "25/1");
        assert_eq!(canonical("030/01").unwrap(), "30/1");
        assert_eq!(canonical("30/-1").unwrap(), "30/-1");
        assert_eq!(canonical("-30/-1").unwrap(), "-30/-1");
    }

    #[test]
    fn test_parse_invalid() {
        for bad in [
            "", "30", "30/", "/1", "30/0", "30/1/1", "a/b", "30.0/1", "30 / 1", "30/-0",
        ] {
            match Fraction::parse(bad) {
                Err(Error::InvalidFraction(text)) => assert_eq!(text, bad),
                other => panic!("expected InvalidFraction for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_accessors() {
        let f: Fraction = "30000/1001".parse().unwrap();
        assert_eq!(f.numerator(), 30000);
        assert_eq!(f.denominator(), 1001);
        assert_eq!(Fraction::new(30, 1).unwrap(), f_30());
        assert!(Fraction::new(1, 0).is_err());
        assert_eq!(Fraction::new(30, -1).unwrap().denominator(), -1);
    }

    fn f_30() -> Fraction {
        Fraction::parse("30/1").unwrap()
    }

    #[test]
    fn test_serialize_as_text() {
        let json = serde_json::to_string(&f_30()).unwrap();
        assert_eq!(json, "\"30/1\"");
    }
}
