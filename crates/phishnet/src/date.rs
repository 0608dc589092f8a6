// SPDX-License-Identifier: GPL-3.0-or-later

//! `YYYY-MM-DD` dates as used throughout the Phish.Net API.

use chrono::NaiveDate;

use crate::error::{PhishNetError, Result};

/// chrono format string for API dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an API date such as `1980-10-03`.
///
/// Only the zero-padded `YYYY-MM-DD` form is accepted.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    if !has_date_shape(date) {
        return Err(PhishNetError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| PhishNetError::InvalidDate(date.to_string()))
}

/// Format a date the way the API expects it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn has_date_shape(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Serde adapter for `NaiveDate` fields, for use with `#[serde(with = "...")]`.
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{format_date, parse_date};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(de::Error::custom)
    }

    /// Same as the parent module, for `Option<NaiveDate>`. Null and empty
    /// strings decode as `None`.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        use crate::date::{format_date, parse_date};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => serializer.serialize_some(&format_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.is_empty() => parse_date(&raw).map(Some).map_err(de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1980-10-03").unwrap(),
            NaiveDate::from_ymd_opt(1980, 10, 3).unwrap()
        );
        assert_eq!(
            parse_date("2000-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(1980, 10, 3).unwrap()),
            "1980-10-03"
        );
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            "2000-01-01"
        );
    }

    #[test]
    fn test_format_parse_round_trip() {
        let mut day = NaiveDate::from_ymd_opt(1983, 12, 2).unwrap();
        let last = NaiveDate::from_ymd_opt(1985, 3, 1).unwrap();
        while day <= last {
            let text = format_date(day);
            assert_eq!(format_date(parse_date(&text).unwrap()), text);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "not-a-date",
            "",
            "1980-1-3",
            "80-10-03",
            "1980/10/03",
            "1980-10-03T00:00:00",
            " 1980-10-03",
            "1980-13-01",
            "1999-02-29",
        ] {
            let err = parse_date(input).unwrap_err();
            assert!(
                matches!(err, PhishNetError::InvalidDate(ref raw) if raw == input),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_serde_adapters() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Record {
            #[serde(with = "serde_date")]
            played: NaiveDate,
            #[serde(with = "serde_date::option", default)]
            next: Option<NaiveDate>,
        }

        let record: Record =
            serde_json::from_str(r#"{"played":"1994-12-31","next":""}"#).unwrap();
        assert_eq!(record.played, NaiveDate::from_ymd_opt(1994, 12, 31).unwrap());
        assert_eq!(record.next, None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["played"], "1994-12-31");
        assert!(json["next"].is_null());

        assert!(serde_json::from_str::<Record>(r#"{"played":"12/31/1994"}"#).is_err());
    }
}
