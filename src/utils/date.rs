use chrono::{DateTime, NaiveDateTime};

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// accepts both the storage format and RFC 3339 as sent by licensors
pub fn parse_date(str_time: &str) -> Option<NaiveDateTime> {
    if let Ok(time) = NaiveDateTime::parse_from_str(str_time, DATE_FMT) {
        return Some(time);
    }
    DateTime::parse_from_rfc3339(str_time).ok().map(|t| t.naive_utc())
}

pub fn format_date(time: NaiveDateTime) -> String {
    format!("{}", time.format(DATE_FMT))
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, parse_date};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_date(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        parse_date(str_time.as_str()).ok_or_else(|| D::Error::custom(format!("invalid date {}", str_time)))
    }
}

pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::utils::date::{format_date, parse_date};

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        time.map(format_date).serialize(serializer)
    }

    // empty strings are how DynamoDB rows store a missing date
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        Ok(str_time.and_then(|s| parse_date(s.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::utils::date::{format_date, parse_date};

    #[tokio::test]
    async fn test_should_parse_formats() {
        let time = NaiveDate::from_ymd_opt(2023, 4, 12).unwrap().and_hms_opt(12, 12, 12).unwrap();
        assert_eq!(Some(time), parse_date(format_date(time).as_str()));
        assert_eq!(Some(time), parse_date("2023-04-12T12:12:12+00:00"));
        assert_eq!(None, parse_date(""));
    }
}
