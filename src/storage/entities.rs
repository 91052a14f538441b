use std::{fmt::Display, ops::Deref, str::FromStr, sync::Arc};

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::time::truncate_to_minute;

/// Task description entered by the user. Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskText(Arc<str>);

impl FromStr for TaskText {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(anyhow!("Please enter a task before saving."))
        } else {
            Ok(TaskText(s.into()))
        }
    }
}

impl Deref for TaskText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for TaskText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the task log. Field order matches the `Date,Time,Task` columns.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct TaskRecord {
    #[serde(rename = "Date", with = "date_ser")]
    pub date: NaiveDate,
    #[serde(rename = "Time", with = "time_ser")]
    pub time: NaiveTime,
    #[serde(rename = "Task")]
    pub text: Arc<str>,
}

impl TaskRecord {
    pub fn new(moment: NaiveDateTime, text: TaskText) -> Self {
        Self {
            date: moment.date(),
            time: truncate_to_minute(moment.time()),
            text: text.0,
        }
    }
}

mod date_ser {
    use chrono::NaiveDate;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_record_date, RECORD_DATE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_record_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), RECORD_DATE_FORMAT).map_err(D::Error::custom)
    }
}

mod time_ser {
    use chrono::NaiveTime;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_record_time, RECORD_TIME_FORMAT};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_record_time(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(s.trim(), RECORD_TIME_FORMAT).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{TaskRecord, TaskText};

    #[test]
    fn test_task_text_is_trimmed() {
        let text = "  write report \n".parse::<TaskText>().unwrap();
        assert_eq!(&*text, "write report");
    }

    #[test]
    fn test_blank_task_text_rejected() {
        assert!("".parse::<TaskText>().is_err());
        assert!(" \t\n".parse::<TaskText>().is_err());
    }

    #[test]
    fn test_record_drops_seconds() {
        let moment = NaiveDate::from_ymd_opt(2018, 7, 4)
            .unwrap()
            .and_hms_opt(13, 5, 42)
            .unwrap();
        let record = TaskRecord::new(moment, "review".parse().unwrap());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        assert_eq!(record.time, NaiveTime::from_hms_opt(13, 5, 0).unwrap());
        assert_eq!(&*record.text, "review");
    }
}
