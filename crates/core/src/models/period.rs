use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{SchoolError, SchoolResult};

/// Serde helpers for `HH:MM` wall-clock times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time `{raw}`, expected HH:MM")))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid time `{raw}`, expected HH:MM"))
                }),
                None => Ok(None),
            }
        }
    }
}

/// Wall-clock span of one numbered period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTime {
    pub period: u32,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Period -> time lookup. Periods are numbered from 1 in table order, and the
/// table length is the number of periods in a school day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTable {
    periods: Vec<PeriodTime>,
}

const STANDARD_DAY: [((u32, u32), (u32, u32)); 8] = [
    ((8, 0), (8, 40)),
    ((8, 40), (9, 20)),
    ((9, 20), (10, 0)),
    ((10, 20), (11, 0)),
    ((11, 0), (11, 40)),
    ((11, 40), (12, 20)),
    ((14, 0), (14, 40)),
    ((14, 40), (15, 20)),
];

impl PeriodTable {
    /// Builds a table from `(start, end)` pairs, numbering periods from 1.
    pub fn new(spans: Vec<(NaiveTime, NaiveTime)>) -> SchoolResult<Self> {
        let mut periods = Vec::with_capacity(spans.len());
        for (index, (start, end)) in spans.into_iter().enumerate() {
            let period = index as u32 + 1;
            if end <= start {
                return Err(SchoolError::Validation(format!(
                    "Period {period} must end after it starts"
                )));
            }
            if let Some(previous) = periods.last().map(|p: &PeriodTime| p.end) {
                if start < previous {
                    return Err(SchoolError::Validation(format!(
                        "Period {period} overlaps the period before it"
                    )));
                }
            }
            periods.push(PeriodTime { period, start, end });
        }

        if periods.is_empty() {
            return Err(SchoolError::Validation(
                "A school day needs at least one period".to_string(),
            ));
        }

        Ok(Self { periods })
    }

    /// Eight 40-minute periods with a morning break and a lunch break.
    pub fn standard() -> Self {
        let periods = STANDARD_DAY
            .iter()
            .zip(1..)
            .filter_map(|(((sh, sm), (eh, em)), period)| {
                Some(PeriodTime {
                    period,
                    start: NaiveTime::from_hms_opt(*sh, *sm, 0)?,
                    end: NaiveTime::from_hms_opt(*eh, *em, 0)?,
                })
            })
            .collect();
        Self { periods }
    }

    /// Parses `"08:00-08:40,08:40-09:20,..."`.
    pub fn parse(spec: &str) -> SchoolResult<Self> {
        let spans = spec
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| -> SchoolResult<(NaiveTime, NaiveTime)> {
                let (start, end) = part.split_once('-').ok_or_else(|| {
                    SchoolError::Validation(format!("Invalid period span `{part}`"))
                })?;
                let start = hhmm::parse(start)
                    .ok_or_else(|| SchoolError::Validation(format!("Invalid start time in `{part}`")))?;
                let end = hhmm::parse(end)
                    .ok_or_else(|| SchoolError::Validation(format!("Invalid end time in `{part}`")))?;
                Ok((start, end))
            })
            .collect::<SchoolResult<Vec<_>>>()?;

        Self::new(spans)
    }

    pub fn periods_per_day(&self) -> u32 {
        self.periods.len() as u32
    }

    pub fn contains(&self, period: u32) -> bool {
        period >= 1 && period <= self.periods_per_day()
    }

    pub fn get(&self, period: u32) -> Option<&PeriodTime> {
        if !self.contains(period) {
            return None;
        }
        self.periods.get(period as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodTime> {
        self.periods.iter()
    }
}

impl Default for PeriodTable {
    fn default() -> Self {
        Self::standard()
    }
}
