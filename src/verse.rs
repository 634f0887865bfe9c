//! Verse records and the date-to-verse mapping
//!
//! A calendar date maps to a verse by counting whole days since the Unix epoch
//! for the *local* midnight of that date and taking a non-negative remainder
//! against the dataset length. The mapping is pure: the same date and the same
//! dataset always give the same verse, including dates before 1970.

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::dataset::VerseDataset;
use crate::prefs::Language;
use crate::{Error, Result};

/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// One scripture passage with bilingual text and commentary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub chapter: u32,
    pub verse: u32,
    pub sanskrit: String,
    pub transliteration: String,
    pub english_meaning: String,
    pub hindi_meaning: String,
    pub reflection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hindi_reflection: Option<String>,
}

const CHAPTER_FOCUS_HI: [&str; 18] = [
    "मोह और स्पष्ट दृष्टि",
    "आत्मा की नित्यता और समत्व",
    "निष्काम कर्म और उत्तरदायित्व",
    "ज्ञान से कर्म की शुद्धि",
    "त्याग और कर्तव्य का संतुलन",
    "मन का अनुशासन और ध्यान",
    "ईश्वर को सर्वाधार रूप में जानना",
    "हर स्थिति में ईश्वर-स्मरण",
    "भक्ति और ईश्वर-कृपा का संबंध",
    "हर श्रेष्ठता में दिव्यता का दर्शन",
    "विराट रूप और समर्पण",
    "सरल प्रेमपूर्ण भक्ति",
    "शरीर और चेतना का भेद",
    "तीन गुणों से ऊपर उठना",
    "परम पुरुष और जीवन का मूल",
    "दैवी गुणों का विकास",
    "श्रद्धा, वाणी और आचरण की शुद्धि",
    "ज्ञान, कर्म और भक्ति का समन्वय",
];

const GENERIC_FOCUS_HI: &str = "कर्तव्य और आंतरिक स्थिरता";

impl Verse {
    /// Meaning in the requested language, whitespace-normalized
    pub fn meaning(&self, language: Language) -> String {
        match language {
            Language::En => normalize_text(&self.english_meaning),
            Language::Hi => normalize_text(&self.hindi_meaning),
        }
    }

    /// Reflection in the requested language.
    ///
    /// Hindi prefers the dataset's own `hindiReflection`; verses without one get
    /// a generated reflection built around the chapter's theme.
    pub fn reflection_for(&self, language: Language) -> String {
        match language {
            Language::En => normalize_text(&self.reflection),
            Language::Hi => match self.hindi_reflection.as_deref().map(normalize_text) {
                Some(text) if !text.is_empty() => text,
                _ => hindi_reflection_template(self.chapter),
            },
        }
    }

    /// "Chapter 2, Verse 47" or its Hindi equivalent
    pub fn citation(&self, language: Language) -> String {
        match language {
            Language::En => format!("Chapter {}, Verse {}", self.chapter, self.verse),
            Language::Hi => format!("अध्याय {}, श्लोक {}", self.chapter, self.verse),
        }
    }

    /// Text that accompanies a shared card
    pub fn share_caption(&self, language: Language) -> String {
        let heading = match language {
            Language::En => format!(
                "Today's Gita verse: Chapter {}, Verse {}",
                self.chapter, self.verse
            ),
            Language::Hi => format!(
                "आज का गीता श्लोक: अध्याय {}, श्लोक {}",
                self.chapter, self.verse
            ),
        };
        format!("{}\n\n{}", heading, self.meaning(language))
    }

    /// File name for an exported card: `gitapath-<chapter>-<verse>.png`
    pub fn card_file_name(&self) -> String {
        format!("gitapath-{}-{}.png", self.chapter, self.verse)
    }
}

fn hindi_reflection_template(chapter: u32) -> String {
    let focus = chapter
        .checked_sub(1)
        .and_then(|i| CHAPTER_FOCUS_HI.get(i as usize))
        .copied()
        .unwrap_or(GENERIC_FOCUS_HI);
    format!(
        "यह श्लोक हमें {} पर मनन करने के लिए प्रेरित करता है। इसे शांति से पढ़ें, अपने वर्तमान कर्तव्य को बिना भय के देखें, और कर्म को सेवा-भाव से करें। जब अहंकार से हटकर समर्पण आता है, तब विवेक, धैर्य और आध्यात्मिक प्रगति स्वाभाविक रूप से बढ़ती है।",
        focus
    )
}

/// Collapse runs of whitespace to a single space and trim the ends
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical `YYYY-MM-DD` key for a calendar date
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's calendar date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Key for today's local calendar date
pub fn today_key() -> String {
    date_key(today())
}

/// Parse a canonical date key. Only the zero-padded `YYYY-MM-DD` form is accepted.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    let bytes = key.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(Error::InvalidDate(key.to_string()));
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|_| Error::InvalidDate(key.to_string()))
}

/// Whole days since the epoch for the local midnight of `date`
pub fn day_index(date: NaiveDate) -> i64 {
    day_index_in(date, &Local)
}

/// Like [`day_index`], against an explicit time zone.
///
/// The date's midnight in `tz` is converted to an instant and floor-divided by
/// one day, so zones east of UTC land one index below the UTC day number.
pub fn day_index_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    let millis = match tz.from_local_datetime(&midnight).earliest() {
        Some(instant) => instant.timestamp_millis(),
        // Midnight skipped by a DST jump: use the first instant after the gap.
        None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|instant| instant.timestamp_millis())
            .unwrap_or_else(|| midnight.and_utc().timestamp_millis()),
    };
    millis.div_euclid(DAY_MS)
}

/// Verse for a local calendar date
pub fn select_verse(dataset: &VerseDataset, date: NaiveDate) -> &Verse {
    select_verse_in(dataset, date, &Local)
}

/// Verse for a calendar date interpreted in `tz`
pub fn select_verse_in<'a, Tz: TimeZone>(
    dataset: &'a VerseDataset,
    date: NaiveDate,
    tz: &Tz,
) -> &'a Verse {
    let index = verse_index(day_index_in(date, tz), dataset.len());
    &dataset.verses()[index]
}

/// Non-negative remainder of `day_index` against a dataset of `len` verses
pub fn verse_index(day_index: i64, len: usize) -> usize {
    let n = len.max(1) as i64;
    (((day_index % n) + n) % n) as usize
}

/// Calendar days from `from_key` to `to_key`; negative when `to_key` is earlier.
///
/// Both keys denote local midnights, so the rounded millisecond difference is
/// the plain calendar-day difference even across DST changes.
pub fn day_diff(from_key: &str, to_key: &str) -> Result<i64> {
    let from = parse_date_key(from_key)?;
    let to = parse_date_key(to_key)?;
    Ok(to.signed_duration_since(from).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_verse(chapter: u32, verse: u32) -> Verse {
        Verse {
            chapter,
            verse,
            sanskrit: "श्लोक".into(),
            transliteration: "śloka".into(),
            english_meaning: "  Act   without\nattachment. ".into(),
            hindi_meaning: "आसक्ति के बिना कर्म करो।".into(),
            reflection: "Reflect.".into(),
            hindi_reflection: None,
        }
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(ymd(2024, 1, 5)), "2024-01-05");
        assert_eq!(date_key(ymd(1969, 12, 31)), "1969-12-31");
    }

    #[test]
    fn parse_date_key_rejects_unpadded_forms() {
        assert_eq!(parse_date_key("2024-03-09").unwrap(), ymd(2024, 3, 9));
        assert!(parse_date_key("2024-3-9").is_err());
        assert!(parse_date_key("2024-02-30").is_err());
        assert!(parse_date_key("20240309").is_err());
        assert!(parse_date_key("").is_err());
    }

    #[test]
    fn day_index_counts_from_epoch_in_utc() {
        assert_eq!(day_index_in(ymd(1970, 1, 1), &Utc), 0);
        assert_eq!(day_index_in(ymd(1970, 1, 2), &Utc), 1);
        assert_eq!(day_index_in(ymd(1969, 12, 31), &Utc), -1);
    }

    #[test]
    fn day_index_east_of_utc_floors_to_previous_day() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(day_index_in(ymd(1970, 1, 2), &ist), 0);
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(day_index_in(ymd(1970, 1, 2), &pst), 1);
    }

    #[test]
    fn day_index_steps_by_calendar_days() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let start = ymd(2023, 12, 25);
        let end = ymd(2024, 3, 4);
        let days = end.signed_duration_since(start).num_days();
        assert_eq!(day_index_in(end, &ist) - day_index_in(start, &ist), days);
    }

    /// UTC-3 until 2018-11-04, then UTC-2 from 01:00 local; midnight that
    /// day never happens.
    #[derive(Debug, Clone, Copy)]
    struct SkippedMidnight;

    impl SkippedMidnight {
        fn switch_local() -> NaiveDateTime {
            ymd(2018, 11, 4).and_time(NaiveTime::MIN)
        }

        fn before() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn after() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }
    }

    impl TimeZone for SkippedMidnight {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SkippedMidnight
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let switch = Self::switch_local();
            if *local < switch {
                LocalResult::Single(Self::before())
            } else if *local < switch + Duration::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch_local() + Duration::hours(3) {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    #[test]
    fn day_index_survives_skipped_midnight() {
        let tz = SkippedMidnight;
        assert!(tz.from_local_datetime(&SkippedMidnight::switch_local()).earliest().is_none());

        let gap_day = ymd(2018, 11, 4);
        let expected = gap_day.signed_duration_since(ymd(1970, 1, 1)).num_days();
        assert_eq!(day_index_in(gap_day, &tz), expected);
        assert_eq!(day_index_in(ymd(2018, 11, 3), &tz), expected - 1);
        assert_eq!(day_index_in(ymd(2018, 11, 5), &tz), expected + 1);
    }

    #[test]
    fn verse_index_is_non_negative_before_epoch() {
        assert_eq!(verse_index(-1, 3), 2);
        assert_eq!(verse_index(-3, 3), 0);
        assert_eq!(verse_index(-4, 3), 2);
        assert_eq!(verse_index(7, 3), 1);
    }

    #[test]
    fn day_diff_handles_month_and_year_boundaries() {
        assert_eq!(day_diff("2024-01-31", "2024-02-01").unwrap(), 1);
        assert_eq!(day_diff("2023-12-31", "2024-01-01").unwrap(), 1);
        assert_eq!(day_diff("2024-02-28", "2024-03-01").unwrap(), 2);
        assert_eq!(day_diff("2024-01-05", "2024-01-01").unwrap(), -4);
        assert!(day_diff("yesterday", "2024-01-01").is_err());
    }

    #[test]
    fn hindi_reflection_falls_back_to_chapter_focus() {
        let v = sample_verse(6, 5);
        let text = v.reflection_for(Language::Hi);
        assert!(text.contains("मन का अनुशासन और ध्यान"));

        let unknown = sample_verse(40, 1);
        assert!(unknown.reflection_for(Language::Hi).contains(GENERIC_FOCUS_HI));

        let mut own = sample_verse(2, 47);
        own.hindi_reflection = Some(" अपना चिंतन ".into());
        assert_eq!(own.reflection_for(Language::Hi), "अपना चिंतन");
    }

    #[test]
    fn meaning_is_normalized() {
        let v = sample_verse(2, 47);
        assert_eq!(v.meaning(Language::En), "Act without attachment.");
    }

    #[test]
    fn caption_and_file_name_cite_the_verse() {
        let v = sample_verse(2, 47);
        assert_eq!(v.card_file_name(), "gitapath-2-47.png");
        assert!(v.share_caption(Language::En).starts_with("Today's Gita verse: Chapter 2, Verse 47"));
        assert!(v.share_caption(Language::Hi).contains("अध्याय 2, श्लोक 47"));
        assert_eq!(v.citation(Language::En), "Chapter 2, Verse 47");
    }

    #[test]
    fn verse_json_uses_camel_case_fields() {
        let json = r#"{"chapter":2,"verse":47,"sanskrit":"s","transliteration":"t",
            "englishMeaning":"e","hindiMeaning":"h","reflection":"r"}"#;
        let v: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(v.english_meaning, "e");
        assert!(v.hindi_reflection.is_none());
    }
}
