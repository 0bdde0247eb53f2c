use crate::date_partitioner::CaptureDate;
use regex::{Captures, Regex};

/// How a device lays out its dump: a flat directory of media files, or
/// one subdirectory per calendar day.
#[derive(Debug)]
pub enum SourceLayout {
    Flat,
    DaySubdirectories {
        /// Matches day directory names and captures year/month/day
        pattern: Regex,
        /// Human phrasing of what a day directory name should look like
        mismatch_hint: &'static str,
    },
}

/// Sidecar and thumbnail files a device writes next to real media.
/// These are deleted without any content comparison.
#[derive(Debug)]
pub struct IgnorableRule {
    exact_names: &'static [&'static str],
    /// Lowercase suffixes, matched case-insensitively
    suffixes: &'static [&'static str],
}

impl IgnorableRule {
    const NONE: IgnorableRule = IgnorableRule {
        exact_names: &[],
        suffixes: &[],
    };

    pub fn matches(&self, file_name: &str) -> bool {
        if self.exact_names.contains(&file_name) {
            return true;
        }
        let lowered = file_name.to_lowercase();
        self.suffixes.iter().any(|suffix| lowered.ends_with(suffix))
    }
}

/// Immutable ruleset for one device family: source layout, the naming
/// pattern that both validates media files and yields their date, and
/// the ignorable-file rule. The conversion engine is entirely driven by
/// these descriptors; adding a device means adding one constructor here.
#[derive(Debug)]
pub struct DeviceProfile {
    name: &'static str,
    layout: SourceLayout,
    media_pattern: Regex,
    media_mismatch_hint: String,
    ignorable: IgnorableRule,
}

const CANON_DAY_DIRECTORY: &str = r"(?P<year>\d{4})_(?P<month>\d{2})_(?P<day>\d{2})";
const CANON_MEDIA: &str = r"IMG_\d{4}\.JPG|MVI_\d{4}\.AVI";
const HUAWEI_XIAOMI_MEDIA: &str = r"(IMG|PANO|VID|SL_MO_VID)_(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})_\d{6}(_HDR|_HHT|_\d|_BURST\d{3}(_COVER)?)?\.(jpg|mp4)";
const SAMSUNG_MEDIA: &str = r"(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})_\d{6}(\(\d+\))?\.(jpg|mp4)";

impl DeviceProfile {
    /// Canon still camera: shots already bucketed into `YYYY_MM_DD`
    /// directories, with thumbnail sidecars worth dropping on the floor.
    fn canon1() -> Self {
        Self {
            name: "canon1",
            layout: SourceLayout::DaySubdirectories {
                pattern: anchored(CANON_DAY_DIRECTORY),
                mismatch_hint: "is not YYYY_MM_DD",
            },
            media_pattern: anchored(CANON_MEDIA),
            media_mismatch_hint: String::new(),
            ignorable: IgnorableRule {
                exact_names: &["ZbThumbnail.info"],
                suffixes: &[".thm"],
            },
        }
    }

    /// Huawei / Xiaomi phone dump: flat directory, date embedded in the
    /// file name, with a zoo of legal suffixes (`_HDR`, `_BURST###`, ...).
    fn huawei_xiaomi1() -> Self {
        Self {
            name: "huawei-xiaomi1",
            layout: SourceLayout::Flat,
            media_pattern: anchored(HUAWEI_XIAOMI_MEDIA),
            media_mismatch_hint: format!("does not match /{}/", HUAWEI_XIAOMI_MEDIA),
            ignorable: IgnorableRule::NONE,
        }
    }

    /// Samsung phone dump: flat directory of `YYYYMMDD_HHMMSS` names,
    /// optionally versioned like `20151210_010203(0).jpg`.
    fn samsung1() -> Self {
        Self {
            name: "samsung1",
            layout: SourceLayout::Flat,
            media_pattern: anchored(SAMSUNG_MEDIA),
            media_mismatch_hint: "is not YYYYMMDD_HHMMSS.jpg or .mp4".to_string(),
            ignorable: IgnorableRule::NONE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    pub fn ignorable(&self) -> &IgnorableRule {
        &self.ignorable
    }

    pub fn media_mismatch_hint(&self) -> &str {
        &self.media_mismatch_hint
    }

    /// Validates a media file name without extracting a date
    pub fn is_valid_media(&self, file_name: &str) -> bool {
        self.media_pattern.is_match(file_name)
    }

    /// Validates a media file name and extracts its date in one pass,
    /// so the two can never disagree
    pub fn match_media_date(&self, file_name: &str) -> Option<CaptureDate> {
        capture_date(&self.media_pattern.captures(file_name)?)
    }

    /// Matches a day directory name in `DaySubdirectories` layout
    pub fn match_day_directory(&self, directory_name: &str) -> Option<CaptureDate> {
        match &self.layout {
            SourceLayout::DaySubdirectories { pattern, .. } => {
                capture_date(&pattern.captures(directory_name)?)
            }
            SourceLayout::Flat => None,
        }
    }
}

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).expect("invalid device profile pattern")
}

fn capture_date(caps: &Captures) -> Option<CaptureDate> {
    Some(CaptureDate::new(
        caps.name("year")?.as_str(),
        caps.name("month")?.as_str(),
        caps.name("day")?.as_str(),
    ))
}

/// All supported device profiles. Fixed at compile time; there is no
/// configuration file.
pub fn registry() -> Vec<DeviceProfile> {
    vec![
        DeviceProfile::canon1(),
        DeviceProfile::huawei_xiaomi1(),
        DeviceProfile::samsung1(),
    ]
}

pub fn find(name: &str) -> Option<DeviceProfile> {
    registry().into_iter().find(|profile| profile.name == name)
}

pub fn names() -> Vec<&'static str> {
    registry().iter().map(|profile| profile.name).collect()
}
