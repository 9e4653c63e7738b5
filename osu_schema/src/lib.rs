use serde::{Deserialize, Serialize};

mod hit_object;
pub mod path;
mod vec2;

pub use hit_object::{EdgeSound, HitObject, HitObjectKind, HitType, SampleSet, Slider, SoundAdditions};
pub use path::{Arc, Bezier, CurveKind, Line, Path, PathError};
pub use vec2::Vec2;

/// A parsed beatmap. Every sequence is in chronological (or declaration) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    /// Format version from the header line.
    pub version: u32,
    pub general: General,
    #[serde(default)]
    pub editor: Editor,
    pub metadata: Metadata,
    pub difficulty: Difficulty,
    pub events: Events,
    pub timing_points: Vec<TimingPoint>,
    pub colors: Vec<Color>,
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    /// Combo colour of a hit object, if any colours were declared.
    pub fn color_of(&self, hit: &HitObject) -> Option<Color> {
        hit.color.and_then(|i| self.colors.get(i)).copied()
    }

    /// Timing point governing `time`: the last one starting at or before it,
    /// or the first one for times before every point.
    pub fn timing_point_for(&self, time: f64) -> Option<&TimingPoint> {
        let after = self.timing_points.partition_point(|tp| tp.offset <= time);
        self.timing_points.get(after.saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub audio_filename: Option<String>,
    /// Silence before the audio starts, in seconds.
    pub audio_lead_in: f64,
    /// Song-select preview start in seconds, `None` when unset.
    pub preview_time: Option<f64>,
    pub countdown: u32,
    pub sample_set: SampleSet,
    pub mode: u32,
    pub stack_leniency: f64,
    pub letterbox_in_breaks: bool,
    pub widescreen_storyboard: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            audio_filename: None,
            audio_lead_in: 0.0,
            preview_time: None,
            countdown: 1,
            sample_set: SampleSet::Normal,
            mode: 0,
            stack_leniency: 0.7,
            letterbox_in_breaks: false,
            widescreen_storyboard: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Editor {
    /// Bookmark times in seconds.
    pub bookmarks: Vec<f64>,
    pub distance_spacing: f64,
    pub beat_divisor: u32,
    pub grid_size: u32,
    pub timeline_zoom: f64,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            distance_spacing: 1.0,
            beat_divisor: 4,
            grid_size: 4,
            timeline_zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub title_unicode: String,
    pub artist: String,
    pub artist_unicode: String,
    pub creator: String,
    /// Difficulty name.
    pub version: String,
    pub source: String,
    pub tags: Vec<String>,
    pub beatmap_id: Option<i64>,
    pub beatmap_set_id: Option<i64>,
}

/// Difficulty parameters, in seconds and playfield units.
///
/// The raw settings drive derived values: circle size sets the circle radius,
/// which seeds the approach circle size and slider tolerance. Use the
/// `set_*` methods to keep them in sync; assigning a derived field afterwards
/// overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub hp_drain_rate: f64,
    pub circle_size: f64,
    pub circle_radius: f64,
    pub overall_difficulty: f64,
    /// Half width of the best hit window.
    pub leniency: f64,
    pub approach_rate: f64,
    /// Time the approach circle is visible before the hit.
    pub approach_time: f64,
    /// Initial approach circle radius.
    pub approach_size: f64,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
    /// Distance from the ball within which a slider is still held.
    pub slider_tolerance: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        let mut difficulty = Self {
            hp_drain_rate: 5.0,
            circle_size: 0.0,
            circle_radius: 0.0,
            overall_difficulty: 0.0,
            leniency: 0.0,
            approach_rate: 0.0,
            approach_time: 0.0,
            approach_size: 0.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
            slider_tolerance: 0.0,
        };
        difficulty.set_circle_size(5.0);
        difficulty.set_overall_difficulty(5.0);
        difficulty.set_approach_rate(5.0);
        difficulty
    }
}

impl Difficulty {
    pub fn set_circle_size(&mut self, circle_size: f64) {
        self.circle_size = circle_size;
        self.circle_radius = 54.4 - 4.48 * circle_size;
        self.approach_size = 3.0 * self.circle_radius;
        self.slider_tolerance = 2.0 * self.circle_radius;
    }

    pub fn set_overall_difficulty(&mut self, overall_difficulty: f64) {
        self.overall_difficulty = overall_difficulty;
        self.leniency = (79.5 - 6.0 * overall_difficulty) / 1000.0;
    }

    pub fn set_approach_rate(&mut self, approach_rate: f64) {
        self.approach_rate = approach_rate;
        self.approach_time = if approach_rate < 5.0 {
            1.8 - 0.12 * approach_rate
        } else {
            1.95 - 0.15 * approach_rate
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Events {
    pub background: Option<String>,
    #[serde(default)]
    pub breaks: Vec<Break>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Break {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    /// Start of the point, in seconds.
    pub offset: f64,
    /// Effective beat length in seconds. For inherited points this is the
    /// parent's beat length scaled by the velocity multiplier.
    pub beat_duration: f64,
    pub meter: u32,
    pub sample_set: SampleSet,
    pub sample_index: u32,
    /// In `[0, 1]`.
    pub volume: f64,
    pub inherited: bool,
    pub kiai: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}
