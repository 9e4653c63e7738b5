use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

use crate::{Path, Vec2};

/// Raw type byte of a hit object line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitType(pub u8);

impl HitType {
    pub const CIRCLE: Self = Self(0b0000_0001);
    pub const SLIDER: Self = Self(0b0000_0010);
    pub const NEW_COMBO: Self = Self(0b0000_0100);
    pub const SPINNER: Self = Self(0b0000_1000);
    pub const COMBO_SKIP: Self = Self(0b0111_0000);
    pub const HOLD: Self = Self(0b1000_0000);

    const BASE_TYPES: u8 = Self::CIRCLE.0 | Self::SLIDER.0 | Self::SPINNER.0 | Self::HOLD.0;

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_circle(self) -> bool {
        self.contains(Self::CIRCLE)
    }

    pub const fn is_slider(self) -> bool {
        self.contains(Self::SLIDER)
    }

    pub const fn is_spinner(self) -> bool {
        self.contains(Self::SPINNER)
    }

    pub const fn is_hold(self) -> bool {
        self.contains(Self::HOLD)
    }

    pub const fn is_new_combo(self) -> bool {
        self.contains(Self::NEW_COMBO)
    }

    /// Number of combo colours to skip when starting a new combo (0..=7).
    pub const fn combo_skip(self) -> u32 {
        ((self.0 & Self::COMBO_SKIP.0) >> 4) as u32
    }

    /// True when exactly one of circle, slider, spinner and hold is set.
    pub const fn has_single_base_type(self) -> bool {
        (self.0 & Self::BASE_TYPES).count_ones() == 1
    }
}

impl BitOr for HitType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Hit sound flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundAdditions(pub u8);

impl SoundAdditions {
    pub const NONE: Self = Self(0b0000);
    pub const NORMAL: Self = Self(0b0001);
    pub const WHISTLE: Self = Self(0b0010);
    pub const FINISH: Self = Self(0b0100);
    pub const CLAP: Self = Self(0b1000);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SoundAdditions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SoundAdditions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSet {
    /// Inherit from the enclosing context (timing point or hit object).
    #[default]
    Auto,
    Normal,
    Soft,
    Drum,
}

impl SampleSet {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(SampleSet::Auto),
            1 => Some(SampleSet::Normal),
            2 => Some(SampleSet::Soft),
            3 => Some(SampleSet::Drum),
            _ => None,
        }
    }

    /// Spelling used by the `SampleSet` key of the general section.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(SampleSet::Auto),
            "Normal" => Some(SampleSet::Normal),
            "Soft" => Some(SampleSet::Soft),
            "Drum" => Some(SampleSet::Drum),
            _ => None,
        }
    }

    /// `self`, or `fallback` when `self` is [`SampleSet::Auto`].
    pub fn or(self, fallback: SampleSet) -> SampleSet {
        match self {
            SampleSet::Auto => fallback,
            set => set,
        }
    }
}

/// Sounds played when the slider ball reaches one of its edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSound {
    pub sound_additions: SoundAdditions,
    pub sample_set: SampleSet,
    pub additions_set: SampleSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub path: Path,
    pub repeat: u32,
    /// Declared length in playfield units.
    pub length: f64,
    /// Time of one traversal of the path, in seconds.
    pub duration: f64,
    /// One entry per edge: head, every return point, tail.
    pub edges: Vec<EdgeSound>,
}

impl Slider {
    /// Ball position `elapsed` seconds after the slider head.
    pub fn position_at(&self, elapsed: f64) -> Vec2 {
        if self.duration <= 0.0 {
            return self.path.evaluate(0.0);
        }
        let t = (elapsed / self.duration).clamp(0.0, self.repeat as f64);
        self.path.evaluate(t)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    Spinner { end_time: f64 },
    HoldNote { end_time: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    pub position: Vec2,
    /// Seconds from the start of the audio.
    pub time: f64,
    pub hit_type: HitType,
    pub sound_additions: SoundAdditions,
    pub sample_set: SampleSet,
    pub additions_set: SampleSet,
    pub sample_index: u32,
    /// In `[0, 1]`.
    pub volume: f64,
    #[serde(default)]
    pub sample_filename: Option<String>,
    /// Combo number, starting at 0 and increased by each new combo.
    pub combo: u32,
    /// Position inside the combo, starting at 1.
    pub combo_seq: u32,
    /// Index into [`crate::Beatmap::colors`].
    pub color: Option<usize>,
    /// Index into [`crate::Beatmap::timing_points`].
    pub timing_point: usize,
    #[serde(flatten)]
    pub kind: HitObjectKind,
}

impl HitObject {
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle => self.time,
            HitObjectKind::Slider(slider) => self.time + slider.duration * slider.repeat as f64,
            HitObjectKind::Spinner { end_time } | HitObjectKind::HoldNote { end_time } => *end_time,
        }
    }

    /// Position where the object ends: the slider tail for sliders.
    pub fn end_position(&self) -> Vec2 {
        match &self.kind {
            HitObjectKind::Slider(slider) => slider.path.evaluate(slider.repeat as f64),
            _ => self.position,
        }
    }

    /// True for the trailing object appended at infinite time.
    pub fn is_sentinel(&self) -> bool {
        self.time.is_infinite()
    }
}
