/// Every key, section name and event name the parser recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    AlwaysShowPlayfield,
    ApproachRate,
    Artist,
    ArtistUnicode,
    AudioFilename,
    AudioLeadIn,
    Background,
    BeatDivisor,
    BeatmapID,
    BeatmapSetID,
    Bookmarks,
    Break,
    CircleSize,
    Colours,
    Combo,
    Countdown,
    CountdownOffset,
    Creator,
    Difficulty,
    DistanceSpacing,
    Editor,
    EditorBookmarks,
    EditorDistanceSpacing,
    EpilepsyWarning,
    Events,
    General,
    GridSize,
    HPDrainRate,
    HitObjects,
    LetterboxInBreaks,
    Metadata,
    Mode,
    OverallDifficulty,
    OverlayPosition,
    PreviewTime,
    SampleSet,
    SamplesMatchPlaybackSpeed,
    SkinPreference,
    SliderBorder,
    SliderMultiplier,
    SliderTickRate,
    SliderTrackOverride,
    Source,
    SpecialStyle,
    StackLeniency,
    StoryFireInFront,
    Tags,
    TimelineZoom,
    TimingPoints,
    Title,
    TitleUnicode,
    UseSkinSprites,
    Version,
    Video,
    WidescreenStoryboard,
}

/// Sorted by byte value so lookups can binary search.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("AlwaysShowPlayfield", Keyword::AlwaysShowPlayfield),
    ("ApproachRate", Keyword::ApproachRate),
    ("Artist", Keyword::Artist),
    ("ArtistUnicode", Keyword::ArtistUnicode),
    ("AudioFilename", Keyword::AudioFilename),
    ("AudioLeadIn", Keyword::AudioLeadIn),
    ("Background", Keyword::Background),
    ("BeatDivisor", Keyword::BeatDivisor),
    ("BeatmapID", Keyword::BeatmapID),
    ("BeatmapSetID", Keyword::BeatmapSetID),
    ("Bookmarks", Keyword::Bookmarks),
    ("Break", Keyword::Break),
    ("CircleSize", Keyword::CircleSize),
    ("Colours", Keyword::Colours),
    ("Combo", Keyword::Combo),
    ("Countdown", Keyword::Countdown),
    ("CountdownOffset", Keyword::CountdownOffset),
    ("Creator", Keyword::Creator),
    ("Difficulty", Keyword::Difficulty),
    ("DistanceSpacing", Keyword::DistanceSpacing),
    ("Editor", Keyword::Editor),
    ("EditorBookmarks", Keyword::EditorBookmarks),
    ("EditorDistanceSpacing", Keyword::EditorDistanceSpacing),
    ("EpilepsyWarning", Keyword::EpilepsyWarning),
    ("Events", Keyword::Events),
    ("General", Keyword::General),
    ("GridSize", Keyword::GridSize),
    ("HPDrainRate", Keyword::HPDrainRate),
    ("HitObjects", Keyword::HitObjects),
    ("LetterboxInBreaks", Keyword::LetterboxInBreaks),
    ("Metadata", Keyword::Metadata),
    ("Mode", Keyword::Mode),
    ("OverallDifficulty", Keyword::OverallDifficulty),
    ("OverlayPosition", Keyword::OverlayPosition),
    ("PreviewTime", Keyword::PreviewTime),
    ("SampleSet", Keyword::SampleSet),
    ("SamplesMatchPlaybackSpeed", Keyword::SamplesMatchPlaybackSpeed),
    ("SkinPreference", Keyword::SkinPreference),
    ("SliderBorder", Keyword::SliderBorder),
    ("SliderMultiplier", Keyword::SliderMultiplier),
    ("SliderTickRate", Keyword::SliderTickRate),
    ("SliderTrackOverride", Keyword::SliderTrackOverride),
    ("Source", Keyword::Source),
    ("SpecialStyle", Keyword::SpecialStyle),
    ("StackLeniency", Keyword::StackLeniency),
    ("StoryFireInFront", Keyword::StoryFireInFront),
    ("Tags", Keyword::Tags),
    ("TimelineZoom", Keyword::TimelineZoom),
    ("TimingPoints", Keyword::TimingPoints),
    ("Title", Keyword::Title),
    ("TitleUnicode", Keyword::TitleUnicode),
    ("UseSkinSprites", Keyword::UseSkinSprites),
    ("Version", Keyword::Version),
    ("Video", Keyword::Video),
    ("WidescreenStoryboard", Keyword::WidescreenStoryboard),
];

impl Keyword {
    pub(crate) fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS
            .binary_search_by(|(name, _)| name.as_bytes().cmp(word.as_bytes()))
            .ok()
            .map(|i| KEYWORDS[i].1)
    }

    pub(crate) fn name(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map_or("?", |(name, _)| *name)
    }
}
