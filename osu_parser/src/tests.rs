use super::*;
use osu_schema::{Break, HitObjectKind, Path, SampleSet, SoundAdditions, Vec2};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn near(a: Vec2, b: Vec2) -> bool {
    a.distance(b) < 1e-3
}

/// Header, audio file and one timing point around `body`.
fn beatmap_with(body: &str) -> String {
    format!(
        "osu file format v14\n\n[General]\nAudioFilename: a.mp3\n\n[TimingPoints]\n0,500,4,2,1,50,1,0\n\n{body}"
    )
}

fn hits(lines: &str) -> String {
    beatmap_with(&format!("[HitObjects]\n{lines}"))
}

fn fixture_path() -> String {
    format!("{}/tests/fixtures/sample.osu", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn minimal_document_parses() {
    let src = "osu file format v14\n[General]\nAudioFilename: a.mp3\n[TimingPoints]\n0,500,4,2,1,50,1,0\n[HitObjects]\n100,100,1000,1,0,0:0:0:0:\n";

    let map = parse_str(src).unwrap();
    assert_eq!(map.version, 14);
    assert_eq!(map.general.audio_filename.as_deref(), Some("a.mp3"));
    assert_eq!(map.hit_objects.len(), 1);

    let hit = &map.hit_objects[0];
    assert!(close(hit.time, 1.0));
    assert_eq!(hit.combo, 0);
    assert_eq!(hit.combo_seq, 1);
    assert_eq!(hit.color, None);
    assert_eq!(hit.position, Vec2::new(100.0, 100.0));
    assert!(matches!(hit.kind, HitObjectKind::Circle));

    let tp = &map.timing_points[hit.timing_point];
    assert!(close(tp.beat_duration, 0.5));
    assert_eq!(tp.meter, 4);
    assert_eq!(tp.sample_set, SampleSet::Soft);
    assert!(close(tp.volume, 0.5));
    assert!(!tp.inherited);
    assert!(!tp.kiai);

    // sample fields left at 0 fall back to the timing point
    assert_eq!(hit.sample_set, SampleSet::Soft);
    assert_eq!(hit.additions_set, SampleSet::Soft);
    assert_eq!(hit.sample_index, 1);
    assert!(close(hit.volume, 0.5));
    assert_eq!(hit.sample_filename, None);
}

#[test]
fn inherited_point_scales_parent_beat() {
    let src = beatmap_with("[TimingPoints]\n1000,-50,4,2,0,50,0,1\n2000,250,3,1,0,100,1,0\n3000,-200,3,1,0,100,0,0\n");
    let map = parse_str(&src).unwrap();
    let tps = &map.timing_points;
    assert_eq!(tps.len(), 4);

    for tp in tps.iter().filter(|tp| !tp.inherited) {
        assert!(tp.beat_duration > 0.0);
    }
    assert!(tps[1].inherited);
    assert!(close(tps[1].beat_duration, 0.25));
    assert!(tps[1].kiai);
    assert!(close(tps[2].beat_duration, 0.25));
    assert_eq!(tps[2].meter, 3);
    assert!(tps[3].inherited);
    assert!(close(tps[3].beat_duration, 0.5));
}

#[test]
fn timing_point_trailing_fields_default() {
    let src = "osu file format v5\n[General]\nAudioFilename: a.mp3\nSampleSet: Drum\n[TimingPoints]\n250,400\n";
    let map = parse_str(src).unwrap();
    let tp = &map.timing_points[0];
    assert!(close(tp.offset, 0.25));
    assert!(close(tp.beat_duration, 0.4));
    assert_eq!(tp.meter, 4);
    assert_eq!(tp.sample_set, SampleSet::Drum);
    assert_eq!(tp.sample_index, 0);
    assert!(close(tp.volume, 1.0));
    assert!(!tp.inherited);
    assert!(!tp.kiai);
}

#[test]
fn timing_point_errors() {
    for (line, code) in [
        ("0,500,0", "E3002"),
        ("0,0", "E3002"),
        ("0,500,4,1,0,150", "E3003"),
        ("0,-100", "E3004"),
        ("0,500,4,7", "E1001"),
        ("0,500,4,1,0,100,1,0,9", "E1002"),
    ] {
        let src = format!("osu file format v14\n[General]\nAudioFilename: a.mp3\n[TimingPoints]\n{line}\n");
        let err = parse_str(&src).unwrap_err();
        assert_eq!(err.code, code, "{line}");
        assert_eq!(err.line, 5, "{line}");
    }

    let src = beatmap_with("[TimingPoints]\n-10,500\n");
    let err = parse_str(&src).unwrap_err();
    assert_eq!(err.code, "E3001");
    assert_eq!(err.kind, ParseErrorKind::Timing);
}

#[test]
fn hits_out_of_order_fail() {
    let src = hits("0,0,5000,1,0\n0,0,4000,1,0\n");
    let err = parse_str(&src).unwrap_err();
    assert_eq!(err.code, "E4001");
    assert_eq!(err.kind, ParseErrorKind::HitObject);
    assert_eq!(err.line, 11);
}

#[test]
fn equal_hit_times_are_allowed() {
    let map = parse_str(&hits("0,0,1000,1,0\n10,10,1000,1,0\n")).unwrap();
    assert_eq!(map.hit_objects.len(), 2);
}

#[test]
fn combo_numbering() {
    // colours declared after the hit objects still apply
    let src = format!(
        "{}\n[Colours]\nCombo1 : 255,0,0\nCombo2 : 0,0,255\n",
        hits("0,0,1000,5,0\n0,0,1100,1,0\n0,0,1200,37,0\n0,0,1300,1,0\n")
    );
    let map = parse_str(&src).unwrap();

    let combos: Vec<(u32, u32)> = map
        .hit_objects
        .iter()
        .map(|hit| (hit.combo, hit.combo_seq))
        .collect();
    assert_eq!(combos, vec![(0, 1), (0, 2), (3, 1), (3, 2)]);

    let colors: Vec<Option<usize>> = map.hit_objects.iter().map(|hit| hit.color).collect();
    assert_eq!(colors, vec![Some(0), Some(0), Some(1), Some(1)]);
    assert_eq!(map.color_of(&map.hit_objects[2]).unwrap().blue, 255);
}

#[test]
fn colours_declared_before_hits_are_applied_on_insertion() {
    let src = beatmap_with("[Colours]\nCombo1 : 1,2,3\nSliderTrackOverride : 9,9,9\n\n[HitObjects]\n0,0,1000,1,0\n0,0,2000,5,0\n");
    let map = parse_str(&src).unwrap();
    assert_eq!(map.colors.len(), 1);
    assert!(map.hit_objects.iter().all(|hit| hit.color == Some(0)));
}

#[test]
fn colour_channel_out_of_range() {
    let err = parse_str(&beatmap_with("[Colours]\nCombo1 : 256,0,0\n")).unwrap_err();
    assert_eq!(err.code, "E5001");
    assert_eq!(err.kind, ParseErrorKind::Colour);

    let err = parse_str(&beatmap_with("[Colours]\nCombo1 : 0,-1,0\n")).unwrap_err();
    assert_eq!(err.code, "E5001");
}

#[test]
fn bad_type_flags() {
    for line in ["0,0,1000,3,0", "0,0,1000,4,0", "0,0,1000,0,0"] {
        let err = parse_str(&hits(line)).unwrap_err();
        assert_eq!(err.code, "E4003", "{line}");
    }
}

#[test]
fn hit_without_timing_points() {
    let src = "osu file format v14\n[General]\nAudioFilename: a.mp3\n[HitObjects]\n0,0,1000,1,0\n";
    let err = parse_str(src).unwrap_err();
    assert_eq!(err.code, "E4004");
}

#[test]
fn hit_before_first_timing_point_uses_it() {
    let src = beatmap_with("[TimingPoints]\n2000,250\n[HitObjects]\n0,0,-100,1,0\n0,0,2500,1,0\n");
    let map = parse_str(&src).unwrap();
    assert_eq!(map.hit_objects[0].timing_point, 0);
    assert_eq!(map.hit_objects[1].timing_point, 1);
}

#[test]
fn slider_duration_follows_inherited_velocity() {
    let src = "osu file format v14\n[General]\nAudioFilename: a.mp3\n[Difficulty]\nSliderMultiplier:1\n[TimingPoints]\n0,500,4,2,0,50,1,0\n1000,-50,4,2,0,50,0,0\n[HitObjects]\n0,0,1000,2,0,L|200:0,2,100\n";
    let map = parse_str(src).unwrap();
    let hit = &map.hit_objects[0];
    assert_eq!(hit.timing_point, 1);

    let HitObjectKind::Slider(slider) = &hit.kind else {
        panic!("expected a slider, got {:?}", hit.kind);
    };
    assert!(close(slider.length, 100.0));
    assert!(close(slider.duration, 0.25));
    assert!(close(hit.end_time(), 1.5));
    assert!(near(slider.path.evaluate(1.0), Vec2::new(100.0, 0.0)));
    assert!(near(hit.end_position(), Vec2::new(0.0, 0.0)));
    assert_eq!(slider.edges.len(), 3);
}

#[test]
fn slider_edges_are_backfilled() {
    let line = "0,0,1000,2,2,L|100:0,2,100,2|0|8,1:2|0:0|3:0,0:0:0:0:";
    let map = parse_str(&hits(line)).unwrap();
    let hit = &map.hit_objects[0];
    let HitObjectKind::Slider(slider) = &hit.kind else {
        panic!("expected a slider");
    };

    let sounds: Vec<SoundAdditions> = slider.edges.iter().map(|e| e.sound_additions).collect();
    assert_eq!(
        sounds,
        vec![SoundAdditions::WHISTLE, SoundAdditions::NONE, SoundAdditions::CLAP]
    );
    assert_eq!(slider.edges[0].sample_set, SampleSet::Normal);
    assert_eq!(slider.edges[0].additions_set, SampleSet::Soft);
    assert_eq!(slider.edges[1].sample_set, SampleSet::Soft);
    assert_eq!(slider.edges[1].additions_set, SampleSet::Soft);
    assert_eq!(slider.edges[2].sample_set, SampleSet::Drum);
    assert_eq!(slider.edges[2].additions_set, SampleSet::Soft);
}

#[test]
fn slider_without_edges_uses_hit_sounds() {
    let map = parse_str(&hits("0,0,1000,2,4,L|100:0,1,100")).unwrap();
    let HitObjectKind::Slider(slider) = &map.hit_objects[0].kind else {
        panic!("expected a slider");
    };
    assert_eq!(slider.edges.len(), 2);
    for edge in &slider.edges {
        assert_eq!(edge.sound_additions, SoundAdditions::FINISH);
        assert_eq!(edge.sample_set, SampleSet::Soft);
        assert_eq!(edge.additions_set, SampleSet::Soft);
    }
}

#[test]
fn perfect_arc_slider() {
    let map = parse_str(&hits("100,300,1000,2,0,P|150:250|200:300,1,0")).unwrap();
    let HitObjectKind::Slider(slider) = &map.hit_objects[0].kind else {
        panic!("expected a slider");
    };
    assert!(matches!(slider.path, Path::PerfectArc(_)));
    assert!(near(slider.path.evaluate(0.0), Vec2::new(100.0, 300.0)));
    assert!(near(slider.path.evaluate(0.5), Vec2::new(150.0, 250.0)));
    assert!(near(slider.path.evaluate(1.0), Vec2::new(200.0, 300.0)));
    assert!((slider.length - 50.0 * std::f64::consts::PI).abs() < 1e-6);
}

#[test]
fn collinear_arc_becomes_a_line() {
    let map = parse_str(&hits("0,0,1000,2,0,P|100:0|200:0,1,200")).unwrap();
    let HitObjectKind::Slider(slider) = &map.hit_objects[0].kind else {
        panic!("expected a slider");
    };
    assert!(matches!(slider.path, Path::Linear(_)));
    assert!(near(slider.path.evaluate(1.0), Vec2::new(200.0, 0.0)));
}

#[test]
fn malformed_sliders() {
    for line in [
        "0,0,1000,2,0,C|100:0,1,100",
        "0,0,1000,2,0,B|100,1,100",
        "0,0,1000,2,0,B,1,100",
        "0,0,1000,2,0,L|100:0,0,100",
        "0,0,1000,2,0,L|100:0,1,100,2|0|0,0:0|0:0",
    ] {
        let err = parse_str(&hits(line)).unwrap_err();
        assert_eq!(err.code, "E4002", "{line}");
        assert_eq!(err.kind, ParseErrorKind::HitObject, "{line}");
    }
}

#[test]
fn slider_repeat_count_is_bounded() {
    let err = parse_str(&hits("0,0,1000,2,0,L|100:0,4294967295,100")).unwrap_err();
    assert_eq!(err.code, "E4002");
    assert!(err.message.contains("exceeds"), "{}", err.message);

    let line = format!("0,0,1000,2,0,L|100:0,{},100", hit_objects::MAX_SLIDER_REPEAT + 1);
    assert_eq!(parse_str(&hits(&line)).unwrap_err().code, "E4002");

    let line = format!("0,0,1000,2,0,L|100:0,{},100", hit_objects::MAX_SLIDER_REPEAT);
    let map = parse_str(&hits(&line)).unwrap();
    let HitObjectKind::Slider(slider) = &map.hit_objects[0].kind else {
        panic!("expected a slider");
    };
    assert_eq!(slider.edges.len(), hit_objects::MAX_SLIDER_REPEAT as usize + 1);
}

#[test]
fn spinner_and_hold_note() {
    let src = hits("256,192,1000,12,0,3000,0:0:0:0:\n64,192,4000,128,0,4500:1:0:0:70:hit.wav\n");
    let map = parse_str(&src).unwrap();

    let spinner = &map.hit_objects[0];
    assert!(matches!(spinner.kind, HitObjectKind::Spinner { end_time } if close(end_time, 3.0)));
    assert!(close(spinner.end_time(), 3.0));

    let hold = &map.hit_objects[1];
    assert!(matches!(hold.kind, HitObjectKind::HoldNote { end_time } if close(end_time, 4.5)));
    assert_eq!(hold.sample_set, SampleSet::Normal);
    assert_eq!(hold.additions_set, SampleSet::Normal);
    assert!(close(hold.volume, 0.7));
    assert_eq!(hold.sample_filename.as_deref(), Some("hit.wav"));
}

#[test]
fn unknown_general_key_fails() {
    let src = "osu file format v14\n[General]\nAudioFilename: a.mp3\nBogusKey: 1\n";
    let err = parse_str(src).unwrap_err();
    assert_eq!(err.code, "E1003");
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.line, 4);

    let src = "osu file format v14\n[General]\nTitle: misplaced\n";
    assert_eq!(parse_str(src).unwrap_err().code, "E1003");
}

#[test]
fn unknown_section_is_skipped() {
    let src = beatmap_with("[Foo]\nanything goes: here\n1,2,3\n\n[HitObjects]\n0,0,1000,1,0\n");
    let map = parse_str(&src).unwrap();
    assert_eq!(map.hit_objects.len(), 1);
}

#[test]
fn header_errors() {
    let err = parse_str("[General]\nAudioFilename: a.mp3\n").unwrap_err();
    assert_eq!(err.code, "E1101");
    assert_eq!(err.kind, ParseErrorKind::Structure);

    assert_eq!(parse_str("osu file format vX\n").unwrap_err().code, "E1101");
    assert_eq!(parse_str("").unwrap_err().code, "E1101");
    assert_eq!(parse_str("\n// only a comment\n").unwrap_err().code, "E1101");
}

#[test]
fn header_may_follow_noise() {
    let src = "\u{feff}osu file format v128\n[General]\nAudioFilename: a.mp3\n";
    assert_eq!(parse_str(src).unwrap().version, 128);
}

#[test]
fn header_may_follow_invalid_utf8() {
    let mut bytes = vec![0xFF, 0xFE, 0x00];
    bytes.extend_from_slice(b"osu file format v14\n[General]\nAudioFilename: a.mp3\n");
    assert_eq!(parse_bytes(&bytes).unwrap().version, 14);

    let path = std::env::temp_dir().join(format!("osu_parser_noise_{}.osu", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();
    let map = parse_file(&path);
    let _ = std::fs::remove_file(&path);
    let map = map.unwrap();
    assert_eq!(map.version, 14);
    assert_eq!(map.general.audio_filename.as_deref(), Some("a.mp3"));
}

#[test]
fn content_outside_sections() {
    let err = parse_str("osu file format v14\nstray line\n").unwrap_err();
    assert_eq!(err.code, "E1102");
    assert_eq!(err.line, 2);
}

#[test]
fn blank_lines_and_comments_are_ignored_everywhere() {
    let src = "// leading comment\n\nosu file format v14\n// root comment\n\n[General]\n  // indented comment\nAudioFilename: a.mp3\n\n";
    assert!(parse_str(src).is_ok());
}

#[test]
fn trailing_text_is_rejected() {
    let err = parse_str(&beatmap_with("[Difficulty]\nCircleSize: 4 extra\n")).unwrap_err();
    assert_eq!(err.code, "E1002");
    assert_eq!(err.column, Some(14));
    assert_eq!(err.context.as_deref(), Some("CircleSize: 4 extra"));
    assert_eq!(err.to_string(), "E1002: unexpected trailing text: extra (line 10, column 14)");
}

#[test]
fn audio_filename_validation() {
    let err = parse_str("osu file format v14\n[General]\nMode: 0\n").unwrap_err();
    assert_eq!(err.code, "E6001");
    assert_eq!(err.kind, ParseErrorKind::Validation);

    let err = parse_str("osu file format v14\n[General]\nAudioFilename: sub/a.mp3\n").unwrap_err();
    assert_eq!(err.code, "E6002");
    let err = parse_str("osu file format v14\n[General]\nAudioFilename: sub\\a.mp3\n").unwrap_err();
    assert_eq!(err.code, "E6002");
}

#[test]
fn hit_objects_can_be_required() {
    let src = beatmap_with("");
    assert!(parse_str(&src).unwrap().hit_objects.is_empty());

    let options = ParseOptions {
        require_hit_objects: true,
        ..ParseOptions::default()
    };
    let err = parse_str_with_options(&src, options).unwrap_err();
    assert_eq!(err.code, "E6003");
}

#[test]
fn sentinel_is_appended_on_request() {
    let options = ParseOptions {
        append_sentinel: true,
        ..ParseOptions::default()
    };
    let map = parse_str_with_options(&hits("10,20,1000,1,0\n"), options).unwrap();
    assert_eq!(map.hit_objects.len(), 2);

    let sentinel = &map.hit_objects[1];
    assert!(sentinel.is_sentinel());
    assert!(!map.hit_objects[0].is_sentinel());
    assert_eq!(sentinel.combo, 1);
    assert_eq!(sentinel.combo_seq, 1);
    assert_eq!(sentinel.position, Vec2::new(10.0, 20.0));
    assert_eq!(sentinel.timing_point, 0);
}

#[test]
fn sentinel_needs_a_timing_point() {
    let options = ParseOptions {
        append_sentinel: true,
        ..ParseOptions::default()
    };
    let src = "osu file format v14\n[General]\nAudioFilename: a.mp3\n";
    let map = parse_str_with_options(src, options).unwrap();
    assert!(map.timing_points.is_empty());
    assert!(map.hit_objects.is_empty());

    let options = ParseOptions {
        append_sentinel: true,
        ..ParseOptions::default()
    };
    let map = parse_str_with_options(&beatmap_with(""), options).unwrap();
    assert_eq!(map.hit_objects.len(), 1);
    let sentinel = &map.hit_objects[0];
    assert!(sentinel.is_sentinel());
    assert_eq!(sentinel.combo, 0);
    assert!(map.timing_points.get(sentinel.timing_point).is_some());
}

#[test]
fn general_editor_metadata_and_difficulty() {
    let src = "osu file format v14
[General]
AudioFilename: song.ogg
AudioLeadIn: 500
PreviewTime: -1
Countdown: 2
SampleSet: Soft
StackLeniency: 0.5
Mode: 0
LetterboxInBreaks: 1
EpilepsyWarning: 1
WidescreenStoryboard: 1

[Editor]
Bookmarks: 1000,2500
DistanceSpacing: 1.2
BeatDivisor: 3
GridSize: 8
TimelineZoom: 2
CustomThing: x

[Metadata]
Title:Song
TitleUnicode:Sóng
Artist:Someone
Creator:mapper
Version:Hard
Source:
Tags:one two  three
BeatmapID:123
BeatmapSetID:-1

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1.8
SliderTickRate:2
";
    let map = parse_str(src).unwrap();

    let general = &map.general;
    assert!(close(general.audio_lead_in, 0.5));
    assert_eq!(general.preview_time, None);
    assert_eq!(general.countdown, 2);
    assert_eq!(general.sample_set, SampleSet::Soft);
    assert!(close(general.stack_leniency, 0.5));
    assert!(general.letterbox_in_breaks);
    assert!(general.widescreen_storyboard);

    let editor = &map.editor;
    assert_eq!(editor.bookmarks, vec![1.0, 2.5]);
    assert!(close(editor.distance_spacing, 1.2));
    assert_eq!(editor.beat_divisor, 3);
    assert_eq!(editor.grid_size, 8);
    assert!(close(editor.timeline_zoom, 2.0));

    let metadata = &map.metadata;
    assert_eq!(metadata.title, "Song");
    assert_eq!(metadata.title_unicode, "Sóng");
    assert_eq!(metadata.creator, "mapper");
    assert_eq!(metadata.version, "Hard");
    assert_eq!(metadata.source, "");
    assert_eq!(metadata.tags, vec!["one", "two", "three"]);
    assert_eq!(metadata.beatmap_id, Some(123));
    assert_eq!(metadata.beatmap_set_id, Some(-1));

    let difficulty = &map.difficulty;
    assert!(close(difficulty.hp_drain_rate, 6.0));
    assert!(close(difficulty.circle_radius, 36.48));
    assert!(close(difficulty.approach_size, 3.0 * 36.48));
    assert!(close(difficulty.slider_tolerance, 2.0 * 36.48));
    assert!(close(difficulty.leniency, 0.0315));
    assert!(close(difficulty.approach_time, 0.6));
    assert!(close(difficulty.slider_multiplier, 1.8));
    assert!(close(difficulty.slider_tick_rate, 2.0));
}

#[test]
fn events_keep_background_and_breaks() {
    let src = beatmap_with(
        "[Events]\n//Background and Video events\n0,0,\"bg image.jpg\",0,0\nVideo,500,\"video.avi\"\n2,10000,12000\nBreak,20000,21500\nSprite,Foreground,Centre,\"sb/x.png\",320,240\n F,0,0,1000,0,1\n",
    );
    let map = parse_str(&src).unwrap();
    assert_eq!(map.events.background.as_deref(), Some("bg image.jpg"));
    assert_eq!(
        map.events.breaks,
        vec![
            Break { start: 10.0, end: 12.0 },
            Break { start: 20.0, end: 21.5 },
        ]
    );
}

#[test]
fn preview_time_is_kept_when_set() {
    let map = parse_str("osu file format v14\n[General]\nAudioFilename: a.mp3\nPreviewTime: 2000\n").unwrap();
    assert_eq!(map.general.preview_time, Some(2.0));
}

#[test]
fn fixture_parses() {
    let map = parse_file(fixture_path()).unwrap();
    assert_eq!(map.version, 14);
    assert_eq!(map.metadata.title, "Example Song");
    assert_eq!(map.metadata.tags.len(), 3);
    assert_eq!(map.editor.bookmarks, vec![1.0, 9.0]);
    assert_eq!(map.events.background.as_deref(), Some("background.jpg"));
    assert_eq!(map.events.breaks, vec![Break { start: 6.0, end: 8.0 }]);
    assert_eq!(map.colors.len(), 3);

    let tps = &map.timing_points;
    assert_eq!(tps.len(), 3);
    assert!(close(tps[1].beat_duration, 0.25));
    assert!(tps[1].kiai);
    assert!(close(tps[2].beat_duration, 0.5));

    let combos: Vec<(u32, u32)> = map
        .hit_objects
        .iter()
        .map(|hit| (hit.combo, hit.combo_seq))
        .collect();
    assert_eq!(
        combos,
        vec![(0, 1), (0, 2), (1, 1), (1, 2), (4, 1), (5, 1), (7, 1)]
    );
    let colors: Vec<Option<usize>> = map.hit_objects.iter().map(|hit| hit.color).collect();
    assert_eq!(
        colors,
        vec![Some(0), Some(0), Some(1), Some(1), Some(1), Some(2), Some(1)]
    );

    let timing: Vec<usize> = map.hit_objects.iter().map(|hit| hit.timing_point).collect();
    assert_eq!(timing, vec![0, 0, 0, 1, 1, 1, 2]);

    let HitObjectKind::Slider(bezier) = &map.hit_objects[2].kind else {
        panic!("expected a slider");
    };
    assert!(close(bezier.path.length(), 160.0));
    assert!(close(bezier.duration, 0.5));
    assert_eq!(bezier.edges[0].sound_additions, SoundAdditions::WHISTLE);
    assert_eq!(bezier.edges[0].sample_set, SampleSet::Normal);
    assert_eq!(bezier.edges[1].sample_set, SampleSet::Soft);

    let HitObjectKind::Slider(arc) = &map.hit_objects[3].kind else {
        panic!("expected a slider");
    };
    assert!(close(arc.path.length(), 100.0));
    assert!(close(arc.duration, 0.15625));
    assert!(close(map.hit_objects[3].end_time(), 3.3125));

    let clap = &map.hit_objects[4];
    assert_eq!(clap.sound_additions, SoundAdditions::CLAP);
    assert_eq!(clap.sample_set, SampleSet::Normal);
    assert_eq!(clap.sample_index, 1);
    assert!(close(clap.volume, 0.8));

    let HitObjectKind::Slider(line) = &map.hit_objects[6].kind else {
        panic!("expected a slider");
    };
    assert!(near(line.path.evaluate(1.0), Vec2::new(240.0, 160.0)));
    assert!(close(line.duration, 0.25));
}

#[test]
fn fixture_survives_json() {
    let map = parse_file(fixture_path()).unwrap();
    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(json["hit_objects"][2]["type"], "slider");
    assert_eq!(json["hit_objects"][2]["path"]["type"], "bezier");
    assert_eq!(json["hit_objects"][5]["type"], "spinner");
    assert_eq!(json["general"]["sample_set"], "soft");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file("/definitely/not/here.osu").unwrap_err();
    assert_eq!(err.code, "E2001");
    assert_eq!(err.kind, ParseErrorKind::IO);
    assert_eq!(err.file.as_deref(), Some("/definitely/not/here.osu"));
}

#[test]
fn options_file_is_attached_to_errors() {
    let options = ParseOptions {
        file: Some("map.osu".to_string()),
        ..ParseOptions::default()
    };
    let err = parse_str_with_options("not a beatmap", options).unwrap_err();
    assert_eq!(err.file.as_deref(), Some("map.osu"));
    assert_eq!(err.line, 1);
}
