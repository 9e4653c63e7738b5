use log::warn;
use osu_schema::{SampleSet, TimingPoint};

use crate::cursor::Cursor;
use crate::parser::Parser;
use crate::ParseError;

/// `offset,beat_duration,meter,sample_set,sample_index,volume,uninherited,effects`
///
/// Everything after the beat duration may be left out; missing fields take
/// their defaults. The sign of the raw beat duration decides whether the
/// point is inherited.
pub(crate) fn timing_point(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let offset = cursor.float_field(',')? / 1000.0;
    let raw_beat = cursor.parse_float()?;

    let mut meter = 4u32;
    let mut sample_set = SampleSet::Auto;
    let mut sample_index = 0;
    let mut volume = 100;
    let mut uninherited = None;
    let mut effects = 0u32;

    if cursor.consume_separator(',') {
        let raw_meter = cursor.parse_int::<i64>()?;
        meter = u32::try_from(raw_meter)
            .ok()
            .filter(|&meter| meter > 0)
            .ok_or_else(|| cursor.error("E3002", format!("meter must be positive, got {raw_meter}")))?;
        if cursor.consume_separator(',') {
            let index = cursor.parse_int::<i64>()?;
            sample_set = SampleSet::from_index(index)
                .ok_or_else(|| cursor.error("E1001", format!("unknown sample set index: {index}")))?;
            if cursor.consume_separator(',') {
                sample_index = cursor.parse_int::<u32>()?;
                if cursor.consume_separator(',') {
                    volume = cursor.parse_int::<i64>()?;
                    if cursor.consume_separator(',') {
                        uninherited = Some(cursor.parse_int::<i64>()? != 0);
                        if cursor.consume_separator(',') {
                            effects = cursor.parse_int()?;
                        }
                    }
                }
            }
        }
    }
    cursor.expect_end()?;

    if !(0..=100).contains(&volume) {
        return Err(cursor.error("E3003", format!("volume must be within 0-100, got {volume}")));
    }
    if raw_beat == 0.0 || !raw_beat.is_finite() {
        return Err(cursor.error("E3002", format!("invalid beat duration: {raw_beat}")));
    }
    if let Some(last) = parser.beatmap.timing_points.last() {
        if offset < last.offset {
            return Err(cursor.error(
                "E3001",
                format!(
                    "timing point at {offset}s comes before the previous one at {}s",
                    last.offset
                ),
            ));
        }
    }

    let inherited = raw_beat < 0.0;
    if uninherited == Some(inherited) {
        warn!(
            "line {}: uninherited flag disagrees with the sign of the beat duration {raw_beat}",
            cursor.line_no()
        );
    }

    let beat_duration = if inherited {
        let parent = parser.parent_beat.ok_or_else(|| {
            cursor.error("E3004", "inherited timing point has no uninherited point before it")
        })?;
        parent * (-raw_beat / 100.0)
    } else {
        let beat = raw_beat / 1000.0;
        parser.parent_beat = Some(beat);
        beat
    };

    parser.beatmap.timing_points.push(TimingPoint {
        offset,
        beat_duration,
        meter,
        sample_set: sample_set.or(parser.beatmap.general.sample_set),
        sample_index,
        volume: volume as f64 / 100.0,
        inherited,
        kiai: effects & 1 != 0,
    });
    Ok(())
}
