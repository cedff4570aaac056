//! `.sm` parser.
//!
//! Note data is measure-delimited: each measure is a run of fixed-width rows
//! closed by `,` (or by the end of the `#NOTES` block), and the number of
//! rows in a measure is its subdivision.

use tracing::debug;

use crate::chart::{
    Arrow, ChartData, Diagnostic, Difficulty, Direction, Mode, RawStepchart, StepchartType, Stop,
};
use crate::config::BeatTable;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::parse::freeze::FreezeTracker;
use crate::parse::tags::{RawTag, read_tags};

/// Tags the SM parser acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SmTag<'a> {
    Title(&'a str),
    Artist(&'a str),
    Banner(&'a str),
    Bpms(&'a str),
    Stops(&'a str),
    Notes(&'a str),
    Other,
}

impl<'a> SmTag<'a> {
    fn from_raw(tag: &'a RawTag, id: &str) -> Result<Self> {
        let known = matches!(
            tag.name.as_str(),
            "TITLE" | "ARTIST" | "BANNER" | "BPMS" | "STOPS" | "NOTES"
        );
        let value = match (&tag.value, known) {
            (_, false) => return Ok(Self::Other),
            (Some(value), true) => value.as_str(),
            (None, true) => return Err(Error::malformed_tag(id, &tag.name, tag.value_or_raw())),
        };

        Ok(match tag.name.as_str() {
            "TITLE" => Self::Title(value),
            "ARTIST" => Self::Artist(value),
            "BANNER" => Self::Banner(value),
            "BPMS" => Self::Bpms(value),
            "STOPS" => Self::Stops(value),
            "NOTES" => Self::Notes(value),
            _ => Self::Other,
        })
    }
}

/// Parse the full text of an `.sm` file. `id` names the chart in errors.
pub fn parse_sm(text: &str, id: &str, beats: &BeatTable) -> Result<RawStepchart> {
    let raw_tags = read_tags(text);
    let mut sc = RawStepchart::default();
    let mut notes = Vec::new();

    for raw in &raw_tags {
        match SmTag::from_raw(raw, id)? {
            SmTag::Title(value) => sc.title = value.trim().to_string(),
            SmTag::Artist(value) => sc.artist = value.trim().to_string(),
            SmTag::Banner(value) => {
                let value = value.trim();
                sc.banner = (!value.is_empty()).then(|| value.to_string());
            }
            SmTag::Bpms(value) => sc.bpm = parse_bpms(&mut sc, value, id)?,
            SmTag::Stops(value) => sc.stops = parse_stops(&mut sc, value, id)?,
            SmTag::Notes(value) => notes.push(value),
            SmTag::Other => {}
        }
    }

    if sc.bpm.is_empty() {
        return Err(Error::MissingBpm { id: id.to_string() });
    }

    for value in notes {
        parse_notes(&mut sc, value, id, beats)?;
    }

    if sc.available_types.is_empty() {
        return Err(Error::NoPlayableChart { id: id.to_string() });
    }

    debug!(
        "Parsed {} ({} charts, bpm {:?})",
        id,
        sc.available_types.len(),
        sc.bpm
    );
    Ok(sc)
}

/// Split a `beat=value` list into pairs, failing on malformed entries.
fn timing_pairs<'a>(value: &'a str, tag: &str, id: &str) -> Result<Vec<(&'a str, f64, f64)>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parsed = entry.split_once('=').and_then(|(beat, value)| {
                Some((beat.trim().parse::<f64>().ok()?, value.trim().parse::<f64>().ok()?))
            });
            match parsed {
                Some((beat, value)) => Ok((entry, beat, value)),
                None => Err(Error::malformed_tag(id, tag, entry)),
            }
        })
        .collect()
}

/// `#BPMS`: floored values, rounding artifacts and duplicates removed.
///
/// Simfiles often encode a cosmetic step like 189 → 190. A value exactly one
/// greater than another value in the list is such an artifact, and only the
/// lower value is kept.
fn parse_bpms(sc: &mut RawStepchart, value: &str, id: &str) -> Result<Vec<u32>> {
    let mut floored = Vec::new();
    for (entry, beat, bpm) in timing_pairs(value, "BPMS", id)? {
        if !beat.is_finite() || !bpm.is_finite() || bpm <= 0.0 {
            sc.report(Diagnostic::IgnoredTiming {
                tag: "BPMS".to_string(),
                entry: entry.to_string(),
            });
            continue;
        }
        floored.push(bpm.floor() as u32);
    }

    let mut bpms: Vec<u32> = Vec::new();
    for bpm in floored.iter().copied() {
        let is_artifact = bpm > 0 && floored.contains(&(bpm - 1));
        if !is_artifact && !bpms.contains(&bpm) {
            bpms.push(bpm);
        }
    }
    Ok(bpms)
}

/// `#STOPS`: `beat=seconds` pairs, placed on the song's measure timeline.
fn parse_stops(sc: &mut RawStepchart, value: &str, id: &str) -> Result<Vec<Stop>> {
    let mut stops = Vec::new();
    for (entry, beat, duration) in timing_pairs(value, "STOPS", id)? {
        if !beat.is_finite() || !duration.is_finite() || duration <= 0.0 {
            sc.report(Diagnostic::IgnoredTiming {
                tag: "STOPS".to_string(),
                entry: entry.to_string(),
            });
            continue;
        }
        stops.push(Stop {
            offset: beat / 4.0,
            duration,
        });
    }
    Ok(stops)
}

/// Header fields of a `#NOTES` block, before the note data.
struct NotesHeader {
    mode: Mode,
    difficulty: String,
    feet: u32,
}

fn parse_notes(sc: &mut RawStepchart, value: &str, id: &str, beats: &BeatTable) -> Result<()> {
    let fields: Vec<&str> = value.splitn(6, ':').collect();
    if fields.len() < 6 {
        let preview: String = value.trim().chars().take(40).collect();
        return Err(Error::malformed_tag(id, "NOTES", &preview));
    }

    // couple, versus, solo etc are not represented, whatever their header
    let Some(mode) = Mode::from_steps_type(fields[0]) else {
        debug!("{}: skipping {} chart", id, fields[0].trim());
        return Ok(());
    };

    let header = NotesHeader {
        mode,
        difficulty: fields[2].trim().to_lowercase(),
        feet: fields[3]
            .trim()
            .parse()
            .map_err(|_| Error::malformed_tag(id, "NOTES", fields[3].trim()))?,
    };

    let Some(difficulty) = Difficulty::from_source(&header.difficulty) else {
        sc.report(Diagnostic::UnknownDifficulty {
            mode: header.mode.to_string(),
            difficulty: header.difficulty,
        });
        return Ok(());
    };

    let chart_type = StepchartType::new(header.mode, difficulty, header.feet);
    let measures = read_measures(fields[5], header.mode, id)?;
    let (data, diagnostics) = build_chart(&chart_type.slug, header.mode, &measures, beats);

    sc.report_all(diagnostics);
    sc.add_chart(chart_type, data);
    Ok(())
}

/// Split note data into measures of raw rows, checking row width.
fn read_measures<'a>(notes: &'a str, mode: Mode, id: &str) -> Result<Vec<Vec<&'a str>>> {
    notes
        .split(',')
        .map(|measure| {
            measure
                .lines()
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .map(|row| {
                    if row.chars().count() == mode.lanes() {
                        Ok(row)
                    } else {
                        Err(Error::MalformedNoteLine {
                            id: id.to_string(),
                            line: row.to_string(),
                        })
                    }
                })
                .collect()
        })
        .collect()
}

fn is_empty_measure(rows: &[&str]) -> bool {
    rows.iter().all(|row| Direction::from_sm_row(row).is_empty())
}

/// Leading and trailing measure counts with no playable arrow.
fn trim_bounds(measures: &[Vec<&str>]) -> (usize, usize) {
    let leading = measures.iter().take_while(|m| is_empty_measure(m)).count();
    let trailing = measures[leading..]
        .iter()
        .rev()
        .take_while(|m| is_empty_measure(m))
        .count();
    (leading, trailing)
}

/// Position of row `index` of a `rows`-row measure, `measure` measures in.
fn row_position(measure: i64, index: usize, rows: usize) -> Fraction {
    Fraction::from_integer(measure) + Fraction::new(index as i64, rows as i64)
}

fn build_chart(
    slug: &str,
    mode: Mode,
    measures: &[Vec<&str>],
    beats: &BeatTable,
) -> (ChartData, Vec<Diagnostic>) {
    let (leading, trailing) = trim_bounds(measures);
    let kept = &measures[leading..measures.len() - trailing];

    let mut arrows = Vec::new();
    for (m, rows) in kept.iter().enumerate() {
        for (i, row) in rows.iter().enumerate() {
            let direction = Direction::from_sm_row(row);
            if direction.is_empty() {
                continue;
            }
            arrows.push(Arrow {
                direction,
                beat: beats.classify_line(i, rows.len()),
                offset: row_position(m as i64, i, rows.len()).to_f64(),
            });
        }
    }

    // freezes may start or end in trimmed measures, so walk everything and
    // shift by the leading trim
    let mut tracker = FreezeTracker::new(slug, mode.lanes());
    for (m, rows) in measures.iter().enumerate() {
        let measure = m as i64 - leading as i64;
        for (i, row) in rows.iter().enumerate() {
            let at = row_position(measure, i, rows.len());
            for (lane, note) in row.chars().enumerate() {
                match note {
                    '2' | '4' => tracker.open(lane, at),
                    '3' => tracker.close(lane, at, Fraction::new(1, rows.len() as i64)),
                    _ => {}
                }
            }
        }
    }
    let (freezes, diagnostics) = tracker.finish(None);

    debug!(
        "{}: {} arrows, {} freezes, trimmed {} leading / {} trailing measures",
        slug,
        arrows.len(),
        freezes.len(),
        leading,
        trailing
    );
    (ChartData { arrows, freezes }, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Beat;

    fn parse(text: &str) -> Result<RawStepchart> {
        parse_sm(text, "test", &BeatTable::default())
    }

    fn chart(notes: &str) -> String {
        format!(
            "#TITLE:Test;\n#BPMS:0.000=150.000;\n#NOTES:\n     dance-single:\n     Author:\n     Hard:\n     9:\n     0.5,0.5,0.5,0.5,0.5:\n{}\n;\n",
            notes
        )
    }

    #[test]
    fn test_bpm_artifact_keeps_lower_value() {
        let sc = parse(
            "#BPMS:0.000=189.000,32.000=190.000;\n#NOTES:dance-single::Hard:9::1000;",
        )
        .unwrap();
        assert_eq!(sc.bpm, vec![189]);
    }

    #[test]
    fn test_bpm_floor_and_dedup() {
        let sc = parse(
            "#BPMS:0.000=150.700,16.000=75.000,32.000=150.200;\n#NOTES:dance-single::Hard:9::1000;",
        )
        .unwrap();
        assert_eq!(sc.bpm, vec![150, 75]);
    }

    #[test]
    fn test_non_positive_bpm_is_reported() {
        let sc =
            parse("#BPMS:0.000=150.000,8.000=-150.000;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        assert_eq!(sc.bpm, vec![150]);
        assert!(matches!(sc.diagnostics[0], Diagnostic::IgnoredTiming { .. }));
    }

    #[test]
    fn test_malformed_bpms() {
        let err = parse("#BPMS:0.000;\n#NOTES:dance-single::Hard:9::1000;").unwrap_err();
        assert!(matches!(err, Error::MalformedTag { ref tag, .. } if tag == "BPMS"));
    }

    #[test]
    fn test_missing_bpm() {
        let err = parse("#TITLE:x;\n#NOTES:dance-single::Hard:9::1000;").unwrap_err();
        assert!(matches!(err, Error::MissingBpm { .. }));
    }

    #[test]
    fn test_arrow_offsets_and_beats() {
        let sc = parse(&chart("1000\n0100\n0010\n0001\n,\n1000\n0000\n0100\n0000\n0010\n0000\n0001\n0000")).unwrap();
        let arrows = &sc.chart("single-expert").unwrap().arrows;

        let offsets: Vec<f64> = arrows.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75]);
        assert!(arrows.iter().all(|a| a.beat == Beat::Quarter));
    }

    #[test]
    fn test_hold_tail_becomes_idle_lane() {
        let sc = parse(&chart("2000\n0000\n3100\n0000")).unwrap();
        let data = sc.chart("single-expert").unwrap();

        let directions: Vec<&str> = data.arrows.iter().map(|a| a.direction.as_str()).collect();
        assert_eq!(directions, vec!["2000", "0100"]);
        assert_eq!(data.freezes.len(), 1);
        assert_eq!(data.freezes[0].start_offset, 0.0);
        assert_eq!(data.freezes[0].end_offset, 0.75);
    }

    #[test]
    fn test_leading_and_trailing_measures_trimmed() {
        let sc = parse(&chart(
            "0000\n0000\n0000\n0000\n,\n0000\n0000\n0000\n0000\n,\n0000\n2000\n0000\n0000\n,\n3000\n0000\n0000\n0000\n,\n0000\n0000\n0000\n0000",
        ))
        .unwrap();
        let data = sc.chart("single-expert").unwrap();

        assert_eq!(data.arrows.len(), 1);
        assert_eq!(data.arrows[0].offset, 0.25);
        assert_eq!(data.freezes[0].start_offset, 0.25);
        assert_eq!(data.freezes[0].end_offset, 1.25);
    }

    #[test]
    fn test_sixteenth_beats() {
        let rows = ["1000", "0100", "0010", "0001"].repeat(4).join("\n");
        let sc = parse(&chart(&rows)).unwrap();
        let beats: Vec<u8> = sc.chart("single-expert").unwrap().arrows[..4]
            .iter()
            .map(|a| a.beat.value())
            .collect();
        assert_eq!(beats, vec![4, 16, 8, 16]);
    }

    #[test]
    fn test_unsupported_mode_skipped() {
        let text = "#BPMS:0=120;\n#NOTES:dance-couple::Hard:9::10001000;\n#NOTES:dance-single::Easy:3::1000;";
        let sc = parse(text).unwrap();
        assert_eq!(sc.available_types.len(), 1);
        assert_eq!(sc.available_types[0].slug, "single-basic");
        assert!(sc.diagnostics.is_empty());
    }

    #[test]
    fn test_only_unsupported_modes_fails() {
        let err = parse("#BPMS:0=120;\n#NOTES:dance-couple::Hard:9::10001000;").unwrap_err();
        assert!(matches!(err, Error::NoPlayableChart { .. }));
    }

    #[test]
    fn test_unknown_difficulty_reported() {
        let sc = parse("#BPMS:0=120;\n#NOTES:dance-single::Edit:12::1000;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        assert_eq!(sc.available_types.len(), 1);
        assert!(matches!(
            sc.diagnostics[0],
            Diagnostic::UnknownDifficulty { ref difficulty, .. } if difficulty == "edit"
        ));
    }

    #[test]
    fn test_wrong_row_width() {
        let err = parse("#BPMS:0=120;\n#NOTES:dance-single::Hard:9::10000;").unwrap_err();
        assert!(matches!(err, Error::MalformedNoteLine { ref line, .. } if line == "10000"));
    }

    #[test]
    fn test_short_notes_header() {
        let err = parse("#BPMS:0=120;\n#NOTES:dance-single:Hard:9;").unwrap_err();
        assert!(matches!(err, Error::MalformedTag { ref tag, .. } if tag == "NOTES"));
    }

    #[test]
    fn test_bad_feet() {
        let err = parse("#BPMS:0=120;\n#NOTES:dance-single::Hard:nine::1000;").unwrap_err();
        assert!(matches!(err, Error::MalformedTag { ref value, .. } if value == "nine"));
    }

    #[test]
    fn test_skipped_mode_feet_not_read() {
        let text = "#BPMS:0=120;\n#NOTES:dance-couple::Hard:x::10001000;\n#NOTES:dance-single::Easy:3::1000;";
        let sc = parse(text).unwrap();
        assert_eq!(sc.available_types.len(), 1);
        assert_eq!(sc.available_types[0].slug, "single-basic");
    }

    #[test]
    fn test_triplet_measure_beats() {
        let rows = ["1000", "0100", "0010"].repeat(4).join("\n");
        let sc = parse(&chart(&rows)).unwrap();
        let beats: Vec<u8> = sc.chart("single-expert").unwrap().arrows[..]
            .iter()
            .map(|a| a.beat.value())
            .collect();
        assert_eq!(beats, vec![4, 12, 12, 4, 12, 12, 4, 12, 12, 4, 12, 12]);
    }

    #[test]
    fn test_banner_absent_is_none() {
        let sc = parse("#BPMS:0=120;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        assert_eq!(sc.banner, None);

        let sc = parse("#BANNER:bn.png;\n#BPMS:0=120;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        assert_eq!(sc.banner.as_deref(), Some("bn.png"));
    }

    #[test]
    fn test_stops() {
        let sc = parse("#BPMS:0=120;\n#STOPS:16.000=0.500,20.000=0.000;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        assert_eq!(
            sc.stops,
            vec![Stop {
                offset: 4.0,
                duration: 0.5
            }]
        );
        assert_eq!(sc.diagnostics.len(), 1);
    }

    #[test]
    fn test_non_finite_timing_is_reported() {
        let sc = parse(
            "#BPMS:0=150,8=nan,16=inf;\n#STOPS:4=NaN,8=0.5,inf=0.5;\n#NOTES:dance-single::Hard:9::1000;",
        )
        .unwrap();
        assert_eq!(sc.bpm, vec![150]);
        assert_eq!(
            sc.stops,
            vec![Stop {
                offset: 2.0,
                duration: 0.5
            }]
        );
        assert_eq!(sc.diagnostics.len(), 4);
        assert!(sc
            .diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::IgnoredTiming { .. })));
    }

    #[test]
    fn test_only_non_finite_bpm_fails() {
        let err = parse("#BPMS:0=inf;\n#NOTES:dance-single::Hard:9::1000;").unwrap_err();
        assert!(matches!(err, Error::MissingBpm { .. }));
    }
}
