//! `.dwi` parser.
//!
//! Notes are an inline character stream: each character is one step of the
//! current increment (an 8th note unless a bracket changes it), digits and
//! letters encode arrows or jumps, and `X!Y` starts a freeze.

use tracing::debug;

use crate::chart::{
    Arrow, ChartData, Diagnostic, Difficulty, Direction, Mode, RawStepchart, StepchartType, Stop,
};
use crate::config::{BeatTable, dwi};
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::parse::freeze::FreezeTracker;
use crate::parse::tags::{RawTag, read_tags};

/// Tags the DWI parser acts on. `#DOUBLE` charts are not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DwiTag<'a> {
    Title(&'a str),
    Artist(&'a str),
    Bpm(&'a str),
    DisplayBpm(&'a str),
    Freeze(&'a str),
    Single(&'a str),
    Other,
}

impl<'a> DwiTag<'a> {
    fn from_raw(tag: &'a RawTag, id: &str) -> Result<Self> {
        let known = matches!(
            tag.name.as_str(),
            "TITLE" | "ARTIST" | "BPM" | "DISPLAYBPM" | "FREEZE" | "SINGLE"
        );
        let value = match (&tag.value, known) {
            (_, false) => return Ok(Self::Other),
            (Some(value), true) => value.as_str(),
            (None, true) => return Err(Error::malformed_tag(id, &tag.name, tag.value_or_raw())),
        };

        Ok(match tag.name.as_str() {
            "TITLE" => Self::Title(value),
            "ARTIST" => Self::Artist(value),
            "BPM" => Self::Bpm(value),
            "DISPLAYBPM" => Self::DisplayBpm(value),
            "FREEZE" => Self::Freeze(value),
            "SINGLE" => Self::Single(value),
            _ => Self::Other,
        })
    }
}

/// Lane pattern for a DWI arrow character.
pub fn direction_for(note: char) -> Option<&'static str> {
    Some(match note {
        '1' => "1100", // down-left
        '2' => "0100", // down
        '3' => "0101", // down-right
        '4' => "1000", // left
        '6' => "0001", // right
        '7' => "1010", // up-left
        '8' => "0010", // up
        '9' => "0011", // up-right
        'A' => "0110", // up-down jump
        'B' => "1001", // left-right jump
        _ => return None,
    })
}

/// One unit of the note stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Bracket: change the step to 1/n of a measure.
    Step(i64),
    /// `0`
    Rest,
    /// Plain arrow, or the close of the held freeze.
    Arrow(char),
    /// `X!Y`: arrow `X` whose lanes start freezes.
    HoldHead(char),
}

impl Token {
    /// Read the token at `index`, returning it and how many characters it
    /// spans.
    pub fn read(notes: &[char], index: usize) -> (Token, usize) {
        let note = notes[index];
        match note {
            '(' => (Token::Step(dwi::SIXTEENTH_STEP), 1),
            '[' => (Token::Step(dwi::TWENTY_FOURTH_STEP), 1),
            '{' => (Token::Step(dwi::SIXTY_FOURTH_STEP), 1),
            '`' => (Token::Step(dwi::HUNDRED_NINETY_SECOND_STEP), 1),
            ')' | ']' | '}' | '\'' => (Token::Step(dwi::DEFAULT_STEP), 1),
            '0' => (Token::Rest, 1),
            // the character after `!` is skipped along with it
            _ if notes.get(index + 1) == Some(&'!') => {
                (Token::HoldHead(note), 3.min(notes.len() - index))
            }
            _ => (Token::Arrow(note), 1),
        }
    }
}

/// Scan state for one note stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwiCursor {
    pub offset: Fraction,
    pub step: Fraction,
    /// Character of the freeze currently held. Only one can be tracked.
    pub held: Option<char>,
}

impl Default for DwiCursor {
    fn default() -> Self {
        Self {
            offset: Fraction::ZERO,
            step: Fraction::new(1, dwi::DEFAULT_STEP),
            held: None,
        }
    }
}

impl DwiCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one token. Returns the arrow it produces, if any, or the
    /// offending character when it is not an arrow.
    pub fn apply(
        &mut self,
        token: Token,
        freezes: &mut FreezeTracker,
        beats: &BeatTable,
    ) -> std::result::Result<Option<Arrow>, char> {
        match token {
            Token::Step(denominator) => {
                self.step = Fraction::new(1, denominator);
                Ok(None)
            }
            Token::Rest => {
                self.offset += self.step;
                Ok(None)
            }
            Token::HoldHead(note) => {
                let pattern = Direction::from_pattern(direction_for(note).ok_or(note)?);
                for lane in pattern.active_lanes() {
                    freezes.open(lane, self.offset);
                }
                let arrow = self.arrow(pattern.as_freeze_head(), beats);
                self.held = Some(note);
                self.offset += self.step;
                Ok(Some(arrow))
            }
            Token::Arrow(note) if self.held == Some(note) => {
                let pattern = Direction::from_pattern(direction_for(note).ok_or(note)?);
                let (n, d) = dwi::FREEZE_RELEASE;
                for lane in pattern.active_lanes() {
                    freezes.close(lane, self.offset, Fraction::new(n, d));
                }
                self.held = None;
                self.offset += self.step;
                Ok(None)
            }
            Token::Arrow(note) => {
                let pattern = Direction::from_pattern(direction_for(note).ok_or(note)?);
                let arrow = self.arrow(pattern, beats);
                self.offset += self.step;
                Ok(Some(arrow))
            }
        }
    }

    fn arrow(&self, direction: Direction, beats: &BeatTable) -> Arrow {
        Arrow {
            direction,
            beat: beats.classify(self.offset),
            offset: self.offset.to_f64(),
        }
    }
}

/// Parse the full text of a `.dwi` file. `id` names the chart in errors and
/// gives the default banner `{id}.png`.
pub fn parse_dwi(text: &str, id: &str, beats: &BeatTable) -> Result<RawStepchart> {
    let raw_tags = read_tags(text);
    let mut sc = RawStepchart {
        banner: Some(format!("{}.png", id)),
        ..Default::default()
    };
    let mut bpm = None;
    let mut display_bpm = None;
    let mut singles = Vec::new();

    for raw in &raw_tags {
        match DwiTag::from_raw(raw, id)? {
            DwiTag::Title(value) => sc.title = value.trim().to_string(),
            DwiTag::Artist(value) => sc.artist = value.trim().to_string(),
            DwiTag::Bpm(value) => bpm = Some(parse_bpm(&mut sc, value, "BPM", id)?),
            DwiTag::DisplayBpm(value) => display_bpm = parse_display_bpm(&mut sc, value, id)?,
            DwiTag::Freeze(value) => sc.stops = parse_freeze_stops(&mut sc, value, id)?,
            DwiTag::Single(value) => singles.push(value),
            DwiTag::Other => {}
        }
    }

    let usable = |values: &Vec<u32>| !values.is_empty();
    sc.bpm = display_bpm
        .filter(usable)
        .or(bpm.filter(usable))
        .ok_or_else(|| Error::MissingBpm { id: id.to_string() })?;

    for value in singles {
        parse_chart(&mut sc, Mode::Single, value, id, beats)?;
    }

    debug!(
        "Parsed {} ({} charts, bpm {:?})",
        id,
        sc.available_types.len(),
        sc.bpm
    );
    Ok(sc)
}

fn parse_bpm(sc: &mut RawStepchart, value: &str, tag: &str, id: &str) -> Result<Vec<u32>> {
    let bpm: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::malformed_tag(id, tag, value.trim()))?;
    if !bpm.is_finite() || bpm <= 0.0 {
        sc.report(Diagnostic::IgnoredTiming {
            tag: tag.to_string(),
            entry: value.trim().to_string(),
        });
        return Ok(Vec::new());
    }
    Ok(vec![bpm.round() as u32])
}

/// `#DISPLAYBPM`: a number, a `min..max` range, or `*` for a randomized
/// display, which carries no usable value.
fn parse_display_bpm(sc: &mut RawStepchart, value: &str, id: &str) -> Result<Option<Vec<u32>>> {
    let value = value.trim();
    if value == "*" {
        sc.report(Diagnostic::IgnoredTiming {
            tag: "DISPLAYBPM".to_string(),
            entry: value.to_string(),
        });
        return Ok(None);
    }

    let mut bpms = Vec::new();
    for part in value.split("..") {
        for bpm in parse_bpm(sc, part, "DISPLAYBPM", id)? {
            if !bpms.contains(&bpm) {
                bpms.push(bpm);
            }
        }
    }
    Ok(Some(bpms))
}

/// `#FREEZE`: `position=milliseconds` pairs, positions in 16th notes.
fn parse_freeze_stops(sc: &mut RawStepchart, value: &str, id: &str) -> Result<Vec<Stop>> {
    let mut stops = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parsed = entry.split_once('=').and_then(|(position, ms)| {
            Some((position.trim().parse::<f64>().ok()?, ms.trim().parse::<f64>().ok()?))
        });
        let Some((position, ms)) = parsed else {
            return Err(Error::malformed_tag(id, "FREEZE", entry));
        };
        if !position.is_finite() || !ms.is_finite() || ms <= 0.0 {
            sc.report(Diagnostic::IgnoredTiming {
                tag: "FREEZE".to_string(),
                entry: entry.to_string(),
            });
            continue;
        }
        stops.push(Stop {
            offset: position / dwi::STOP_POSITIONS_PER_MEASURE,
            duration: ms / 1000.0,
        });
    }
    Ok(stops)
}

/// `difficulty:feet:notes`
fn parse_chart(
    sc: &mut RawStepchart,
    mode: Mode,
    value: &str,
    id: &str,
    beats: &BeatTable,
) -> Result<()> {
    let fields: Vec<&str> = value.splitn(3, ':').collect();
    let [difficulty, feet, notes] = fields[..] else {
        return Err(Error::malformed_tag(id, "SINGLE", value.trim()));
    };

    let feet: u32 = feet
        .trim()
        .parse()
        .map_err(|_| Error::malformed_tag(id, "SINGLE", feet.trim()))?;

    let Some(difficulty) = Difficulty::from_source(difficulty) else {
        sc.report(Diagnostic::UnknownDifficulty {
            mode: mode.to_string(),
            difficulty: difficulty.trim().to_lowercase(),
        });
        return Ok(());
    };

    let chart_type = StepchartType::new(mode, difficulty, feet);
    let (data, diagnostics) = scan_notes(&chart_type.slug, mode, notes, id, beats)?;

    sc.report_all(diagnostics);
    sc.add_chart(chart_type, data);
    Ok(())
}

fn scan_notes(
    slug: &str,
    mode: Mode,
    notes: &str,
    id: &str,
    beats: &BeatTable,
) -> Result<(ChartData, Vec<Diagnostic>)> {
    let notes: Vec<char> = notes.chars().filter(|c| !c.is_whitespace()).collect();
    let mut cursor = DwiCursor::new();
    let mut tracker = FreezeTracker::new(slug, mode.lanes());
    let mut arrows = Vec::new();

    let mut index = 0;
    while index < notes.len() {
        let (token, width) = Token::read(&notes, index);
        match cursor.apply(token, &mut tracker, beats) {
            Ok(Some(arrow)) => arrows.push(arrow),
            Ok(None) => {}
            Err(ch) => {
                let from = index.saturating_sub(4);
                let to = (index + 5).min(notes.len());
                return Err(Error::UnknownArrowChar {
                    id: id.to_string(),
                    ch,
                    fragment: notes[from..to].iter().collect(),
                });
            }
        }
        index += width;
    }

    // a head that is never closed still gets the release tail
    let (n, d) = dwi::FREEZE_RELEASE;
    let (freezes, diagnostics) = tracker.finish(Some(Fraction::new(n, d)));
    Ok((ChartData { arrows, freezes }, diagnostics))
}
