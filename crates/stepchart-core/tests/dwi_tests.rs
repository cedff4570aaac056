//! End-to-end tests for `.dwi` parsing

use stepchart_core::{
    Beat, BeatTable, Diagnostic, DifficultyPriority, Error, RawStepchart, Stop, parse_dwi,
};

const SAMPLE: &str = include_str!("fixtures/sample.dwi");

fn sample() -> RawStepchart {
    parse_dwi(SAMPLE, "dwisong", &BeatTable::default()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

mod metadata {
    use super::*;

    #[test]
    fn test_song_fields() {
        let sc = sample();
        assert_eq!(sc.title, "Dwi Song");
        assert_eq!(sc.artist, "Someone");
        assert_eq!(sc.banner.as_deref(), Some("dwisong.png"));
        assert_eq!(sc.bpm, vec![156]);
    }

    #[test]
    fn test_freeze_tag_becomes_stops() {
        assert_eq!(
            sample().stops,
            vec![Stop {
                offset: 2.0,
                duration: 0.25,
            }]
        );
    }

    #[test]
    fn test_singles_only() {
        let sc = sample();
        let slugs: Vec<&str> = sc.available_types.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["single-basic", "single-expert", "single-difficult"]);
        assert!(sc.available_types.iter().all(|t| t.mode.lanes() == 4));
    }
}

mod hold_at_stream_end {
    use super::*;

    #[test]
    fn test_head_then_close() {
        let sc = parse_dwi("#BPM:120;\n#SINGLE:BASIC:3:2!86;", "frag", &BeatTable::default())
            .unwrap();
        let chart = sc.chart("single-basic").unwrap();

        assert_eq!(chart.arrows[0].direction.as_str(), "0200");
        assert_eq!(chart.arrows[0].offset, 0.0);
        assert!(chart.arrows[0].direction.has_freeze_head());

        assert_eq!(chart.freezes.len(), 1);
        assert_eq!(chart.freezes[0].direction, 1);
        assert_eq!(chart.freezes[0].start_offset, 0.0);
        assert_eq!(chart.freezes[0].end_offset, 0.25);

        assert!(matches!(
            sc.diagnostics[..],
            [Diagnostic::UnclosedFreeze {
                lane: 1,
                resolved_at: Some(_),
                ..
            }]
        ));
    }
}

mod note_stream {
    use super::*;

    #[test]
    fn test_maniac_arrows() {
        let sc = sample();
        let arrows = &sc.chart("single-expert").unwrap().arrows;

        let directions: Vec<&str> = arrows.iter().map(|a| a.direction.as_str()).collect();
        assert_eq!(
            directions,
            vec![
                "1000", "0001", "1000", "0001", "2020", "0100", "0010", "0100", "0010", "0010"
            ]
        );

        let expected = [
            0.0,
            1.0 / 16.0,
            2.0 / 16.0,
            3.0 / 16.0,
            0.75,
            13.0 / 8.0,
            13.0 / 8.0 + 1.0 / 24.0,
            13.0 / 8.0 + 2.0 / 24.0,
            7.0 / 4.0,
            15.0 / 8.0,
        ];
        for (arrow, expected) in arrows.iter().zip(expected) {
            assert_close(arrow.offset, expected);
        }
    }

    #[test]
    fn test_maniac_beats() {
        let sc = sample();
        let arrows = &sc.chart("single-expert").unwrap().arrows;
        assert_eq!(arrows[0].beat, Beat::Quarter);
        assert_eq!(arrows[1].beat, Beat::Sixteenth);
        assert_eq!(arrows[2].beat, Beat::Eighth);
        assert_eq!(arrows[4].beat, Beat::Quarter);
        assert_eq!(arrows[5].beat, Beat::Eighth);
        assert_eq!(arrows[8].beat, Beat::Quarter);
        assert_eq!(arrows[9].beat, Beat::Eighth);
    }

    #[test]
    fn test_jump_hold_spans() {
        let sc = sample();
        let freezes = &sc.chart("single-expert").unwrap().freezes;

        let lanes: Vec<usize> = freezes.iter().map(|f| f.direction).collect();
        assert_eq!(lanes, vec![0, 2]);
        for freeze in freezes {
            assert_eq!(freeze.start_offset, 0.75);
            assert_eq!(freeze.end_offset, 1.5);
        }
    }

    #[test]
    fn test_offsets_non_decreasing() {
        let sc = sample();
        for chart in sc.arrows.values() {
            assert!(chart.arrows.windows(2).all(|w| w[0].offset <= w[1].offset));
        }
    }

    #[test]
    fn test_freezes_valid() {
        let sc = sample();
        for chart in sc.arrows.values() {
            for freeze in &chart.freezes {
                assert!(freeze.direction < 4);
                assert!(freeze.end_offset > freeze.start_offset);
            }
        }
    }

    #[test]
    fn test_difficulties_known_to_selector() {
        let sc = sample();
        let priority = DifficultyPriority::default();
        assert!(sc.available_types.iter().all(|t| priority.contains(t.difficulty)));
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_unknown_character() {
        let err = parse_dwi(
            "#BPM:120;\n#SINGLE:BASIC:3:2468X;",
            "bad",
            &BeatTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownArrowChar { ch: 'X', ref id, .. } if id == "bad"));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_missing_bpm() {
        let err = parse_dwi("#SINGLE:BASIC:3:2468;", "nobpm", &BeatTable::default()).unwrap_err();
        assert!(matches!(err, Error::MissingBpm { .. }));
    }

    #[test]
    fn test_zero_bpm_counts_as_missing() {
        let err =
            parse_dwi("#BPM:0;\n#SINGLE:BASIC:3:2468;", "zero", &BeatTable::default()).unwrap_err();
        assert!(matches!(err, Error::MissingBpm { .. }));
    }

    #[test]
    fn test_unknown_difficulty_skipped() {
        let sc = parse_dwi(
            "#BPM:120;\n#SINGLE:EDIT:3:2468;\n#SINGLE:LIGHT:2:2;",
            "edit",
            &BeatTable::default(),
        )
        .unwrap();
        assert_eq!(sc.available_types.len(), 1);
        assert_eq!(sc.available_types[0].slug, "single-basic");
        assert!(matches!(
            sc.diagnostics[..],
            [Diagnostic::UnknownDifficulty { ref difficulty, .. }] if difficulty == "edit"
        ));
    }
}
