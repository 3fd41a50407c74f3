use belote_rs::agents::StrategyKind;
use belote_rs::player::{Seats, Team};
use belote_rs::sim::{
    run_match, ConfigRow, MatchSummary, OutputFormat, OutputWriter, SimConfig,
};

fn config() -> SimConfig {
    SimConfig {
        games: 2,
        target_score: 400,
        seed: Some(42),
        strategies: Seats::new([
            StrategyKind::HighestCard,
            StrategyKind::Random,
            StrategyKind::HighestCard,
            StrategyKind::Random,
        ]),
        ..SimConfig::default()
    }
}

fn reader(path: &std::path::Path) -> csv::Reader<std::fs::File> {
    csv::ReaderBuilder::new().delimiter(b';').from_path(path).expect("open csv")
}

#[test]
fn csv_output_has_one_row_per_action() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config();
    let mut writer = OutputWriter::new(dir.path(), "exp1", OutputFormat::Csv).unwrap();
    writer.write_config(&ConfigRow::new("exp1", &cfg)).unwrap();
    let mut auction_rows = 0;
    let mut trick_rows = 0;
    for game_id in 0..cfg.games {
        let log = run_match(&cfg, "exp1", game_id).unwrap();
        auction_rows += log.auctions.len();
        trick_rows += log.tricks.len();
        writer.write_match(&log).unwrap();
    }
    let paths = writer.paths().to_vec();
    writer.finish().unwrap();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.exists()));

    let mut config_csv = reader(&dir.path().join("exp1_config.csv"));
    let rows: Vec<ConfigRow> = config_csv.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].west_agent, "highest");
    assert_eq!(rows[0].south_agent, "random");

    let mut auctions = reader(&dir.path().join("exp1_auctions.csv"));
    let headers = auctions.headers().unwrap().clone();
    assert_eq!(&headers[0], "experiment_id");
    assert_eq!(&headers[8], "cards");
    assert_eq!(auctions.records().count(), auction_rows);

    let mut tricks = reader(&dir.path().join("exp1_tricks.csv"));
    let headers = tricks.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "east/west_points"));
    assert!(headers.iter().any(|h| h == "game_winners"));
    assert_eq!(tricks.records().count(), trick_rows);

    let mut summary = reader(&dir.path().join("exp1_summary.csv"));
    let summaries: Vec<MatchSummary> = summary.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].game_id, 1);
}

#[test]
fn jsonl_summary_has_one_object_per_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config();
    let mut writer = OutputWriter::new(dir.path(), "exp2", OutputFormat::Jsonl).unwrap();
    let log = run_match(&cfg, "exp2", 0).unwrap();
    writer.write_match(&log).unwrap();
    writer.finish().unwrap();

    let text = std::fs::read_to_string(dir.path().join("exp2_summary.jsonl")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    let parsed: MatchSummary = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed, log.summary);
    let top = parsed.east_west_score.max(parsed.north_south_score);
    assert!(top >= 400);
    let expected = if parsed.east_west_score > parsed.north_south_score {
        Team::EastWest
    } else {
        Team::NorthSouth
    };
    assert_eq!(parsed.winner, expected);
}

#[test]
fn output_format_parses_from_cli_text() {
    assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
    assert_eq!("JSONL".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
    assert!("xml".parse::<OutputFormat>().is_err());
}
