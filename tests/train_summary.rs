use clap::Parser;
use tdttt::{
    cli::commands::train::{TrainArgs, execute},
    td::SavedAgent,
    tictactoe::Player,
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "tdttt-train",
        "--rounds",
        "2",
        "--episodes",
        "50",
        "--eval-games",
        "10",
        "--seed",
        "7",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let evaluations = json["evaluations"].as_array().unwrap();
    assert_eq!(evaluations.len(), 3);
    let trained: Vec<u64> = evaluations
        .iter()
        .map(|e| e["episodes_trained"].as_u64().unwrap())
        .collect();
    assert_eq!(trained, vec![0, 50, 100]);
    for evaluation in evaluations {
        let total = evaluation["x_wins"].as_u64().unwrap()
            + evaluation["o_wins"].as_u64().unwrap()
            + evaluation["draws"].as_u64().unwrap();
        assert_eq!(total, 10);
        assert_eq!(evaluation["total_games"].as_u64().unwrap(), 10);
    }
    assert!(json["table_size"].as_u64().unwrap() > 0);
    assert!(json["opponent_table_size"].is_null());
    assert_eq!(json["config"]["mode"], "self-play");
}

#[test]
fn duel_run_saves_both_agents_and_curve() {
    let tmp = tempdir().unwrap();
    let main_path = tmp.path().join("x.msgpack");
    let opponent_path = tmp.path().join("o.msgpack");
    let curve_path = tmp.path().join("curve.csv");

    let args = parse_args([
        "tdttt-train",
        "--mode",
        "duel",
        "--rounds",
        "1",
        "--episodes",
        "100",
        "--eval-games",
        "20",
        "--seed",
        "3",
        "--save",
        main_path.to_str().unwrap(),
        "--save-opponent",
        opponent_path.to_str().unwrap(),
        "--curve",
        curve_path.to_str().unwrap(),
    ]);

    execute(args).expect("duel training should succeed");

    let main = SavedAgent::load_from_file(&main_path).unwrap();
    let opponent = SavedAgent::load_from_file(&opponent_path).unwrap();
    assert_eq!(main.sign, Player::X);
    assert_eq!(opponent.sign, Player::O);
    assert_eq!(main.metadata.episodes, 100);
    assert!(main.table_size() > 0);
    assert!(opponent.table_size() > 0);

    let mut reader = csv::Reader::from_path(&curve_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["game", "elapsed_nanos", "result", "x_wins", "o_wins", "draws"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    // the curve holds only the final evaluation
    assert_eq!(rows.len(), 20);
    assert_eq!(&rows[19][0], "20");
}

#[test]
fn save_opponent_requires_duel_mode() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "tdttt-train",
        "--rounds",
        "0",
        "--eval-games",
        "1",
        "--save-opponent",
        tmp.path().join("o.msgpack").to_str().unwrap(),
    ]);

    assert!(execute(args).is_err());
}
