use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tracks.json");

/// Helper function to run trackdash with the given arguments
fn run_trackdash(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_trackdash"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str]) -> Value {
    let result = run_trackdash(args);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    serde_json::from_slice(&result.unwrap()).expect("Output is not valid JSON")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_end_to_end_overview() {
    let json = run_json(&[FIXTURE, "overview"]);
    assert_eq!(json["total_tracks"], 10);
    assert_eq!(json["unique_artists"], 6);
    assert_eq!(json["top_region"], "Europe");
    assert_eq!(json["average_duration"], "3:42");
    assert_eq!(json["trend"]["type"], "line");
    assert_eq!(json["trend"]["categories"].as_array().unwrap().len(), 24);
}

#[test]
fn test_end_to_end_genres_with_selectors() {
    let json = run_json(&[FIXTURE, "genres", "--region", "Europe", "--year", "2001"]);
    assert_eq!(json["matched_tracks"], 2);
    assert_eq!(json["ranking"][0]["name"], "POP");
    assert_eq!(json["heatmap"]["cells"][1]["x"], "ROCK");
    assert_eq!(json["heatmap"]["cells"][1]["y"], 64.0);
}

#[test]
fn test_end_to_end_geo() {
    let json = run_json(&[FIXTURE, "geo"]);
    assert_eq!(json["country_count"], 6);
    assert_eq!(json["top_country"], "US");
    assert_eq!(json["top_share"], 30.0);
    assert_eq!(json["chart"]["horizontal"], true);
}

#[test]
fn test_end_to_end_evolution_range() {
    let json = run_json(&[FIXTURE, "evolution", "--years", "2001-2002"]);
    assert_eq!(json["points"].as_array().unwrap().len(), 2);
    assert_eq!(json["mood"]["series"][0]["data"][0], 71.7);
    assert_eq!(json["tempo"]["curve"], "stepline");
    assert_eq!(json["duration"]["series"][0]["data"][1], 198.0);
    assert_eq!(json["duration"]["reference"]["value"], 180.0);
}

#[test]
fn test_end_to_end_race_frame() {
    let json = run_json(&[FIXTURE, "race", "--year", "2001"]);
    assert_eq!(json["year"], 2001);
    let labels: Vec<&str> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["pop", "j-pop", "rock"]);
}

#[test]
fn test_end_to_end_race_playback() {
    let result = run_trackdash(&[FIXTURE, "race", "--years", "2000-2002", "--play", "--interval-ms", "5"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let stdout = String::from_utf8(result.unwrap()).unwrap();
    let titles: Vec<String> = stdout
        .lines()
        .map(|line| {
            let chart: Value = serde_json::from_str(line).unwrap();
            chart["title"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(titles, vec!["Top genres 2000", "Top genres 2001", "Top genres 2002"]);
}

#[test]
fn test_end_to_end_png_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_str().unwrap();
    let result = run_trackdash(&["--format", "png", "--out", out, FIXTURE, "regions"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    for name in ["regions_leaders.png", "regions_shares.png"] {
        let bytes = fs::read(Path::new(out).join(name)).expect("PNG not written");
        assert!(is_valid_png(&bytes), "{} is not a valid PNG", name);
    }
}

#[test]
fn test_end_to_end_config_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"geography": {"top_n": 2}}"#).unwrap();

    let json = run_json(&["--config", config.to_str().unwrap(), FIXTURE, "geo"]);
    assert_eq!(json["chart"]["categories"].as_array().unwrap().len(), 2);
    assert_eq!(json["ranking"].as_array().unwrap().len(), 6);
}

#[test]
fn test_end_to_end_csv_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracks.csv");
    fs::write(
        &path,
        "artists,year,region,country_code,track_genre,duration_fmt,popularity\n\
         A,2001,Europe,FR,pop,3:00,50\n\
         B,2002,Europe,FR,rock,4:00,70\n",
    )
    .unwrap();

    let json = run_json(&[path.to_str().unwrap(), "overview"]);
    assert_eq!(json["total_tracks"], 2);
    assert_eq!(json["average_duration"], "3:30");
}

#[test]
fn test_end_to_end_missing_dataset() {
    let result = run_trackdash(&["/nonexistent/tracks.json", "overview"]);
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.contains("Failed to open dataset"), "{}", err);
}

#[test]
fn test_end_to_end_non_array_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"tracks": []}"#).unwrap();

    let result = run_trackdash(&[path.to_str().unwrap(), "geo"]);
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.contains("JSON array"));
    assert_eq!(err.matches("Failed to load dataset").count(), 1);
}

#[test]
fn test_end_to_end_invalid_year_selector() {
    let result = run_trackdash(&[FIXTURE, "genres", "--year", "soon"]);
    assert!(result.is_err());
}
