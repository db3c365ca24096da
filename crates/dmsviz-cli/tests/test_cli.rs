use assert_cmd::Command;
use dmsviz_test_data::TestFile;
use serde_json::Value;
use std::path::Path;

fn read_output(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_cli_format() {
    let (metric_file, _t1) = TestFile::dummy_metric().create_temp().unwrap();
    let (map_file, _t2) = TestFile::dummy_sitemap().create_temp().unwrap();
    let (join_file, _t3) = TestFile::dummy_join().create_temp().unwrap();
    let (pdb_file, _t4) = TestFile::dummy_structure().create_temp().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let output = outdir.path().join("output.json");

    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.arg("format")
        .arg("--input")
        .arg(&metric_file)
        .arg("--sitemap")
        .arg(&map_file)
        .arg("--metric")
        .arg("mut_escape")
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--name")
        .arg("dummy")
        .arg("--output")
        .arg(&output)
        .arg("--join-data")
        .arg(&join_file)
        .arg("--included-chains")
        .arg("E")
        .arg("--filter-cols")
        .arg("{'times_seen': 'Times Seen'}")
        .arg("--tooltip-cols")
        .arg("{'additional_col': 'Additional'}")
        .arg("--metric-name")
        .arg("Escape");
    cmd.assert().success();

    let value = read_output(&output);
    let dataset = &value["dummy"];
    assert_eq!(dataset["metric_col"], "Escape");
    assert_eq!(dataset["condition_col"], "condition");
    assert_eq!(dataset["conditions"], serde_json::json!(["class 1", "class 2"]));
    assert_eq!(dataset["condition_colors"]["class 1"], "#0072B2");
    assert_eq!(dataset["dataChains"], serde_json::json!(["E"]));
    assert_eq!(dataset["excludeChains"], serde_json::json!(["none"]));
    assert_eq!(dataset["pdb"], TestFile::dummy_structure().contents());

    let rows = dataset["mut_metric_df"].as_array().unwrap();
    assert_eq!(rows.len(), 40);
    let first = rows[0].as_object().unwrap();
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec![
            "reference_site",
            "wildtype",
            "mutant",
            "Escape",
            "condition",
            "times_seen",
            "additional_col"
        ]
    );
    assert_eq!(first["reference_site"], 331);

    let sitemap = dataset["sitemap"].as_object().unwrap();
    assert_eq!(sitemap.len(), 11);
    assert_eq!(sitemap["331"]["chains"], "E");
    assert_eq!(sitemap["340a"]["protein_site"], "");
    assert_eq!(sitemap["340a"]["chains"], "");
}

#[test]
fn test_cli_format_alphabet_error() {
    let (metric_file, _t1) = TestFile::dummy_metric().create_temp().unwrap();
    let (map_file, _t2) = TestFile::dummy_sitemap().create_temp().unwrap();
    let (pdb_file, _t3) = TestFile::dummy_structure().create_temp().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let output = outdir.path().join("output.json");

    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.args(["format", "--metric", "mut_escape", "--name", "dummy"])
        .arg("--input")
        .arg(&metric_file)
        .arg("--sitemap")
        .arg(&map_file)
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--output")
        .arg(&output)
        .arg("--alphabet")
        .arg("NITLCPFGE");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("not in the alphabet"));
    assert!(!output.exists());
}

#[test]
fn test_cli_format_too_many_conditions() {
    let (metric_file, _t1) = TestFile::dummy_metric().create_temp().unwrap();
    let (map_file, _t2) = TestFile::dummy_sitemap().create_temp().unwrap();
    let (pdb_file, _t3) = TestFile::dummy_structure().create_temp().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let output = outdir.path().join("output.json");

    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.args(["format", "--metric", "mut_escape", "--name", "dummy"])
        .arg("--input")
        .arg(&metric_file)
        .arg("--sitemap")
        .arg(&map_file)
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--output")
        .arg(&output)
        .arg("--colors")
        .arg("#000000");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("there are 2 conditions, but only 1 color(s) specified"));
    assert!(!output.exists());
}

#[test]
fn test_cli_format_chain_mismatch() {
    let (metric_file, _t1) = TestFile::dummy_metric().create_temp().unwrap();
    let (map_file, _t2) = TestFile::dummy_sitemap().create_temp().unwrap();
    let (pdb_file, _t3) = TestFile::dummy_structure().create_temp().unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let output = outdir.path().join("output.json");

    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.args(["format", "--metric", "mut_escape", "--name", "dummy"])
        .arg("--input")
        .arg(&metric_file)
        .arg("--sitemap")
        .arg(&map_file)
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--output")
        .arg(&output)
        .arg("--included-chains")
        .arg("A");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("are not present in the PDB structure"));

    // the same run without structure checks succeeds
    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.args(["format", "--metric", "mut_escape", "--name", "dummy"])
        .arg("--input")
        .arg(&metric_file)
        .arg("--sitemap")
        .arg(&map_file)
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--output")
        .arg(&output)
        .arg("--included-chains")
        .arg("A")
        .arg("--skip-structure-check");
    cmd.assert().success();
}

#[test]
fn test_cli_join() {
    let (metric_file, _t1) = TestFile::dummy_metric().create_temp().unwrap();
    let (map_file, _t2) = TestFile::dummy_sitemap().create_temp().unwrap();
    let (pdb_file, _t3) = TestFile::dummy_structure().create_temp().unwrap();
    let outdir = tempfile::tempdir().unwrap();

    let mut outputs = Vec::new();
    for name in ["first", "second"] {
        let output = outdir.path().join(format!("{name}.json"));
        let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
        cmd.args(["format", "--metric", "mut_escape", "--name", name])
            .arg("--input")
            .arg(&metric_file)
            .arg("--sitemap")
            .arg(&map_file)
            .arg("--structure")
            .arg(&pdb_file)
            .arg("--output")
            .arg(&output);
        cmd.assert().success();
        outputs.push(output);
    }

    let joined = outdir.path().join("joined.json");
    let inputs = format!("{},{}", outputs[0].display(), outputs[1].display());
    let mut cmd = Command::cargo_bin("configure-dms-viz").unwrap();
    cmd.arg("join")
        .arg("--input")
        .arg(&inputs)
        .arg("--output")
        .arg(&joined);
    cmd.assert().success();

    let value = read_output(&joined);
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["first", "second"]);
    assert_eq!(value["first"], read_output(&outputs[0])["first"]);
}
