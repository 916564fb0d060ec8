mod support;

use std::fs;

use tempfile::tempdir;

use support::{run_pummel, spawn_http_server};

#[test]
fn e2e_basic_run_writes_reports() -> Result<(), String> {
    let (url, _server) = spawn_http_server(None)?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let run_log = dir.path().join("runs.log");
    let export = dir.path().join("summary.json");

    let args = vec![
        "-u".to_owned(),
        url,
        "-c".to_owned(),
        "5".to_owned(),
        "-t".to_owned(),
        "1".to_owned(),
        "--no-live".to_owned(),
        "--run-log".to_owned(),
        run_log.to_string_lossy().into_owned(),
        "--export-json".to_owned(),
        export.to_string_lossy().into_owned(),
    ];

    let output = run_pummel(args)?;
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Total Requests:") {
        return Err(format!("summary missing from stdout: {}", stdout));
    }

    let log_contents =
        fs::read_to_string(&run_log).map_err(|err| format!("read run log failed: {}", err))?;
    if log_contents.lines().count() != 1 {
        return Err(format!("expected one run-log line, got: {}", log_contents));
    }
    let field_count = log_contents.lines().next().map_or(0, |line| line.split(',').count());
    if field_count != 8 {
        return Err(format!("expected 8 run-log fields, got {}", field_count));
    }

    let export_contents =
        fs::read_to_string(&export).map_err(|err| format!("read export failed: {}", err))?;
    let value: serde_json::Value = serde_json::from_str(&export_contents)
        .map_err(|err| format!("export was not valid JSON: {}", err))?;
    let total = value
        .get("total")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| "export missing total".to_owned())?;
    if total == 0 {
        return Err("expected at least one request in the export".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_rejects_out_of_range_concurrency() -> Result<(), String> {
    let output = run_pummel(["-u", "http://localhost:1", "-c", "501"])?;
    if output.status.success() {
        return Err("out-of-range concurrency was accepted".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_rejects_non_http_scheme() -> Result<(), String> {
    let output = run_pummel(["-u", "ftp://localhost/file", "-t", "1", "--no-live"])?;
    if output.status.success() {
        return Err("non-http scheme was accepted".to_owned());
    }
    Ok(())
}
