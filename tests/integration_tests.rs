use benchplot::aes::Aes;
use benchplot::config::PlotOptions;
use benchplot::parser::read_str;
use benchplot::runtime::{build_plot, render_plot};
use benchplot::value::Kinds;
use benchplot::RenderOptions;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const CODEC: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/codec.txt");
const MALFORMED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/malformed.txt");

/// Run benchplot with `args`, feeding `stdin`. Returns stdout on success and
/// stderr on failure.
fn run_benchplot(args: &[&str], stdin: &str) -> Result<(String, String), String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_benchplot"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(stdin.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if output.status.success() {
        Ok((stdout, stderr))
    } else {
        Err(stderr)
    }
}

fn codec_input() -> String {
    fs::read_to_string(CODEC).expect("Failed to read test input")
}

#[test]
fn test_default_gnuplot_script() {
    let result = run_benchplot(&["-x", "/size", CODEC], "");
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let (script, _) = result.unwrap();

    let first = script.lines().next().unwrap();
    assert!(first.starts_with("set multiplot layout 2,1 columnsfirst"));
    assert!(script.contains("set format xy '%.0s%c'"));
    // Rows are units, B/op first.
    assert!(script.contains("set label 1 \"B/op\" at char 2"));
    assert!(script.contains("set label 1 \"sec/op\" at char 2"));
    assert!(script.contains("set ylabel \"sec/op\""));
    assert!(script.contains("set xlabel \"/size\""));
    // Each row has one series per benchmark.
    assert_eq!(script.matches("with lp title").count(), 4);
    assert!(script.trim_end().ends_with("unset multiplot"));
}

#[test]
fn test_stdin_input() {
    let from_file = run_benchplot(&["-x", "/size", CODEC], "").unwrap().0;
    let from_stdin = run_benchplot(&["-x", "/size", "-"], &codec_input()).unwrap().0;
    assert_eq!(from_file, from_stdin);
}

#[test]
fn test_output_is_deterministic() {
    let a = run_benchplot(&["-x", "/size", "--log-scale", "x:2", CODEC], "").unwrap().0;
    let b = run_benchplot(&["-x", "/size", "--log-scale", "x:2", CODEC], "").unwrap().0;
    assert_eq!(a, b);
    assert!(a.contains("set logscale x 2\n"));
}

#[test]
fn test_compare_transform() {
    let result = run_benchplot(
        &["-x", "/size", "--color", ".name", "--transform", "compare", CODEC],
        "",
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let (script, _) = result.unwrap();
    assert!(script.contains("title \"Encode vs Decode\""));
    assert!(!script.contains("title \"Decode\""));
}

#[test]
fn test_unit_filter_single_row() {
    let (script, _) = run_benchplot(&["-x", "/size", "--unit", "ns/op", CODEC], "").unwrap();
    assert!(!script.contains("set multiplot"));
    assert!(script.contains("set ylabel \"sec/op\""));
    assert!(!script.contains("B/op"));
}

#[test]
fn test_unit_filter_no_match() {
    let result = run_benchplot(&["--unit", "allocs/op", CODEC], "");
    let stderr = result.unwrap_err();
    assert!(stderr.contains("no data has units allocs/op"), "stderr: {}", stderr);
}

#[test]
fn test_no_data() {
    let stderr = run_benchplot(&["-"], "PASS\n").unwrap_err();
    assert!(stderr.contains("no data"), "stderr: {}", stderr);
}

#[test]
fn test_non_numeric_x() {
    // The default X is .fullname, which is not numeric.
    let stderr = run_benchplot(&[CODEC], "").unwrap_err();
    assert!(stderr.contains("non-numeric X data not supported"), "stderr: {}", stderr);
}

#[test]
fn test_syntax_errors_are_reported_but_not_fatal() {
    let result = run_benchplot(&["-x", "/n", MALFORMED], "");
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let (script, stderr) = result.unwrap();
    assert!(stderr.contains("malformed.txt:3: missing measurements"), "stderr: {}", stderr);
    assert!(script.contains("set ylabel \"sec/op\""));
}

#[test]
fn test_bad_flags() {
    let stderr = run_benchplot(&["--log-scale", "z", CODEC], "").unwrap_err();
    assert!(stderr.contains("unknown aesthetic \"z\""), "stderr: {}", stderr);

    let stderr = run_benchplot(&["--transform", "smooth", CODEC], "").unwrap_err();
    assert!(stderr.contains("unknown transform \"smooth\""), "stderr: {}", stderr);

    let stderr = run_benchplot(&["--col", ".bogus", CODEC], "").unwrap_err();
    assert!(stderr.contains("parsing -col"), "stderr: {}", stderr);
}

#[test]
fn test_config_file() {
    let path = std::env::temp_dir().join(format!("benchplot-config-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"x": "/size", "units": ["B/op"], "transforms": ["summarize"]}"#,
    )
    .unwrap();

    let result = run_benchplot(&["--config", path.to_str().unwrap(), CODEC], "");
    fs::remove_file(&path).ok();
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let (script, _) = result.unwrap();
    assert!(script.contains("set ylabel \"B/op\""));
    assert!(!script.contains("sec/op"));
}

#[test]
fn test_library_compare_ratios() {
    let input = read_str("codec.txt", &codec_input()).unwrap();
    let options = PlotOptions {
        x: "/size".to_string(),
        color: ".name".to_string(),
        units: vec!["B/op".to_string()],
        transforms: vec!["compare".to_string()],
        ..Default::default()
    };
    let plot = build_plot(&options, &input).unwrap();

    // One ratio per size: Encode allocates twice as much as Decode.
    assert_eq!(plot.points().len(), 2);
    for pt in plot.points() {
        let y = pt.get(Aes::Y);
        assert!(y.is(Kinds::CONTINUOUS | Kinds::RATIO));
        assert_eq!(y.val, 2.0);
        assert_eq!(pt.get(Aes::Color).values_string(), "Encode vs Decode");
    }

    let script = render_plot(&plot, &RenderOptions::default(), 0.95).unwrap();
    let script = String::from_utf8(script).unwrap();
    assert!(script.contains("1024 2\n4096 2\ne\n"));
}
