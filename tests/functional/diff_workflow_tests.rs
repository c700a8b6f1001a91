//! End-to-end diff workflow tests: CSV in, diff table out

use crate::common::{sample_data, CliTestRunner};
use std::fs;

#[test]
fn test_diff_workflow_writes_bom_and_table() {
    let runner = CliTestRunner::new().unwrap();

    let csv1 = runner
        .fixture()
        .create_csv("2024-01-01.csv", &sample_data::baseline_csv_data())
        .unwrap();
    let csv2 = runner
        .fixture()
        .create_csv("2024-01-02.csv", &sample_data::updated_csv_data())
        .unwrap();
    let out = runner.fixture().path("diff.csv");

    runner.expect_success(&[
        "diff",
        csv1.to_str().unwrap(),
        csv2.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with('\u{feff}'), "Output should carry a BOM");

    let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(
        lines[0],
        "name,status,line_count_diff,package_count_diff,csv1_line_count,csv1_package_count,csv2_line_count,csv2_package_count"
    );

    // churn first: added, modified, deleted, then unchanged
    assert_eq!(lines[1], "web/router,added,60,3,0,0,60,3");
    assert_eq!(lines[2], "core/parser,modified,30,0,100,2,130,2");
    assert_eq!(lines[3], "util/strings,deleted,-25,-1,25,1,0,0");
    assert_eq!(lines[4], "core/lexer,unchanged,0,0,40,1,40,1");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_diff_no_bom_flag() {
    let runner = CliTestRunner::new().unwrap();

    let csv1 = runner
        .fixture()
        .create_csv("a.csv", &sample_data::baseline_csv_data())
        .unwrap();
    let csv2 = runner
        .fixture()
        .create_csv("b.csv", &sample_data::updated_csv_data())
        .unwrap();
    let out = runner.fixture().path("diff.csv");

    runner.expect_success(&[
        "diff",
        csv1.to_str().unwrap(),
        csv2.to_str().unwrap(),
        out.to_str().unwrap(),
        "--no-bom",
    ]);

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("name,status"));
}

#[test]
fn test_diff_output_is_reproducible() {
    let runner = CliTestRunner::new().unwrap();

    let csv1 = runner
        .fixture()
        .create_csv("a.csv", &sample_data::baseline_csv_data())
        .unwrap();
    let csv2 = runner
        .fixture()
        .create_csv("b.csv", &sample_data::updated_csv_data())
        .unwrap();
    let out1 = runner.fixture().path("diff1.csv");
    let out2 = runner.fixture().path("diff2.csv");

    for out in [&out1, &out2] {
        runner.expect_success(&[
            "diff",
            csv1.to_str().unwrap(),
            csv2.to_str().unwrap(),
            out.to_str().unwrap(),
        ]);
    }

    assert_eq!(fs::read(&out1).unwrap(), fs::read(&out2).unwrap());
}

#[test]
fn test_diff_quoted_names_survive_the_round_trip() {
    let runner = CliTestRunner::new().unwrap();

    let csv1 = runner
        .fixture()
        .create_csv_raw("a.csv", "name,line_count\n\"Foo, Inc\",10\n")
        .unwrap();
    let csv2 = runner
        .fixture()
        .create_csv_raw("b.csv", "name,line_count\n\"Foo, Inc\",25\n")
        .unwrap();
    let out = runner.fixture().path("diff.csv");

    runner.expect_success(&[
        "diff",
        csv1.to_str().unwrap(),
        csv2.to_str().unwrap(),
        out.to_str().unwrap(),
        "--no-bom",
    ]);

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"Foo, Inc\",modified,15"));

    // the written table parses back to the same field content
    let rows = metricdiff::csv::parse(&content);
    assert_eq!(rows[1][0], "Foo, Inc");
}

#[test]
fn test_diff_input_with_bom_parses_cleanly() {
    let runner = CliTestRunner::new().unwrap();

    let csv1 = runner
        .fixture()
        .create_csv_raw("a.csv", "\u{feff}name,line_count\nfoo,10\n")
        .unwrap();
    let csv2 = runner
        .fixture()
        .create_csv_raw("b.csv", "name,line_count\nfoo,10\n")
        .unwrap();
    let out = runner.fixture().path("diff.csv");

    runner.expect_success(&[
        "diff",
        csv1.to_str().unwrap(),
        csv2.to_str().unwrap(),
        out.to_str().unwrap(),
        "--no-bom",
    ]);

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("foo,unchanged,0,0,10,0,10,0"));
}

#[test]
fn test_diff_missing_input_fails() {
    let runner = CliTestRunner::new().unwrap();

    let csv2 = runner
        .fixture()
        .create_csv("b.csv", &sample_data::baseline_csv_data())
        .unwrap();
    let out = runner.fixture().path("diff.csv");

    let err = runner.expect_failure(&[
        "diff",
        runner.fixture().path("absent.csv").to_str().unwrap(),
        csv2.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);
    assert!(err.to_string().contains("absent.csv"));
    assert!(!out.exists(), "No output on failure");
}

#[test]
fn test_diff_missing_arguments_is_usage_error() {
    let runner = CliTestRunner::new().unwrap();
    runner.expect_failure(&["diff", "only-one.csv"]);
}

#[test]
fn test_totals_command() {
    let runner = CliTestRunner::new().unwrap();

    let input = runner
        .fixture()
        .create_csv("a.csv", &sample_data::baseline_csv_data())
        .unwrap();

    runner.expect_success(&["totals", input.to_str().unwrap()]);
    runner.expect_success(&["totals", input.to_str().unwrap(), "--format", "json"]);
}
