//! XML report parser.
//!
//! Accepts a bare `<testsuite>` root, a `<testsuites>` wrapper, or nested
//! suites. Every `<testsuite>` element in the document yields one [`Suite`]
//! holding its direct `<testcase>` children.

use std::fs;
use std::path::Path;
use std::time::Duration;

use roxmltree::{Document, Node};

use crate::error::{ReportError, ReportResult};
use crate::model::{Suite, TestCase, TestStatus};

/// Parse a report file from disk.
pub fn ingest_file(path: &Path) -> ReportResult<Vec<Suite>> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ingest_str(&content)
}

/// Parse a report from an in-memory XML document.
///
/// A well-formed document without any `<testsuite>` yields an empty list.
pub fn ingest_str(xml: &str) -> ReportResult<Vec<Suite>> {
    let doc = Document::parse(xml)?;

    let suites = doc
        .root_element()
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("testsuite"))
        .map(parse_suite)
        .collect();

    Ok(suites)
}

fn parse_suite(node: Node<'_, '_>) -> Suite {
    let tests = node
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("testcase"))
        .map(parse_test_case)
        .collect();

    Suite {
        name: node.attribute("name").unwrap_or_default().to_string(),
        tests,
    }
}

fn parse_test_case(node: Node<'_, '_>) -> TestCase {
    let mut status = TestStatus::Passed;
    let mut message = None;

    // error outranks failure, failure outranks skipped
    for child in node.children().filter(|n| n.is_element()) {
        let found = match child.tag_name().name() {
            "error" => TestStatus::Error,
            "failure" => TestStatus::Failed,
            "skipped" => TestStatus::Skipped,
            _ => continue,
        };
        if rank(found) > rank(status) {
            status = found;
            message = detail(child);
        }
    }

    TestCase {
        name: node.attribute("name").unwrap_or_default().to_string(),
        classname: node.attribute("classname").map(str::to_string),
        duration: node.attribute("time").map(parse_duration).unwrap_or_default(),
        status,
        message,
    }
}

fn rank(status: TestStatus) -> u8 {
    match status {
        TestStatus::Passed => 0,
        TestStatus::Skipped => 1,
        TestStatus::Failed => 2,
        TestStatus::Error => 3,
    }
}

fn detail(node: Node<'_, '_>) -> Option<String> {
    node.attribute("message")
        .or_else(|| node.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a report `time` attribute (seconds, possibly fractional).
///
/// Thousands separators are tolerated (`"1,234.5"`). Anything that is not a
/// finite, non-negative number yields a zero duration.
pub fn parse_duration(raw: &str) -> Duration {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => {
            Duration::from_nanos((secs * 1e9).round() as u64)
        }
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALC_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="Calc" tests="3" failures="1" errors="0" skipped="1" time="0.5">
  <properties>
    <property name="java.version" value="17"/>
  </properties>
  <testcase name="add" classname="hello.Calc" time="0.012"/>
  <testcase name="sub" classname="hello.Calc" time="0.250">
    <failure message="expected 1 but was 2" type="java.lang.AssertionError">stack</failure>
  </testcase>
  <testcase name="mul" classname="hello.Calc" time="0">
    <skipped/>
  </testcase>
</testsuite>"#;

    #[test]
    fn test_parse_single_suite() {
        let suites = ingest_str(CALC_REPORT).unwrap();
        assert_eq!(suites.len(), 1);

        let suite = &suites[0];
        assert_eq!(suite.name, "Calc");
        let names: Vec<_> = suite.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["add", "sub", "mul"]);

        assert_eq!(suite.tests[0].status, TestStatus::Passed);
        assert_eq!(suite.tests[0].classname.as_deref(), Some("hello.Calc"));
        assert_eq!(suite.tests[0].duration, Duration::from_millis(12));

        assert_eq!(suite.tests[1].status, TestStatus::Failed);
        assert_eq!(suite.tests[1].message.as_deref(), Some("expected 1 but was 2"));

        assert_eq!(suite.tests[2].status, TestStatus::Skipped);
        assert_eq!(suite.tests[2].message, None);
    }

    #[test]
    fn test_parse_testsuites_wrapper() {
        let xml = r#"<testsuites>
            <testsuite name="A"><testcase name="one"/></testsuite>
            <testsuite name="B"><testcase name="two"/><testcase name="three"/></testsuite>
        </testsuites>"#;

        let suites = ingest_str(xml).unwrap();
        let names: Vec<_> = suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(suites[1].tests.len(), 2);
    }

    #[test]
    fn test_nested_suites_keep_their_own_cases() {
        let xml = r#"<testsuite name="outer">
            <testcase name="top"/>
            <testsuite name="inner"><testcase name="deep"/></testsuite>
        </testsuite>"#;

        let suites = ingest_str(xml).unwrap();
        assert_eq!(suites.len(), 2);
        assert_eq!(suites[0].tests.len(), 1);
        assert_eq!(suites[0].tests[0].name, "top");
        assert_eq!(suites[1].name, "inner");
        assert_eq!(suites[1].tests[0].name, "deep");
    }

    #[test]
    fn test_error_outranks_failure() {
        let xml = r#"<testsuite name="S">
            <testcase name="t"><failure message="f"/><error message="boom"/></testcase>
        </testsuite>"#;

        let suites = ingest_str(xml).unwrap();
        let test = &suites[0].tests[0];
        assert_eq!(test.status, TestStatus::Error);
        assert_eq!(test.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_failure_message_falls_back_to_text() {
        let xml = r#"<testsuite name="S">
            <testcase name="t"><failure>  assertion text  </failure></testcase>
        </testsuite>"#;

        let suites = ingest_str(xml).unwrap();
        assert_eq!(suites[0].tests[0].message.as_deref(), Some("assertion text"));
    }

    #[test]
    fn test_document_without_suites() {
        let suites = ingest_str("<report><entry/></report>").unwrap();
        assert!(suites.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = ingest_str("<testsuite name=\"broken\"><testcase").unwrap_err();
        assert!(matches!(err, ReportError::Xml(_)));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0.5"), Duration::from_millis(500));
        assert_eq!(parse_duration(" 2 "), Duration::from_secs(2));
        assert_eq!(parse_duration("1,234.5"), Duration::from_millis(1_234_500));
        assert_eq!(parse_duration(""), Duration::ZERO);
        assert_eq!(parse_duration("abc"), Duration::ZERO);
        assert_eq!(parse_duration("-1"), Duration::ZERO);
        assert_eq!(parse_duration("NaN"), Duration::ZERO);
    }

    #[test]
    fn test_missing_time_is_zero() {
        let suites = ingest_str(r#"<testsuite name="S"><testcase name="t"/></testsuite>"#).unwrap();
        assert_eq!(suites[0].tests[0].duration, Duration::ZERO);
    }

    #[test]
    fn test_suite_totals() {
        let suites = ingest_str(CALC_REPORT).unwrap();
        let totals = suites[0].totals();
        assert_eq!(totals.tests, 3);
        assert_eq!(totals.passed, 1);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.skipped, 1);
        assert_eq!(totals.error, 0);
        assert_eq!(totals.duration, Duration::from_millis(262));
    }
}
