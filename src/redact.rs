//! Output redaction
//!
//! Sensitive variable values are replaced verbatim in the raw byte stream,
//! before the output is decoded or stored.

use crate::job::Variables;

/// Scrubs a fixed set of secrets from captured output.
#[derive(Debug, Clone)]
pub struct Redactor {
    placeholder: Vec<u8>,
    secrets: Vec<Vec<u8>>,
}

impl Redactor {
    pub fn new<'a>(placeholder: &str, secrets: impl IntoIterator<Item = &'a str>) -> Self {
        let mut secrets: Vec<Vec<u8>> = secrets
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_bytes().to_vec())
            .collect();
        // longest first so a secret containing another is replaced whole
        secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        secrets.dedup();

        Self {
            placeholder: placeholder.as_bytes().to_vec(),
            secrets,
        }
    }

    /// Redactor for the sensitive variables of a job.
    pub fn for_variables(placeholder: &str, variables: &Variables) -> Self {
        Self::new(placeholder, variables.sensitive_values())
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Replace every occurrence of every secret in a single pass.
    ///
    /// At each position the longest matching secret wins; placeholder bytes
    /// already written are never scanned again.
    pub fn redact(&self, output: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(output.len());
        let mut rest = output;

        'scan: while let Some((&first, tail)) = rest.split_first() {
            for secret in &self.secrets {
                if rest.starts_with(secret) {
                    out.extend_from_slice(&self.placeholder);
                    rest = &rest[secret.len()..];
                    continue 'scan;
                }
            }
            out.push(first);
            rest = tail;
        }

        out
    }

    pub fn redact_str(&self, text: &str) -> String {
        String::from_utf8_lossy(&self.redact(text.as_bytes())).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Variable;

    #[test]
    fn test_sensitive_value_replaced() {
        let variables: Variables = [Variable::sensitive("TOKEN", "s3cr3t")].into_iter().collect();
        let redactor = Redactor::for_variables("********", &variables);

        let out = redactor.redact(b"token=s3cr3t; again s3cr3t.");
        assert_eq!(out, b"token=********; again ********.".to_vec());
    }

    #[test]
    fn test_plain_values_untouched() {
        let variables: Variables = [
            Variable::plain("MODE", "ci"),
            Variable::sensitive("TOKEN", "s3cr3t"),
        ]
        .into_iter()
        .collect();
        let redactor = Redactor::for_variables("***", &variables);

        let out = redactor.redact(b"running ci with s3cr3t");
        assert_eq!(out, b"running ci with ***".to_vec());
    }

    #[test]
    fn test_empty_secret_ignored() {
        let redactor = Redactor::new("***", [""]);
        assert!(redactor.is_empty());
        assert_eq!(redactor.redact(b"abc"), b"abc".to_vec());
    }

    #[test]
    fn test_longer_secret_replaced_first() {
        let redactor = Redactor::new("#", ["pass", "password123"]);
        assert_eq!(redactor.redact(b"password123 pass"), b"# #".to_vec());
    }

    #[test]
    fn test_placeholder_not_rescanned() {
        let redactor = Redactor::new("********", ["*", "ab"]);
        assert_eq!(redactor.redact(b"ab*"), b"****************".to_vec());
        assert_eq!(redactor.redact(b"x*y"), b"x********y".to_vec());
    }

    #[test]
    fn test_no_match_across_placeholder_boundary() {
        // "#d" only exists once "abc" has been replaced
        let redactor = Redactor::new("#", ["abc", "#d"]);
        assert_eq!(redactor.redact(b"abcd"), b"#d".to_vec());
    }

    #[test]
    fn test_non_utf8_output() {
        let redactor = Redactor::new("*", ["key"]);
        let out = redactor.redact(&[0xff, b'k', b'e', b'y', 0xfe]);
        assert_eq!(out, vec![0xff, b'*', 0xfe]);
    }
}
