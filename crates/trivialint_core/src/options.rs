//! Analyzer options resolved from an external key/value provider.
//!
//! Rules never read configuration directly. An [`OptionProvider`] is queried
//! once per analysis into an [`AnalyzerOptions`] value, which is then passed
//! explicitly to every rule through the rule context.

use std::collections::HashMap;
use std::path::Path;

/// A source of raw option values, keyed per file.
pub trait OptionProvider: Send + Sync {
    /// Returns the raw value of `key` for the file at `path`.
    fn get(&self, path: Option<&Path>, key: &str) -> Option<String>;
}

impl OptionProvider for HashMap<String, String> {
    fn get(&self, _path: Option<&Path>, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// A provider with no values; every option takes its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOptions;

impl OptionProvider for NoOptions {
    fn get(&self, _path: Option<&Path>, _key: &str) -> Option<String> {
        None
    }
}

/// A typed option: a key, a default and a parser for the raw value.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOption<T: 'static> {
    key: &'static str,
    default: fn() -> T,
    parse: fn(&str) -> Option<T>,
}

impl<T: 'static> AnalyzerOption<T> {
    pub const fn new(key: &'static str, default: fn() -> T, parse: fn(&str) -> Option<T>) -> Self {
        Self {
            key,
            default,
            parse,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }

    /// Reads the option, falling back to the default when the provider has
    /// no value or the value does not parse.
    pub fn resolve(&self, provider: &dyn OptionProvider, path: Option<&Path>) -> T {
        provider
            .get(path, self.key)
            .and_then(|raw| (self.parse)(raw.trim()))
            .unwrap_or_else(|| self.default_value())
    }
}

pub const DEFAULT_MAX_LINE_LENGTH: usize = 180;

/// Maximum line length in characters, line break excluded.
pub const MAX_LINE_LENGTH: AnalyzerOption<usize> =
    AnalyzerOption::new("max_line_length", default_max_line_length, parse_length);

/// Comma-separated names of methods to treat as extension methods.
pub const EXTENSION_METHODS: AnalyzerOption<Vec<String>> =
    AnalyzerOption::new("extension_methods", Vec::new, parse_name_list);

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn parse_length(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|&n| n > 0)
}

fn parse_name_list(raw: &str) -> Option<Vec<String>> {
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Options for one analysis invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub max_line_length: usize,
    pub extension_methods: Vec<String>,
}

impl AnalyzerOptions {
    /// Resolves every option for the file at `path`.
    pub fn resolve(provider: &dyn OptionProvider, path: Option<&Path>) -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH.resolve(provider, path),
            extension_methods: EXTENSION_METHODS.resolve(provider, path),
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Containers of the configured extension methods named `name`.
    ///
    /// Entries are either `Method` (yields `None`) or `Container.Method`.
    pub fn configured_extensions<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.extension_methods.iter().filter_map(move |entry| {
            match entry.rsplit_once('.') {
                Some((container, method)) => (method == name).then_some(Some(container)),
                None => (entry == name).then_some(None),
            }
        })
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::resolve(&NoOptions, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn provider(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let options = AnalyzerOptions::default();
        assert_eq!(options.max_line_length, 180);
        assert!(options.extension_methods.is_empty());
    }

    #[rstest]
    #[case::valid("120", 120)]
    #[case::padded(" 80 ", 80)]
    #[case::not_a_number("wide", 180)]
    #[case::negative("-4", 180)]
    #[case::zero("0", 180)]
    fn test_max_line_length(#[case] raw: &str, #[case] expected: usize) {
        let values = provider(&[("max_line_length", raw)]);
        let options = AnalyzerOptions::resolve(&values, None);
        assert_eq!(options.max_line_length, expected);
    }

    #[test]
    fn test_extension_methods_list() {
        let values = provider(&[("extension_methods", "Should, ShouldBe,,Apply ")]);
        let options = AnalyzerOptions::resolve(&values, None);
        assert_eq!(options.extension_methods, vec!["Should", "ShouldBe", "Apply"]);
        assert_eq!(options.configured_extensions("ShouldBe").collect::<Vec<_>>(), vec![None]);
        assert_eq!(options.configured_extensions("Other").count(), 0);
    }

    #[test]
    fn test_qualified_extension_methods() {
        let values = provider(&[("extension_methods", "Asserts.Should, Should")]);
        let options = AnalyzerOptions::resolve(&values, None);
        assert_eq!(
            options.configured_extensions("Should").collect::<Vec<_>>(),
            vec![Some("Asserts"), None]
        );
    }
}
