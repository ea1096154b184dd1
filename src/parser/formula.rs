//! EDP metric formula catalog.
//!
//! The catalog is an XML document with one record per metric:
//!
//! ```xml
//! <root>
//!   <metric name="metric_CPI">
//!     <event alias="a">CPU_CLK_UNHALTED.THREAD</event>
//!     <event alias="b">INST_RETIRED.ANY</event>
//!     <formula>a/b</formula>
//!   </metric>
//! </root>
//! ```
//!
//! Expansion replaces every alias in the formula with its event or
//! constant text, producing a closed-form expression.

use crate::utils::error::FormulaError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

const FORMULA_TAG: &str = "formula";
const EVENT_TAG: &str = "event";
const CONSTANT_TAG: &str = "constant";
const NAME_ATTR: &str = "name";
const ALIAS_ATTR: &str = "alias";

/// Words that may appear bare in a formula without being aliases
const KEYWORDS: &[&str] = &["if", "else", "and", "or", "not"];

/// What an alias stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    Event,
    Constant,
}

/// Literal substitution for one alias token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDef {
    pub kind: AliasKind,
    pub text: String,
}

/// One named formula from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaEntry {
    pub name: String,
    pub template: String,
    pub aliases: BTreeMap<String, AliasDef>,
}

impl FormulaEntry {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            aliases: BTreeMap::new(),
        }
    }

    /// Declare an alias
    ///
    /// # Errors
    /// * `FormulaError::DuplicateAlias` - token already declared
    pub fn add_alias(
        &mut self,
        token: impl Into<String>,
        kind: AliasKind,
        text: impl Into<String>,
    ) -> Result<(), FormulaError> {
        let token = token.into();
        if self.aliases.contains_key(&token) {
            return Err(FormulaError::DuplicateAlias {
                formula: self.name.clone(),
                alias: token,
            });
        }
        self.aliases.insert(
            token,
            AliasDef {
                kind,
                text: text.into(),
            },
        );
        Ok(())
    }

    pub fn with_alias(
        mut self,
        token: &str,
        kind: AliasKind,
        text: &str,
    ) -> Result<Self, FormulaError> {
        self.add_alias(token, kind, text)?;
        Ok(self)
    }

    /// Expand the template into a closed-form expression
    ///
    /// Pass 1 marks every alias reference as `{{alias}}`; pass 2 swaps
    /// each marker for its literal text in a single left-to-right scan,
    /// so substituted text is never matched again.
    ///
    /// # Errors
    /// * `FormulaError::MissingAlias` - template references an undeclared alias
    pub fn expand(&self) -> Result<String, FormulaError> {
        let delimited = self.delimit_aliases()?;
        Ok(self.substitute(&delimited))
    }

    fn delimit_aliases(&self) -> Result<String, FormulaError> {
        let chars: Vec<char> = self.template.chars().collect();
        let mut out = String::with_capacity(self.template.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            // Explicit reference: {alias}
            if c == '{' {
                let word_end = scan_word(&chars, i + 1);
                if word_end > i + 1 && chars.get(word_end) == Some(&'}') {
                    let token: String = chars[i + 1..word_end].iter().collect();
                    out.push_str(&self.mark(&token)?);
                    i = word_end + 1;
                    continue;
                }
                out.push(c);
                i += 1;
                continue;
            }

            if !is_word_char(c) {
                out.push(c);
                i += 1;
                continue;
            }

            let word_end = scan_word(&chars, i);
            let word: String = chars[i..word_end].iter().collect();
            let is_call = chars[word_end..]
                .iter()
                .find(|c| !c.is_whitespace())
                .is_some_and(|&c| c == '(');

            if c.is_ascii_digit() || is_call || KEYWORDS.contains(&word.as_str()) {
                out.push_str(&word);
            } else {
                out.push_str(&self.mark(&word)?);
            }
            i = word_end;
        }

        Ok(out)
    }

    fn mark(&self, token: &str) -> Result<String, FormulaError> {
        if !self.aliases.contains_key(token) {
            return Err(FormulaError::MissingAlias {
                formula: self.name.clone(),
                alias: token.to_string(),
            });
        }
        Ok(format!("{{{{{}}}}}", token))
    }

    fn substitute(&self, delimited: &str) -> String {
        let mut out = String::with_capacity(delimited.len());
        let mut rest = delimited;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => match self.aliases.get(&after[..end]) {
                    Some(def) => {
                        out.push_str(&def.text);
                        rest = &after[end + 2..];
                    }
                    None => {
                        out.push_str("{{");
                        rest = after;
                    }
                },
                None => {
                    out.push_str("{{");
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_word(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    end
}

/// An ordered collection of formulas read from one catalog document
#[derive(Debug, Clone, Default)]
pub struct FormulaCatalog {
    entries: Vec<FormulaEntry>,
}

impl FormulaCatalog {
    /// Read a catalog from an XML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormulaError> {
        let path = path.as_ref();
        debug!("Reading formula catalog: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a catalog from any XML source
    ///
    /// # Errors
    /// * `FormulaError::Xml` - document is not well-formed
    /// * `FormulaError::MalformedCatalog` - record without name or formula, duplicate name
    /// * `FormulaError::DuplicateAlias` - alias declared twice in one record
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FormulaError> {
        let mut entries: Vec<FormulaEntry> = Vec::new();
        let mut depth = 0usize;
        let mut record: Option<RecordBuilder> = None;
        let mut field: Option<Field> = None;
        let mut text = String::new();

        for event in EventReader::new(reader) {
            match event? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    depth += 1;
                    let attr = |key: &str| {
                        attributes
                            .iter()
                            .find(|a| a.name.local_name == key)
                            .map(|a| a.value.clone())
                    };

                    match depth {
                        2 => {
                            let record_name = attr(NAME_ATTR).ok_or_else(|| {
                                FormulaError::MalformedCatalog(format!(
                                    "<{}> record has no name attribute",
                                    name.local_name
                                ))
                            })?;
                            record = Some(RecordBuilder::new(record_name));
                        }
                        3 => {
                            text.clear();
                            field = match name.local_name.as_str() {
                                FORMULA_TAG => Some(Field::Formula),
                                EVENT_TAG | CONSTANT_TAG => {
                                    let kind = if name.local_name == EVENT_TAG {
                                        AliasKind::Event
                                    } else {
                                        AliasKind::Constant
                                    };
                                    let alias = attr(ALIAS_ATTR).ok_or_else(|| {
                                        FormulaError::MalformedCatalog(format!(
                                            "<{}> without alias attribute",
                                            name.local_name
                                        ))
                                    })?;
                                    Some(Field::Alias(alias, kind))
                                }
                                _ => None,
                            };
                        }
                        _ => {}
                    }
                }
                XmlEvent::Characters(chunk) | XmlEvent::CData(chunk) => {
                    if field.is_some() {
                        text.push_str(&chunk);
                    }
                }
                XmlEvent::EndElement { .. } => {
                    if depth == 3 {
                        if let (Some(builder), Some(done)) = (record.as_mut(), field.take()) {
                            builder.apply(done, text.trim())?;
                        }
                    } else if depth == 2 {
                        if let Some(builder) = record.take() {
                            let entry = builder.finish()?;
                            if entries.iter().any(|e| e.name == entry.name) {
                                return Err(FormulaError::MalformedCatalog(format!(
                                    "duplicate formula name '{}'",
                                    entry.name
                                )));
                            }
                            entries.push(entry);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        debug!("Read {} formulas", entries.len());
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormulaEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FormulaEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand every formula, stopping at the first failure
    pub fn expand_all(&self) -> Result<Vec<(String, String)>, FormulaError> {
        self.entries
            .iter()
            .map(|e| Ok((e.name.clone(), e.expand()?)))
            .collect()
    }
}

impl IntoIterator for FormulaCatalog {
    type Item = FormulaEntry;
    type IntoIter = std::vec::IntoIter<FormulaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

enum Field {
    Formula,
    Alias(String, AliasKind),
}

struct RecordBuilder {
    entry: FormulaEntry,
    has_formula: bool,
}

impl RecordBuilder {
    fn new(name: String) -> Self {
        Self {
            entry: FormulaEntry::new(name, String::new()),
            has_formula: false,
        }
    }

    fn apply(&mut self, field: Field, text: &str) -> Result<(), FormulaError> {
        match field {
            Field::Formula => {
                self.entry.template = text.to_string();
                self.has_formula = true;
                Ok(())
            }
            Field::Alias(token, kind) => self.entry.add_alias(token, kind, text),
        }
    }

    fn finish(self) -> Result<FormulaEntry, FormulaError> {
        if !self.has_formula {
            return Err(FormulaError::MalformedCatalog(format!(
                "record '{}' has no formula",
                self.entry.name
            )));
        }
        Ok(self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(template: &str, aliases: &[(&str, &str)]) -> FormulaEntry {
        let mut e = FormulaEntry::new("metric_test", template);
        for (token, text) in aliases {
            e.add_alias(*token, AliasKind::Event, *text).unwrap();
        }
        e
    }

    #[test]
    fn test_braced_aliases_do_not_cross_contaminate() {
        let e = entry("{X}+{XY}", &[("X", "a"), ("XY", "b")]);
        assert_eq!(e.expand().unwrap(), "a+b");
    }

    #[test]
    fn test_bare_aliases_do_not_cross_contaminate() {
        let e = entry("X+XY", &[("X", "a"), ("XY", "b")]);
        assert_eq!(e.expand().unwrap(), "a+b");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        // b's replacement contains the token "a"
        let e = entry("a/b", &[("a", "INST_RETIRED.ANY"), ("b", "a_cycles")]);
        assert_eq!(e.expand().unwrap(), "INST_RETIRED.ANY/a_cycles");
    }

    #[test]
    fn test_numbers_calls_and_keywords_are_kept() {
        let e = entry(
            "min(a, 1e9) / 1000 if b > 0 else 0",
            &[("a", "X"), ("b", "Y")],
        );
        assert_eq!(e.expand().unwrap(), "min(X, 1e9) / 1000 if Y > 0 else 0");
    }

    #[test]
    fn test_missing_alias() {
        let e = entry("a+c", &[("a", "X")]);
        match e.expand() {
            Err(FormulaError::MissingAlias { alias, .. }) => assert_eq!(alias, "c"),
            other => panic!("expected MissingAlias, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_alias() {
        let mut e = entry("a", &[("a", "X")]);
        assert!(matches!(
            e.add_alias("a", AliasKind::Constant, "Y"),
            Err(FormulaError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn test_builder_aliases() {
        let e = FormulaEntry::new("metric_IPC", "b/a")
            .with_alias("a", AliasKind::Event, "CPU_CLK_UNHALTED.THREAD")
            .and_then(|e| e.with_alias("b", AliasKind::Event, "INST_RETIRED.ANY"))
            .unwrap();
        assert_eq!(e.expand().unwrap(), "INST_RETIRED.ANY/CPU_CLK_UNHALTED.THREAD");
    }
}
