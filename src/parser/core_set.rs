//! CPU core list parsing and canonicalization.
//!
//! Core lists come in two textual forms:
//! - expanded: `"0,1,2,5"`
//! - compressed: `"0-2,5"`
//!
//! Both parse into the same sorted, de-duplicated `CoreSet`.

use crate::utils::config::MAX_CORE_INDEX;
use crate::utils::error::CoreSetError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const SEPARATOR: char = ',';
const RANGE: char = '-';

/// Runs shorter than this are written out value by value
const MIN_RUN: usize = 3;

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(r"^,*\d+(-\d+)?(,+\d+(-\d+)?)*,*$").expect("core list grammar is valid")
    })
}

/// An ordered set of CPU indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CoreSet {
    cores: Vec<u32>,
}

impl CoreSet {
    /// Parse a core list string
    ///
    /// Whitespace is ignored, empty tokens are skipped and reversed
    /// ranges (`5-3`) are accepted as `3-5`.
    ///
    /// # Errors
    /// * `CoreSetError::InvalidCoreSet` - input does not follow the grammar,
    ///   or names a core above `MAX_CORE_INDEX`
    pub fn parse(input: &str) -> Result<Self, CoreSetError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

        if !grammar().is_match(&compact) {
            return Err(CoreSetError::InvalidCoreSet(input.to_string()));
        }

        let mut cores = Vec::new();
        for token in compact.split(SEPARATOR).filter(|t| !t.is_empty()) {
            match token.split_once(RANGE) {
                Some((start, end)) => {
                    let start = parse_index(start, input)?;
                    let end = parse_index(end, input)?;
                    let (low, high) = if end < start { (end, start) } else { (start, end) };
                    cores.extend(low..=high);
                }
                None => cores.push(parse_index(token, input)?),
            }
        }

        Ok(Self::from_cores(cores))
    }

    /// Build a set from already-decoded indices
    pub fn from_cores(cores: impl IntoIterator<Item = u32>) -> Self {
        let mut cores: Vec<u32> = cores.into_iter().collect();
        cores.sort_unstable();
        cores.dedup();
        Self { cores }
    }

    /// Run-length compressed form, e.g. `"0-2,5"`
    pub fn compress(&self) -> String {
        let mut groups: Vec<String> = Vec::new();
        let mut run: Vec<u32> = Vec::new();

        for &core in &self.cores {
            if let Some(&last) = run.last() {
                if core != last + 1 {
                    groups.push(format_run(&run));
                    run.clear();
                }
            }
            run.push(core);
        }
        if !run.is_empty() {
            groups.push(format_run(&run));
        }

        groups.join(",")
    }

    /// Expanded form, e.g. `"0,1,2,5"`
    pub fn expanded(&self) -> String {
        self.cores
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn contains(&self, core: u32) -> bool {
        self.cores.binary_search(&core).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.cores.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cores
    }

    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}

fn parse_index(token: &str, input: &str) -> Result<u32, CoreSetError> {
    // Digits already validated; this only fails on overflow or the bound
    token
        .parse::<u32>()
        .ok()
        .filter(|&index| index <= MAX_CORE_INDEX)
        .ok_or_else(|| CoreSetError::InvalidCoreSet(input.to_string()))
}

fn format_run(run: &[u32]) -> String {
    match run {
        [first, .., last] if run.len() >= MIN_RUN => format!("{}-{}", first, last),
        _ => run
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

impl FromStr for CoreSet {
    type Err = CoreSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<u32> for CoreSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_cores(iter)
    }
}

impl<'a> IntoIterator for &'a CoreSet {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.cores.iter()
    }
}

impl fmt::Display for CoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expanded() {
        let set = CoreSet::parse("0,1,2,5").unwrap();
        assert_eq!(set.as_slice(), &[0, 1, 2, 5]);
    }

    #[test]
    fn test_compress_runs() {
        let set = CoreSet::from_cores([0, 1, 2, 5]);
        assert_eq!(set.compress(), "0-2,5");
    }

    #[test]
    fn test_short_runs_stay_expanded() {
        let set = CoreSet::from_cores([0, 1, 4, 5, 6, 9, 10]);
        assert_eq!(set.compress(), "0,1,4-6,9,10");
    }

    #[test]
    fn test_reversed_range() {
        let set = CoreSet::parse("5-3").unwrap();
        assert_eq!(set.as_slice(), &[3, 4, 5]);
    }

    #[test]
    fn test_empty_tokens_and_whitespace() {
        assert_eq!(CoreSet::parse("1,,2").unwrap().as_slice(), &[1, 2]);
        assert_eq!(CoreSet::parse(" 1 , 2 - 3, ").unwrap().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(
            CoreSet::parse("abc"),
            Err(CoreSetError::InvalidCoreSet("abc".to_string()))
        );
        assert!(CoreSet::parse("").is_err());
        assert!(CoreSet::parse("1-").is_err());
        assert!(CoreSet::parse("1-2-3").is_err());
        assert!(CoreSet::parse("1a").is_err());
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert!(CoreSet::parse("99999999999").is_err());
    }

    #[test]
    fn test_indices_above_bound_are_invalid() {
        assert_eq!(
            CoreSet::parse("0-4294967295"),
            Err(CoreSetError::InvalidCoreSet("0-4294967295".to_string()))
        );
        assert!(CoreSet::parse("3,65536").is_err());
        assert_eq!(CoreSet::parse("65534-65535").unwrap().len(), 2);
    }

    #[test]
    fn test_membership_and_display() {
        let set: CoreSet = "8-11,3".parse().unwrap();
        assert!(set.contains(9));
        assert!(!set.contains(4));
        assert_eq!(set.to_string(), "3,8-11");
        assert_eq!(set.expanded(), "3,8,9,10,11");
    }

    #[test]
    fn test_empty_sequence() {
        let set = CoreSet::from_cores(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.compress(), "");
    }
}
