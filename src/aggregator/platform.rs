//! Top-down breakdown presets per CPU generation.
//!
//! Metric names differ slightly between EDP releases, so each platform
//! carries its own prefix and label maps.

use super::topdown::{MetricHierarchy, Selector};
use crate::reader::MetricTable;
use crate::utils::error::HierarchyError;
use std::fmt;
use std::str::FromStr;

/// Named breakdown groups every platform provides
pub const GROUPS: &[&str] = &["summary", "backend", "memory", "ports"];

/// CPU generation whose EDP naming a preset follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Skylake-SP / Cascade Lake (EDP 3.9)
    Skx,
    /// Ice Lake-SP (EDP 3.94)
    Icx,
}

impl Platform {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Skx => "metric_TMAM",
            Self::Icx => "metric_TMA",
        }
    }

    pub fn edp_version(&self) -> &'static str {
        match self {
            Self::Skx => "edp3.9skx_clx",
            Self::Icx => "edp3.94icx",
        }
    }

    /// Label map for one group
    pub fn selector(&self, group: &str) -> Option<Selector> {
        let pairs: &[(&str, &str)] = match (self, group) {
            (Self::Skx, "summary") => &[
                ("metric_TMAM_Frontend_Bound(%)", "Frontend Bound"),
                ("metric_TMAM_Backend_bound(%)", "Backend Bound"),
                ("metric_TMAM_Bad_Speculation(%)", "Bad Speculation"),
                ("metric_TMAM_Retiring(%)", "Retiring"),
            ],
            (Self::Skx, "backend") => &[
                ("metric_TMAM_..Memory_Bound(%)", "Memory Bound"),
                ("metric_TMAM_..Core_Bound(%)", "Core Bound"),
            ],
            (Self::Skx, "memory") => &[
                ("metric_TMAM_....L1_Bound(%)", "L1 Bound"),
                ("metric_TMAM_....L2_Bound(%)", "L2 Bound"),
                ("metric_TMAM_....L3_Bound(%)", "L3 Bound"),
                ("metric_TMAM_....MEM_Bound(%)", "DRAM Bound"),
            ],
            (Self::Skx, "ports") => &[
                ("metric_TMAM_....Ports_Utilization(%)", "All"),
                ("metric_TMAM_....Divider(%)", "Divider"),
                ("metric_TMAM_......0_Ports_Utilized(%)", "Port 0"),
                ("metric_TMAM_......1_Port_Utilized(%)", "Port 1"),
                ("metric_TMAM_......2_Ports_Utilized(%)", "Port 2"),
                ("metric_TMAM_......3m_Ports_Utilized(%)", "Port 3m"),
            ],
            (Self::Icx, "summary") => &[
                ("metric_TMA_Frontend_Bound(%)", "Frontend Bound"),
                ("metric_TMA_Backend_bound(%)", "Backend Bound"),
                ("metric_TMA_Bad_Speculation(%)", "Bad Speculation"),
                ("metric_TMA_Retiring(%)", "Retiring"),
            ],
            (Self::Icx, "backend") => &[
                ("metric_TMA..Memory_Bound(%)", "Memory Bound"),
                ("metric_TMA..Core_Bound(%)", "Core Bound"),
            ],
            (Self::Icx, "memory") => &[
                ("metric_TMA....L1_Bound(%)", "L1 Bound"),
                ("metric_TMA_....L2_Bound(%)", "L2 Bound"),
                ("metric_TMA_....L3_Bound(%)", "L3 Bound"),
                ("metric_TMA....DRAM_Bound(%)", "DRAM Bound"),
            ],
            (Self::Icx, "ports") => &[
                ("metric_TMA....Ports_Utilization(%)", "All"),
                ("metric_TMA....Divider(%)", "Divider"),
                ("metric_TMA......0_Ports_Utilization(%)", "Port 0"),
                ("metric_TMA......1_Port_Utilized(%)", "Port 1"),
                ("metric_TMA......2_Ports_Utilized(%)", "Port 2"),
                ("metric_TMA......3m_Ports_Utilized(%)", "Port 3m"),
            ],
            _ => return None,
        };
        Some(Selector::rename(pairs.iter().copied()))
    }

    /// Build the hierarchy for this platform's prefix
    pub fn hierarchy(&self, table: &MetricTable) -> MetricHierarchy {
        MetricHierarchy::build(table, self.prefix())
    }

    /// Apply one group's label map; `Ok(None)` for an unknown group
    pub fn breakdown(
        &self,
        hierarchy: &MetricHierarchy,
        group: &str,
    ) -> Result<Option<MetricTable>, HierarchyError> {
        match self.selector(group) {
            Some(selector) => hierarchy.filter(&selector).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skx => f.write_str("SKX"),
            Self::Icx => f.write_str("ICX"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SKX" | "CLX" => Ok(Self::Skx),
            "ICX" => Ok(Self::Icx),
            other => Err(format!("unknown platform '{}', expected SKX or ICX", other)),
        }
    }
}
