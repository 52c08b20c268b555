use crate::constants::NO_MAPPING_EXPLANATION;
use crate::error::{AuditError, Result};
use crate::types::RuleEntry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Read-only table from engine issue identifiers to RGAA criteria.
///
/// Loaded once at startup and shared behind an `Arc`; clones are cheap handles
/// onto the same table.
#[derive(Debug, Clone, Default)]
pub struct RuleMapper {
    table: Arc<HashMap<String, RuleEntry>>,
}

impl RuleMapper {
    pub fn new(table: HashMap<String, RuleEntry>) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let table: HashMap<String, RuleEntry> = serde_json::from_str(content)
            .map_err(|e| AuditError::Mapping(format!("malformed rule mapping: {}", e)))?;
        Ok(Self::new(table))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Mapping(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let mapper = Self::from_json_str(&content)?;
        info!(entries = mapper.len(), path = %path.display(), "Loaded RGAA rule mapping");
        Ok(mapper)
    }

    /// Clause references for `issue_id`; unknown identifiers get an empty list
    /// and the "no mapping" explanation.
    pub fn lookup(&self, issue_id: &str) -> RuleEntry {
        match self.table.get(issue_id) {
            Some(entry) => entry.clone(),
            None => RuleEntry {
                clause_references: Vec::new(),
                explanation: NO_MAPPING_EXPLANATION.to_string(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
