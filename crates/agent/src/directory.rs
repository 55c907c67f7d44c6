//! Read-only customer directory backed by a YAML file

use std::collections::HashMap;
use std::path::Path;

use collections_agent_core::{CustomerDirectory, CustomerRecord};
use serde::Deserialize;

use crate::AgentError;

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    customers: Vec<CustomerRecord>,
}

/// In-memory customer lookup keyed by phone number.
///
/// Phone numbers are compared on their last ten digits, so "+91 98765 43210"
/// and "9876543210" find the same customer.
#[derive(Debug, Clone, Default)]
pub struct StaticCustomerDirectory {
    by_phone: HashMap<String, CustomerRecord>,
}

impl StaticCustomerDirectory {
    pub fn new(customers: Vec<CustomerRecord>) -> Self {
        let by_phone = customers
            .into_iter()
            .map(|record| (phone_key(&record.phone), record))
            .collect();
        Self { by_phone }
    }

    /// Parse a `customers:` list from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AgentError> {
        let file: DirectoryFile = serde_yaml::from_str(yaml)?;
        tracing::debug!(customers = file.customers.len(), "Loaded customer directory");
        Ok(Self::new(file.customers))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, AgentError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| AgentError::Directory(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn len(&self) -> usize {
        self.by_phone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_phone.is_empty()
    }
}

impl CustomerDirectory for StaticCustomerDirectory {
    fn find_by_phone(&self, phone: &str) -> Option<CustomerRecord> {
        self.by_phone.get(&phone_key(phone)).cloned()
    }
}

fn phone_key(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}
