//! Administrative subnet dump.

use std::fmt::Write as _;

use serde::Serialize;

use mesh_routing::SubnetTable;

use crate::error::NodeError;

/// One line of the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    pub subnet: String,
    pub owner: String,
}

/// Every route in global order.
pub fn dump_entries(table: &SubnetTable) -> Vec<DumpEntry> {
    table
        .routes()
        .map(|route| DumpEntry {
            subnet: route.subnet().to_string(),
            owner: route.owner().to_string(),
        })
        .collect()
}

/// Render the dump as ` <subnet> owner <name>` lines.
pub fn dump_subnets(table: &SubnetTable) -> String {
    let mut out = String::new();
    for route in table.routes() {
        let _ = writeln!(out, " {} owner {}", route.subnet(), route.owner());
    }
    out
}

/// Render the dump as a JSON array.
pub fn dump_json(table: &SubnetTable) -> Result<String, NodeError> {
    Ok(serde_json::to_string_pretty(&dump_entries(table))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_core::NodeName;

    fn table() -> SubnetTable {
        let mut table = SubnetTable::new();
        table.add_spec(NodeName::from("b"), "10.0.0.0/8").unwrap();
        table.add_spec(NodeName::from("a"), "10.1.0.0/16#5").unwrap();
        table.add_spec(NodeName::from("c"), "2:0:0:0:0:1").unwrap();
        table
    }

    #[test]
    fn test_dump_text_order() {
        let text = dump_subnets(&table());
        assert_eq!(
            text,
            " 2:0:0:0:0:1#10 owner c\n 10.1.0.0/16#5 owner a\n 10.0.0.0/8#10 owner b\n"
        );
    }

    #[test]
    fn test_dump_empty() {
        assert_eq!(dump_subnets(&SubnetTable::new()), "");
        assert!(dump_entries(&SubnetTable::new()).is_empty());
    }

    #[test]
    fn test_dump_json() {
        let json = dump_json(&table()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["subnet"], "2:0:0:0:0:1#10");
        assert_eq!(parsed[0]["owner"], "c");
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }
}
