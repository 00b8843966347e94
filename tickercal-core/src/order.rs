//! Persisted company display order.
//!
//! The order is a list of company ids keyed by user identity. A local
//! file is always written first and stays authoritative for the session;
//! when a provider is configured the same order is written through to it,
//! and a failed remote write is logged and otherwise ignored.

use std::path::PathBuf;

use crate::company::Company;
use crate::error::TickerCalResult;
use crate::source::protocol::{GetCompanyOrder, SaveCompanyOrder};
use crate::source::provider::Provider;

const ORDER_FILE_SUFFIX: &str = "company_order";

/// File-backed order store; the directory comes from the global config.
pub struct LocalOrderStore {
    dir: PathBuf,
}

impl LocalOrderStore {
    pub fn at(dir: PathBuf) -> Self {
        LocalOrderStore { dir }
    }

    fn path_for(&self, user: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", user, ORDER_FILE_SUFFIX))
    }

    /// Read the saved order for a user. None when nothing has been saved.
    pub fn load(&self, user: &str) -> Option<Vec<String>> {
        let content = std::fs::read_to_string(self.path_for(user)).ok()?;
        let ids: Vec<String> = content
            .lines()
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        if ids.is_empty() {
            None
        } else {
            Some(ids)
        }
    }

    pub fn save(&self, user: &str, order: &[String]) -> TickerCalResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(user);
        let temp = self.dir.join(format!("{}.{}.tmp", user, ORDER_FILE_SUFFIX));

        std::fs::write(&temp, order.join("\n"))?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// Order persistence for one user: local file plus optional remote
/// write-through.
pub struct CompanyOrder {
    user: String,
    local: LocalOrderStore,
    remote: Option<Provider>,
}

impl CompanyOrder {
    pub fn new(user: &str, local: LocalOrderStore, remote: Option<Provider>) -> Self {
        CompanyOrder {
            user: user.to_string(),
            local,
            remote,
        }
    }

    /// The saved order, preferring the local copy, then the remote one.
    pub async fn load(&self) -> Option<Vec<String>> {
        if let Some(order) = self.local.load(&self.user) {
            return Some(order);
        }

        let provider = self.remote.as_ref()?;
        match provider
            .call(GetCompanyOrder {
                user: self.user.clone(),
            })
            .await
        {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read company order from provider");
                None
            }
        }
    }

    /// Save locally, then write through to the provider. A remote
    /// failure is non-fatal; the local copy stays authoritative.
    pub async fn save(&self, order: &[String]) -> TickerCalResult<()> {
        self.local.save(&self.user, order)?;

        if let Some(provider) = &self.remote {
            if let Err(e) = provider
                .call(SaveCompanyOrder {
                    user: self.user.clone(),
                    order: order.to_vec(),
                })
                .await
            {
                tracing::warn!(error = %e, "Could not save company order remotely");
            }
        }

        Ok(())
    }
}

/// Apply a saved order to the fetched company list.
///
/// Saved ids come first in saved order; companies missing from the saved
/// order keep their subscription order after them; stale saved ids are
/// dropped.
pub fn apply_order(companies: Vec<Company>, order: Option<&[String]>) -> Vec<Company> {
    let Some(order) = order else {
        return companies;
    };

    let mut remaining = companies;
    let mut ordered = Vec::with_capacity(remaining.len());

    for id in order {
        if let Some(pos) = remaining.iter().position(|c| &c.id == id) {
            ordered.push(remaining.remove(pos));
        }
    }

    ordered.extend(remaining);
    ordered
}

/// Move a company to `position` within an id order, clamping to the end.
pub fn move_company(order: &mut Vec<String>, id: &str, position: usize) {
    if let Some(current) = order.iter().position(|x| x == id) {
        let entry = order.remove(current);
        let position = position.min(order.len());
        order.insert(position, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_company(id: &str) -> Company {
        Company {
            id: id.to_string(),
            ticker: id.to_uppercase(),
            name: format!("{} Inc", id),
            sector: None,
            subsector: None,
        }
    }

    fn ids(companies: &[Company]) -> Vec<&str> {
        companies.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOrderStore::at(dir.path().to_path_buf());

        assert_eq!(store.load("alice"), None);

        let order = vec!["c2".to_string(), "c1".to_string()];
        store.save("alice", &order).unwrap();
        assert_eq!(store.load("alice"), Some(order));

        // Separate users do not share an order
        assert_eq!(store.load("bob"), None);
    }

    #[test]
    fn test_save_overwrites_previous_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOrderStore::at(dir.path().to_path_buf());

        store.save("alice", &["a".to_string(), "b".to_string()]).unwrap();
        store.save("alice", &["b".to_string()]).unwrap();
        assert_eq!(store.load("alice"), Some(vec!["b".to_string()]));
    }

    #[test]
    fn test_apply_order_handles_stale_and_missing_ids() {
        let companies = vec![make_company("c1"), make_company("c2"), make_company("c3")];
        let saved = vec!["c3".to_string(), "gone".to_string(), "c1".to_string()];

        let ordered = apply_order(companies, Some(&saved));
        assert_eq!(
            ids(&ordered),
            ["c3", "c1", "c2"],
            "Saved order first, unsaved companies keep subscription order, stale ids dropped"
        );
    }

    #[test]
    fn test_apply_order_without_saved_order_is_identity() {
        let companies = vec![make_company("c1"), make_company("c2")];
        let ordered = apply_order(companies.clone(), None);
        assert_eq!(ids(&ordered), ids(&companies));
    }

    #[test]
    fn test_move_company_clamps_position() {
        let mut order = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        move_company(&mut order, "a", 99);
        assert_eq!(order, ["b", "c", "a"]);

        move_company(&mut order, "a", 0);
        assert_eq!(order, ["a", "b", "c"]);

        move_company(&mut order, "unknown", 1);
        assert_eq!(order, ["a", "b", "c"], "Unknown ids leave the order unchanged");
    }
}
