//! Phone number associations.
//!
//! Maintains the multi-valued organization-to-phone-number association and
//! answers pattern lookups over it.

use crate::types::OrganizationId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type PhoneList = SmallVec<[String; 4]>;

/// Multi-valued phone association index.
///
/// Numbers are kept in insertion order per organization; order carries no
/// meaning. Adding an existing pair and removing a missing pair are both
/// no-ops, so the association behaves as a set of (organization, number)
/// pairs.
#[derive(Debug, Default)]
pub struct PhoneIndex {
    numbers: FxHashMap<OrganizationId, PhoneList>,
    /// Total number of (organization, number) pairs.
    links: usize,
}

impl PhoneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// All numbers associated with an organization.
    pub fn phones_of(&self, org: OrganizationId) -> Vec<String> {
        self.numbers
            .get(&org)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Replace the full association for an organization.
    ///
    /// Delete-all-then-insert-all semantics; duplicates in the input
    /// collapse to a single pair.
    pub fn replace(&mut self, org: OrganizationId, numbers: &[String]) {
        self.purge(org);

        let mut list = PhoneList::new();
        for number in numbers {
            if !list.iter().any(|existing| existing == number) {
                list.push(number.clone());
            }
        }

        if !list.is_empty() {
            self.links += list.len();
            self.numbers.insert(org, list);
        }
    }

    /// Associate one number with an organization. No-op if already present.
    pub fn add(&mut self, org: OrganizationId, number: &str) {
        let list = self.numbers.entry(org).or_default();
        if !list.iter().any(|existing| existing == number) {
            list.push(number.to_string());
            self.links += 1;
        }
    }

    /// Remove one association. No-op if the pair does not exist.
    pub fn remove(&mut self, org: OrganizationId, number: &str) {
        if let Some(list) = self.numbers.get_mut(&org) {
            if let Some(pos) = list.iter().position(|existing| existing == number) {
                list.remove(pos);
                self.links -= 1;
            }
            if list.is_empty() {
                self.numbers.remove(&org);
            }
        }
    }

    /// Drop every association for an organization.
    pub fn purge(&mut self, org: OrganizationId) {
        if let Some(list) = self.numbers.remove(&org) {
            self.links -= list.len();
        }
    }

    /// Organizations with at least one number containing `pattern`
    /// case-insensitively, in ascending id order.
    pub fn matching(&self, pattern: &str) -> Vec<OrganizationId> {
        let needle = pattern.to_lowercase();
        let mut ids: Vec<OrganizationId> = self
            .numbers
            .iter()
            .filter(|(_, list)| {
                list.iter()
                    .any(|number| number.to_lowercase().contains(&needle))
            })
            .map(|(org, _)| *org)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of (organization, number) pairs.
    pub fn link_count(&self) -> usize {
        self.links
    }
}
