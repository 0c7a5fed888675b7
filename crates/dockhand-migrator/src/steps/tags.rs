// crates/dockhand-migrator/src/steps/tags.rs
// ============================================================================
// Module: Tag Steps
// Description: Conversion of free-form tag names into first-class tag records.
// Purpose: Retire legacy tag name lists on endpoints and endpoint groups.
// Dependencies: dockhand-core, crate::{error, step}
// ============================================================================

//! ## Overview
//! Endpoints and endpoint groups used to carry tag names inline. Version 23
//! resolves each name to a tag record, creating the record on first use,
//! records membership on both sides, and clears the legacy name list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointId;
use dockhand_core::RecordStore;
use dockhand_core::Tag;
use dockhand_core::TagId;

use crate::error::StepError;
use crate::step::StepContext;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tags resolved by name during the step.
struct TagCatalog<'a> {
    /// Store used to create missing tags.
    store: &'a dyn RecordStore,
    /// Tags by name.
    by_name: BTreeMap<String, Tag>,
    /// Names of tags whose membership changed.
    dirty: BTreeSet<String>,
}

impl<'a> TagCatalog<'a> {
    /// Loads every existing tag.
    fn load(store: &'a dyn RecordStore) -> Result<Self, StepError> {
        let by_name = store.tags()?.into_iter().map(|tag| (tag.name.clone(), tag)).collect();
        Ok(Self {
            store,
            by_name,
            dirty: BTreeSet::new(),
        })
    }

    /// Returns the tag named `name`, creating it when unknown.
    fn resolve(&mut self, name: &str) -> Result<&mut Tag, StepError> {
        if !self.by_name.contains_key(name) {
            let created = self.store.create_tag(name)?;
            self.by_name.insert(name.to_string(), created);
        }
        self.by_name
            .get_mut(name)
            .ok_or_else(|| StepError::Precondition(format!("tag '{name}' vanished after creation")))
    }

    /// Records `endpoint` as carrying the tag named `name`.
    fn tag_endpoint(&mut self, name: &str, endpoint: EndpointId) -> Result<TagId, StepError> {
        let tag = self.resolve(name)?;
        let id = tag.id;
        if tag.endpoints.insert(endpoint, true) != Some(true) {
            self.dirty.insert(name.to_string());
        }
        Ok(id)
    }

    /// Records `group` as carrying the tag named `name`.
    fn tag_group(&mut self, name: &str, group: EndpointGroupId) -> Result<TagId, StepError> {
        let tag = self.resolve(name)?;
        let id = tag.id;
        if tag.endpoint_groups.insert(group, true) != Some(true) {
            self.dirty.insert(name.to_string());
        }
        Ok(id)
    }

    /// Writes back every tag whose membership changed.
    fn flush(self) -> Result<(), StepError> {
        for name in &self.dirty {
            if let Some(tag) = self.by_name.get(name) {
                self.store.update_tag(tag)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Version 23.
///
/// Tag records are written before any endpoint or group drops its legacy
/// names, so an interrupted run never leaves a record pointing at a tag that
/// does not list it. Records still carrying names are resolved again on the
/// next run.
pub fn tag_names_to_identifiers(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    let mut catalog = TagCatalog::load(store)?;

    let mut endpoints = Vec::new();
    for mut endpoint in store.endpoints()? {
        let Some(names) = endpoint.tags.take() else {
            continue;
        };
        for name in normalized_names(names) {
            let id = catalog.tag_endpoint(&name, endpoint.id)?;
            push_unique(&mut endpoint.tag_ids, id);
        }
        endpoints.push(endpoint);
    }

    let mut groups = Vec::new();
    for mut group in store.endpoint_groups()? {
        let Some(names) = group.tags.take() else {
            continue;
        };
        for name in normalized_names(names) {
            let id = catalog.tag_group(&name, group.id)?;
            push_unique(&mut group.tag_ids, id);
        }
        groups.push(group);
    }

    catalog.flush()?;
    for endpoint in &endpoints {
        store.update_endpoint(endpoint)?;
    }
    for group in &groups {
        store.update_endpoint_group(group)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Trims names and drops blanks and duplicates, keeping first occurrence order.
fn normalized_names(names: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

/// Appends `id` unless already present.
fn push_unique(ids: &mut Vec<TagId>, id: TagId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
