// crates/dockhand-migrator/src/steps/stacks.rs
// ============================================================================
// Module: Stack Steps
// Description: Upgrades for stack records and the controls guarding them.
// Purpose: Default stack fields and scope stack resource controls.
// Dependencies: dockhand-core, crate::{error, step, steps}
// ============================================================================

//! ## Overview
//! Stacks gained a kind, then a status, and their resource controls moved
//! from bare stack names to endpoint-scoped identifiers once the same stack
//! name could exist on several endpoints.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::ResourceControlKind;
use dockhand_core::StackKind;
use dockhand_core::StackStatus;

use crate::error::StepError;
use crate::step::StepContext;
use crate::steps::rewrite_each;
use crate::steps::update_settings;

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Version 12.
pub fn default_kind_and_tag_lists(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.stacks()?,
        |stack| {
            if stack.kind == StackKind::Unset {
                stack.kind = StackKind::Swarm;
            }
        },
        |stack| store.update_stack(stack),
    )?;
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            endpoint.tags.get_or_insert_with(Vec::new);
        },
        |endpoint| store.update_endpoint(endpoint),
    )?;
    rewrite_each(
        store.endpoint_groups()?,
        |group| {
            group.tags.get_or_insert_with(Vec::new);
        },
        |group| store.update_endpoint_group(group),
    )
}

/// Version 25.
pub fn edge_compute_and_stack_status(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.enable_edge_compute_features.get_or_insert(false);
    })?;
    let store = context.store();
    rewrite_each(
        store.stacks()?,
        |stack| {
            if stack.status == StackStatus::Unset {
                stack.status = StackStatus::Active;
            }
        },
        |stack| store.update_stack(stack),
    )
}

/// Version 27: stack controls keyed by bare name are rescoped to
/// `<endpoint>_<name>`.
///
/// Each stack claims at most one control, so two stacks sharing a name on
/// different endpoints claim distinct controls. A stack whose scoped control
/// already exists claims nothing, which keeps a rerun after a partial write
/// from handing another endpoint's control to it.
pub fn scope_stack_resource_controls(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    let stacks = store.stacks()?;
    let mut controls = store.resource_controls()?;
    let mut changed = vec![false; controls.len()];
    for stack in &stacks {
        let scoped = stack.resource_control_id();
        if controls.iter().any(|control| {
            control.kind == ResourceControlKind::Stack && control.resource_id == scoped
        }) {
            continue;
        }
        let claim = controls.iter().zip(changed.iter()).position(|(control, done)| {
            !done && control.kind == ResourceControlKind::Stack && control.resource_id == stack.name
        });
        if let Some(index) = claim
            && let (Some(control), Some(flag)) = (controls.get_mut(index), changed.get_mut(index))
        {
            control.resource_id = stack.resource_control_id();
            *flag = true;
        }
    }
    for (control, touched) in controls.iter().zip(changed) {
        if touched {
            store.update_resource_control(control)?;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit unwraps for clarity."
    )]

    use dockhand_core::EndpointId;
    use dockhand_core::InMemoryRecordStore;
    use dockhand_core::ResourceControl;
    use dockhand_core::ResourceControlId;
    use dockhand_core::ResourceControlService;
    use dockhand_core::Stack;
    use dockhand_core::StackId;
    use dockhand_core::StackService;

    use super::*;
    use crate::bootstrap::BootstrapConfig;

    fn run(
        store: &InMemoryRecordStore,
        step: fn(&StepContext<'_>) -> Result<(), StepError>,
    ) {
        let bootstrap = BootstrapConfig::default();
        step(&StepContext::new(store, &bootstrap)).unwrap();
    }

    fn stack(id: u32, endpoint: u32, name: &str) -> Stack {
        Stack {
            id: StackId::new(id),
            name: name.to_string(),
            endpoint_id: EndpointId::new(endpoint),
            ..Stack::default()
        }
    }

    fn stack_control(id: u32, resource_id: &str) -> ResourceControl {
        ResourceControl {
            id: ResourceControlId::new(id),
            resource_id: resource_id.to_string(),
            kind: ResourceControlKind::Stack,
            ..ResourceControl::default()
        }
    }

    #[test]
    fn stack_kind_and_status_are_defaulted() {
        let store = InMemoryRecordStore::new();
        store.update_stack(&stack(1, 1, "web")).unwrap();
        run(&store, default_kind_and_tag_lists);
        run(&store, edge_compute_and_stack_status);

        let stored = store.stacks().unwrap().remove(0);
        assert_eq!(stored.kind, StackKind::Swarm);
        assert_eq!(stored.status, StackStatus::Active);
    }

    #[test]
    fn stack_controls_are_scoped_by_endpoint() {
        let store = InMemoryRecordStore::new();
        store.update_stack(&stack(1, 1, "web")).unwrap();
        store.update_stack(&stack(2, 3, "web")).unwrap();
        store.update_resource_control(&stack_control(1, "web")).unwrap();
        store.update_resource_control(&stack_control(2, "web")).unwrap();
        store.update_resource_control(&stack_control(3, "2_other")).unwrap();
        run(&store, scope_stack_resource_controls);

        let ids: Vec<String> = store
            .resource_controls()
            .unwrap()
            .into_iter()
            .map(|control| control.resource_id)
            .collect();
        assert_eq!(ids, vec!["1_web".to_string(), "3_web".to_string(), "2_other".to_string()]);
    }

    #[test]
    fn stack_with_scoped_control_claims_nothing() {
        let store = InMemoryRecordStore::new();
        store.update_stack(&stack(1, 1, "web")).unwrap();
        store.update_stack(&stack(2, 3, "web")).unwrap();
        store.update_resource_control(&stack_control(1, "1_web")).unwrap();
        store.update_resource_control(&stack_control(2, "web")).unwrap();
        run(&store, scope_stack_resource_controls);

        let ids: Vec<String> = store
            .resource_controls()
            .unwrap()
            .into_iter()
            .map(|control| control.resource_id)
            .collect();
        assert_eq!(ids, vec!["1_web".to_string(), "3_web".to_string()]);
    }

    #[test]
    fn scoping_is_idempotent() {
        let store = InMemoryRecordStore::new();
        store.update_stack(&stack(1, 1, "web")).unwrap();
        store.update_resource_control(&stack_control(1, "web")).unwrap();
        run(&store, scope_stack_resource_controls);
        store.reset_write_counts().unwrap();
        run(&store, scope_stack_resource_controls);
        assert_eq!(store.write_count().unwrap(), 0);
    }
}
