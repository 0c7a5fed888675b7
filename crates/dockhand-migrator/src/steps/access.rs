// crates/dockhand-migrator/src/steps/access.rs
// ============================================================================
// Module: Access Control Steps
// Description: Upgrades for users, roles, access policies, and resource controls.
// Purpose: Move legacy access lists onto the role-based access model.
// Dependencies: dockhand-core, crate::{error, step, steps}
// ============================================================================

//! ## Overview
//! Access control evolved from per-record user and team lists to access
//! policies bound to roles. These steps seed the roles, translate legacy
//! lists into policies, and default the fields each version introduced on
//! users and resource controls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use dockhand_core::AccessLevel;
use dockhand_core::AccessPolicy;
use dockhand_core::RegistryAccessPolicies;
use dockhand_core::Role;
use dockhand_core::RoleId;
use dockhand_core::TeamAccessPolicies;
use dockhand_core::TeamId;
use dockhand_core::UserAccessPolicies;
use dockhand_core::UserId;
use dockhand_core::UserRole;
use dockhand_core::UserTheme;

use crate::error::StepError;
use crate::step::StepContext;
use crate::steps::rewrite_each;
use crate::steps::update_settings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Authorizations granted to every user by default.
pub const DEFAULT_USER_AUTHORIZATIONS: [&str; 8] = [
    "DockerAgentHostInfo",
    "DockerContainerList",
    "DockerImageList",
    "DockerNetworkList",
    "DockerVolumeList",
    "EndpointResourcesAccess",
    "UserAccountUpdate",
    "UserTokenCreate",
];

/// Built-in roles as `(id, name, description)`; priority follows the id.
const BUILTIN_ROLES: [(u32, &str, &str); 4] = [
    (1, "Endpoint administrator", "Full control of all resources in an endpoint"),
    (2, "Helpdesk", "Read-only access of all resources in an endpoint"),
    (3, "Standard user", "Full control of assigned resources in an endpoint"),
    (4, "Read-only user", "Read-only access of assigned resources in an endpoint"),
];

// ============================================================================
// SECTION: Users and Roles
// ============================================================================

/// Version 1: the first account created was the administrator.
pub fn assign_user_roles(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.users()?,
        |user| {
            if user.role == UserRole::Unset {
                user.role = if user.id == UserId::INITIAL_ADMIN {
                    UserRole::Administrator
                } else {
                    UserRole::Standard
                };
            }
        },
        |user| store.update_user(user),
    )
}

/// Version 20.
pub fn default_authorizations(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.users()?,
        |user| {
            user.authorizations.get_or_insert_with(default_user_authorizations);
        },
        |user| store.update_user(user),
    )?;
    update_settings(context, |settings| {
        settings.allow_volume_browser_for_regular_users.get_or_insert(false);
    })
}

/// Version 22: seeds the built-in roles into a store without any.
pub fn seed_builtin_roles(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    if !store.roles()?.is_empty() {
        return Ok(());
    }
    for (id, name, description) in BUILTIN_ROLES {
        store.update_role(&Role {
            id: RoleId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            priority: id,
        })?;
    }
    Ok(())
}

/// Version 28.
pub fn default_user_theme(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.users()?,
        |user| {
            user.theme.get_or_insert_with(UserTheme::default);
        },
        |user| store.update_user(user),
    )
}

// ============================================================================
// SECTION: Access Policies
// ============================================================================

/// Version 18: every legacy authorized user and team gets a role-less policy.
pub fn access_lists_to_policies(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            grant_user_policies(
                &mut endpoint.user_access_policies,
                endpoint.authorized_users.as_deref(),
            );
            grant_team_policies(
                &mut endpoint.team_access_policies,
                endpoint.authorized_teams.as_deref(),
            );
        },
        |endpoint| store.update_endpoint(endpoint),
    )?;
    rewrite_each(
        store.endpoint_groups()?,
        |group| {
            grant_user_policies(&mut group.user_access_policies, group.authorized_users.as_deref());
            grant_team_policies(&mut group.team_access_policies, group.authorized_teams.as_deref());
        },
        |group| store.update_endpoint_group(group),
    )?;
    rewrite_each(
        store.registries()?,
        |registry| {
            grant_user_policies(
                &mut registry.user_access_policies,
                registry.authorized_users.as_deref(),
            );
            grant_team_policies(
                &mut registry.team_access_policies,
                registry.authorized_teams.as_deref(),
            );
        },
        |registry| store.update_registry(registry),
    )
}

/// Version 31: registry policies become per-endpoint policies.
pub fn per_endpoint_registry_accesses(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    let endpoint_ids: Vec<_> = store.endpoints()?.into_iter().map(|endpoint| endpoint.id).collect();
    rewrite_each(
        store.registries()?,
        |registry| {
            if registry.registry_accesses.is_some() {
                return;
            }
            let scoped = RegistryAccessPolicies {
                user_access_policies: registry.user_access_policies.clone(),
                team_access_policies: registry.team_access_policies.clone(),
            };
            let accesses =
                endpoint_ids.iter().map(|endpoint_id| (*endpoint_id, scoped.clone())).collect();
            registry.registry_accesses = Some(accesses);
        },
        |registry| store.update_registry(registry),
    )
}

// ============================================================================
// SECTION: Resource Controls
// ============================================================================

/// Version 14: controls with no owner are visible to administrators only.
pub fn restrict_ownerless_controls(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.resource_controls()?,
        |control| {
            if !control.public && control.user_accesses.is_empty() && control.team_accesses.is_empty()
            {
                control.administrators_only = true;
            }
        },
        |control| store.update_resource_control(control),
    )
}

/// Version 21.
pub fn default_access_levels(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.resource_controls()?,
        |control| {
            for access in &mut control.user_accesses {
                if access.access_level == AccessLevel::Unset {
                    access.access_level = AccessLevel::ReadWrite;
                }
            }
            for access in &mut control.team_accesses {
                if access.access_level == AccessLevel::Unset {
                    access.access_level = AccessLevel::ReadWrite;
                }
            }
        },
        |control| store.update_resource_control(control),
    )
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the default authorization set for a user.
fn default_user_authorizations() -> BTreeMap<String, bool> {
    DEFAULT_USER_AUTHORIZATIONS.iter().map(|name| ((*name).to_string(), true)).collect()
}

/// Adds a role-less policy for each listed user lacking one.
fn grant_user_policies(policies: &mut UserAccessPolicies, users: Option<&[UserId]>) {
    for user_id in users.unwrap_or_default() {
        policies.entry(*user_id).or_insert_with(AccessPolicy::default);
    }
}

/// Adds a role-less policy for each listed team lacking one.
fn grant_team_policies(policies: &mut TeamAccessPolicies, teams: Option<&[TeamId]>) {
    for team_id in teams.unwrap_or_default() {
        policies.entry(*team_id).or_insert_with(AccessPolicy::default);
    }
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

    use dockhand_core::Endpoint;
    use dockhand_core::EndpointId;
    use dockhand_core::EndpointService;
    use dockhand_core::InMemoryRecordStore;
    use dockhand_core::Registry;
    use dockhand_core::RegistryId;
    use dockhand_core::RegistryService;
    use dockhand_core::ResourceControl;
    use dockhand_core::ResourceControlId;
    use dockhand_core::ResourceControlService;
    use dockhand_core::RoleService;
    use dockhand_core::User;
    use dockhand_core::UserResourceAccess;
    use dockhand_core::UserService;

    use super::*;
    use crate::bootstrap::BootstrapConfig;

    fn run(
        store: &InMemoryRecordStore,
        step: fn(&StepContext<'_>) -> Result<(), StepError>,
    ) {
        let bootstrap = BootstrapConfig::default();
        step(&StepContext::new(store, &bootstrap)).unwrap();
    }

    #[test]
    fn first_user_becomes_administrator() {
        let store = InMemoryRecordStore::new();
        for id in [1, 2] {
            store
                .update_user(&User {
                    id: UserId::new(id),
                    ..User::default()
                })
                .unwrap();
        }
        store
            .update_user(&User {
                id: UserId::new(3),
                role: UserRole::Administrator,
                ..User::default()
            })
            .unwrap();
        run(&store, assign_user_roles);

        let roles: Vec<UserRole> = store.users().unwrap().iter().map(|user| user.role).collect();
        assert_eq!(roles, vec![UserRole::Administrator, UserRole::Standard, UserRole::Administrator]);
    }

    #[test]
    fn builtin_roles_are_seeded_only_into_empty_store() {
        let store = InMemoryRecordStore::new();
        run(&store, seed_builtin_roles);
        assert_eq!(store.roles().unwrap().len(), 4);

        store.reset_write_counts().unwrap();
        run(&store, seed_builtin_roles);
        assert_eq!(store.write_count().unwrap(), 0);
    }

    #[test]
    fn authorized_users_become_roleless_policies() {
        let store = InMemoryRecordStore::new();
        store
            .update_endpoint(&Endpoint {
                id: EndpointId::new(1),
                authorized_users: Some(vec![UserId::new(7)]),
                authorized_teams: Some(vec![TeamId::new(2)]),
                ..Endpoint::default()
            })
            .unwrap();
        run(&store, access_lists_to_policies);

        let endpoint = store.endpoints().unwrap().remove(0);
        assert_eq!(endpoint.user_access_policies.get(&UserId::new(7)), Some(&AccessPolicy::default()));
        assert_eq!(endpoint.team_access_policies.get(&TeamId::new(2)), Some(&AccessPolicy::default()));
    }

    #[test]
    fn ownerless_private_controls_become_admin_only() {
        let store = InMemoryRecordStore::new();
        store
            .update_resource_control(&ResourceControl {
                id: ResourceControlId::new(1),
                resource_id: "abc".to_string(),
                ..ResourceControl::default()
            })
            .unwrap();
        store
            .update_resource_control(&ResourceControl {
                id: ResourceControlId::new(2),
                resource_id: "def".to_string(),
                user_accesses: vec![UserResourceAccess {
                    user_id: UserId::new(2),
                    access_level: AccessLevel::Unset,
                }],
                ..ResourceControl::default()
            })
            .unwrap();
        run(&store, restrict_ownerless_controls);
        run(&store, default_access_levels);

        let controls = store.resource_controls().unwrap();
        assert!(controls[0].administrators_only);
        assert!(!controls[1].administrators_only);
        assert_eq!(controls[1].user_accesses[0].access_level, AccessLevel::ReadWrite);
    }

    #[test]
    fn registry_policies_are_copied_to_every_endpoint() {
        let store = InMemoryRecordStore::new();
        for id in [1, 2] {
            store
                .update_endpoint(&Endpoint {
                    id: EndpointId::new(id),
                    ..Endpoint::default()
                })
                .unwrap();
        }
        let mut user_policies = UserAccessPolicies::new();
        user_policies.insert(UserId::new(5), AccessPolicy::default());
        store
            .update_registry(&Registry {
                id: RegistryId::new(1),
                user_access_policies: user_policies.clone(),
                ..Registry::default()
            })
            .unwrap();
        run(&store, per_endpoint_registry_accesses);

        let accesses = store.registries().unwrap()[0].registry_accesses.clone().unwrap();
        assert_eq!(accesses.len(), 2);
        assert_eq!(accesses[&EndpointId::new(2)].user_access_policies, user_policies);
    }
}
