use super::*;
use crate::model::is_visible_to;
use std::collections::HashSet;

async fn catalog() -> AgentCatalog {
    AgentCatalog::new(Database::in_memory().await.unwrap())
}

fn input(name: &str) -> NewAgent {
    NewAgent::new(name, "Be useful.", "General")
}

#[tokio::test]
async fn test_create_forces_privileged_flags_for_non_admin() {
    let catalog = catalog().await;
    let user = User::new("u1", "sales");

    let created = catalog
        .create(
            input("Closer")
                .global()
                .system()
                .with_roles(vec!["sales".to_string()]),
            &user,
        )
        .await
        .unwrap();

    assert_eq!(created.agent.owner_id.as_deref(), Some("u1"));
    assert!(!created.agent.is_global);
    assert!(!created.agent.is_system);
    assert!(created.roles.is_empty());
    assert!(catalog.roles_for(created.agent.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_create_keeps_flags_and_roles() {
    let catalog = catalog().await;
    let admin = User::admin("root", "ops");

    let created = catalog
        .create(
            input("Ops Helper")
                .global()
                .with_roles(vec!["ops".into(), " sales ".into(), "ops".into(), "".into()]),
            &admin,
        )
        .await
        .unwrap();

    assert!(created.agent.is_global);
    assert_eq!(created.roles, vec!["ops".to_string(), "sales".to_string()]);
    assert_eq!(catalog.get(created.agent.id).await.unwrap().name, "Ops Helper");
}

#[tokio::test]
async fn test_create_validation() {
    let catalog = catalog().await;
    let user = User::new("u1", "r");

    let err = catalog.create(input("   "), &user).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = catalog
        .create(NewAgent::new("Named", "", "General"), &user)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = catalog
        .create(input("Long").with_description("x".repeat(501)), &user)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_visibility_matches_predicate() {
    let catalog = catalog().await;
    let admin = User::admin("admin", "ops");
    let viewer = User::new("viewer", "marketing");

    // Every combination of the four predicates, plus a role binding that
    // does not match the viewer.
    for mask in 0u8..16 {
        let owner = if mask & 1 != 0 { &viewer } else { &admin };
        let mut new = input(&format!("agent-{mask}"));
        if mask & 2 != 0 {
            new = new.global();
        }
        if mask & 4 != 0 {
            new = new.public();
        }
        new = new.with_roles(if mask & 8 != 0 {
            vec!["marketing".to_string()]
        } else {
            vec!["finance".to_string()]
        });

        let created = catalog.create(new, owner).await.unwrap();
        if owner.id == viewer.id && mask & 8 != 0 {
            // Non-admins cannot bind roles, bind through an admin patch.
            catalog
                .update(
                    created.agent.id,
                    AgentPatch {
                        assigned_roles: Some(vec!["marketing".to_string()]),
                        ..Default::default()
                    },
                    &admin,
                )
                .await
                .unwrap();
        }
    }

    let visible: HashSet<Uuid> = catalog
        .list_visible(&viewer)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();

    let all = catalog.list_all(&admin).await.unwrap();
    assert_eq!(all.len(), 16);
    for entry in &all {
        let expected = is_visible_to(&entry.agent, &viewer, &entry.roles);
        assert_eq!(
            visible.contains(&entry.agent.id),
            expected,
            "agent {} disagrees with the predicate",
            entry.agent.name
        );
    }
    // Only the admin-owned, private, finance-bound agent is hidden
    assert_eq!(visible.len(), 15);
}

#[tokio::test]
async fn test_list_all_requires_admin() {
    let catalog = catalog().await;
    let err = catalog.list_all(&User::new("u1", "r")).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_ownership_and_admin_fields() {
    let catalog = catalog().await;
    let owner = User::new("owner", "r");
    let stranger = User::new("stranger", "r");
    let admin = User::admin("admin", "r");

    let id = catalog.create(input("Mine"), &owner).await.unwrap().agent.id;

    let err = catalog
        .update(
            id,
            AgentPatch {
                name: Some("Theirs".into()),
                ..Default::default()
            },
            &stranger,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let updated = catalog
        .update(
            id,
            AgentPatch {
                description: Some("Now shared".into()),
                is_public: Some(true),
                is_global: Some(true),
                assigned_roles: Some(vec!["r".into()]),
                ..Default::default()
            },
            &owner,
        )
        .await
        .unwrap();
    assert_eq!(updated.agent.description, "Now shared");
    assert!(updated.agent.is_public);
    assert!(!updated.agent.is_global);
    assert!(updated.roles.is_empty());

    let updated = catalog
        .update(
            id,
            AgentPatch {
                is_global: Some(true),
                assigned_roles: Some(vec!["a".into(), "b".into()]),
                ..Default::default()
            },
            &admin,
        )
        .await
        .unwrap();
    assert!(updated.agent.is_global);
    assert_eq!(updated.roles, vec!["a".to_string(), "b".to_string()]);

    // Full replace, not a diff
    let updated = catalog
        .update(
            id,
            AgentPatch {
                assigned_roles: Some(vec!["c".into()]),
                ..Default::default()
            },
            &admin,
        )
        .await
        .unwrap();
    assert_eq!(updated.roles, vec!["c".to_string()]);
    assert_eq!(catalog.roles_for(id).await.unwrap(), vec!["c".to_string()]);
}

#[tokio::test]
async fn test_delete_ownership() {
    let catalog = catalog().await;
    let owner = User::new("owner", "r");
    let id = catalog.create(input("Temp"), &owner).await.unwrap().agent.id;

    let err = catalog
        .delete(id, &User::new("other", "r"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    catalog.delete(id, &owner).await.unwrap();
    assert!(catalog.find(id).await.unwrap().is_none());
    assert!(matches!(
        catalog.delete(id, &owner).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn test_seed_defaults_is_idempotent() {
    let catalog = catalog().await;

    assert_eq!(catalog.seed_defaults().await.unwrap(), DEFAULT_AGENTS.len());
    assert_eq!(catalog.seed_defaults().await.unwrap(), 0);

    let visible = catalog.list_visible(&User::new("anyone", "guest")).await.unwrap();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].name, "General Assistant");
    assert!(visible.iter().all(|a| a.is_system && a.is_global && a.owner_id.is_none()));
}

#[tokio::test]
async fn test_system_agents_only_managed_by_admin() {
    let catalog = catalog().await;
    catalog.seed_defaults().await.unwrap();
    let brief = catalog
        .list_visible(&User::new("u", "r"))
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.name == "Brief")
        .unwrap();

    let err = catalog
        .delete(brief.id, &User::new("u", "r"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    catalog.delete(brief.id, &User::admin("a", "r")).await.unwrap();
}

#[tokio::test]
async fn test_create_private_skips_form_limits() {
    let catalog = catalog().await;
    let user = User::new("u1", "sales");

    let long = NewAgent::new("Long Bot", "Be useful.", "General")
        .with_description("d".repeat(600));
    let agent = catalog.create_private(long.clone(), &user).await.unwrap();
    assert_eq!(agent.description.len(), 600);
    assert!(catalog.create(long, &user).await.is_err());

    let blank = NewAgent::new("  Blank Bot ", "", "");
    let agent = catalog.create_private(blank, &user).await.unwrap();
    assert_eq!(agent.name, "Blank Bot");
    assert!(agent.instruction.is_empty() && agent.category.is_empty());

    assert_eq!(catalog.list_visible(&user).await.unwrap().len(), 2);
    assert!(catalog.list_visible(&User::new("u2", "sales")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_private_ignores_visibility_requests() {
    let catalog = catalog().await;
    let admin = User::admin("root", "ops");

    let agent = catalog
        .create_private(
            input("Quiet").global().system().with_roles(vec!["ops".to_string()]),
            &admin,
        )
        .await
        .unwrap();
    assert!(!agent.is_global && !agent.is_system && !agent.is_public);
    assert!(catalog.roles_for(agent.id).await.unwrap().is_empty());

    let err = catalog.create_private(input("   "), &admin).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
