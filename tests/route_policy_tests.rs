use market_shell::{
    models::Role,
    routes::policy::{RouteAccess, RoutePolicy, normalize_path},
};

#[test]
fn test_marketplace_policy_table() {
    let policy = RoutePolicy::marketplace();

    assert_eq!(policy.access_for("/"), &RouteAccess::Public);
    assert_eq!(policy.access_for("/marketplace"), &RouteAccess::Public);
    assert_eq!(policy.access_for("/login"), &RouteAccess::Public);
    assert_eq!(policy.access_for("/admin"), &RouteAccess::roles(&[Role::Admin]));
    assert_eq!(
        policy.access_for("/orders"),
        &RouteAccess::roles(&[Role::Admin, Role::Buyer])
    );
    assert_eq!(policy.access_for("/profile"), &RouteAccess::signed_in());
}

#[test]
fn test_prefix_matches_on_segment_boundary() {
    let policy = RoutePolicy::marketplace();

    assert_eq!(
        policy.access_for("/farmer/listings/12"),
        &RouteAccess::roles(&[Role::Farmer])
    );
    // "/farmers-market" is not under "/farmer".
    assert_eq!(policy.access_for("/farmers-market"), &RouteAccess::Public);
}

#[test]
fn test_query_and_fragment_are_ignored() {
    let policy = RoutePolicy::marketplace();

    assert_eq!(
        policy.access_for("/admin?tab=users#top"),
        &RouteAccess::roles(&[Role::Admin])
    );
}

#[test]
fn test_longest_prefix_wins() {
    let policy = RoutePolicy::new(vec![
        ("/admin".to_string(), RouteAccess::roles(&[Role::Admin])),
        ("/admin/help".to_string(), RouteAccess::Public),
    ]);

    assert_eq!(policy.access_for("/admin/help/faq"), &RouteAccess::Public);
    assert_eq!(
        policy.access_for("/admin/users"),
        &RouteAccess::roles(&[Role::Admin])
    );
}

#[test]
fn test_locations_are_normalized_before_matching() {
    let policy = RoutePolicy::marketplace();
    let admin = RouteAccess::roles(&[Role::Admin]);

    for location in [
        "/ADMIN",
        "/Admin",
        "//admin",
        "admin",
        "/admin/",
        "/./admin",
        "/marketplace/../admin",
        "/%61dmin",
    ] {
        assert_eq!(policy.access_for(location), &admin, "location {location}");
    }

    assert_eq!(
        policy.access_for("//Farmer//listings"),
        &RouteAccess::roles(&[Role::Farmer])
    );
    // Climbing above the root stays at the root.
    assert_eq!(policy.access_for("/../../"), &RouteAccess::Public);
}

#[test]
fn test_rule_prefixes_are_normalized_too() {
    let policy = RoutePolicy::new(vec![(
        "/Shop/".to_string(),
        RouteAccess::roles(&[Role::Buyer]),
    )]);

    assert_eq!(policy.access_for("/shop"), &RouteAccess::roles(&[Role::Buyer]));
    assert_eq!(
        policy.access_for("/shop/cart"),
        &RouteAccess::roles(&[Role::Buyer])
    );
    assert_eq!(policy.access_for("/shopping"), &RouteAccess::Public);
}

#[test]
fn test_root_rule_covers_every_location() {
    let policy = RoutePolicy::new(vec![
        ("/".to_string(), RouteAccess::signed_in()),
        ("/login".to_string(), RouteAccess::Public),
    ]);

    assert_eq!(policy.access_for("/"), &RouteAccess::signed_in());
    assert_eq!(policy.access_for("/orders/7"), &RouteAccess::signed_in());
    assert_eq!(policy.access_for("/login"), &RouteAccess::Public);
}

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path("Orders//42/"), "/orders/42");
    assert_eq!(normalize_path("/a/b/../c"), "/a/c");
}
