use super::{expense, income};
use crate::core::services::flow_service::{
    category_node_id, income_node_id, parent_node_id, BALANCE_EPSILON, CENTRAL_NODE_ID,
    DEFICIT_NODE_ID, UNSPENT_NODE_ID,
};
use crate::core::services::{FlowService, Taxonomy};
use crate::ledger::PeriodRange;

use super::day;

#[test]
fn no_records_produce_empty_graph() {
    let graph = FlowService::build(&[], &[], &Taxonomy::default());
    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());
    assert!(graph.is_balanced(BALANCE_EPSILON));
}

#[test]
fn surplus_flows_to_unspent_income() {
    let incomes = vec![income("Salary", "2026-10-01", 100.0)];
    let expenses = vec![expense("Market", "Groceries", "2026-10-02", 40.0)];

    let graph = FlowService::build(&incomes, &expenses, &Taxonomy::default());

    assert!(graph.node(DEFICIT_NODE_ID).is_none());
    assert_eq!(graph.inflow(UNSPENT_NODE_ID), 60.0);
    assert_eq!(graph.inflow(CENTRAL_NODE_ID), 100.0);
    assert_eq!(graph.outflow(CENTRAL_NODE_ID), 100.0);
    assert!(graph.is_balanced(BALANCE_EPSILON));
}

#[test]
fn shortfall_is_covered_by_deficit() {
    let incomes = vec![income("Salary", "2026-10-01", 50.0)];
    let expenses = vec![expense("Market", "Groceries", "2026-10-02", 80.0)];

    let graph = FlowService::build(&incomes, &expenses, &Taxonomy::default());

    assert_eq!(graph.outflow(DEFICIT_NODE_ID), 30.0);
    assert!(graph.node(UNSPENT_NODE_ID).is_none());
    assert!(graph.is_balanced(BALANCE_EPSILON));
}

#[test]
fn expenses_only_still_balance() {
    let expenses = vec![
        expense("Market", "Groceries", "2026-10-02", 12.5),
        expense("Cinema", "Entertainment", "2026-10-03", 7.25),
    ];

    let graph = FlowService::build(&[], &expenses, &Taxonomy::default());

    assert_eq!(graph.outflow(DEFICIT_NODE_ID), 19.75);
    assert!(graph.is_balanced(BALANCE_EPSILON));
}

#[test]
fn single_need_without_income_flows_through_deficit() {
    let expenses = vec![expense("Market", "Food", "2026-10-02", 100.0)];

    let graph = FlowService::build(&[], &expenses, &Taxonomy::default());

    let links: Vec<(&str, &str, f64)> = graph
        .links
        .iter()
        .map(|link| (link.source.as_str(), link.target.as_str(), link.value))
        .collect();
    let needs = parent_node_id("Needs");
    let food = category_node_id("Food");
    assert_eq!(
        links,
        vec![
            (DEFICIT_NODE_ID, CENTRAL_NODE_ID, 100.0),
            (CENTRAL_NODE_ID, needs.as_str(), 100.0),
            (needs.as_str(), food.as_str(), 100.0),
        ]
    );
    assert!(graph.inflow(DEFICIT_NODE_ID).is_sign_positive());
}

#[test]
fn categories_hang_under_their_parent() {
    let incomes = vec![income("Salary", "2026-10-01", 500.0)];
    let expenses = vec![
        expense("Bistro", "Food", "2026-10-02", 30.0),
        expense("Cinema", "Entertainment", "2026-10-03", 20.0),
    ];

    let graph = FlowService::build(&incomes, &expenses, &Taxonomy::default());

    let needs = parent_node_id("Needs");
    assert_eq!(graph.inflow(&needs), 30.0);
    assert_eq!(graph.inflow(&category_node_id("Food")), 30.0);
    assert_eq!(graph.outflow(&needs), 30.0);
    assert_eq!(graph.inflow(&parent_node_id("Wants")), 20.0);
    assert!(graph.node(&parent_node_id("Financial Goals")).is_none());
}

#[test]
fn unknown_category_lands_under_other_without_mutating_taxonomy() {
    let taxonomy = Taxonomy::default();
    let before = taxonomy.clone();
    let expenses = vec![expense("Vet", "Pets", "2026-10-02", 45.0)];

    let graph = FlowService::build(&[], &expenses, &taxonomy);

    assert_eq!(graph.inflow(&category_node_id("Pets")), 45.0);
    assert_eq!(graph.outflow(&parent_node_id("Other")), 45.0);
    assert_eq!(taxonomy, before);
    assert!(!Taxonomy::standard().contains("Pets"));
}

#[test]
fn blank_labels_use_fallbacks() {
    let incomes = vec![income("  ", "2026-10-01", 10.0)];
    let expenses = vec![expense("Shop", "", "2026-10-02", 5.0)];

    let graph = FlowService::build(&incomes, &expenses, &Taxonomy::default());

    assert_eq!(graph.outflow(&income_node_id("Other Income")), 10.0);
    assert_eq!(graph.inflow(&category_node_id("Uncategorized")), 5.0);
}

#[test]
fn shared_names_get_distinct_node_ids() {
    let incomes = vec![income("Other", "2026-10-01", 10.0)];
    let expenses = vec![expense("Shop", "Other", "2026-10-02", 5.0)];

    let graph = FlowService::build(&incomes, &expenses, &Taxonomy::default());

    let mut ids: Vec<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(graph.node("income:Other").is_some());
    assert!(graph.node("parent:Other").is_some());
    assert!(graph.node("category:Other").is_some());
}

#[test]
fn income_sources_are_summed_in_encounter_order() {
    let incomes = vec![
        income("Salary", "2026-10-01", 100.0),
        income("Freelance", "2026-10-05", 40.0),
        income("Salary", "2026-10-15", 100.0),
    ];

    let graph = FlowService::build(&incomes, &[], &Taxonomy::default());

    let sources: Vec<&str> = graph
        .links
        .iter()
        .filter(|link| link.target == CENTRAL_NODE_ID)
        .map(|link| link.source.as_str())
        .collect();
    assert_eq!(sources, vec!["income:Salary", "income:Freelance"]);
    assert_eq!(graph.outflow("income:Salary"), 200.0);
    assert_eq!(graph.inflow(UNSPENT_NODE_ID), 240.0);
}

#[test]
fn range_filter_drops_records_outside_window() {
    let incomes = vec![income("Salary", "2026-09-01", 100.0)];
    let expenses = vec![expense("Market", "Groceries", "2026-10-02", 40.0)];
    let range = PeriodRange::month_of(day(2026, 10, 1));

    let graph = FlowService::build_in_range(&incomes, &expenses, &Taxonomy::default(), &range);

    assert!(graph.node("income:Salary").is_none());
    assert_eq!(graph.outflow(DEFICIT_NODE_ID), 40.0);
}

#[test]
fn graph_serializes_with_node_id_key() {
    let incomes = vec![income("Salary", "2026-10-01", 10.0)];
    let graph = FlowService::build(&incomes, &[], &Taxonomy::default());
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["nodes"][0]["nodeId"], CENTRAL_NODE_ID);
    assert!(json["links"][0]["value"].is_number());
}
