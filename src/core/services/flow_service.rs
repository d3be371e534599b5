//! Income-to-spending flow graphs for Sankey rendering.
//!
//! Income sources feed one central node, which fans out to taxonomy parent
//! groups and from there to individual categories. A deficit node tops up the
//! centre when spending exceeds income; an unspent node drains any surplus.
//! Both sides of the central node therefore always carry the same total.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger::{sum_amounts, Expense, Income, Ledger, PeriodRange};

pub const CENTRAL_NODE_ID: &str = "hub:budget";
pub const DEFICIT_NODE_ID: &str = "special:deficit";
pub const UNSPENT_NODE_ID: &str = "special:unspent";

const CENTRAL_NODE_NAME: &str = "Budget";
const DEFICIT_NODE_NAME: &str = "Deficit";
const UNSPENT_NODE_NAME: &str = "Unspent Income";
/// Parent group that receives categories missing from the taxonomy.
pub const FALLBACK_PARENT: &str = "Other";

/// Tolerance used when checking the central node balance.
pub const BALANCE_EPSILON: f64 = 1e-6;

static DEFAULT_TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    Taxonomy::from_groups([
        (
            "Needs",
            &[
                "Housing",
                "Utilities",
                "Groceries",
                "Food",
                "Transportation",
                "Health",
                "Insurance",
            ][..],
        ),
        (
            "Wants",
            &[
                "Food & Drink",
                "Dining",
                "Shopping",
                "Entertainment",
                "Travel",
                "Personal Care",
                "Gifts",
                "Subscriptions",
            ][..],
        ),
        (
            "Financial Goals",
            &["Savings", "Investments", "Debt Payments"][..],
        ),
        (FALLBACK_PARENT, &["Other", "Uncategorized"][..]),
    ])
});

/// One parent group and the categories it contains, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyGroup {
    pub name: String,
    pub categories: Vec<String>,
}

/// Two-level grouping of expense categories under parent headings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    pub groups: Vec<TaxonomyGroup>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard().clone()
    }
}

impl Taxonomy {
    /// The shared built-in grouping. Never mutated; callers clone it.
    pub fn standard() -> &'static Taxonomy {
        &DEFAULT_TAXONOMY
    }

    pub fn from_groups<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        Self {
            groups: groups
                .into_iter()
                .map(|(name, categories)| TaxonomyGroup {
                    name: name.to_string(),
                    categories: categories.iter().map(|c| c.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Parent group of `category`; the first group listing it wins.
    pub fn parent_of(&self, category: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.categories.iter().any(|c| c == category))
            .map(|group| group.name.as_str())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.parent_of(category).is_some()
    }

    /// Appends `category` to `parent`, creating the group when absent.
    pub fn insert(&mut self, parent: &str, category: &str) {
        if self.contains(category) {
            return;
        }
        match self.groups.iter_mut().find(|group| group.name == parent) {
            Some(group) => group.categories.push(category.to_string()),
            None => self.groups.push(TaxonomyGroup {
                name: parent.to_string(),
                categories: vec![category.to_string()],
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowNode {
    #[serde(rename = "nodeId")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Nodes and positive-valued links of a flow diagram.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn inflow(&self, id: &str) -> f64 {
        sum_amounts(
            self.links
                .iter()
                .filter(|link| link.target == id)
                .map(|link| link.value),
        )
    }

    pub fn outflow(&self, id: &str) -> f64 {
        sum_amounts(
            self.links
                .iter()
                .filter(|link| link.source == id)
                .map(|link| link.value),
        )
    }

    /// True when the central node's inflow equals its outflow within
    /// `epsilon`. An empty graph is trivially balanced.
    pub fn is_balanced(&self, epsilon: f64) -> bool {
        if self.is_empty() {
            return true;
        }
        (self.inflow(CENTRAL_NODE_ID) - self.outflow(CENTRAL_NODE_ID)).abs() <= epsilon
    }

    fn push_node(&mut self, id: String, name: &str) {
        self.nodes.push(FlowNode {
            id,
            name: name.to_string(),
        });
    }

    fn push_link(&mut self, source: &str, target: &str, value: f64) {
        self.links.push(FlowLink {
            source: source.to_string(),
            target: target.to_string(),
            value,
        });
    }
}

pub fn income_node_id(source: &str) -> String {
    format!("income:{source}")
}

pub fn parent_node_id(parent: &str) -> String {
    format!("parent:{parent}")
}

pub fn category_node_id(category: &str) -> String {
    format!("category:{category}")
}

/// Running totals keyed by label, remembering first-seen order.
#[derive(Default)]
struct OrderedTotals {
    order: Vec<String>,
    totals: HashMap<String, f64>,
}

impl OrderedTotals {
    fn add(&mut self, label: &str, amount: f64) {
        match self.totals.get_mut(label) {
            Some(total) => *total += amount,
            None => {
                self.order.push(label.to_string());
                self.totals.insert(label.to_string(), amount);
            }
        }
    }

    fn get(&self, label: &str) -> f64 {
        self.totals.get(label).copied().unwrap_or(0.0)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .map(|label| (label.as_str(), self.get(label)))
    }
}

pub struct FlowService;

impl FlowService {
    /// Builds the flow graph for every record given.
    pub fn build(incomes: &[Income], expenses: &[Expense], taxonomy: &Taxonomy) -> FlowGraph {
        let mut sources = OrderedTotals::default();
        for income in incomes {
            sources.add(income.source_label(), income.amount());
        }
        let mut categories = OrderedTotals::default();
        for expense in expenses {
            categories.add(expense.category_label(), expense.amount());
        }

        let mut local = taxonomy.clone();
        for (category, _) in categories.iter() {
            local.insert(FALLBACK_PARENT, category);
        }

        let total_income = sum_amounts(
            sources
                .iter()
                .map(|(_, amount)| amount)
                .filter(|amount| *amount > 0.0),
        );

        let mut assigned = HashSet::new();
        let mut groups: Vec<(&str, f64, Vec<(&str, f64)>)> = Vec::new();
        for group in &local.groups {
            let children: Vec<(&str, f64)> = group
                .categories
                .iter()
                .filter(|category| assigned.insert(category.as_str()))
                .map(|category| (category.as_str(), categories.get(category)))
                .filter(|(_, total)| *total > 0.0)
                .collect();
            let group_total = sum_amounts(children.iter().map(|(_, total)| *total));
            if group_total > 0.0 {
                groups.push((group.name.as_str(), group_total, children));
            }
        }
        let total_expenses = sum_amounts(groups.iter().map(|(_, total, _)| *total));

        let mut graph = FlowGraph::default();
        if total_income == 0.0 && total_expenses == 0.0 {
            return graph;
        }

        graph.push_node(CENTRAL_NODE_ID.to_string(), CENTRAL_NODE_NAME);
        for (source, amount) in sources.iter().filter(|(_, amount)| *amount > 0.0) {
            let id = income_node_id(source);
            graph.push_node(id.clone(), source);
            graph.push_link(&id, CENTRAL_NODE_ID, amount);
        }

        let deficit = total_expenses - total_income;
        if deficit > 0.0 {
            graph.push_node(DEFICIT_NODE_ID.to_string(), DEFICIT_NODE_NAME);
            graph.push_link(DEFICIT_NODE_ID, CENTRAL_NODE_ID, deficit);
        }

        for (parent, group_total, children) in &groups {
            let parent_id = parent_node_id(parent);
            graph.push_node(parent_id.clone(), parent);
            graph.push_link(CENTRAL_NODE_ID, &parent_id, *group_total);
            for (category, total) in children {
                let id = category_node_id(category);
                graph.push_node(id.clone(), category);
                graph.push_link(&parent_id, &id, *total);
            }
        }

        let unspent = total_income - total_expenses;
        if unspent > 0.0 {
            graph.push_node(UNSPENT_NODE_ID.to_string(), UNSPENT_NODE_NAME);
            graph.push_link(CENTRAL_NODE_ID, UNSPENT_NODE_ID, unspent);
        }

        debug!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            total_income,
            total_expenses,
            "built flow graph"
        );
        graph
    }

    /// Builds the flow graph for records dated inside `range`.
    pub fn build_in_range(
        incomes: &[Income],
        expenses: &[Expense],
        taxonomy: &Taxonomy,
        range: &PeriodRange,
    ) -> FlowGraph {
        let incomes: Vec<Income> = incomes
            .iter()
            .filter(|income| range.contains_str(&income.date))
            .cloned()
            .collect();
        let expenses: Vec<Expense> = expenses
            .iter()
            .filter(|expense| range.contains_str(&expense.date))
            .cloned()
            .collect();
        Self::build(&incomes, &expenses, taxonomy)
    }

    pub fn build_for_ledger(
        ledger: &Ledger,
        taxonomy: &Taxonomy,
        range: Option<&PeriodRange>,
    ) -> FlowGraph {
        match range {
            Some(range) => Self::build_in_range(&ledger.incomes, &ledger.expenses, taxonomy, range),
            None => Self::build(&ledger.incomes, &ledger.expenses, taxonomy),
        }
    }
}
