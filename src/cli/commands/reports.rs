//! Read-only reports over the loaded ledger.

use crate::cli::commands::{parse_month, usage_error, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, LoopControl, ShellContext};
use crate::cli::output::{self, progress_bar};
use crate::cli::table::{Column, Table};
use crate::core::services::flow_service::BALANCE_EPSILON;
use crate::core::services::{
    BudgetService, BudgetStatus, CategoryTotal, FlowService, GoalService, QueryService,
    SummaryService, Taxonomy,
};
use crate::currency::month_label;
use crate::ledger::{parse_iso_date, DatePreset, PeriodRange};

const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Dashboard totals and recent expenses",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new("recent", "List the latest expenses", "recent [count]", cmd_recent),
        CommandDefinition::new(
            "budgets",
            "Budget progress for the current periods",
            "budgets",
            cmd_budgets,
        ),
        CommandDefinition::new("goals", "Savings goal progress", "goals", cmd_goals),
        CommandDefinition::new(
            "categories",
            "Spending per category",
            "categories [YYYY-MM]",
            cmd_categories,
        ),
        CommandDefinition::new("vendors", "Top vendors by spend", "vendors [YYYY-MM]", cmd_vendors),
        CommandDefinition::new(
            "monthly",
            "Spending over the last six months",
            "monthly",
            cmd_monthly,
        ),
        CommandDefinition::new(
            "statement",
            "Expenses of one month in date order",
            "statement <YYYY-MM>",
            cmd_statement,
        ),
        CommandDefinition::new(
            "flow",
            "Income to spending flow links",
            "flow [preset | from [to]]",
            cmd_flow,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let dashboard = SummaryService::dashboard(&ledger.expenses);
    let income = ledger.total_income();
    let today = context.today();
    let alerts = BudgetService::evaluate_ledger(ledger, today)
        .into_iter()
        .filter(|progress| progress.pacing_alert)
        .count();

    output::section("Summary");
    output::info(format!(
        "Total spent:  {}",
        context.format_amount(dashboard.total_amount)
    ));
    output::info(format!("Expenses:     {}", dashboard.expense_count));
    output::info(format!("Categories:   {}", dashboard.unique_categories));
    output::info(format!("Income:       {}", context.format_amount(income)));
    output::info(format!(
        "Net:          {}",
        context.format_amount(income - dashboard.total_amount)
    ));
    if alerts > 0 {
        output::warning(format!("{alerts} budget(s) pacing ahead of the calendar"));
    }

    render_recent(context, context.config.recent_limit)?;
    Ok(LoopControl::Continue)
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => context.config.recent_limit,
        [raw] => raw
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| usage_error("recent [count]"))?,
        _ => return Err(usage_error("recent [count]")),
    };
    render_recent(context, limit)?;
    Ok(LoopControl::Continue)
}

fn render_recent(context: &ShellContext, limit: usize) -> Result<(), CommandError> {
    let ledger = context.ledger()?;
    output::section("Recent expenses");
    let recent = QueryService::recent(&ledger.expenses, limit);
    if recent.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Vendor").max_width(28),
        Column::left("Category"),
        Column::right("Amount"),
    ]);
    for expense in &recent {
        table.push_row(vec![
            expense.date.clone(),
            expense.vendor_label().to_string(),
            expense.category_label().to_string(),
            context.format_in(expense.amount(), &expense.currency_code()),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_budgets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let progress = BudgetService::evaluate_ledger(ledger, context.today());
    output::section("Budgets");
    if progress.is_empty() {
        output::info("No budgets defined.");
        return Ok(LoopControl::Continue);
    }

    let mut table = Table::new(vec![
        Column::left("Budget").max_width(24),
        Column::left("Category"),
        Column::left("Period"),
        Column::right("Spent"),
        Column::right("Limit"),
        Column::left("Progress"),
        Column::left("Status"),
    ]);
    for item in &progress {
        table.push_row(vec![
            item.name.clone(),
            item.category.clone(),
            item.period.label().to_string(),
            context.format_amount(item.spent),
            context.format_amount(item.spent + item.remaining),
            format!(
                "{} {:.0}%",
                progress_bar(item.display_progress(), BAR_WIDTH),
                item.progress
            ),
            item.status.label().to_string(),
        ]);
    }
    output::info(table.render());

    for item in BudgetService::alerts(&progress) {
        output::warning(format!(
            "`{}` has used {:.0}% of its limit with {:.0}% of the {} elapsed",
            item.name,
            item.spent_ratio * 100.0,
            item.elapsed_ratio * 100.0,
            item.period.label().to_ascii_lowercase()
        ));
    }
    for item in progress.iter().filter(|p| p.status == BudgetStatus::Invalid) {
        output::warning(format!("`{}` has no usable limit", item.name));
    }
    Ok(LoopControl::Continue)
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let goals = GoalService::progress_all(ledger, context.today());
    output::section("Savings goals");
    if goals.is_empty() {
        output::info("No savings goals yet.");
        return Ok(LoopControl::Continue);
    }

    let mut table = Table::new(vec![
        Column::left("Goal").max_width(24),
        Column::right("Saved"),
        Column::right("Target"),
        Column::left("Progress"),
        Column::left("Deadline"),
    ]);
    for goal in &goals {
        let deadline = match (goal.deadline, goal.days_left) {
            (_, _) if goal.achieved => "achieved".to_string(),
            (Some(date), Some(days)) if days >= 0 => format!("{date} ({days} days left)"),
            (Some(date), Some(_)) => format!("{date} (overdue)"),
            _ => "-".to_string(),
        };
        table.push_row(vec![
            goal.name.clone(),
            context.format_amount(goal.current),
            context.format_amount(goal.target),
            format!(
                "{} {:.0}%",
                progress_bar(goal.display_progress(), BAR_WIDTH),
                goal.progress
            ),
            deadline,
        ]);
    }
    output::info(table.render());
    Ok(LoopControl::Continue)
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let (title, totals) = match args {
        [] => ("Spending by category".to_string(), SummaryService::category_totals(&ledger.expenses)),
        [raw] => {
            let (year, month) = parse_month(raw)?;
            (
                format!("Spending by category, {} {year}", month_label(month)),
                SummaryService::category_totals_for_month(&ledger.expenses, year, month),
            )
        }
        _ => return Err(usage_error("categories [YYYY-MM]")),
    };
    output::section(title);
    render_category_totals(context, &totals);
    Ok(LoopControl::Continue)
}

fn render_category_totals(context: &ShellContext, totals: &[CategoryTotal]) {
    if totals.is_empty() {
        output::info("No expenses in this window.");
        return;
    }
    let mut table = Table::new(vec![Column::left("Category"), Column::right("Total")]);
    for total in totals {
        table.push_row(vec![total.category.clone(), context.format_amount(total.total)]);
    }
    output::info(table.render());
}

fn cmd_vendors(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let limit = context.config.top_vendor_limit;
    let (title, vendors) = match args {
        [] => ("Top vendors".to_string(), SummaryService::top_vendors(&ledger.expenses, limit)),
        [raw] => {
            let (year, month) = parse_month(raw)?;
            (
                format!("Top vendors, {} {year}", month_label(month)),
                SummaryService::top_vendors_for_month(&ledger.expenses, year, month, limit),
            )
        }
        _ => return Err(usage_error("vendors [YYYY-MM]")),
    };
    output::section(title);
    if vendors.is_empty() {
        output::info("No expenses in this window.");
        return Ok(LoopControl::Continue);
    }
    let mut table = Table::new(vec![
        Column::left("Vendor").max_width(28),
        Column::right("Total"),
        Column::left("Relative"),
    ]);
    for vendor in &vendors {
        table.push_row(vec![
            vendor.vendor.clone(),
            context.format_amount(vendor.total),
            format!("{} {:.0}%", progress_bar(vendor.progress, BAR_WIDTH), vendor.progress),
        ]);
    }
    output::info(table.render());
    Ok(LoopControl::Continue)
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger()?;
    let months = SummaryService::monthly_trailing(&ledger.expenses, context.today());
    let peak = months.iter().map(|m| m.total).fold(0.0_f64, f64::max);
    output::section("Last six months");
    let mut table = Table::new(vec![
        Column::left("Month"),
        Column::right("Total"),
        Column::left(""),
    ]);
    for month in &months {
        let share = if peak > 0.0 { month.total / peak * 100.0 } else { 0.0 };
        table.push_row(vec![
            month.month.clone(),
            context.format_amount(month.total),
            progress_bar(share, BAR_WIDTH),
        ]);
    }
    output::info(table.render());
    Ok(LoopControl::Continue)
}

fn cmd_statement(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("statement <YYYY-MM>"));
    };
    let (year, month) = parse_month(raw)?;
    let ledger = context.ledger()?;
    let statement = SummaryService::monthly_statement(&ledger.expenses, year, month);

    output::section(format!("Statement {} {year}", month_label(month)));
    if statement.lines.is_empty() {
        output::info("No expenses in this month.");
        return Ok(LoopControl::Continue);
    }
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Vendor").max_width(28),
        Column::left("Category"),
        Column::right("Amount"),
    ]);
    for line in &statement.lines {
        table.push_row(vec![
            context.format_day(line.date),
            line.vendor.clone(),
            line.category.clone(),
            context.format_amount(line.amount),
        ]);
    }
    output::info(table.render());
    output::info(format!("Total: {}", context.format_amount(statement.total)));
    render_category_totals(context, &statement.categories);
    Ok(LoopControl::Continue)
}

fn cmd_flow(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = flow_range(args, context)?;
    let ledger = context.ledger()?;
    let graph = FlowService::build_for_ledger(ledger, &Taxonomy::default(), range.as_ref());

    match &range {
        Some(range) => output::section(format!("Money flow {range}")),
        None => output::section("Money flow"),
    }
    if graph.is_empty() {
        output::info("No income or spending in this window.");
        return Ok(LoopControl::Continue);
    }

    let name_of = |id: &str| {
        graph
            .node(id)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    let mut table = Table::new(vec![
        Column::left("From"),
        Column::left("To"),
        Column::right("Amount"),
    ]);
    for link in &graph.links {
        table.push_row(vec![
            name_of(&link.source),
            name_of(&link.target),
            context.format_amount(link.value),
        ]);
    }
    output::info(table.render());
    if !graph.is_balanced(BALANCE_EPSILON) {
        output::warning("flow graph does not balance");
    }
    Ok(LoopControl::Continue)
}

fn flow_range(args: &[&str], context: &ShellContext) -> Result<Option<PeriodRange>, CommandError> {
    let date = |raw: &str| {
        parse_iso_date(raw)
            .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a date or preset")))
    };
    match args {
        [] => Ok(None),
        [single] => match single.parse::<DatePreset>() {
            Ok(preset) => Ok(Some(preset.resolve(context.today()))),
            Err(_) => Ok(Some(PeriodRange::custom(date(*single)?, None))),
        },
        [from, to] => Ok(Some(PeriodRange::custom(date(*from)?, Some(date(*to)?)))),
        _ => Err(usage_error("flow [preset | from [to]]")),
    }
}
