/*
[INPUT]:  Task subcommands, a coordinator over the configured backend
[OUTPUT]: Printed task lists / statistics; mutations committed and settled
[POS]:    CLI task commands
[UPDATE]: 2026-10-17 List, stats, add, edit, move, toggle and delete
*/

use anyhow::{Context, Result, anyhow, bail};
use console::style;
use devflow_adapter::{Task, TaskId, TaskPriority, TaskStatus};
use devflow_board::draft::parse_schedule;
use devflow_board::presenter::{ListFilter, Stats, filtered};
use devflow_board::{Coordinator, Settled, TaskDraft, TaskStore};
use dialoguer::{Confirm, theme::ColorfulTheme};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{AddArgs, Command, EditArgs, FieldArgs};

const TITLE_WIDTH: usize = 40;
const SHORT_ID: usize = 8;

/// Run one task subcommand against a freshly loaded store.
pub async fn run(coordinator: &mut Coordinator, command: Command) -> Result<()> {
    coordinator.refresh().await.context("load tasks")?;

    match command {
        Command::List { filter } => print_list(coordinator.store(), filter),
        Command::Stats => print_stats(coordinator.store()),
        Command::Add(args) => add(coordinator, args).await?,
        Command::Edit(args) => edit(coordinator, args).await?,
        Command::Move { id, status } => move_task(coordinator, &id, status).await?,
        Command::Toggle { id } => {
            let task_id = resolve_id(coordinator.store(), &id)?;
            let status = coordinator.toggle(&task_id)?;
            settle(coordinator).await?;
            println!("{} {}", style("Marked").green(), status);
        }
        Command::Delete { id, yes } => delete(coordinator, &id, yes).await?,
        other => bail!("{other:?} is not a task command"),
    }
    Ok(())
}

fn print_list(store: &TaskStore, filter: ListFilter) {
    let tasks = filtered(store, filter);
    if tasks.is_empty() {
        println!("{}", style("No tasks found.").yellow());
        return;
    }

    println!(
        "{}",
        style(format!(
            "{:<8}  {:<3}  {:<6}  {}",
            "ID", "", "PRIO", "TITLE"
        ))
        .bold()
    );
    for task in tasks {
        let check = if task.is_completed() { "[x]" } else { "[ ]" };
        let priority = match task.priority {
            TaskPriority::High => style(format!("{:<6}", task.priority)).red(),
            TaskPriority::Medium => style(format!("{:<6}", task.priority)).yellow(),
            TaskPriority::Low => style(format!("{:<6}", task.priority)).green(),
        };
        let tags = task
            .tags
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}  {}  {}  {}  {}",
            style(short_id(&task.id)).dim(),
            check,
            priority,
            fit(&task.title, TITLE_WIDTH),
            style(tags).blue()
        );
    }
}

fn print_stats(store: &TaskStore) {
    let stats = Stats::from_tasks(store.tasks());
    println!("{}", style("Statistics").bold().cyan());
    println!("  Total:      {}", stats.total);
    println!("  Completed:  {}", style(stats.completed).green());
    println!("  Pending:    {}", style(stats.pending).yellow());
    println!("  Completion: {}%", stats.completion_rate);
    println!("\n{}", style("By priority").bold());
    for (priority, count) in &stats.by_priority {
        println!("  {:<8} {}", priority.as_str(), count);
    }
    println!("\n{}", style("By status").bold());
    for (status, count) in &stats.by_status {
        println!("  {:<10} {}", status.as_str(), count);
    }
}

async fn add(coordinator: &mut Coordinator, args: AddArgs) -> Result<()> {
    let mut draft = TaskDraft::new(args.title);
    apply_fields(&mut draft, args.fields)?;
    coordinator.create(draft)?;

    let settled = settle(coordinator).await?;
    let created = settled.iter().find_map(|result| match result {
        Settled::Created(task) => Some(task),
        _ => None,
    });
    match created {
        Some(task) => println!(
            "{} {} {}",
            style("Created").green(),
            style(short_id(&task.id)).dim(),
            task.title
        ),
        None => bail!("the backend did not return the created task"),
    }
    Ok(())
}

async fn edit(coordinator: &mut Coordinator, args: EditArgs) -> Result<()> {
    let task_id = resolve_id(coordinator.store(), &args.id)?;
    let current = coordinator
        .store()
        .get(&task_id)
        .ok_or_else(|| anyhow!("task {task_id} disappeared"))?;

    let mut draft = TaskDraft::from_task(current);
    if let Some(title) = args.title {
        draft.title = title;
    }
    apply_fields(&mut draft, args.fields)?;
    coordinator.edit(&task_id, draft)?;
    settle(coordinator).await?;

    println!("{} {}", style("Updated").green(), style(short_id(&task_id)).dim());
    Ok(())
}

async fn move_task(coordinator: &mut Coordinator, id: &str, status: TaskStatus) -> Result<()> {
    let task_id = resolve_id(coordinator.store(), id)?;
    if !coordinator.commit(&task_id, status)? {
        println!("{}", style(format!("Already {status}")).dim());
        return Ok(());
    }
    settle(coordinator).await?;
    println!("{} {}", style("Moved to").green(), status);
    Ok(())
}

async fn delete(coordinator: &mut Coordinator, id: &str, yes: bool) -> Result<()> {
    let task_id = resolve_id(coordinator.store(), id)?;
    let title = coordinator
        .store()
        .get(&task_id)
        .map(|task| task.title.clone())
        .unwrap_or_default();

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete \"{title}\"?"))
            .default(false)
            .interact()
            .context("read confirmation")?;
        if !confirmed {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }
    }

    coordinator.delete(&task_id)?;
    settle(coordinator).await?;
    println!("{} {}", style("Deleted").green(), title);
    Ok(())
}

fn apply_fields(draft: &mut TaskDraft, fields: FieldArgs) -> Result<()> {
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(priority) = fields.priority {
        draft.priority = priority;
    }
    if let Some(start) = fields.start {
        draft.start_date = parse_schedule("start", &start)?;
    }
    if let Some(end) = fields.end {
        draft.end_date = parse_schedule("end", &end)?;
    }
    if fields.clear_tags {
        draft.tags.clear();
    } else if !fields.tags.is_empty() {
        draft.tags = fields.tags;
    }
    Ok(())
}

/// Wait for every remote call; the first failure becomes the command's error.
async fn settle(coordinator: &mut Coordinator) -> Result<Vec<Settled>> {
    let settled = coordinator.drain().await;
    if let Some(error) = settled.iter().find_map(Settled::error) {
        let message = coordinator
            .notices()
            .errors()
            .last()
            .map(|notice| notice.message.clone())
            .unwrap_or_else(|| error.to_string());
        bail!(message);
    }
    Ok(settled)
}

/// Match a full id or a unique prefix of one.
fn resolve_id(store: &TaskStore, input: &str) -> Result<TaskId> {
    let input = input.trim();
    if input.is_empty() {
        bail!("task id must not be empty");
    }
    let exact = TaskId::new(input);
    if store.contains(&exact) {
        return Ok(exact);
    }

    let matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|task| task.id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => bail!("no task with id {input}"),
        _ => bail!("id prefix {input} matches {} tasks", matches.len()),
    }
}

fn short_id(id: &TaskId) -> String {
    id.as_str().chars().take(SHORT_ID).collect()
}

/// Pad or cut `text` to `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{text}{}", " ".repeat(width - text.width()));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
