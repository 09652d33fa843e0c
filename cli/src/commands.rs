use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use sends_client::{
    ApiClient,
    models::{ClimbType, NewClimber, ScoreRecord},
};
use sends_scoring::{
    Action, Session,
    dashboard::{Dashboard, GradeBar},
    feed::load_recent_activity,
    grades::{Gauge, colour_for_grade},
};
use tracing::info;

pub struct LogEntry {
    pub gym: String,
    pub area: String,
    pub wall: String,
    pub rope: Option<u32>,
    pub grade: String,
    pub attempts: u32,
    pub completed: bool,
    pub notes: String,
}

pub async fn climbers(api: &ApiClient) -> Result<()> {
    let climbers = api.list_climbers().await.context("Failed to load climbers")?;

    for climber in climbers {
        match climber.nickname.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(nickname) => println!("{:>4}  {} ({nickname})", climber.id, climber.name),
            None => println!("{:>4}  {}", climber.id, climber.name),
        }
    }

    Ok(())
}

pub async fn add_climber(
    api: &ApiClient,
    name: &str,
    email: &str,
    nickname: Option<&str>,
) -> Result<()> {
    let climber = NewClimber::new(name, email, nickname).context("Name and email are required")?;
    let reply = api
        .add_climber(&climber)
        .await
        .context("Failed to add climber")?;

    info!("Added climber {}", climber.name);
    println!("{}", reply.message);

    Ok(())
}

pub async fn delete_climber(api: &ApiClient, climber_id: u32) -> Result<()> {
    let reply = api
        .delete_climber(climber_id)
        .await
        .with_context(|| format!("Failed to delete climber {climber_id}"))?;

    info!("Deleted climber {climber_id}");
    println!("{}", reply.message);

    Ok(())
}

pub async fn scores(api: ApiClient, climber_id: u32) -> Result<()> {
    let mut session = Session::new(api);
    session.load(Some(climber_id)).await?;

    print_scores(&session);

    Ok(())
}

pub async fn log(api: ApiClient, climber_id: u32, entry: LogEntry) -> Result<()> {
    let mut session = Session::new(api);
    session.load(Some(climber_id)).await?;

    let selector = session.selector();
    let gym_id = resolve("gym", selector.gyms(), &entry.gym, |g| g.id, |g| &g.name)?;
    session.select(Action::SelectGym(gym_id)).await?;

    let selector = session.selector();
    let area_id = resolve("area", selector.areas(), &entry.area, |a| a.id, |a| &a.name)?;
    session.select(Action::SelectArea(area_id)).await?;

    let wall_name = session
        .selector()
        .wall_groups()
        .into_iter()
        .find(|name| name.eq_ignore_ascii_case(entry.wall.trim()))
        .map(str::to_string)
        .with_context(|| format!("No wall named {:?} in this area", entry.wall))?;
    session.select(Action::SelectWallGroup(wall_name)).await?;

    if session.selector().climb_type() == Some(ClimbType::Ropes) {
        let number = entry.rope.context("Rope walls need --rope <number>")?;
        let wall_id = session
            .selector()
            .rope_by_number(number)
            .with_context(|| format!("No rope #{number} on {}", entry.wall))?;
        session.select(Action::SelectRope(wall_id)).await?;
    }

    let grade = session
        .selector()
        .grades()
        .iter()
        .find(|g| g.grade.eq_ignore_ascii_case(entry.grade.trim()))
        .map(|g| g.grade.clone())
        .with_context(|| format!("Grade {:?} is not used in this area", entry.grade))?;
    session.select(Action::SelectGrade(grade)).await?;

    session.select(Action::SetAttempts(entry.attempts)).await?;
    session.select(Action::SetCompleted(entry.completed)).await?;
    session.select(Action::SetNotes(entry.notes)).await?;

    let summary = session.selector().summary();
    session.submit().await?;

    info!("Logged climb at {summary}");
    println!("Logged {summary}");
    print_scores(&session);

    Ok(())
}

pub async fn delete_score(api: ApiClient, climber_id: u32, score_id: u32) -> Result<()> {
    let mut session = Session::new(api);
    session.load(Some(climber_id)).await?;

    if !session.scores().iter().any(|s| s.id == Some(score_id)) {
        bail!("Score {score_id} is not in climber {climber_id}'s log");
    }

    session.delete_score(score_id).await?;
    println!("Deleted score {score_id}");
    print_scores(&session);

    Ok(())
}

pub async fn dashboard(api: &ApiClient, climber_id: u32) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Fetching statistics for climber {climber_id}"));
    pb.enable_steady_tick(Duration::from_millis(100));

    let dashboard = Dashboard::load(api, climber_id).await;
    pb.finish_and_clear();
    let dashboard = dashboard?;

    println!("Last 60 days average grade");
    print_gauge("All", dashboard.gauges.all.as_ref());
    print_gauge("Bouldering", dashboard.gauges.bouldering.as_ref());
    print_gauge("Ropes", dashboard.gauges.ropes.as_ref());

    let metrics = &dashboard.metrics;
    println!("\nLast 30 days");
    println!("  Climbs: {}", metrics.total_climbs);
    println!("  Points: {}", metrics.total_points.unwrap_or(0.0));
    println!("  Days climbed: {}", metrics.total_days_climbed);
    if let Some(avg) = metrics.daily_avg_climbs_completed {
        println!("  Climbs per day: {avg:.2}");
    }

    if let Some(best) = &metrics.latest_and_greatest_climb {
        let date = best
            .recorded_at()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "  Greatest send: {} at {} ({}) on {date}, {} attempts",
            best.grade,
            best.gym_name.as_deref().unwrap_or("Unknown Gym"),
            best.wall_name.as_deref().unwrap_or("Unknown Wall"),
            best.attempts,
        );
    }

    for day in &dashboard.daily {
        let label = day
            .day()
            .map(|d| d.to_string())
            .unwrap_or_else(|| day.date.clone());
        println!(
            "  {label}  {:>3} climbs  {:>6} points",
            day.total_climbs,
            day.total_score.unwrap_or(0.0)
        );
    }

    print_bars("Climbs by colour - Bouldering", &dashboard.bouldering);
    print_bars("Climbs by colour - Ropes", &dashboard.ropes);

    Ok(())
}

pub async fn recent(api: &ApiClient, max_items: usize) -> Result<()> {
    let feed = load_recent_activity(api, max_items, Utc::now()).await?;

    if feed.is_empty() {
        println!("No sends in the last week");
    }

    for activity in feed {
        println!(
            "{:<12} {} sent {} at {} in {} attempt(s)",
            activity.time_ago, activity.climber, activity.grade, activity.route, activity.attempts
        );
        if let Some(notes) = activity.notes {
            println!("             \"{notes}\"");
        }
    }

    Ok(())
}

/// Matches by id first, then by case-insensitive name.
fn resolve<T>(
    kind: &str,
    items: &[T],
    needle: &str,
    id_of: impl Fn(&T) -> u32,
    name_of: impl Fn(&T) -> &String,
) -> Result<u32> {
    let needle = needle.trim();

    if let Ok(id) = needle.parse::<u32>() {
        if items.iter().any(|item| id_of(item) == id) {
            return Ok(id);
        }
    }

    items
        .iter()
        .find(|item| name_of(item).eq_ignore_ascii_case(needle))
        .map(&id_of)
        .with_context(|| format!("No {kind} matches {needle:?}"))
}

fn print_scores(session: &Session) {
    let Some(climber) = session.climber() else {
        return;
    };

    if let Some(error) = session.error() {
        eprintln!("{error}, showing the last known log");
    }

    println!("{} - {} climbs", climber.display_name(), session.scores().len());
    for score in session.scores() {
        println!("  {}", describe(score));
    }
}

fn describe(score: &ScoreRecord) -> String {
    let mut line = format!(
        "#{:<5} {:<6} [{}] {}",
        score.id.map(|id| id.to_string()).unwrap_or_default(),
        score.grade,
        colour_for_grade(&score.grade),
        score.wall_name.as_deref().unwrap_or("Unknown Wall"),
    );

    if let Some(number) = score.wall_number.filter(|_| score.climb_type == Some(ClimbType::Ropes)) {
        line.push_str(&format!(" #{number}"));
    }
    if let Some(at) = score.recorded_at() {
        line.push_str(&format!(" on {}", at.format("%Y-%m-%d")));
    }
    line.push_str(&format!(", {} attempt(s)", score.attempts));
    if !score.completed {
        line.push_str(" (not sent)");
    }

    line
}

fn print_gauge(label: &str, gauge: Option<&Gauge>) {
    if let Some(gauge) = gauge {
        println!(
            "  {label:<11} {:<6} [{}] {:>5.1}% to next grade",
            gauge.grade, gauge.colour, gauge.value
        );
    }
}

fn print_bars(title: &str, bars: &[GradeBar]) {
    if bars.is_empty() {
        return;
    }

    println!("\n{title}");
    for bar in bars {
        println!(
            "  {:<6} [{}] {} {}",
            bar.grade,
            bar.colour,
            "#".repeat(bar.count),
            bar.count
        );
    }
}
