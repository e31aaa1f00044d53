use crate::infra::{load_pool, InMemoryNavigator, InMemoryNotificationLog};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_market::config::AppConfig;
use talent_market::error::AppError;
use talent_market::workflows::talent::reservation::{
    Allocation, AllocationRequest, ConfirmationView, ReservationForm, ReservationService,
    SponsorshipEntryPoint,
};
use talent_market::workflows::talent::{
    ActivityFeed, CandidateFilter, CandidateKind, CandidatePool, MarketSnapshot,
};

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Total candidates the employer needs
    #[arg(long)]
    pub(crate) needed: u32,
    /// Current candidates on the market (defaults to the configured pool)
    #[arg(long)]
    pub(crate) available: Option<u32>,
    /// Slider position: how many current candidates to take
    #[arg(long)]
    pub(crate) current: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MarketArgs {
    /// Hiring need to check against current supply
    #[arg(long)]
    pub(crate) needed: Option<u32>,
    /// Roster CSV to analyse instead of the generated pool
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Hiring need for the bulk reservation (defaults to 10)
    #[arg(long)]
    pub(crate) needed: Option<u32>,
    /// Roster CSV to use instead of the generated pool
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Skip the hand-picked reservation half of the demo
    #[arg(long)]
    pub(crate) skip_individual: bool,
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        needed,
        available,
        current,
    } = args;

    let available = match available {
        Some(available) => available,
        None => {
            let config = AppConfig::load()?;
            load_pool(&config.market, None, Local::now().date_naive())?.available_active_count()
        }
    };

    let allocation = AllocationRequest::new(needed, available).and_then(|request| match current {
        Some(desired) => Allocation::with_current(&request, desired),
        None => request.allocate(),
    });
    match allocation {
        Ok(allocation) => render_allocation(needed, available, &allocation),
        Err(err) => println!("Cannot allocate: {err}"),
    }
    Ok(())
}

pub(crate) fn run_market(args: MarketArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let today = Local::now().date_naive();
    let pool = load_pool(&config.market, args.roster.as_deref(), today)?;
    render_market(&MarketSnapshot::from_pool(&pool, args.needed));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        needed,
        roster,
        skip_individual,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let needed = needed.unwrap_or(10);

    let pool = Arc::new(load_pool(&config.market, roster.as_deref(), today)?);
    let notifications = Arc::new(InMemoryNotificationLog::default());
    let navigator = Arc::new(InMemoryNavigator::default());
    let service = ReservationService::new(pool.clone(), notifications.clone(), navigator.clone());

    println!("Talent marketplace demo ({today})");
    render_market(&service.market(Some(needed)));

    let feed = ActivityFeed::from_pool(pool.as_ref());
    if let Some(entry) = feed.current() {
        println!("\nRecent activity: {} ({} min ago)", entry.headline, entry.minutes_ago);
    }

    println!("\nBulk reservation for {needed} candidates");
    let opened = service
        .learn_about_sponsorship(SponsorshipEntryPoint::BulkReservationPrompt, needed)
        .and_then(|_| service.schedule_consultation());
    if let Err(err) = opened {
        println!("  Flow unavailable: {err}");
        return Ok(());
    }
    if let Ok(options) = service.call_date_options(today) {
        println!(
            "  Consultation call: {} dates offered, {} through {}",
            options.dates.len(),
            options.earliest,
            options.latest
        );
    }
    if let Err(err) = service.select_call_date(today + Duration::days(3), today) {
        println!("  Call date refused: {err}");
    }

    let rejected = service.submit(
        ReservationForm {
            email: "hiring-at-example".to_string(),
            ..demo_form()
        },
        today,
    );
    if let Err(err) = rejected {
        println!("  First attempt rejected: {err}");
        for notification in notifications.events() {
            println!("    - {}", notification.message);
        }
    }

    match service.submit(
        ReservationForm {
            scheduled_call_date: None,
            ..demo_form()
        },
        today,
    ) {
        Ok(view) => render_confirmation(&view),
        Err(err) => {
            println!("  Submission failed: {err}");
            return Ok(());
        }
    }

    if skip_individual {
        return Ok(());
    }

    service.browse_more_talent();
    let picks: Vec<_> = [CandidateKind::Current, CandidateKind::Prospective]
        .into_iter()
        .filter_map(|kind| {
            service
                .browse(&CandidateFilter {
                    kind: Some(kind),
                    ..CandidateFilter::default()
                })
                .into_iter()
                .next()
        })
        .collect();

    println!("\nIndividual reservation");
    for pick in &picks {
        println!(
            "  - {} ({}, {} / {})",
            pick.name,
            pick.kind.label(),
            pick.program.label(),
            pick.job_role
        );
    }
    let ids: Vec<_> = picks.into_iter().map(|pick| pick.id).collect();
    let outcome = service
        .reserve_candidates(&ids)
        .and_then(|_| service.submit(demo_form(), today));
    match outcome {
        Ok(view) => render_confirmation(&view),
        Err(err) => println!("  Reservation failed: {err}"),
    }

    println!(
        "\n{} confirmation screen(s) presented | {} current candidate(s) still on the market",
        navigator.presented(),
        pool.available_active_count()
    );

    Ok(())
}

fn demo_form() -> ReservationForm {
    ReservationForm {
        company_name: "Cedar Valley Manufacturing".to_string(),
        contact_name: "Riley Adams".to_string(),
        email: "riley.adams@cedarvalley.example".to_string(),
        phone: "319-555-0178".to_string(),
        scheduled_call_date: None,
        hiring_needs: Some("Entry-level analysts and support engineers".to_string()),
    }
}

fn render_allocation(needed: u32, available: u32, allocation: &Allocation) {
    println!("Allocation for {needed} needed ({available} current available)");
    println!(
        "- Current: {} ({}%)",
        allocation.current_allocation, allocation.current_percent
    );
    println!(
        "- Sponsored: {} ({}%)",
        allocation.prospective_allocation, allocation.prospective_percent
    );
    if allocation.needs_sponsorship() {
        println!("Sponsorship covers the remaining gap.");
    }
}

fn render_market(snapshot: &MarketSnapshot) {
    println!(
        "Market: {} of {} current candidates available ({}% reserved) | {} in sponsored training",
        snapshot.available_current,
        snapshot.total_current,
        snapshot.reserved_percent,
        snapshot.total_prospective
    );
    for program in &snapshot.programs {
        println!(
            "  - {}: {} available | {} off-market | {} prospective ({} week track)",
            program.program_label,
            program.available_current,
            program.off_market_current,
            program.prospective,
            program.training_weeks
        );
    }
    if let Some(alert) = &snapshot.gap_alert {
        println!(
            "Talent gap: need {} but only {} available; {} would come from sponsorship",
            alert.needed_candidates, alert.available_current, alert.gap
        );
    }
}

fn render_confirmation(view: &ConfirmationView) {
    println!();
    for line in view.printable().lines() {
        println!("  {line}");
    }
    let actions: Vec<_> = view.actions().iter().map(|action| action.label()).collect();
    println!("  [{}]", actions.join("] ["));
}
