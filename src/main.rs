use std::error::Error;
use std::thread;
use std::time::Duration;

use birthday_math::{BirthdayReport, CalendarDate, LocalInstant, MILLIS_PER_SECOND, TimeOfDay};
use chrono::{Datelike, Timelike};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "birthday")]
#[command(about = "Age, next-birthday countdown and zodiac sign for a birth date")]
#[command(version)]
struct Args {
    /// Birth date, YYYY-MM-DD
    #[arg(short, long)]
    birth: CalendarDate,

    /// Name used in the output
    #[arg(short, long, default_value = "You")]
    name: String,

    /// Evaluate at this local instant instead of the system clock,
    /// YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS[.mmm]]
    #[arg(long)]
    at: Option<LocalInstant>,

    /// Refresh the countdown once per second until interrupted
    #[arg(short, long)]
    watch: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    tracing::debug!(?args, "parsed arguments");

    if let Err(e) = run(&args) {
        tracing::error!("birthday failed: {e}");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "birthday_math=debug,birthday=debug,info"
    } else {
        "birthday_math=info,birthday=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut now = match args.at {
        Some(at) => at,
        None => local_now()?,
    };

    let report = BirthdayReport::at(args.birth, now)?;
    println!("{}, you are {} old.", args.name, report.age);
    println!("Zodiac: {}", report.zodiac);
    println!("{}", report.zodiac.traits());
    println!("Next birthday in: {}", report.countdown);

    let mut celebrated_on = None;
    celebrate(args, &report, &mut celebrated_on);

    while args.watch {
        thread::sleep(Duration::from_secs(1));
        now = match args.at {
            // A fixed starting instant advances in step with the ticks.
            Some(_) => now
                .add_millis(MILLIS_PER_SECOND)
                .ok_or("clock ran past the last supported year")?,
            None => local_now()?,
        };
        let report = BirthdayReport::at(args.birth, now)?;
        println!("Next birthday in: {}", report.countdown);
        celebrate(args, &report, &mut celebrated_on);
    }

    Ok(())
}

/// Prints the birthday greeting at most once per calendar day.
fn celebrate(args: &Args, report: &BirthdayReport, celebrated_on: &mut Option<CalendarDate>) {
    let today = report.now.date();
    if report.is_birthday && *celebrated_on != Some(today) {
        println!("🎉 {} turns {} today! 🎉", args.name, report.age.years);
        tracing::info!(name = %args.name, %today, "birthday reached");
        *celebrated_on = Some(today);
    }
}

/// Reads the system clock as naive local time.
fn local_now() -> Result<LocalInstant, Box<dyn Error>> {
    let now = chrono::Local::now().naive_local();
    let date = CalendarDate::new(
        u16::try_from(now.year())?,
        u8::try_from(now.month())?,
        u8::try_from(now.day())?,
    )?;
    // Leap seconds report nanoseconds past 1e9; fold them into the last millisecond.
    let millis = (now.nanosecond() / 1_000_000).min(999);
    let time = TimeOfDay::new(
        u8::try_from(now.hour())?,
        u8::try_from(now.minute())?,
        u8::try_from(now.second())?,
        u16::try_from(millis)?,
    )?;
    Ok(LocalInstant::new(date, time))
}
