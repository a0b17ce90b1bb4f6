use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use stride_core::time::{parse_date, parse_duration};
use stride_core::{
    CapabilitySnapshot, Clock, FixedClock, Goal, HALF_MARATHON_M, MARATHON_M, PlanningKernel,
    SessionActuals, SessionLog, SnapshotSource, project_capability,
};

mod config;
mod logging;
mod render;
mod state;

use config::Config;
use state::StateDir;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STRIDE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "stride", version = VERSION, about = "Race projections and training plans for runners")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record or inspect comfortable efforts
    Capability {
        #[command(subcommand)]
        command: CapabilityCommand,
    },

    /// Project race times and pace zones from an effort without saving it
    Project {
        /// Distance in meters, or 5k / 10k / half / marathon / 7.5km
        #[arg(long)]
        distance: String,
        /// Time as h:mm:ss, m:ss or seconds
        #[arg(long)]
        time: String,
    },

    /// Set, show or check the race goal
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Generate and inspect the training plan
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Record how a planned workout went
    Log {
        /// Workout date (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Distance actually covered
        #[arg(long)]
        distance: Option<String>,
        /// Time actually taken, as h:mm:ss, m:ss or seconds
        #[arg(long)]
        time: Option<String>,
        /// Perceived exertion, 1-10
        #[arg(long)]
        rpe: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Manage ~/.stride/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CapabilityCommand {
    /// Record a comfortable effort
    Add {
        #[arg(long)]
        distance: String,
        #[arg(long)]
        time: String,
        /// Date of the effort (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the latest effort and what it projects to
    Latest,
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Replace the current goal
    Set {
        #[arg(long)]
        distance: String,
        /// Race day (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Optional target finishing time
        #[arg(long)]
        time: Option<String>,
    },
    Show,
    /// Assess whether the goal is reachable by race day
    Check,
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Build a new active plan for the current goal
    Generate,
    /// Print the active plan, optionally within a date range
    Show {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Write the active plan to CSV
    Export {
        #[arg(long, default_value = "plan.csv")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let state = StateDir::open_default()?;
    let cfg = config::load_config(&state.config_path())?;
    let today = match &cli.today {
        Some(s) => parse_date(s)?,
        None => cfg.clock()?.today(),
    };
    tracing::debug!(%today, home = %state.root().display(), "starting");

    let app = App {
        state,
        cfg,
        today,
        json: cli.json,
    };

    match cli.command {
        Command::Capability { command } => match command {
            CapabilityCommand::Add { distance, time, date } => {
                app.capability_add(&distance, &time, date.as_deref())?
            }
            CapabilityCommand::Latest => app.capability_latest()?,
        },
        Command::Project { distance, time } => app.project(&distance, &time)?,
        Command::Goal { command } => match command {
            GoalCommand::Set { distance, date, time } => {
                app.goal_set(&distance, &date, time.as_deref())?
            }
            GoalCommand::Show => app.goal_show()?,
            GoalCommand::Check => app.goal_check()?,
        },
        Command::Plan { command } => match command {
            PlanCommand::Generate => app.plan_generate()?,
            PlanCommand::Show { from, to } => app.plan_show(from.as_deref(), to.as_deref())?,
            PlanCommand::Export { out } => app.plan_export(&out)?,
        },
        Command::Log {
            date,
            distance,
            time,
            rpe,
            notes,
        } => {
            let actuals = SessionActuals {
                actual_distance_m: distance.as_deref().map(parse_distance).transpose()?,
                actual_time_sec: time.as_deref().map(parse_duration).transpose()?,
                rpe,
                notes,
            };
            app.log_session(date.as_deref(), actuals)?
        }
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&app.state.config_path())?,
            ConfigCommand::Show => app.config_show()?,
        },
    }

    Ok(())
}

struct App {
    state: StateDir,
    cfg: Config,
    today: NaiveDate,
    json: bool,
}

impl App {
    fn kernel(&self) -> Result<PlanningKernel<FixedClock, Vec<CapabilitySnapshot>>> {
        let snapshots = self.state.load_snapshots()?;
        Ok(
            PlanningKernel::new(FixedClock(self.today), snapshots, self.cfg.effective_settings())
                .with_model(self.cfg.training_model()),
        )
    }

    fn current_goal(&self) -> Result<Goal> {
        self.state
            .load_goal()?
            .context("No goal set. Run: stride goal set --distance <d> --date <YYYY-MM-DD>")
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }

    fn capability_add(&self, distance: &str, time: &str, date: Option<&str>) -> Result<()> {
        let date = date.map(parse_date).transpose()?.unwrap_or(self.today);
        let snap = CapabilitySnapshot::new(
            date,
            parse_distance(distance)?,
            parse_duration(time)?,
            Utc::now(),
        )?;
        let proj = project_capability(&snap, &self.cfg.effective_settings())?;
        self.state.append_snapshot(snap.clone())?;
        tracing::info!(date = %snap.date, "capability snapshot recorded");

        self.emit(&proj, |p| {
            print!("Recorded ");
            render::print_snapshot(&snap);
            println!();
            render::print_projection(p);
        })
    }

    fn capability_latest(&self) -> Result<()> {
        let kernel = self.kernel()?;
        let Some(snap) = kernel.snapshots().latest() else {
            bail!("No capability snapshots. Run: stride capability add --distance <d> --time <t>");
        };
        let proj = project_capability(&snap, kernel.settings())?;

        #[derive(Serialize)]
        struct Latest<'a> {
            snapshot: &'a CapabilitySnapshot,
            projection: &'a stride_core::CapabilityProjection,
        }
        self.emit(
            &Latest {
                snapshot: &snap,
                projection: &proj,
            },
            |l| {
                render::print_snapshot(l.snapshot);
                println!();
                render::print_projection(l.projection);
            },
        )
    }

    fn project(&self, distance: &str, time: &str) -> Result<()> {
        let snap = CapabilitySnapshot::new(
            self.today,
            parse_distance(distance)?,
            parse_duration(time)?,
            Utc::now(),
        )?;
        let proj = project_capability(&snap, &self.cfg.effective_settings())?;
        self.emit(&proj, render::print_projection)
    }

    fn goal_set(&self, distance: &str, date: &str, time: Option<&str>) -> Result<()> {
        let goal = Goal::new(
            parse_distance(distance)?,
            time.map(parse_duration).transpose()?,
            parse_date(date)?,
        )?;
        if goal.target_date <= self.today {
            bail!("Race day {} is not after today ({})", goal.target_date, self.today);
        }
        let retired = self.state.replace_goal(&goal)?;
        if retired > 0 {
            tracing::info!(retired, "goal changed; active plan superseded");
        }
        self.emit(&goal, |g| {
            print!("Goal set: ");
            render::print_goal(g);
        })
    }

    fn goal_show(&self) -> Result<()> {
        let goal = self.current_goal()?;
        self.emit(&goal, render::print_goal)
    }

    fn goal_check(&self) -> Result<()> {
        let goal = self.current_goal()?;
        let res = self.kernel()?.assess_goal(&goal)?;
        self.emit(&res, |r| {
            render::print_goal(&goal);
            println!();
            render::print_feasibility(r);
        })
    }

    fn plan_generate(&self) -> Result<()> {
        let goal = self.current_goal()?;
        let plan = self.kernel()?.plan_for_goal(&goal)?;
        self.state.store_active_plan(plan.clone())?;

        self.emit(&plan, |p| {
            println!(
                "# Plan {} -> {} ({} workouts, {:.1} km)\n",
                p.start_date,
                p.end_date,
                p.workouts.len(),
                p.total_distance_m() as f64 / 1000.0
            );
            render::print_workouts(&p.workouts);
        })
    }

    fn plan_show(&self, from: Option<&str>, to: Option<&str>) -> Result<()> {
        let Some(plan) = self.state.active_plan()? else {
            bail!("No active plan. Run: stride plan generate");
        };
        let from = from.map(parse_date).transpose()?;
        let to = to.map(parse_date).transpose()?;
        let workouts: Vec<_> = plan.workouts_between(from, to).collect();
        self.emit(&workouts, |ws| render::print_workouts(ws.iter().copied()))
    }

    fn plan_export(&self, out: &std::path::Path) -> Result<()> {
        let Some(plan) = self.state.active_plan()? else {
            bail!("No active plan. Run: stride plan generate");
        };
        let n = render::write_plan_csv(out, &plan)?;
        println!("Wrote {n} workouts to {}", out.display());
        Ok(())
    }

    fn log_session(&self, date: Option<&str>, actuals: SessionActuals) -> Result<()> {
        let Some(plan) = self.state.active_plan()? else {
            bail!("No active plan. Run: stride plan generate");
        };
        let date = date.map(parse_date).transpose()?.unwrap_or(self.today);
        let log = SessionLog::for_workout(&plan, date, actuals, Utc::now())?;
        self.state.append_log(log.clone())?;
        tracing::info!(date = %log.workout_date, kind = %log.workout_type, "session logged");

        self.emit(&log, render::print_session_log)
    }

    fn config_show(&self) -> Result<()> {
        let effective = Config {
            settings: self.cfg.effective_settings(),
            model: Some(self.cfg.training_model()),
            profile: self.cfg.profile.clone(),
        };
        if self.json {
            println!("{}", serde_json::to_string_pretty(&effective)?);
        } else {
            println!("# {}\n", self.state.config_path().display());
            print!("{}", toml::to_string_pretty(&effective).context("serialize config")?);
        }
        Ok(())
    }
}

/// Meters, a named race, or a decimal number of kilometers ("7.5km", "12k").
fn parse_distance(s: &str) -> Result<u32> {
    let lower = s.trim().to_lowercase();
    let meters = match lower.as_str() {
        "5k" => 5_000,
        "10k" => 10_000,
        "half" | "hm" | "half-marathon" => HALF_MARATHON_M,
        "marathon" | "full" => MARATHON_M,
        other => {
            if let Some(km) = other.strip_suffix("km").or_else(|| other.strip_suffix('k')) {
                let km: f64 = km
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid distance '{s}'"))?;
                (km * 1000.0).round() as u32
            } else {
                other
                    .parse()
                    .with_context(|| format!("invalid distance '{s}'"))?
            }
        }
    };
    if meters == 0 {
        bail!("distance must be positive");
    }
    Ok(meters)
}
