//! `ac-desk` command line front end

use ac_client::Screen;
use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::models::{Report, ReportFilter, ReportStatus};

use ac_desk_lib::commands::{auth, reports, users};
use ac_desk_lib::forms::ReportForm;
use ac_desk_lib::{Desk, DeskConfig, DeskError, init_logger};

#[derive(Debug, Parser)]
#[command(name = "ac-desk", version, about = "Anti-corruption reporting desk")]
struct Cli {
    /// Backend base URL (overrides AC_SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Trust self-signed server certificates
    #[arg(long)]
    insecure: bool,

    /// Directory for daily log files
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,

    #[arg(long, short, env = "AC_USERNAME")]
    username: String,

    #[arg(long, short, env = "AC_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the screens available to the user
    Whoami,
    /// List reports, optionally filtered
    Reports {
        #[arg(long)]
        reporter_id: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        persons: Option<String>,
        /// NEW, IN_PROGRESS or CLOSED
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        assigned_to: Option<i64>,
    },
    /// Show one report
    Report { id: i64 },
    /// Submit a new report
    Submit {
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long)]
        time: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        persons: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        evidence: String,
        #[arg(long, default_value = "")]
        witnesses: String,
    },
    /// List agents that can be assigned
    Agents,
    /// Assign an agent to a report
    Assign { report_id: i64, agent_id: i64 },
    /// Mark a report as in progress
    TakeToWork { id: i64 },
    /// Close a report
    Close { id: i64 },
    /// Save the solution text of a report
    Solution { id: i64, text: String },
    /// List users
    Users,
    /// List access groups
    Groups,
    /// Register a new user
    Register {
        new_username: String,
        new_password: String,
    },
    /// Change a user's password
    Passwd { user_id: i64, new_password: String },
    /// Delete a user
    DeleteUser {
        id: i64,
        /// Required: confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn print_reports(reports: &[Report], show_assignee: bool) {
    for r in reports {
        let id = r.id.map(|i| i.to_string()).unwrap_or_default();
        let status = r.status.as_ref().map(ToString::to_string).unwrap_or_default();
        let date = r.incident_date.as_deref().unwrap_or("");
        let solution = r.solution.as_deref().unwrap_or("");
        if show_assignee {
            let assignee = r.assigned_to_full_name.as_deref().unwrap_or("");
            println!("{id:>6}  {date:<10}  {status:<12}  {assignee:<30}  {solution}");
        } else {
            println!("{id:>6}  {date:<10}  {status:<12}  {solution}");
        }
    }
}

async fn execute(desk: &Desk, command: Command) -> Result<(), DeskError> {
    match command {
        Command::Whoami => {
            let view = auth::main_view(desk);
            println!("user: {}", view.username.unwrap_or_default());
            for screen in &view.screens {
                let name = match screen {
                    Screen::CreateReport => "create report",
                    Screen::ReviewReports => "review reports",
                    Screen::Admin => "administration",
                };
                println!("screen: {name}");
            }
            if let Some(message) = view.access_message {
                println!("{message}");
            }
        }
        Command::Reports {
            reporter_id,
            from,
            to,
            location,
            persons,
            status,
            assigned_to,
        } => {
            let filter = ReportFilter {
                reporter_id,
                start_incident_date: from,
                end_incident_date: to,
                incident_location: location,
                involved_persons: persons,
                status: status.as_deref().map(ReportStatus::from),
                assigned_to,
            };
            let listing = reports::filter_reports(desk, &filter).await?;
            print_reports(&listing.reports, listing.show_assignee_column);
            println!("{} report(s)", listing.count());
        }
        Command::Report { id } => {
            let details = reports::open_report(desk, id).await?;
            let r = &details.report;
            let field = |v: &Option<String>| v.clone().unwrap_or_default();
            println!("date:        {} {}", field(&r.incident_date), field(&r.incident_time));
            println!("location:    {}", field(&r.incident_location));
            println!("involved:    {}", field(&r.involved_persons));
            println!("description: {}", field(&r.description));
            println!("evidence:    {}", field(&r.evidence_description));
            println!("witnesses:   {}", field(&r.witnesses));
            println!("status:      {}", r.status.as_ref().map(ToString::to_string).unwrap_or_default());
            println!("solution:    {}", field(&r.solution));
        }
        Command::Submit {
            date,
            time,
            location,
            persons,
            description,
            evidence,
            witnesses,
        } => {
            let form = ReportForm {
                incident_date: Some(date),
                incident_time: time,
                incident_location: location,
                involved_persons: persons,
                description,
                evidence_description: evidence,
                witnesses,
            };
            reports::submit_report(desk, &form).await?;
            println!("Report submitted.");
        }
        Command::Agents => {
            for agent in reports::load_agents(desk).await? {
                println!("{:>6}  {}", agent.id, agent.label);
            }
        }
        Command::Assign {
            report_id,
            agent_id,
        } => {
            reports::assign_agent(desk, report_id, agent_id).await?;
            println!("Agent assigned.");
        }
        Command::TakeToWork { id } => {
            println!("{}", reports::take_to_work(desk, id).await?.message());
        }
        Command::Close { id } => {
            println!("{}", reports::close_report(desk, id).await?.message());
        }
        Command::Solution { id, text } => {
            println!("{}", reports::save_solution(desk, id, &text).await?.message());
        }
        Command::Users => {
            for user in users::load_users(desk).await? {
                let id = user.id.map(|i| i.to_string()).unwrap_or_default();
                println!(
                    "{id:>6}  {:<20}  {:<40}  {}",
                    user.username,
                    user.full_name(),
                    user.group_names().join(",")
                );
            }
        }
        Command::Groups => {
            for group in users::load_access_groups(desk).await? {
                let id = group.id.map(|i| i.to_string()).unwrap_or_default();
                println!("{id:>6}  {}", group.name);
            }
        }
        Command::Register {
            new_username,
            new_password,
        } => {
            users::register_user(desk, &new_username, &new_password).await?;
            println!("User registered.");
        }
        Command::Passwd {
            user_id,
            new_password,
        } => {
            users::update_password(desk, user_id, &new_password).await?;
            println!("Password updated.");
        }
        Command::DeleteUser { id, yes } => {
            users::delete_user(desk, id, yes).await?;
            println!("User deleted.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = DeskConfig::from_env();
    let cli = Cli::parse();

    if let Some(url) = cli.server_url {
        config.server_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if cli.insecure {
        config.accept_invalid_certs = true;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    let _guard = init_logger(&config.log_config())?;
    if let Some(path) = &config.env_file {
        tracing::info!(path = %path.display(), "Loaded .env");
    }
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(target: "panic", message = %info, backtrace = %backtrace, "panic occurred");
    }));

    let (desk, _events) = Desk::connect(&config).context("Failed to set up the backend client")?;

    if let Err(e) = auth::login(&desk, &cli.username, &cli.password).await {
        bail!("{}", e.user_message());
    }

    let result = execute(&desk, cli.command).await;
    auth::logout(&desk);
    if let Err(e) = result {
        bail!("{}", e.user_message());
    }
    Ok(())
}
